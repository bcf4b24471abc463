//! Platform-dependent primary modifier.

use crate::binding::PRIMARY_PLACEHOLDER;

/// Token the placeholder resolves to on Apple platforms (the Command key).
pub const META_TOKEN: &str = "meta";

/// Token the placeholder resolves to everywhere else.
pub const CTRL_TOKEN: &str = "ctrl";

/// Platform family, as far as modifier conventions go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// macOS and iOS: Command is the primary modifier.
    Apple,
    /// Everything else: Control is the primary modifier.
    Other,
}

impl Platform {
    /// The platform this process runs on.
    pub fn current() -> Self {
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            Self::Apple
        } else {
            Self::Other
        }
    }

    /// Token of the primary modifier on this platform.
    pub fn primary_token(self) -> &'static str {
        match self {
            Self::Apple => META_TOKEN,
            Self::Other => CTRL_TOKEN,
        }
    }

    /// Token of the Control/Command key that is not primary here.
    pub fn secondary_token(self) -> &'static str {
        match self {
            Self::Apple => CTRL_TOKEN,
            Self::Other => META_TOKEN,
        }
    }

    /// Replace every placeholder token with this platform's primary modifier.
    ///
    /// Order is preserved; other tokens pass through untouched.
    pub fn resolve_primary_modifier<S: AsRef<str>>(self, tokens: &[S]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| {
                let t = t.as_ref();
                if t == PRIMARY_PLACEHOLDER {
                    self.primary_token().to_string()
                } else {
                    t.to_string()
                }
            })
            .collect()
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_apple() {
        let resolved = Platform::Apple.resolve_primary_modifier(&["mod", "shift", "k"]);
        assert_eq!(resolved, vec!["meta", "shift", "k"]);
    }

    #[test]
    fn test_resolve_other() {
        let resolved = Platform::Other.resolve_primary_modifier(&["mod", "k"]);
        assert_eq!(resolved, vec!["ctrl", "k"]);
    }

    #[test]
    fn test_resolve_leaves_plain_tokens() {
        let resolved = Platform::Other.resolve_primary_modifier(&["g", "d"]);
        assert_eq!(resolved, vec!["g", "d"]);
    }

    #[test]
    fn test_current_is_stable() {
        let first = Platform::current();
        for _ in 0..10 {
            assert_eq!(Platform::current(), first);
        }
        assert!(matches!(first.primary_token(), META_TOKEN | CTRL_TOKEN));
    }
}
