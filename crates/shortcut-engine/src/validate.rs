//! Preset validation.

use crate::binding::{Binding, MalformedBinding};
use crate::catalog::{self, ActionId};
use crate::platform::Platform;
use crate::preset::Preset;
use std::collections::BTreeSet;
use std::fmt;

/// Severity of a preset issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Works, but probably not as intended
    Warning,
    /// The preset cannot be used as configured
    Error,
}

/// A problem found in a preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Binding for an action the catalog does not define
    UnknownAction(ActionId),
    /// Binding that violates the combination/sequence shape
    Malformed(ActionId, MalformedBinding),
    /// Two actions resolve to the same keys
    Duplicate {
        binding: Binding,
        first: ActionId,
        second: ActionId,
    },
    /// A plain single-key combination equal to the first step of a sequence;
    /// combinations win, so the sequence can never start.
    ShadowedSequence {
        key: String,
        single: ActionId,
        sequence: ActionId,
    },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::ShadowedSequence { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction(action) => write!(f, "action '{}' is not in the catalog", action),
            Self::Malformed(action, err) => write!(f, "binding for '{}' is malformed: {}", action, err),
            Self::Duplicate {
                binding,
                first,
                second,
            } => write!(f, "'{}' is bound to both '{}' and '{}'", binding, first, second),
            Self::ShadowedSequence {
                key,
                single,
                sequence,
            } => write!(
                f,
                "single key '{}' ('{}') shadows the sequence bound to '{}'",
                key, single, sequence
            ),
        }
    }
}

/// Report of all issues found in one preset.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub preset: String,
    pub issues: Vec<IssueKind>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity() == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &IssueKind> {
        self.issues.iter().filter(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &IssueKind> {
        self.issues.iter().filter(|i| i.severity() == Severity::Warning)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return write!(f, "preset '{}': no issues", self.preset);
        }

        for issue in &self.issues {
            let severity = match issue.severity() {
                Severity::Error => "ERROR",
                Severity::Warning => "WARNING",
            };
            writeln!(f, "[{}] preset '{}': {}", severity, self.preset, issue)?;
        }

        Ok(())
    }
}

/// Comparable shape of a resolved binding.
#[derive(PartialEq, Eq)]
enum Shape {
    Combo(BTreeSet<String>),
    Sequence(Vec<String>),
}

/// Check a preset against the catalog and for key collisions on `platform`.
pub fn validate_preset(preset: &Preset, platform: Platform) -> ValidationReport {
    let mut report = ValidationReport {
        preset: preset.id.clone(),
        issues: Vec::new(),
    };

    let mut usable: Vec<(&ActionId, &Binding, Shape)> = Vec::new();
    for (action, binding) in &preset.bindings {
        if !catalog::is_known(action.as_str()) {
            report.issues.push(IssueKind::UnknownAction(action.clone()));
            continue;
        }
        if let Err(err) = binding.check() {
            report.issues.push(IssueKind::Malformed(action.clone(), err));
            continue;
        }

        let keys = platform.resolve_primary_modifier(&binding.keys);
        let shape = if binding.is_sequence {
            Shape::Sequence(keys)
        } else {
            Shape::Combo(keys.into_iter().collect())
        };
        usable.push((action, binding, shape));
    }

    for (i, (first, binding, shape)) in usable.iter().enumerate() {
        for (second, _, other) in &usable[i + 1..] {
            if shape == other {
                report.issues.push(IssueKind::Duplicate {
                    binding: (*binding).clone(),
                    first: (*first).clone(),
                    second: (*second).clone(),
                });
            }
        }
    }

    for (single, binding, _) in &usable {
        if !binding.is_single_key() {
            continue;
        }
        let key = &binding.keys[0];
        for (sequence, other, _) in &usable {
            if other.is_sequence && other.keys.first() == Some(key) {
                report.issues.push(IssueKind::ShadowedSequence {
                    key: key.clone(),
                    single: (*single).clone(),
                    sequence: (*sequence).clone(),
                });
            }
        }
    }

    report
}
