/*
 * Findings
 *
 * Structured diagnostics produced by rule evaluation. A failed rule is not
 * an error: it is a successful evaluation carrying `Fail` findings.
 */

use crate::shared::models::{Base, OccurrenceId};
use serde::{Deserialize, Serialize};

/// Outcome of one finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Rule violated
    Fail,

    /// Rule satisfied
    Pass,

    /// Could not be decided
    Open,

    /// Rule does not apply (e.g. nothing to check)
    NotApplicable,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingKind::Fail => write!(f, "FAIL"),
            FindingKind::Pass => write!(f, "PASS"),
            FindingKind::Open => write!(f, "OPEN"),
            FindingKind::NotApplicable => write!(f, "NOT_APPLICABLE"),
        }
    }
}

/// What went wrong in a `Fail` finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Token has no transition from the current automaton state
    MissingTransition,

    /// Trace ended outside an accepting state
    NonAcceptingTermination,

    /// Occurrence is not followed by any required occurrence
    UnfollowedOccurrence,

    /// Occurrence is not preceded by any required occurrence
    UnprecededOccurrence,

    /// Call to a listed target with an unlisted signature
    DisallowedSignature,

    /// Call to a forbidden operation
    ForbiddenCall,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::MissingTransition => write!(f, "Missing Transition"),
            ViolationKind::NonAcceptingTermination => write!(f, "Non-Accepting Termination"),
            ViolationKind::UnfollowedOccurrence => write!(f, "Unfollowed Occurrence"),
            ViolationKind::UnprecededOccurrence => write!(f, "Unpreceded Occurrence"),
            ViolationKind::DisallowedSignature => write!(f, "Disallowed Signature"),
            ViolationKind::ForbiddenCall => write!(f, "Forbidden Call"),
        }
    }
}

/// Finding severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Error,
}

/// Identity and messages of the rule being evaluated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMetadata {
    pub name: String,

    /// Replaces the default text of `Fail` findings when non-empty
    #[serde(default)]
    pub fail_message: Option<String>,

    /// Replaces the default text of `Pass` findings when non-empty
    #[serde(default)]
    pub pass_message: Option<String>,

    #[serde(default)]
    pub severity: Severity,
}

impl RuleMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_fail_message(mut self, message: impl Into<String>) -> Self {
        self.fail_message = Some(message.into());
        self
    }

    pub fn with_pass_message(mut self, message: impl Into<String>) -> Self {
        self.pass_message = Some(message.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// User fail message, or `default` when unset or empty
    pub fn fail_text(&self, default: impl FnOnce() -> String) -> String {
        Self::pick(self.fail_message.as_deref(), default)
    }

    /// User pass message, or `default` when unset or empty
    pub fn pass_text(&self, default: impl FnOnce() -> String) -> String {
        Self::pick(self.pass_message.as_deref(), default)
    }

    fn pick(custom: Option<&str>, default: impl FnOnce() -> String) -> String {
        match custom {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => default(),
        }
    }
}

/// One diagnostic
///
/// # Example
/// ```ignore
/// let finding = Finding::fail(ViolationKind::MissingTransition, &rule, msg)
///     .at(occurrence)
///     .on_base(Base::new("c"))
///     .expecting(vec!["start".into()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,

    /// Set for `Fail` findings
    pub violation: Option<ViolationKind>,

    /// Rule name
    pub rule: String,

    /// Copied from the rule
    #[serde(default)]
    pub severity: Severity,

    pub message: String,

    /// Violating or terminating occurrence
    pub location: Option<OccurrenceId>,

    pub base: Option<Base>,

    /// Tokens that would have been valid next (sorted, may contain `END`)
    pub expected_next: Vec<String>,

    /// Other occurrences relevant to the finding
    pub related: Vec<OccurrenceId>,
}

impl Finding {
    fn new(kind: FindingKind, rule: &RuleMetadata, message: impl Into<String>) -> Self {
        Self {
            kind,
            violation: None,
            rule: rule.name.clone(),
            severity: rule.severity,
            message: message.into(),
            location: None,
            base: None,
            expected_next: Vec::new(),
            related: Vec::new(),
        }
    }

    pub fn fail(
        violation: ViolationKind,
        rule: &RuleMetadata,
        message: impl Into<String>,
    ) -> Self {
        let mut finding = Self::new(FindingKind::Fail, rule, message);
        finding.violation = Some(violation);
        finding
    }

    pub fn pass(rule: &RuleMetadata, message: impl Into<String>) -> Self {
        Self::new(FindingKind::Pass, rule, message)
    }

    pub fn not_applicable(rule: &RuleMetadata, message: impl Into<String>) -> Self {
        Self::new(FindingKind::NotApplicable, rule, message)
    }

    pub fn at(mut self, location: OccurrenceId) -> Self {
        self.location = Some(location);
        self
    }

    pub fn on_base(mut self, base: Base) -> Self {
        self.base = Some(base);
        self
    }

    pub fn expecting(mut self, expected_next: Vec<String>) -> Self {
        self.expected_next = expected_next;
        self
    }

    pub fn with_related(mut self, related: Vec<OccurrenceId>) -> Self {
        self.related = related;
        self
    }

    pub fn is_failure(&self) -> bool {
        self.kind == FindingKind::Fail
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.rule, self.message)?;
        if let Some(location) = self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_finding_builder() {
        let rule = RuleMetadata::new("CipherOrder").with_severity(Severity::Error);
        let finding = Finding::fail(ViolationKind::MissingTransition, &rule, "bad")
            .at(OccurrenceId(3))
            .on_base(Base::new("c"))
            .expecting(vec!["start".to_string()])
            .with_related(vec![OccurrenceId(1)]);

        assert!(finding.is_failure());
        assert_eq!(finding.violation, Some(ViolationKind::MissingTransition));
        assert_eq!(finding.severity, Severity::Error);
        assert_eq!(finding.to_string(), "[FAIL] CipherOrder: bad (occ#3)");
    }

    #[test]
    fn test_pass_finding_has_no_violation() {
        let finding = Finding::pass(&RuleMetadata::new("CipherOrder"), "ok");
        assert!(!finding.is_failure());
        assert_eq!(finding.violation, None);
        assert_eq!(finding.severity, Severity::Warning);
        assert_eq!(finding.to_string(), "[PASS] CipherOrder: ok");
    }

    #[test]
    fn test_custom_messages_override_defaults() {
        let rule = RuleMetadata::new("r").with_fail_message("custom fail");
        assert_eq!(rule.fail_text(|| "default".into()), "custom fail");
        assert_eq!(rule.pass_text(|| "default".into()), "default");

        let empty = RuleMetadata::new("r").with_pass_message("");
        assert_eq!(empty.pass_text(|| "default".into()), "default");
    }

    #[test]
    fn test_violation_kind_display() {
        assert_eq!(ViolationKind::MissingTransition.to_string(), "Missing Transition");
        assert_eq!(
            ViolationKind::NonAcceptingTermination.to_string(),
            "Non-Accepting Termination"
        );
    }
}
