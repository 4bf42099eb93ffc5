//! Occurrence models
//!
//! An occurrence is one located call found in the analyzed program. Order
//! traces, relation checks and findings refer to occurrences by
//! [`OccurrenceId`] only; the records themselves live in an
//! [`OccurrenceArena`](super::OccurrenceArena).

use super::span::Span;
use serde::{Deserialize, Serialize};

/// Index of an occurrence inside its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccurrenceId(pub u32);

impl OccurrenceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "occ#{}", self.0)
    }
}

/// Receiver instance an order is checked against (e.g. one `Cipher` object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Base(pub String);

impl Base {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Argument passed at a call site, as far as the backend could determine it
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    /// Constant value, if known
    pub value: Option<String>,

    /// Static type, if known
    pub type_name: Option<String>,
}

impl Argument {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            type_name: None,
        }
    }

    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            value: None,
            type_name: Some(type_name.into()),
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

/// A located call in the analyzed program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Fully qualified call target
    pub target: String,

    /// Source text of the call (used in messages)
    pub code: String,

    /// File the call appears in
    pub file_path: String,

    /// Source location
    pub span: Span,

    /// Receiver instance, if the call has one
    pub base: Option<Base>,

    /// Execution order of this call relative to other calls on the same base
    pub position: u32,

    /// Call arguments
    pub arguments: Vec<Argument>,
}

impl Occurrence {
    /// Create an occurrence with no location, base or arguments
    pub fn new(target: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            code: code.into(),
            file_path: String::new(),
            span: Span::zero(),
            base: None,
            position: 0,
            arguments: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: Base) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    pub fn with_location(mut self, file_path: impl Into<String>, span: Span) -> Self {
        self.file_path = file_path.into();
        self.span = span;
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// `file:line:col` for messages
    pub fn location_label(&self) -> String {
        if self.file_path.is_empty() {
            self.span.to_string()
        } else {
            format!("{}:{}", self.file_path, self.span)
        }
    }
}
