use std::fmt;

/// Convenience result type used across flowreel.
pub type FlowResult<T> = Result<T, FlowError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    /// The diagram spec is malformed. Carries every issue found, not just the first.
    #[error("validation error: {0}")]
    Validation(ValidationErrors),

    /// Invalid export, playback or threading parameters.
    #[error("config error: {0}")]
    Config(String),

    /// Failures while projecting or delivering export frames.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowError {
    /// Build a [`FlowError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FlowError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`FlowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Validation issues carried by this error, if it is a validation failure.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation(errs) => &errs.issues,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

/// What is wrong at a given location of a diagram spec.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// A required field is absent.
    MissingField {
        /// Name of the absent field.
        field: String,
    },
    /// An edge endpoint names a node id that does not exist.
    DanglingReference {
        /// The unresolved node id.
        id: String,
    },
    /// Two nodes declare the same id.
    DuplicateNodeId {
        /// The repeated id.
        id: String,
    },
}

/// One validation failure, located by a JSON-path-like string (`$.edges[2].to`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ValidationIssue {
    /// Location of the offending value.
    pub path: String,
    /// Failure category.
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub(crate) fn missing(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: IssueKind::MissingField {
                field: field.into(),
            },
        }
    }

    pub(crate) fn dangling(path: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: IssueKind::DanglingReference { id: id.into() },
        }
    }

    pub(crate) fn duplicate(path: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: IssueKind::DuplicateNodeId { id: id.into() },
        }
    }

    /// Name of the missing field, when this is a [`IssueKind::MissingField`] issue.
    pub fn missing_field(&self) -> Option<&str> {
        match &self.kind {
            IssueKind::MissingField { field } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::MissingField { field } => {
                write!(f, "{}: missing required field '{field}'", self.path)
            }
            IssueKind::DanglingReference { id } => {
                write!(f, "{}: references non-existent node id '{id}'", self.path)
            }
            IssueKind::DuplicateNodeId { id } => {
                write!(f, "{}: duplicate node id '{id}'", self.path)
            }
        }
    }
}

/// All validation issues found in one pass over a spec.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ValidationErrors {
    /// Issues in discovery order.
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
