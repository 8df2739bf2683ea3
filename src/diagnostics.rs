use serde::Serialize;
use thiserror::Error;

/// Problems met while building a report. None of them stop the document from
/// being produced; they are returned next to it and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum Diagnostic {
    #[error("no {section} data, section omitted")]
    MissingData { section: &'static str },
    #[error("{section} failed to render: {reason}")]
    RenderSubsystemFailure { section: &'static str, reason: String },
    #[error("no player supplied")]
    InvalidInput,
}

impl Diagnostic {
    pub fn missing(section: &'static str) -> Self {
        Diagnostic::MissingData { section }
    }

    pub fn failure(section: &'static str, reason: impl ToString) -> Self {
        Diagnostic::RenderSubsystemFailure {
            section,
            reason: reason.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Diagnostic::RenderSubsystemFailure { .. })
    }
}
