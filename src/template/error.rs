//! Template preparation and rendering errors.

/// Errors from preparing or rendering a template.
///
/// Syntax and unknown-placeholder errors are raised by `prepare`, so a
/// template that prepared successfully can only fail at render time on
/// its runtime parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("template syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("unknown placeholder '{keyword}' at byte {offset}")]
    UnknownPlaceholder { keyword: String, offset: usize },

    #[error("missing required parameter '{name}'")]
    MissingParameter { name: String },

    #[error("invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl TemplateError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        TemplateError::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        TemplateError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type TemplateResult<T> = Result<T, TemplateError>;
