//! Translation errors.

/// Errors from lowering an expression tree to SQL.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error("float constant {0} has no SQL literal")]
    NonFiniteFloat(f64),

    #[error("member refers to source {index} but only {available} source(s) are in scope")]
    UnknownSource { index: usize, available: usize },

    #[error("invalid argument to {method}: {reason}")]
    InvalidArgument {
        method: &'static str,
        reason: String,
    },

    #[error("unsupported expression: {0}")]
    Unsupported(String),

    #[error("group key used outside of a grouped query")]
    GroupKeyOutsideGrouping,

    #[error("group key has no field '{0}'")]
    UnknownGroupKeyField(String),
}

pub type TranslateResult<T> = Result<T, TranslateError>;
