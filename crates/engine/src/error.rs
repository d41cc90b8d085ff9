use crate::value::DataType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: DataType,
        found: DataType,
    },
    #[error("missing key: {0}")]
    MissingKey(String),
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("expression error: {0}")]
    Expression(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
