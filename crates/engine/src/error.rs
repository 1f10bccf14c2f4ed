use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("relation dimension {rows} x {cols} does not fit native addressing")]
    DimensionTooLarge { rows: String, cols: String },

    #[error("relation dimensions must be at least 1 x 1")]
    EmptyDimension,
}
