use thiserror::Error;

use crate::shape::ShapeType;

/// Errors produced while decoding a geometry payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty geometry payload for {0}")]
    Empty(ShapeType),

    #[error("malformed point {0:?}, expected \"x,y\"")]
    MalformedPoint(String),

    #[error("invalid integer {0:?}")]
    InvalidNumber(String),

    #[error("{shape_type} needs {expected} points, found {found}")]
    WrongPointCount {
        shape_type: ShapeType,
        expected: &'static str,
        found: usize,
    },

    #[error("negative size {width}x{height}")]
    NegativeSize { width: i32, height: i32 },

    #[error("box at ({x}, {y}) sized {width}x{height} extends past the coordinate range")]
    Overflow {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Errors that can occur while reading or writing the shape store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize journal entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt journal at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by the inbound canvas operations
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A gesture completed while a restore was replaying and the policy blocks it
    #[error("a restore replay is in progress")]
    ReplayInProgress,
}

pub type ParseResult<T> = Result<T, ParseError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type CanvasResult<T> = Result<T, CanvasError>;
