#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("invalid number format: {0}")]
    InvalidFormat(String),
    #[error("arithmetic overflow: result needs {0} bits, limit is {1}")]
    Overflow(u64, u64),
    #[error("division by zero")]
    DivisionByZero,
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
