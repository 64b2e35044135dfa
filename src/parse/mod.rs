use std::fmt;

mod tokenizer;

pub use tokenizer::{is_delimiter, tokenize, DELIMITERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    Allocation,
}

impl From<std::collections::TryReserveError> for TokenizeError {
    fn from(_: std::collections::TryReserveError) -> Self {
        TokenizeError::Allocation
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::Allocation => write!(f, "allocation error"),
        }
    }
}

impl std::error::Error for TokenizeError {}
