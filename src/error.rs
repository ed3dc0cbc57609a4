use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("node not found: {0}")]
    NodeNotFound(String),
    #[error("edge not found: #{0}")]
    EdgeNotFound(usize),
    #[error("node {code} is not a {expected}")]
    WrongKind { code: String, expected: &'static str },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Reason an insertion was skipped without touching the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    DuplicateCode,
    UnknownEndpoint,
    SelfLoop,
}
