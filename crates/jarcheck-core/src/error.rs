use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no jar file is currently set for testing")]
    NoActiveTest,
    #[error("test index {index} is out of range (registry holds {len} records)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no pending tests found; all tests are complete")]
    NoPendingTests,
    #[error("registry is empty; load jars first")]
    Empty,
    #[error("duplicate artifact in snapshot: {0}")]
    DuplicateArtifact(String),
}
