//! Error types for duedate-engine boundary operations.
//!
//! Extraction itself never fails; these cover parsing caller-supplied
//! timestamps and validating task input.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DueDateError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Empty task: please enter a task")]
    EmptyTask,
}

pub type Result<T> = std::result::Result<T, DueDateError>;
