//! Persistence for the student roster.
//!
//! A [`KeyValueStore`] holds serialized values under string keys; the
//! [`StudentRepository`] keeps the whole roster as one JSON array under a
//! single key and is the only way to change it.

pub mod repository;
pub mod store;

pub use repository::StudentRepository;
pub use store::{FileStore, KeyValueStore};

use crate::models::StudentId;
use crate::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by stores and the repository.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("data stored under '{key}' is not a valid student list: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize students: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no student with id '{0}'")]
    NotFound(StudentId),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub type StorageResult<T> = Result<T, StorageError>;
