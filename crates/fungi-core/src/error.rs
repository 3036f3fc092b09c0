use std::io;

use fungi_domain::{EntityId, EntityKind};
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: EntityId },
    #[error("Cannot delete {kind} {id}: still used by {references} item(s)")]
    ReferentialIntegrity {
        kind: EntityKind,
        id: EntityId,
        references: usize,
    },
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<io::Error> for CoreError {
    fn from(err: io::Error) -> Self {
        CoreError::Persistence(err.to_string())
    }
}
