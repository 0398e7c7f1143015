//! Error types for the taxonomy and classification engine.
//!
//! Absence on a read path is always a value (`Ok(None)` or an empty
//! collection), never an error. The variants here cover the remaining
//! taxonomy: caller input violating an invariant, references to entities
//! that must pre-exist, and collaborator failures.

use thiserror::Error;

/// Unified error type for engine operations.
#[derive(Debug, Error)]
pub enum BccError {
    /// A required entity was not found (e.g. the root term before
    /// the store has been initialized)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A term insert or rename collides on the case-folded uniqueness key
    #[error("A term with lower form '{0}' already exists")]
    DuplicateTerm(String),

    /// A move would make a term its own ancestor
    #[error("Moving term '{term}' under '{new_parent}' would create a cycle")]
    CycleDetected { term: String, new_parent: String },

    /// Safe delete attempted on a term that still has children
    #[error("Term '{0}' has children; only a forced cascade can delete it")]
    NonLeafDelete(String),

    /// Rename or delete attempted on the fixed root term
    #[error("The root term cannot be renamed or deleted")]
    RootImmutable,

    /// A classifiable create/update collides on the derived id
    #[error("A classifiable with id '{0}' already exists")]
    IdCollision(String),

    /// Alphabet-group lookup with a non-alphabetic character
    #[error("'{0}' is not a letter of the alphabet")]
    NotALetter(char),

    /// A description references a term absent from the vocabulary
    #[error("Description term '{0}' does not exist in the vocabulary")]
    UnknownTerm(String),

    /// Text that is not the canonical `(a)(b)` rendering of a description
    #[error("Invalid concept string: '{0}'")]
    InvalidConceptString(String),

    /// An operation references an entity that must pre-exist but does not
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// The acting classifier is not permitted to perform the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// External store failure; transient, surfaced to the caller
    #[error("Store unavailable: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BccError {
    /// Whether the error reports caller input violating an invariant
    /// (never retried, as opposed to transient store failures).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BccError::DuplicateTerm(_)
                | BccError::CycleDetected { .. }
                | BccError::NonLeafDelete(_)
                | BccError::RootImmutable
                | BccError::IdCollision(_)
                | BccError::NotALetter(_)
                | BccError::UnknownTerm(_)
                | BccError::InvalidConceptString(_)
        )
    }
}
