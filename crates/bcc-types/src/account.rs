//! Account records for the external account collaborator.
//!
//! GLAMs (galleries, libraries, archives, museums) own a namespace of
//! classifiables; classifiers are user accounts belonging to exactly one
//! GLAM. The engine only reads these records; managing them is out of scope.

use serde::{Deserialize, Serialize};

/// An organization owning a namespace of classifiables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glam {
    pub name: String,
}

impl Glam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A user account belonging to exactly one GLAM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classifier {
    /// Lookup key in the account directory
    pub email: String,

    /// Name of the owning GLAM
    pub organization: String,
}

impl Classifier {
    pub fn new(email: impl Into<String>, glam: &Glam) -> Self {
        Self {
            email: email.into(),
            organization: glam.name.clone(),
        }
    }

    pub fn organization_name(&self) -> &str {
        &self.organization
    }
}
