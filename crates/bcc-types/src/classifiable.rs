//! Classifiable items: the taggable records of a GLAM collection.
//!
//! A classifiable's id is derived from its owner's organization and its own
//! name (`"{organization}_{name}"`) and must be unique within the store.
//! `modified_seq` is a catalog-assigned monotonic counter; it is the
//! ordering key for the recency feed (`modified_at` is informational).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::Classifier;
use crate::concept::ConceptString;

/// Classification progress of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Unclassified,
    Classified,
    /// Started but not finished; does not appear in either feed.
    Pending,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Unclassified => write!(f, "unclassified"),
            Status::Classified => write!(f, "classified"),
            Status::Pending => write!(f, "pending"),
        }
    }
}

/// Visibility of an item to other members of the owner's organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Visible to all members of the owner's GLAM
    #[default]
    Glam,
    /// Visible only to the owner
    OwnerOnly,
}

/// A taggable collection item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifiable {
    /// Derived identity: `"{organization}_{name}"`, unique store-wide
    pub id: String,

    pub name: String,

    pub url: String,

    pub status: Status,

    pub perm: Permission,

    /// Owning classifier; preserved across updates
    pub owner: Classifier,

    /// Ordered description, possibly empty
    #[serde(default)]
    pub concept_str: ConceptString,

    /// When this record was last written
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub modified_at: DateTime<Utc>,

    /// Monotonic write counter; recency feed ordering key
    #[serde(default)]
    pub modified_seq: u64,
}

impl Classifiable {
    /// Create a record with the id derived from the owner's organization.
    pub fn new(name: impl Into<String>, url: impl Into<String>, owner: Classifier) -> Self {
        let name = name.into();
        Self {
            id: Self::derive_id(&owner.organization, &name),
            name,
            url: url.into(),
            status: Status::default(),
            perm: Permission::default(),
            owner,
            concept_str: ConceptString::empty(),
            modified_at: Utc::now(),
            modified_seq: 0,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_perm(mut self, perm: Permission) -> Self {
        self.perm = perm;
        self
    }

    pub fn with_concept_str(mut self, concept_str: ConceptString) -> Self {
        self.concept_str = concept_str;
        self
    }

    /// The derived identity for an item named `name` in `organization`.
    pub fn derive_id(organization: &str, name: &str) -> String {
        format!("{}_{}", organization, name)
    }

    /// Serialize to JSON bytes (graph node property form).
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
