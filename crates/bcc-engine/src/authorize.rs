//! Edit authorization capability.
//!
//! Update authorization is an extension point, not a fixed policy: the
//! catalog consults an [`Authorizer`] at the call boundary so the policy
//! can be tightened without touching catalog logic. The default,
//! [`AllowAll`], accepts any registered acting classifier.

use bcc_types::{Classifiable, Classifier};

/// Decides whether an acting classifier may edit a classifiable.
pub trait Authorizer: Send + Sync {
    fn can_edit(&self, acting: &Classifier, target: &Classifiable) -> bool;
}

/// Any registered classifier may edit any classifiable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn can_edit(&self, _acting: &Classifier, _target: &Classifiable) -> bool {
        true
    }
}

/// Only the owner, or a member of the owner's GLAM, may edit.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOrSameGlam;

impl Authorizer for OwnerOrSameGlam {
    fn can_edit(&self, acting: &Classifier, target: &Classifiable) -> bool {
        acting.email == target.owner.email || acting.organization == target.owner.organization
    }
}
