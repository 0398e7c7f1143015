//! Account directory and notification mailbox collaborator contracts.
//!
//! Both are external collaborators; the engine only consumes lookups and
//! posts mailbox entries. `MemoryDirectory` is the in-process reference
//! implementation used by tests and by callers wiring everything in memory.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use bcc_types::{Classifier, Glam};

use crate::error::StoreError;

/// Lookup of account records.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Classifier registration lookup; `Ok(None)` when unregistered.
    async fn classifier_by_email(&self, email: &str) -> Result<Option<Classifier>, StoreError>;

    /// GLAM lookup by name.
    async fn glam_by_name(&self, name: &str) -> Result<Option<Glam>, StoreError>;
}

/// Per-user notification mailbox.
#[async_trait]
pub trait NotificationMailbox: Send + Sync {
    /// Post a message to a registered user's mailbox.
    /// Returns the number of mailbox entries created (1 on success).
    async fn create_notification(&self, email: &str, message: &str) -> Result<usize, StoreError>;

    /// All notifications for a user, keyed by creation stamp in time order.
    async fn notifications_for(
        &self,
        email: &str,
    ) -> Result<BTreeMap<String, String>, StoreError>;

    /// Drop every notification for a user. Idempotent.
    async fn clear_notifications(&self, email: &str) -> Result<(), StoreError>;
}

#[derive(Default)]
struct DirectoryInner {
    glams: HashMap<String, Glam>,
    classifiers: HashMap<String, Classifier>,
    /// email -> (stamp -> message)
    mailboxes: HashMap<String, BTreeMap<String, String>>,
    stamp_seq: u64,
}

/// In-memory account directory and mailbox.
#[derive(Default)]
pub struct MemoryDirectory {
    inner: RwLock<DirectoryInner>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a GLAM. Idempotent by name.
    pub async fn register_glam(&self, glam: Glam) {
        let mut inner = self.inner.write().await;
        inner.glams.insert(glam.name.clone(), glam);
    }

    /// Register a classifier, registering its GLAM alongside.
    pub async fn register_classifier(&self, classifier: Classifier) {
        let mut inner = self.inner.write().await;
        inner
            .glams
            .entry(classifier.organization.clone())
            .or_insert_with(|| Glam::new(classifier.organization.clone()));
        inner
            .classifiers
            .insert(classifier.email.clone(), classifier);
    }
}

#[async_trait]
impl AccountDirectory for MemoryDirectory {
    async fn classifier_by_email(&self, email: &str) -> Result<Option<Classifier>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.classifiers.get(email).cloned())
    }

    async fn glam_by_name(&self, name: &str) -> Result<Option<Glam>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.glams.get(name).cloned())
    }
}

#[async_trait]
impl NotificationMailbox for MemoryDirectory {
    async fn create_notification(&self, email: &str, message: &str) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.classifiers.contains_key(email) {
            return Err(StoreError::InvalidNode {
                key: email.to_string(),
                reason: "no such classifier".to_string(),
            });
        }
        inner.stamp_seq += 1;
        let stamp = format!("{:020}", inner.stamp_seq);
        inner
            .mailboxes
            .entry(email.to_string())
            .or_default()
            .insert(stamp, message.to_string());
        Ok(1)
    }

    async fn notifications_for(
        &self,
        email: &str,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.mailboxes.get(email).cloned().unwrap_or_default())
    }

    async fn clear_notifications(&self, email: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.mailboxes.remove(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_classifier() -> Classifier {
        Classifier::new("user99@USNationalParks.com", &Glam::new("US National Parks Service"))
    }

    #[tokio::test]
    async fn test_register_and_lookup_classifier() {
        let dir = MemoryDirectory::new();
        dir.register_classifier(sample_classifier()).await;

        let found = dir
            .classifier_by_email("user99@USNationalParks.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.organization, "US National Parks Service");

        assert!(dir
            .classifier_by_email("userDoesNotExist@USNationalParks.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_registering_classifier_registers_glam() {
        let dir = MemoryDirectory::new();
        dir.register_classifier(sample_classifier()).await;

        let glam = dir
            .glam_by_name("US National Parks Service")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(glam.name, "US National Parks Service");
    }

    #[tokio::test]
    async fn test_notifications_in_time_order() {
        let dir = MemoryDirectory::new();
        dir.register_classifier(sample_classifier()).await;

        let email = "user99@USNationalParks.com";
        assert_eq!(dir.create_notification(email, "first").await.unwrap(), 1);
        assert_eq!(dir.create_notification(email, "second").await.unwrap(), 1);

        let mailbox = dir.notifications_for(email).await.unwrap();
        let messages: Vec<&String> = mailbox.values().collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_notification_for_unknown_user_fails() {
        let dir = MemoryDirectory::new();
        assert!(dir
            .create_notification("nobody@nowhere.org", "hello")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_mailbox_empty_and_clear() {
        let dir = MemoryDirectory::new();
        dir.register_classifier(sample_classifier()).await;
        let email = "user99@USNationalParks.com";

        assert!(dir.notifications_for(email).await.unwrap().is_empty());

        dir.create_notification(email, "ping").await.unwrap();
        dir.clear_notifications(email).await.unwrap();
        assert!(dir.notifications_for(email).await.unwrap().is_empty());

        // Clearing an empty mailbox is a no-op
        dir.clear_notifications(email).await.unwrap();
    }
}
