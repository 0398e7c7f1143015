//! Classifiable catalog and permissioned feeds.
//!
//! The catalog enforces the identity invariants on classifiable writes
//! (derived ids, registered owners, vocabulary-backed descriptions) and
//! builds the two retrieval feeds: recently-classified and
//! all-unclassified. Feeds are computed on every read; a permission change
//! is visible on the very next call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use bcc_graph::{AccountDirectory, GraphStore, TermGraph};
use bcc_types::{BccError, Classifiable, Classifier, ConceptString, Permission, Status, Term};

use crate::authorize::{AllowAll, Authorizer};
use crate::matcher::match_by_description;

/// Default cap on feed length; overridable via [`ClassifiableCatalog::with_feed_limit`].
pub const DEFAULT_FEED_LIMIT: usize = 100;

/// Classifiable writes and feed reads over a graph store and an account
/// directory.
pub struct ClassifiableCatalog<S: GraphStore + ?Sized, D: AccountDirectory + ?Sized> {
    graph: TermGraph<S>,
    directory: Arc<D>,
    authorizer: Arc<dyn Authorizer>,
    feed_limit: usize,
    /// Monotonic write counter; stamps `modified_seq` on every write
    write_seq: AtomicU64,
}

impl<S: GraphStore + ?Sized, D: AccountDirectory + ?Sized> ClassifiableCatalog<S, D> {
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self {
            graph: TermGraph::new(store),
            directory,
            authorizer: Arc::new(AllowAll),
            feed_limit: DEFAULT_FEED_LIMIT,
            write_seq: AtomicU64::new(0),
        }
    }

    /// Replace the update-authorization policy.
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Cap feed length (see `Settings::feed_limit`).
    pub fn with_feed_limit(mut self, feed_limit: usize) -> Self {
        self.feed_limit = feed_limit;
        self
    }

    /// Next value of the recency ordering key.
    ///
    /// The counter is seeded from the highest `modified_seq` already in
    /// the store, so a catalog constructed over a populated store
    /// continues the sequence instead of restarting below existing
    /// records. The store holds the durable state; the atomic is only a
    /// cache of its high-water mark.
    async fn next_seq(&self) -> Result<u64, BccError> {
        if self.write_seq.load(Ordering::SeqCst) == 0 {
            let stored_max = self
                .graph
                .all_classifiables()
                .await?
                .iter()
                .map(|i| i.modified_seq)
                .max()
                .unwrap_or(0);
            self.write_seq.fetch_max(stored_max, Ordering::SeqCst);
        }
        Ok(self.write_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Swap every description term for its canonical vocabulary record,
    /// matched by `lower`. A term outside the vocabulary is a validation
    /// failure.
    async fn resolve_description(
        &self,
        desc: &ConceptString,
    ) -> Result<ConceptString, BccError> {
        let mut resolved: Vec<Term> = Vec::with_capacity(desc.len());
        for term in &desc.terms {
            match self.graph.term_by_lower(&term.lower).await? {
                Some(canonical) => resolved.push(canonical),
                None => return Err(BccError::UnknownTerm(term.raw_term.clone())),
            }
        }
        Ok(ConceptString::new(resolved))
    }

    /// Store a new classifiable.
    ///
    /// The owner must be registered in the account directory; the stored
    /// owner is the directory's record, not the caller's copy. Every
    /// description term must exist in the vocabulary. The id is derived
    /// from the owner's organization and the item name and must be free.
    pub async fn add_classifiable(&self, item: Classifiable) -> Result<Classifiable, BccError> {
        let owner = self
            .directory
            .classifier_by_email(&item.owner.email)
            .await?
            .ok_or_else(|| {
                BccError::MissingReference(format!("classifier '{}'", item.owner.email))
            })?;

        let concept_str = self.resolve_description(&item.concept_str).await?;

        let id = Classifiable::derive_id(&owner.organization, &item.name);
        if self.graph.get_classifiable(&id).await?.is_some() {
            return Err(BccError::IdCollision(id));
        }

        let stored = Classifiable {
            id: id.clone(),
            name: item.name,
            url: item.url,
            status: item.status,
            perm: item.perm,
            owner,
            concept_str,
            modified_at: Utc::now(),
            modified_seq: self.next_seq().await?,
        };
        self.graph.put_classifiable(&stored).await?;
        self.graph.set_references(&id, &stored.concept_str).await?;
        debug!(id = %id, "added classifiable");
        Ok(stored)
    }

    /// Rewrite an existing classifiable with the proposed fields.
    ///
    /// The acting classifier must pass the authorizer. Ownership never
    /// changes; the id is re-derived from the proposed name and the
    /// existing owner's organization, and a collision with a different
    /// record fails leaving both records untouched.
    pub async fn update_classifiable(
        &self,
        existing_id: &str,
        proposed: Classifiable,
        acting: &Classifier,
    ) -> Result<Classifiable, BccError> {
        let existing = self
            .graph
            .get_classifiable(existing_id)
            .await?
            .ok_or_else(|| {
                BccError::MissingReference(format!("classifiable '{}'", existing_id))
            })?;

        if !self.authorizer.can_edit(acting, &existing) {
            return Err(BccError::Unauthorized(acting.email.clone()));
        }

        let concept_str = self.resolve_description(&proposed.concept_str).await?;

        let new_id = Classifiable::derive_id(&existing.owner.organization, &proposed.name);
        if new_id != existing_id && self.graph.get_classifiable(&new_id).await?.is_some() {
            return Err(BccError::IdCollision(new_id));
        }

        let updated = Classifiable {
            id: new_id.clone(),
            name: proposed.name,
            url: proposed.url,
            status: proposed.status,
            perm: proposed.perm,
            owner: existing.owner,
            concept_str,
            modified_at: Utc::now(),
            modified_seq: self.next_seq().await?,
        };

        if new_id != existing_id {
            self.graph.delete_classifiable(existing_id).await?;
        }
        self.graph.put_classifiable(&updated).await?;
        self.graph.set_references(&new_id, &updated.concept_str).await?;
        debug!(id = %new_id, previous = %existing_id, "updated classifiable");
        Ok(updated)
    }

    /// Remove a classifiable and its reference edges. Removing an absent
    /// id is a successful no-op; the return value reports whether anything
    /// was there.
    pub async fn delete_classifiable(&self, id: &str) -> Result<bool, BccError> {
        let existed = self.graph.delete_classifiable(id).await?;
        if existed {
            debug!(id = %id, "deleted classifiable");
        }
        Ok(existed)
    }

    pub async fn get_classifiable_by_id(&self, id: &str) -> Result<Option<Classifiable>, BccError> {
        Ok(self.graph.get_classifiable(id).await?)
    }

    /// Exact-name lookup. Names are only unique per organization, so this
    /// may return several records.
    pub async fn get_classifiables_by_name(
        &self,
        name: &str,
    ) -> Result<Vec<Classifiable>, BccError> {
        let mut items = self.graph.all_classifiables().await?;
        items.retain(|i| i.name == name);
        Ok(items)
    }

    /// Every classifiable owned by the given classifier.
    pub async fn classifiables_of(
        &self,
        owner_email: &str,
    ) -> Result<Vec<Classifiable>, BccError> {
        let mut items = self.graph.all_classifiables().await?;
        items.retain(|i| i.owner.email == owner_email);
        Ok(items)
    }

    /// Items whose name starts with `letter`, case-insensitively. Fails
    /// for a non-alphabetic character.
    pub async fn get_classifiables_by_alpha_group(
        &self,
        letter: char,
    ) -> Result<Vec<Classifiable>, BccError> {
        if !letter.is_alphabetic() {
            return Err(BccError::NotALetter(letter));
        }
        let want: String = letter.to_lowercase().collect();
        let mut items = self.graph.all_classifiables().await?;
        items.retain(|i| {
            i.name
                .chars()
                .next()
                .map(|c| c.to_lowercase().collect::<String>() == want)
                .unwrap_or(false)
        });
        Ok(items)
    }

    /// The owner's classified items, most recently written first. Updating
    /// an item promotes it to the front.
    pub async fn get_recently_classified(
        &self,
        owner_email: &str,
    ) -> Result<Vec<Classifiable>, BccError> {
        let mut items = self.graph.all_classifiables().await?;
        items.retain(|i| i.owner.email == owner_email && i.status == Status::Classified);
        items.sort_by(|a, b| b.modified_seq.cmp(&a.modified_seq));
        items.truncate(self.feed_limit);
        Ok(items)
    }

    /// Unclassified items visible to the requester: all of their own plus
    /// GLAM-visible items of colleagues in the same organization. An
    /// unregistered requester sees an empty feed.
    pub async fn get_all_unclassified(
        &self,
        requester_email: &str,
    ) -> Result<Vec<Classifiable>, BccError> {
        let requester = match self.directory.classifier_by_email(requester_email).await? {
            Some(requester) => requester,
            None => return Ok(Vec::new()),
        };

        let mut items = self.graph.all_classifiables().await?;
        items.retain(|i| {
            i.status == Status::Unclassified
                && (i.owner.email == requester.email
                    || (i.owner.organization == requester.organization
                        && i.perm == Permission::Glam))
        });
        items.sort_by(|a, b| b.modified_seq.cmp(&a.modified_seq));
        items.truncate(self.feed_limit);
        Ok(items)
    }

    /// Rank the whole catalog against a query description.
    pub async fn match_classifiables(
        &self,
        query: &ConceptString,
        ordered: bool,
    ) -> Result<Vec<Classifiable>, BccError> {
        let items = self.graph.all_classifiables().await?;
        Ok(match_by_description(items, query, ordered))
    }
}
