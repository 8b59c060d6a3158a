//! Minimalistic, type-safe tag registry.
//!
//! Design goals:
//! - Declaration sites get their tags attached exactly once (definition time).
//! - Consumers detect attachments, enumerate tokens in declared order and
//!   run wildcard-aware lookups without knowing who declared what.
//! - The registry stores metadata only, never candidate instances.
//!
//! Typical flows:
//! - At process start, [`TagRegistry::bootstrap`] collects every
//!   [`StaticTagDecl`] submitted at definition sites (usually through the
//!   `#[tagged(...)]` attribute) into a fresh registry.
//! - Consumers hold the registry and answer "which candidates carry these
//!   tags" via [`TagRegistry::matching`] or [`TagRegistry::resolve_unique`].
//! - In tests, build an empty registry and [`attach`](TagRegistry::attach)
//!   hand-made sites to drive lookup scenarios.
//!
//! Implementation details:
//! - Key = [`DeclarationSite`]; value = the attached [`TagSet`].
//! - Sync hot path: lookups are non-async behind a `parking_lot` read lock.
//!
//! Notes:
//! - Attachments are immutable: a second `attach` on the same site is an
//!   error and leaves the first attachment untouched.
//! - Explicit removal and `clear` are intended mainly for tests and one-off
//!   reconfiguration flows.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::site::DeclarationSite;
use crate::tag::TagSet;

#[derive(Debug, thiserror::Error)]
pub enum TagRegistryError {
    #[error("tags already attached: site={site:?}")]
    AlreadyAttached { site: DeclarationSite },

    #[error("no tags attached: site={site:?}")]
    NotAttached { site: DeclarationSite },
}

/// Outcome of an exactly-one lookup.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no attachment matches: required={required:?}")]
    NoMatch { required: TagSet },

    #[error("ambiguous match: required={required:?}, candidates={candidates:?}")]
    Ambiguous {
        required: TagSet,
        candidates: Vec<DeclarationSite>,
    },
}

/// Internal map type for the registry.
type AttachmentMap = HashMap<DeclarationSite, TagSet>;

/// Side table of tag attachments keyed by declaration identity.
pub struct TagRegistry {
    map: RwLock<AttachmentMap>,
}

impl TagRegistry {
    #[inline]
    pub fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    /// Build a registry from every [`StaticTagDecl`] linked into the
    /// program.
    ///
    /// # Errors
    /// Returns [`TagRegistryError::AlreadyAttached`] if two declarations
    /// name the same site.
    pub fn bootstrap() -> Result<Self, TagRegistryError> {
        let registry = Self::new();
        for decl in inventory::iter::<StaticTagDecl> {
            registry.attach(decl.site(), decl.tags())?;
        }
        tracing::debug!(attachments = registry.len(), "tag registry bootstrapped");
        Ok(registry)
    }

    /// Attach `tags` to `site`.
    ///
    /// # Errors
    /// Returns [`TagRegistryError::AlreadyAttached`] if the site already has
    /// an attachment; the existing attachment is left untouched.
    pub fn attach(&self, site: DeclarationSite, tags: TagSet) -> Result<(), TagRegistryError> {
        let mut w = self.map.write();
        if w.contains_key(&site) {
            return Err(TagRegistryError::AlreadyAttached { site });
        }
        tracing::debug!(site = ?site, tags = ?tags, "tag attachment registered");
        w.insert(site, tags);
        Ok(())
    }

    /// Presence check: was anything attached to `site`?
    pub fn is_tagged(&self, site: &DeclarationSite) -> bool {
        self.map.read().contains_key(site)
    }

    /// Read back the attachment of `site`, tokens in declared order.
    ///
    /// # Errors
    /// Returns [`TagRegistryError::NotAttached`] for sites without an
    /// attachment.
    pub fn tags_of(&self, site: &DeclarationSite) -> Result<TagSet, TagRegistryError> {
        self.map
            .read()
            .get(site)
            .cloned()
            .ok_or_else(|| TagRegistryError::NotAttached { site: site.clone() })
    }

    /// All attachments satisfying `required`, in deterministic site order.
    ///
    /// Matching is symmetric: a wildcard on either side wins, so an
    /// attachment declared with the `Any` sentinel answers every lookup,
    /// including lookups that pass no classifier at all.
    pub fn matching(&self, required: &TagSet) -> Vec<(DeclarationSite, TagSet)> {
        let r = self.map.read();
        let mut hits: Vec<(DeclarationSite, TagSet)> = r
            .iter()
            .filter(|(_, tags)| required.matches_symmetric(tags))
            .map(|(site, tags)| (site.clone(), tags.clone()))
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0));
        tracing::debug!(required = ?required, hits = hits.len(), "tag lookup");
        hits
    }

    /// Exactly-one lookup over [`matching`](TagRegistry::matching).
    ///
    /// # Errors
    /// [`ResolveError::NoMatch`] when nothing satisfies `required`,
    /// [`ResolveError::Ambiguous`] when more than one attachment does.
    pub fn resolve_unique(&self, required: &TagSet) -> Result<DeclarationSite, ResolveError> {
        let mut hits = self.matching(required);
        match hits.len() {
            0 => Err(ResolveError::NoMatch {
                required: required.clone(),
            }),
            1 => Ok(hits.remove(0).0),
            _ => Err(ResolveError::Ambiguous {
                required: required.clone(),
                candidates: hits.into_iter().map(|(site, _)| site).collect(),
            }),
        }
    }

    /// Remove an attachment; returns it if the site was tagged.
    pub fn detach(&self, site: &DeclarationSite) -> Option<TagSet> {
        self.map.write().remove(site)
    }

    /// Clear everything (useful in tests).
    pub fn clear(&self) {
        self.map.write().clear();
    }

    /// Introspection: total attachments.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Definition-time tag declaration, collected at startup.
///
/// Submitted through `inventory`, normally by the `#[tagged(...)]`
/// attribute. Carries constructors rather than values so submissions stay
/// const-evaluable.
pub struct StaticTagDecl {
    site: fn() -> DeclarationSite,
    tags: fn() -> TagSet,
}

impl StaticTagDecl {
    #[inline]
    pub const fn new(site: fn() -> DeclarationSite, tags: fn() -> TagSet) -> Self {
        Self { site, tags }
    }

    /// The declared site.
    pub fn site(&self) -> DeclarationSite {
        (self.site)()
    }

    /// The declared tag set.
    pub fn tags(&self) -> TagSet {
        (self.tags)()
    }
}

inventory::collect!(StaticTagDecl);

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::tag_set;
    use crate::token::Any;

    struct DbPrimary;
    struct DbReplica;

    struct PrimaryStore;
    struct ReplicaStore;
    struct PlainStore;

    fn sample_registry() -> TagRegistry {
        let registry = TagRegistry::new();
        registry
            .attach(
                DeclarationSite::of_type::<PrimaryStore>(),
                tag_set![DbPrimary],
            )
            .expect("fresh site");
        registry
            .attach(
                DeclarationSite::of_type::<ReplicaStore>(),
                tag_set![DbReplica],
            )
            .expect("fresh site");
        registry
            .attach(DeclarationSite::of_type::<PlainStore>(), TagSet::new())
            .expect("fresh site");
        registry
    }

    #[test]
    fn attach_and_read_back_preserves_token_order() {
        let registry = TagRegistry::new();
        let site = DeclarationSite::method::<PrimaryStore>("open");
        registry
            .attach(site.clone(), tag_set![DbReplica, DbPrimary])
            .expect("fresh site");

        let tags = registry.tags_of(&site).expect("attached");
        assert!(tags.keys()[0].name().ends_with("DbReplica"));
        assert!(tags.keys()[1].name().ends_with("DbPrimary"));
    }

    #[test]
    fn second_attach_fails_and_keeps_the_first_attachment() {
        let registry = TagRegistry::new();
        let site = DeclarationSite::of_type::<PrimaryStore>();
        registry
            .attach(site.clone(), tag_set![DbPrimary])
            .expect("fresh site");

        let result = registry.attach(site.clone(), tag_set![DbReplica]);
        assert!(matches!(
            result,
            Err(TagRegistryError::AlreadyAttached { .. })
        ));

        let tags = registry.tags_of(&site).expect("attached");
        assert_eq!(tags, tag_set![DbPrimary], "first attachment must survive");
    }

    #[test]
    fn is_tagged_detects_presence() {
        let registry = sample_registry();
        assert!(registry.is_tagged(&DeclarationSite::of_type::<PrimaryStore>()));
        assert!(!registry.is_tagged(&DeclarationSite::of_type::<DbPrimary>()));
    }

    #[test]
    fn tags_of_unknown_site_is_not_attached() {
        let registry = TagRegistry::new();
        let result = registry.tags_of(&DeclarationSite::of_type::<PrimaryStore>());
        assert!(matches!(result, Err(TagRegistryError::NotAttached { .. })));
    }

    #[test]
    fn untagged_site_differs_from_wildcard_attachment() {
        let registry = TagRegistry::new();
        registry
            .attach(DeclarationSite::of_type::<PlainStore>(), TagSet::new())
            .expect("fresh site");
        registry
            .attach(DeclarationSite::of_type::<PrimaryStore>(), tag_set![Any])
            .expect("fresh site");

        let plain = registry
            .tags_of(&DeclarationSite::of_type::<PlainStore>())
            .expect("attached");
        let wildcard = registry
            .tags_of(&DeclarationSite::of_type::<PrimaryStore>())
            .expect("attached");
        assert_ne!(plain, wildcard);
        assert!(!plain.is_any());
        assert!(wildcard.is_any());

        // Only the wildcard attachment answers a concrete lookup.
        let hits = registry.matching(&tag_set![DbPrimary]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, DeclarationSite::of_type::<PrimaryStore>());
    }

    #[test]
    fn wildcard_attachment_answers_every_lookup() {
        let registry = sample_registry();
        struct FallbackStore;
        registry
            .attach(DeclarationSite::of_type::<FallbackStore>(), tag_set![Any])
            .expect("fresh site");

        let concrete = registry.matching(&tag_set![DbPrimary]);
        assert_eq!(concrete.len(), 2, "exact candidate plus the wildcard");

        let untagged = registry.matching(&TagSet::new());
        assert_eq!(untagged.len(), 2, "untagged candidate plus the wildcard");
    }

    #[test]
    fn matching_honors_the_wildcard_requirement() {
        let registry = sample_registry();
        let hits = registry.matching(&tag_set![Any]);
        assert_eq!(hits.len(), 3, "wildcard requirement must see everything");
    }

    #[test]
    fn matching_with_concrete_requirement_filters_by_membership() {
        let registry = sample_registry();
        let hits = registry.matching(&tag_set![DbPrimary]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, DeclarationSite::of_type::<PrimaryStore>());
    }

    #[test]
    fn matching_with_empty_requirement_finds_untagged_candidates() {
        let registry = sample_registry();
        let hits = registry.matching(&TagSet::new());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, DeclarationSite::of_type::<PlainStore>());
    }

    #[test]
    fn matching_returns_sites_in_deterministic_order() {
        let registry = sample_registry();
        let first = registry.matching(&tag_set![Any]);
        let second = registry.matching(&tag_set![Any]);
        let first_sites: Vec<_> = first.iter().map(|(site, _)| site.clone()).collect();
        let second_sites: Vec<_> = second.iter().map(|(site, _)| site.clone()).collect();
        assert_eq!(first_sites, second_sites);
        let mut sorted = first_sites.clone();
        sorted.sort();
        assert_eq!(first_sites, sorted);
    }

    #[test]
    fn resolve_unique_returns_the_single_candidate() {
        let registry = sample_registry();
        let site = registry
            .resolve_unique(&tag_set![DbReplica])
            .expect("exactly one replica candidate");
        assert_eq!(site, DeclarationSite::of_type::<ReplicaStore>());
    }

    #[test]
    fn resolve_unique_reports_no_match() {
        let registry = sample_registry();
        struct Cache;
        let result = registry.resolve_unique(&tag_set![Cache]);
        assert!(matches!(result, Err(ResolveError::NoMatch { .. })));
    }

    #[test]
    fn resolve_unique_reports_ambiguity_with_all_candidates() {
        let registry = sample_registry();
        match registry.resolve_unique(&tag_set![Any]) {
            Err(ResolveError::Ambiguous { candidates, .. }) => {
                assert_eq!(candidates.len(), 3);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn detach_removes_the_attachment() {
        let registry = sample_registry();
        let site = DeclarationSite::of_type::<PrimaryStore>();

        let removed = registry.detach(&site);
        assert_eq!(removed, Some(tag_set![DbPrimary]));
        assert!(!registry.is_tagged(&site));
        assert!(registry.detach(&site).is_none());
    }

    #[test]
    fn clear_removes_all_attachments() {
        let registry = sample_registry();
        assert_eq!(registry.len(), 3);

        registry.clear();

        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
        assert!(!registry.is_tagged(&DeclarationSite::of_type::<PrimaryStore>()));
    }

    #[test]
    fn registry_is_thread_safe_under_concurrent_access() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let registry = Arc::new(TagRegistry::new());
        let hit_count = Arc::new(AtomicUsize::new(0));

        registry
            .attach(DeclarationSite::of_type::<PrimaryStore>(), tag_set![DbPrimary])
            .expect("fresh site");

        let mut handles = vec![];
        for worker in 0..10u32 {
            let registry = registry.clone();
            let hit_count = hit_count.clone();
            handles.push(std::thread::spawn(move || {
                let site = DeclarationSite::parameter::<ReplicaStore>("open", worker);
                registry
                    .attach(site, tag_set![DbReplica])
                    .expect("distinct site per worker");

                if !registry.matching(&tag_set![DbPrimary]).is_empty() {
                    hit_count.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker must not panic");
        }

        assert_eq!(
            hit_count.load(Ordering::SeqCst),
            10,
            "all concurrent lookups should succeed"
        );
        assert_eq!(registry.len(), 11);
    }
}
