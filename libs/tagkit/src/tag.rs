//! Tag sets attached to declaration sites, and the matching rules between
//! a required set (consumer side) and a provided set (candidate side).
//!
//! A set keeps its tokens in declaration order and folds the [`Any`]
//! sentinel into a wildcard flag instead of storing it as a token, so a
//! consumer enumerating the set only ever sees concrete classifiers.
//!
//! Matching rules:
//! - `matches`: wildcard on the required side matches everything, an empty
//!   required set matches only an empty provided set, otherwise the two
//!   sets must have equal membership.
//! - `matches_symmetric`: wildcard on either side matches, otherwise equal
//!   membership.
//! - `==`: equal membership and identical wildcard flags.

use std::fmt;

use crate::token::{Any, TagKey};

/// Ordered, duplicate-free set of classifier tokens plus a wildcard flag.
///
/// Inserting a token that is already present is idempotent: the first
/// occurrence keeps its position. Inserting [`Any`] sets the wildcard flag.
#[derive(Clone, Default)]
pub struct TagSet {
    keys: Vec<TagKey>,
    any: bool,
}

impl TagSet {
    /// Empty set: no tokens, no wildcard.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set containing the single token `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new().with::<T>()
    }

    /// Builder form of [`TagSet::insert`] for a type token.
    #[must_use]
    pub fn with<T: ?Sized + 'static>(self) -> Self {
        self.with_key(TagKey::of::<T>())
    }

    /// Builder form of [`TagSet::insert`].
    #[must_use]
    pub fn with_key(mut self, key: TagKey) -> Self {
        self.insert(key);
        self
    }

    /// Builder form of [`TagSet::merge`] over an alias expansion.
    #[must_use]
    pub fn with_alias<A: TagAlias>(mut self) -> Self {
        self.merge(A::expand());
        self
    }

    /// Add a token; returns `false` if it was already present.
    ///
    /// The wildcard key is not stored as a token: it sets the wildcard flag
    /// instead (returns `false` if the flag was already set).
    pub fn insert(&mut self, key: TagKey) -> bool {
        if key.is_any() {
            let newly_set = !self.any;
            self.any = true;
            return newly_set;
        }
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Fold another set into this one, keeping declaration order of both.
    pub fn merge(&mut self, other: TagSet) {
        if other.any {
            self.any = true;
        }
        for key in other.keys {
            self.insert(key);
        }
    }

    /// Concrete tokens, in declaration order. The wildcard is not included.
    #[inline]
    pub fn keys(&self) -> &[TagKey] {
        &self.keys
    }

    /// Whether the token `T` is present.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_key(TagKey::of::<T>())
    }

    /// Whether `key` is present. The wildcard flag answers through
    /// [`TagSet::is_any`], not through this method.
    pub fn contains_key(&self, key: TagKey) -> bool {
        if key.is_any() {
            return self.any;
        }
        self.keys.contains(&key)
    }

    /// Whether the wildcard sentinel was declared on this set.
    #[inline]
    pub fn is_any(&self) -> bool {
        self.any
    }

    /// `true` when the set carries neither tokens nor the wildcard.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.any && self.keys.is_empty()
    }

    /// Number of concrete tokens (the wildcard is not counted).
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Requirement-side matching: does a candidate providing `provided`
    /// satisfy this required set?
    ///
    /// Wildcard required matches everything. An empty requirement matches
    /// only candidates with no concrete tokens. Otherwise membership must
    /// be equal.
    pub fn matches(&self, provided: &TagSet) -> bool {
        if self.any {
            return true;
        }
        if self.keys.is_empty() {
            return provided.keys.is_empty();
        }
        self.same_members(provided)
    }

    /// Symmetric matching, e.g. for finding sibling consumers of the same
    /// candidate: wildcard on either side matches.
    pub fn matches_symmetric(&self, other: &TagSet) -> bool {
        if self.any || other.any {
            return true;
        }
        self.same_members(other)
    }

    fn same_members(&self, other: &TagSet) -> bool {
        self.keys.len() == other.keys.len()
            && self.keys.iter().all(|key| other.keys.contains(key))
    }
}

/// Exact matching: equal membership (order-insensitive) and identical
/// wildcard flags.
impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.any == other.any && self.same_members(other)
    }
}

impl Eq for TagSet {}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        list.entries(&self.keys);
        if self.any {
            list.entry(&"<any>");
        }
        list.finish()
    }
}

/// Types carrying definition-time tags.
///
/// Normally generated by the `#[tagged(...)]` attribute; hand-written
/// implementations are equivalent.
pub trait Tagged {
    /// The tags declared on this type, in declaration order.
    fn tags() -> TagSet;
}

/// Marker types acting as shorthand for a group of tags.
///
/// The counterpart of declaring a reusable tag marker: attaching the alias
/// is the same as attaching every tag of its expansion.
pub trait TagAlias: 'static {
    /// The group of tags this alias stands for.
    fn expand() -> TagSet;
}

impl TagAlias for Any {
    fn expand() -> TagSet {
        TagSet::new().with::<Any>()
    }
}

/// Build a [`TagSet`] from a list of token types.
///
/// ```
/// use tagkit::{tag_set, Any, TagSet};
///
/// struct DbPrimary;
/// struct DbReplica;
///
/// let set = tag_set![DbPrimary, DbReplica];
/// assert_eq!(set.len(), 2);
/// assert!(tag_set![Any].is_any());
/// assert_eq!(tag_set![], TagSet::new());
/// ```
#[macro_export]
macro_rules! tag_set {
    () => { $crate::TagSet::new() };
    ($($token:ty),+ $(,)?) => {{
        let mut set = $crate::TagSet::new();
        $( set.insert($crate::TagKey::of::<$token>()); )+
        set
    }};
}
