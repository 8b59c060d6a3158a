//! Declarative classifier tags for dependency-injection candidates.
//!
//! When several candidates can fill the same role, a consumer needs a way
//! to say *which one*. This crate provides the marker side of that story:
//! - [`TagKey`] — a classifier token, identified by a marker type;
//! - [`Any`] — the wildcard sentinel matching regardless of tag;
//! - [`TagSet`] — the ordered token list attached to one declaration;
//! - [`TagRegistry`] — the side table keyed by [`DeclarationSite`],
//!   populated at startup from definition-site declarations.
//!
//! The actual container that instantiates and injects candidates is an
//! external consumer; this crate only carries the metadata and the
//! wildcard-aware matching rules it needs.
//!
//! ```
//! use tagkit::{tag_set, DeclarationSite, TagRegistry};
//!
//! struct DbPrimary;
//! struct DbReplica;
//! struct PrimaryStore;
//! struct ReplicaStore;
//!
//! let registry = TagRegistry::new();
//! registry.attach(DeclarationSite::of_type::<PrimaryStore>(), tag_set![DbPrimary])?;
//! registry.attach(DeclarationSite::of_type::<ReplicaStore>(), tag_set![DbReplica])?;
//!
//! let site = registry.resolve_unique(&tag_set![DbPrimary]).expect("one candidate");
//! assert_eq!(site, DeclarationSite::of_type::<PrimaryStore>());
//! # Ok::<(), tagkit::TagRegistryError>(())
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod registry;
pub mod site;
pub mod tag;
pub mod token;

// Re-exported for the code generated by `#[tagged(...)]`.
pub use inventory;

pub use registry::{ResolveError, StaticTagDecl, TagRegistry, TagRegistryError};
pub use site::{DeclarationSite, Placement};
pub use tag::{TagAlias, TagSet, Tagged};
pub use token::{Any, TagKey};
