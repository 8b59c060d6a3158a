//! Attribute macros fixing classifier tags at definition time.
//!
//! `#[tagged(...)]` implements `tagkit::Tagged` for the item and submits a
//! `tagkit::StaticTagDecl`, so `TagRegistry::bootstrap()` sees the
//! declaration without any processing pipeline. `#[tag_alias(...)]` turns a
//! marker type into shorthand for a group of tags.

use proc_macro::TokenStream;

mod tagged;

/// Attach classifier tokens to a type declaration.
///
/// ```ignore
/// struct DbPrimary;
///
/// #[tagged(DbPrimary)]
/// struct PrimaryStore;
///
/// // Zero tokens and the wildcard are both valid:
/// #[tagged]
/// struct PlainStore;
///
/// #[tagged(tagkit::Any)]
/// struct WildcardStore;
/// ```
#[proc_macro_attribute]
pub fn tagged(args: TokenStream, input: TokenStream) -> TokenStream {
    tagged::expand_tagged(args.into(), input.into()).into()
}

/// Declare a marker type standing for a group of tags.
///
/// ```ignore
/// #[tag_alias(DbPrimary, DbReplica)]
/// struct AllDatabases;
/// ```
#[proc_macro_attribute]
pub fn tag_alias(args: TokenStream, input: TokenStream) -> TokenStream {
    tagged::expand_tag_alias(args.into(), input.into()).into()
}
