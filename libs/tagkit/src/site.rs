//! Identity of the declarations tags are attached to.

use std::fmt;

use crate::token::TagKey;

/// Kind of declaration a tag attachment points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placement {
    /// The owning type itself.
    Type,
    /// A method of the owning type.
    Method,
    /// A parameter of a method, addressed by position.
    Parameter,
    /// A named field of the owning type.
    Field,
}

/// Identity of an annotated declaration: owner type, placement and an
/// optional member name / parameter index.
///
/// Sites are plain values; they do not borrow the declaration they describe.
/// Ordering is derived so registry lookups can return deterministic lists.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeclarationSite {
    owner: TagKey,
    placement: Placement,
    member: Option<&'static str>,
    index: Option<u32>,
}

impl DeclarationSite {
    /// Site of the type `T` itself.
    pub fn of_type<T: ?Sized + 'static>() -> Self {
        Self {
            owner: TagKey::of::<T>(),
            placement: Placement::Type,
            member: None,
            index: None,
        }
    }

    /// Site of a method of `T`.
    pub fn method<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            owner: TagKey::of::<T>(),
            placement: Placement::Method,
            member: Some(name),
            index: None,
        }
    }

    /// Site of a method parameter of `T`, addressed by zero-based position.
    pub fn parameter<T: ?Sized + 'static>(method: &'static str, index: u32) -> Self {
        Self {
            owner: TagKey::of::<T>(),
            placement: Placement::Parameter,
            member: Some(method),
            index: Some(index),
        }
    }

    /// Site of a named field of `T`.
    pub fn field<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            owner: TagKey::of::<T>(),
            placement: Placement::Field,
            member: Some(name),
            index: None,
        }
    }

    /// Token of the owning type.
    #[inline]
    pub fn owner(&self) -> TagKey {
        self.owner
    }

    #[inline]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Member name for method, parameter and field sites.
    #[inline]
    pub fn member(&self) -> Option<&'static str> {
        self.member
    }

    /// Parameter position for parameter sites.
    #[inline]
    pub fn index(&self) -> Option<u32> {
        self.index
    }
}

impl fmt::Debug for DeclarationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.owner.name())?;
        match (self.placement, self.member, self.index) {
            (Placement::Type, _, _) => Ok(()),
            (Placement::Method, Some(name), _) => write!(f, "::{name}()"),
            (Placement::Parameter, Some(name), Some(index)) => {
                write!(f, "::{name}(#{index})")
            }
            (Placement::Field, Some(name), _) => write!(f, ".{name}"),
            // Constructors always fill the member for non-type placements.
            _ => write!(f, "::<unnamed>"),
        }
    }
}
