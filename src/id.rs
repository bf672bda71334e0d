//! String identifiers for catalog entities and lookups by ID.
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;

/// Behaviour shared by every ID type
pub trait IDLike: Eq + Hash + Borrow<str> + Clone + Display + From<String> {}
impl<T> IDLike for T where T: Eq + Hash + Borrow<str> + Clone + Display + From<String> {}

/// Define a cheaply cloneable, string-backed ID type called `$name`
macro_rules! define_id_type {
    ($name:ident) => {
        /// A string identifier, unique within its own kind of entity
        #[derive(
            Clone,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            std::hash::Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub std::rc::Rc<str>);

        impl $name {
            /// Make an ID from a string slice
            pub fn new(id: &str) -> Self {
                Self(id.into())
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id.into())
            }
        }
    };
}
pub(crate) use define_id_type;

#[cfg(test)]
define_id_type!(GenericID);

/// Something identified by an ID of type `ID`
pub trait HasID<ID: IDLike> {
    /// The ID of this item
    fn get_id(&self) -> &ID;
}

/// Implement [`HasID`] for a struct with a field called `id`
macro_rules! define_id_getter {
    ($t:ty, $id_ty:ty) => {
        impl crate::id::HasID<$id_ty> for $t {
            fn get_id(&self) -> &$id_ty {
                &self.id
            }
        }
    };
}
pub(crate) use define_id_getter;

/// A collection which can be searched for known IDs
pub trait IDCollection<ID: IDLike> {
    /// Find the stored ID matching `id`.
    ///
    /// Fails with "Unknown ID" if there is no such ID.
    fn get_id_by_str(&self, id: &str) -> Result<ID>;

    /// As [`IDCollection::get_id_by_str`], for an ID which has already been parsed
    fn get_id(&self, id: &ID) -> Result<ID> {
        self.get_id_by_str(id.borrow())
    }
}

impl<ID: IDLike, V> IDCollection<ID> for IndexMap<ID, V> {
    fn get_id_by_str(&self, id: &str) -> Result<ID> {
        self.get_key_value(id)
            .map(|(found, _)| found.clone())
            .with_context(|| format!("Unknown ID {id} found"))
    }
}
