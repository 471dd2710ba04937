//! Element name to constructor table for open content.
//!
//! The registry is built once and never changes afterwards; lookups need no
//! locking. Decoders get it by reference through
//! [`DecodeContext`](crate::codec::DecodeContext), so tests and embedders can
//! pass their own table instead of [`ElementRegistry::standard`].

use crate::codec::{Aggregate, DynAggregate};
use crate::xml::StaticName;
use crate::xml::names::NameIndex;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::fmt;
use thiserror::Error;

/// Zero-argument constructor of a registered aggregate
pub type Constructor = fn() -> Box<dyn DynAggregate>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("element {name} registered twice ({first} and {second})")]
    Duplicate {
        name: String,
        first: &'static str,
        second: &'static str,
    },
}

#[derive(Clone, Copy)]
struct Entry {
    construct: Constructor,
    type_name: &'static str,
}

fn construct<T: Aggregate>() -> Box<dyn DynAggregate> {
    Box::new(T::default())
}

/// Immutable name to constructor table
pub struct ElementRegistry {
    entries: IndexMap<StaticName, Entry>,
    index: NameIndex<usize>,
}

impl ElementRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// A registry resolving nothing
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
            index: NameIndex::default(),
        }
    }

    /// Process-wide registry of every aggregate in [`crate::parts`],
    /// built on first use
    pub fn standard() -> &'static ElementRegistry {
        static STANDARD: Lazy<ElementRegistry> = Lazy::new(|| {
            crate::parts::register_standard(ElementRegistry::builder())
                .build()
                .expect("standard registry names are unique")
        });
        &STANDARD
    }

    /// Constructor registered for the name, `None` for unknown content
    pub fn resolve(&self, namespace: Option<&str>, local: &str) -> Option<Constructor> {
        self.index
            .get(namespace, local)
            .map(|&index| self.entries[index].construct)
    }

    /// Schema type registered for the name
    pub fn type_name(&self, namespace: Option<&str>, local: &str) -> Option<&'static str> {
        self.index
            .get(namespace, local)
            .map(|&index| self.entries[index].type_name)
    }

    pub fn contains(&self, name: StaticName) -> bool {
        self.entries.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = StaticName> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, entry)| (name.to_string(), entry.type_name)))
            .finish()
    }
}

/// Collects registrations; duplicates surface in [`RegistryBuilder::build`]
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<(StaticName, Entry)>,
}

impl RegistryBuilder {
    /// Register `T` under the element name `name`
    pub fn register<T: Aggregate>(self, name: StaticName) -> Self {
        self.register_constructor(name, construct::<T>, T::schema().name())
    }

    pub fn register_constructor(
        mut self,
        name: StaticName,
        construct: Constructor,
        type_name: &'static str,
    ) -> Self {
        self.entries.push((
            name,
            Entry {
                construct,
                type_name,
            },
        ));
        self
    }

    pub fn build(self) -> Result<ElementRegistry, RegistryError> {
        let mut registry = ElementRegistry::empty();
        for (name, entry) in self.entries {
            if let Some(first) = registry.entries.get(&name) {
                return Err(RegistryError::Duplicate {
                    name: name.to_string(),
                    first: first.type_name,
                    second: entry.type_name,
                });
            }
            let (index, _) = registry.entries.insert_full(name, entry);
            registry.index.insert(name, index);
        }
        Ok(registry)
    }
}

/// Register several aggregates at once.
///
/// ```rust,ignore
/// let builder = register_elements!(
///     ElementRegistry::builder(),
///     c("chart") => CtRelId,
///     a("graphic") => CtGraphicalObject,
/// );
/// ```
#[macro_export]
macro_rules! register_elements {
    ($builder:expr, $($name:expr => $ty:ty),* $(,)?) => {
        $builder
            $( .register::<$ty>($name) )*
    };
}
