use ahash::AHashMap;
use smallvec::SmallVec;
use std::fmt;

/// A namespace-resolved name as it appears in a token stream
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Namespace URI, `None` for names outside any namespace
    pub namespace: Option<String>,
    /// Local part of the name
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
            local: local.into(),
        }
    }

    /// A name in the given namespace
    pub fn qualified(namespace: &str, local: impl Into<String>) -> Self {
        Self::new(Some(namespace), local)
    }

    /// A name in no namespace, the usual case for attributes
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new(None, local)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn is(&self, name: StaticName) -> bool {
        name.matches(self)
    }
}

impl From<StaticName> for QName {
    fn from(name: StaticName) -> Self {
        name.to_qname()
    }
}

/// Clark notation, `{uri}local`
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// A schema-fixed element or attribute name, used in descriptor tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaticName {
    pub namespace: Option<&'static str>,
    pub local: &'static str,
}

impl StaticName {
    pub const fn new(namespace: &'static str, local: &'static str) -> Self {
        Self {
            namespace: Some(namespace),
            local,
        }
    }

    pub const fn unqualified(local: &'static str) -> Self {
        Self {
            namespace: None,
            local,
        }
    }

    pub fn matches(&self, name: &QName) -> bool {
        self.local == name.local && self.namespace == name.namespace.as_deref()
    }

    pub fn to_qname(&self) -> QName {
        QName::new(self.namespace, self.local)
    }
}

impl fmt::Display for StaticName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(self.local),
        }
    }
}

/// Lookup table keyed by schema names, queried with resolved token names
/// without allocating
#[derive(Debug, Clone)]
pub(crate) struct NameIndex<V> {
    by_local: AHashMap<&'static str, SmallVec<[(Option<&'static str>, V); 1]>>,
}

impl<V> Default for NameIndex<V> {
    fn default() -> Self {
        Self {
            by_local: AHashMap::new(),
        }
    }
}

impl<V> NameIndex<V> {
    /// Insert, returning the value previously stored under the same name
    pub(crate) fn insert(&mut self, name: StaticName, value: V) -> Option<V> {
        let slot = self.by_local.entry(name.local).or_default();
        match slot.iter_mut().find(|(ns, _)| *ns == name.namespace) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                slot.push((name.namespace, value));
                None
            }
        }
    }

    pub(crate) fn get(&self, namespace: Option<&str>, local: &str) -> Option<&V> {
        self.by_local
            .get(local)?
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, value)| value)
    }

    pub(crate) fn lookup(&self, name: &QName) -> Option<&V> {
        self.get(name.namespace(), &name.local)
    }
}
