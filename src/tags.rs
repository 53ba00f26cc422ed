//! Implicit tags applied to every point a client writes.
//!
//! A client carries a single [`ImplicitTags`] map. General default tags and the routing tag used
//! by the collector to pick a destination database are both just entries in that map, and both
//! follow the same rule when merged into a point: tags set explicitly on the measurement win, and
//! implicit tags only fill in keys the measurement does not have.
use std::borrow::Cow;

use indexmap::IndexMap;

use crate::measurement::Measurement;

/// Name of the tag the collector reads to route a point to a destination database.
pub const ROUTING_TAG: &str = "database";

/// Tags merged into every point written by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImplicitTags {
    tags: IndexMap<String, String>,
}

impl ImplicitTags {
    /// Creates an empty set; points are written with their own tags only.
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a set of default tags from key/value pairs.
    ///
    /// If a key appears more than once, the latest value is used.
    pub fn from_map<I, K, V>(tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Creates a set holding only the [`ROUTING_TAG`], bound to `destination`.
    pub fn routing<V>(destination: V) -> Self
    where
        V: Into<String>,
    {
        Self::none().with_tag(ROUTING_TAG, destination)
    }

    /// Adds a tag, replacing any previous value for the same key.
    #[must_use]
    pub fn with_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Merges implicit tags into a measurement.
///
/// Every implicit tag whose key is absent from the measurement is added. Keys the measurement
/// already has keep their explicit value. The caller's measurement is never modified: if nothing
/// needs adding it is handed back borrowed, otherwise a copy carrying the extra tags is returned.
///
/// Injection is idempotent: injecting the same set into the result again changes nothing.
pub fn inject<'a>(measurement: &'a Measurement, implicit: &ImplicitTags) -> Cow<'a, Measurement> {
    let mut missing = implicit
        .tags
        .iter()
        .filter(|(key, _)| !measurement.tags.contains_key(key.as_str()))
        .peekable();

    if missing.peek().is_none() {
        return Cow::Borrowed(measurement);
    }

    let mut injected = measurement.clone();
    for (key, value) in missing {
        injected.tags.insert(key.clone(), value.clone());
    }
    Cow::Owned(injected)
}
