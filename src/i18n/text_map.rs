//! Text maps: identifier to string lookup tables.

use std::collections::HashMap;
use std::sync::Arc;

use crate::i18n::{Keyed, TextKey};

/// Looks up texts by identifier.
///
/// Implemented by [`TextMap`], the [`Registry`](crate::i18n::Registry) (which
/// serves its cached default map) and [`TextContext`](crate::i18n::TextContext).
pub trait TextFinder: Send + Sync {
    /// Look up a fully qualified key.
    fn lookup(&self, key: &TextKey) -> Option<String>;

    /// Look up an identifier, returning `None` when it has no text.
    fn find(&self, id: &dyn Keyed) -> Option<String> {
        self.lookup(&id.text_key())
    }

    /// Look up an identifier, returning an empty string when it has no text.
    fn text(&self, id: &dyn Keyed) -> String {
        self.find(id).unwrap_or_default()
    }
}

impl<T: TextFinder + ?Sized> TextFinder for Arc<T> {
    fn lookup(&self, key: &TextKey) -> Option<String> {
        (**self).lookup(key)
    }
}

/// Maps text identifiers to strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextMap {
    texts: HashMap<TextKey, String>,
}

impl TextMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map by merging `maps` left to right.
    pub fn from_maps<I>(maps: I) -> Self
    where
        I: IntoIterator<Item = TextMap>,
    {
        let mut tm = Self::new();
        tm.merge(maps);
        tm
    }

    /// Merge `maps` into this map in order. For a key present in several
    /// maps, the value from the last one wins.
    pub fn merge<I>(&mut self, maps: I) -> &mut Self
    where
        I: IntoIterator<Item = TextMap>,
    {
        for map in maps {
            self.texts.extend(map.texts);
        }
        self
    }

    /// Merge a borrowed map into this one; its values win.
    pub fn merge_from(&mut self, other: &TextMap) -> &mut Self {
        self.texts
            .extend(other.texts.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Insert a text, returning the previous one for that identifier.
    pub fn insert(&mut self, id: &dyn Keyed, text: impl Into<String>) -> Option<String> {
        self.texts.insert(id.text_key(), text.into())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, id: impl Keyed, text: impl Into<String>) -> Self {
        self.insert(&id, text);
        self
    }

    /// Get the text for an identifier.
    pub fn get(&self, id: &dyn Keyed) -> Option<&str> {
        self.get_key(&id.text_key())
    }

    /// Get the text for a fully qualified key.
    pub fn get_key(&self, key: &TextKey) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    /// Check whether an identifier has a text.
    pub fn contains(&self, id: &dyn Keyed) -> bool {
        self.texts.contains_key(&id.text_key())
    }

    /// Number of texts in the map.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Check whether the map has no texts.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Iterate over keys and texts in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&TextKey, &str)> {
        self.texts.iter().map(|(k, v)| (k, v.as_str()))
    }
}

impl TextFinder for TextMap {
    fn lookup(&self, key: &TextKey) -> Option<String> {
        self.get_key(key).map(str::to_owned)
    }
}

impl FromIterator<(TextKey, String)> for TextMap {
    fn from_iter<I: IntoIterator<Item = (TextKey, String)>>(iter: I) -> Self {
        Self {
            texts: iter.into_iter().collect(),
        }
    }
}

impl Extend<(TextKey, String)> for TextMap {
    fn extend<I: IntoIterator<Item = (TextKey, String)>>(&mut self, iter: I) {
        self.texts.extend(iter);
    }
}
