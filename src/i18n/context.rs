//! Text context: a finder handle passed through call chains.

use std::fmt;
use std::sync::Arc;

use crate::i18n::{Registry, TextFinder, TextKey};

/// Carries the text finder for a unit of work.
///
/// An unbound context falls back to the process-wide [`Registry`]. Clone it
/// freely; the bound finder is shared.
#[derive(Clone, Default)]
pub struct TextContext {
    finder: Option<Arc<dyn TextFinder>>,
}

impl TextContext {
    /// An unbound context that uses the global registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context bound to `finder`, typically a map from
    /// [`Registry::resolve`].
    pub fn with_finder<F: TextFinder + 'static>(finder: F) -> Self {
        Self {
            finder: Some(Arc::new(finder)),
        }
    }

    /// A context bound to an already shared finder.
    pub fn from_shared(finder: Arc<dyn TextFinder>) -> Self {
        Self {
            finder: Some(finder),
        }
    }

    /// The bound finder, or the global registry when none is bound.
    pub fn finder(&self) -> &dyn TextFinder {
        match &self.finder {
            Some(finder) => finder.as_ref(),
            None => Registry::global(),
        }
    }

    /// Check whether a finder is bound.
    pub fn is_bound(&self) -> bool {
        self.finder.is_some()
    }
}

impl TextFinder for TextContext {
    fn lookup(&self, key: &TextKey) -> Option<String> {
        self.finder().lookup(key)
    }
}

impl fmt::Debug for TextContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextContext")
            .field("bound", &self.is_bound())
            .finish()
    }
}
