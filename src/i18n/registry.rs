//! Text registry: pack registration and resolution.
//!
//! Packs register a callback per pack id, priority and set of languages.
//! Resolving a language preference asks every pack group for its best
//! matching language, loads the matching packs and merges them.
//!
//! The registry also serves a default text map built for the detected process
//! language. It is rebuilt lazily: every registration bumps a sequence number,
//! and a lookup rebuilds only when that number moved past the one observed by
//! the last build.
//!
//! Two locks are used. The state lock guards the groups and both sequence
//! numbers and is never held while pack callbacks run. The rebuild lock
//! serializes rebuilds of the default map, so registrations never wait for a
//! rebuild to finish.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, trace};
use unic_langid::LanguageIdentifierError;

use crate::config::RegistryConfig;
use crate::i18n::language::{best_match, detect_or_fallback, parse_tag};
use crate::i18n::pack::{supported_tags, PackCallback, PackEntry, PackGroup};
use crate::i18n::{Keyed, LanguageTag, Priority, RegistryMetrics, TextFinder, TextKey, TextMap};

/// One resolution preference.
///
/// Languages are listed most preferred first. Extra maps are merged on top of
/// the resolved packs, in the order given.
#[derive(Debug, Clone)]
pub enum Preference {
    Language(LanguageTag),
    /// A language code parsed at resolution time (`"es"`, `"pt_BR"`)
    Code(String),
    Map(TextMap),
    Maps(Vec<TextMap>),
}

impl From<LanguageTag> for Preference {
    fn from(tag: LanguageTag) -> Self {
        Preference::Language(tag)
    }
}

impl From<&LanguageTag> for Preference {
    fn from(tag: &LanguageTag) -> Self {
        Preference::Language(tag.clone())
    }
}

impl From<&str> for Preference {
    fn from(code: &str) -> Self {
        Preference::Code(code.to_string())
    }
}

impl From<String> for Preference {
    fn from(code: String) -> Self {
        Preference::Code(code)
    }
}

impl From<TextMap> for Preference {
    fn from(map: TextMap) -> Self {
        Preference::Map(map)
    }
}

impl From<Vec<TextMap>> for Preference {
    fn from(maps: Vec<TextMap>) -> Self {
        Preference::Maps(maps)
    }
}

/// Errors from [`Registry::resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid language preference '{code}': {source}")]
    InvalidLanguage {
        code: String,
        #[source]
        source: LanguageIdentifierError,
    },
}

#[derive(Debug, Default)]
struct RegistryState {
    groups: BTreeMap<TextKey, PackGroup>,
    reg_sequence: u64,
    built_sequence: u64,
}

/// Registry of text packs.
pub struct Registry {
    config: RegistryConfig,
    state: Mutex<RegistryState>,
    rebuild: Mutex<()>,
    default_map: RwLock<Option<Arc<TextMap>>>,
    metrics: RegistryMetrics,
}

/// Process-wide registry instance (initialized lazily)
static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RegistryState::default()),
            rebuild: Mutex::new(()),
            default_map: RwLock::new(None),
            metrics: RegistryMetrics::new(),
        }
    }

    /// Get the process-wide registry.
    ///
    /// Created with the default configuration on first call and kept for the
    /// life of the process. Libraries register their packs here; code that
    /// needs isolation should construct its own [`Registry`].
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Get the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the registry metrics.
    pub fn metrics(&self) -> &RegistryMetrics {
        &self.metrics
    }

    /// Number of registrations made so far.
    pub fn registration_sequence(&self) -> u64 {
        self.lock_state().reg_sequence
    }

    /// Number of distinct pack ids registered.
    pub fn pack_count(&self) -> usize {
        self.lock_state().groups.len()
    }

    /// Register a pack for a set of languages.
    ///
    /// `callback` is called with `pack` and the matched language whenever a
    /// resolution selects one of `tags` for this pack id; returning `None`
    /// contributes nothing. Registrations accumulate. Within one pack id,
    /// higher priority entries override lower ones and, at equal priority,
    /// later registrations override earlier ones.
    ///
    /// Registering with no tags does nothing.
    pub fn register<P, F>(
        &self,
        pack: P,
        callback: F,
        priority: Priority,
        tags: &[LanguageTag],
    ) -> &Self
    where
        P: Keyed,
        F: Fn(&P, &LanguageTag) -> Option<TextMap> + Send + Sync + 'static,
    {
        if tags.is_empty() {
            return self;
        }

        let key = pack.text_key();
        let callback: PackCallback = Arc::new(move |tag: &LanguageTag| callback(&pack, tag));
        let entry = PackEntry::new(priority, callback, tags.to_vec());

        let sequence = {
            let mut state = self.lock_state();
            state.groups.entry(key.clone()).or_default().add_entry(entry);
            state.reg_sequence += 1;
            state.reg_sequence
        };

        self.metrics.record_registration();
        debug!(
            "Registered pack {} at {:?} for {:?} (sequence {})",
            key,
            priority,
            tags.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
            sequence
        );

        self
    }

    /// Build a new text map for the given preferences.
    ///
    /// Reflects the current registrations and leaves the registry untouched.
    /// With no language preference the configured fallback language is used.
    pub fn resolve<I>(&self, preferences: I) -> Result<TextMap, ResolveError>
    where
        I: IntoIterator,
        I::Item: Into<Preference>,
    {
        let mut languages: Vec<LanguageTag> = Vec::new();
        let mut extra: Vec<TextMap> = Vec::new();

        for preference in preferences {
            match preference.into() {
                Preference::Language(tag) => languages.push(tag),
                Preference::Code(code) => match parse_tag(&code) {
                    Ok(tag) => languages.push(tag),
                    Err(source) => return Err(ResolveError::InvalidLanguage { code, source }),
                },
                Preference::Map(map) => extra.push(map),
                Preference::Maps(maps) => extra.extend(maps),
            }
        }

        if languages.is_empty() {
            languages.push(self.config.fallback_language.clone());
        }

        self.metrics.record_resolution();

        let mut map = self.build(&languages);
        map.merge(extra);

        debug!(
            "Resolved {} texts for {:?}",
            map.len(),
            languages.iter().map(|t| t.to_string()).collect::<Vec<_>>()
        );

        Ok(map)
    }

    /// The default text map, rebuilt first if registrations happened since
    /// the last build.
    pub fn default_map(&self) -> Arc<TextMap> {
        if let Some(map) = self.fresh_default_map() {
            self.metrics.record_cache_hit();
            return map;
        }

        let _rebuild = self.rebuild.lock().unwrap_or_else(PoisonError::into_inner);

        // Another thread may have rebuilt while we waited
        if let Some(map) = self.fresh_default_map() {
            self.metrics.record_cache_hit();
            return map;
        }

        let observed = self.lock_state().reg_sequence;

        let language = if self.config.detect_locale {
            let (tag, fell_back) = detect_or_fallback(&self.config);
            if fell_back {
                self.metrics.record_locale_fallback();
            }
            tag
        } else {
            self.config.fallback_language.clone()
        };

        let map = Arc::new(self.build(std::slice::from_ref(&language)));

        *self
            .default_map
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&map));

        {
            let mut state = self.lock_state();
            state.built_sequence = state.built_sequence.max(observed);
        }

        self.metrics.record_cache_rebuild();
        debug!(
            "Rebuilt default text map for {} ({} texts, sequence {})",
            language,
            map.len(),
            observed
        );

        map
    }

    fn fresh_default_map(&self) -> Option<Arc<TextMap>> {
        let is_current = {
            let state = self.lock_state();
            state.built_sequence >= state.reg_sequence
        };

        if !is_current {
            return None;
        }

        self.default_map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge the best matching packs of every group for `languages`.
    fn build(&self, languages: &[LanguageTag]) -> TextMap {
        // Snapshot the entries so callbacks run without the state lock
        let groups: Vec<(TextKey, Vec<PackEntry>)> = {
            let mut state = self.lock_state();
            state
                .groups
                .iter_mut()
                .map(|(key, group)| (key.clone(), group.sorted_entries().to_vec()))
                .collect()
        };

        let mut merged = TextMap::new();

        for (key, entries) in groups {
            let supported = supported_tags(&entries);
            let Some(best) = best_match(&supported, languages, &self.config.fallback_language)
            else {
                continue;
            };

            for entry in entries.iter().filter(|entry| entry.supports(&best)) {
                self.metrics.record_pack_load();
                trace!("Loading pack {} ({:?}) for {}", key, entry.priority, best);

                if let Some(texts) = entry.load(&best) {
                    merged.merge([texts]);
                }
            }
        }

        merged
    }

    fn lock_state(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("packs", &state.groups.len())
            .field(
                "entries",
                &state.groups.values().map(PackGroup::len).sum::<usize>(),
            )
            .field("reg_sequence", &state.reg_sequence)
            .field("built_sequence", &state.built_sequence)
            .finish()
    }
}

impl TextFinder for Registry {
    fn lookup(&self, key: &TextKey) -> Option<String> {
        self.default_map().get_key(key).map(str::to_owned)
    }
}
