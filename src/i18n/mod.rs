//! Internationalization (i18n) module: text packs and their resolution.
//!
//! # Architecture
//!
//! - `text_id`: identifier contract, typed key shapes and plural helpers
//! - `text_map`: identifier to text maps and the `TextFinder` lookup trait
//! - `language`: language tags, best-fit matching and locale detection
//! - `priority`: registration priority tiers
//! - `pack`: per-pack-id registration groups
//! - `registry`: registration, resolution and the cached default map
//! - `context`: finder handles passed through call chains
//! - `format`: positional formatting and fallback rendering
//! - `metrics`: registry counters
//!
//! # Example
//!
//! ```rust,ignore
//! use textpack::i18n::{parse_language, Priority, Registry, TextMap};
//!
//! let registry = Registry::new();
//! registry.register(
//!     MyPack,
//!     |_, _| Some(TextMap::new().with(Greeting::Hello, "Hello World")),
//!     Priority::Package,
//!     &[parse_language("en")?],
//! );
//!
//! let texts = registry.resolve(["en-GB"])?;
//! assert_eq!(texts.get(&Greeting::Hello), Some("Hello World"));
//! ```

mod context;
mod format;
mod language;
mod metrics;
mod pack;
mod priority;
mod registry;
mod text_id;
mod text_map;

pub use context::TextContext;
pub use format::{
    fallback_text, format_in, format_text, format_with, substitute, text_error, text_error_in,
    text_error_with, Formatted, TextError,
};
pub use language::{
    best_match, default_language, detect_locale_from, detect_locale_language, detect_or_fallback,
    parse_language, parse_locale, parse_tag, LanguageTag, LocaleError, DEFAULT_LANGUAGE,
};
pub use metrics::{MetricsReport, RegistryMetrics};
pub use priority::Priority;
pub use registry::{Preference, Registry, ResolveError};
pub use text_id::{by_count, coded_string, int_plural, int_single, Keyed, Shape, TextId, TextKey};
pub use text_map::{TextFinder, TextMap};
