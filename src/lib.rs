//! Strongly keyed, localized text packs.
//!
//! Packages register their user-facing strings with a [`Registry`] under
//! their own identifier types, for one or more languages. Consumers resolve a
//! language preference into a merged [`TextMap`], or look texts up through the
//! registry's default map, which follows the process language.
//!
//! Each package defines its own identifier type, so keys from different
//! packages never overlap even when their values are equal. Identifiers come
//! in singular/plural pairs; see [`TextId`].

pub mod config;
pub mod i18n;

pub use config::RegistryConfig;
pub use i18n::{
    format_text, text_error, Keyed, LanguageTag, Preference, Priority, Registry, ResolveError,
    Shape, TextContext, TextError, TextFinder, TextId, TextKey, TextMap,
};
