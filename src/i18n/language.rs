//! Language tags: parsing, best-fit matching and process locale detection.
//!
//! Tags are `unic-langid` identifiers. Matching tries an exact match first,
//! then compares likely-subtag maximized forms, relaxing the region before
//! the script.

use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use thiserror::Error;
use tracing::warn;
use unic_langid::{LanguageIdentifier, LanguageIdentifierError};

use crate::config::RegistryConfig;

/// A BCP-47 language tag.
pub type LanguageTag = LanguageIdentifier;

/// Language used when nothing else is known.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Errors from detecting the process language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("no locale set in any of {0:?}")]
    NotSet(Vec<&'static str>),

    #[error("unrecognized locale '{0}'")]
    Unrecognized(String),
}

// POSIX locale strings: language[_territory][.codeset][@modifier]
static LOCALE_REGEX: OnceLock<Regex> = OnceLock::new();

fn locale_regex() -> &'static Regex {
    LOCALE_REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{2,3})(?:[_-][A-Za-z0-9]+)*(?:\.[^@]*)?(?:@.*)?$")
            .expect("Invalid locale regex")
    })
}

/// The [`DEFAULT_LANGUAGE`] as a tag.
pub fn default_language() -> LanguageTag {
    DEFAULT_LANGUAGE
        .parse()
        .expect("Default language should always parse")
}

/// Parse a tag, accepting `_` as a subtag separator (`en_US`).
pub fn parse_tag(code: &str) -> std::result::Result<LanguageTag, LanguageIdentifierError> {
    code.trim().replace('_', "-").parse()
}

/// Parse a language code into a tag.
///
/// # Example
/// ```ignore
/// let spanish = parse_language("es-MX")?;
/// ```
pub fn parse_language(code: &str) -> Result<LanguageTag> {
    if code.trim().is_empty() {
        bail!("Empty language code");
    }

    parse_tag(code).with_context(|| format!("Invalid language code: '{}'", code))
}

/// How closely a supported tag fits a wanted one, compared on
/// likely-subtag maximized forms (`zh-TW` is `zh-Hant-TW`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Fit {
    /// Same language, different script
    Language,
    /// Same language and script, different region or variants
    Script,
    /// Equal once maximized (`en` and `en-US`)
    Likely,
    Exact,
}

/// A tag paired with its maximized form.
struct Candidate<'a> {
    tag: &'a LanguageTag,
    maximized: LanguageTag,
}

impl<'a> Candidate<'a> {
    fn new(tag: &'a LanguageTag) -> Self {
        let mut maximized = tag.clone();
        maximized.maximize();
        Self { tag, maximized }
    }

    fn fit(&self, other: &Candidate<'_>) -> Option<Fit> {
        if self.tag == other.tag {
            Some(Fit::Exact)
        } else if self.maximized == other.maximized {
            Some(Fit::Likely)
        } else if self.maximized.language != other.maximized.language {
            None
        } else if self.maximized.script == other.maximized.script {
            Some(Fit::Script)
        } else {
            Some(Fit::Language)
        }
    }
}

/// The closest candidate for the first wanted tag that fits at least
/// `weakest`. Ties go to the earlier candidate.
fn closest<'a>(
    candidates: &[Candidate<'a>],
    wanted: &[Candidate<'_>],
    weakest: Fit,
) -> Option<&'a LanguageTag> {
    wanted.iter().find_map(|want| {
        let mut best: Option<(Fit, &'a LanguageTag)> = None;
        for candidate in candidates {
            match want.fit(candidate) {
                Some(fit) if fit >= weakest && best.map_or(true, |(b, _)| fit > b) => {
                    best = Some((fit, candidate.tag));
                }
                _ => {}
            }
        }
        best.map(|(_, tag)| tag)
    })
}

/// Pick the supported tag that best fits `preferred` (most preferred first).
///
/// Tags are compared after adding likely subtags, so a script difference
/// outweighs a region difference: `zh-TW` picks `zh-Hant` over `zh`. The
/// first preference with a same-script match wins; a match in another script
/// of the same language is only taken when no preference has one.
///
/// When nothing matches, the result is the supported tag closest to
/// `fallback`, or the first supported tag if even that has no match.
/// Returns `None` only when `supported` is empty.
pub fn best_match(
    supported: &[LanguageTag],
    preferred: &[LanguageTag],
    fallback: &LanguageTag,
) -> Option<LanguageTag> {
    let first = supported.first()?;

    let candidates: Vec<Candidate<'_>> = supported.iter().map(Candidate::new).collect();
    let wanted: Vec<Candidate<'_>> = preferred.iter().map(Candidate::new).collect();

    let default = closest(&candidates, &[Candidate::new(fallback)], Fit::Language).unwrap_or(first);

    let best = closest(&candidates, &wanted, Fit::Script)
        .or_else(|| closest(&candidates, &wanted, Fit::Language))
        .unwrap_or(default);

    Some(best.clone())
}

/// Extract a language tag from a POSIX locale string such as `en_US.UTF-8`.
///
/// Only the primary language subtag is kept.
pub fn parse_locale(locale: &str) -> std::result::Result<LanguageTag, LocaleError> {
    let unrecognized = || LocaleError::Unrecognized(locale.to_string());

    let caps = locale_regex().captures(locale.trim()).ok_or_else(unrecognized)?;
    let language = caps.get(1).ok_or_else(unrecognized)?.as_str();

    language.parse().map_err(|_| unrecognized())
}

/// Detect the process language using `lookup` to read variables.
///
/// The first variable of `vars` with a non-empty value decides.
pub fn detect_locale_from<F>(
    vars: &[&'static str],
    lookup: F,
) -> std::result::Result<LanguageTag, LocaleError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = vars
        .iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.trim().is_empty())
        .ok_or_else(|| LocaleError::NotSet(vars.to_vec()))?;

    parse_locale(&value)
}

/// Detect the language of the current process from its environment.
pub fn detect_locale_language(
    config: &RegistryConfig,
) -> std::result::Result<LanguageTag, LocaleError> {
    detect_locale_from(&config.locale_vars, |var| std::env::var(var).ok())
}

/// Detect the process language, substituting the configured fallback on failure.
///
/// Returns the tag and whether the fallback was used.
pub fn detect_or_fallback(config: &RegistryConfig) -> (LanguageTag, bool) {
    match detect_locale_language(config) {
        Ok(tag) => (tag, false),
        Err(e) => {
            warn!(
                "Locale detection failed ({}), using fallback language {}",
                e, config.fallback_language
            );
            (config.fallback_language.clone(), true)
        }
    }
}
