//! Registration priority for text packs.

use serde::{Deserialize, Serialize};

/// Merge precedence among registrations of the same pack.
///
/// Packages register their own texts with `Package`. Extra languages shipped
/// separately use `AdditionalPacks`, which never replaces a package text for a
/// language both define. `Override` is meant for applications that need to
/// replace a package's texts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    AdditionalPacks,
    #[default]
    Package,
    Override,
}
