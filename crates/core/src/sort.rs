//! View ordering for the gallery.
//!
//! [`SortKey`] is the user's selected ordering. It is persisted as one of
//! the stable strings `date-desc`, `date-asc`, `title-asc`, `title-desc`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::Record;

/// Sort by creation time, newest first.
pub const SORT_DATE_DESC: &str = "date-desc";
/// Sort by creation time, oldest first.
pub const SORT_DATE_ASC: &str = "date-asc";
/// Sort by title, A to Z.
pub const SORT_TITLE_ASC: &str = "title-asc";
/// Sort by title, Z to A.
pub const SORT_TITLE_DESC: &str = "title-desc";

/// All valid persisted sort strings.
pub const VALID_SORT_KEYS: &[&str] = &[SORT_DATE_DESC, SORT_DATE_ASC, SORT_TITLE_ASC, SORT_TITLE_DESC];

/// User-selected ordering of the gallery view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "date-desc")]
    CreatedDesc,
    #[serde(rename = "date-asc")]
    CreatedAsc,
    #[serde(rename = "title-asc")]
    TitleAsc,
    #[serde(rename = "title-desc")]
    TitleDesc,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::CreatedDesc => SORT_DATE_DESC,
            SortKey::CreatedAsc => SORT_DATE_ASC,
            SortKey::TitleAsc => SORT_TITLE_ASC,
            SortKey::TitleDesc => SORT_TITLE_DESC,
        }
    }

    /// Compare two records under this key. Equal keys compare `Equal` so a
    /// stable sort keeps their stored order.
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::CreatedDesc => b.created_at().cmp(&a.created_at()),
            SortKey::CreatedAsc => a.created_at().cmp(&b.created_at()),
            SortKey::TitleAsc => collate(a.title(), b.title()),
            SortKey::TitleDesc => collate(b.title(), a.title()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SORT_DATE_DESC => Ok(SortKey::CreatedDesc),
            SORT_DATE_ASC => Ok(SortKey::CreatedAsc),
            SORT_TITLE_ASC => Ok(SortKey::TitleAsc),
            SORT_TITLE_DESC => Ok(SortKey::TitleDesc),
            other => Err(CoreError::Validation(format!(
                "Invalid sort order '{other}'. Must be one of: {}",
                VALID_SORT_KEYS.join(", ")
            ))),
        }
    }
}

/// Root-locale collator at the default (tertiary) strength.
static TITLE_COLLATOR: LazyLock<CollatorBorrowed<'static>> = LazyLock::new(|| {
    Collator::try_new(CollatorPreferences::default(), CollatorOptions::default())
        .expect("compiled root collation data")
});

/// Locale-aware string comparison for titles.
///
/// Uses the Unicode Collation Algorithm with root-locale data: accents and
/// case only break ties between otherwise equal letters, so `apple`,
/// `Éclair` and `Zebra` sort in that order. Strings that differ only in
/// case order lowercase first.
pub fn collate(a: &str, b: &str) -> Ordering {
    TITLE_COLLATOR.compare(a, b)
}
