//! Gallery records and the rules for naming them.
//!
//! A [`Record`] is created once, when a generation job finishes, and never
//! mutated afterwards. Remixing an existing record produces a brand new one
//! whose title points back at its origin.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::codec::ArtifactRef;
use crate::error::CoreError;
use crate::types::{RecordId, Timestamp};

/// Number of prompt characters kept in a synthesized "New:" title.
pub const TITLE_PROMPT_CHARS: usize = 40;

/// Why a generation run was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationContext {
    /// A fresh prompt typed by the user.
    New,
    /// An edited description of an existing record.
    Remix,
}

/// One entry of the gallery: an encoded video plus its metadata.
///
/// Fields are only readable; a record is never edited once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    id: RecordId,
    title: String,
    /// The exact prompt that produced the artifact; also the remix source.
    description: String,
    artifact: ArtifactRef,
    created_at: Timestamp,
}

impl Record {
    /// Build a record for a freshly generated artifact, stamped with a new
    /// id and the current time.
    pub fn create(
        prompt: &str,
        context: GenerationContext,
        origin_title: Option<&str>,
        artifact: ArtifactRef,
    ) -> Self {
        Self::with_timestamp(prompt, context, origin_title, artifact, Utc::now())
    }

    /// Same as [`create`](Self::create) with an explicit creation time.
    pub fn with_timestamp(
        prompt: &str,
        context: GenerationContext,
        origin_title: Option<&str>,
        artifact: ArtifactRef,
        created_at: Timestamp,
    ) -> Self {
        Self::new(
            synthesize_title(prompt, context, origin_title),
            prompt,
            artifact,
            created_at,
        )
    }

    /// Build a record with an already chosen title and a fresh id.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        artifact: ArtifactRef,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: RecordId::new_v4(),
            title: title.into(),
            description: description.into(),
            artifact,
            created_at,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn artifact(&self) -> &ArtifactRef {
        &self.artifact
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Derive a display title for a new record.
///
/// Remixes are named after their origin; anything else gets a `New:` title
/// built from the first [`TITLE_PROMPT_CHARS`] characters of the prompt.
pub fn synthesize_title(
    prompt: &str,
    context: GenerationContext,
    origin_title: Option<&str>,
) -> String {
    match (context, origin_title) {
        (GenerationContext::Remix, Some(origin)) => format!("Remix of \"{origin}\""),
        _ => {
            let head: String = prompt.chars().take(TITLE_PROMPT_CHARS).collect();
            format!("New: \"{head}...\"")
        }
    }
}

/// Trim a prompt and reject it when nothing is left.
pub fn normalize_prompt(prompt: &str) -> Result<&str, CoreError> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Prompt must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
