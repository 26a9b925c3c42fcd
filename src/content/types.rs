use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET chapters`
#[derive(Debug, Clone, Deserialize)]
pub struct ChaptersResponse {
    pub chapters: Vec<Value>,
}

/// `GET resources/recitations`
#[derive(Debug, Clone, Deserialize)]
pub struct RecitationsResponse {
    pub recitations: Vec<Value>,
}

/// `GET foot_notes/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct FootNoteResponse {
    pub foot_note: Value,
}

/// `GET verses/by_chapter/{chapter}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersesResponse {
    pub verses: Vec<Verse>,
    #[serde(default)]
    pub pagination: VersePagination,
}

/// A verse as far as the gateway cares; every other upstream field is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    pub id: u64,
    /// position inside the chapter, 0 is the opening invocation
    pub verse_number: u32,
    #[serde(default)]
    pub verse_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<VerseAudio>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Verse {
    /// Relative or absolute media url, if the verse has playable audio.
    pub fn audio_url(&self) -> Option<&str> {
        self.audio
            .as_ref()
            .map(|audio| audio.url.as_str())
            .filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseAudio {
    pub url: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub segments: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersePagination {
    pub per_page: u32,
    pub current_page: u32,
    pub next_page: Option<u32>,
    pub total_pages: u32,
    pub total_records: u32,
}
