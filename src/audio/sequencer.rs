use tracing::debug;

use crate::content::types::Verse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What the player should load next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackItem {
    pub verse_id: u64,
    pub verse_number: u32,
    pub verse_key: String,
    pub url: String,
}

/// Sequential verse playback.
///
/// Tracks the ordered verse list of a chapter and the verse being played.
/// When a verse ends, playback continues with the next verse that has
/// playable media and stops once the list is exhausted. Media I/O is not
/// handled here; callers load the returned [`PlaybackItem`].
#[derive(Debug, Clone)]
pub struct AudioSequencer {
    base_url: String,
    verses: Vec<Verse>,
    current: Option<usize>,
    status: PlaybackStatus,
    position_secs: f64,
    duration_secs: f64,
    volume: f32,
}

impl AudioSequencer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            verses: Vec::new(),
            current: None,
            status: PlaybackStatus::Stopped,
            position_secs: 0.0,
            duration_secs: 0.0,
            volume: 1.0,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current(&self) -> Option<&Verse> {
        self.current.and_then(|index| self.verses.get(index))
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Replaces the verse list. The current verse survives only if a verse
    /// with the same number is still present.
    pub fn set_verses(&mut self, verses: Vec<Verse>) {
        let current_number = self.current().map(|verse| verse.verse_number);
        self.verses = verses;
        self.current = current_number.and_then(|number| self.index_of(number));
        if self.current.is_none() && self.status != PlaybackStatus::Stopped {
            self.stop();
        }
    }

    /// Starts the verse with the given number. Verses without audio are not
    /// playable and leave the state untouched.
    pub fn play(&mut self, verse_number: u32) -> Option<PlaybackItem> {
        let index = self.index_of(verse_number)?;
        self.start(index)
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == PlaybackStatus::Paused && self.current.is_some() {
            self.status = PlaybackStatus::Playing;
        }
    }

    pub fn stop(&mut self) {
        self.current = None;
        self.status = PlaybackStatus::Stopped;
        self.position_secs = 0.0;
        self.duration_secs = 0.0;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Only meaningful while a verse is loaded.
    pub fn seek(&mut self, position_secs: f64) {
        if self.current.is_some() {
            self.position_secs = position_secs.max(0.0);
        }
    }

    /// Media metadata became available for the current verse.
    pub fn loaded(&mut self, duration_secs: f64) {
        self.duration_secs = duration_secs.max(0.0);
    }

    pub fn progress(&mut self, position_secs: f64) {
        self.position_secs = position_secs.max(0.0);
    }

    /// The current verse finished playing naturally.
    pub fn on_ended(&mut self) -> Option<PlaybackItem> {
        self.play_next()
    }

    /// Advances to the next playable verse, or stops at the end of the list.
    pub fn play_next(&mut self) -> Option<PlaybackItem> {
        let current_number = self.current()?.verse_number;
        let next = self
            .next_candidate(current_number)
            .and_then(|from| (from..self.verses.len()).find(|&i| self.verses[i].audio_url().is_some()));

        match next {
            Some(index) => self.start(index),
            None => {
                debug!("end of verse list reached after verse {}", current_number);
                self.stop();
                None
            }
        }
    }

    fn next_candidate(&self, current_number: u32) -> Option<usize> {
        // the opening invocation is prepended as verse 0 and continues at verse 1
        if current_number == 0 {
            return self.index_of(1);
        }
        self.index_of(current_number).map(|index| index + 1)
    }

    fn start(&mut self, index: usize) -> Option<PlaybackItem> {
        let verse = self.verses.get(index)?;
        let url = self.media_url(verse.audio_url()?);
        let item = PlaybackItem {
            verse_id: verse.id,
            verse_number: verse.verse_number,
            verse_key: verse.verse_key.clone(),
            url,
        };

        self.current = Some(index);
        self.status = PlaybackStatus::Playing;
        self.position_secs = 0.0;
        self.duration_secs = 0.0;
        debug!("playing verse {} from {}", item.verse_number, item.url);
        Some(item)
    }

    fn index_of(&self, verse_number: u32) -> Option<usize> {
        self.verses.iter().position(|verse| verse.verse_number == verse_number)
    }

    fn media_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//") {
            url.to_owned()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), url.trim_start_matches('/'))
        }
    }
}
