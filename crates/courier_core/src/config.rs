//! Externally-owned configuration records consumed read-only by the engine.
//!
//! Validation and persistence of these documents belong to the host
//! application; a run receives them fully populated.

use crate::plan::{plan, InvalidRangeError, RangePlan};

/// Immutable description of one forwarding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSpec {
    pub source_channel_id: i64,
    pub destination_channel_id: i64,
    /// Upper bound of the message-id range, inclusive. Must be positive.
    pub last_message_id: i64,
    /// Positive: the range starts at exactly this id. Negative: the start is
    /// counted back from `last_message_id`, clamped to 1. Zero: start at 1.
    pub skip_count: i64,
}

impl JobSpec {
    /// Computes the inclusive id range this spec covers.
    pub fn plan(&self) -> Result<RangePlan, InvalidRangeError> {
        plan(self.last_message_id, self.skip_count)
    }
}

/// One ordered caption rewrite rule. `from` is treated as a case-insensitive
/// regular expression; patterns that fail to compile degrade to plain
/// substring replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReplacementRule {
    pub from: String,
    pub to: String,
}

/// Caption rewrite configuration. Every field is independently optional;
/// leaving one empty/false disables that stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptionRules {
    pub remove_links: bool,
    pub remove_usernames: bool,
    pub remove_emojis: bool,
    /// Deleted wherever they occur, case-insensitively.
    pub remove_words: Vec<String>,
    /// Applied in order; later rules see the output of earlier ones.
    pub replacements: Vec<ReplacementRule>,
    /// Characters deleted from the caption.
    pub symbols_to_remove: String,
    /// Characters replaced with a single space.
    pub symbols_to_replace: String,
    /// Optional caption template. The original caption survives only if the
    /// template contains `{default_caption}`.
    pub template: String,
    pub custom_languages: Vec<String>,
    pub custom_qualities: Vec<String>,
    pub prefix: String,
    pub suffix: String,
    pub single_line_space: bool,
    /// Inline keyboard spec, one `[Text](url)` per button, `|` between
    /// columns and newlines between rows.
    pub buttons: String,
}

impl CaptionRules {
    /// Whether any caption-affecting field is set. When false a copy keeps
    /// whatever caption the platform carries over.
    pub fn is_active(&self) -> bool {
        self.remove_links
            || self.remove_usernames
            || self.remove_emojis
            || self.single_line_space
            || !self.remove_words.is_empty()
            || !self.replacements.is_empty()
            || !self.symbols_to_remove.is_empty()
            || !self.symbols_to_replace.is_empty()
            || !self.template.is_empty()
            || !self.prefix.is_empty()
            || !self.suffix.is_empty()
    }
}

/// Kind of content carried by a message, as far as the copy path cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Document,
    Text,
    Sticker,
    Photo,
    Audio,
    Voice,
    Animation,
}

/// Per-kind forwarding toggles. A disabled kind is skipped locally without
/// attempting the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentFilters {
    pub video: bool,
    pub document: bool,
    pub text: bool,
    pub stickers: bool,
    pub photos: bool,
    pub audio: bool,
    pub voice: bool,
    pub animation: bool,
}

impl ContentFilters {
    pub fn allows(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Video => self.video,
            MediaKind::Document => self.document,
            MediaKind::Text => self.text,
            MediaKind::Sticker => self.stickers,
            MediaKind::Photo => self.photos,
            MediaKind::Audio => self.audio,
            MediaKind::Voice => self.voice,
            MediaKind::Animation => self.animation,
        }
    }
}

impl Default for ContentFilters {
    fn default() -> Self {
        // Forward everything unless the user opts a kind out.
        Self {
            video: true,
            document: true,
            text: true,
            stickers: true,
            photos: true,
            audio: true,
            voice: true,
            animation: true,
        }
    }
}

/// File-size window in megabytes. Zero means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeLimits {
    pub min_mb: u64,
    pub max_mb: u64,
}

/// Local skip policy applied before a copy is attempted, when message
/// metadata happens to be available.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterConfig {
    pub content: ContentFilters,
    pub size: SizeLimits,
    /// A caption containing any of these phrases (case-insensitive) is skipped.
    pub blacklist_phrases: Vec<String>,
}
