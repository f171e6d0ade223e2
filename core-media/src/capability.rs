//! # Capability Descriptor
//!
//! The fixed media-control surface every renderer exposes, modelled on the
//! HTML5 media element API: properties (get/set or get-only), imperative
//! methods, the event vocabulary, and the media types the core knows how to
//! infer from file extensions.
//!
//! The descriptor is pure data. [`MediaElement`](crate::MediaElement) builds
//! its forwarding surface from [`PROPERTIES`], and renderers implement the
//! matching [`Renderer`](crate::Renderer) contract.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::source::MediaSource;

// ============================================================================
// Properties
// ============================================================================

/// Media element properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaProperty {
    Volume,
    Src,
    CurrentTime,
    Muted,
    Duration,
    Paused,
    Ended,
    Error,
    CurrentSrc,
    NetworkState,
    Preload,
    Buffered,
    BufferedBytes,
    BufferedTime,
    ReadyState,
    Seeking,
    InitialTime,
    StartOffsetTime,
    DefaultPlaybackRate,
    PlaybackRate,
    Played,
    Seekable,
    Autoplay,
    Loop,
    Controls,
}

/// Whether a property accepts writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    ReadOnly,
}

/// One row of the property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub property: MediaProperty,
    /// DOM-style name (`currentTime`, `readyState`, ...).
    pub name: &'static str,
    pub access: Access,
}

const fn rw(property: MediaProperty, name: &'static str) -> PropertyDescriptor {
    PropertyDescriptor {
        property,
        name,
        access: Access::ReadWrite,
    }
}

const fn ro(property: MediaProperty, name: &'static str) -> PropertyDescriptor {
    PropertyDescriptor {
        property,
        name,
        access: Access::ReadOnly,
    }
}

/// Every property a renderer must answer, in declaration order.
pub static PROPERTIES: &[PropertyDescriptor] = &[
    // get/set
    MediaProperty::Volume.descriptor(),
    MediaProperty::Src.descriptor(),
    MediaProperty::CurrentTime.descriptor(),
    MediaProperty::Muted.descriptor(),
    // get only
    MediaProperty::Duration.descriptor(),
    MediaProperty::Paused.descriptor(),
    MediaProperty::Ended.descriptor(),
    // others
    MediaProperty::Error.descriptor(),
    MediaProperty::CurrentSrc.descriptor(),
    MediaProperty::NetworkState.descriptor(),
    MediaProperty::Preload.descriptor(),
    MediaProperty::Buffered.descriptor(),
    MediaProperty::BufferedBytes.descriptor(),
    MediaProperty::BufferedTime.descriptor(),
    MediaProperty::ReadyState.descriptor(),
    MediaProperty::Seeking.descriptor(),
    MediaProperty::InitialTime.descriptor(),
    MediaProperty::StartOffsetTime.descriptor(),
    MediaProperty::DefaultPlaybackRate.descriptor(),
    MediaProperty::PlaybackRate.descriptor(),
    MediaProperty::Played.descriptor(),
    MediaProperty::Seekable.descriptor(),
    MediaProperty::Autoplay.descriptor(),
    MediaProperty::Loop.descriptor(),
    MediaProperty::Controls.descriptor(),
];

impl MediaProperty {
    /// Table row for this property.
    pub const fn descriptor(self) -> PropertyDescriptor {
        match self {
            Self::Volume => rw(self, "volume"),
            Self::Src => rw(self, "src"),
            Self::CurrentTime => rw(self, "currentTime"),
            Self::Muted => rw(self, "muted"),
            Self::Duration => ro(self, "duration"),
            Self::Paused => ro(self, "paused"),
            Self::Ended => ro(self, "ended"),
            Self::Error => ro(self, "error"),
            Self::CurrentSrc => ro(self, "currentSrc"),
            Self::NetworkState => ro(self, "networkState"),
            Self::Preload => rw(self, "preload"),
            Self::Buffered => ro(self, "buffered"),
            Self::BufferedBytes => ro(self, "bufferedBytes"),
            Self::BufferedTime => ro(self, "bufferedTime"),
            Self::ReadyState => ro(self, "readyState"),
            Self::Seeking => ro(self, "seeking"),
            Self::InitialTime => ro(self, "initialTime"),
            Self::StartOffsetTime => ro(self, "startOffsetTime"),
            Self::DefaultPlaybackRate => rw(self, "defaultPlaybackRate"),
            Self::PlaybackRate => rw(self, "playbackRate"),
            Self::Played => ro(self, "played"),
            Self::Seekable => ro(self, "seekable"),
            Self::Autoplay => rw(self, "autoplay"),
            Self::Loop => rw(self, "loop"),
            Self::Controls => rw(self, "controls"),
        }
    }

    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub const fn access(self) -> Access {
        self.descriptor().access
    }

    pub fn is_settable(self) -> bool {
        self.access() == Access::ReadWrite
    }

    /// Look a property up by its DOM-style name.
    pub fn from_name(name: &str) -> Option<Self> {
        PROPERTIES
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.property)
    }
}

impl fmt::Display for MediaProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Methods
// ============================================================================

/// Imperative media methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaMethod {
    Load,
    Play,
    Pause,
    CanPlayType,
}

pub static METHODS: &[MediaMethod] = &[
    MediaMethod::Load,
    MediaMethod::Play,
    MediaMethod::Pause,
    MediaMethod::CanPlayType,
];

impl MediaMethod {
    pub fn name(self) -> &'static str {
        match self {
            MediaMethod::Load => "load",
            MediaMethod::Play => "play",
            MediaMethod::Pause => "pause",
            MediaMethod::CanPlayType => "canPlayType",
        }
    }
}

// ============================================================================
// Events & Media Types
// ============================================================================

/// Event types renderers emit and elements re-dispatch.
pub static EVENTS: &[&str] = &[
    "loadstart",
    "progress",
    "suspend",
    "abort",
    "error",
    "emptied",
    "stalled",
    "play",
    "pause",
    "loadedmetadata",
    "loadeddata",
    "waiting",
    "playing",
    "canplay",
    "canplaythrough",
    "seeking",
    "seeked",
    "timeupdate",
    "ended",
    "ratechange",
    "durationchange",
    "volumechange",
];

/// MIME types the core infers from file extensions.
pub static MEDIA_TYPES: &[&str] = &[
    "audio/mp3",
    "audio/ogg",
    "audio/oga",
    "audio/wav",
    "audio/mpeg",
    "video/mp4",
    "video/webm",
    "video/ogg",
];

pub fn is_media_event(event_type: &str) -> bool {
    EVENTS.contains(&event_type)
}

// ============================================================================
// Values
// ============================================================================

/// A time interval in seconds, as reported by `buffered`/`played`/`seekable`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

/// Property value exchanged with renderers.
///
/// `Null` is the neutral answer: what an element returns with no active
/// renderer, and what a renderer returns for a property it cannot support.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MediaValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Sources(Vec<MediaSource>),
    Ranges(Vec<TimeRange>),
}

impl MediaValue {
    pub fn is_null(&self) -> bool {
        matches!(self, MediaValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MediaValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MediaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MediaValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for MediaValue {
    fn from(value: bool) -> Self {
        MediaValue::Bool(value)
    }
}

impl From<f64> for MediaValue {
    fn from(value: f64) -> Self {
        MediaValue::Number(value)
    }
}

impl From<&str> for MediaValue {
    fn from(value: &str) -> Self {
        MediaValue::Text(value.to_string())
    }
}

impl From<String> for MediaValue {
    fn from(value: String) -> Self {
        MediaValue::Text(value)
    }
}

impl From<Vec<MediaSource>> for MediaValue {
    fn from(value: Vec<MediaSource>) -> Self {
        MediaValue::Sources(value)
    }
}

impl From<Vec<TimeRange>> for MediaValue {
    fn from(value: Vec<TimeRange>) -> Self {
        MediaValue::Ranges(value)
    }
}

impl<T: Into<MediaValue>> From<Option<T>> for MediaValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(MediaValue::Null, Into::into)
    }
}

/// Confidence answer of `canPlayType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanPlay {
    /// Empty string: cannot play.
    #[default]
    No,
    Maybe,
    Probably,
}

impl CanPlay {
    /// `true` for any non-empty answer.
    pub fn is_playable(self) -> bool {
        self != CanPlay::No
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CanPlay::No => "",
            CanPlay::Maybe => "maybe",
            CanPlay::Probably => "probably",
        }
    }
}

impl fmt::Display for CanPlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
