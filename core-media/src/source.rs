//! # Source Resolution
//!
//! Normalizes whatever a caller assigns to `src` into an ordered list of
//! [`MediaSource`] candidates.
//!
//! ## Rules
//!
//! - A single URL becomes one source whose type is inferred from the file
//!   extension. The URL is kept as given.
//! - A list keeps its order. Each URL is resolved against the document
//!   location, and a blank type is inferred from the extension.
//!
//! ```rust
//! use core_media::source::{infer_type, SourceInput, SourceResolver};
//!
//! let resolver = SourceResolver::new(Some("http://localhost/demo/"));
//! let sources = resolver.resolve(&SourceInput::from("clip.webm"));
//!
//! assert_eq!(sources[0].src, "clip.webm");
//! assert_eq!(sources[0].mime_type, "video/webm");
//! assert_eq!(infer_type("song.mp3?t=1"), "audio/mp3");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::capability::MediaValue;
use crate::error::{MediaError, Result};

/// Extension to MIME type, for the types in
/// [`MEDIA_TYPES`](crate::capability::MEDIA_TYPES).
const EXTENSION_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("webmv", "video/webm"),
    ("ogv", "video/ogg"),
    ("ogg", "video/ogg"),
    ("oga", "audio/oga"),
    ("mp3", "audio/mp3"),
    ("mpga", "audio/mpeg"),
    ("wav", "audio/wav"),
];

/// A candidate media resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    pub src: String,
    /// MIME type; empty when unknown.
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

impl MediaSource {
    pub fn new(src: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Value accepted by `src` assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceInput {
    Url(String),
    List(Vec<MediaSource>),
}

impl From<&str> for SourceInput {
    fn from(value: &str) -> Self {
        SourceInput::Url(value.to_string())
    }
}

impl From<String> for SourceInput {
    fn from(value: String) -> Self {
        SourceInput::Url(value)
    }
}

impl From<Vec<MediaSource>> for SourceInput {
    fn from(value: Vec<MediaSource>) -> Self {
        SourceInput::List(value)
    }
}

impl From<&[MediaSource]> for SourceInput {
    fn from(value: &[MediaSource]) -> Self {
        SourceInput::List(value.to_vec())
    }
}

impl TryFrom<MediaValue> for SourceInput {
    type Error = MediaError;

    fn try_from(value: MediaValue) -> Result<Self> {
        match value {
            MediaValue::Text(url) => Ok(SourceInput::Url(url)),
            MediaValue::Sources(list) => Ok(SourceInput::List(list)),
            other => Err(MediaError::InvalidSource(format!("{:?}", other))),
        }
    }
}

/// Resolves source input against a document location.
#[derive(Debug, Clone, Default)]
pub struct SourceResolver {
    base: Option<Url>,
}

impl SourceResolver {
    /// Create a resolver for a document at `location`.
    ///
    /// An unparseable location is treated as absent.
    pub fn new(location: Option<&str>) -> Self {
        let base = location.and_then(|loc| match Url::parse(loc) {
            Ok(url) => Some(url),
            Err(err) => {
                debug!(location = loc, error = %err, "Ignoring unparseable document location");
                None
            }
        });
        Self { base }
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Normalize `input` into an ordered candidate list.
    pub fn resolve(&self, input: &SourceInput) -> Vec<MediaSource> {
        match input {
            SourceInput::Url(url) => vec![MediaSource::new(url.clone(), infer_type(url))],
            SourceInput::List(list) => list
                .iter()
                .map(|source| {
                    let src = self.absolutize(&source.src);
                    let mime_type = if source.mime_type.trim().is_empty() {
                        infer_type(&src)
                    } else {
                        source.mime_type.clone()
                    };
                    MediaSource::new(src, mime_type)
                })
                .collect(),
        }
    }

    /// Resolve `url` against the document location.
    ///
    /// Absolute URLs and URLs that cannot be resolved are returned unchanged.
    pub fn absolutize(&self, url: &str) -> String {
        if url.is_empty() || Url::parse(url).is_ok() {
            return url.to_string();
        }

        match &self.base {
            Some(base) => base
                .join(url)
                .map(|joined| joined.to_string())
                .unwrap_or_else(|_| url.to_string()),
            None => url.to_string(),
        }
    }
}

/// Infer a MIME type from the extension of `url`.
///
/// Query strings and fragments are ignored. Returns an empty string for
/// unknown or missing extensions.
pub fn infer_type(url: &str) -> String {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();

    let Some((_, extension)) = file.rsplit_once('.') else {
        return String::new();
    };
    let extension = extension.to_ascii_lowercase();

    EXTENSION_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| (*mime).to_string())
        .unwrap_or_default()
}

/// Normalize a declared type, inferring it from `url` when blank.
///
/// Codec parameters are dropped: `video/mp4; codecs="avc1"` becomes `video/mp4`.
pub fn format_type(url: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim).filter(|t| !t.is_empty()) {
        Some(mime) => mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        None => infer_type(url),
    }
}
