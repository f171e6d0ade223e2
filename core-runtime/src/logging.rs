//! # Logging
//!
//! `tracing` setup shared by every crate in the workspace.
//!
//! [`init_logging`] installs one global subscriber made of an [`EnvFilter`],
//! a formatting layer (pretty, JSON or compact) and, when a host
//! [`LoggerSink`] is configured, a layer mirroring each surviving event to the
//! host as a [`LogEntry`].
//!
//! Media URLs should pass through [`redact_url`] before they are recorded.
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! init_logging(
//!     LoggingConfig::default()
//!         .with_format(LogFormat::Compact)
//!         .with_filter("core_media=debug"),
//! )?;
//! tracing::info!(element = "player1", "Media element created");
//! ```

use crate::error::{Error, Result};

use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Crates whose events pass at the configured level when no custom filter is
/// given. Everything else is held to `warn`.
const WORKSPACE_TARGETS: &[&str] = &[
    "mediaproxy_workspace",
    "bridge_headless",
    "core_runtime",
    "core_media",
];

static REDACT_URLS: AtomicBool = AtomicBool::new(true);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored.
    Pretty,
    /// One JSON object per event, fields flattened.
    Json,
    /// Single-line text.
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Options for [`init_logging`].
#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level applied to workspace crates when `filter` is unset.
    pub level: LogLevel,
    /// `EnvFilter` directives, e.g. `"warn,core_media=trace"`. Overrides `level`.
    pub filter: Option<String>,
    pub redact_urls: bool,
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Emit span enter/exit records (pretty) or span context (JSON).
    pub enable_spans: bool,
    pub display_target: bool,
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            redact_urls: true,
            logger_sink: None,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("filter", &self.filter)
            .field("redact_urls", &self.redact_urls)
            .field("logger_sink", &self.logger_sink.is_some())
            .field("enable_spans", &self.enable_spans)
            .field("display_target", &self.display_target)
            .field("display_thread_info", &self.display_thread_info)
            .finish()
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Replace the default per-crate directives.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_url_redaction(mut self, redact: bool) -> Self {
        self.redact_urls = redact;
        self
    }

    /// Mirror events to a host logger.
    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }

    /// Directive string handed to [`EnvFilter`].
    fn directives(&self) -> String {
        if let Some(filter) = &self.filter {
            return filter.clone();
        }

        let level = level_directive(self.level);
        std::iter::once("warn".to_string())
            .chain(WORKSPACE_TARGETS.iter().map(|target| format!("{}={}", target, level)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// [`Error::Config`] when the filter does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    REDACT_URLS.store(config.redact_urls, Ordering::Relaxed);

    let span_events = if config.enable_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let (pretty, json, compact) = match config.format {
        LogFormat::Pretty => (
            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info)
                    .with_span_events(span_events),
            ),
            None,
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(config.enable_spans)
                    .with_span_list(false)
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info),
            ),
            None,
        ),
        LogFormat::Compact => (
            None,
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(config.display_target)
                    .with_thread_ids(config.display_thread_info)
                    .with_thread_names(config.display_thread_info),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(compact)
        .with(config.logger_sink.map(HostLogLayer::new))
        .try_init()
        .map_err(|e| Error::Config(format!("Logging already initialized: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = config.directives();
    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("Invalid log filter {:?}: {}", directives, e)))
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

fn host_level(level: &Level) -> LogLevel {
    match *level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        Level::INFO => LogLevel::Info,
        Level::DEBUG => LogLevel::Debug,
        Level::TRACE => LogLevel::Trace,
    }
}

/// Forwards events at or above the sink's `min_level` to the host.
struct HostLogLayer {
    sink: Arc<dyn LoggerSink>,
}

impl HostLogLayer {
    fn new(sink: Arc<dyn LoggerSink>) -> Self {
        Self { sink }
    }
}

impl<S> Layer<S> for HostLogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = host_level(metadata.level());
        if level < self.sink.min_level() {
            return;
        }

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let message = fields
            .message
            .take()
            .unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);
        entry.fields = fields.values;
        entry.span = ctx.event_span(event).map(|span| span.name().to_string());

        if let Err(err) = self.sink.log(entry) {
            // Never log through tracing from inside this layer.
            eprintln!("host logger rejected entry: {}", err);
        }
    }
}

/// Renders every event field to a string.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    values: BTreeMap<String, String>,
}

impl FieldCollector {
    fn push(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{:?}", value));
    }
}

/// Strip the query string and fragment from a media URL before it is logged.
///
/// Signed CDN URLs keep their tokens there. The path is kept and `?…` marks
/// the cut. Returns `url` unchanged once [`init_logging`] ran with
/// [`LoggingConfig::with_url_redaction`]`(false)`.
///
/// ```ignore
/// tracing::debug!(src = %redact_url("https://cdn.example.com/a.mp4?sig=abc"), "Source selected");
/// // src=https://cdn.example.com/a.mp4?…
/// ```
pub fn redact_url(url: &str) -> String {
    if !REDACT_URLS.load(Ordering::Relaxed) {
        return url.to_string();
    }

    match url.find(['?', '#']) {
        Some(cut) => format!("{}?…", &url[..cut]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::Result as BridgeResult;
    use parking_lot::Mutex;

    struct CollectingSink {
        min_level: LogLevel,
        entries: Mutex<Vec<LogEntry>>,
    }

    impl CollectingSink {
        fn at(min_level: LogLevel) -> Arc<Self> {
            Arc::new(Self {
                min_level,
                entries: Mutex::new(Vec::new()),
            })
        }
    }

    impl LoggerSink for CollectingSink {
        fn log(&self, entry: LogEntry) -> BridgeResult<()> {
            self.entries.lock().push(entry);
            Ok(())
        }

        fn min_level(&self) -> LogLevel {
            self.min_level
        }
    }

    #[test]
    fn test_default_directives_cover_workspace_crates() {
        let directives = LoggingConfig::default()
            .with_level(LogLevel::Debug)
            .directives();

        assert!(directives.starts_with("warn,"));
        for target in WORKSPACE_TARGETS {
            assert!(directives.contains(&format!("{}=debug", target)));
        }
    }

    #[test]
    fn test_custom_filter_replaces_defaults() {
        let config = LoggingConfig::default()
            .with_level(LogLevel::Trace)
            .with_filter("core_media=trace");

        assert_eq!(config.directives(), "core_media=trace");
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let config = LoggingConfig::default().with_filter("core_media=loudest");
        assert!(matches!(build_filter(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_sets_every_field() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_url_redaction(false)
            .with_spans(false)
            .with_target(false)
            .with_thread_info(true)
            .with_logger_sink(CollectingSink::at(LogLevel::Info));

        assert_eq!(config.format, LogFormat::Compact);
        assert!(!config.redact_urls);
        assert!(!config.enable_spans);
        assert!(!config.display_target);
        assert!(config.display_thread_info);
        assert!(format!("{:?}", config).contains("logger_sink: true"));
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("https://cdn.example.com/a.mp4?token=secret"),
            "https://cdn.example.com/a.mp4?…"
        );
        assert_eq!(redact_url("media/clip.webm#t=10"), "media/clip.webm?…");
        assert_eq!(redact_url("media/clip.webm"), "media/clip.webm");
    }

    #[test]
    fn test_host_layer_copies_fields_and_span() {
        let sink = CollectingSink::at(LogLevel::Debug);
        let subscriber = tracing_subscriber::registry().with(HostLogLayer::new(sink.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let span = tracing::info_span!("set_src");
        span.in_scope(|| {
            tracing::info!(target: "core_media::element", renderer = "html5", "Renderer created");
        });
        tracing::trace!("dropped");

        let entries = sink.entries.lock();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].target, "core_media::element");
        assert_eq!(entries[0].message, "Renderer created");
        assert_eq!(entries[0].fields.get("renderer").map(String::as_str), Some("html5"));
        assert_eq!(entries[0].span.as_deref(), Some("set_src"));
    }
}
