//! # Element Configuration
//!
//! Options recognized by [`MediaElement`](crate::MediaElement). Options are
//! plain serde data so hosts can pass them as JSON; unknown keys are kept in
//! [`MediaElementOptions::extra`] and travel to renderers untouched.
//!
//! ```rust
//! use core_media::MediaElementOptions;
//!
//! let options = MediaElementOptions::from_json(
//!     r#"{ "renderers": ["html5"], "fakeNodeName": "media-wrapper", "youtube": { "quality": "hd" } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(options.renderers, vec!["html5".to_string()]);
//! assert!(options.extra.contains_key("youtube"));
//! ```

use bridge_traits::HostNode;
use core_runtime::EventStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::element::MediaElement;
use crate::error::{MediaError, Result};
use crate::renderer::RendererOptions;

/// Invoked once construction is complete, with the element and the host
/// node it was built around.
pub type SuccessCallback = Arc<dyn Fn(&mut MediaElement, Option<&Arc<dyn HostNode>>)>;

/// Media element options.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaElementOptions {
    /// Renderer preference list. Empty means every registered renderer, in
    /// registration order.
    #[serde(default)]
    pub renderers: Vec<String>,

    /// Tag name of the wrapper node created around the host element.
    ///
    /// Default: `"mediaelementwrapper"`.
    #[serde(default = "default_fake_node_name")]
    pub fake_node_name: String,

    /// Base path renderers use to locate plugin assets.
    ///
    /// Default: `"build/"`.
    #[serde(default = "default_plugin_path")]
    pub plugin_path: String,

    /// How element events are delivered.
    #[serde(default)]
    pub event_strategy: EventStrategy,

    /// Renderer-specific options, passed through as-is.
    #[serde(flatten)]
    pub extra: RendererOptions,

    #[serde(skip)]
    pub success: Option<SuccessCallback>,
}

fn default_fake_node_name() -> String {
    "mediaelementwrapper".to_string()
}

fn default_plugin_path() -> String {
    "build/".to_string()
}

impl Default for MediaElementOptions {
    fn default() -> Self {
        Self {
            renderers: Vec::new(),
            fake_node_name: default_fake_node_name(),
            plugin_path: default_plugin_path(),
            event_strategy: EventStrategy::default(),
            extra: RendererOptions::new(),
            success: None,
        }
    }
}

impl MediaElementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON, applying defaults for missing keys.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_renderers<I, S>(mut self, renderers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.renderers = renderers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fake_node_name(mut self, name: impl Into<String>) -> Self {
        self.fake_node_name = name.into();
        self
    }

    pub fn with_plugin_path(mut self, path: impl Into<String>) -> Self {
        self.plugin_path = path.into();
        self
    }

    pub fn with_event_strategy(mut self, strategy: EventStrategy) -> Self {
        self.event_strategy = strategy;
        self
    }

    /// Add a pass-through option.
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn with_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut MediaElement, Option<&Arc<dyn HostNode>>) + 'static,
    {
        self.success = Some(Arc::new(callback));
        self
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        if self.fake_node_name.is_empty() {
            return Err(MediaError::InvalidConfig(
                "Wrapper node name cannot be empty".to_string(),
            ));
        }

        if !self
            .fake_node_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(MediaError::InvalidConfig(format!(
                "Wrapper node name is not a valid tag name: {}",
                self.fake_node_name
            )));
        }

        for (index, name) in self.renderers.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(MediaError::InvalidConfig(format!(
                    "Renderer name at position {} is empty",
                    index
                )));
            }
            if self.renderers[..index].contains(name) {
                return Err(MediaError::InvalidConfig(format!(
                    "Renderer listed twice: {}",
                    name
                )));
            }
        }

        Ok(())
    }

    /// The options as a free-form map, as handed to renderers.
    pub fn to_renderer_options(&self) -> Result<RendererOptions> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(MediaError::InvalidConfig(
                "Options did not serialize to an object".to_string(),
            )),
        }
    }

    /// Element options merged with a renderer's declared defaults. Renderer
    /// defaults win on key collisions.
    pub fn merged_with(&self, renderer_defaults: &RendererOptions) -> Result<RendererOptions> {
        let mut merged = self.to_renderer_options()?;
        for (key, value) in renderer_defaults {
            merged.insert(key.clone(), value.clone());
        }
        Ok(merged)
    }
}

impl fmt::Debug for MediaElementOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaElementOptions")
            .field("renderers", &self.renderers)
            .field("fake_node_name", &self.fake_node_name)
            .field("plugin_path", &self.plugin_path)
            .field("event_strategy", &self.event_strategy)
            .field("extra", &self.extra)
            .field("success", &self.success.as_ref().map(|_| "Fn { ... }"))
            .finish()
    }
}
