//! # Renderer Registry
//!
//! Holds the renderer types available to media elements, in registration
//! order, and answers "which renderer should play these sources?".
//!
//! ## Selection
//!
//! Selection is renderer-major: each renderer in preference order is asked
//! about every source in order, and the first renderer answering anything
//! other than [`CanPlay::No`] wins, paired with the first source it accepted.
//!
//! ```text
//!  preference: [html5, youtube]      sources: [a.youtube, b.mp4]
//!
//!  html5   ─ a.youtube? ""  ─ b.mp4? "maybe"  ──► html5 + b.mp4
//!  youtube ─ (not consulted)
//! ```
//!
//! The registry is shared by every element behind an `Arc` and is safe to
//! register into from any thread.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::capability::CanPlay;
use crate::error::{MediaError, Result};
use crate::renderer::RendererFactory;
use crate::source::{infer_type, MediaSource};

/// Outcome of renderer selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererMatch {
    pub renderer_name: String,
    /// The first source the renderer accepted.
    pub source: MediaSource,
    /// Index of `source` in the candidate list.
    pub source_index: usize,
    pub confidence: CanPlay,
}

#[derive(Default)]
struct RegistryState {
    renderers: HashMap<String, Arc<dyn RendererFactory>>,
    order: Vec<String>,
}

/// Registry of renderer types.
#[derive(Default)]
pub struct RendererRegistry {
    state: RwLock<RegistryState>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer type.
    ///
    /// # Errors
    ///
    /// - [`MediaError::InvalidRenderer`] if the name is empty
    /// - [`MediaError::DuplicateRenderer`] if the name is taken; the registry
    ///   is left unchanged
    pub fn register(&self, factory: Arc<dyn RendererFactory>) -> Result<()> {
        let name = factory.name().to_string();
        if name.trim().is_empty() {
            return Err(MediaError::InvalidRenderer(
                "renderer name must not be empty".to_string(),
            ));
        }

        let mut state = self.state.write();
        if state.renderers.contains_key(&name) {
            return Err(MediaError::DuplicateRenderer(name));
        }

        state.order.push(name.clone());
        state.renderers.insert(name.clone(), factory);
        info!(renderer = %name, position = state.order.len() - 1, "Registered renderer");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RendererFactory>> {
        self.state.read().renderers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.read().renderers.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn order(&self) -> Vec<String> {
        self.state.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First renderer, in registration order, that can play `mime_type`.
    pub fn find_by_type(&self, mime_type: &str) -> Option<String> {
        let state = self.state.read();
        state
            .order
            .iter()
            .find(|name| {
                state
                    .renderers
                    .get(name.as_str())
                    .is_some_and(|factory| factory.can_play_type(mime_type).is_playable())
            })
            .cloned()
    }

    /// [`find_by_type`](Self::find_by_type) on the type inferred from `url`.
    pub fn find_by_url(&self, url: &str) -> Option<String> {
        self.find_by_type(&infer_type(url))
    }

    /// Select a renderer and source for `sources`.
    ///
    /// `preference` restricts and orders the renderers consulted; names it
    /// lists that are not registered are skipped. Without a preference the
    /// registration order is used.
    pub fn select_for_sources(
        &self,
        sources: &[MediaSource],
        preference: Option<&[String]>,
    ) -> Option<RendererMatch> {
        let state = self.state.read();
        let candidates: &[String] = match preference {
            Some(names) if !names.is_empty() => names,
            _ => &state.order,
        };

        for name in candidates {
            let Some(factory) = state.renderers.get(name) else {
                debug!(renderer = %name, "Skipping unregistered renderer in preference list");
                continue;
            };

            for (index, source) in sources.iter().enumerate() {
                let confidence = factory.can_play_type(&source.mime_type);
                if confidence.is_playable() {
                    debug!(
                        renderer = %name,
                        source_index = index,
                        mime_type = %source.mime_type,
                        %confidence,
                        "Renderer selected"
                    );
                    return Some(RendererMatch {
                        renderer_name: name.clone(),
                        source: source.clone(),
                        source_index: index,
                        confidence,
                    });
                }
            }
        }

        None
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("order", &self.state.read().order)
            .finish()
    }
}
