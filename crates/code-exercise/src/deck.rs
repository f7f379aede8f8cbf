/*
 * deck.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Static presentation host over a deck file.
 */

//! Static presentation host over a deck file.
//!
//! There is no browser here: the deck is parsed into an in-memory document,
//! deferred tasks are queued on a [`ManualScheduler`] and drained by the
//! command, and nothing can be measured.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use code_exercise_core::{ManualScheduler, PresentationHost, Scheduler};
use code_exercise_dom::{Document, NodeId, SharedDocument, parse};
use serde_json::Value;

/// A deck loaded from markup.
pub struct StaticHost {
    pub document: SharedDocument,
    slides: Vec<NodeId>,
    config: Option<Value>,
    pub scheduler: Rc<ManualScheduler>,
}

impl StaticHost {
    pub fn load(markup: &str, config: Option<Value>) -> Result<Rc<Self>> {
        let doc = parse(markup).context("Failed to parse deck markup")?;
        let slides = slide_elements(&doc);
        tracing::debug!(slides = slides.len(), "Loaded deck");
        Ok(Rc::new(Self {
            document: doc.into_shared(),
            slides,
            config,
            scheduler: Rc::new(ManualScheduler::new()),
        }))
    }

    pub fn read(path: &Path, config: Option<Value>) -> Result<Rc<Self>> {
        let markup = fs::read_to_string(path)
            .with_context(|| format!("Failed to read deck: {}", path.display()))?;
        Self::load(&markup, config)
            .with_context(|| format!("Invalid deck: {}", path.display()))
    }
}

/// `section` elements without nested sections, in document order.
///
/// A section wrapping other sections is a vertical stack, not a slide.
pub fn slide_elements(doc: &Document) -> Vec<NodeId> {
    doc.elements_by_tag(doc.root(), "section")
        .into_iter()
        .filter(|&section| doc.elements_by_tag(section, "section").is_empty())
        .collect()
}

/// Read the host configuration object from a JSON file.
pub fn load_config(path: Option<&Path>) -> Result<Option<Value>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("Config is not valid JSON: {}", path.display()))?;
    if !value.is_object() {
        anyhow::bail!("Config must be a JSON object: {}", path.display());
    }
    Ok(Some(value))
}

impl PresentationHost for StaticHost {
    fn document(&self) -> SharedDocument {
        Rc::clone(&self.document)
    }

    fn slides(&self) -> Vec<NodeId> {
        self.slides.clone()
    }

    fn config(&self) -> Option<Value> {
        self.config.clone()
    }

    fn scheduler(&self) -> Rc<dyn Scheduler> {
        self.scheduler.clone()
    }
}
