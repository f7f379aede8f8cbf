/*
 * check.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Check command implementation
 */

//! Check command implementation.
//!
//! Resolves every exercise declaration of a deck and reports them. The deck
//! is never modified, and an unsupported exercise type fails the command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{Value, json};

use code_exercise_config::PluginOptions;
use code_exercise_core::{PresentationHost, SlideDeclaration, resolve_slides};

use crate::deck::{StaticHost, load_config};

/// Arguments for the check command
#[derive(Debug)]
pub struct CheckArgs {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    /// Print JSON instead of one line per exercise
    pub json: bool,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let host = StaticHost::read(&args.input, config)?;
    let options = PluginOptions::resolve(host.config().as_ref())?;

    let declarations = {
        let doc = host.document.borrow();
        resolve_slides(&doc, &host.slides(), &options)
            .with_context(|| format!("Invalid exercise declarations in {}", args.input.display()))?
    };

    if args.json {
        let report: Vec<Value> = declarations.iter().map(declaration_json).collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for decl in &declarations {
            println!("{}", declaration_line(decl));
        }
    }

    tracing::info!(exercises = declarations.len(), "Checked deck");
    Ok(())
}

fn declaration_json(decl: &SlideDeclaration) -> Value {
    json!({
        "slide": decl.index,
        "type": decl.kind.as_str(),
        "id": decl.id,
        "title": decl.title,
        "preview": decl.preview,
        "contentLines": decl.content.lines().count(),
        "customContent": decl.custom_content.is_some(),
        "editorOptions": decl.editor_options,
    })
}

fn declaration_line(decl: &SlideDeclaration) -> String {
    let mut line = format!("slide {}: {}", decl.index, decl.kind);
    if let Some(id) = &decl.id {
        line.push_str(&format!(" id={}", id));
    }
    if let Some(title) = &decl.title {
        line.push_str(&format!(" title={:?}", title));
    }
    if decl.preview {
        line.push_str(" preview");
    }
    line.push_str(&format!(" lines={}", decl.content.lines().count()));
    line
}
