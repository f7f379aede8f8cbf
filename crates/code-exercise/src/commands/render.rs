/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render command implementation
 */

//! Render command implementation.
//!
//! Loads a deck, runs one initialization pass of the plugin with the static
//! HTML engine, drains the deferred re-layouts and writes the materialized
//! markup.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use code_exercise_core::{CodeExercisePlugin, PresentationHost};

use crate::deck::{StaticHost, load_config};
use crate::engine::static_catalog;

/// Arguments for the render command
#[derive(Debug)]
pub struct RenderArgs {
    /// Input deck
    pub input: PathBuf,
    /// Output file ('-' or `None` for stdout)
    pub output: Option<PathBuf>,
    /// Host configuration file
    pub config: Option<PathBuf>,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let host = StaticHost::read(&args.input, config)?;

    let mut plugin = CodeExercisePlugin::new(static_catalog());
    let dyn_host: Rc<dyn PresentationHost> = host.clone();
    plugin
        .init(dyn_host)
        .with_context(|| format!("Failed to initialize exercises in {}", args.input.display()))?;

    let ran = host.scheduler.run_until_idle();
    debug!(tasks = ran, "Drained deferred tasks");

    let exercises = plugin.exercises().count();
    let markup = host.document.borrow().to_markup();
    plugin.destroy();

    match args.output {
        Some(path) if path.as_os_str() != "-" => {
            fs::write(&path, markup)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(
                exercises,
                output = %path.display(),
                "Rendered deck"
            );
        }
        _ => {
            print!("{}", markup);
            info!(exercises, "Rendered deck to stdout");
        }
    }

    Ok(())
}
