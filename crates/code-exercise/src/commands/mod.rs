//! Command implementations for the code exercise CLI
//!
//! Each command module handles the CLI interface and delegates to
//! code-exercise-core for the actual work.

pub mod check;
pub mod render;
