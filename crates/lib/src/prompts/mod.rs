//! # Prompt Template Modules
//!
//! This module holds the prompt templates sent to the model, together with the
//! helpers that render them.

pub mod evaluation;

pub use evaluation::build_evaluation_prompt;
