//! Mustakhrij Prompts - Prompt engineering and extraction pipelines
//!
//! This crate provides structured prompts for the supported use cases:
//! - Lesson record extraction from Arabic teaching notes
//! - Structured movie critiques, single and comparison mode
//!
//! plus the pipelines that run a prompt through a model client and turn the
//! reply into validated records.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod extract_lessons;
pub mod extract_report;
pub mod models;
pub mod templates;

use anyhow::Result;
use handlebars::Handlebars;
use serde::Serialize;

/// Prompt engine for managing and rendering templates
pub struct PromptEngine {
    handlebars: Handlebars<'static>,
}

impl PromptEngine {
    /// Create a new prompt engine with all templates registered
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // prompts are plain text, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string("lesson_system", templates::LESSON_SYSTEM_TEMPLATE)?;
        handlebars.register_template_string("subject_user", templates::SUBJECT_USER_TEMPLATE)?;
        handlebars.register_template_string("movie_system", templates::MOVIE_SYSTEM_TEMPLATE)?;
        handlebars.register_template_string("movie_user", templates::MOVIE_USER_TEMPLATE)?;
        handlebars.register_template_string(
            "comparison_system",
            templates::COMPARISON_SYSTEM_TEMPLATE,
        )?;
        handlebars
            .register_template_string("comparison_user", templates::COMPARISON_USER_TEMPLATE)?;

        Ok(Self { handlebars })
    }

    /// Render a template with the given data
    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> Result<String> {
        Ok(self.handlebars.render(template_name, data)?)
    }

    /// Generate the lesson-extraction system instruction
    pub fn lesson_system<T: Serialize>(&self, data: &T) -> Result<String> {
        self.render("lesson_system", data)
    }

    /// Generate the user message embedding the subject text
    pub fn subject_user<T: Serialize>(&self, data: &T) -> Result<String> {
        self.render("subject_user", data)
    }

    /// Generate the movie-report system instruction
    pub fn movie_system<T: Serialize>(&self, data: &T) -> Result<String> {
        self.render("movie_system", data)
    }

    /// Generate the movie-report user message
    pub fn movie_user<T: Serialize>(&self, data: &T) -> Result<String> {
        self.render("movie_user", data)
    }

    /// Generate the comparison-mode system instruction
    pub fn comparison_system<T: Serialize>(&self, data: &T) -> Result<String> {
        self.render("comparison_system", data)
    }

    /// Generate the comparison-mode user message
    pub fn comparison_user<T: Serialize>(&self, data: &T) -> Result<String> {
        self.render("comparison_user", data)
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new().expect("Failed to create prompt engine")
    }
}

/// Common prompt data structures
pub use models::*;
