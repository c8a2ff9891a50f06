//! Email templates with per-recipient variable substitution
//!
//! A template is a subject/body pair containing `{{field}}` placeholders that
//! are filled from a [`Recipient`] record.

pub mod renderer;
pub mod types;

pub use renderer::TemplateRenderer;
pub use types::{EmailTemplate, Recipient};
