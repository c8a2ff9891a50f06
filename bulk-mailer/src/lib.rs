//! bulk-mailer: templated bulk email over the user's own SMTP account
//!
//! Takes a contact list, a subject/body pair with `{{field}}` placeholders
//! and SMTP credentials, renders one message per contact and sends them in
//! small concurrent batches with a pause between batches.
//!
//! # Features
//!
//! - **Templates**: exact, case-sensitive `{{field}}` substitution
//! - **Batching**: fixed-size concurrent batches, fixed delay between them
//! - **Isolation**: one failed message never affects the others
//! - **HTTP API**: `POST /api/send-emails` for the web front end
//!
//! # Example
//!
//! ```no_run
//! use bulk_mailer::batch::{BatchDispatcher, DispatchOptions};
//! use bulk_mailer::smtp::{SmtpMailer, SmtpConfig};
//! use bulk_mailer::templates::{EmailTemplate, Recipient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let smtp = SmtpConfig {
//!         host: "smtp.example.com".to_string(),
//!         port: "587".to_string(),
//!         username: "me@example.com".to_string(),
//!         password: "app-password".to_string(),
//!         from: "Me <me@example.com>".to_string(),
//!     };
//!     let transport = SmtpMailer::from_config(&smtp)?;
//!
//!     let recipients = vec![
//!         Recipient::new().with("email", "a@example.com").with("name", "A"),
//!         Recipient::new().with("email", "b@example.com").with("name", "B"),
//!     ];
//!     let template = EmailTemplate::new("Hello {{name}}", "<p>Hi {{name}}</p>");
//!
//!     let report = BatchDispatcher::new(DispatchOptions::default())
//!         .dispatch(&transport, &smtp.from, &recipients, &template)
//!         .await;
//!     println!("{} sent, {} failed", report.success_count, report.failed_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`templates`]: Recipients, templates and rendering
//! - [`smtp`]: Mail transports
//! - [`batch`]: Batch send orchestration
//! - [`api`]: HTTP API

pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod smtp;
pub mod templates;

// Re-export commonly used types
pub use crate::batch::{BatchDispatcher, SendReport};
pub use crate::config::AppConfig;
pub use crate::error::{BulkMailError, Result};
