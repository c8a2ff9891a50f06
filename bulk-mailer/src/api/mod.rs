//! REST API module for bulk-mailer
//!
//! Exposes the batch sender over HTTP

pub mod handlers;
pub mod server;

pub use server::ApiServer;
