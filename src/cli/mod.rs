//! CLI module
//!
//! Command-line interface over the REST client.
//!
//! # Commands
//!
//! - `call` - Call any endpoint with retry, pagination and result options
//! - `ticket` - Show a Zendesk ticket
//! - `prompt` - Send a chat completion prompt
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{BackendKind, Cli, Commands};
pub use runner::Runner;
pub use server::{router, serve, AppState};
