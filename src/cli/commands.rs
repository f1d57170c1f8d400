//! CLI commands and argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Generic REST call runner
#[derive(Parser, Debug)]
#[command(name = "restcall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call an arbitrary endpoint
    Call {
        /// Path relative to the backend base URL, or an absolute URL
        path: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,

        /// Inline JSON body
        #[arg(short, long)]
        data: Option<String>,

        /// Follow next_page links and merge every page
        #[arg(long)]
        all_pages: bool,

        /// Print raw page responses instead of the merged value
        #[arg(long)]
        full_response: bool,

        /// Retry condition: a status code or network, rate-limited,
        /// server-error, authentication, api-error (repeatable)
        #[arg(long = "retry-on", value_name = "COND")]
        retry_on: Vec<String>,

        /// Retries allowed per page
        #[arg(long)]
        max_retries: Option<u32>,

        /// What to return from each page: auto, content, code, location, headers
        #[arg(long, default_value = "auto")]
        retval: String,

        /// Backend to call
        #[arg(short, long, value_enum, default_value = "zendesk")]
        backend: BackendKind,
    },

    /// Show one Zendesk ticket
    Ticket {
        /// Ticket id
        id: u64,
    },

    /// Send a prompt to the chat completions endpoint
    Prompt {
        /// System context
        #[arg(long)]
        context: String,

        /// User prompt
        #[arg(long)]
        prompt: String,

        /// Model name
        #[arg(long, default_value = crate::openai::DEFAULT_MODEL)]
        model: String,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Zendesk API token auth
    Zendesk,
    /// OpenAI bearer auth
    Openai,
}
