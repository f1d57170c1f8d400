//! CLI runner - executes commands

use crate::auth::{Backend, BearerBackend, ZendeskBackend};
use crate::cli::commands::{BackendKind, Cli, Commands};
use crate::client::{CallRequest, RestClient};
use crate::config::{load_settings, BackendSettings, Settings};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::pagination::{CallOptions, ResultSelector};
use crate::retry::RetryPolicy;
use crate::types::{JsonValue, Method};
use std::sync::Arc;
use tracing::debug;

/// Arguments of the `call` command
#[derive(Debug, Clone)]
struct CallArgs<'a> {
    path: &'a str,
    method: &'a str,
    query: &'a [String],
    data: Option<&'a str>,
    all_pages: bool,
    full_response: bool,
    retry_on: &'a [String],
    max_retries: Option<u32>,
    retval: &'a str,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let settings = self.load_settings()?;

        match &self.cli.command {
            Commands::Call {
                path,
                method,
                query,
                data,
                all_pages,
                full_response,
                retry_on,
                max_retries,
                retval,
                backend,
            } => {
                let args = CallArgs {
                    path,
                    method,
                    query,
                    data: data.as_deref(),
                    all_pages: *all_pages,
                    full_response: *full_response,
                    retry_on,
                    max_retries: *max_retries,
                    retval,
                };
                self.call(&settings, *backend, &args).await
            }
            Commands::Ticket { id } => self.ticket(&settings, *id).await,
            Commands::Prompt {
                context,
                prompt,
                model,
            } => self.prompt(&settings, context, prompt, model).await,
            Commands::Serve { port } => crate::cli::serve(settings, *port).await,
        }
    }

    /// Load settings from `--config`, or defaults
    fn load_settings(&self) -> Result<Settings> {
        match self.cli.config {
            Some(ref path) => {
                debug!("Loading settings from {}", path.display());
                load_settings(path)
            }
            None => Ok(Settings::default()),
        }
    }

    fn transport(settings: &Settings) -> Result<Arc<dyn Transport>> {
        Ok(Arc::new(settings.http.build_transport()?))
    }

    async fn call(&self, settings: &Settings, backend: BackendKind, args: &CallArgs<'_>) -> Result<()> {
        let request = build_request(args)?;
        let options = build_options(args)?;
        let policy = build_policy(settings, args)?;
        let transport = Self::transport(settings)?;
        let source = backend_settings(settings, backend);

        let result = match backend {
            BackendKind::Zendesk => {
                let client = settings.rest_client(ZendeskBackend, source, transport)?;
                run_call(&client, request, policy.as_ref(), options).await?
            }
            BackendKind::Openai => {
                let client = settings.rest_client(BearerBackend, source, transport)?;
                run_call(&client, request, policy.as_ref(), options).await?
            }
        };

        self.output(&result)
    }

    async fn ticket(&self, settings: &Settings, id: u64) -> Result<()> {
        let zendesk = settings.zendesk_client(Self::transport(settings)?)?;
        let ticket = zendesk.ticket_show(id).await?;
        self.output(&ticket)
    }

    async fn prompt(&self, settings: &Settings, context: &str, prompt: &str, model: &str) -> Result<()> {
        let openai = settings.openai_client(Self::transport(settings)?)?;
        let reply = openai.send_prompt(context, prompt, model).await?;
        self.output(&serde_json::to_value(&reply)?)
    }

    fn output(&self, value: &JsonValue) -> Result<()> {
        println!("{}", render(value, self.cli.verbose)?);
        Ok(())
    }
}

async fn run_call<B: Backend>(
    client: &RestClient<B>,
    request: CallRequest,
    policy: Option<&RetryPolicy>,
    options: CallOptions,
) -> Result<JsonValue> {
    Ok(client.call(request, policy, options).await?.to_json())
}

// ============================================================================
// Argument Conversion
// ============================================================================

fn build_request(args: &CallArgs<'_>) -> Result<CallRequest> {
    let method: Method = args.method.parse()?;
    let mut request = CallRequest::new(method, args.path);

    for pair in args.query {
        let (key, value) = parse_query_pair(pair)?;
        request = request.query(key, value);
    }
    if let Some(data) = args.data {
        let body: JsonValue = serde_json::from_str(data)
            .map_err(|e| Error::config(format!("Invalid --data JSON: {e}")))?;
        request = request.json(body);
    }
    Ok(request)
}

fn build_options(args: &CallArgs<'_>) -> Result<CallOptions> {
    let mut options = CallOptions::new().selector(args.retval.parse::<ResultSelector>()?);
    if args.all_pages {
        options = options.all_pages();
    }
    if args.full_response {
        options = options.full_response();
    }
    Ok(options)
}

/// Policy from flags; `None` defers to the settings file
fn build_policy(settings: &Settings, args: &CallArgs<'_>) -> Result<Option<RetryPolicy>> {
    if args.retry_on.is_empty() && args.max_retries.is_none() {
        return Ok(None);
    }
    let max_retries = args.max_retries.unwrap_or(settings.retry.max_retries);
    if args.retry_on.is_empty() {
        let whitelist = settings.retry.retry_on.iter().copied();
        return RetryPolicy::new(whitelist, max_retries).map(Some);
    }
    RetryPolicy::from_names(args.retry_on, max_retries).map(Some)
}

/// Compact JSON, or pretty-printed when verbose
fn render(value: &JsonValue, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

fn parse_query_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| Error::config(format!("Query parameter '{pair}' must be KEY=VALUE")))
}

/// Settings entry used by a backend selection
fn backend_settings(settings: &Settings, backend: BackendKind) -> &BackendSettings {
    match backend {
        BackendKind::Zendesk => &settings.backends.zendesk,
        BackendKind::Openai => &settings.backends.openai,
    }
}
