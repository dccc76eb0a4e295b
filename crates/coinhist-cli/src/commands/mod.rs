mod history;
mod lookup;
mod trending;

use std::sync::Arc;

use coinhist_core::{source_for, DataSource, ProviderConfig, ProviderId};
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// What a command leaves for `main` to print.
pub struct CommandOutput {
    pub stdout: String,
    pub advisories: Vec<String>,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            advisories: Vec::new(),
        }
    }

    pub fn with_advisories(mut self, advisories: Vec<String>) -> Self {
        self.advisories.extend(advisories);
        self
    }
}

pub fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let source = build_source(cli)?;

    match &cli.command {
        Command::History(args) => history::run(args, source, cli.pretty),
        Command::Lookup(args) => lookup::run(args, source.as_ref(), cli.pretty),
        Command::Trending => trending::run(source.as_ref(), cli.pretty),
    }
}

fn build_source(cli: &Cli) -> Result<Arc<dyn DataSource>, CliError> {
    let config = ProviderConfig::from_env().with_timeout_ms(cli.timeout_ms);
    let http_client = config.http_client()?;
    let provider = ProviderId::from(cli.provider);
    tracing::debug!(%provider, timeout_ms = ?config.timeout_ms, "using provider");

    Ok(source_for(provider, &config, Arc::new(http_client)))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
