use coinhist_core::{CoinCandidate, DataSource};
use serde::Serialize;

use crate::error::CliError;

use super::{to_json, CommandOutput};

#[derive(Debug, Serialize)]
struct TrendingResponse {
    provider: String,
    coins: Vec<CoinCandidate>,
}

pub fn run(source: &dyn DataSource, pretty: bool) -> Result<CommandOutput, CliError> {
    if !source.capabilities().trending {
        return Err(CliError::Command(format!(
            "the '{}' provider has no trending list",
            source.id()
        )));
    }

    let response = TrendingResponse {
        provider: source.id().to_string(),
        coins: source.trending()?,
    };
    Ok(CommandOutput::new(to_json(&response, pretty)?))
}
