use coinhist_core::{CoinCandidate, CoinSymbol, DataSource};
use serde::Serialize;

use crate::cli::LookupArgs;
use crate::error::CliError;

use super::{to_json, CommandOutput};

#[derive(Debug, Serialize)]
struct LookupResponse {
    symbol: String,
    provider: String,
    candidates: Vec<CoinCandidate>,
}

pub fn run(
    args: &LookupArgs,
    source: &dyn DataSource,
    pretty: bool,
) -> Result<CommandOutput, CliError> {
    let symbol = CoinSymbol::parse(&args.symbol)?;
    let candidates = source.lookup_symbol(&symbol)?;

    let response = LookupResponse {
        symbol: symbol.as_str().to_owned(),
        provider: source.id().to_string(),
        candidates,
    };
    Ok(CommandOutput::new(to_json(&response, pretty)?))
}
