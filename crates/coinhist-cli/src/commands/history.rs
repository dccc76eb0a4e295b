use std::path::PathBuf;
use std::sync::Arc;

use coinhist_core::{
    Advisory, DataSource, HistoricalScraper, ResolvedIdentity, ScrapeRequest,
};
use serde::Serialize;

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::{to_json, CommandOutput};

#[derive(Debug, Serialize)]
struct HistoryResponse {
    identity: Option<ResolvedIdentity>,
    rows: usize,
    start_date: Option<String>,
    end_date: Option<String>,
    path: PathBuf,
    advisories: Vec<Advisory>,
}

pub fn run(
    args: &HistoryArgs,
    source: Arc<dyn DataSource>,
    pretty: bool,
) -> Result<CommandOutput, CliError> {
    let request = build_request(args)?;
    let mut scraper = HistoricalScraper::new(request, source);

    if args.print {
        let text = scraper.render_verbose(false)?;
        return Ok(CommandOutput::new(text).with_advisories(advisory_lines(&scraper)));
    }
    if args.stdout {
        if args.format.is_binary() {
            return Err(CliError::Command(format!(
                "{} output is binary; write it to a file instead of stdout",
                args.format
            )));
        }
        let text = scraper.render(args.format, false)?;
        return Ok(CommandOutput::new(text).with_advisories(advisory_lines(&scraper)));
    }

    let path = scraper.export(
        args.format,
        args.name.as_deref(),
        args.path.as_deref(),
        false,
    )?;
    let rows = scraper.get_data(false)?.len();

    let response = HistoryResponse {
        identity: scraper.identity().cloned(),
        rows,
        start_date: scraper.request().start_date().map(|date| date.to_string()),
        end_date: scraper.request().end_date().map(|date| date.to_string()),
        path,
        advisories: scraper.advisories().to_vec(),
    };

    Ok(CommandOutput::new(to_json(&response, pretty)?).with_advisories(advisory_lines(&scraper)))
}

fn build_request(args: &HistoryArgs) -> Result<ScrapeRequest, CliError> {
    let mut builder = ScrapeRequest::builder()
        .all_time(args.all_time)
        .fiat(args.fiat.as_str())
        .ascending(args.ascending);

    if let Some(symbol) = &args.coin_code {
        builder = builder.symbol(symbol.as_str());
    }
    if let Some(name) = &args.coin_name {
        builder = builder.disambiguating_name(name.as_str());
    }
    if let Some(id) = args.id {
        builder = builder.numeric_id(id);
    }
    if let Some(start) = &args.start_date {
        builder = builder.start_date(start.as_str());
    }
    if let Some(end) = &args.end_date {
        builder = builder.end_date(end.as_str());
    }

    Ok(builder.build()?)
}

fn advisory_lines(scraper: &HistoricalScraper) -> Vec<String> {
    scraper
        .advisories()
        .iter()
        .map(ToString::to_string)
        .collect()
}
