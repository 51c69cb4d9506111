//! `habindex crawl` — run one crawl and report the summary.

use habindex_core::Crawler;

use crate::cli::{CrawlArgs, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: CrawlArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let crawler_config = config::resolve(global, Some(&args))?;
    tracing::debug!(?crawler_config, "resolved crawler config");

    let crawler = Crawler::new(crawler_config)?;
    let summary = crawler.run().await?;

    match global.output {
        OutputFormat::Json => {
            output::print_output(&output::render_json_pretty(&summary), global.quiet);
        }
        OutputFormat::JsonCompact => {
            output::print_output(&output::render_json_compact(&summary), global.quiet);
        }
        _ => {
            if !global.quiet {
                eprintln!("{}", summary.one_line());
            }
        }
    }

    Ok(())
}
