use anyhow::Result;
use std::path::Path;

use tokenscope::arguments::{
    get_config_path, is_chart_disabled, is_excel_disabled, is_help_requested, print_help,
};
use tokenscope::cleaning::clean_transfers;
use tokenscope::config::Config;
use tokenscope::etherscan::EtherscanClient;
use tokenscope::logger::{self, LogTag};
use tokenscope::{analysis, chart, export, report, summary};

/// Main entry point for tokenscope
///
/// Linear pipeline: fetch -> clean -> export / metrics / chart / report.
/// An empty fetch result ends the run before any downstream stage; page and
/// record failures only shrink the dataset.
#[tokio::main]
async fn main() {
    if is_help_requested() {
        print_help();
        return;
    }

    logger::info(LogTag::System, "🚀 tokenscope starting up...");

    let config_path = get_config_path();
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            logger::error(LogTag::Config, &format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config).await {
        logger::error(LogTag::System, &format!("Run failed: {:#}", e));
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> Result<()> {
    let client = EtherscanClient::new(config)?;

    logger::info(
        LogTag::Fetch,
        &format!(
            "Fetching ERC20 transfers for {} ({} page(s) of {})",
            config.wallet_address, config.pages, config.page_size
        ),
    );
    let (raw, fetch_report) = client.fetch_all().await;

    if raw.is_empty() {
        logger::warning(
            LogTag::System,
            "No transfer data returned - check the API key and wallet address.",
        );
        return Ok(());
    }

    logger::info(LogTag::Cleaning, "Cleaning data...");
    let (cleaned, clean_report) = clean_transfers(&raw);

    if cleaned.is_empty() {
        logger::warning(
            LogTag::Cleaning,
            "Every row was dropped during cleaning - nothing to analyze.",
        );
        summary::print_run_summary(&fetch_report, &clean_report);
        return Ok(());
    }

    if !is_excel_disabled() {
        logger::info(LogTag::Export, "Saving workbook...");
        export::write_workbook(&raw, &cleaned, Path::new(&config.output_path))?;
        logger::success(
            LogTag::Export,
            &format!("Data saved to {}", config.output_path),
        );
    }

    let metrics = analysis::compute_radar_metrics(&cleaned);

    if !is_chart_disabled() {
        logger::info(LogTag::Chart, "Rendering radar chart...");
        chart::render_radar(&metrics, Path::new(&config.chart_path))?;
        logger::success(
            LogTag::Chart,
            &format!("Chart saved to {}", config.chart_path),
        );
    }
    chart::print_interpretation(&metrics);

    logger::info(LogTag::Report, "Generating analysis report...");
    println!("\n{}", report::generate(&cleaned));

    summary::print_run_summary(&fetch_report, &clean_report);
    Ok(())
}
