/// End-of-run console summary tables
use crate::cleaning::CleanReport;
use crate::etherscan::FetchReport;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Display structure for the fetch stage
#[derive(Tabled)]
struct FetchSummaryDisplay {
    #[tabled(rename = "📄 Pages OK")]
    pages_ok: u32,
    #[tabled(rename = "🚫 Pages failed")]
    pages_failed: u32,
    #[tabled(rename = "🔢 Raw rows")]
    raw_records: usize,
    #[tabled(rename = "⚠️ Parse failures")]
    parse_failures: usize,
}

/// Display structure for the cleaning stage
#[derive(Tabled)]
struct CleanSummaryDisplay {
    #[tabled(rename = "🧹 Cleaned rows")]
    cleaned_rows: usize,
    #[tabled(rename = "♻️ Duplicates")]
    duplicates: usize,
    #[tabled(rename = "⛽ Low gas")]
    low_gas: usize,
    #[tabled(rename = "0️⃣ Zero value")]
    zero_value: usize,
    #[tabled(rename = "⏱️ No timestamp")]
    no_timestamp: usize,
}

/// Print the pipeline counters as two compact tables
pub fn print_run_summary(fetch: &FetchReport, clean: &CleanReport) {
    let fetch_display = FetchSummaryDisplay {
        pages_ok: fetch.pages_ok,
        pages_failed: fetch.pages_failed,
        raw_records: fetch.raw_records,
        parse_failures: fetch.parse_failures,
    };
    let mut fetch_table = Table::new(vec![fetch_display]);
    fetch_table.with(Style::rounded());
    println!("\n{}", fetch_table);

    let clean_display = CleanSummaryDisplay {
        cleaned_rows: clean.cleaned_rows,
        duplicates: clean.duplicates,
        low_gas: clean.low_gas,
        zero_value: clean.zero_value,
        no_timestamp: clean.no_timestamp,
    };
    let mut clean_table = Table::new(vec![clean_display]);
    clean_table.with(Style::rounded());
    println!("{}", clean_table);
}
