/// End-to-end pipeline scenario over a synthetic raw set
use chrono::{DateTime, Utc};
use tokenscope::analysis::compute_radar_metrics;
use tokenscope::cleaning::{clean_transfers, ValueCategory};
use tokenscope::etherscan::TokenTransfer;
use tokenscope::report;

const T0: i64 = 1_700_000_000;

fn transfer(hash: &str, gas_used: u64, gas_price: f64, value: f64) -> TokenTransfer {
    TokenTransfer {
        tx_hash: hash.to_string(),
        timestamp: T0,
        datetime: DateTime::<Utc>::from_timestamp(T0, 0),
        gas_used,
        gas_price,
        value,
        contract_address: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
        from_address: "0xfrom".to_string(),
        to_address: "0xto".to_string(),
        token_symbol: "USDT".to_string(),
    }
}

/// Five raw records: a duplicated low-gas pair, a zero-value row, a row at
/// exactly the gas threshold, and one valid row. Exactly the valid row
/// survives cleaning with the expected fee and bucket.
#[test]
fn test_end_to_end_cleaning_scenario() {
    let raw = vec![
        transfer("0xdead", 20_000, 1e-9, 3.0),
        transfer("0xdead", 20_000, 1e-9, 3.0), // duplicate of the same tx_hash
        transfer("0xbeef", 60_000, 1e-9, 0.0),
        transfer("0xcafe", 50_000, 2e-9, 1.5),
        transfer("0xf00d", 21_000, 1e-9, 2.0), // exactly at the 21000 threshold
    ];

    let (cleaned, clean_report) = clean_transfers(&raw);

    assert_eq!(cleaned.len(), 1);
    let row = &cleaned[0];
    assert_eq!(row.tx_hash, "0xcafe");
    assert!((row.tx_fee_eth - 0.0001).abs() < 1e-12);
    assert_eq!(row.value_category, ValueCategory::Large);

    assert_eq!(clean_report.input_rows, 5);
    assert_eq!(clean_report.duplicates, 1);
    assert_eq!(clean_report.low_gas, 2);
    assert_eq!(clean_report.zero_value, 1);
    assert_eq!(clean_report.cleaned_rows, 1);
}

/// Metrics and report run over the cleaned output without touching the raw set
#[test]
fn test_pipeline_through_metrics_and_report() {
    let raw = vec![
        transfer("0x1", 50_000, 2e-9, 0.5),
        transfer("0x2", 50_000, 2e-9, 1.5),
        transfer("0x2", 50_000, 2e-9, 9.9), // duplicate, ignored
        transfer("0x3", 50_000, 2e-9, 0.0), // dropped
    ];
    let (cleaned, _) = clean_transfers(&raw);
    assert_eq!(cleaned.len(), 2);

    let metrics = compute_radar_metrics(&cleaned);
    assert_eq!(metrics.len(), 6);
    // Max value dominates the flagged metrics, so it normalizes to 1.0
    assert!((metrics[1].value - 1.0).abs() < 1e-9);
    // Shared-maximum normalization: mean 1.0 over max 1.5
    assert!((metrics[0].value - 1.0 / 1.5).abs() < 1e-9);

    let text = report::generate(&cleaned);
    assert!(text.contains("Total transfers: 2"));
    assert!(text.contains("Contracts interacted: 1"));
    // Percentages are over the cleaned total
    assert!(text.contains("(2 transfers, 100.0%)"));
}
