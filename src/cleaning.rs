/// Data cleaning stage: dedup, validity filters, derived fields
///
/// Consumes the raw transfer sequence and produces a new cleaned sequence;
/// the input is never mutated. Stage order matters: dedup first, then the
/// gas and value filters, then field derivation. Rows reaching this stage
/// are already well-typed, so there is no per-row error handling - a row
/// either passes every stage or is dropped and counted.
use crate::etherscan::TokenTransfer;
use crate::logger::{self, LogTag};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::HashSet;

/// Heuristic minimum gas for a real token transfer. A plain native-currency
/// send costs exactly 21000, so anything at or below it cannot have executed
/// contract code.
const MIN_GAS_USED: u64 = 21_000;

/// Ordered value bucket, (a, b] binning over fixed breakpoints
/// [0, 0.001, 0.01, 0.1, 1, 10, 100, inf]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValueCategory {
    Nano,
    Micro,
    Small,
    Medium,
    Large,
    Xlarge,
    Huge,
}

impl ValueCategory {
    /// Bucket a positive value; None for zero, negative or NaN input
    ///
    /// Right-closed intervals: a value exactly on a breakpoint falls into
    /// the lower-labeled bucket, so classify(0.001) is Nano.
    pub fn classify(value: f64) -> Option<Self> {
        if !(value > 0.0) {
            return None;
        }
        Some(if value <= 0.001 {
            ValueCategory::Nano
        } else if value <= 0.01 {
            ValueCategory::Micro
        } else if value <= 0.1 {
            ValueCategory::Small
        } else if value <= 1.0 {
            ValueCategory::Medium
        } else if value <= 10.0 {
            ValueCategory::Large
        } else if value <= 100.0 {
            ValueCategory::Xlarge
        } else {
            ValueCategory::Huge
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueCategory::Nano => "nano",
            ValueCategory::Micro => "micro",
            ValueCategory::Small => "small",
            ValueCategory::Medium => "medium",
            ValueCategory::Large => "large",
            ValueCategory::Xlarge => "xlarge",
            ValueCategory::Huge => "huge",
        }
    }
}

/// One cleaned transfer with derived fields; datetime is guaranteed present
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTransfer {
    pub tx_hash: String,
    pub timestamp: i64,
    pub datetime: DateTime<Utc>,
    pub gas_used: u64,
    pub gas_price: f64,
    pub value: f64,
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub token_symbol: String,
    /// gas_used * gas_price, native-currency units
    pub tx_fee_eth: f64,
    /// 0-23, UTC
    pub hour_of_day: u32,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    pub value_category: ValueCategory,
}

/// Per-stage drop accounting for the run summary
#[derive(Debug, Default)]
pub struct CleanReport {
    pub input_rows: usize,
    pub duplicates: usize,
    pub low_gas: usize,
    pub zero_value: usize,
    pub no_timestamp: usize,
    pub cleaned_rows: usize,
}

/// Clean the raw sequence into a new derived sequence
///
/// Empty input produces empty output; duplicates keep the first occurrence
/// in input order.
pub fn clean_transfers(transfers: &[TokenTransfer]) -> (Vec<CleanedTransfer>, CleanReport) {
    let mut report = CleanReport {
        input_rows: transfers.len(),
        ..CleanReport::default()
    };
    let mut seen: HashSet<&str> = HashSet::with_capacity(transfers.len());
    let mut cleaned: Vec<CleanedTransfer> = Vec::with_capacity(transfers.len());

    for transfer in transfers {
        if !seen.insert(transfer.tx_hash.as_str()) {
            report.duplicates += 1;
            continue;
        }
        if transfer.gas_used <= MIN_GAS_USED {
            report.low_gas += 1;
            continue;
        }
        if !(transfer.value > 0.0) {
            report.zero_value += 1;
            continue;
        }
        let Some(datetime) = transfer.datetime else {
            report.no_timestamp += 1;
            continue;
        };
        let Some(value_category) = ValueCategory::classify(transfer.value) else {
            // Unreachable after the value filter; dropped rather than unwrapped
            report.zero_value += 1;
            continue;
        };

        cleaned.push(CleanedTransfer {
            tx_hash: transfer.tx_hash.clone(),
            timestamp: transfer.timestamp,
            datetime,
            gas_used: transfer.gas_used,
            gas_price: transfer.gas_price,
            value: transfer.value,
            contract_address: transfer.contract_address.clone(),
            from_address: transfer.from_address.clone(),
            to_address: transfer.to_address.clone(),
            token_symbol: transfer.token_symbol.clone(),
            tx_fee_eth: transfer.gas_used as f64 * transfer.gas_price,
            hour_of_day: datetime.hour(),
            day_of_week: datetime.weekday().num_days_from_monday(),
            value_category,
        });
    }

    report.cleaned_rows = cleaned.len();
    logger::debug(
        LogTag::Cleaning,
        &format!(
            "{} rows in, {} out (dup {}, low gas {}, zero value {}, no timestamp {})",
            report.input_rows,
            report.cleaned_rows,
            report.duplicates,
            report.low_gas,
            report.zero_value,
            report.no_timestamp
        ),
    );

    (cleaned, report)
}
