/// Excel workbook artifact: raw rows, cleaned rows, summary block
use crate::cleaning::CleanedTransfer;
use crate::errors::ScopeError;
use crate::etherscan::TokenTransfer;
use crate::logger::{self, LogTag};
use crate::utils::{format_date_range, mean};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

const RAW_HEADERS: [&str; 10] = [
    "tx_hash",
    "timestamp",
    "datetime",
    "gas_used",
    "gas_price",
    "value",
    "contract_address",
    "from_address",
    "to_address",
    "token_symbol",
];

const DERIVED_HEADERS: [&str; 4] = ["tx_fee_eth", "hour_of_day", "day_of_week", "value_category"];

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), ScopeError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    Ok(())
}

fn write_core_fields(
    sheet: &mut Worksheet,
    row: u32,
    transfer: &TokenTransfer,
) -> Result<(), ScopeError> {
    sheet.write_string(row, 0, transfer.tx_hash.as_str())?;
    sheet.write_number(row, 1, transfer.timestamp as f64)?;
    let datetime = transfer
        .datetime
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    sheet.write_string(row, 2, datetime.as_str())?;
    sheet.write_number(row, 3, transfer.gas_used as f64)?;
    sheet.write_number(row, 4, transfer.gas_price)?;
    sheet.write_number(row, 5, transfer.value)?;
    sheet.write_string(row, 6, transfer.contract_address.as_str())?;
    sheet.write_string(row, 7, transfer.from_address.as_str())?;
    sheet.write_string(row, 8, transfer.to_address.as_str())?;
    sheet.write_string(row, 9, transfer.token_symbol.as_str())?;
    Ok(())
}

/// Write the three-sheet workbook
pub fn write_workbook(
    raw: &[TokenTransfer],
    cleaned: &[CleanedTransfer],
    path: &Path,
) -> Result<(), ScopeError> {
    let mut workbook = Workbook::new();

    let raw_sheet = workbook.add_worksheet();
    raw_sheet.set_name("Raw_Data")?;
    write_headers(raw_sheet, &RAW_HEADERS)?;
    for (index, transfer) in raw.iter().enumerate() {
        write_core_fields(raw_sheet, index as u32 + 1, transfer)?;
    }

    let cleaned_sheet = workbook.add_worksheet();
    cleaned_sheet.set_name("Cleaned_Data")?;
    let headers: Vec<&str> = RAW_HEADERS.iter().chain(DERIVED_HEADERS.iter()).copied().collect();
    write_headers(cleaned_sheet, &headers)?;
    for (index, transfer) in cleaned.iter().enumerate() {
        let row = index as u32 + 1;
        cleaned_sheet.write_string(row, 0, transfer.tx_hash.as_str())?;
        cleaned_sheet.write_number(row, 1, transfer.timestamp as f64)?;
        let datetime = transfer.datetime.format("%Y-%m-%d %H:%M:%S").to_string();
        cleaned_sheet.write_string(row, 2, datetime.as_str())?;
        cleaned_sheet.write_number(row, 3, transfer.gas_used as f64)?;
        cleaned_sheet.write_number(row, 4, transfer.gas_price)?;
        cleaned_sheet.write_number(row, 5, transfer.value)?;
        cleaned_sheet.write_string(row, 6, transfer.contract_address.as_str())?;
        cleaned_sheet.write_string(row, 7, transfer.from_address.as_str())?;
        cleaned_sheet.write_string(row, 8, transfer.to_address.as_str())?;
        cleaned_sheet.write_string(row, 9, transfer.token_symbol.as_str())?;
        cleaned_sheet.write_number(row, 10, transfer.tx_fee_eth)?;
        cleaned_sheet.write_number(row, 11, transfer.hour_of_day as f64)?;
        cleaned_sheet.write_number(row, 12, transfer.day_of_week as f64)?;
        cleaned_sheet.write_string(row, 13, transfer.value_category.label())?;
    }

    let summary_sheet = workbook.add_worksheet();
    summary_sheet.set_name("Summary")?;
    write_headers(summary_sheet, &["Statistic", "Value"])?;

    let unique_contracts: HashSet<&str> =
        cleaned.iter().map(|t| t.contract_address.as_str()).collect();
    let fees: Vec<f64> = cleaned.iter().map(|t| t.tx_fee_eth).collect();
    let date_range = match (
        cleaned.iter().map(|t| t.datetime).min(),
        cleaned.iter().map(|t| t.datetime).max(),
    ) {
        (Some(min), Some(max)) => format_date_range(min, max),
        _ => String::new(),
    };

    summary_sheet.write_string(1, 0, "Cleaned transfers")?;
    summary_sheet.write_number(1, 1, cleaned.len() as f64)?;
    summary_sheet.write_string(2, 0, "Unique contracts")?;
    summary_sheet.write_number(2, 1, unique_contracts.len() as f64)?;
    summary_sheet.write_string(3, 0, "Date range")?;
    summary_sheet.write_string(3, 1, date_range.as_str())?;
    summary_sheet.write_string(4, 0, "Mean fee (ETH)")?;
    summary_sheet.write_number(4, 1, mean(&fees))?;

    workbook.save(path)?;
    logger::debug(LogTag::Export, &format!("Workbook written to {}", path.display()));
    Ok(())
}
