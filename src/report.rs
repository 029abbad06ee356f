/// Text analysis report over the cleaned transfer set
///
/// Deterministic section order: header, value stats, fee stats, busiest
/// hours, top contracts, anomaly flags. Ties in the top-3 rankings break
/// toward the lower hour / earlier first appearance so equal-count runs
/// always render identically.
use crate::cleaning::CleanedTransfer;
use crate::utils::{format_date_range, mean, percentile, shorten_address};
use std::collections::{HashMap, HashSet};

/// Factor over the 75th percentile that marks an outlier
const ANOMALY_FACTOR: f64 = 10.0;

/// Entries shown in the busiest-hours and top-contracts sections
const TOP_N: usize = 3;

/// Outlier flags derived from the value and fee distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyFlags {
    pub large_transfer: bool,
    pub high_fee: bool,
}

impl AnomalyFlags {
    /// Flag when the maximum exceeds 10x the 75th percentile
    pub fn detect(values: &[f64], fees: &[f64]) -> Self {
        let max_value = values.iter().cloned().fold(f64::MIN, f64::max);
        let max_fee = fees.iter().cloned().fold(f64::MIN, f64::max);
        Self {
            large_transfer: max_value > ANOMALY_FACTOR * percentile(values, 75.0),
            high_fee: max_fee > ANOMALY_FACTOR * percentile(fees, 75.0),
        }
    }
}

/// Top hours-of-day by transfer count, ties broken by lower hour
fn busiest_hours(transfers: &[CleanedTransfer]) -> Vec<(u32, usize)> {
    let mut counts = [0usize; 24];
    for transfer in transfers {
        counts[transfer.hour_of_day as usize] += 1;
    }
    let mut ranked: Vec<(u32, usize)> = counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(hour, &count)| (hour as u32, count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(TOP_N);
    ranked
}

/// Top contracts by transfer count with the first matching row's symbol,
/// ties broken by first appearance in the cleaned sequence
fn top_contracts(transfers: &[CleanedTransfer]) -> Vec<(String, String, usize)> {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut symbols: HashMap<&str, &str> = HashMap::new();
    for (index, transfer) in transfers.iter().enumerate() {
        let address = transfer.contract_address.as_str();
        first_seen.entry(address).or_insert(index);
        symbols.entry(address).or_insert(transfer.token_symbol.as_str());
        *counts.entry(address).or_insert(0) += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(first_seen[a.0].cmp(&first_seen[b.0])));
    ranked.truncate(TOP_N);
    ranked
        .into_iter()
        .map(|(address, count)| (address.to_string(), symbols[address].to_string(), count))
        .collect()
}

/// Render the full report
pub fn generate(transfers: &[CleanedTransfer]) -> String {
    if transfers.is_empty() {
        return "No cleaned transfers to report on.".to_string();
    }

    let mut report: Vec<String> = Vec::new();
    let total = transfers.len();
    let values: Vec<f64> = transfers.iter().map(|t| t.value).collect();
    let fees: Vec<f64> = transfers.iter().map(|t| t.tx_fee_eth).collect();

    let (Some(min_dt), Some(max_dt)) = (
        transfers.iter().map(|t| t.datetime).min(),
        transfers.iter().map(|t| t.datetime).max(),
    ) else {
        return "No cleaned transfers to report on.".to_string();
    };
    let day_span = (max_dt - min_dt).num_days();
    let daily_rate = if day_span > 0 {
        total as f64 / day_span as f64
    } else {
        total as f64
    };
    let unique_contracts: HashSet<&str> = transfers
        .iter()
        .map(|t| t.contract_address.as_str())
        .collect();

    report.push("📊 ERC20 Transfer Analysis Report".to_string());
    report.push("=".repeat(50));
    report.push(format!("📅 Date range: {}", format_date_range(min_dt, max_dt)));
    report.push(format!("🔢 Total transfers: {}", total));
    report.push(format!("🏷️ Contracts interacted: {}", unique_contracts.len()));
    report.push(format!("📈 Mean daily transfers: {:.1}/day", daily_rate));

    report.push("\n💰 Transfer value analysis:".to_string());
    report.push(format!("- Mean transfer value: {:.4}", mean(&values)));
    report.push(format!(
        "- Max single transfer: {:.4}",
        values.iter().cloned().fold(f64::MIN, f64::max)
    ));
    report.push(format!("- 75% of transfers below: {:.4}", percentile(&values, 75.0)));

    report.push("\n⛽ Transfer fee analysis:".to_string());
    report.push(format!("- Mean fee: {:.6} ETH", mean(&fees)));
    report.push(format!(
        "- Max fee: {:.6} ETH",
        fees.iter().cloned().fold(f64::MIN, f64::max)
    ));
    report.push(format!("- Total fees: {:.6} ETH", fees.iter().sum::<f64>()));

    report.push("\n🕒 Busiest hours (UTC):".to_string());
    for (hour, count) in busiest_hours(transfers) {
        report.push(format!(
            "  - {}:00-{}:00 ({} transfers, {:.1}%)",
            hour,
            hour + 1,
            count,
            100.0 * count as f64 / total as f64
        ));
    }

    report.push("\n📌 Top contracts:".to_string());
    for (address, symbol, count) in top_contracts(transfers) {
        report.push(format!(
            "  - {} ({}) - {} transfers ({:.1}%)",
            symbol,
            shorten_address(&address),
            count,
            100.0 * count as f64 / total as f64
        ));
    }

    let flags = AnomalyFlags::detect(&values, &fees);
    if flags.large_transfer {
        report.push("\n⚠️ Anomaly: unusually large transfer detected".to_string());
    }
    if flags.high_fee {
        report.push("⚠️ Anomaly: unusually high fee detected".to_string());
    }

    report.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::clean_transfers;
    use crate::etherscan::TokenTransfer;
    use chrono::{DateTime, Utc};

    const T0: i64 = 1_700_000_000;

    fn transfer_at(
        hash: &str,
        timestamp: i64,
        value: f64,
        contract: &str,
        symbol: &str,
    ) -> TokenTransfer {
        TokenTransfer {
            tx_hash: hash.to_string(),
            timestamp,
            datetime: DateTime::<Utc>::from_timestamp(timestamp, 0),
            gas_used: 50_000,
            gas_price: 2e-9,
            value,
            contract_address: contract.to_string(),
            from_address: "0xfrom".to_string(),
            to_address: "0xto".to_string(),
            token_symbol: symbol.to_string(),
        }
    }

    fn rows(raw: &[TokenTransfer]) -> Vec<CleanedTransfer> {
        clean_transfers(raw).0
    }

    #[test]
    fn test_anomaly_flag_thresholds() {
        // Nine 1.0 rows pin the p75 at 1.0; max = 11x the p75: fires
        let mut values = vec![1.0; 9];
        values.push(11.0);
        let fired = AnomalyFlags::detect(&values, &[0.1; 10]);
        assert!(fired.large_transfer);

        // max = 5x the p75: does not fire
        let mut values = vec![1.0; 9];
        values.push(5.0);
        let quiet = AnomalyFlags::detect(&values, &[0.1; 10]);
        assert!(!quiet.large_transfer);
        assert!(!quiet.high_fee);
    }

    #[test]
    fn test_hour_percentages_use_cleaned_total() {
        // 3 transfers in one hour, 1 in another: 75.0% and 25.0%
        let report = generate(&rows(&[
            transfer_at("0x1", T0, 1.0, "0xc1", "AAA"),
            transfer_at("0x2", T0 + 60, 1.0, "0xc1", "AAA"),
            transfer_at("0x3", T0 + 120, 1.0, "0xc1", "AAA"),
            transfer_at("0x4", T0 + 7200, 1.0, "0xc1", "AAA"),
        ]));
        assert!(report.contains("22:00-23:00 (3 transfers, 75.0%)"));
        assert!(report.contains("(1 transfers, 25.0%)"));
    }

    #[test]
    fn test_top_contracts_symbol_and_truncation() {
        let report = generate(&rows(&[
            transfer_at(
                "0x1",
                T0,
                1.0,
                "0xdac17f958d2ee523a2206206994597c13d831ec7",
                "USDT",
            ),
            transfer_at(
                "0x2",
                T0 + 60,
                1.0,
                "0xdac17f958d2ee523a2206206994597c13d831ec7",
                "USDT",
            ),
            transfer_at("0x3", T0 + 120, 1.0, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "USDC"),
        ]));
        assert!(report.contains("USDT (0xdac1...1ec7) - 2 transfers (66.7%)"));
        assert!(report.contains("USDC"));
    }

    #[test]
    fn test_day_span_zero_uses_total_as_rate() {
        let report = generate(&rows(&[
            transfer_at("0x1", T0, 1.0, "0xc1", "AAA"),
            transfer_at("0x2", T0 + 60, 1.0, "0xc1", "AAA"),
        ]));
        assert!(report.contains("Mean daily transfers: 2.0/day"));
    }

    #[test]
    fn test_section_order() {
        let report = generate(&rows(&[transfer_at("0x1", T0, 1.0, "0xc1", "AAA")]));
        let header = report.find("📊").unwrap();
        let value = report.find("💰").unwrap();
        let fee = report.find("⛽").unwrap();
        let hours = report.find("🕒").unwrap();
        let contracts = report.find("📌").unwrap();
        assert!(header < value && value < fee && fee < hours && hours < contracts);
    }

    #[test]
    fn test_empty_input_message() {
        assert_eq!(generate(&[]), "No cleaned transfers to report on.");
    }
}
