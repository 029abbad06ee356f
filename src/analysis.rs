/// Radar metrics over the cleaned transfer set
///
/// Six fixed indicators in display order. Three of them are raw amounts
/// (mean value, max value, mean fee) and get normalized into [0, 1] by the
/// shared maximum of the three, so the axes stay mutually comparable; the
/// daily-rate and the two concentration metrics are used as-is.
use crate::cleaning::CleanedTransfer;
use crate::logger::{self, LogTag};
use crate::utils::{mean, std_dev};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// One radar axis with its human-readable label and description
#[derive(Debug, Clone)]
pub struct RadarMetric {
    pub label: &'static str,
    pub description: &'static str,
    pub value: f64,
    /// Whether this metric participates in shared-maximum normalization
    pub normalized: bool,
}

/// Transfer counts per calendar date, ordered by date
pub fn daily_counts(transfers: &[CleanedTransfer]) -> Vec<f64> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for transfer in transfers {
        *per_day.entry(transfer.datetime.date_naive()).or_insert(0) += 1;
    }
    per_day.values().map(|&c| c as f64).collect()
}

/// Compute the six radar indicators, normalization applied
pub fn compute_radar_metrics(transfers: &[CleanedTransfer]) -> Vec<RadarMetric> {
    if transfers.is_empty() {
        return Vec::new();
    }

    let values: Vec<f64> = transfers.iter().map(|t| t.value).collect();
    let fees: Vec<f64> = transfers.iter().map(|t| t.tx_fee_eth).collect();
    let daily = daily_counts(transfers);

    let mean_value = mean(&values);
    let max_value = values.iter().cloned().fold(f64::MIN, f64::max);
    let mean_fee = mean(&fees);
    let mean_daily = mean(&daily);

    // Lower deviation across active days reads as higher concentration.
    // With a single active day the sample deviation is undefined and is
    // taken as 0, i.e. full concentration.
    let time_concentration = if mean_daily > 0.0 {
        1.0 - std_dev(&daily) / mean_daily
    } else {
        0.0
    };

    let distinct_contracts: HashSet<&str> = transfers
        .iter()
        .map(|t| t.contract_address.as_str())
        .collect();
    let contract_concentration =
        1.0 - distinct_contracts.len() as f64 / transfers.len() as f64;

    logger::debug(
        LogTag::Analysis,
        &format!(
            "raw metrics: mean value {:.6}, max value {:.6}, mean daily {:.2}, mean fee {:.8}",
            mean_value, max_value, mean_daily, mean_fee
        ),
    );

    let mut metrics = vec![
        RadarMetric {
            label: "Mean transfer value",
            description: "Average amount across all transfers",
            value: mean_value,
            normalized: true,
        },
        RadarMetric {
            label: "Max single transfer",
            description: "Largest single transfer amount",
            value: max_value,
            normalized: true,
        },
        RadarMetric {
            label: "Mean daily transfers",
            description: "Average number of transfers per active day",
            value: mean_daily,
            normalized: false,
        },
        RadarMetric {
            label: "Time concentration",
            description: "Higher means transfers cluster on fewer days",
            value: time_concentration,
            normalized: false,
        },
        RadarMetric {
            label: "Mean transfer fee (ETH)",
            description: "Average fee paid per transfer",
            value: mean_fee,
            normalized: true,
        },
        RadarMetric {
            label: "Contract concentration",
            description: "Higher means activity concentrates on fewer contracts",
            value: contract_concentration,
            normalized: false,
        },
    ];

    normalize_metrics(&mut metrics);
    metrics
}

/// Divide every normalization-flagged metric by the shared maximum of the
/// flagged metrics' raw values
///
/// Dividing each flagged metric by only its own maximum would collapse all
/// of them to 1.0 in a single-row context, so the shared maximum is used
/// instead to keep the axes comparable.
fn normalize_metrics(metrics: &mut [RadarMetric]) {
    let shared_max = metrics
        .iter()
        .filter(|m| m.normalized)
        .map(|m| m.value)
        .fold(f64::MIN, f64::max);
    if shared_max > 0.0 {
        for metric in metrics.iter_mut().filter(|m| m.normalized) {
            metric.value /= shared_max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::clean_transfers;
    use crate::etherscan::TokenTransfer;
    use chrono::{DateTime, Utc};

    fn transfer_at(hash: &str, timestamp: i64, value: f64, contract: &str) -> TokenTransfer {
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
            token_symbol: "TKN".to_string(),
        }
    }

    const DAY: i64 = 86_400;
    const T0: i64 = 1_700_000_000;

    fn cleaned(raw: &[TokenTransfer]) -> Vec<crate::cleaning::CleanedTransfer> {
        clean_transfers(raw).0
    }

    #[test]
    fn test_daily_counts_grouping() {
        let rows = cleaned(&[
            transfer_at("0x1", T0, 1.0, "0xc1"),
            transfer_at("0x2", T0 + 60, 1.0, "0xc1"),
            transfer_at("0x3", T0 + DAY, 1.0, "0xc1"),
        ]);
        assert_eq!(daily_counts(&rows), vec![2.0, 1.0]);
    }

    #[test]
    fn test_metric_order_and_labels() {
        let rows = cleaned(&[transfer_at("0x1", T0, 1.0, "0xc1")]);
        let metrics = compute_radar_metrics(&rows);
        let labels: Vec<&str> = metrics.iter().map(|m| m.label).collect();
        assert_eq!(
            labels,
            vec![
                "Mean transfer value",
                "Max single transfer",
                "Mean daily transfers",
                "Time concentration",
                "Mean transfer fee (ETH)",
                "Contract concentration",
            ]
        );
    }

    #[test]
    fn test_shared_maximum_normalization() {
        // Values 1.0 and 3.0 on one day: mean value 2.0, max value 3.0,
        // mean fee 0.0001. Shared max is 3.0.
        let rows = cleaned(&[
            transfer_at("0x1", T0, 1.0, "0xc1"),
            transfer_at("0x2", T0 + 60, 3.0, "0xc1"),
        ]);
        let metrics = compute_radar_metrics(&rows);
        assert!((metrics[0].value - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics[1].value - 1.0).abs() < 1e-9);
        assert!((metrics[4].value - 0.0001 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_day_is_fully_concentrated() {
        let rows = cleaned(&[
            transfer_at("0x1", T0, 1.0, "0xc1"),
            transfer_at("0x2", T0 + 60, 2.0, "0xc1"),
        ]);
        let metrics = compute_radar_metrics(&rows);
        assert!((metrics[3].value - 1.0).abs() < 1e-9);
        // Mean daily transfers stays a raw rate
        assert!((metrics[2].value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_contract_concentration() {
        // 4 rows over 2 distinct contracts: 1 - 2/4 = 0.5
        let rows = cleaned(&[
            transfer_at("0x1", T0, 1.0, "0xc1"),
            transfer_at("0x2", T0 + 1, 1.0, "0xc1"),
            transfer_at("0x3", T0 + 2, 1.0, "0xc2"),
            transfer_at("0x4", T0 + 3, 1.0, "0xc2"),
        ]);
        let metrics = compute_radar_metrics(&rows);
        assert!((metrics[5].value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_yields_no_metrics() {
        assert!(compute_radar_metrics(&[]).is_empty());
    }
}
