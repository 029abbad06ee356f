/// Explorer API client for ERC20 transfer history
///
/// One GET per page against the account/tokentx action. Every failure mode
/// short of a broken configuration is recoverable: a failed page or record
/// is logged, counted in the [`FetchReport`] and skipped, and the run
/// degrades to fewer rows of data.
pub mod types;

pub use self::types::{RawTokenTransfer, TokenTransfer, TokenTxResponse, WEI_PER_ETH};

use crate::config::Config;
use crate::errors::ScopeError;
use crate::logger::{self, LogTag};
use reqwest::Client;
use std::time::Duration;

/// Action selector for ERC20 token transfers
const ACTION_TOKENTX: &str = "tokentx";

/// Newest-first page ordering
const SORT_ORDER: &str = "desc";

/// Cap on stored per-record failure reasons (count is always exact)
const MAX_PARSE_ERROR_SAMPLES: usize = 5;

/// Aggregated fetch accounting for the run summary
#[derive(Debug, Default)]
pub struct FetchReport {
    pub pages_ok: u32,
    pub pages_failed: u32,
    pub raw_records: usize,
    pub parse_failures: usize,
    /// Sampled failure reasons, capped at MAX_PARSE_ERROR_SAMPLES
    pub parse_errors: Vec<String>,
}

impl FetchReport {
    fn record_parse_failure(&mut self, err: &ScopeError) {
        self.parse_failures += 1;
        if self.parse_errors.len() < MAX_PARSE_ERROR_SAMPLES {
            self.parse_errors.push(err.to_string());
        }
    }
}

/// Client for the explorer token-transfer listing endpoint
pub struct EtherscanClient {
    client: Client,
    base_url: String,
    api_key: String,
    wallet_address: String,
    pages: u32,
    page_size: u32,
}

impl EtherscanClient {
    pub fn new(config: &Config) -> Result<Self, ScopeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ScopeError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            wallet_address: config.wallet_address.clone(),
            pages: config.pages,
            page_size: config.page_size,
        })
    }

    /// Fetch all configured pages sequentially
    ///
    /// Never fails as a whole: page and record failures are logged and
    /// counted, and an empty result is a valid "no data" outcome.
    pub async fn fetch_all(&self) -> (Vec<TokenTransfer>, FetchReport) {
        let mut transfers: Vec<TokenTransfer> = Vec::new();
        let mut report = FetchReport::default();

        for page in 1..=self.pages {
            match self.fetch_page(page).await {
                Ok(items) => {
                    report.pages_ok += 1;
                    for item in items {
                        match parse_record(item) {
                            Ok(transfer) => transfers.push(transfer),
                            Err(e) => {
                                logger::debug(
                                    LogTag::Fetch,
                                    &format!("Skipping record on page {}: {}", page, e),
                                );
                                report.record_parse_failure(&e);
                            }
                        }
                    }
                    logger::info(
                        LogTag::Fetch,
                        &format!("Page {} done, running total: {} transfers", page, transfers.len()),
                    );
                }
                Err(e) => {
                    report.pages_failed += 1;
                    logger::warning(LogTag::Fetch, &format!("Page {} skipped: {}", page, e));
                }
            }
        }

        report.raw_records = transfers.len();
        if report.parse_failures > 0 {
            logger::warning(
                LogTag::Fetch,
                &format!(
                    "{} records failed to parse (first reasons: {})",
                    report.parse_failures,
                    report.parse_errors.join("; ")
                ),
            );
        }

        (transfers, report)
    }

    /// Fetch and validate a single page, returning its raw result items
    async fn fetch_page(&self, page: u32) -> Result<Vec<serde_json::Value>, ScopeError> {
        logger::debug(
            LogTag::Fetch,
            &format!("Requesting page {} ({} per page)", page, self.page_size),
        );

        let response = self
            .client
            .get(self.base_url.as_str())
            .query(&[
                ("module", "account"),
                ("action", ACTION_TOKENTX),
                ("address", self.wallet_address.as_str()),
                ("sort", SORT_ORDER),
                ("page", page.to_string().as_str()),
                ("offset", self.page_size.to_string().as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ScopeError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScopeError::Api(format!("HTTP {}: {}", status, body)));
        }

        let envelope: TokenTxResponse = response
            .json()
            .await
            .map_err(|e| ScopeError::Parse(format!("Malformed response body: {}", e)))?;

        validate_envelope(envelope)
    }
}

/// Accept a page only when it carries a success status and an array payload
fn validate_envelope(envelope: TokenTxResponse) -> Result<Vec<serde_json::Value>, ScopeError> {
    if envelope.status != "1" {
        let message = if envelope.message.is_empty() {
            "unknown error".to_string()
        } else {
            envelope.message
        };
        return Err(ScopeError::Api(format!("API returned error: {}", message)));
    }

    match envelope.result {
        serde_json::Value::Array(items) => Ok(items),
        other => Err(ScopeError::Api(format!(
            "Expected result array, got {}",
            value_kind(&other)
        ))),
    }
}

/// Parse one result item, failing that record only
fn parse_record(item: serde_json::Value) -> Result<TokenTransfer, ScopeError> {
    serde_json::from_value::<RawTokenTransfer>(item)
        .map_err(|e| ScopeError::Parse(format!("Malformed record: {}", e)))?
        .into_transfer()
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> TokenTxResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_envelope_accepts_success_array() {
        let items = validate_envelope(envelope(
            r#"{"status": "1", "message": "OK", "result": [{"hash": "0x1"}, {"hash": "0x2"}]}"#,
        ))
        .unwrap();
        assert_eq!(items.len(), 2);
        let first = parse_record(items[0].clone()).unwrap();
        assert_eq!(first.tx_hash, "0x1");
    }

    #[test]
    fn test_malformed_record_fails_individually() {
        let items = validate_envelope(envelope(
            r#"{"status": "1", "message": "OK", "result": [{"hash": "0x1"}, "not-an-object"]}"#,
        ))
        .unwrap();
        assert!(parse_record(items[0].clone()).is_ok());
        let err = parse_record(items[1].clone()).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_envelope_rejects_error_status() {
        let err = validate_envelope(envelope(
            r#"{"status": "0", "message": "NOTOK", "result": "Max rate limit reached"}"#,
        ))
        .unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("NOTOK"));
    }

    #[test]
    fn test_envelope_rejects_non_array_result() {
        let err = validate_envelope(envelope(
            r#"{"status": "1", "message": "OK", "result": "No transactions found"}"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_empty_page_is_valid() {
        let records =
            validate_envelope(envelope(r#"{"status": "1", "message": "OK", "result": []}"#))
                .unwrap();
        assert!(records.is_empty());
    }
}
