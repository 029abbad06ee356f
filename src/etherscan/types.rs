/// Wire types for the explorer token-transfer endpoint
///
/// The explorer returns every numeric field as a JSON string and is loose
/// about spellings, so the raw record keeps everything optional and the
/// conversion resolves defaults in one place. Anything downstream of
/// [`RawTokenTransfer::into_transfer`] sees fully-typed values only.
use crate::errors::ScopeError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Divisor from the chain's smallest unit to native-currency units
pub const WEI_PER_ETH: f64 = 1e18;

/// Response envelope of the token-transfer listing endpoint
///
/// `result` is an array on success but a plain string on errors such as
/// "Max rate limit reached", so it stays a raw value until validated.
#[derive(Debug, Deserialize)]
pub struct TokenTxResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// One transfer record as the explorer serves it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTokenTransfer {
    #[serde(default)]
    pub hash: Option<String>,
    /// Seen as both `timeStamp` and `timestamp` in the wild
    #[serde(default, alias = "timeStamp")]
    pub timestamp: Option<String>,
    #[serde(default, rename = "gasUsed")]
    pub gas_used: Option<String>,
    /// Gas limit, used as a fallback when `gasUsed` is absent
    #[serde(default)]
    pub gas: Option<String>,
    #[serde(default, rename = "gasPrice")]
    pub gas_price: Option<String>,
    #[serde(default, rename = "tokenDecimal")]
    pub token_decimal: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, rename = "contractAddress")]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, rename = "tokenSymbol")]
    pub token_symbol: Option<String>,
}

/// One fully-typed transfer record, defaults resolved
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTransfer {
    pub tx_hash: String,
    pub timestamp: i64,
    /// None iff timestamp <= 0
    pub datetime: Option<DateTime<Utc>>,
    pub gas_used: u64,
    /// Native-currency units (wei / 1e18)
    pub gas_price: f64,
    /// Token units (smallest unit / 10^tokenDecimal)
    pub value: f64,
    pub contract_address: String,
    pub from_address: String,
    pub to_address: String,
    pub token_symbol: String,
}

fn parse_field<T: std::str::FromStr>(
    raw: &Option<String>,
    default: T,
    field: &str,
) -> Result<T, ScopeError> {
    match raw {
        Some(s) => s
            .parse::<T>()
            .map_err(|_| ScopeError::Parse(format!("invalid {}: {:?}", field, s))),
        None => Ok(default),
    }
}

impl RawTokenTransfer {
    /// Resolve defaults and convert into a typed [`TokenTransfer`]
    ///
    /// Default resolution: tokenDecimal -> 18, numeric fields -> 0, string
    /// fields -> empty. A record that fails any numeric parse is rejected
    /// individually; the caller decides whether to continue.
    pub fn into_transfer(self) -> Result<TokenTransfer, ScopeError> {
        let timestamp: i64 = parse_field(&self.timestamp, 0, "timestamp")?;
        let datetime = if timestamp > 0 {
            let dt = DateTime::<Utc>::from_timestamp(timestamp, 0)
                .ok_or_else(|| ScopeError::Parse(format!("timestamp out of range: {}", timestamp)))?;
            Some(dt)
        } else {
            None
        };

        let gas_used: u64 = match &self.gas_used {
            Some(s) => s
                .parse::<u64>()
                .map_err(|_| ScopeError::Parse(format!("invalid gasUsed: {:?}", s)))?,
            None => parse_field(&self.gas, 0, "gas")?,
        };

        let gas_price_wei: u128 = parse_field(&self.gas_price, 0, "gasPrice")?;
        let token_decimal: u32 = parse_field(&self.token_decimal, 18, "tokenDecimal")?;
        let value_raw: f64 = parse_field(&self.value, 0.0, "value")?;

        Ok(TokenTransfer {
            tx_hash: self.hash.unwrap_or_default(),
            timestamp,
            datetime,
            gas_used,
            gas_price: gas_price_wei as f64 / WEI_PER_ETH,
            value: value_raw / 10f64.powi(token_decimal as i32),
            contract_address: self.contract_address.unwrap_or_default(),
            from_address: self.from.unwrap_or_default(),
            to_address: self.to.unwrap_or_default(),
            token_symbol: self.token_symbol.unwrap_or_default(),
        })
    }
}
