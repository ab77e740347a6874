//! Decoding of CryptoCompare response bodies.
//!
//! The API answers failures with HTTP 200 and an error envelope:
//!
//! ```text
//! {"Response": "Error", "Message": "fsym is a required param.", ...}
//! ```
//!
//! so every body is checked for that shape before its payload is read.

use serde_json::Value;

use super::types::HistoBar;
use crate::error::FeedError;

/// Parses a body and rejects the error envelope.
pub fn parse_body(body: &str) -> Result<Value, FeedError> {
    let value: Value = serde_json::from_str(body)?;

    if value.get("Response").and_then(Value::as_str) == Some("Error") {
        let message = value
            .get("Message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(FeedError::Api(message));
    }

    Ok(value)
}

/// `{"USD": 6423.1}` → `6423.1`
pub fn current_price(value: &Value, quote: &str) -> Result<f64, FeedError> {
    positive_price(value.get(quote))
        .ok_or_else(|| FeedError::Malformed(format!("no {quote} price in {value}")))
}

/// `{"BTC": {"USD": 6423.1}}` → `6423.1`
pub fn historical_price(value: &Value, base: &str, quote: &str) -> Result<f64, FeedError> {
    positive_price(value.get(base).and_then(|v| v.get(quote)))
        .ok_or_else(|| FeedError::Malformed(format!("no {base}/{quote} price in {value}")))
}

/// Bars from either the flat (`{"Data": [...]}`) or nested
/// (`{"Data": {"Data": [...]}}`) histohour layout.
pub fn hourly_bars(value: &Value) -> Result<Vec<HistoBar>, FeedError> {
    let data = match value.get("Data") {
        Some(Value::Array(_)) => value.get("Data"),
        Some(Value::Object(inner)) => inner.get("Data"),
        _ => None,
    }
    .ok_or_else(|| FeedError::Malformed("histohour response has no Data array".into()))?;

    Ok(serde_json::from_value(data.clone())?)
}

/// Unknown pairs come back as `0` rather than an error.
fn positive_price(v: Option<&Value>) -> Option<f64> {
    v.and_then(Value::as_f64).filter(|p| p.is_finite() && *p > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_current_price() {
        let v = parse_body(r#"{"USD": 6423.17}"#).unwrap();
        assert_eq!(current_price(&v, "USD").unwrap(), 6423.17);
    }

    #[test]
    fn reads_historical_price_for_any_base() {
        let v = parse_body(r#"{"ETH": {"USD": 301.5}}"#).unwrap();
        assert_eq!(historical_price(&v, "ETH", "USD").unwrap(), 301.5);

        let v = parse_body(r#"{"LTC": {"EUR": 88.0}}"#).unwrap();
        assert_eq!(historical_price(&v, "LTC", "EUR").unwrap(), 88.0);
    }

    #[test]
    fn error_envelope_becomes_api_error() {
        let err = parse_body(
            r#"{"Response":"Error","Message":"There is no data for the symbol XYZ .","Type":1}"#,
        )
        .unwrap_err();

        match err {
            FeedError::Api(msg) => assert!(msg.contains("no data for the symbol")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_or_zero_price_is_malformed() {
        let v = parse_body(r#"{"EUR": 10.0}"#).unwrap();
        assert!(matches!(current_price(&v, "USD"), Err(FeedError::Malformed(_))));

        let v = parse_body(r#"{"BTC": {"USD": 0}}"#).unwrap();
        assert!(matches!(
            historical_price(&v, "BTC", "USD"),
            Err(FeedError::Malformed(_))
        ));
    }

    #[test]
    fn invalid_json_is_decode_error() {
        assert!(matches!(parse_body("<html>"), Err(FeedError::Decode(_))));
    }

    #[test]
    fn reads_flat_and_nested_histohour() {
        let bar = r#"{"time":1514764800,"close":13800.0,"high":13900.0,"low":13500.0,"open":13600.0,"volumefrom":10.0,"volumeto":138000.0}"#;

        let flat = parse_body(&format!(r#"{{"Response":"Success","Data":[{bar}]}}"#)).unwrap();
        let nested =
            parse_body(&format!(r#"{{"Response":"Success","Data":{{"Data":[{bar},{bar}]}}}}"#))
                .unwrap();

        let bars = hourly_bars(&flat).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 13800.0);
        assert_eq!(bars[0].to_sample().timestamp, 1514764800);

        assert_eq!(hourly_bars(&nested).unwrap().len(), 2);
    }

    #[test]
    fn histohour_without_data_is_malformed() {
        let v = parse_body(r#"{"Response":"Success"}"#).unwrap();
        assert!(matches!(hourly_bars(&v), Err(FeedError::Malformed(_))));
    }
}
