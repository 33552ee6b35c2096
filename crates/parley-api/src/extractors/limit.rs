//! History limit extractor
//!
//! `?limit=N` is lenient and never rejects the request. The leading integer
//! of the value is used (`2.5` is 2, `3abc` is 3). A missing, non-numeric,
//! or non-positive value means "use the configured default".

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

/// Raw query parameters
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    #[serde(default)]
    pub limit: Option<String>,
}

/// Requested page size, `None` when absent or unusable
///
/// Clamping to the configured default and maximum happens in
/// `MessageLimits::resolve`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryLimit(pub Option<i64>);

impl From<LimitParams> for HistoryLimit {
    fn from(params: LimitParams) -> Self {
        let limit = params
            .limit
            .as_deref()
            .and_then(leading_integer)
            .filter(|n| *n > 0);
        Self(limit)
    }
}

/// Integer prefix of `raw` after optional whitespace and sign.
/// Saturates instead of overflowing.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut value: i64 = 0;
    let mut seen = false;
    for digit in digits {
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    seen.then_some(if negative { -value } else { value })
}

#[async_trait]
impl<S> FromRequestParts<S> for HistoryLimit
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<LimitParams>::from_request_parts(parts, state)
            .await
            .map(|Query(params)| params)
            .unwrap_or_default();

        Ok(HistoryLimit::from(params))
    }
}
