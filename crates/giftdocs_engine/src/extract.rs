/* 📖 # How is a payload found in an edited sample?

Each endpoint has one extraction rule per representation:

- curl samples carry the body in `-d '<json>'`, which must be strict JSON and is
  read with serde_json
- JavaScript, Python and PHP samples assign the payload to a well-known variable
  (the anchor). The literal after `=` is read with the dialect's literal reader,
  which also tells us where the literal ends.
- templated URLs (`/product/infos/{productId}`) are matched with a per-endpoint
  regex, in any representation

This only works for text that stays close to the shipped samples. Renaming the
variable or building the payload in code is an extraction error, reported back
as a normal error response.
*/

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use parking_lot::Mutex;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::endpoint::{EndpointId, PathParameter};
use crate::literal::{self, Dialect};
use crate::representation::Representation;

static CURL_DATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-d\s+'([^']*)'").expect("valid curl data regex"));

/// Anchor and path patterns, compiled once per pattern.
static PATTERNS: LazyLock<Mutex<HashMap<String, Regex>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn cached_regex(pattern: &str) -> Result<Regex, ExtractionError> {
    let mut patterns = PATTERNS.lock();
    if let Some(regex) = patterns.get(pattern) {
        return Ok(regex.clone());
    }
    let regex = Regex::new(pattern)
        .map_err(|e| ExtractionError::new(format!("invalid pattern '{pattern}': {e}")))?;
    patterns.insert(pattern.to_string(), regex.clone());
    Ok(regex)
}

/// How to find the request payload in one representation of one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// The single-quoted `-d` argument of a curl command, read as strict JSON.
    CurlData,
    /// `<anchor> = <literal>`, read in the given dialect.
    Assignment {
        anchor: &'static str,
        dialect: Dialect,
    },
}

/// What the simulator learned from an edited sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedRequest {
    pub payload: Option<Value>,
    pub path_value: Option<String>,
}

/// The sample no longer has the shape the rules expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    pub message: String,
}

impl ExtractionError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExtractionError {}

/// Variable names the payload is assigned to, as (JavaScript, Python, PHP).
fn anchors(endpoint: EndpointId) -> Option<(&'static str, &'static str, &'static str)> {
    match endpoint {
        EndpointId::Login => Some(("const loginData", "login_data", "$loginData")),
        EndpointId::ProductList | EndpointId::ProductSearch => Some((
            "const productListData",
            "product_list_data",
            "$productListData",
        )),
        EndpointId::OrderPlace => Some(("const orderData", "order_data", "$orderData")),
        EndpointId::OrderReport => Some(("const reportData", "report_data", "$reportData")),
        EndpointId::VoucherDetails => Some((
            "const voucherDetailsData",
            "voucher_details_data",
            "$voucherDetailsData",
        )),
        EndpointId::WalletStatement => Some((
            "const walletStatementData",
            "wallet_statement_data",
            "$walletStatementData",
        )),
        EndpointId::Profile | EndpointId::ProductDetails | EndpointId::VoucherStatus => None,
    }
}

/// Payload rule for `endpoint` in `representation`, or `None` if it sends no body.
pub fn payload_rule(endpoint: EndpointId, representation: Representation) -> Option<ExtractionRule> {
    let (js, python, php) = anchors(endpoint)?;
    let rule = match representation {
        Representation::Curl => ExtractionRule::CurlData,
        Representation::JavaScript => ExtractionRule::Assignment {
            anchor: js,
            dialect: Dialect::JavaScript,
        },
        Representation::Python => ExtractionRule::Assignment {
            anchor: python,
            dialect: Dialect::Python,
        },
        Representation::Php => ExtractionRule::Assignment {
            anchor: php,
            dialect: Dialect::Php,
        },
    };
    Some(rule)
}

/// Variable name a sample assigns its payload to, without any `const`.
pub fn payload_variable(endpoint: EndpointId, representation: Representation) -> Option<&'static str> {
    match payload_rule(endpoint, representation)? {
        ExtractionRule::CurlData => None,
        ExtractionRule::Assignment { anchor, .. } => {
            Some(anchor.rsplit(' ').next().unwrap_or(anchor))
        }
    }
}

/// Recover the payload and path value from an edited sample.
pub fn extract(
    endpoint: EndpointId,
    text: &str,
    representation: Representation,
) -> Result<ExtractedRequest, ExtractionError> {
    let payload = payload_rule(endpoint, representation)
        .map(|rule| apply_rule(rule, text, representation))
        .transpose()?;
    let path_value = endpoint
        .definition()
        .path_parameter
        .map(|parameter| extract_path_value(&parameter, text))
        .transpose()?;
    debug!(
        endpoint = %endpoint,
        representation = %representation,
        has_payload = payload.is_some(),
        path_value = ?path_value,
        "Extracted request"
    );
    Ok(ExtractedRequest {
        payload,
        path_value,
    })
}

fn apply_rule(
    rule: ExtractionRule,
    text: &str,
    representation: Representation,
) -> Result<Value, ExtractionError> {
    match rule {
        ExtractionRule::CurlData => extract_curl_data(text),
        ExtractionRule::Assignment { anchor, dialect } => {
            extract_assignment(text, anchor, dialect, representation)
        }
    }
}

fn extract_curl_data(text: &str) -> Result<Value, ExtractionError> {
    let body = CURL_DATA
        .captures(text)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| ExtractionError::new("could not find a -d '...' body in the curl command"))?;
    serde_json::from_str::<Value>(body.as_str())
        .map_err(|e| ExtractionError::new(format!("curl body is not valid JSON: {e}")))
}

/// Regex matching `anchor` followed by `=`. Whitespace in the anchor matches any run of whitespace.
fn anchor_regex(anchor: &str) -> Result<Regex, ExtractionError> {
    let words: Vec<String> = anchor.split_whitespace().map(regex::escape).collect();
    let boundary = if anchor.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        r"\b"
    } else {
        ""
    };
    cached_regex(&format!(r"{boundary}{}\s*=", words.join(r"\s+")))
}

fn extract_assignment(
    text: &str,
    anchor: &str,
    dialect: Dialect,
    representation: Representation,
) -> Result<Value, ExtractionError> {
    let pattern = anchor_regex(anchor)?;
    // `x == y` is a comparison, not the assignment we are after
    let start = pattern
        .find_iter(text)
        .map(|m| m.end())
        .find(|&end| !text[end..].starts_with('='))
        .ok_or_else(|| {
            ExtractionError::new(format!(
                "could not find `{anchor} = ...` in the {} sample",
                representation.label()
            ))
        })?;
    let (value, _end) = literal::parse_literal(&text[start..], dialect).map_err(|e| {
        ExtractionError::new(format!(
            "value assigned to `{anchor}` is not a {} literal: {e}",
            representation.label()
        ))
    })?;
    Ok(value)
}

fn extract_path_value(parameter: &PathParameter, text: &str) -> Result<String, ExtractionError> {
    let pattern = cached_regex(parameter.pattern)?;
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            ExtractionError::new(format!("could not find the {} in the request URL", parameter.label))
        })
}
