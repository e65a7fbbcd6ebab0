/* 📖 # What happens when a sample is executed?

Every endpoint runs the same pipeline over its own tables:

1. extract the payload and path value from the edited text
2. check the endpoint's auth rule against the text and payload
3. pick, filter and page the canned data
4. wrap it as a success response

Any failure on the way becomes the error body `{status: false, message, data: null}`.
Nothing here touches the network, and nothing is remembered between calls.
*/

use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::crypto;
use crate::endpoint::EndpointId;
use crate::extract::{self, ExtractedRequest, ExtractionError};
use crate::mock_data;
use crate::present;
use crate::representation::Representation;
use crate::response::{MockResponse, error_body};
use crate::table::{DateRange, PageRequest, ProductFilter};

/// Why a simulated call produced an error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The payload could not be read from the sample.
    Extraction(ExtractionError),
    /// Auth marker missing, a field not allow-listed, or an undecryptable order.
    Validation { message: String },
    /// The requested record is not in the canned data.
    NotFound { message: String },
}

impl SimulationError {
    /// Message shown in the error response.
    pub fn message(&self) -> String {
        match self {
            SimulationError::Extraction(e) => format!("Invalid request format: {}", e.message),
            SimulationError::Validation { message } | SimulationError::NotFound { message } => {
                message.clone()
            }
        }
    }

    fn validation(message: impl Into<String>) -> Self {
        SimulationError::Validation {
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        SimulationError::NotFound {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for SimulationError {}

impl From<ExtractionError> for SimulationError {
    fn from(error: ExtractionError) -> Self {
        SimulationError::Extraction(error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
}

/// Outcome of one simulated call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub status: ResultStatus,
    pub response: Value,
}

impl ExecutionResult {
    pub fn success(response: Value) -> Self {
        Self {
            status: ResultStatus::Success,
            response,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            response: error_body(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    /// Indented JSON, as copied to the clipboard.
    pub fn text(&self) -> String {
        present::pretty(&self.response)
    }

    /// Colorized HTML of the response.
    pub fn html(&self) -> String {
        present::colorize_value(&self.response)
    }
}

impl From<Result<Value, SimulationError>> for ExecutionResult {
    fn from(result: Result<Value, SimulationError>) -> Self {
        match result {
            Ok(response) => ExecutionResult::success(response),
            Err(error) => ExecutionResult::error(error.message()),
        }
    }
}

/// Run the pipeline for an edited sample. Never fails: errors become error responses.
pub fn simulate(endpoint: EndpointId, text: &str, representation: Representation) -> ExecutionResult {
    let result = try_simulate(endpoint, text, representation);
    match &result {
        Ok(_) => debug!(endpoint = %endpoint, representation = %representation, "Simulated success"),
        Err(error) => debug!(
            endpoint = %endpoint,
            representation = %representation,
            error = %error,
            "Simulated error"
        ),
    }
    result.into()
}

/// Run the pipeline, keeping the failure reason typed.
pub fn try_simulate(
    endpoint: EndpointId,
    text: &str,
    representation: Representation,
) -> Result<Value, SimulationError> {
    let request = extract::extract(endpoint, text, representation)?;
    let definition = endpoint.definition();
    if !definition
        .auth
        .permits(text, representation, request.payload.as_ref())
    {
        return Err(SimulationError::validation(definition.denial_message));
    }
    respond(endpoint, representation, request)
}

fn respond(
    endpoint: EndpointId,
    representation: Representation,
    request: ExtractedRequest,
) -> Result<Value, SimulationError> {
    let payload = request.payload.as_ref();
    let response = match endpoint {
        EndpointId::Login => login_success(),
        EndpointId::Profile => profile_success(),
        EndpointId::ProductList => {
            let filter = ProductFilter::from_payload(payload);
            product_page(&filter.apply(&mock_data::products()), payload)
        }
        EndpointId::ProductSearch => {
            // allowed spellings all resolve to the one searchable brand
            let filter = ProductFilter::from_payload(payload).with_search(mock_data::SEARCHABLE_BRAND);
            product_page(&filter.apply(&mock_data::products()), payload)
        }
        EndpointId::ProductDetails => {
            let details = path_number(&request)
                .and_then(mock_data::product_details)
                .ok_or_else(|| SimulationError::not_found("Product not found"))?;
            MockResponse::success("Voucher Details")
                .data(details)
                .no_pagination()
                .into_value()
        }
        EndpointId::OrderPlace => {
            if representation == Representation::Curl {
                let envelope = payload.unwrap_or(&Value::Null);
                crypto::open_envelope(envelope).map_err(|e| {
                    SimulationError::validation(format!("Invalid encrypted payload: {e}"))
                })?;
            }
            order_placed()
        }
        EndpointId::OrderReport => {
            let rows = DateRange::from_payload(payload).apply(&mock_data::order_report_rows());
            let page = PageRequest::from_payload(payload, 10);
            MockResponse::success("Success")
                .data(Value::Array(page.apply(&rows)))
                .pagination(&page.block(rows.len()))
                .into_value()
        }
        EndpointId::VoucherDetails => {
            let order_id = path_number(&request).unwrap_or(mock_data::DEFAULT_ORDER_ID);
            let vouchers = mock_data::vouchers();
            let page = PageRequest::from_payload(payload, 100000000);
            MockResponse::success("Success")
                .with("duration", json!(mock_data::VOUCHER_DETAILS_DURATION))
                .data(json!({
                    "order": mock_data::voucher_order(order_id),
                    "data": page.apply(&vouchers),
                }))
                .pagination(&page.block(vouchers.len()))
                .into_value()
        }
        EndpointId::VoucherStatus => {
            let status = request
                .path_value
                .as_deref()
                .and_then(mock_data::voucher_status)
                .ok_or_else(|| SimulationError::not_found("Voucher not found"))?;
            MockResponse::success("Voucher status fetched")
                .data(status)
                .no_pagination()
                .into_value()
        }
        EndpointId::WalletStatement => {
            let rows = DateRange::from_payload(payload).apply(&mock_data::wallet_statement_rows());
            let page = PageRequest::from_payload(payload, 10);
            MockResponse::success("Success")
                .data(Value::Array(page.apply(&rows)))
                .pagination(&page.block(rows.len()))
                .into_value()
        }
    };
    Ok(response)
}

fn path_number(request: &ExtractedRequest) -> Option<u64> {
    request.path_value.as_deref()?.parse().ok()
}

fn product_page(rows: &[Value], payload: Option<&Value>) -> Value {
    let page = PageRequest::from_payload(payload, 0);
    MockResponse::success("Product list retrieved successfully")
        .data(Value::Array(page.apply(rows)))
        .pagination(&page.block(rows.len()))
        .into_value()
}

pub(crate) fn login_success() -> Value {
    MockResponse::success("Login Success!")
        .data(json!(mock_data::LOGIN_TOKEN))
        .with("user_detail", mock_data::user_detail())
        .no_pagination()
        .into_value()
}

pub(crate) fn profile_success() -> Value {
    MockResponse::success("User details!")
        .data(mock_data::profile())
        .into_value()
}

pub(crate) fn order_placed() -> Value {
    MockResponse::success("Order Processed Successful! Please Check Report!")
        .data(mock_data::order_confirmation())
        .no_pagination()
        .into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::CodeSampleSet;
    use expect_test::expect;

    const BASE_URL: &str = "https://api.99gift.in";

    fn run_default(endpoint: EndpointId, representation: Representation) -> ExecutionResult {
        let samples = CodeSampleSet::defaults(endpoint, BASE_URL);
        simulate(endpoint, samples.get(representation), representation)
    }

    #[test]
    fn test_every_default_sample_succeeds() {
        for endpoint in EndpointId::ALL {
            for representation in Representation::ALL {
                let result = run_default(endpoint, representation);
                assert!(
                    result.is_success(),
                    "{endpoint} {representation}: {}",
                    result.text()
                );
            }
        }
    }

    #[test]
    fn test_login_default_curl() {
        let result = run_default(EndpointId::Login, Representation::Curl);
        assert_eq!(result.response["status"], true);
        assert_eq!(result.response["message"], "Login Success!");
        assert_eq!(result.response["user_detail"]["mobile"], "9182XXXXX94");
    }

    #[test]
    fn test_login_other_mobile_is_denied() {
        let text = "login_data = {\"mobile\": \"9182XXXXX95\", \"password\": \"test@123\"}";
        let result = simulate(EndpointId::Login, text, Representation::Python);
        assert_eq!(
            result.response,
            json!({"status": false, "message": "Invalid API key or credentials", "data": null})
        );
    }

    #[test]
    fn test_product_search_terms() {
        let search = |term: &str| {
            let text = format!("const productListData = {{ search: '{term}' }};");
            simulate(EndpointId::ProductSearch, &text, Representation::JavaScript)
        };
        let amazon = search("amazon");
        assert!(amazon.is_success());
        let data = amazon.response["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["sku"], "OFFAMAZONNW");

        assert!(search("AMAZONE").is_success());

        let banana = search("banana");
        assert_eq!(banana.response["status"], false);
        assert_eq!(banana.status, ResultStatus::Error);
    }

    #[test]
    fn test_missing_bearer_header() {
        let text = "curl -X POST 'https://api.99gift.in/list' -d '{}'";
        let result = simulate(EndpointId::ProductList, text, Representation::Curl);
        assert_eq!(result.response["message"], "Invalid API key or credentials");

        let result = simulate(EndpointId::Profile, "fetch(url)", Representation::JavaScript);
        assert_eq!(result.response["message"], "Authorization token is required");
    }

    #[test]
    fn test_extraction_failure_message() {
        let result = simulate(EndpointId::Login, "curl -X POST", Representation::Curl);
        assert_eq!(
            result.response["message"],
            "Invalid request format: could not find a -d '...' body in the curl command"
        );
    }

    #[test]
    fn test_product_list_filter_and_page() {
        let text = r#"curl -H 'Authorization: Bearer KEY' -d '{
  "search": "",
  "selectedCategories": [6],
  "pagination": {"page": 2, "rowsPerPage": 1}
}'"#;
        let result = simulate(EndpointId::ProductList, text, Representation::Curl);
        assert_eq!(result.response["data"][0]["id"], 695);
        expect![[r#"
            {
              "page": 2,
              "rowsPerPage": 1,
              "sortBy": "id",
              "descending": false,
              "total": 2
            }"#]]
        .assert_eq(&present::pretty(&result.response["pagination"]));
    }

    #[test]
    fn test_product_details_lookup() {
        let text = "curl -X GET 'https://api.99gift.in/product/infos/695'";
        let result = simulate(EndpointId::ProductDetails, text, Representation::Curl);
        assert_eq!(result.response["message"], "Voucher Details");
        assert_eq!(result.response["data"]["brand"]["title"], "Amazon Pay");

        let text = "curl -X GET 'https://api.99gift.in/product/infos/1'";
        let result = simulate(EndpointId::ProductDetails, text, Representation::Curl);
        assert_eq!(result.response, error_body("Product not found"));
    }

    #[test]
    fn test_order_place_rejects_tampered_envelope() {
        let text = "curl -H 'Authorization: Bearer T' -d '{\"data\": \"ENCRYPTED_PAYLOAD\"}'";
        let err = try_simulate(EndpointId::OrderPlace, text, Representation::Curl).unwrap_err();
        assert!(matches!(err, SimulationError::Validation { .. }));
        assert!(err.message().starts_with("Invalid encrypted payload"));
    }

    #[test]
    fn test_voucher_details_echoes_order_id() {
        let text = "curl -H 'Authorization: Bearer T' \\\n'https://api.99gift.in/user/card-list/42' -d '{}'";
        let result = simulate(EndpointId::VoucherDetails, text, Representation::Curl);
        assert_eq!(result.response["data"]["order"]["id"], 42);
        assert_eq!(result.response["pagination"]["rowsPerPage"], 100000000);
        let keys: Vec<&String> = result.response.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["status", "message", "duration", "data", "pagination"]);
    }

    #[test]
    fn test_voucher_status_unknown_invoice() {
        let text = "curl -H 'Authorization: Bearer T' 'https://api.99gift.in/user/voucher-status/ZP0'";
        let err = try_simulate(EndpointId::VoucherStatus, text, Representation::Curl).unwrap_err();
        assert_eq!(err, SimulationError::not_found("Voucher not found"));
    }

    #[test]
    fn test_profile_response() {
        let result = run_default(EndpointId::Profile, Representation::Php);
        expect![[r#"
            {
              "status": true,
              "message": "User details!",
              "data": {
                "id": 188699,
                "name": "Amarnath",
                "mobile": "9182XXXXX94",
                "email": "corptest@99gift.in",
                "balance": 180.6,
                "corporate_name": null,
                "pin_code": null
              }
            }"#]]
        .assert_eq(&result.text());
    }

    #[test]
    fn test_wallet_statement_pages() {
        let text = "const walletStatementData = { pagination: { page: 2, rowsPerPage: 1 } };\nheaders: { 'Authorization': 'Bearer T' }";
        let result = simulate(EndpointId::WalletStatement, text, Representation::JavaScript);
        assert_eq!(result.response["data"][0]["txn_type"], "credit");
        assert_eq!(result.response["pagination"]["total"], 2);
    }
}
