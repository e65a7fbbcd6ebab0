/* 📖 # Why a single unified API service?

One service handles every route, so there is one thing to register with the PAL
and one place that decides how failures look. Routing is plain matching on the
method and the path segments:

- `/api/site`, `/api/endpoints[/{id}]` describe the documentation
- `/api/simulate`, `/api/encrypt`, `/api/quick-try/{id}` are stateless tools
- `/api/pages[/{sid}[/...]]` drive an open endpoint page
- `/` and `/docs/{id}` are the rendered HTML pages

Anything else, and any handler failure, is returned as `Err`, which the PAL
turns into HTTP 599.
*/

/* 📖 # Why are simulated errors still HTTP 200?

A simulated call that fails is a successful answer from the simulator: the body
is the error response the real API would have sent. HTTP 599 is reserved for
problems with the request to this service itself, like an unknown session or a
malformed body.
*/

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use giftdocs_base::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpService, HttpStatusCode,
};
use giftdocs_base::{GiftDocsError, GiftDocsResult, err};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::crypto;
use crate::endpoint::{EndpointDefinition, EndpointId, search_catalog};
use crate::executor::Executor;
use crate::gate::AuthRule;
use crate::mock_data;
use crate::overview::{DemoCredentials, quick_try};
use crate::representation::Representation;
use crate::samples::{CodeSampleSet, sample_url};
use crate::session::SessionRegistry;
use crate::simulate::{ExecutionResult, ResultStatus, simulate};
use crate::site::SiteRenderer;

/// Information about the documentation site, served at `/api/site`.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

impl SiteInfo {
    /// ```
    /// use giftdocs_engine::api::SiteInfo;
    ///
    /// let info = SiteInfo::new("Gift Card API");
    /// assert_eq!(info.title, "Gift Card API");
    /// ```
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            version: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

#[derive(Serialize)]
struct SiteInfoResponse<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    api_base_url: &'a str,
}

#[derive(Serialize)]
struct EndpointSummary {
    id: EndpointId,
    title: &'static str,
    method: &'static str,
    path: &'static str,
    summary: &'static str,
}

impl From<&EndpointDefinition> for EndpointSummary {
    fn from(definition: &EndpointDefinition) -> Self {
        Self {
            id: definition.id,
            title: definition.title,
            method: definition.method.as_str(),
            path: definition.path,
            summary: definition.summary,
        }
    }
}

#[derive(Serialize)]
struct EndpointDetail {
    #[serde(flatten)]
    summary: EndpointSummary,
    url: String,
    auth: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path_parameter: Option<&'static str>,
    samples: BTreeMap<Representation, String>,
}

#[derive(Deserialize)]
struct SimulateRequest {
    endpoint: String,
    representation: String,
    text: Option<String>,
}

#[derive(Serialize)]
struct SimulateResponse {
    status: ResultStatus,
    response: Value,
    html: String,
}

impl From<ExecutionResult> for SimulateResponse {
    fn from(result: ExecutionResult) -> Self {
        Self {
            html: result.html(),
            status: result.status,
            response: result.response,
        }
    }
}

#[derive(Deserialize)]
struct OpenPageRequest {
    endpoint: String,
}

#[derive(Deserialize)]
struct SwitchTabRequest {
    representation: String,
}

/// HTTP service for the whole site.
#[derive(Clone)]
pub struct ApiService {
    site_info: SiteInfo,
    base_url: String,
    sessions: Arc<SessionRegistry>,
    renderer: Arc<SiteRenderer>,
}

impl std::fmt::Debug for ApiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiService")
            .field("site_info", &self.site_info)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiService {
    pub fn new(site_info: SiteInfo, base_url: impl Into<String>, executor: Executor) -> Self {
        let base_url = base_url.into();
        Self {
            site_info,
            sessions: Arc::new(SessionRegistry::new(base_url.clone(), executor)),
            base_url,
            renderer: Arc::new(SiteRenderer::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut site_info =
            SiteInfo::new(config.title.clone()).with_version(env!("CARGO_PKG_VERSION"));
        if let Some(description) = &config.description {
            site_info = site_info.with_description(description.clone());
        }
        let sessions = SessionRegistry::new(
            config.api_base_url.clone(),
            Executor::from_millis(config.demo.latency_ms),
        )
        .with_idle_timeout(Duration::from_secs(config.demo.session_idle_secs));
        Self {
            site_info,
            base_url: config.api_base_url.clone(),
            sessions: Arc::new(sessions),
            renderer: Arc::new(SiteRenderer::new()),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    fn serialize_json_response<T: Serialize>(data: &T) -> GiftDocsResult<HttpResponse> {
        serde_json::to_string(data)
            .map(HttpResponse::json)
            .map_err(|e| err!("JSON serialization error: {}", e))
    }

    fn parse_body<T: DeserializeOwned>(request: &HttpRequest) -> GiftDocsResult<T> {
        let body = Self::body_text(request)?;
        serde_json::from_str(&body).map_err(|e| err!("Invalid request body: {}", e))
    }

    fn body_text(request: &HttpRequest) -> GiftDocsResult<String> {
        request
            .body()
            .as_string()
            .ok_or_else(|| err!("Request body is not valid UTF-8"))
    }

    fn query_param(request: &HttpRequest, name: &str) -> Option<String> {
        request.query()?.split('&').find_map(|param| {
            let (key, value) = param.split_once('=').unwrap_or((param, ""));
            (key == name).then(|| {
                percent_decode_str(&value.replace('+', " "))
                    .decode_utf8_lossy()
                    .into_owned()
            })
        })
    }

    fn endpoint_id(id: &str) -> GiftDocsResult<EndpointId> {
        EndpointId::parse(id).ok_or_else(|| err!("Unknown endpoint '{}'", id))
    }

    fn representation(tag: &str) -> GiftDocsResult<Representation> {
        Representation::parse(tag).ok_or_else(|| err!("Unknown representation '{}'", tag))
    }

    fn handle_site_request(&self) -> GiftDocsResult<HttpResponse> {
        Self::serialize_json_response(&SiteInfoResponse {
            title: &self.site_info.title,
            description: self.site_info.description.as_deref(),
            version: self.site_info.version.as_deref(),
            api_base_url: &self.base_url,
        })
    }

    fn handle_endpoints_request(&self, request: &HttpRequest) -> GiftDocsResult<HttpResponse> {
        let query = Self::query_param(request, "q").unwrap_or_default();
        let results: Vec<EndpointSummary> = search_catalog(&query)
            .into_iter()
            .map(EndpointSummary::from)
            .collect();
        debug!(query = %query, hits = results.len(), "Catalog search");
        Self::serialize_json_response(&results)
    }

    fn handle_endpoint_request(&self, id: &str) -> GiftDocsResult<HttpResponse> {
        let endpoint = Self::endpoint_id(id)?;
        let definition = endpoint.definition();
        let samples = CodeSampleSet::defaults(endpoint, &self.base_url);
        let detail = EndpointDetail {
            summary: definition.into(),
            url: sample_url(endpoint, &self.base_url),
            auth: match definition.auth {
                AuthRule::Open => "open",
                AuthRule::BearerMarker => "bearer",
                AuthRule::AllowListed { .. } => "allow-listed",
            },
            path_parameter: definition.path_parameter.map(|parameter| parameter.name),
            samples: samples
                .iter()
                .map(|(representation, text)| (representation, text.to_string()))
                .collect(),
        };
        Self::serialize_json_response(&detail)
    }

    fn handle_simulate_request(&self, request: &HttpRequest) -> GiftDocsResult<HttpResponse> {
        let body: SimulateRequest = Self::parse_body(request)?;
        let endpoint = Self::endpoint_id(&body.endpoint)?;
        let representation = Self::representation(&body.representation)?;
        let text = match body.text {
            Some(text) => text,
            None => CodeSampleSet::defaults(endpoint, &self.base_url)
                .get(representation)
                .to_string(),
        };
        let result = simulate(endpoint, &text, representation);
        Self::serialize_json_response(&SimulateResponse::from(result))
    }

    fn handle_encrypt_request(&self, request: &HttpRequest) -> GiftDocsResult<HttpResponse> {
        let payload = if Self::body_text(request)?.trim().is_empty() {
            mock_data::order_payload()
        } else {
            Self::parse_body::<Value>(request)?
        };
        Self::serialize_json_response(&crypto::envelope(&payload))
    }

    fn handle_quick_try_request(
        &self,
        id: &str,
        request: &HttpRequest,
    ) -> GiftDocsResult<HttpResponse> {
        let endpoint = Self::endpoint_id(id)?;
        let credentials = if request.body().is_empty() {
            DemoCredentials::default()
        } else {
            Self::parse_body(request)?
        };
        let result = quick_try(endpoint, &credentials)
            .ok_or_else(|| err!("Quick try is not available for '{}'", endpoint))?;
        Self::serialize_json_response(&SimulateResponse::from(result))
    }

    fn handle_open_page_request(&self, request: &HttpRequest) -> GiftDocsResult<HttpResponse> {
        let body: OpenPageRequest = Self::parse_body(request)?;
        let endpoint = Self::endpoint_id(&body.endpoint)?;
        let snapshot = self.sessions.open(endpoint);
        Ok(Self::serialize_json_response(&snapshot)?.with_status(HttpStatusCode::Created))
    }

    fn handle_page_request(
        &self,
        method: HttpMethod,
        session_id: &str,
        action: Option<&str>,
        request: &HttpRequest,
    ) -> GiftDocsResult<HttpResponse> {
        let sessions = &self.sessions;
        match (method, action) {
            (HttpMethod::Get, None) => Self::serialize_json_response(&sessions.snapshot(session_id)?),
            (HttpMethod::Delete, None) => {
                sessions.close(session_id)?;
                Ok(HttpResponse::no_content())
            }
            (HttpMethod::Post, Some("tab")) => {
                let body: SwitchTabRequest = Self::parse_body(request)?;
                let representation = Self::representation(&body.representation)?;
                Self::serialize_json_response(&sessions.switch_tab(session_id, representation)?)
            }
            (HttpMethod::Put, Some("text")) => {
                let text = Self::body_text(request)?;
                Self::serialize_json_response(&sessions.edit(session_id, text)?)
            }
            (HttpMethod::Post, Some("execute")) => {
                Self::serialize_json_response(&sessions.execute(session_id)?)
            }
            (HttpMethod::Post, Some("reset")) => {
                Self::serialize_json_response(&sessions.reset(session_id)?)
            }
            (HttpMethod::Get, Some("copy")) => {
                let text = sessions
                    .copy(session_id)?
                    .ok_or_else(|| err!("No response to copy yet"))?;
                Ok(HttpResponse::text(text))
            }
            _ => Err(Self::invalid_endpoint(request)),
        }
    }

    fn invalid_endpoint(request: &HttpRequest) -> Box<GiftDocsError> {
        err!("Invalid API endpoint: {} {}", request.method(), request.path())
    }

    fn route(&self, request: &HttpRequest) -> GiftDocsResult<HttpResponse> {
        let method = request.method();
        let segments: Vec<&str> = request
            .path()
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match (method, segments.as_slice()) {
            (HttpMethod::Get, []) => Ok(HttpResponse::html(
                self.renderer
                    .render_index(&self.site_info.title, self.site_info.description.as_deref()),
            )),
            (HttpMethod::Get, ["docs", id]) => {
                let endpoint = Self::endpoint_id(id)?;
                Ok(HttpResponse::html(
                    self.renderer.render_endpoint_page(endpoint, &self.base_url),
                ))
            }
            (HttpMethod::Get, ["api", "site"]) => self.handle_site_request(),
            (HttpMethod::Get, ["api", "endpoints"]) => self.handle_endpoints_request(request),
            (HttpMethod::Get, ["api", "endpoints", id]) => self.handle_endpoint_request(id),
            (HttpMethod::Post, ["api", "simulate"]) => self.handle_simulate_request(request),
            (HttpMethod::Post, ["api", "encrypt"]) => self.handle_encrypt_request(request),
            (HttpMethod::Post, ["api", "quick-try", id]) => {
                self.handle_quick_try_request(id, request)
            }
            (HttpMethod::Post, ["api", "pages"]) => self.handle_open_page_request(request),
            (_, ["api", "pages", session_id]) => {
                self.handle_page_request(method, session_id, None, request)
            }
            (_, ["api", "pages", session_id, action]) => {
                self.handle_page_request(method, session_id, Some(*action), request)
            }
            _ => Err(Self::invalid_endpoint(request)),
        }
    }
}

impl HttpService for ApiService {
    fn handle_request(&self, request: HttpRequest) -> GiftDocsResult<HttpResponse> {
        let result = self.route(&request);
        match &result {
            Ok(response) => info!(
                method = %request.method(),
                path = %request.path(),
                status = response.status().as_u16(),
                "Handled request"
            ),
            Err(error) => warn!(
                method = %request.method(),
                path = %request.path(),
                error = %error,
                "Request failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use giftdocs_base::http::HttpServerConfig;
    use giftdocs_base::{MockPal, Pal};

    fn create_test_service() -> ApiService {
        let site_info = SiteInfo::new("Test Site")
            .with_description("A test site")
            .with_version("1.0.0");
        ApiService::new(site_info, "https://api.99gift.in", Executor::from_millis(0))
    }

    fn body_json(response: &HttpResponse) -> Value {
        serde_json::from_str(&response.body().as_string().unwrap()).unwrap()
    }

    fn get(service: &ApiService, target: &str) -> GiftDocsResult<HttpResponse> {
        service.handle_request(HttpRequest::new(HttpMethod::Get, target))
    }

    fn post(service: &ApiService, target: &str, body: &str) -> GiftDocsResult<HttpResponse> {
        service.handle_request(HttpRequest::new(HttpMethod::Post, target).with_body(body))
    }

    #[test]
    fn test_handle_site_request_success() {
        let service = create_test_service();
        let response = get(&service, "/api/site?format=json").unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.headers().get("Content-Type"), Some("application/json"));
        expect![[r#"{"title":"Test Site","description":"A test site","version":"1.0.0","api_base_url":"https://api.99gift.in"}"#]]
            .assert_eq(&response.body().as_string().unwrap());
    }

    #[test]
    fn test_endpoint_search() {
        let service = create_test_service();
        let all = body_json(&get(&service, "/api/endpoints").unwrap());
        assert_eq!(all.as_array().unwrap().len(), 10);

        let hits = body_json(&get(&service, "/api/endpoints?q=voucher+status").unwrap());
        assert_eq!(hits[0]["id"], "voucher-status");

        let none = body_json(&get(&service, "/api/endpoints?q=%C3%BCber").unwrap());
        assert_eq!(none, serde_json::json!([]));
    }

    #[test]
    fn test_endpoint_detail() {
        let service = create_test_service();
        let detail = body_json(&get(&service, "/api/endpoints/product-details").unwrap());
        assert_eq!(detail["method"], "GET");
        assert_eq!(detail["url"], "https://api.99gift.in/product/infos/694");
        assert_eq!(detail["auth"], "open");
        assert_eq!(detail["path_parameter"], "productId");
        assert!(detail["samples"]["curl"].as_str().unwrap().starts_with("curl -X GET"));
        assert_eq!(detail["samples"].as_object().unwrap().len(), 4);

        let error = get(&service, "/api/endpoints/refund").unwrap_err();
        assert_eq!(error.to_string(), "Unknown endpoint 'refund'");
    }

    #[test]
    fn test_simulate_default_and_edited() {
        let service = create_test_service();
        let response = post(
            &service,
            "/api/simulate",
            r#"{"endpoint": "login", "representation": "curl"}"#,
        )
        .unwrap();
        let body = body_json(&response);
        assert_eq!(body["status"], "success");
        assert_eq!(body["response"]["message"], "Login Success!");
        assert!(body["html"].as_str().unwrap().contains("token string"));

        let edited = post(
            &service,
            "/api/simulate",
            r#"{"endpoint": "product-search", "representation": "js", "text": "const productListData = { search: 'banana' };"}"#,
        )
        .unwrap();
        let body = body_json(&edited);
        assert_eq!(body["status"], "error");
        assert_eq!(body["response"]["status"], false);
    }

    #[test]
    fn test_simulate_rejects_bad_body() {
        let service = create_test_service();
        let error = post(&service, "/api/simulate", "not json").unwrap_err();
        assert!(error.to_string().starts_with("Invalid request body"), "{error}");

        let error = post(
            &service,
            "/api/simulate",
            r#"{"endpoint": "login", "representation": "ruby"}"#,
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "Unknown representation 'ruby'");
    }

    #[test]
    fn test_encrypt() {
        let service = create_test_service();
        let body = body_json(&post(&service, "/api/encrypt", r#"{"productId":694}"#).unwrap());
        assert_eq!(body["data"], "rg8o7w4fVjErmLkDRe1vZxA7BMhi1orT7/g+ivVC0xw=");

        let default = body_json(&post(&service, "/api/encrypt", "").unwrap());
        assert_eq!(crypto::open_envelope(&default).unwrap(), mock_data::order_payload());
    }

    #[test]
    fn test_quick_try() {
        let service = create_test_service();
        let login = body_json(&post(&service, "/api/quick-try/login", "").unwrap());
        assert_eq!(login["status"], "success");

        let denied = body_json(
            &post(&service, "/api/quick-try/login", r#"{"authcode": "111111"}"#).unwrap(),
        );
        assert_eq!(denied["response"]["message"], "Invalid credentials or 2FA code");

        let error = post(&service, "/api/quick-try/wallet-statement", "").unwrap_err();
        assert_eq!(error.to_string(), "Quick try is not available for 'wallet-statement'");
    }

    #[test]
    fn test_page_lifecycle() {
        let service = create_test_service();
        let opened = post(&service, "/api/pages", r#"{"endpoint": "profile"}"#).unwrap();
        assert_eq!(opened.status(), HttpStatusCode::Created);
        let session_id = body_json(&opened)["session_id"].as_str().unwrap().to_string();
        let page = |action: &str| format!("/api/pages/{session_id}{action}");

        let tab = post(&service, &page("/tab"), r#"{"representation": "python"}"#).unwrap();
        assert_eq!(body_json(&tab)["active"], "python");

        let copy = get(&service, &page("/copy")).unwrap_err();
        assert_eq!(copy.to_string(), "No response to copy yet");

        let executed = body_json(&post(&service, &page("/execute"), "").unwrap());
        assert_eq!(executed["state"], "success");
        assert_eq!(executed["response"]["message"], "User details!");

        let copied = get(&service, &page("/copy")).unwrap();
        assert_eq!(copied.headers().get("content-type"), Some("text/plain; charset=utf-8"));
        assert!(copied.body().as_string().unwrap().contains("\"name\": \"Amarnath\""));

        let edited = service
            .handle_request(HttpRequest::new(HttpMethod::Put, page("/text")).with_body("nothing"))
            .unwrap();
        assert_eq!(body_json(&edited)["modified"], true);

        let reset = body_json(&post(&service, &page("/reset"), "").unwrap());
        assert_eq!(reset["state"], "idle");
        assert_eq!(reset["modified"], false);

        let closed = service
            .handle_request(HttpRequest::new(HttpMethod::Delete, page("")))
            .unwrap();
        assert_eq!(closed.status(), HttpStatusCode::NoContent);
        assert_eq!(service.sessions().live_editors(), 0);
        assert!(get(&service, &page("")).is_err());
    }

    #[test]
    fn test_html_pages() {
        let service = create_test_service();
        let index = get(&service, "/").unwrap();
        assert_eq!(index.headers().get("content-type"), Some("text/html; charset=utf-8"));
        assert!(index.body().as_string().unwrap().contains("<h1>Test Site</h1>"));

        let docs = get(&service, "/docs/order-place").unwrap();
        assert!(docs.body().as_string().unwrap().contains("Order Place API"));
    }

    #[test]
    fn test_handle_invalid_endpoint() {
        let service = create_test_service();
        let error = get(&service, "/api/other").unwrap_err();
        assert_eq!(error.to_string(), "Invalid API endpoint: GET /api/other");

        let error = service
            .handle_request(HttpRequest::new(HttpMethod::Put, "/api/site"))
            .unwrap_err();
        assert_eq!(error.to_string(), "Invalid API endpoint: PUT /api/site");
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.title = "Staging Docs".to_string();
        config.demo.session_idle_secs = 90;
        let service = ApiService::from_config(&config);
        assert_eq!(service.sessions().idle_timeout(), Duration::from_secs(90));
        let body = body_json(&get(&service, "/api/site").unwrap());
        assert_eq!(body["title"], "Staging Docs");
    }

    #[test]
    fn test_requests_through_mock_pal() {
        let mock = MockPal::new();
        let handle = mock
            .start_http_server(Box::new(create_test_service()), HttpServerConfig::default())
            .unwrap();
        assert_eq!(mock.http_server_count(), 1);

        let response = mock
            .simulate_request(handle.port(), HttpRequest::new(HttpMethod::Get, "/api/site"))
            .unwrap();
        assert!(response.body().as_string().unwrap().contains("Test Site"));

        let error = mock
            .simulate_request(handle.port(), HttpRequest::new(HttpMethod::Get, "/nope"))
            .unwrap_err();
        assert!(error.to_string().contains("Invalid API endpoint"));
    }
}
