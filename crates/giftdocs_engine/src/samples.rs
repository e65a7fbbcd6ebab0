/* 📖 # Why generate the default samples?

All four representations of an endpoint describe the same request, so they are
rendered from one source: the endpoint definition plus its default payload. The
payload literal is written by the same literal module that reads it back, which
keeps "extracting an unmodified sample gives the default payload" true for every
endpoint without maintaining forty hand-written strings.
*/

use std::collections::BTreeMap;

use serde_json::Value;

use crate::crypto;
use crate::endpoint::EndpointId;
use crate::extract;
use crate::literal::render_literal;
use crate::mock_data;
use crate::representation::Representation;

pub const PLACEHOLDER_TOKEN: &str = "YOUR_API_KEY";

/// The editable samples of one endpoint page, with the defaults they reset to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSampleSet {
    endpoint: EndpointId,
    defaults: BTreeMap<Representation, String>,
    current: BTreeMap<Representation, String>,
}

impl CodeSampleSet {
    pub fn defaults(endpoint: EndpointId, base_url: &str) -> Self {
        let defaults: BTreeMap<Representation, String> = Representation::ALL
            .into_iter()
            .map(|representation| {
                (
                    representation,
                    default_sample(endpoint, representation, base_url),
                )
            })
            .collect();
        Self {
            endpoint,
            current: defaults.clone(),
            defaults,
        }
    }

    pub fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    pub fn get(&self, representation: Representation) -> &str {
        self.current
            .get(&representation)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn default_text(&self, representation: Representation) -> &str {
        self.defaults
            .get(&representation)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn set(&mut self, representation: Representation, text: impl Into<String>) {
        self.current.insert(representation, text.into());
    }

    pub fn is_modified(&self, representation: Representation) -> bool {
        self.get(representation) != self.default_text(representation)
    }

    /// Restore every representation to its default text.
    pub fn reset(&mut self) {
        self.current = self.defaults.clone();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Representation, &str)> {
        self.current
            .iter()
            .map(|(representation, text)| (*representation, text.as_str()))
    }
}

/// Request URL of the default sample, with path placeholders filled in.
pub fn sample_url(endpoint: EndpointId, base_url: &str) -> String {
    let definition = endpoint.definition();
    let mut path = definition.path.to_string();
    if let (Some(parameter), Some(value)) = (
        definition.path_parameter,
        mock_data::default_path_value(endpoint),
    ) {
        path = path.replace(&format!("{{{}}}", parameter.name), &value);
    }
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Everything a sample needs to know about its request.
struct SampleRequest {
    endpoint: EndpointId,
    method: &'static str,
    url: String,
    bearer: bool,
    payload: Option<Value>,
    /// Body is sent as the encrypted envelope.
    encrypted: bool,
}

impl SampleRequest {
    fn new(endpoint: EndpointId, base_url: &str) -> Self {
        let definition = endpoint.definition();
        Self {
            endpoint,
            method: definition.method.as_str(),
            url: sample_url(endpoint, base_url),
            bearer: matches!(definition.auth, crate::gate::AuthRule::BearerMarker),
            payload: mock_data::default_payload(endpoint),
            encrypted: endpoint == EndpointId::OrderPlace,
        }
    }

    fn variable(&self, representation: Representation) -> Option<&'static str> {
        extract::payload_variable(self.endpoint, representation)
    }

    fn log_label(&self) -> &'static str {
        self.endpoint.definition().title
    }
}

pub fn default_sample(endpoint: EndpointId, representation: Representation, base_url: &str) -> String {
    let request = SampleRequest::new(endpoint, base_url);
    match representation {
        Representation::Curl => curl_sample(&request),
        Representation::JavaScript => javascript_sample(&request),
        Representation::Python => python_sample(&request),
        Representation::Php => php_sample(&request),
    }
}

fn curl_sample(request: &SampleRequest) -> String {
    let mut lines = vec![
        format!("curl -X {}", request.method),
        format!("'{}'", request.url),
        "-H 'Content-Type: application/json'".to_string(),
    ];
    if request.bearer {
        lines.push(format!("-H 'Authorization: Bearer {PLACEHOLDER_TOKEN}'"));
    }
    if let Some(payload) = &request.payload {
        let body = if request.encrypted {
            crypto::envelope(payload)
        } else {
            payload.clone()
        };
        lines.push(format!("-d '{}'", render_literal(&body, Representation::Curl.dialect())));
    }
    lines.join(" \\\n")
}

fn javascript_sample(request: &SampleRequest) -> String {
    let mut out = String::from("// Using Fetch API\n");
    let variable = request.variable(Representation::JavaScript);
    if let (Some(payload), Some(variable)) = (&request.payload, variable) {
        out.push_str(&format!(
            "const {variable} = {};\n\n",
            render_literal(payload, Representation::JavaScript.dialect())
        ));
    }
    if request.encrypted {
        out.push_str("// encryptData() is listed in the payload encryption guide\n");
    }

    let mut headers = vec!["    'Content-Type': 'application/json'".to_string()];
    if request.bearer {
        headers.push(format!("    'Authorization': 'Bearer {PLACEHOLDER_TOKEN}'"));
    }
    let mut options = vec![
        format!("  method: '{}'", request.method),
        format!("  headers: {{\n{}\n  }}", headers.join(",\n")),
    ];
    if let (Some(_), Some(variable)) = (&request.payload, variable) {
        if request.encrypted {
            options.push(format!("  body: JSON.stringify({{ data: encryptData({variable}) }})"));
        } else {
            options.push(format!("  body: JSON.stringify({variable})"));
        }
    }

    out.push_str(&format!(
        "fetch('{}', {{\n{}\n}})\n",
        request.url,
        options.join(",\n")
    ));
    out.push_str(".then(response => response.json())\n");
    out.push_str(&format!(
        ".then(data => console.log('{}:', data))\n",
        request.log_label()
    ));
    out.push_str(".catch(error => console.error('Error:', error));");
    out
}

fn python_sample(request: &SampleRequest) -> String {
    let mut out = String::from("import requests\n\n");
    let variable = request.variable(Representation::Python);
    if let (Some(payload), Some(variable)) = (&request.payload, variable) {
        out.push_str(&format!(
            "{variable} = {}\n\n",
            render_literal(payload, Representation::Python.dialect())
        ));
    }

    let mut headers = vec!["    \"Content-Type\": \"application/json\"".to_string()];
    if request.bearer {
        headers.push(format!("    \"Authorization\": \"Bearer {PLACEHOLDER_TOKEN}\""));
    }
    let mut arguments = vec![format!("  \"{}\"", request.url)];
    if let (Some(_), Some(variable)) = (&request.payload, variable) {
        if request.encrypted {
            arguments.push(format!("  json={{\"data\": encrypt_data({variable})}}"));
        } else {
            arguments.push(format!("  json={variable}"));
        }
    }
    arguments.push(format!("  headers={{\n{}\n  }}", headers.join(",\n")));

    out.push_str(&format!(
        "response = requests.{}(\n{}\n)\n\n",
        request.method.to_lowercase(),
        arguments.join(",\n")
    ));
    out.push_str("if response.status_code == 200:\n");
    out.push_str(&format!("  print(\"{}:\", response.json())\n", request.log_label()));
    out.push_str("else:\n");
    out.push_str("  print(\"Error:\", response.text)");
    out
}

fn php_sample(request: &SampleRequest) -> String {
    let mut out = String::from("<?php\n");
    let variable = request.variable(Representation::Php);
    if let (Some(payload), Some(variable)) = (&request.payload, variable) {
        out.push_str(&format!(
            "{variable} = {};\n\n",
            render_literal(payload, Representation::Php.dialect())
        ));
    }

    let mut header = String::from("Content-Type: application/json\\r\\n");
    if request.bearer {
        header.push_str(&format!("Authorization: Bearer {PLACEHOLDER_TOKEN}\\r\\n"));
    }
    let mut http = vec![
        format!("    'header' => \"{header}\""),
        format!("    'method' => '{}'", request.method),
    ];
    if let (Some(_), Some(variable)) = (&request.payload, variable) {
        if request.encrypted {
            http.push(format!(
                "    'content' => json_encode(['data' => encryptData({variable}, $secretKey, $iv)])"
            ));
        } else {
            http.push(format!("    'content' => json_encode({variable})"));
        }
    }

    out.push_str(&format!(
        "$options = [\n  'http' => [\n{}\n  ]\n];\n\n",
        http.join(",\n")
    ));
    out.push_str("$context = stream_context_create($options);\n");
    out.push_str(&format!(
        "$response = file_get_contents('{}', false, $context);\n\n",
        request.url
    ));
    out.push_str("if ($response !== false) {\n");
    out.push_str("  print_r(json_decode($response, true));\n");
    out.push_str("} else {\n");
    out.push_str("  echo \"Request failed\";\n");
    out.push_str("}\n?>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::has_authorization_marker;
    use expect_test::expect;

    const BASE_URL: &str = "https://api.99gift.in";

    #[test]
    fn test_reset_restores_defaults() {
        for endpoint in EndpointId::ALL {
            let mut samples = CodeSampleSet::defaults(endpoint, BASE_URL);
            for representation in Representation::ALL {
                samples.set(representation, "edited");
                assert!(samples.is_modified(representation));
            }
            samples.reset();
            for representation in Representation::ALL {
                assert_eq!(
                    samples.get(representation),
                    default_sample(endpoint, representation, BASE_URL)
                );
                assert!(!samples.is_modified(representation));
            }
        }
    }

    #[test]
    fn test_defaults_extract_to_default_payload() {
        for endpoint in EndpointId::ALL {
            let samples = CodeSampleSet::defaults(endpoint, BASE_URL);
            for representation in Representation::ALL {
                let request = extract::extract(endpoint, samples.get(representation), representation)
                    .unwrap_or_else(|e| panic!("{endpoint} {representation}: {e}"));
                let mut payload = request.payload;
                if endpoint == EndpointId::OrderPlace && representation == Representation::Curl {
                    payload = payload.map(|envelope| crypto::open_envelope(&envelope).unwrap());
                }
                assert_eq!(payload, mock_data::default_payload(endpoint), "{endpoint} {representation}");
                assert_eq!(
                    request.path_value,
                    mock_data::default_path_value(endpoint),
                    "{endpoint} {representation}"
                );
            }
        }
    }

    #[test]
    fn test_bearer_marker_follows_auth_rule() {
        for endpoint in EndpointId::ALL {
            let bearer = matches!(endpoint.definition().auth, crate::gate::AuthRule::BearerMarker);
            for representation in Representation::ALL {
                let text = default_sample(endpoint, representation, BASE_URL);
                assert_eq!(
                    has_authorization_marker(&text, representation),
                    bearer,
                    "{endpoint} {representation}"
                );
            }
        }
    }

    #[test]
    fn test_sample_url_fills_placeholder() {
        assert_eq!(
            sample_url(EndpointId::VoucherStatus, "http://localhost:9000/"),
            "http://localhost:9000/user/voucher-status/ZP1111799"
        );
    }

    #[test]
    fn test_login_curl_sample() {
        expect![[r#"
            curl -X POST \
            'https://api.99gift.in/user/login-Corporate/merchant' \
            -H 'Content-Type: application/json' \
            -d '{
              "mobile": "9182XXXXX94",
              "password": "test@123",
              "authcode": "128636"
            }'"#]]
        .assert_eq(&default_sample(EndpointId::Login, Representation::Curl, BASE_URL));
    }

    #[test]
    fn test_profile_javascript_sample() {
        expect![[r#"
            // Using Fetch API
            fetch('https://api.99gift.in/user/validate-token', {
              method: 'GET',
              headers: {
                'Content-Type': 'application/json',
                'Authorization': 'Bearer YOUR_API_KEY'
              }
            })
            .then(response => response.json())
            .then(data => console.log('Profile API:', data))
            .catch(error => console.error('Error:', error));"#]]
        .assert_eq(&default_sample(EndpointId::Profile, Representation::JavaScript, BASE_URL));
    }

    #[test]
    fn test_login_python_sample() {
        expect![[r#"
            import requests

            login_data = {
              "mobile": "9182XXXXX94",
              "password": "test@123",
              "authcode": "128636"
            }

            response = requests.post(
              "https://api.99gift.in/user/login-Corporate/merchant",
              json=login_data,
              headers={
                "Content-Type": "application/json"
              }
            )

            if response.status_code == 200:
              print("Login API:", response.json())
            else:
              print("Error:", response.text)"#]]
        .assert_eq(&default_sample(EndpointId::Login, Representation::Python, BASE_URL));
    }

    #[test]
    fn test_order_report_php_sample() {
        expect![[r#"
            <?php
            $reportData = [
              'search' => null,
              'filterBy' => null,
              'date' => [
                'from' => '2025/05/30',
                'to' => '2025/06/30'
              ],
              'pagination' => [
                'sortBy' => 'id',
                'descending' => true,
                'page' => 1,
                'rowsPerPage' => 10,
                'rowsNumber' => 0
              ],
              'status' => 0
            ];

            $options = [
              'http' => [
                'header' => "Content-Type: application/json\r\nAuthorization: Bearer YOUR_API_KEY\r\n",
                'method' => 'POST',
                'content' => json_encode($reportData)
              ]
            ];

            $context = stream_context_create($options);
            $response = file_get_contents('https://api.99gift.in/user/reports/0', false, $context);

            if ($response !== false) {
              print_r(json_decode($response, true));
            } else {
              echo "Request failed";
            }
            ?>"#]]
        .assert_eq(&default_sample(EndpointId::OrderReport, Representation::Php, BASE_URL));
    }
}
