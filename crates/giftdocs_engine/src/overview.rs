/* 📖 # What is on the overview page?

The landing page has a quick-try panel for the four core calls (login, profile,
product list, order place). Unlike the endpoint pages these do not parse any
code: login compares the three demo credentials typed into the form, and the
other three always return their canned answer. The page also carries the
payload encryption guide with one snippet per client language.
*/

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::endpoint::EndpointId;
use crate::mock_data::{self, DEFAULT_PRODUCT_ID, DEMO_AUTHCODE, DEMO_MOBILE, DEMO_PASSWORD};
use crate::response::MockResponse;
use crate::simulate::{self, ExecutionResult};
use crate::table::PaginationBlock;

/// Endpoints offered in the quick-try panel, in page order.
pub const QUICK_TRY_ENDPOINTS: [EndpointId; 4] = [
    EndpointId::Login,
    EndpointId::Profile,
    EndpointId::ProductList,
    EndpointId::OrderPlace,
];

/// Credentials typed into the quick-try login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoCredentials {
    pub mobile: String,
    pub password: String,
    pub authcode: String,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self {
            mobile: DEMO_MOBILE.to_string(),
            password: DEMO_PASSWORD.to_string(),
            authcode: DEMO_AUTHCODE.to_string(),
        }
    }
}

impl DemoCredentials {
    pub fn is_valid(&self) -> bool {
        self.mobile == DEMO_MOBILE && self.password == DEMO_PASSWORD && self.authcode == DEMO_AUTHCODE
    }
}

/// Canned answer of the quick-try panel, or `None` for endpoints it does not offer.
pub fn quick_try(endpoint: EndpointId, credentials: &DemoCredentials) -> Option<ExecutionResult> {
    debug!(endpoint = %endpoint, "Quick try");
    let result = match endpoint {
        EndpointId::Login if credentials.is_valid() => {
            ExecutionResult::success(simulate::login_success())
        }
        EndpointId::Login => ExecutionResult::error("Invalid credentials or 2FA code"),
        EndpointId::Profile => ExecutionResult::success(simulate::profile_success()),
        EndpointId::ProductList => ExecutionResult::success(featured_products()),
        EndpointId::OrderPlace => ExecutionResult::success(simulate::order_placed()),
        _ => return None,
    };
    Some(result)
}

fn featured_products() -> serde_json::Value {
    let featured: Vec<_> = mock_data::products()
        .into_iter()
        .filter(|row| row["id"] == json!(DEFAULT_PRODUCT_ID))
        .collect();
    let pagination = PaginationBlock {
        page: 1,
        rows_per_page: 100,
        sort_by: "display".to_string(),
        descending: false,
        total: featured.len(),
    };
    MockResponse::success("Card's List New!")
        .data(json!(featured))
        .pagination(&pagination)
        .into_value()
}

/// Client languages covered by the encryption guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetLanguage {
    JavaScript,
    Python,
    Php,
    Java,
}

impl SnippetLanguage {
    pub const ALL: [SnippetLanguage; 4] = [
        SnippetLanguage::JavaScript,
        SnippetLanguage::Python,
        SnippetLanguage::Php,
        SnippetLanguage::Java,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SnippetLanguage::JavaScript => "JavaScript",
            SnippetLanguage::Python => "Python",
            SnippetLanguage::Php => "PHP",
            SnippetLanguage::Java => "Java",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            SnippetLanguage::JavaScript => "js",
            SnippetLanguage::Python => "py",
            SnippetLanguage::Php => "php",
            SnippetLanguage::Java => "java",
        }
    }

    /// How to build the `{"data": ...}` envelope in this language.
    pub fn encryption_snippet(&self) -> &'static str {
        match self {
            SnippetLanguage::JavaScript => JS_SNIPPET,
            SnippetLanguage::Python => PYTHON_SNIPPET,
            SnippetLanguage::Php => PHP_SNIPPET,
            SnippetLanguage::Java => JAVA_SNIPPET,
        }
    }
}

const JS_SNIPPET: &str = r#"// npm install crypto-js
const CryptoJS = require('crypto-js');

const secretKey = '12345678901234567890123456789012';
const iv = '1234567890123456';

function encryptData(data) {
  const key = CryptoJS.enc.Utf8.parse(secretKey);
  const ivBytes = CryptoJS.enc.Utf8.parse(iv);
  const encrypted = CryptoJS.AES.encrypt(JSON.stringify(data), key, {
    iv: ivBytes,
    mode: CryptoJS.mode.CBC,
    padding: CryptoJS.pad.Pkcs7
  });
  return encrypted.toString();
}

const body = JSON.stringify({ data: encryptData(orderData) });
"#;

const PYTHON_SNIPPET: &str = r#"# pip install pycryptodome
import base64
import json

from Crypto.Cipher import AES
from Crypto.Util.Padding import pad

SECRET_KEY = b"12345678901234567890123456789012"
IV = b"1234567890123456"


def encrypt_data(data):
    plain = json.dumps(data, separators=(",", ":")).encode("utf-8")
    cipher = AES.new(SECRET_KEY, AES.MODE_CBC, IV)
    return base64.b64encode(cipher.encrypt(pad(plain, AES.block_size))).decode("ascii")


body = {"data": encrypt_data(order_data)}
"#;

const PHP_SNIPPET: &str = r#"<?php
$secretKey = '12345678901234567890123456789012';
$iv = '1234567890123456';

function encryptData($data, $secretKey, $iv) {
    $plain = json_encode($data);
    // OPENSSL_RAW_DATA off: the result is already base64
    return openssl_encrypt($plain, 'AES-256-CBC', $secretKey, 0, $iv);
}

$body = json_encode(['data' => encryptData($orderData, $secretKey, $iv)]);
"#;

const JAVA_SNIPPET: &str = r#"import javax.crypto.Cipher;
import javax.crypto.spec.IvParameterSpec;
import javax.crypto.spec.SecretKeySpec;
import java.nio.charset.StandardCharsets;
import java.util.Base64;

public class PayloadEncryption {
    private static final String SECRET_KEY = "12345678901234567890123456789012";
    private static final String IV = "1234567890123456";

    public static String encryptData(String json) throws Exception {
        SecretKeySpec key = new SecretKeySpec(SECRET_KEY.getBytes(StandardCharsets.UTF_8), "AES");
        IvParameterSpec iv = new IvParameterSpec(IV.getBytes(StandardCharsets.UTF_8));
        Cipher cipher = Cipher.getInstance("AES/CBC/PKCS5Padding");
        cipher.init(Cipher.ENCRYPT_MODE, key, iv);
        byte[] encrypted = cipher.doFinal(json.getBytes(StandardCharsets.UTF_8));
        return Base64.getEncoder().encodeToString(encrypted);
    }
}
"#;
