/* 📖 # Why is the key hard-coded?

This is the payload encryption shown to API callers: AES-256-CBC with PKCS#7
padding, base64 output, wrapped as `{"data": <cipher>}`. The key and IV are the
published demo values, so anyone can reproduce the samples. They protect
nothing and must never be reused for real traffic.
*/

use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serde_json::{Value, json};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub const DEMO_KEY: &[u8; 32] = b"12345678901234567890123456789012";
pub const DEMO_IV: &[u8; 16] = b"1234567890123456";

/// Decryption failed, or the plaintext was not the expected JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoError {
    pub message: String,
}

impl CryptoError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CryptoError {}

/// Encrypt `text` with the demo key and IV, returning standard base64.
pub fn encrypt_text(text: &str) -> String {
    let cipher = Aes256CbcEnc::new(DEMO_KEY.into(), DEMO_IV.into());
    let bytes = cipher.encrypt_padded_vec_mut::<Pkcs7>(text.as_bytes());
    STANDARD.encode(bytes)
}

pub fn decrypt_text(ciphertext: &str) -> Result<String, CryptoError> {
    let bytes = STANDARD
        .decode(ciphertext.trim())
        .map_err(|e| CryptoError::new(format!("ciphertext is not valid base64: {e}")))?;
    let cipher = Aes256CbcDec::new(DEMO_KEY.into(), DEMO_IV.into());
    let plain = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
        .map_err(|_| CryptoError::new("ciphertext does not decrypt with the demo key"))?;
    String::from_utf8(plain).map_err(|_| CryptoError::new("decrypted payload is not UTF-8"))
}

/// Serialize `payload` compactly and encrypt it.
pub fn encrypt_payload(payload: &Value) -> String {
    encrypt_text(&payload.to_string())
}

/// The request body actually sent: `{"data": <cipher>}`.
pub fn envelope(payload: &Value) -> Value {
    json!({ "data": encrypt_payload(payload) })
}

/// Inverse of [`envelope`].
pub fn open_envelope(envelope: &Value) -> Result<Value, CryptoError> {
    let ciphertext = envelope
        .get("data")
        .and_then(Value::as_str)
        .ok_or_else(|| CryptoError::new("envelope has no \"data\" string"))?;
    let plain = decrypt_text(ciphertext)?;
    serde_json::from_str(&plain)
        .map_err(|e| CryptoError::new(format!("decrypted payload is not JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data;

    #[test]
    fn test_known_answer() {
        let payload = json!({"productId": 694});
        assert_eq!(
            encrypt_payload(&payload),
            "rg8o7w4fVjErmLkDRe1vZxA7BMhi1orT7/g+ivVC0xw="
        );
    }

    #[test]
    fn test_envelope_roundtrip_keeps_key_order() {
        let order = mock_data::order_payload();
        let sealed = envelope(&order);
        let opened = open_envelope(&sealed).unwrap();
        assert_eq!(opened, order);
        assert_eq!(opened.to_string(), order.to_string());
    }

    #[test]
    fn test_decrypt_rejects_garbage() {
        let err = decrypt_text("not base64!").unwrap_err();
        assert!(err.message.starts_with("ciphertext is not valid base64"));

        // five bytes: not a whole block
        let err = decrypt_text("AAAAAAA=").unwrap_err();
        assert_eq!(err.message, "ciphertext does not decrypt with the demo key");

        let err = open_envelope(&json!({"data": 5})).unwrap_err();
        assert_eq!(err.message, "envelope has no \"data\" string");
    }

    #[test]
    fn test_encrypt_empty_text_is_one_block() {
        let cipher = encrypt_text("");
        assert_eq!(STANDARD.decode(&cipher).unwrap().len(), 16);
        assert_eq!(decrypt_text(&cipher).unwrap(), "");
    }
}
