//! Base64 text encoding for persisted byte fields.
//!
//! The `bytes` and `array` submodules plug into `#[serde(with = "...")]`.
//! Fixed-size arrays reject any decoded length other than their own.

use crate::error::{CryptoError, CryptoResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

pub fn decode(text: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptoError::Encoding(e.to_string()))
}

/// Variable-length byte vectors.
pub mod bytes {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::decode(&text).map_err(D::Error::custom)
    }
}

/// Fixed-size byte arrays (salts, IVs).
pub mod array {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let decoded = super::decode(&text).map_err(D::Error::custom)?;
        <[u8; N]>::try_from(decoded.as_slice()).map_err(|_| {
            D::Error::custom(format!("expected {N} bytes, got {}", decoded.len()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_alphabet_with_padding() {
        assert_eq!(encode([0xfbu8, 0xff]), "+/8=");
        assert_eq!(decode("+/8=").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn invalid_text_is_rejected() {
        assert!(matches!(decode("not base64!"), Err(CryptoError::Encoding(_))));
    }
}
