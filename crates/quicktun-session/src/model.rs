//! Session data model
//!
//! Field names on the wire match the original credentials file format, so a
//! file written by an older deployment still loads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credentials for one ephemeral tunnel, as issued by the provisioning
/// service. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "AccountTag")]
    pub account_tag: String,
    /// Raw tunnel secret; base64 in the JSON document.
    #[serde(rename = "TunnelSecret", with = "base64_bytes")]
    pub tunnel_secret: Vec<u8>,
    #[serde(rename = "TunnelID")]
    pub tunnel_id: Uuid,
    #[serde(rename = "TunnelName")]
    pub tunnel_name: String,
}

/// The durable unit of state for one tunnel session: the public URL plus the
/// credentials that back it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fully-qualified public URL, always scheme-prefixed.
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Credentials")]
    pub credentials: Credentials,
}

/// Serde adapter: `Vec<u8>` <-> standard base64 string.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionConfig {
        SessionConfig {
            url: "https://abc.trycloudflare.com".to_string(),
            credentials: Credentials {
                account_tag: "acct-123".to_string(),
                tunnel_secret: vec![1, 2, 3, 4],
                tunnel_id: Uuid::parse_str("6a184b56-74cf-48f4-9b9a-ba0a1a0cb5b8").unwrap(),
                tunnel_name: "quick".to_string(),
            },
        }
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("URL").is_some());
        let creds = json.get("Credentials").unwrap();
        assert!(creds.get("AccountTag").is_some());
        assert!(creds.get("TunnelID").is_some());
        assert!(creds.get("TunnelName").is_some());
        // secret is base64, not an array
        assert_eq!(
            creds.get("TunnelSecret").unwrap().as_str().unwrap(),
            "AQIDBA=="
        );
    }

    #[test]
    fn test_round_trip() {
        let config = sample();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_tunnel_id_must_be_uuid() {
        let json = r#"{
            "URL": "https://abc.trycloudflare.com",
            "Credentials": {
                "AccountTag": "acct",
                "TunnelSecret": "AQID",
                "TunnelID": "not-a-uuid",
                "TunnelName": "quick"
            }
        }"#;
        assert!(serde_json::from_str::<SessionConfig>(json).is_err());
    }
}
