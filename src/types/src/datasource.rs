use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Qos, PASSWORD_KEY};

/// Plain (non secret) datasource options, the host's `jsonData`.
///
/// Keys this datasource does not know about are kept in `extra` so that a
/// rewrite of one field never drops anything the host stored.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos: Option<Qos>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DatasourceOptions {
    pub fn broker_url(&self) -> &str {
        self.broker_url.as_deref().unwrap_or_default()
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or_default()
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    pub fn effective_qos(&self) -> Qos {
        Qos::resolve(self.qos)
    }
}

/// Write-only secret values, the host's `secureJsonData`.
#[derive(Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct SecureJsonData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Debug for SecureJsonData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&String> = self.extra.keys().collect();
        f.debug_struct("SecureJsonData")
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("extra", &keys)
            .finish()
    }
}

/// Which secrets the host holds, the host's `secureJsonFields`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct SecureJsonFields(BTreeMap<String, bool>);

impl SecureJsonFields {
    pub fn is_configured(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, configured: bool) {
        self.0.insert(key.into(), configured);
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }
}

/// The full options object of a datasource instance as the host persists it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceSettings {
    #[serde(default)]
    pub json_data: DatasourceOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_json_data: Option<SecureJsonData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_json_fields: Option<SecureJsonFields>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DatasourceSettings {
    pub fn is_secret_configured(&self, key: &str) -> bool {
        self.secure_json_fields
            .as_ref()
            .map(|fields| fields.is_configured(key))
            .unwrap_or(false)
    }

    pub fn is_password_configured(&self) -> bool {
        self.is_secret_configured(PASSWORD_KEY)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_host_object() {
        let settings: DatasourceSettings = serde_json::from_value(json!({
            "id": 3,
            "uid": "mqtt-1",
            "name": "MQTT",
            "jsonData": {
                "brokerUrl": "tcp://localhost:1883",
                "username": "admin",
                "qos": 2,
                "tlsSkipVerify": true
            },
            "secureJsonFields": { "password": true }
        }))
        .unwrap();

        assert_eq!(settings.json_data.broker_url(), "tcp://localhost:1883");
        assert_eq!(settings.json_data.client_id, None);
        assert_eq!(settings.json_data.client_id(), "");
        assert_eq!(settings.json_data.qos, Some(Qos::ExactlyOnce));
        assert_eq!(settings.json_data.extra["tlsSkipVerify"], json!(true));
        assert_eq!(settings.extra["uid"], json!("mqtt-1"));
        assert!(settings.is_password_configured());
        assert_eq!(settings.secure_json_data, None);
    }

    #[test]
    fn test_round_trip_keeps_unknown_keys() {
        let raw = json!({
            "uid": "a",
            "jsonData": { "brokerUrl": "", "custom": { "nested": [1, 2] } }
        });
        let settings: DatasourceSettings = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&settings).unwrap(), raw);
    }

    #[test]
    fn test_missing_parts() {
        let settings: DatasourceSettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings.json_data, DatasourceOptions::default());
        assert!(!settings.is_password_configured());
        assert_eq!(settings.secure_json_data, None);
        assert_eq!(settings.json_data.effective_qos(), Qos::AtLeastOnce);
    }

    #[test]
    fn test_null_qos() {
        let options: DatasourceOptions = serde_json::from_value(json!({ "qos": null })).unwrap();
        assert_eq!(options.qos, None);
        assert!(serde_json::from_value::<DatasourceOptions>(json!({ "qos": 5 })).is_err());
    }

    #[test]
    fn test_secure_debug() {
        let data = SecureJsonData {
            password: Some("hunter2".to_owned()),
            extra: Map::new(),
        };
        let out = format!("{:?}", data);
        assert!(!out.contains("hunter2"));
        assert!(out.contains("***"));
    }
}
