use std::{collections::HashMap, fmt};

use common::{DsError, DsResult};
use rumqttc::{MqttOptions, QoS, Transport};
use tracing::{debug, info};
use types::{DatasourceOptions, DatasourceSettings, Qos, PASSWORD_KEY};
use url::{Host, Url};
use uuid::Uuid;

pub const DEFAULT_PORT: u16 = 1883;
pub const DEFAULT_TLS_PORT: u16 = 8883;

/// Connection settings with the secret merged in, as handed to the MQTT client.
#[derive(Clone, PartialEq)]
pub struct ResolvedSettings {
    pub broker_url: String,
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub qos: Qos,
}

impl fmt::Debug for ResolvedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSettings")
            .field("broker_url", &self.broker_url)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("qos", &self.qos)
            .finish()
    }
}

/// Builds the client settings from the instance's `jsonData` and its
/// decrypted secrets. Secrets other than the password are ignored; an empty
/// `jsonData` reads as `{}`.
pub fn resolve_settings(
    json_data: &[u8],
    decrypted_secure: &HashMap<String, String>,
) -> DsResult<ResolvedSettings> {
    let options: DatasourceOptions = if json_data.iter().all(u8::is_ascii_whitespace) {
        DatasourceOptions::default()
    } else {
        serde_json::from_slice(json_data)?
    };
    let password = decrypted_secure.get(PASSWORD_KEY).cloned().unwrap_or_default();
    Ok(ResolvedSettings::new(&options, password))
}

impl ResolvedSettings {
    fn new(options: &DatasourceOptions, password: String) -> Self {
        Self {
            broker_url: options.broker_url().to_owned(),
            client_id: options.client_id().to_owned(),
            username: options.username().to_owned(),
            password,
            qos: options.effective_qos(),
        }
    }

    /// Resolution from a full settings object whose `secureJsonData` is still
    /// present, e.g. a provisioning file.
    pub fn from_settings(settings: &DatasourceSettings) -> Self {
        let password = settings
            .secure_json_data
            .as_ref()
            .and_then(|secure| secure.password.clone())
            .unwrap_or_default();
        Self::new(&settings.json_data, password)
    }

    pub fn broker(&self) -> DsResult<BrokerAddress> {
        BrokerAddress::parse(&self.broker_url)
    }

    /// The client id as entered, or a generated one when none was given.
    pub fn effective_client_id(&self) -> String {
        if self.client_id.is_empty() {
            format!("mqttds_{}", Uuid::new_v4().simple())
        } else {
            self.client_id.clone()
        }
    }

    pub fn mqtt_qos(&self) -> QoS {
        to_mqtt_qos(self.qos)
    }

    pub fn mqtt_options(&self) -> DsResult<MqttOptions> {
        let broker = self.broker()?;
        let client_id = self.effective_client_id();
        if client_id.starts_with(char::is_whitespace) {
            return Err(DsError::InvalidClientId(client_id));
        }

        let mut options = MqttOptions::new(client_id, broker.host.clone(), broker.port);
        if broker.tls {
            options.set_transport(Transport::tls_with_default_config());
        }
        if !self.username.is_empty() {
            options.set_credentials(self.username.clone(), self.password.clone());
        }
        info!("mqtt options for {}", broker);
        Ok(options)
    }
}

/// Maps by meaning, the stored integers differ from the protocol's.
pub fn to_mqtt_qos(qos: Qos) -> QoS {
    match qos {
        Qos::AtLeastOnce => QoS::AtLeastOnce,
        Qos::AtMostOnce => QoS::AtMostOnce,
        Qos::ExactlyOnce => QoS::ExactlyOnce,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAddress {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub tls: bool,
}

impl BrokerAddress {
    /// Parses `scheme://host[:port]`. Accepted schemes are `tcp`, `mqtt`,
    /// `ssl`, `tls` and `mqtts`.
    pub fn parse(broker_url: &str) -> DsResult<Self> {
        let err = || DsError::InvalidBrokerUrl(broker_url.to_owned());

        let url = Url::parse(broker_url).map_err(|e| {
            debug!("parse broker url {:?}: {}", broker_url, e);
            err()
        })?;
        let tls = match url.scheme() {
            "tcp" | "mqtt" => false,
            "ssl" | "tls" | "mqtts" => true,
            _ => return Err(err()),
        };
        let host = match url.host() {
            Some(Host::Domain(host)) if !host.is_empty() => host.to_owned(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(err()),
        };
        let port = url
            .port()
            .unwrap_or(if tls { DEFAULT_TLS_PORT } else { DEFAULT_PORT });

        Ok(Self {
            scheme: url.scheme().to_owned(),
            host,
            port,
            tls,
        })
    }
}

impl fmt::Display for BrokerAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}
