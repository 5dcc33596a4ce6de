use std::fmt;

use tracing::{debug, warn};
use types::{qos::selected_option, DatasourceSettings, Qos, SelectableValue, PASSWORD_KEY};

use crate::event::{extract_value, ChangeEvent, FieldValue};

/// The plain `jsonData` fields the config page edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    BrokerUrl,
    ClientId,
    Username,
    Qos,
}

impl ConfigField {
    pub const ALL: [ConfigField; 4] = [
        ConfigField::BrokerUrl,
        ConfigField::ClientId,
        ConfigField::Username,
        ConfigField::Qos,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ConfigField::BrokerUrl => "brokerUrl",
            ConfigField::ClientId => "clientId",
            ConfigField::Username => "username",
            ConfigField::Qos => "qos",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Replaces one `jsonData` field and returns the whole settings object.
///
/// Text is stored exactly as entered. A qos given as text that names no qos
/// leaves the settings as they were.
pub fn apply_field(
    settings: &DatasourceSettings,
    field: ConfigField,
    value: FieldValue,
) -> DatasourceSettings {
    let mut next = settings.clone();
    match field {
        ConfigField::BrokerUrl => next.json_data.broker_url = Some(value.into_text()),
        ConfigField::ClientId => next.json_data.client_id = Some(value.into_text()),
        ConfigField::Username => next.json_data.username = Some(value.into_text()),
        ConfigField::Qos => match value.into_qos() {
            Ok(qos) => next.json_data.qos = qos,
            Err(e) => {
                warn!("ignore qos change: {}", e);
                return next;
            }
        },
    }
    next
}

pub fn on_field_change(
    settings: &DatasourceSettings,
    field: ConfigField,
    event: Option<&ChangeEvent>,
) -> DatasourceSettings {
    apply_field(settings, field, extract_value(event))
}

/// Writes the typed password into `secureJsonData` only.
pub fn update_password(
    settings: &DatasourceSettings,
    event: Option<&ChangeEvent>,
) -> DatasourceSettings {
    let mut next = settings.clone();
    let mut secure = next.secure_json_data.take().unwrap_or_default();
    secure.password = Some(extract_value(event).into_text());
    next.secure_json_data = Some(secure);
    next
}

/// Forgets the stored password: marks it unconfigured and empties the slot.
pub fn reset_password(settings: &DatasourceSettings) -> DatasourceSettings {
    let mut next = settings.clone();

    let mut fields = next.secure_json_fields.take().unwrap_or_default();
    fields.set(PASSWORD_KEY, false);
    next.secure_json_fields = Some(fields);

    let mut secure = next.secure_json_data.take().unwrap_or_default();
    secure.password = Some(String::new());
    next.secure_json_data = Some(secure);

    next
}

/// What a secret input shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretFieldState {
    pub is_configured: bool,
    /// Only ever the value being typed; the host never sends a stored secret back.
    pub value: String,
}

pub fn password_state(settings: &DatasourceSettings) -> SecretFieldState {
    SecretFieldState {
        is_configured: settings.is_password_configured(),
        value: settings
            .secure_json_data
            .as_ref()
            .and_then(|secure| secure.password.clone())
            .unwrap_or_default(),
    }
}

/// Display values of the config page. Defaults shown here are never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigView {
    pub broker_url: String,
    pub client_id: String,
    pub username: String,
    pub password: SecretFieldState,
    pub qos: SelectableValue<Qos>,
}

pub fn config_view(settings: &DatasourceSettings) -> ConfigView {
    let json_data = &settings.json_data;
    ConfigView {
        broker_url: json_data.broker_url().to_owned(),
        client_id: json_data.client_id().to_owned(),
        username: json_data.username().to_owned(),
        password: password_state(settings),
        qos: selected_option(json_data.qos),
    }
}

/// Receives every new settings object produced by the config page.
pub trait ConfigHost {
    fn on_options_change(&mut self, settings: DatasourceSettings);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEvent {
    Field(ConfigField, Option<ChangeEvent>),
    Password(Option<ChangeEvent>),
    ResetPassword,
}

pub struct ConfigEditor;

impl ConfigEditor {
    /// Applies one event and hands the full result to the host.
    pub fn dispatch<H: ConfigHost>(
        host: &mut H,
        settings: &DatasourceSettings,
        event: ConfigEvent,
    ) -> DatasourceSettings {
        let next = match &event {
            ConfigEvent::Field(field, change) => {
                debug!("config field {} changed", field);
                on_field_change(settings, *field, change.as_ref())
            }
            ConfigEvent::Password(change) => {
                debug!("password changed");
                update_password(settings, change.as_ref())
            }
            ConfigEvent::ResetPassword => {
                debug!("password reset");
                reset_password(settings)
            }
        };
        host.on_options_change(next.clone());
        next
    }
}
