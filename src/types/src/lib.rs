use serde::{Deserialize, Serialize};

pub mod datasource;
pub mod qos;
pub mod query;

pub use datasource::{DatasourceOptions, DatasourceSettings, SecureJsonData, SecureJsonFields};
pub use qos::Qos;
pub use query::{QueryDefaults, SubscriptionQuery};

/// Key of the only secret this datasource stores.
pub const PASSWORD_KEY: &str = "password";

/// An entry of a select control: what is shown and what is stored.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SelectableValue<T> {
    pub label: String,
    pub value: T,
}
