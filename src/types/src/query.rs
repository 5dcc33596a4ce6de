use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single topic subscription as the host stores it.
///
/// Host managed metadata (`refId`, `datasource`, `hide`, ...) is opaque here
/// and carried in `meta`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_schema: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_interval: Option<bool>,

    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

/// Values a never configured query starts with.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefaults {
    pub topic: String,
    pub include_schema: bool,
    pub use_interval: bool,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            topic: "topic".to_owned(),
            include_schema: true,
            use_interval: false,
        }
    }
}

impl SubscriptionQuery {
    pub fn default_query() -> Self {
        Self::default().with_defaults()
    }

    /// Fills the fields that were never set. Only meant for query creation,
    /// a saved query keeps the values it was saved with.
    pub fn with_defaults(self) -> Self {
        let defaults = QueryDefaults::default();
        Self {
            topic: self.topic.or(Some(defaults.topic)),
            include_schema: self.include_schema.or(Some(defaults.include_schema)),
            use_interval: self.use_interval.or(Some(defaults.use_interval)),
            meta: self.meta,
        }
    }

    pub fn topic(&self) -> &str {
        self.topic.as_deref().unwrap_or_default()
    }

    pub fn include_schema(&self) -> bool {
        self.include_schema.unwrap_or(false)
    }

    pub fn use_interval(&self) -> bool {
        self.use_interval.unwrap_or(false)
    }

    pub fn ref_id(&self) -> Option<&str> {
        self.meta.get("refId").and_then(Value::as_str)
    }
}
