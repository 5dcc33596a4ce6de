use common::DsResult;
use types::{Qos, SelectableValue};

/// What a control reports when it changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A text input, carrying its current value.
    Input { value: String },
    /// A select, carrying the chosen entry.
    Select(SelectableValue<Qos>),
}

impl ChangeEvent {
    pub fn input(value: impl Into<String>) -> Self {
        ChangeEvent::Input {
            value: value.into(),
        }
    }

    pub fn select(qos: Qos) -> Self {
        ChangeEvent::Select(qos.option())
    }
}

/// The scalar a change event normalizes to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Qos(Qos),
}

impl FieldValue {
    /// Text form of the value. A qos becomes its integer form.
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Qos(qos) => qos.as_u8().to_string(),
        }
    }

    /// Qos form of the value. Empty text means "unset".
    pub fn into_qos(self) -> DsResult<Option<Qos>> {
        match self {
            FieldValue::Qos(qos) => Ok(Some(qos)),
            FieldValue::Text(text) if text.is_empty() => Ok(None),
            FieldValue::Text(text) => text.parse().map(Some),
        }
    }
}

/// Normalizes a change event. No event at all yields empty text.
pub fn extract_value(event: Option<&ChangeEvent>) -> FieldValue {
    match event {
        None => FieldValue::Text(String::new()),
        Some(ChangeEvent::Input { value }) => FieldValue::Text(value.clone()),
        Some(ChangeEvent::Select(option)) => FieldValue::Qos(option.value),
    }
}
