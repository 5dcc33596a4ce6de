//! The qos select of the config page.

use types::{
    qos::{qos_options, selected_option},
    DatasourceSettings, Qos, SelectableValue,
};

use crate::{
    config::{apply_field, ConfigField},
    event::FieldValue,
};

pub fn options() -> Vec<SelectableValue<Qos>> {
    qos_options()
}

pub fn displayed(settings: &DatasourceSettings) -> SelectableValue<Qos> {
    selected_option(settings.json_data.qos)
}

pub fn select_by_label(label: &str) -> Option<Qos> {
    Qos::from_label(label).ok()
}

/// Stores the value of the chosen entry; the label is never stored.
pub fn on_select(settings: &DatasourceSettings, option: &SelectableValue<Qos>) -> DatasourceSettings {
    apply_field(settings, ConfigField::Qos, FieldValue::Qos(option.value))
}
