use std::{fmt, str::FromStr};

use common::{DsError, DsResult};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::SelectableValue;

/// MQTT delivery guarantee, stored as its integer value.
///
/// The numbering is part of the persisted format: `0` is at-least-once.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Qos {
    #[default]
    AtLeastOnce = 0,
    AtMostOnce = 1,
    ExactlyOnce = 2,
}

impl Qos {
    pub const ALL: [Qos; 3] = [Qos::AtLeastOnce, Qos::AtMostOnce, Qos::ExactlyOnce];

    pub fn label(self) -> &'static str {
        match self {
            Qos::AtLeastOnce => "At least once",
            Qos::AtMostOnce => "At most once",
            Qos::ExactlyOnce => "Exactly once",
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Effective value of a possibly unset qos. Every consumer goes through
    /// here so the displayed default and the runtime default cannot drift.
    pub fn resolve(qos: Option<Qos>) -> Qos {
        qos.unwrap_or_default()
    }

    pub fn from_label(label: &str) -> DsResult<Qos> {
        Qos::ALL
            .into_iter()
            .find(|qos| qos.label() == label)
            .ok_or_else(|| DsError::UnknownQosLabel(label.to_owned()))
    }

    pub fn option(self) -> SelectableValue<Qos> {
        SelectableValue {
            label: self.label().to_owned(),
            value: self,
        }
    }
}

impl TryFrom<u8> for Qos {
    type Error = DsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Qos::AtLeastOnce),
            1 => Ok(Qos::AtMostOnce),
            2 => Ok(Qos::ExactlyOnce),
            _ => Err(DsError::InvalidQos(value)),
        }
    }
}

/// Accepts either the integer form or the label.
impl FromStr for Qos {
    type Err = DsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u8>() {
            Ok(n) => Qos::try_from(n),
            Err(_) => Qos::from_label(s),
        }
    }
}

impl fmt::Display for Qos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The options of the qos select, in enum order.
pub fn qos_options() -> Vec<SelectableValue<Qos>> {
    Qos::ALL.into_iter().map(Qos::option).collect()
}

/// The entry a qos select shows for a stored value. Read only: an unset
/// value displays the default entry without the stored value being touched.
pub fn selected_option(qos: Option<Qos>) -> SelectableValue<Qos> {
    Qos::resolve(qos).option()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_repr() {
        assert_eq!(serde_json::to_string(&Qos::AtLeastOnce).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Qos::AtMostOnce).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Qos::ExactlyOnce).unwrap(), "2");

        let qos: Qos = serde_json::from_str("2").unwrap();
        assert_eq!(qos, Qos::ExactlyOnce);
        assert!(serde_json::from_str::<Qos>("3").is_err());
        assert!(serde_json::from_str::<Qos>("\"At least once\"").is_err());
    }

    #[test]
    fn test_labels() {
        let options = qos_options();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label, "At least once");
        assert_eq!(options[0].value, Qos::AtLeastOnce);
        assert_eq!(options[1].label, "At most once");
        assert_eq!(options[1].value, Qos::AtMostOnce);
        assert_eq!(options[2].label, "Exactly once");
        assert_eq!(options[2].value, Qos::ExactlyOnce);

        for qos in Qos::ALL {
            assert_eq!(Qos::from_label(qos.label()).unwrap(), qos);
        }
        assert!(matches!(
            Qos::from_label("at least once"),
            Err(DsError::UnknownQosLabel(_))
        ));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("0".parse::<Qos>().unwrap(), Qos::AtLeastOnce);
        assert_eq!("1".parse::<Qos>().unwrap(), Qos::AtMostOnce);
        assert_eq!("Exactly once".parse::<Qos>().unwrap(), Qos::ExactlyOnce);
        assert!(matches!("7".parse::<Qos>(), Err(DsError::InvalidQos(7))));
        assert!("".parse::<Qos>().is_err());
    }

    #[test]
    fn test_selected_option_default() {
        let option = selected_option(None);
        assert_eq!(option.label, "At least once");
        assert_eq!(option.value, Qos::AtLeastOnce);
        assert_eq!(option.value.as_u8(), 0);

        assert_eq!(selected_option(Some(Qos::ExactlyOnce)).label, "Exactly once");
    }
}
