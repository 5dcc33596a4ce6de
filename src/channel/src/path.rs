use std::{fmt, time::Duration};

use common::{DsError, DsResult};
use tracing::debug;

use crate::duration::{format_go_duration, parse_go_duration};

const KEYS: [&str; 4] = ["topic", "useInterval", "includeSchema", "interval"];

/// Whether a topic decodes back from a path unchanged. A topic fails only
/// when it contains `.<key>=` for one of the path keys.
pub fn is_path_safe_topic(topic: &str) -> bool {
    topic
        .split('.')
        .skip(1)
        .all(|segment| !matches!(segment.split_once('='), Some((key, _)) if KEYS.contains(&key)))
}

/// One live subscription, as encoded in the stream path of a channel.
///
/// Two panels asking for the same topic with the same options share a
/// channel, hence `Eq + Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SubscriptionModel {
    pub topic: String,
    pub include_schema: bool,
    pub use_interval: bool,
    pub interval: Duration,
}

impl SubscriptionModel {
    /// The path below the datasource namespace.
    pub fn path(&self) -> String {
        format!(
            "topic={}.useInterval={}.includeSchema={}.interval={}",
            self.topic,
            self.use_interval,
            self.include_schema,
            format_go_duration(self.interval)
        )
    }

    /// Full channel name: `ds/<uid>/<path>`.
    pub fn channel(&self, datasource_uid: &str) -> String {
        format!("ds/{}/{}", datasource_uid, self.path())
    }

    /// Decodes a stream path. Segments before the first known key are
    /// skipped. After that, a segment without a known key continues the
    /// previous value, so any topic accepted by [`is_path_safe_topic`]
    /// survives a round trip.
    pub fn from_channel_path(path: &str) -> DsResult<Self> {
        let mut model = SubscriptionModel::default();
        let mut current: Option<(&str, String)> = None;

        for segment in path.split('.') {
            match segment.split_once('=') {
                Some((key, value)) if KEYS.contains(&key) => {
                    if let Some((prev_key, prev_value)) = current.take() {
                        model.set(prev_key, &prev_value)?;
                    }
                    current = Some((key, value.to_owned()));
                }
                _ => match current.as_mut() {
                    Some((_, value)) => {
                        value.push('.');
                        value.push_str(segment);
                    }
                    None => debug!("skip channel path segment {:?}", segment),
                },
            }
        }
        if let Some((key, value)) = current {
            model.set(key, &value)?;
        }

        Ok(model)
    }

    fn set(&mut self, key: &str, value: &str) -> DsResult<()> {
        match key {
            "topic" => self.topic = value.to_owned(),
            "useInterval" => self.use_interval = parse_bool(key, value)?,
            "includeSchema" => self.include_schema = parse_bool(key, value)?,
            "interval" => {
                self.interval = parse_go_duration(value).map_err(|_| DsError::InvalidChannelValue {
                    key: key.to_owned(),
                    value: value.to_owned(),
                })?
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for SubscriptionModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Same spellings Go's `strconv.ParseBool` accepts.
fn parse_bool(key: &str, value: &str) -> DsResult<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(DsError::InvalidChannelValue {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path() {
        let model = SubscriptionModel {
            topic: "top".to_owned(),
            include_schema: false,
            use_interval: false,
            interval: Duration::ZERO,
        };
        assert_eq!(
            model.channel("1"),
            "ds/1/topic=top.useInterval=false.includeSchema=false.interval=0s"
        );
    }

    #[test]
    fn test_decode() {
        let model = SubscriptionModel::from_channel_path(
            "topic=08:08.useInterval=true.includeSchema=1.interval=500ms",
        )
        .unwrap();
        assert_eq!(model.topic, "08:08");
        assert!(model.use_interval);
        assert!(model.include_schema);
        assert_eq!(model.interval, Duration::from_millis(500));
    }

    #[test]
    fn test_topic_with_dots_and_equals() {
        let model = SubscriptionModel {
            topic: "plant/v1.2/a=b".to_owned(),
            include_schema: true,
            use_interval: true,
            interval: Duration::from_secs(2),
        };
        assert_eq!(SubscriptionModel::from_channel_path(&model.path()).unwrap(), model);
    }

    #[test]
    fn test_missing_and_unknown_keys() {
        let model = SubscriptionModel::from_channel_path("foo=bar.topic=x").unwrap();
        assert_eq!(model.topic, "x");
        assert!(!model.use_interval);
        assert_eq!(model.interval, Duration::ZERO);

        let model =
            SubscriptionModel::from_channel_path("topic=x.foo=bar.useInterval=true").unwrap();
        assert_eq!(model.topic, "x.foo=bar");
        assert!(model.use_interval);

        let model = SubscriptionModel::from_channel_path("topic=x..y.").unwrap();
        assert_eq!(model.topic, "x..y.");

        assert_eq!(
            SubscriptionModel::from_channel_path("").unwrap(),
            SubscriptionModel::default()
        );
    }

    #[test]
    fn test_path_safe_topic() {
        for topic in ["", "a.b", "v1.2/a=b", "topic=x", "a.foo=bar", "x.", ".."] {
            assert!(is_path_safe_topic(topic), "{:?}", topic);
            let model = SubscriptionModel {
                topic: topic.to_owned(),
                ..Default::default()
            };
            assert_eq!(
                SubscriptionModel::from_channel_path(&model.path()).unwrap(),
                model
            );
        }
        for topic in ["a.topic=b", "a.interval=soon", "a.useInterval=maybe", "x.includeSchema="] {
            assert!(!is_path_safe_topic(topic), "{:?}", topic);
        }
    }

    #[test]
    fn test_bad_values() {
        match SubscriptionModel::from_channel_path("topic=a.useInterval=yes") {
            Err(DsError::InvalidChannelValue { key, value }) => {
                assert_eq!(key, "useInterval");
                assert_eq!(value, "yes");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(SubscriptionModel::from_channel_path("topic=a.interval=soon").is_err());
    }
}
