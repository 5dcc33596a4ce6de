use std::{collections::BTreeMap, time::Duration};

use common::{DsError, DsResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::path::{is_path_safe_topic, SubscriptionModel};

/// The query fields the backend reads. Unset fields are empty / false.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct QueryModel {
    pub topic: String,
    pub use_interval: bool,
    pub include_schema: bool,
}

impl QueryModel {
    pub fn from_json(json: &[u8]) -> DsResult<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    pub fn subscription(&self, interval: Duration) -> SubscriptionModel {
        SubscriptionModel {
            topic: self.topic.clone(),
            include_schema: self.include_schema,
            use_interval: self.use_interval,
            interval,
        }
    }
}

/// Rejects topics containing whitespace, and topics a channel path cannot
/// carry. The topic is otherwise passed on as is.
pub fn validate_topic(topic: &str) -> DsResult<()> {
    if topic.chars().any(|c| c.is_ascii_whitespace()) || !is_path_safe_topic(topic) {
        return Err(DsError::InvalidTopic(topic.to_owned()));
    }
    Ok(())
}

/// A query as the host sends it to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DataQuery {
    pub ref_id: String,
    pub json: Vec<u8>,
    pub interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    BadRequest,
    Internal,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Internal => 500,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrameMeta {
    pub channel: String,
}

/// An empty frame that only tells the host which channel to listen on.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Frame {
    pub name: String,
    pub meta: FrameMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataResponse {
    pub status: Status,
    pub frames: Vec<Frame>,
    pub error: Option<String>,
}

impl DataResponse {
    pub fn from_error(e: &DsError) -> Self {
        Self {
            status: if e.is_bad_request() {
                Status::BadRequest
            } else {
                Status::Internal
            },
            frames: vec![],
            error: Some(e.to_string()),
        }
    }

    pub fn channel(&self) -> Option<&str> {
        self.frames.first().map(|frame| frame.meta.channel.as_str())
    }
}

pub fn query(datasource_uid: &str, query: &DataQuery) -> DataResponse {
    match subscription_for(query) {
        Ok(model) => {
            let channel = model.channel(datasource_uid);
            debug!("query {} -> {}", query.ref_id, channel);
            DataResponse {
                status: Status::Ok,
                frames: vec![Frame {
                    name: String::new(),
                    meta: FrameMeta { channel },
                }],
                error: None,
            }
        }
        Err(e) => {
            warn!("query {} rejected: {}", query.ref_id, e);
            DataResponse::from_error(&e)
        }
    }
}

fn subscription_for(query: &DataQuery) -> DsResult<SubscriptionModel> {
    let model = QueryModel::from_json(&query.json)?;
    validate_topic(&model.topic)?;
    Ok(model.subscription(query.interval))
}

/// One response per query, keyed by ref id.
pub fn query_data(datasource_uid: &str, queries: &[DataQuery]) -> BTreeMap<String, DataResponse> {
    queries
        .iter()
        .map(|q| (q.ref_id.clone(), query(datasource_uid, q)))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn data_query(ref_id: &str, body: serde_json::Value) -> DataQuery {
        DataQuery {
            ref_id: ref_id.to_owned(),
            json: serde_json::to_vec(&body).unwrap(),
            interval: Duration::ZERO,
        }
    }

    #[test]
    fn test_empty_body_is_bad_request() {
        let resp = query_data(
            "1",
            &[DataQuery {
                ref_id: "A".to_owned(),
                json: vec![],
                interval: Duration::ZERO,
            }],
        );
        assert_eq!(resp.len(), 1);
        assert_eq!(resp["A"].status, Status::BadRequest);
        assert_eq!(resp["A"].status.code(), 400);
    }

    #[test]
    fn test_single_query() {
        let cases = [("   ", false), ("top", true), ("08:08", true), ("a b", false)];
        for (topic, valid) in cases {
            let resp = query_data("1", &[data_query("A", json!({ "topic": topic }))]);
            let resp = &resp["A"];
            if valid {
                assert_eq!(resp.status, Status::Ok);
                assert_eq!(
                    resp.channel().unwrap(),
                    format!(
                        "ds/1/topic={}.useInterval=false.includeSchema=false.interval=0s",
                        topic
                    )
                );
            } else {
                assert_eq!(resp.status, Status::BadRequest);
                assert_eq!(resp.channel(), None);
            }
        }
    }

    #[test]
    fn test_flags_and_interval() {
        let mut q = data_query(
            "B",
            json!({ "topic": "t", "useInterval": true, "includeSchema": true, "refId": "B" }),
        );
        q.interval = Duration::from_secs(1);
        let resp = query("uid", &q);
        assert_eq!(
            resp.channel(),
            Some("ds/uid/topic=t.useInterval=true.includeSchema=true.interval=1s")
        );
    }

    #[test]
    fn test_validate_topic() {
        assert!(validate_topic("").is_ok());
        assert!(validate_topic("home/+/temp").is_ok());
        assert!(validate_topic("a-b").is_ok());
        assert!(matches!(validate_topic("a\tb"), Err(DsError::InvalidTopic(_))));
        assert!(validate_topic("plant/v1.2").is_ok());
        assert!(matches!(
            validate_topic("a.interval=soon"),
            Err(DsError::InvalidTopic(_))
        ));
    }

    #[test]
    fn test_unencodable_topic_is_bad_request() {
        let resp = query_data("1", &[data_query("A", json!({ "topic": "a.topic=b" }))]);
        assert_eq!(resp["A"].status, Status::BadRequest);
        assert_eq!(resp["A"].channel(), None);
    }

    #[test]
    fn test_status_from_error() {
        let resp = DataResponse::from_error(&DsError::InvalidTopic("a b".to_owned()));
        assert_eq!(resp.status, Status::BadRequest);
        assert!(resp.error.unwrap().contains("a b"));

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let resp = DataResponse::from_error(&DsError::Io(io));
        assert_eq!(resp.status, Status::Internal);
        assert_eq!(resp.status.code(), 500);
    }
}
