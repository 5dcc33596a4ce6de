//! What the streaming side consumes: resolved connection settings, validated
//! queries and the live channel path a query subscribes through.

pub mod duration;
pub mod path;
pub mod query;
pub mod settings;

pub use path::SubscriptionModel;
pub use query::{query_data, DataQuery, DataResponse, QueryModel, Status};
pub use settings::{resolve_settings, BrokerAddress, ResolvedSettings};
