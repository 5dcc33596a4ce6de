//! State transitions behind the datasource config page and the query row.
//!
//! Nothing here mutates the object it is given. Each operation clones the
//! current state, overrides one thing and hands back the whole object; the
//! host overwrites rather than merges.

pub mod config;
pub mod event;
pub mod qos;
pub mod query;

pub use config::{ConfigEditor, ConfigEvent, ConfigField, ConfigHost};
pub use event::{extract_value, ChangeEvent, FieldValue};
pub use query::{QueryControl, QueryEvent, QueryHost};
