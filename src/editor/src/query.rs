use tracing::debug;
use types::SubscriptionQuery;

pub fn set_topic(query: &SubscriptionQuery, topic: impl Into<String>) -> SubscriptionQuery {
    let mut next = query.clone();
    next.topic = Some(topic.into());
    next
}

pub fn set_include_schema(query: &SubscriptionQuery, include_schema: bool) -> SubscriptionQuery {
    let mut next = query.clone();
    next.include_schema = Some(include_schema);
    next
}

pub fn set_use_interval(query: &SubscriptionQuery, use_interval: bool) -> SubscriptionQuery {
    let mut next = query.clone();
    next.use_interval = Some(use_interval);
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryControl {
    Topic,
    UseInterval,
    IncludeSchema,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    TopicInput(String),
    IncludeSchemaToggled(bool),
    UseIntervalToggled(bool),
    Blur(QueryControl),
}

/// The runtime side of a query row.
pub trait QueryHost {
    fn on_change(&mut self, query: SubscriptionQuery);
    /// Asks the runtime to (re)subscribe with the last changed query.
    fn on_run_query(&mut self);
}

/// Applies one event. Typing in the topic only reports the change; the
/// query runs when a control loses focus. Toggles run right away.
pub fn dispatch<H: QueryHost>(
    host: &mut H,
    query: &SubscriptionQuery,
    event: QueryEvent,
) -> SubscriptionQuery {
    match event {
        QueryEvent::TopicInput(topic) => {
            let next = set_topic(query, topic);
            host.on_change(next.clone());
            next
        }
        QueryEvent::IncludeSchemaToggled(checked) => {
            let next = set_include_schema(query, checked);
            host.on_change(next.clone());
            host.on_run_query();
            next
        }
        QueryEvent::UseIntervalToggled(checked) => {
            let next = set_use_interval(query, checked);
            host.on_change(next.clone());
            host.on_run_query();
            next
        }
        QueryEvent::Blur(control) => {
            debug!("{:?} blurred, running query", control);
            host.on_run_query();
            query.clone()
        }
    }
}
