//! What to do with an event pulled from `environments/{id}/events`.

use flatfile_api::{Event, EventDomain};
use flatfile_core::{TopicAction, TopicDomain};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Record changes inside a workbook; worth surfacing.
    Log,
    Ignore,
}

/// Workbook-domain `records:created` and `records:updated` are logged;
/// everything else is ignored.
pub fn route_event(event: &Event) -> Route {
    match (event.domain, event.topic.domain, event.topic.action) {
        (EventDomain::Workbook, TopicDomain::Records, TopicAction::Created | TopicAction::Updated) => {
            Route::Log
        }
        _ => Route::Ignore,
    }
}
