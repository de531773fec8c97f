//! ID aliases. Event ids are UUIDs assigned by the store; validation happens at parse boundaries.

use uuid::Uuid;

pub type EventId = Uuid;

/// Fresh store-assigned id for a new check-in.
pub fn new_event_id() -> EventId {
    Uuid::new_v4()
}

/// Parse a string into a UUID or return an error message. Use at API boundaries.
pub fn parse_event_id(id: &str) -> Result<EventId, String> {
    Uuid::parse_str(id).map_err(|e| format!("Invalid event id: {}", e))
}
