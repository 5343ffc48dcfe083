/// Simplified calendar event representation
///
/// Only the fields the assistant reads out loud or orders by; everything
/// else in the API response is discarded.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start_date_time: Option<String>,
    pub start_date: Option<String>,
}
