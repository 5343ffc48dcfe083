use crate::components::google_calendar::{CalendarEvent, GoogleCalendarHandle};
use crate::components::speech_output::SpeakerHandle;
use crate::error::AppResult;
use async_trait::async_trait;

/// Fixed reply for the attendance intent
pub const ATTENDANCE_REPLY: &str = "Your attendance is 72 percent. Please attend more lectures.";

/// Fixed reply when no intent matches
pub const FALLBACK_REPLY: &str = "Sorry, I can only help with attendance and events.";

/// Spoken before the event titles
pub const EVENTS_HEADER: &str = "Here are your events:";

/// Spoken when the month holds no events
pub const NO_EVENTS_REPLY: &str = "You have no events this month.";

/// Placeholder for events without a title
pub const UNTITLED_EVENT: &str = "No Title";

/// Keywords that route a command to the calendar
const CALENDAR_KEYWORDS: [&str; 3] = ["reminder", "event", "calendar"];

/// Intent matched from a recognized command
///
/// Matching is plain substring search on the lower-cased transcript; the
/// attendance rule wins only because it is checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Attendance,
    Calendar,
    Fallback,
}

impl Intent {
    /// Classify one command; first matching rule wins
    pub fn classify(command: &str) -> Self {
        if command.contains("attendance") {
            Intent::Attendance
        } else if CALENDAR_KEYWORDS.iter().any(|kw| command.contains(kw)) {
            Intent::Calendar
        } else {
            Intent::Fallback
        }
    }
}

/// Source of the current month's calendar events
///
/// Seam between the dispatcher and the Google Calendar actor so tests can
/// count invocations and inject fixed event sets.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn month_events(&self) -> AppResult<Vec<CalendarEvent>>;
}

#[async_trait]
impl EventSource for GoogleCalendarHandle {
    async fn month_events(&self) -> AppResult<Vec<CalendarEvent>> {
        self.get_month_events().await
    }
}

/// Execute one recognized command
pub async fn dispatch<S: EventSource>(command: &str, speaker: &SpeakerHandle, calendar: &S) {
    match Intent::classify(command) {
        Intent::Attendance => speaker.speak(ATTENDANCE_REPLY).await,
        Intent::Calendar => read_event_labels(speaker, calendar).await,
        Intent::Fallback => speaker.speak(FALLBACK_REPLY).await,
    }
}

/// Speak the titles of this month's events
///
/// Failures anywhere in the calendar path are reported through the speaker
/// and abort the operation; nothing propagates to the caller.
pub async fn read_event_labels<S: EventSource>(speaker: &SpeakerHandle, calendar: &S) {
    let events = match calendar.month_events().await {
        Ok(events) => events,
        Err(e) => {
            speaker.speak(&format!("Error fetching events: {}", e)).await;
            return;
        }
    };

    if events.is_empty() {
        speaker.speak(NO_EVENTS_REPLY).await;
        return;
    }

    speaker.speak(EVENTS_HEADER).await;
    for event in &events {
        let title = event.summary.as_deref().unwrap_or(UNTITLED_EVENT);
        speaker.speak(title).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_wins_over_calendar_keywords() {
        assert_eq!(
            Intent::classify("attendance for calendar events"),
            Intent::Attendance
        );
        assert_eq!(Intent::classify("what is my attendance"), Intent::Attendance);
    }

    #[test]
    fn calendar_keywords_route_to_calendar() {
        assert_eq!(Intent::classify("show my calendar"), Intent::Calendar);
        assert_eq!(Intent::classify("any events this month"), Intent::Calendar);
        assert_eq!(Intent::classify("set a reminder"), Intent::Calendar);
    }

    #[test]
    fn everything_else_falls_back() {
        assert_eq!(Intent::classify("what is the weather"), Intent::Fallback);
        assert_eq!(Intent::classify(""), Intent::Fallback);
    }

    #[test]
    fn matching_is_substring_based() {
        // "eventful" still contains "event"; ordering is the only exclusivity
        assert_eq!(Intent::classify("an eventful day"), Intent::Calendar);
    }
}
