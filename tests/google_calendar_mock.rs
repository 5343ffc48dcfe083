use alfred::components::google_calendar::models::CalendarEvent;
use alfred::components::message_log::{Message, MessageLogActor, MessageLogHandle};
use alfred::components::speech_output::{NullEngine, SpeakerHandle};
use alfred::dispatcher::{self, EventSource, EVENTS_HEADER, NO_EVENTS_REPLY, UNTITLED_EVENT};
use alfred::error::{google_calendar_error, AppResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock implementation of the calendar event source for testing
#[derive(Default)]
struct MockCalendarHandle {
    events: Vec<CalendarEvent>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockCalendarHandle {
    fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for MockCalendarHandle {
    async fn month_events(&self) -> AppResult<Vec<CalendarEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(google_calendar_error("HTTP 500 - backend unavailable"));
        }
        Ok(self.events.clone())
    }
}

fn sample_events() -> Vec<CalendarEvent> {
    vec![
        CalendarEvent {
            id: "event1".to_string(),
            summary: Some("Standup".to_string()),
            start_date_time: Some("2024-06-03T10:00:00Z".to_string()),
            start_date: None,
        },
        CalendarEvent {
            id: "event2".to_string(),
            summary: None,
            start_date_time: None,
            start_date: Some("2024-06-12".to_string()),
        },
    ]
}

/// Spawn a log actor and a speaker that records without playing audio
fn test_speaker() -> (SpeakerHandle, MessageLogHandle) {
    let (mut log_actor, log_handle) = MessageLogActor::new();
    tokio::spawn(async move {
        log_actor.run().await;
    });

    let speaker = SpeakerHandle::new(log_handle.clone(), Arc::new(NullEngine));
    (speaker, log_handle)
}

/// Test that demonstrates how to use the mock
#[tokio::test]
async fn test_mock_returns_events() {
    let mock = MockCalendarHandle::with_events(sample_events());

    let events = mock.month_events().await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "event1");
    assert_eq!(events[0].summary, Some("Standup".to_string()));
    assert_eq!(events[1].summary, None);
    assert_eq!(mock.call_count(), 1);
}

/// N events produce a header plus one spoken title each
#[tokio::test]
async fn test_announce_header_and_titles() {
    let mock = MockCalendarHandle::with_events(sample_events());
    let (speaker, log_handle) = test_speaker();

    dispatcher::read_event_labels(&speaker, &mock).await;

    let log = log_handle.snapshot().await.unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0], Message::bot(EVENTS_HEADER));
    assert_eq!(log[1], Message::bot("Standup"));
    assert_eq!(log[2], Message::bot(UNTITLED_EVENT));
}

/// An empty month produces exactly one spoken message
#[tokio::test]
async fn test_zero_events_single_message() {
    let mock = MockCalendarHandle::with_events(Vec::new());
    let (speaker, log_handle) = test_speaker();

    dispatcher::read_event_labels(&speaker, &mock).await;

    let log = log_handle.snapshot().await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0], Message::bot(NO_EVENTS_REPLY));
}

/// Calendar failures degrade to one spoken error line, nothing propagates
#[tokio::test]
async fn test_calendar_error_is_spoken() {
    let mock = MockCalendarHandle::failing();
    let (speaker, log_handle) = test_speaker();

    dispatcher::read_event_labels(&speaker, &mock).await;

    let log = log_handle.snapshot().await.unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].text.starts_with("Error fetching events:"));
}
