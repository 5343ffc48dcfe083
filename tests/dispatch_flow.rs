use alfred::components::google_calendar::models::CalendarEvent;
use alfred::components::message_log::{Message, MessageLogActor, MessageLogHandle};
use alfred::components::speech_output::{NullEngine, SpeakerHandle};
use alfred::dispatcher::{
    self, EventSource, ATTENDANCE_REPLY, EVENTS_HEADER, FALLBACK_REPLY,
};
use alfred::error::AppResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counting calendar stub for dispatch routing tests
#[derive(Default)]
struct CountingCalendar {
    events: Vec<CalendarEvent>,
    calls: AtomicUsize,
}

impl CountingCalendar {
    fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for CountingCalendar {
    async fn month_events(&self) -> AppResult<Vec<CalendarEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.events.clone())
    }
}

fn titled(id: &str, title: &str) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(title.to_string()),
        start_date_time: None,
        start_date: None,
    }
}

fn test_speaker() -> (SpeakerHandle, MessageLogHandle) {
    let (mut log_actor, log_handle) = MessageLogActor::new();
    tokio::spawn(async move {
        log_actor.run().await;
    });

    let speaker = SpeakerHandle::new(log_handle.clone(), Arc::new(NullEngine));
    (speaker, log_handle)
}

/// Attendance commands produce the fixed reply and never touch the calendar
#[tokio::test]
async fn test_attendance_skips_calendar() {
    let calendar = CountingCalendar::default();
    let (speaker, log_handle) = test_speaker();

    dispatcher::dispatch("what is my attendance", &speaker, &calendar).await;

    let log = log_handle.snapshot().await.unwrap();
    assert_eq!(log, vec![Message::bot(ATTENDANCE_REPLY)]);
    assert_eq!(calendar.call_count(), 0);
}

/// Attendance wins even when calendar keywords are also present
#[tokio::test]
async fn test_attendance_wins_over_calendar_keywords() {
    let calendar = CountingCalendar::default();
    let (speaker, log_handle) = test_speaker();

    dispatcher::dispatch("attendance and calendar please", &speaker, &calendar).await;

    let log = log_handle.snapshot().await.unwrap();
    assert_eq!(log, vec![Message::bot(ATTENDANCE_REPLY)]);
    assert_eq!(calendar.call_count(), 0);
}

/// Calendar keywords invoke the calendar exactly once
#[tokio::test]
async fn test_calendar_invoked_exactly_once() {
    for command in ["show my calendar", "any event today", "set a reminder"] {
        let calendar = CountingCalendar::with_events(Vec::new());
        let (speaker, _log_handle) = test_speaker();

        dispatcher::dispatch(command, &speaker, &calendar).await;

        assert_eq!(calendar.call_count(), 1, "command: {}", command);
    }
}

/// Unmatched commands produce exactly the fixed fallback reply
#[tokio::test]
async fn test_fallback_reply() {
    let calendar = CountingCalendar::default();
    let (speaker, log_handle) = test_speaker();

    dispatcher::dispatch("tell me a joke", &speaker, &calendar).await;

    let log = log_handle.snapshot().await.unwrap();
    assert_eq!(log, vec![Message::bot(FALLBACK_REPLY)]);
    assert_eq!(calendar.call_count(), 0);
}

/// Full cycle ordering: user utterance, header, then the titles in order
#[tokio::test]
async fn test_calendar_cycle_log_order() {
    let calendar =
        CountingCalendar::with_events(vec![titled("e1", "Standup"), titled("e2", "Review")]);
    let (speaker, log_handle) = test_speaker();

    // The handler records the utterance before dispatching
    log_handle.append(Message::user("calendar")).await.unwrap();
    dispatcher::dispatch("calendar", &speaker, &calendar).await;

    let log = log_handle.snapshot().await.unwrap();
    assert_eq!(
        log,
        vec![
            Message::user("calendar"),
            Message::bot(EVENTS_HEADER),
            Message::bot("Standup"),
            Message::bot("Review"),
        ]
    );
}

/// Repeated cycles only ever append; earlier entries stay in place
#[tokio::test]
async fn test_repeated_cycles_append_only() {
    let calendar = CountingCalendar::with_events(vec![titled("e1", "Standup")]);
    let (speaker, log_handle) = test_speaker();

    log_handle.append(Message::user("attendance")).await.unwrap();
    dispatcher::dispatch("attendance", &speaker, &calendar).await;
    let first = log_handle.snapshot().await.unwrap();

    log_handle.append(Message::user("calendar")).await.unwrap();
    dispatcher::dispatch("calendar", &speaker, &calendar).await;
    let second = log_handle.snapshot().await.unwrap();

    assert_eq!(&second[..first.len()], &first[..]);
    assert_eq!(
        &second[first.len()..],
        &[
            Message::user("calendar"),
            Message::bot(EVENTS_HEADER),
            Message::bot("Standup"),
        ]
    );
}
