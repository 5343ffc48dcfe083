/// Sentinel shown in the log when no speech could be recognized
pub const UNRECOGNIZED_REPLY: &str = "sorry i did not understand that";

/// Outcome of one listen cycle
///
/// Recognition failures are data, not errors: callers can branch on the
/// variant instead of comparing against sentinel strings, while the log
/// still renders the familiar sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transcription {
    /// Lower-cased transcript of what the user said
    Text(String),
    /// Audio was captured but nothing intelligible came back
    Unrecognized,
    /// The recognition service could not be reached or rejected the request
    ServiceError(String),
}

impl Transcription {
    /// The line recorded in the message log for this outcome
    pub fn display_text(&self) -> String {
        match self {
            Transcription::Text(text) => text.clone(),
            Transcription::Unrecognized => UNRECOGNIZED_REPLY.to_string(),
            Transcription::ServiceError(message) => {
                format!("speech service error: {}", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_keeps_transcript() {
        let t = Transcription::Text("show my calendar".to_string());
        assert_eq!(t.display_text(), "show my calendar");
    }

    #[test]
    fn display_text_renders_sentinels() {
        assert_eq!(
            Transcription::Unrecognized.display_text(),
            "sorry i did not understand that"
        );
        assert_eq!(
            Transcription::ServiceError("timed out".to_string()).display_text(),
            "speech service error: timed out"
        );
    }
}
