use crate::error::{recognition_error, AppResult};
use reqwest::Client;

/// Client for an OpenAI-style speech recognition API
pub struct Transcriber {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

/// Response from the transcription endpoint
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl Transcriber {
    pub fn new(api_base: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_base,
            api_key,
            model,
        }
    }

    /// Submit WAV audio for recognition and return the raw transcript
    pub async fn transcribe(&self, wav: Vec<u8>) -> AppResult<String> {
        if self.api_key.is_empty() {
            return Err(recognition_error("Speech API key not configured"));
        }

        tracing::debug!(audio_bytes = wav.len(), "submitting audio for recognition");

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| recognition_error(&format!("Failed to build request: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| recognition_error(&format!("Failed to reach recognition service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(recognition_error(&format!(
                "Recognition service returned HTTP {} - {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| recognition_error(&format!("Failed to parse transcript: {}", e)))?;

        Ok(parsed.text)
    }
}
