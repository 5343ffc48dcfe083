use crate::error::{audio_error, synthesis_error, AppResult};
use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleRate;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// A speech synthesis backend
///
/// Implementations must not keep playback state between calls; every
/// utterance gets a fresh output device and stream.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Synthesize the text and play it to completion
    async fn speak(&self, text: &str) -> AppResult<()>;
}

/// Engine that synthesizes speech through an OpenAI-style HTTP API and
/// plays the returned WAV audio on the default output device
pub struct HttpTtsEngine {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    voice: String,
    speed: f32,
}

impl HttpTtsEngine {
    pub fn new(api_base: String, api_key: String, voice: String, speed: f32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
            voice,
            speed,
        }
    }

    /// Request synthesized audio for the text as WAV bytes
    async fn synthesize(&self, text: &str) -> AppResult<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
            response_format: &'a str,
        }

        let request = TtsRequest {
            model: "tts-1",
            input: text,
            voice: &self.voice,
            speed: self.speed,
            response_format: "wav",
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| synthesis_error(&format!("Failed to reach TTS service: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(synthesis_error(&format!(
                "TTS service returned HTTP {} - {}",
                status, body
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| synthesis_error(&format!("Failed to read TTS response: {}", e)))?;

        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SpeechEngine for HttpTtsEngine {
    async fn speak(&self, text: &str) -> AppResult<()> {
        let audio = self.synthesize(text).await?;

        // cpal streams are not Send, keep playback on a blocking thread
        tokio::task::spawn_blocking(move || play_wav(&audio))
            .await
            .map_err(|e| audio_error(&format!("Playback task failed: {}", e)))?
    }
}

/// Engine that drops all audio, used for headless runs and tests
pub struct NullEngine;

#[async_trait]
impl SpeechEngine for NullEngine {
    async fn speak(&self, _text: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Decode WAV bytes and play them to completion on the default output device
fn play_wav(wav: &[u8]) -> AppResult<()> {
    let reader = hound::WavReader::new(Cursor::new(wav))
        .map_err(|e| audio_error(&format!("Failed to decode WAV audio: {}", e)))?;
    let spec = reader.spec();
    let samples = decode_samples(reader)?;

    if samples.is_empty() {
        return Ok(());
    }

    let sample_rate = spec.sample_rate;
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| audio_error("No output device available"))?;

    let supported_config = device
        .supported_output_configs()
        .map_err(|e| audio_error(&format!("Failed to query output configs: {}", e)))?
        .find(|c| {
            c.min_sample_rate() <= SampleRate(sample_rate)
                && c.max_sample_rate() >= SampleRate(sample_rate)
        })
        .ok_or_else(|| audio_error("No suitable output config found"))?;

    let config = supported_config
        .with_sample_rate(SampleRate(sample_rate))
        .config();
    let channels = config.channels as usize;

    let samples = Arc::new(samples);
    let position = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicBool::new(false));

    let cb_samples = Arc::clone(&samples);
    let cb_position = Arc::clone(&position);
    let cb_finished = Arc::clone(&finished);

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let pos = cb_position.load(Ordering::Relaxed);
                    let sample = if pos < cb_samples.len() {
                        cb_position.store(pos + 1, Ordering::Relaxed);
                        cb_samples[pos]
                    } else {
                        cb_finished.store(true, Ordering::Relaxed);
                        0.0
                    };
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio playback error");
            },
            None,
        )
        .map_err(|e| audio_error(&format!("Failed to build output stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| audio_error(&format!("Failed to start playback: {}", e)))?;

    // Poll for completion, bounded by the audio duration plus slack
    let duration_ms = playback_duration_ms(samples.len(), sample_rate);
    let deadline = std::time::Instant::now() + std::time::Duration::from_millis(duration_ms + 500);

    while !finished.load(Ordering::Relaxed) {
        if std::time::Instant::now() > deadline {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    }

    // Give the device a moment to drain its buffer
    std::thread::sleep(std::time::Duration::from_millis(100));
    drop(stream);

    Ok(())
}

/// Read all samples from the WAV reader as mono f32
fn decode_samples(mut reader: hound::WavReader<Cursor<&[u8]>>) -> AppResult<Vec<f32>> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .map(|s| s.map(|v| f32::from(v) / 32768.0))
            .collect::<Result<_, _>>()
            .map_err(|e| audio_error(&format!("Failed to read WAV samples: {}", e)))?,
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| audio_error(&format!("Failed to read WAV samples: {}", e)))?,
    };

    if channels == 1 {
        return Ok(interleaved);
    }

    // Downmix by averaging the channels of each frame
    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok(mono)
}

/// Upper bound on playback time for the poll loop
///
/// A malformed WAV header can declare a 0 Hz sample rate; treat it as 1 Hz
/// rather than dividing by zero.
fn playback_duration_ms(sample_count: usize, sample_rate: u32) -> u64 {
    (sample_count as u64 * 1000) / u64::from(sample_rate.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_duration_matches_sample_rate() {
        assert_eq!(playback_duration_ms(24000, 24000), 1000);
        assert_eq!(playback_duration_ms(8000, 16000), 500);
    }

    #[test]
    fn playback_duration_tolerates_zero_sample_rate() {
        assert_eq!(playback_duration_ms(0, 0), 0);
        assert_eq!(playback_duration_ms(4800, 0), 4_800_000);
    }
}
