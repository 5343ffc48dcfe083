use crate::error::{audio_error, AppResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleRate;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sample rate for microphone capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// How long the noise floor must persist before a phrase counts as finished
const TRAILING_SILENCE: Duration = Duration::from_millis(700);

/// Polling interval while a capture is in progress
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Record one phrase from the default input device
///
/// The first `calibration` seconds sample the ambient noise floor; capture
/// then runs until `phrase_limit` elapses or the room falls quiet again
/// after speech was heard. Blocks the calling thread for the duration.
pub fn record(calibration: Duration, phrase_limit: Duration) -> AppResult<Vec<f32>> {
    let host = cpal::default_host();

    let device = host
        .default_input_device()
        .ok_or_else(|| audio_error("No input device available"))?;

    let supported_config = device
        .supported_input_configs()
        .map_err(|e| audio_error(&format!("Failed to query input configs: {}", e)))?
        .find(|c| {
            c.channels() == 1
                && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
        })
        .ok_or_else(|| audio_error("No suitable input config found"))?;

    let config = supported_config
        .with_sample_rate(SampleRate(SAMPLE_RATE))
        .config();

    tracing::debug!(
        device = device.name().unwrap_or_default(),
        sample_rate = SAMPLE_RATE,
        "microphone capture starting"
    );

    let buffer: Arc<Mutex<Vec<f32>>> = Arc::new(Mutex::new(Vec::new()));
    let cb_buffer = Arc::clone(&buffer);

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = cb_buffer.lock() {
                    buf.extend_from_slice(data);
                }
            },
            |err| {
                tracing::error!(error = %err, "microphone capture error");
            },
            None,
        )
        .map_err(|e| audio_error(&format!("Failed to open microphone stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| audio_error(&format!("Failed to start microphone stream: {}", e)))?;

    // Calibrate the ambient noise threshold, then discard the samples
    std::thread::sleep(calibration);
    let noise = take_buffer(&buffer);
    let threshold = (rms(&noise) * 1.75).max(0.01);

    let mut captured = Vec::new();
    let mut heard_speech = false;
    let mut quiet_since: Option<Instant> = None;
    let started = Instant::now();

    while started.elapsed() < phrase_limit {
        std::thread::sleep(POLL_INTERVAL);
        let chunk = take_buffer(&buffer);
        let loudness = rms(&chunk);
        captured.extend_from_slice(&chunk);

        if loudness > threshold {
            heard_speech = true;
            quiet_since = None;
        } else if heard_speech {
            let quiet = quiet_since.get_or_insert_with(Instant::now);
            if quiet.elapsed() >= TRAILING_SILENCE {
                break;
            }
        }
    }

    drop(stream);
    tracing::debug!(samples = captured.len(), "microphone capture finished");

    Ok(captured)
}

fn take_buffer(buffer: &Arc<Mutex<Vec<f32>>>) -> Vec<f32> {
    buffer
        .lock()
        .map(|mut buf| std::mem::take(&mut *buf))
        .unwrap_or_default()
}

/// Root mean square loudness of a chunk of samples
fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Convert f32 samples to WAV bytes for the recognition API
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> AppResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| audio_error(&format!("Failed to encode WAV audio: {}", e)))?;

        for &sample in samples {
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| audio_error(&format!("Failed to encode WAV audio: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| audio_error(&format!("Failed to encode WAV audio: {}", e)))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_silence_is_zero() {
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(rms(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn rms_of_constant_signal_is_its_magnitude() {
        let value = rms(&[0.5, -0.5, 0.5, -0.5]);
        assert!((value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn wav_encoding_round_trips_sample_count() {
        let samples = vec![0.0_f32, 0.25, -0.25, 1.0, -1.0];
        let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

        let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(reader.len() as usize, samples.len());
    }
}
