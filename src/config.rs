use crate::error::{env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default address the web server binds to
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default base URL for the speech recognition and synthesis APIs
pub const DEFAULT_SPEECH_API_BASE: &str = "https://api.openai.com/v1";

/// Main configuration structure for the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address and port the web server listens on
    pub bind_addr: String,
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Google Calendar ID to read events from
    pub google_calendar_id: String,
    /// Optional path to a Google `credentials.json` client secret file,
    /// used when the client ID/secret are not set directly
    pub google_credentials_path: Option<PathBuf>,
    /// Path of the OAuth token cache written after consent or refresh
    pub google_token_path: PathBuf,
    /// API key for the speech recognition and synthesis services
    pub speech_api_key: String,
    /// Base URL for the speech recognition and synthesis services
    pub speech_api_base: String,
    /// Model name used for speech recognition
    pub stt_model: String,
    /// Voice used for speech synthesis
    pub tts_voice: String,
    /// Playback speed for speech synthesis
    pub tts_speed: f32,
    /// Whether synthesized speech is played at all
    pub tts_enabled: bool,
    /// Seconds of ambient noise sampled before each capture
    pub calibration_secs: f32,
    /// Maximum seconds of speech captured per listen cycle
    pub phrase_limit_secs: f32,
}

impl Config {
    /// Load configuration from the environment
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let bind_addr =
            env::var("ALFRED_BIND_ADDR").unwrap_or_else(|_| String::from(DEFAULT_BIND_ADDR));

        // Google credentials can come from the environment or from a
        // credentials.json file resolved at call time
        let google_client_id = env::var("GOOGLE_CLIENT_ID").unwrap_or_default();
        let google_client_secret = env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default();
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from("primary"));
        let google_credentials_path = env::var("GOOGLE_CREDENTIALS_PATH").ok().map(PathBuf::from);
        let google_token_path = env::var("GOOGLE_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("token.json"));

        let speech_api_key = env::var("SPEECH_API_KEY").unwrap_or_default();
        let speech_api_base =
            env::var("SPEECH_API_BASE").unwrap_or_else(|_| String::from(DEFAULT_SPEECH_API_BASE));
        let stt_model = env::var("STT_MODEL").unwrap_or_else(|_| String::from("whisper-1"));
        let tts_voice = env::var("TTS_VOICE").unwrap_or_else(|_| String::from("alloy"));

        let tts_speed = match env::var("TTS_SPEED") {
            Ok(value) => value
                .parse::<f32>()
                .map_err(|_| env_error("TTS_SPEED"))?,
            Err(_) => 1.0,
        };

        let tts_enabled = match env::var("TTS_ENABLED") {
            Ok(value) => value
                .parse::<bool>()
                .map_err(|_| env_error("TTS_ENABLED"))?,
            Err(_) => true,
        };

        let calibration_secs = match env::var("CALIBRATION_SECS") {
            Ok(value) => value
                .parse::<f32>()
                .map_err(|_| env_error("CALIBRATION_SECS"))?,
            Err(_) => 1.0,
        };

        let phrase_limit_secs = match env::var("PHRASE_LIMIT_SECS") {
            Ok(value) => value
                .parse::<f32>()
                .map_err(|_| env_error("PHRASE_LIMIT_SECS"))?,
            Err(_) => 5.0,
        };

        Ok(Config {
            bind_addr,
            google_client_id,
            google_client_secret,
            google_calendar_id,
            google_credentials_path,
            google_token_path,
            speech_api_key,
            speech_api_base,
            stt_model,
            tts_voice,
            tts_speed,
            tts_enabled,
            calibration_secs,
            phrase_limit_secs,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: String::from(DEFAULT_BIND_ADDR),
            google_client_id: String::new(),
            google_client_secret: String::new(),
            google_calendar_id: String::from("primary"),
            google_credentials_path: None,
            google_token_path: PathBuf::from("token.json"),
            speech_api_key: String::new(),
            speech_api_base: String::from(DEFAULT_SPEECH_API_BASE),
            stt_model: String::from("whisper-1"),
            tts_voice: String::from("alloy"),
            tts_speed: 1.0,
            tts_enabled: true,
            calibration_secs: 1.0,
            phrase_limit_secs: 5.0,
        }
    }
}
