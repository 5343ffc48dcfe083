use crate::config::Config;
use crate::error::{google_calendar_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Read-only calendar scope, the only permission the assistant asks for
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const CONSENT_REDIRECT: &str = "http://localhost:8080";

/// OAuth client identity used to mint and refresh tokens
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Manages the on-disk OAuth token cache
///
/// Tokens are reused while valid, refreshed silently when expired, and
/// re-issued through a browser consent flow when no usable cache exists.
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<RwLock<Config>>,
    client: Client,
}

impl TokenManager {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Get a usable OAuth token, from the cache file or by acquiring one
    pub async fn get_token(&self) -> AppResult<Value> {
        let token_path = self.token_path().await;

        if token_path.exists() {
            let token_str = tokio::fs::read_to_string(&token_path)
                .await
                .map_err(|e| google_calendar_error(&format!("Failed to read token cache: {}", e)))?;

            let token: Value = serde_json::from_str(&token_str)
                .map_err(|e| google_calendar_error(&format!("Failed to parse token cache: {}", e)))?;

            if let Some(expiry) = token.get("expires_at").and_then(|v| v.as_i64()) {
                // Leave a minute of slack so a token never expires mid-request
                if expiry > Utc::now().timestamp() + 60 {
                    return Ok(token);
                }
                if token.get("refresh_token").and_then(|v| v.as_str()).is_some() {
                    return self.refresh_token(&token).await;
                }
            }
        }

        // No usable cache, fall back to interactive consent
        self.run_consent_flow().await
    }

    /// Resolve the OAuth client identity from config or a credentials file
    pub async fn client_credentials(&self) -> AppResult<ClientCredentials> {
        let (client_id, client_secret, credentials_path) = {
            let config_read = self.config.read().await;
            (
                config_read.google_client_id.clone(),
                config_read.google_client_secret.clone(),
                config_read.google_credentials_path.clone(),
            )
        };

        if !client_id.is_empty() && !client_secret.is_empty() {
            return Ok(ClientCredentials {
                client_id,
                client_secret,
            });
        }

        match credentials_path {
            Some(path) => read_credentials_file(&path).await,
            None => Err(google_calendar_error(
                "No Google client credentials configured",
            )),
        }
    }

    /// Refresh an expired token and persist the result
    async fn refresh_token(&self, token: &Value) -> AppResult<Value> {
        let refresh_token = token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| google_calendar_error("No refresh token in token data"))?;

        let credentials = self.client_credentials().await?;

        let params = [
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
            ("refresh_token", refresh_token.to_string()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .cloned()
            .ok_or_else(|| google_calendar_error("Token response missing 'access_token' field"))?;

        // Combine new access token with the existing refresh token
        let mut token_data = serde_json::Map::new();
        token_data.insert("access_token".to_string(), access_token);
        token_data.insert("refresh_token".to_string(), json!(refresh_token));

        let expires_in = new_token
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);
        token_data.insert(
            "expires_at".to_string(),
            json!(Utc::now().timestamp() + expires_in),
        );

        let token_json = Value::Object(token_data);
        self.save_token(&token_json).await?;

        info!("Google Calendar token refreshed");
        Ok(token_json)
    }

    /// Run the interactive browser consent flow and persist the new token
    pub async fn run_consent_flow(&self) -> AppResult<Value> {
        let credentials = self.client_credentials().await?;

        // Random state ties the callback to this request
        let state = uuid::Uuid::new_v4().to_string();

        let auth_url = format!(
            "https://accounts.google.com/o/oauth2/v2/auth?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            access_type=offline&\
            prompt=consent&\
            scope={}&\
            state={}",
            credentials.client_id, CONSENT_REDIRECT, CALENDAR_SCOPE, state
        );

        info!("Opening browser for Google Calendar authorization");
        webbrowser::open(&auth_url)?;

        let code = tokio::task::spawn_blocking(move || wait_for_callback(&state))
            .await
            .map_err(|e| google_calendar_error(&format!("Callback task failed: {}", e)))??;

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", credentials.client_id),
                ("client_secret", credentials.client_secret),
                ("code", code),
                ("redirect_uri", CONSENT_REDIRECT.to_string()),
                ("grant_type", "authorization_code".to_string()),
            ])
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to exchange code: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to get token: HTTP {} - {}",
                status, error_body
            )));
        }

        let mut token_data: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let expires_in = token_data
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);

        match token_data.as_object_mut() {
            Some(obj) => {
                obj.insert(
                    "expires_at".to_string(),
                    json!(Utc::now().timestamp() + expires_in),
                );
            }
            None => return Err(google_calendar_error("Token data is not an object")),
        }

        self.save_token(&token_data).await?;

        info!("Google Calendar token issued and saved");
        Ok(token_data)
    }

    /// Persist a token to the configured cache file
    pub async fn save_token(&self, token: &Value) -> AppResult<()> {
        let token_path = self.token_path().await;
        let serialized = serde_json::to_string_pretty(token)?;
        tokio::fs::write(&token_path, serialized)
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to write token cache: {}", e)))?;
        Ok(())
    }

    /// Path of the token cache file
    pub async fn token_path(&self) -> PathBuf {
        let config_read = self.config.read().await;
        config_read.google_token_path.clone()
    }
}

/// Load the client identity from a Google `credentials.json` file
async fn read_credentials_file(path: &Path) -> AppResult<ClientCredentials> {
    if !path.exists() {
        return Err(google_calendar_error(&format!(
            "Credentials file not found at {}",
            path.display()
        )));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| google_calendar_error(&format!("Failed to read credentials file: {}", e)))?;

    let parsed: Value = serde_json::from_str(&content)
        .map_err(|e| google_calendar_error(&format!("Failed to parse credentials file: {}", e)))?;

    // Desktop clients use the "installed" key, web clients use "web"
    let entry = parsed
        .get("installed")
        .or_else(|| parsed.get("web"))
        .ok_or_else(|| google_calendar_error("Credentials file has no 'installed' or 'web' entry"))?;

    let client_id = entry
        .get("client_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| google_calendar_error("Credentials file missing 'client_id'"))?;
    let client_secret = entry
        .get("client_secret")
        .and_then(|v| v.as_str())
        .ok_or_else(|| google_calendar_error("Credentials file missing 'client_secret'"))?;

    Ok(ClientCredentials {
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
    })
}

/// Block until the OAuth callback arrives and return the authorization code
fn wait_for_callback(expected_state: &str) -> AppResult<String> {
    // The redirect URI points at localhost, so only accept loopback traffic
    let server = tiny_http::Server::http("127.0.0.1:8080")
        .map_err(|e| google_calendar_error(&format!("Failed to start callback server: {}", e)))?;

    info!("Waiting for authorization callback on {}", CONSENT_REDIRECT);
    let request = server.recv()?;
    let url = request.url().to_string();

    let code = url
        .split("code=")
        .nth(1)
        .and_then(|s| s.split('&').next())
        .map(str::to_string)
        .ok_or_else(|| google_calendar_error("No authorization code found in callback"))?;

    let state = url
        .split("state=")
        .nth(1)
        .and_then(|s| s.split('&').next())
        .unwrap_or_default();

    if state != expected_state {
        return Err(google_calendar_error("State mismatch in OAuth callback"));
    }

    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::time::Duration;

    /// The callback server listens on loopback and hands back the code
    #[test]
    fn callback_accepts_loopback_request_with_matching_state() {
        let server = std::thread::spawn(|| wait_for_callback("nonce-123"));

        // Retry until the server thread has bound the port
        let mut stream = None;
        for _ in 0..100 {
            match TcpStream::connect("127.0.0.1:8080") {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(_) => std::thread::sleep(Duration::from_millis(50)),
            }
        }
        let mut stream = stream.unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        stream
            .write_all(
                b"GET /?code=abc123&state=nonce-123 HTTP/1.1\r\n\
                  Host: localhost\r\n\
                  Connection: close\r\n\r\n",
            )
            .unwrap();

        let mut response = String::new();
        let _ = stream.read_to_string(&mut response);

        let code = server.join().unwrap().unwrap();
        assert_eq!(code, "abc123");
        assert!(response.contains("Authorization successful"));
    }
}
