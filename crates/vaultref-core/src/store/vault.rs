//! HashiCorp Vault HTTP client
//!
//! Speaks the KV v1/v2 read API and the token, AppRole, and Kubernetes
//! login flows. One client owns one HTTP session to one store address; a
//! session token is obtained at most once and reused for the client's
//! lifetime.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;

use super::traits::{SecretPayload, StoreClient, StoreError, StoreResult};
use crate::auth::AuthMethod;
use crate::types::KvVersion;

/// Vault REST API client
pub struct VaultClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthMethod,
    namespace: Option<String>,
    session_token: OnceCell<String>,
}

impl VaultClient {
    /// Build the user-agent string from the crate version
    fn user_agent() -> String {
        format!("vaultref/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Create a client bound to one store address
    ///
    /// No network traffic happens here; login is deferred to the first
    /// fetch. Per-call deadlines are enforced by the resolver, not by the
    /// HTTP client.
    pub fn new(
        address: impl Into<String>,
        auth: AuthMethod,
        namespace: Option<String>,
    ) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(Self::user_agent())
            .build()?;

        Ok(Self {
            http,
            base_url: address.into().trim_end_matches('/').to_string(),
            auth,
            namespace,
            session_token: OnceCell::new(),
        })
    }

    /// The session token, logging in on first use
    async fn token(&self) -> StoreResult<&str> {
        self.session_token
            .get_or_try_init(|| self.login())
            .await
            .map(String::as_str)
    }

    async fn login(&self) -> StoreResult<String> {
        match &self.auth {
            AuthMethod::Token(token) => Ok(token.token().to_string()),
            AuthMethod::AppRole(approle) => {
                let body = serde_json::json!({
                    "role_id": approle.role_id(),
                    "secret_id": approle.secret_id(),
                });
                self.login_request("approle", &body).await
            }
            AuthMethod::Kubernetes(k8s) => {
                let jwt = tokio::fs::read_to_string(k8s.token_path())
                    .await
                    .map_err(|e| {
                        StoreError::Auth(format!("cannot read service-account token: {e}"))
                    })?;
                let body = serde_json::json!({
                    "role": k8s.role(),
                    "jwt": jwt.trim(),
                });
                self.login_request("kubernetes", &body).await
            }
        }
    }

    async fn login_request(&self, mount: &str, body: &Value) -> StoreResult<String> {
        let url = format!("{}/v1/auth/{mount}/login", self.base_url);
        let mut request = self.http.post(&url).json(body);
        if let Some(namespace) = &self.namespace {
            request = request.header("X-Vault-Namespace", namespace);
        }
        let response = request.send().await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(match status {
                400 | 401 | 403 => StoreError::Unauthorized,
                other => map_status(other),
            });
        }

        let payload = response.json::<Value>().await?;
        let login: LoginResponse = serde_json::from_value(payload).map_err(|e| {
            StoreError::InvalidResponse(format!("malformed login response: {e}"))
        })?;
        login.auth.map(|auth| auth.client_token).ok_or_else(|| {
            StoreError::InvalidResponse("login response missing auth.client_token".to_string())
        })
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: Option<LoginAuth>,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: String,
}

/// KV v2 read response, payload nested one level deeper than v1
#[derive(Deserialize)]
struct KvV2Response {
    data: KvV2Envelope,
}

#[derive(Deserialize)]
struct KvV2Envelope {
    data: serde_json::Map<String, Value>,
}

#[derive(Deserialize)]
struct KvV1Response {
    data: serde_json::Map<String, Value>,
}

#[async_trait]
impl StoreClient for VaultClient {
    fn name(&self) -> &str {
        "vault"
    }

    fn address(&self) -> &str {
        &self.base_url
    }

    async fn fetch_secret(
        &self,
        mount: &str,
        path: &str,
        kv_version: KvVersion,
        secret_version: Option<&str>,
    ) -> StoreResult<SecretPayload> {
        let mount = mount.trim_matches('/');
        let path = path.trim_matches('/');
        if mount.is_empty() || path.is_empty() {
            return Err(StoreError::NotFound);
        }

        let effective = kv_version.effective();
        let mut url = match effective {
            KvVersion::V2 => format!(
                "{}/v1/{}/data/{}",
                self.base_url,
                encode_path(mount),
                encode_path(path)
            ),
            _ => format!(
                "{}/v1/{}/{}",
                self.base_url,
                encode_path(mount),
                encode_path(path)
            ),
        };
        if effective == KvVersion::V2 {
            if let Some(version) = secret_version {
                url.push_str(&format!("?version={}", percent_encode(version)));
            }
        }

        let token = self.token().await?;
        let mut request = self
            .http
            .get(&url)
            .header("X-Vault-Token", token)
            .header("Accept", "application/json");
        if let Some(namespace) = &self.namespace {
            request = request.header("X-Vault-Namespace", namespace);
        }
        let response = request.send().await?;

        match response.status().as_u16() {
            200 => {
                let body = response.json::<Value>().await?;
                extract_payload(body, effective)
            }
            other => Err(map_status(other)),
        }
    }
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("namespace", &self.namespace)
            .field("logged_in", &self.session_token.initialized())
            .finish()
    }
}

fn map_status(status: u16) -> StoreError {
    match status {
        401 | 403 => StoreError::Unauthorized,
        404 => StoreError::NotFound,
        429 => StoreError::RateLimited,
        500..=599 => StoreError::ServerError,
        other => StoreError::UnexpectedStatus(other),
    }
}

/// Pull the key→value mapping out of a KV read response
fn extract_payload(body: Value, kv_version: KvVersion) -> StoreResult<SecretPayload> {
    let object = match kv_version.effective() {
        KvVersion::V2 => {
            serde_json::from_value::<KvV2Response>(body).map(|r| r.data.data)
        }
        _ => serde_json::from_value::<KvV1Response>(body).map(|r| r.data),
    }
    .map_err(|e| StoreError::InvalidResponse(format!("unexpected secret payload shape: {e}")))?;

    let mut payload = SecretPayload::new();
    for (key, value) in object {
        match value {
            Value::String(s) => {
                payload.insert(key, s);
            }
            Value::Number(n) => {
                payload.insert(key, n.to_string());
            }
            Value::Bool(b) => {
                payload.insert(key, b.to_string());
            }
            // Nested structures are not representable as config values
            _ => {}
        }
    }
    Ok(payload)
}

/// Percent-encode a single URL path component
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        let safe = b.is_ascii_uppercase()
            || b.is_ascii_lowercase()
            || b.is_ascii_digit()
            || matches!(b, b'-' | b'_' | b'.' | b'~');
        if safe {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(
                char::from_digit((b >> 4) as u32, 16)
                    .unwrap()
                    .to_ascii_uppercase(),
            );
            out.push(
                char::from_digit((b & 0x0F) as u32, 16)
                    .unwrap()
                    .to_ascii_uppercase(),
            );
        }
    }
    out
}

/// Percent-encode each segment of a slash-delimited path
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(percent_encode)
        .collect::<Vec<_>>()
        .join("/")
}
