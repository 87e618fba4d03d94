// Neural Backend Providers
// Language-model loss and sentence-embedding endpoints behind one capability switch

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::MODEL_NAME_FALLBACK;
use crate::services::config_store::NeuralConfig;

const READINESS_PROBE_TEXT: &str = "Neural backend readiness check.";

#[derive(Error, Debug)]
pub enum NeuralError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("neural backend unavailable")]
    Unavailable,
}

/// Inference capabilities the neural scorer needs.
///
/// Implementations are selected once at startup and shared read-only by the
/// detector for its whole lifetime.
#[async_trait]
pub trait NeuralBackend: Send + Sync {
    /// Whether neural scoring should run at all
    fn is_available(&self) -> bool;

    /// Human-readable model description reported in `model_info`
    fn model_name(&self) -> String;

    /// Per-token negative log-likelihood of `chunk` under a causal language model
    async fn token_losses(&self, chunk: &str) -> Result<Vec<f64>, NeuralError>;

    /// One embedding vector per input, in input order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, NeuralError>;
}

/// Neutral stand-in used when no inference endpoint is reachable
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

#[async_trait]
impl NeuralBackend for UnavailableBackend {
    fn is_available(&self) -> bool {
        false
    }

    fn model_name(&self) -> String {
        MODEL_NAME_FALLBACK.to_string()
    }

    async fn token_losses(&self, _chunk: &str) -> Result<Vec<f64>, NeuralError> {
        Err(NeuralError::Unavailable)
    }

    async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, NeuralError> {
        Err(NeuralError::Unavailable)
    }
}

#[derive(Debug, Serialize)]
struct LossRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct LossResponse {
    #[serde(default)]
    token_losses: Vec<f64>,
    /// Mean loss, for servers that do not return per-token values
    #[serde(default)]
    loss: Option<f64>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    inputs: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f32>>,
}

/// HTTP client for the language-model and embedding inference endpoints
pub struct RemoteNeuralBackend {
    client: Client,
    language_model_url: String,
    embedding_url: String,
    language_model: String,
    embedding_model: String,
    api_key: Option<String>,
}

impl RemoteNeuralBackend {
    pub fn new(config: &NeuralConfig) -> Result<Self, NeuralError> {
        let language_model_url = config
            .language_model_url
            .clone()
            .ok_or(NeuralError::Unavailable)?;
        let embedding_url = config.embedding_url.clone().ok_or(NeuralError::Unavailable)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            language_model_url,
            embedding_url,
            language_model: config.language_model.clone(),
            embedding_model: config.embedding_model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn post_json<Req: Serialize + ?Sized, Resp: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Resp, NeuralError> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NeuralError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| NeuralError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl NeuralBackend for RemoteNeuralBackend {
    fn is_available(&self) -> bool {
        true
    }

    fn model_name(&self) -> String {
        format!(
            "{} + {} + Statistical + Style",
            self.language_model, self.embedding_model
        )
    }

    async fn token_losses(&self, chunk: &str) -> Result<Vec<f64>, NeuralError> {
        let body = LossRequest {
            model: &self.language_model,
            text: chunk,
        };
        let data: LossResponse = self.post_json(&self.language_model_url, &body).await?;

        if !data.token_losses.is_empty() {
            return Ok(data.token_losses);
        }
        data.loss
            .map(|loss| vec![loss])
            .ok_or_else(|| NeuralError::Malformed("no token losses in response".to_string()))
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, NeuralError> {
        let body = EmbeddingRequest {
            model: &self.embedding_model,
            inputs,
        };
        let data: EmbeddingResponse = self.post_json(&self.embedding_url, &body).await?;

        if data.embeddings.len() != inputs.len() {
            return Err(NeuralError::Malformed(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                data.embeddings.len()
            )));
        }
        Ok(data.embeddings)
    }
}

/// Pick the backend for this process: remote endpoints when configured and
/// answering, otherwise the neutral stub.
pub async fn select_backend(config: &NeuralConfig) -> Box<dyn NeuralBackend> {
    if !config.is_configured() {
        info!("[NEURAL] Endpoints not configured, using statistical + style analysis");
        return Box::new(UnavailableBackend);
    }

    let backend = match RemoteNeuralBackend::new(config) {
        Ok(b) => b,
        Err(e) => {
            warn!("[NEURAL] Failed to build client: {}", e);
            return Box::new(UnavailableBackend);
        }
    };

    let start = Instant::now();
    match backend.embed(&[READINESS_PROBE_TEXT.to_string()]).await {
        Ok(_) => {
            info!(
                probe_ms = start.elapsed().as_millis() as u64,
                model = %backend.model_name(),
                "[NEURAL] Backend ready"
            );
            Box::new(backend)
        }
        Err(e) => {
            warn!("[NEURAL] Readiness probe failed, falling back to statistical + style: {}", e);
            Box::new(UnavailableBackend)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_backend() {
        let backend = UnavailableBackend;
        assert!(!backend.is_available());
        assert_eq!(backend.model_name(), MODEL_NAME_FALLBACK);
        assert!(matches!(
            backend.token_losses("text").await,
            Err(NeuralError::Unavailable)
        ));
        assert!(matches!(
            backend.embed(&["text".to_string()]).await,
            Err(NeuralError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn test_select_backend_without_urls_is_stub() {
        let backend = select_backend(&NeuralConfig::default()).await;
        assert!(!backend.is_available());
    }

    #[tokio::test]
    async fn test_select_backend_disabled_is_stub() {
        let config = NeuralConfig {
            enabled: false,
            language_model_url: Some("http://127.0.0.1:9/loss".to_string()),
            embedding_url: Some("http://127.0.0.1:9/embed".to_string()),
            ..NeuralConfig::default()
        };
        assert!(!select_backend(&config).await.is_available());
    }

    #[tokio::test]
    async fn test_select_backend_unreachable_falls_back() {
        // port 9 (discard) is not expected to serve HTTP
        let config = NeuralConfig {
            language_model_url: Some("http://127.0.0.1:9/loss".to_string()),
            embedding_url: Some("http://127.0.0.1:9/embed".to_string()),
            timeout_secs: 2,
            ..NeuralConfig::default()
        };
        assert!(!select_backend(&config).await.is_available());
    }

    #[test]
    fn test_remote_model_name() {
        let config = NeuralConfig {
            language_model_url: Some("http://lm".to_string()),
            embedding_url: Some("http://embed".to_string()),
            ..NeuralConfig::default()
        };
        let backend = RemoteNeuralBackend::new(&config).unwrap();
        assert!(backend.is_available());
        assert_eq!(backend.model_name(), "gpt2 + all-MiniLM-L6-v2 + Statistical + Style");
    }

    #[test]
    fn test_loss_response_shapes() {
        let per_token: LossResponse = serde_json::from_str(r#"{"token_losses": [1.0, 2.0]}"#).unwrap();
        assert_eq!(per_token.token_losses, vec![1.0, 2.0]);
        let mean: LossResponse = serde_json::from_str(r#"{"loss": 3.2}"#).unwrap();
        assert!(mean.token_losses.is_empty());
        assert_eq!(mean.loss, Some(3.2));
    }
}
