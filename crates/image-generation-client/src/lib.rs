//! Image generation client.
//!
//! [`ImageGenerator`] is the inference collaborator for the `.aigen` command: a prompt in, a local
//! image file out. [`ImageGenerationClient`] implements it with the OpenAI images API and downloads
//! the returned URL into the configured directory.

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateImageRequestArgs, Image, ImageModel, ImageSize},
    Client,
};
use async_trait::async_trait;
use openai_client::mask_token;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Total deadline for each images API call and for each download.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const IMAGE_SIZE: ImageSize = ImageSize::S1024x1024;

/// Generates one image for a prompt and stores it locally.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<PathBuf>;
}

/// OpenAI images client.
#[derive(Clone)]
pub struct ImageGenerationClient {
    client: Arc<Client<OpenAIConfig>>,
    http: reqwest::Client,
    model: String,
    timeout: Duration,
    output_dir: PathBuf,
    api_key_for_logging: String,
}

impl ImageGenerationClient {
    /// Creates a client against an OpenAI-compatible base URL.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key.clone())
            .with_api_base(base_url);
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client: Arc::new(Client::with_config(config).with_http_client(http.clone())),
            http,
            model: "dall-e-3".to_string(),
            timeout: REQUEST_TIMEOUT,
            output_dir: PathBuf::from("./data/images"),
            api_key_for_logging: api_key,
        })
    }

    /// Sets the model (dall-e-2, dall-e-3 or a compatible id).
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Deadline for one images API call, client-side retries included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory generated images are written to; created on first use.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Downloads `url` into a fresh file under the output directory.
    pub async fn download(&self, url: &str) -> Result<PathBuf> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Image download failed with status {}", response.status());
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            anyhow::bail!("Image download returned an empty body");
        }
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self
            .output_dir
            .join(format!("{}.png", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &bytes).await?;
        Ok(path)
    }
}

#[async_trait]
impl ImageGenerator for ImageGenerationClient {
    #[tracing::instrument(skip(self))]
    async fn generate_image(&self, prompt: &str) -> Result<PathBuf> {
        let masked = mask_token(&self.api_key_for_logging);

        tracing::info!(
            model = %self.model,
            size = ?IMAGE_SIZE,
            prompt_preview = %prompt.chars().take(100).collect::<String>(),
            api_key = %masked,
            "OpenAI image generation request"
        );

        let request = CreateImageRequestArgs::default()
            .prompt(prompt)
            .model(ImageModel::Other(self.model.clone()))
            .size(IMAGE_SIZE)
            .n(1)
            .build()?;

        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "OpenAI image generation request JSON");
        }

        let response = tokio::time::timeout(self.timeout, self.client.images().create(request))
            .await
            .map_err(|_| {
                anyhow::anyhow!("Image generation timed out after {:?}", self.timeout)
            })??;

        let url = response
            .data
            .first()
            .and_then(|image| match image.as_ref() {
                Image::Url { url, .. } => Some(url.clone()),
                _ => None,
            })
            .ok_or_else(|| anyhow::anyhow!("No image URL in response"))?;

        let path = self.download(&url).await?;
        tracing::info!(path = %path.display(), "OpenAI image generation completed");
        Ok(path)
    }
}
