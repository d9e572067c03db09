use crate::message::{
    Message, SendOptions, SendRawRequest, SendRequest, SendResult, SendTemplateRequest,
    TemplateContent,
};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_derive::Deserialize;
use url::Url;

/// Thin client for the Mandrill-compatible send API. One POST per
/// call, no retries; the caller decides what a failure means.
pub struct Client {
    base: Url,
    key: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: String,
}

impl Client {
    pub fn new(base: Url, key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .with_context(|| "failed building http client")?;
        Ok(Client { base, key, http })
    }

    pub async fn send(&self, message: Message, options: SendOptions) -> Result<Vec<SendResult>> {
        let request = SendRequest {
            key: self.key.clone(),
            message,
            options,
        };
        self.post("messages/send", &request).await
    }

    pub async fn send_template(
        &self,
        template_name: String,
        template_content: Vec<TemplateContent>,
        message: Message,
        options: SendOptions,
    ) -> Result<Vec<SendResult>> {
        let request = SendTemplateRequest {
            key: self.key.clone(),
            template_name,
            template_content,
            message,
            options,
        };
        self.post("messages/send-template", &request).await
    }

    pub async fn send_raw(
        &self,
        raw_message: String,
        from_email: Option<String>,
        to: Vec<String>,
        options: SendOptions,
    ) -> Result<Vec<SendResult>> {
        let request = SendRawRequest {
            key: self.key.clone(),
            raw_message,
            from_email,
            from_name: None,
            to,
            options,
        };
        self.post("messages/send-raw", &request).await
    }

    // the server also answers on the bare /messages/* paths, but the
    // /api/1.0/*.json ones are what the official SDK speaks
    fn endpoint(&self, call: &str) -> String {
        format!(
            "{}/api/1.0/{}.json",
            self.base.as_str().trim_end_matches('/'),
            call
        )
    }

    async fn post<T: Serialize>(&self, call: &str, request: &T) -> Result<Vec<SendResult>> {
        let url = self.endpoint(call);
        log::info!("POST {}", url);

        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", url))?;

        let status = resp.status();
        if !status.is_success() {
            match resp.json::<ApiError>().await {
                Ok(api) => anyhow::bail!("{} returned {}: {}", url, status, api.error),
                Err(_) => anyhow::bail!("{} returned {}", url, status),
            }
        }

        resp.json::<Vec<SendResult>>()
            .await
            .with_context(|| format!("failed decoding response from {}", url))
    }
}
