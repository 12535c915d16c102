//! HTTP implementation of `ListingNetwork`
//!
//! - `PATCH {base}/listings/{id}` with the nested patch payload
//! - `POST {base}/listings/{id}/{slug}/items` with one item mutation
//!
//! Status mapping: 2xx → server values, 422 with `fieldErrors` → field
//! errors, anything else (including transport failures and timeouts) →
//! generic failure.

use std::time::Duration;

use async_trait::async_trait;
use listing_editor_core::error::{CoreError, CoreResult};
use listing_editor_core::traits::ListingNetwork;
use listing_editor_core::types::{
    FieldErrors, ItemMutation, ListingId, PatchFragment, SectionSlug, ServerValues, SubmitError,
};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::config::HttpConfig;

const TRUNCATE_LIMIT: usize = 256;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RejectionBody {
    #[serde(default)]
    field_errors: FieldErrors,
}

/// reqwest-backed listing network
pub struct HttpListingNetwork {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpListingNetwork {
    pub fn new(config: &HttpConfig) -> CoreResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CoreError::ConfigError("http.baseUrl is required".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::NetworkError(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn listing_url(&self, listing_id: &ListingId) -> String {
        format!(
            "{}/listings/{}",
            self.base_url,
            urlencoding::encode(listing_id.as_str())
        )
    }

    fn items_url(&self, listing_id: &ListingId, slug: SectionSlug) -> String {
        format!(
            "{}/{}/items",
            self.listing_url(listing_id),
            urlencoding::encode(slug.as_str())
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder, label: &str) -> Result<Value, SubmitError> {
        log::debug!("[http] {label}");
        let response = self.authorized(builder).send().await.map_err(|e| {
            let detail = if e.is_timeout() {
                format!("Request timed out: {e}")
            } else {
                format!("Request failed: {e}")
            };
            log::error!("[http] {label}: {detail}");
            SubmitError::generic(detail)
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::generic(format!("Failed to read response body: {e}")))?;
        log::debug!("[http] {label} → {status}: {}", truncate_for_log(&body));
        map_response(status, &body)
    }
}

/// 将状态码和响应体映射为提交结果
pub(crate) fn map_response(status: u16, body: &str) -> Result<ServerValues, SubmitError> {
    match status {
        200..=299 => {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(body)
                .map_err(|e| SubmitError::generic(format!("Invalid response body: {e}")))
        }
        422 => match serde_json::from_str::<RejectionBody>(body) {
            Ok(rejection) if !rejection.field_errors.is_empty() => Err(SubmitError::Fields {
                field_errors: rejection.field_errors,
            }),
            _ => Err(SubmitError::generic(format!(
                "HTTP 422: {}",
                truncate_for_log(body)
            ))),
        },
        _ => Err(SubmitError::generic(format!(
            "HTTP {status}: {}",
            truncate_for_log(body)
        ))),
    }
}

fn truncate_for_log(s: &str) -> String {
    if s.chars().count() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        let head: String = s.chars().take(TRUNCATE_LIMIT).collect();
        format!("{head}... [truncated, total {} bytes]", s.len())
    }
}

#[async_trait]
impl ListingNetwork for HttpListingNetwork {
    async fn submit_patch(
        &self,
        listing_id: &ListingId,
        patch: &PatchFragment,
    ) -> Result<ServerValues, SubmitError> {
        let url = self.listing_url(listing_id);
        let builder = self.client.patch(&url).json(patch);
        self.execute(builder, &format!("PATCH {url} ({})", patch.slug()))
            .await
    }

    async fn mutate_item(
        &self,
        listing_id: &ListingId,
        slug: SectionSlug,
        mutation: &ItemMutation,
    ) -> Result<(), SubmitError> {
        let url = self.items_url(listing_id, slug);
        let builder = self.client.post(&url).json(mutation);
        self.execute(builder, &format!("POST {url}")).await.map(|_| ())
    }
}
