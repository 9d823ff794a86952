//! Cloudflare HTTP 请求方法

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::http_client::send;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::types::{Page, PaginationParams};
use crate::utils::redact::truncate_for_log;

use super::types::into_page;
use super::{CF_API_BASE, CloudflareListBody, CloudflareProvider, CloudflareResponse};

impl CloudflareProvider {
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", self.api_token))
    }

    /// 执行 GET 请求，返回 envelope 中的 `result`
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{CF_API_BASE}{path}");
        let request = self.authorized(self.client.get(&url));
        let response = send(self.provider_name(), "GET", &url, request).await?;
        self.unwrap_envelope(response.status, &response.body, context)
    }

    /// 执行 PATCH 请求，返回 envelope 中的 `result`
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let url = format!("{CF_API_BASE}{path}");
        let body_json = serde_json::to_string(body).map_err(|e| {
            ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            }
        })?;
        log::debug!("[{}] PATCH body: {body_json}", self.provider_name());

        let request = self
            .authorized(self.client.patch(&url))
            .header("Content-Type", "application/json")
            .body(body_json);
        let response = send(self.provider_name(), "PATCH", &url, request).await?;
        self.unwrap_envelope(response.status, &response.body, context)
    }

    /// 执行 GET 请求 (单页)
    ///
    /// `query` is appended after the paging parameters and must already be encoded.
    pub(crate) async fn get_page<T, U>(
        &self,
        path: &str,
        params: &PaginationParams,
        max_page_size: u32,
        query: &str,
        context: ErrorContext,
    ) -> Result<Page<U>>
    where
        T: DeserializeOwned,
        U: From<T>,
    {
        let params = params.validated(max_page_size);
        let url = format!(
            "{CF_API_BASE}{path}?page={}&per_page={}{query}",
            params.page, params.page_size
        );
        let request = self.authorized(self.client.get(&url));
        let response = send(self.provider_name(), "GET", &url, request).await?;

        let body: CloudflareListBody<T> = match serde_json::from_str(&response.body) {
            Ok(body) => body,
            Err(e) => return Err(self.status_error(response.status, &response.body, context, e)),
        };

        match body {
            CloudflareListBody::Envelope(resp) => {
                if !resp.success {
                    return Err(self.api_error(&resp, context));
                }
                let total_pages = resp.result_info.as_ref().and_then(|i| i.total_pages);
                let items = resp.result.unwrap_or_default();
                Ok(into_page(items, total_pages, true))
            }
            CloudflareListBody::Bare(items) => Ok(into_page(items, None, false)),
        }
    }

    fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        status: u16,
        text: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let resp: CloudflareResponse<T> = match serde_json::from_str(text) {
            Ok(resp) => resp,
            Err(e) => return Err(self.status_error(status, text, context, e)),
        };

        if !resp.success {
            return Err(self.api_error(&resp, context));
        }

        resp.result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    fn api_error<T>(&self, resp: &CloudflareResponse<T>, context: ErrorContext) -> ProviderError {
        let (code, message) = resp.first_error();
        log::error!("API 错误: {message}");
        self.map_error(RawApiError::with_code(code, message), context)
    }

    /// Body did not parse: fall back to the HTTP status.
    fn status_error(
        &self,
        status: u16,
        text: &str,
        context: ErrorContext,
        parse_err: serde_json::Error,
    ) -> ProviderError {
        let message = truncate_for_log(text);
        match status {
            401 => self.map_error(RawApiError::with_code("10000", message), context),
            403 => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(message),
            },
            404 => self.map_error(RawApiError::with_code("7003", message), context),
            200..=299 => self.parse_error(parse_err),
            _ => self.unknown_error(RawApiError::new(format!("HTTP {status}: {message}"))),
        }
    }
}
