//! Provider 公共工具函数

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: "http".to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}
