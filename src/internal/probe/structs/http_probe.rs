//! HTTP 能力探测：HEAD 请求读取 `Content-Length` 与 `Accept-Ranges`。

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH};
use url::Url;

use super::super::error::ProbeError;
use super::super::structs::remote_capability::RemoteCapability;
use super::super::traits::capability_probe::CapabilityProbe;

/// 基于 HEAD 请求的默认能力探测。
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CapabilityProbe for HttpProbe {
    /// 发起 HEAD 请求；非成功响应视为一无所知（由调度器降级为单流）。
    async fn probe(&self, url: &Url) -> Result<RemoteCapability, ProbeError> {
        let resp = self.client.head(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Ok(RemoteCapability::unknown());
        }

        let content_length = resp
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let accepts_ranges = resp
            .headers()
            .get(ACCEPT_RANGES)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.eq_ignore_ascii_case("bytes"))
            .unwrap_or(false);

        Ok(RemoteCapability {
            content_length,
            accepts_ranges,
        })
    }
}
