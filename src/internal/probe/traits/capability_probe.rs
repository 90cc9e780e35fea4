//! 能力探测 trait：下载开始前获取资源大小与 Range 支持情况。
//!
//! 默认实现为 [`HttpProbe`](super::super::structs::http_probe::HttpProbe)；
//! 测试或特殊传输可注入自定义实现。

use async_trait::async_trait;
use url::Url;

use super::super::error::ProbeError;
use super::super::structs::remote_capability::RemoteCapability;

/// 能力探测：发起仅元数据的请求，返回远程资源能力。
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    /// 探测资源总大小与 Range 支持情况。
    async fn probe(&self, url: &Url) -> Result<RemoteCapability, ProbeError>;
}
