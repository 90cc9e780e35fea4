//! 能力探测相关错误类型。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("探测请求失败: {0}")]
    Request(#[from] reqwest::Error),
}
