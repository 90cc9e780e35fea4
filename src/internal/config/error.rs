//! 配置相关错误类型。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("下载地址无效: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("目标路径为空")]
    EmptyDest,

    #[error("并发数不能为 0")]
    ZeroConcurrency,
}
