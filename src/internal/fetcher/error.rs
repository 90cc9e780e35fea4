//! 取段相关错误类型。

use thiserror::Error;

use crate::internal::store::error::StoreError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("范围请求读取超时")]
    ReadTimeout,

    #[error("数据流提前结束，段内还差 {missing} 字节")]
    PrematureEnd { missing: u64 },

    #[error("服务器未返回可下载内容: HTTP {0}")]
    UnexpectedStatus(u16),

    #[error("文件定位失败: {0}")]
    SeekFile(std::io::Error),

    #[error("写入文件失败: {0}")]
    WriteFile(std::io::Error),

    #[error("进度存储失败: {0}")]
    Store(#[from] StoreError),
}

impl FetchError {
    /// 是否为瞬时失败：按重试策略从已确认偏移续传；其余失败直接终结本段。
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::Request(_) | FetchError::ReadTimeout | FetchError::PrematureEnd { .. }
        )
    }
}
