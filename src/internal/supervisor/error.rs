//! 调度相关错误类型。

use thiserror::Error;

use crate::internal::config::error::ConfigError;
use crate::internal::planner::plan::PlanError;
use crate::internal::store::error::StoreError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("配置无效: {0}")]
    Config(#[from] ConfigError),

    #[error("分段规划失败: {0}")]
    Plan(#[from] PlanError),

    #[error("进度存储失败: {0}")]
    Store(#[from] StoreError),

    #[error("构建 HTTP 客户端失败: {0}")]
    BuildClient(reqwest::Error),

    #[error("创建目标文件失败: {0}")]
    CreateFile(std::io::Error),

    #[error("预分配文件空间失败: {0}")]
    PreallocateFile(std::io::Error),

    #[error("打开目标文件失败: {0}")]
    OpenFile(std::io::Error),

    #[error("分段任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
