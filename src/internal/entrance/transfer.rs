//! 核心入口函数：按配置执行一次（可续传的）下载。

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::internal::config::structs::transfer_config::TransferConfig;
use crate::internal::store::structs::progress_store::ProgressStore;
use crate::internal::supervisor::error::DownloadError;
use crate::internal::supervisor::structs::download_supervisor::DownloadSupervisor;
use crate::internal::supervisor::structs::transfer_report::TransferReport;

/// 按配置执行一次下载直至终态。
///
/// 进度存储在 `config.store_dir` 下打开；同一目标的上次未完成进度会被自动续传。
/// `cancel` 触发后各分段在缓冲边界停下，进度保留，可再次调用续传。
///
/// example:
/// ```rust,no_run
/// use range_fetch::config::TransferConfig;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TransferConfig::new("http://example.com/big.bin", "big.bin")?.concurrency(4);
/// let report = range_fetch::run_transfer(config, CancellationToken::new()).await?;
/// assert!(report.is_done());
/// # Ok(())
/// # }
/// ```
pub async fn run_transfer(
    config: TransferConfig,
    cancel: CancellationToken,
) -> Result<TransferReport, DownloadError> {
    let store = Arc::new(ProgressStore::open(config.store_dir.clone()).await?);
    let supervisor = DownloadSupervisor::new(config, store)?;
    supervisor.run(cancel).await
}
