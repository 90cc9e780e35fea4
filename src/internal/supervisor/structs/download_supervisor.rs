//! 下载调度器：探测能力、选择策略、派发分段任务并裁定最终结果。
//!
//! 状态机：`INIT → PROBE → {SINGLE_STREAM | SEGMENTED} → DONE | FAILED`。
//!
//! - `INIT`：加载目标对应的已存记录，无则新建；损坏的记录视为不可续传，删除后重新开始。
//! - `PROBE`：向能力探测器获取总大小与 Range 支持；探测失败不致命，降级单流。
//! - 大小已知且支持 Range 且并发大于 1 时走 `SEGMENTED`，否则 `SINGLE_STREAM`
//!   （单个任务覆盖 `[0, size-1]`，大小未知时为开放区间，完成由流结束判定）。
//! - 所有分段到达终态后统一裁定：全部完成且确认字节覆盖总大小为 `DONE`
//!   并删除存储条目；否则 `FAILED`，条目原样保留供下次续传。

use std::sync::Arc;

use reqwest::Client;
use tokio::fs::OpenOptions;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::internal::config::structs::transfer_config::TransferConfig;
use crate::internal::fetcher::structs::segment_outcome::SegmentOutcome;
use crate::internal::planner::plan::plan_segments;
use crate::internal::probe::structs::http_probe::HttpProbe;
use crate::internal::probe::structs::remote_capability::RemoteCapability;
use crate::internal::probe::traits::capability_probe::CapabilityProbe;
use crate::internal::store::structs::progress_store::ProgressStore;
use crate::internal::store::structs::transfer_descriptor::TransferDescriptor;
use crate::internal::supervisor::spawn_fetchers::{
    SpawnFetchersParams, join_fetcher_handles, spawn_fetchers,
};

use super::super::error::DownloadError;
use super::transfer_report::{TransferReport, TransferState};

/// 下载调度器。持有一次传输的不可变配置与进度存储句柄。
pub struct DownloadSupervisor {
    config: TransferConfig,
    client: Client,
    store: Arc<ProgressStore>,
    probe: Arc<dyn CapabilityProbe>,
}

impl DownloadSupervisor {
    /// 创建调度器；校验配置并构建带连接超时的 HTTP 客户端。
    pub fn new(config: TransferConfig, store: Arc<ProgressStore>) -> Result<Self, DownloadError> {
        config.validate()?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(DownloadError::BuildClient)?;
        let probe: Arc<dyn CapabilityProbe> = Arc::new(HttpProbe::new(client.clone()));

        Ok(Self {
            config,
            client,
            store,
            probe,
        })
    }

    /// 替换能力探测器（测试或自定义传输时使用）。
    pub fn with_probe(mut self, probe: Arc<dyn CapabilityProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// 执行传输直至终态。取消信号传入每个取回任务，在缓冲边界生效。
    pub async fn run(&self, cancel: CancellationToken) -> Result<TransferReport, DownloadError> {
        let dest_id = self.config.dest_id();

        // INIT
        let mut descriptor = self.load_or_fresh(&dest_id).await?;

        // PROBE
        let capability = match self.probe.probe(&self.config.source).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "能力探测失败，降级为单流下载");
                RemoteCapability::unknown()
            }
        };
        tracing::debug!(
            content_length = ?capability.content_length,
            accepts_ranges = capability.accepts_ranges,
            "能力探测完成"
        );

        // 空资源：建好空文件直接收尾
        if capability.content_length == Some(0) {
            self.open_dest_file(Some(0)).await?;
            self.store.delete(&dest_id).await?;
            return Ok(TransferReport {
                state: TransferState::Done,
                segment_outcomes: Vec::new(),
                confirmed_bytes: 0,
                total_size: Some(0),
            });
        }

        self.ensure_plan(&mut descriptor, &dest_id, capability)
            .await?;

        self.open_dest_file(descriptor.total_size).await?;
        let segment_count = descriptor.segments.len();

        // 启动前先落盘一次，让条目在取回开始前就存在
        self.store.save(&descriptor).await?;
        let descriptor = Arc::new(Mutex::new(descriptor));

        let handles = spawn_fetchers(SpawnFetchersParams {
            client: &self.client,
            url: self.config.source.as_str(),
            dest: &self.config.dest,
            descriptor: &descriptor,
            store: &self.store,
            cancel: &cancel,
            segment_count,
            max_retries: self.config.max_retries,
            read_timeout: self.config.read_timeout,
        })
        .await?;

        let outcomes = join_fetcher_handles(handles).await?;
        self.finalize(&descriptor, outcomes).await
    }

    /// INIT：加载已存记录；损坏或来源不一致的记录删除后重新开始。
    async fn load_or_fresh(&self, dest_id: &str) -> Result<TransferDescriptor, DownloadError> {
        match self.store.load(dest_id).await {
            Ok(Some(d)) if d.source == self.config.source.as_str() => {
                tracing::info!(confirmed = d.confirmed_bytes(), "发现已存进度，准备续传");
                Ok(d)
            }
            Ok(Some(_)) => {
                tracing::warn!("已存进度的来源地址不一致，重新开始");
                self.store.delete(dest_id).await?;
                Ok(self.fresh_descriptor(dest_id))
            }
            Ok(None) => Ok(self.fresh_descriptor(dest_id)),
            Err(e) => {
                tracing::warn!(error = %e, "已存进度无法读取，重新开始");
                self.store.delete(dest_id).await?;
                Ok(self.fresh_descriptor(dest_id))
            }
        }
    }

    fn fresh_descriptor(&self, dest_id: &str) -> TransferDescriptor {
        TransferDescriptor::new(self.config.source.as_str(), dest_id)
    }

    /// 确定分段划分：新记录按探测结果规划；续传沿用已存划分，
    /// 但远端大小变化时旧进度作废、重新规划。
    async fn ensure_plan(
        &self,
        descriptor: &mut TransferDescriptor,
        dest_id: &str,
        capability: RemoteCapability,
    ) -> Result<(), DownloadError> {
        let size_changed = !descriptor.segments.is_empty()
            && descriptor.total_size.is_some()
            && capability.content_length.is_some()
            && descriptor.total_size != capability.content_length;
        if size_changed {
            tracing::warn!(
                stored = ?descriptor.total_size,
                probed = ?capability.content_length,
                "远端大小与已存进度不符，放弃旧进度重新开始"
            );
            self.store.delete(dest_id).await?;
            *descriptor = self.fresh_descriptor(dest_id);
        }

        if !descriptor.segments.is_empty() {
            return Ok(());
        }

        let segmented = capability.accepts_ranges
            && capability.content_length.is_some()
            && self.config.concurrency > 1;

        match capability.content_length {
            Some(total) if segmented => {
                let plan = plan_segments(total, self.config.concurrency)?;
                tracing::info!(total, segments = plan.len(), "采用分段并发下载");
                descriptor.apply_plan(total, &plan);
            }
            other => {
                tracing::info!(total = ?other, "采用单流下载");
                descriptor.apply_single_stream(other);
            }
        }
        Ok(())
    }

    /// 建立目标文件（不截断已有内容，续传依赖已写入的字节），
    /// 已知总大小时预分配到精确长度。写入句柄由各取回任务各自打开。
    async fn open_dest_file(&self, total: Option<u64>) -> Result<(), DownloadError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.config.dest)
            .await
            .map_err(DownloadError::CreateFile)?;

        if let Some(total) = total {
            let len = file
                .metadata()
                .await
                .map_err(DownloadError::PreallocateFile)?
                .len();
            if len != total {
                file.set_len(total)
                    .await
                    .map_err(DownloadError::PreallocateFile)?;
            }
        }
        Ok(())
    }

    /// 裁定最终结果：全部分段完成且确认字节覆盖总大小为 `DONE` 并删除条目；
    /// 否则保留条目供下次续传。
    async fn finalize(
        &self,
        descriptor: &Arc<Mutex<TransferDescriptor>>,
        outcomes: Vec<SegmentOutcome>,
    ) -> Result<TransferReport, DownloadError> {
        let mut d = descriptor.lock().await;
        let all_completed = outcomes
            .iter()
            .all(|o| matches!(o, SegmentOutcome::Completed));

        if all_completed && d.is_fully_confirmed() {
            d.completed = true;
            self.store.delete(&d.dest).await?;
            tracing::info!(bytes = d.confirmed_bytes(), "下载完成，进度条目已清理");
            return Ok(TransferReport {
                state: TransferState::Done,
                segment_outcomes: outcomes,
                confirmed_bytes: d.confirmed_bytes(),
                total_size: d.total_size,
            });
        }

        // 保留条目并落盘最新进度，供下次续传
        self.store.save(&d).await?;
        tracing::warn!(
            confirmed = d.confirmed_bytes(),
            total = ?d.total_size,
            "部分分段未完成，进度已保留"
        );
        Ok(TransferReport {
            state: TransferState::Failed,
            segment_outcomes: outcomes,
            confirmed_bytes: d.confirmed_bytes(),
            total_size: d.total_size,
        })
    }
}
