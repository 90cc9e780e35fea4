//! 生成并 spawn 各分段的取回任务，以及等待全部任务到达终态。

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::fs::OpenOptions;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::internal::fetcher::fetch_segment::{FetchSegmentParams, fetch_segment};
use crate::internal::fetcher::structs::segment_outcome::SegmentOutcome;
use crate::internal::store::structs::progress_store::ProgressStore;
use crate::internal::store::structs::transfer_descriptor::TransferDescriptor;

use super::error::DownloadError;

/// 生成取回任务时的参数（形参超过 3 个，用 struct 承载）。
pub struct SpawnFetchersParams<'a> {
    pub client: &'a Client,
    pub url: &'a str,
    /// 目标文件路径；每个任务独立打开自己的句柄。
    /// 克隆同一个句柄会共享同一个文件游标，并发 seek + write 会互相错位
    pub dest: &'a Path,
    pub descriptor: &'a Arc<Mutex<TransferDescriptor>>,
    pub store: &'a Arc<ProgressStore>,
    pub cancel: &'a CancellationToken,
    pub segment_count: usize,
    pub max_retries: usize,
    pub read_timeout: Duration,
}

/// 为每个分段 spawn 一个取回任务，返回任务句柄列表（顺序与分段一致）。
pub async fn spawn_fetchers(
    params: SpawnFetchersParams<'_>,
) -> Result<Vec<JoinHandle<SegmentOutcome>>, DownloadError> {
    let mut handles = Vec::with_capacity(params.segment_count);
    for seg_index in 0..params.segment_count {
        let task_file = OpenOptions::new()
            .write(true)
            .open(params.dest)
            .await
            .map_err(DownloadError::OpenFile)?;

        let fetch_params = FetchSegmentParams {
            client: params.client.clone(),
            url: params.url.to_string(),
            seg_index,
            file: task_file,
            descriptor: Arc::clone(params.descriptor),
            store: Arc::clone(params.store),
            cancel: params.cancel.clone(),
            max_retries: params.max_retries,
            read_timeout: params.read_timeout,
        };
        handles.push(tokio::spawn(fetch_segment(fetch_params)));
    }
    Ok(handles)
}

/// 等待全部取回任务结束，按分段顺序收集终态。
///
/// 不在首个失败处提前返回：每个分段都跑到自己的终态。
pub async fn join_fetcher_handles(
    handles: Vec<JoinHandle<SegmentOutcome>>,
) -> Result<Vec<SegmentOutcome>, DownloadError> {
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await?);
    }
    Ok(outcomes)
}
