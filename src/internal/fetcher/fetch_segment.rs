//! 单个分段的取回编排：续传定位、流式读块、瞬时失败重试、取消停靠。

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::internal::store::structs::progress_store::ProgressStore;
use crate::internal::store::structs::segment_progress::SegmentProgress;
use crate::internal::store::structs::transfer_descriptor::TransferDescriptor;

use super::error::FetchError;
use super::flush_handler::{FlushChunkParams, flush_chunk};
use super::range_request::{FetchRangeParams, fetch_range_response};
use super::structs::segment_outcome::SegmentOutcome;

/// 取回单个分段时的参数（形参超过 3 个，用 struct 承载）。
pub struct FetchSegmentParams {
    pub client: Client,
    pub url: String,
    /// 本任务负责的分段在记录 `segments` 中的下标
    pub seg_index: usize,
    /// 本任务专属的文件句柄，只写本段的偏移区间
    pub file: File,
    pub descriptor: Arc<Mutex<TransferDescriptor>>,
    pub store: Arc<ProgressStore>,
    pub cancel: CancellationToken,
    /// 最大尝试次数（含首次请求）
    pub max_retries: usize,
    /// 单次流式读取的超时；超时视为瞬时失败
    pub read_timeout: Duration,
}

/// 取回一个分段直至终态。
///
/// 每次尝试都从本段当前已确认的偏移续传，绝不重复请求已刷写的字节；
/// 瞬时失败重试到上限后报 `Failed`，不影响兄弟分段。
pub async fn fetch_segment(mut params: FetchSegmentParams) -> SegmentOutcome {
    let mut attempts = 0usize;
    loop {
        if params.cancel.is_cancelled() {
            return SegmentOutcome::Cancelled;
        }

        match run_one_attempt(&mut params).await {
            Ok(AttemptEnd::Completed) => return SegmentOutcome::Completed,
            Ok(AttemptEnd::Cancelled) => return SegmentOutcome::Cancelled,
            Err(e) if e.is_transient() => {
                attempts += 1;
                if attempts >= params.max_retries {
                    tracing::error!(
                        segment = params.seg_index,
                        attempts,
                        error = %e,
                        "分段重试次数耗尽"
                    );
                    return SegmentOutcome::Failed;
                }
                tracing::warn!(
                    segment = params.seg_index,
                    attempt = attempts,
                    error = %e,
                    "分段瞬时失败，从已确认偏移重试"
                );
            }
            Err(e) => {
                tracing::error!(segment = params.seg_index, error = %e, "分段失败");
                return SegmentOutcome::Failed;
            }
        }
    }
}

/// 单次尝试的结束方式（失败走 `Err`）。
enum AttemptEnd {
    Completed,
    Cancelled,
}

/// 执行一次取回尝试：定位续传起点、发请求、逐块刷写。
async fn run_one_attempt(params: &mut FetchSegmentParams) -> Result<AttemptEnd, FetchError> {
    let (range, open_ended) = {
        let d = params.descriptor.lock().await;
        let seg = &d.segments[params.seg_index];
        if seg.is_complete() {
            return Ok(AttemptEnd::Completed);
        }
        (range_for(seg), seg.end.is_none())
    };

    let resp = fetch_range_response(FetchRangeParams {
        client: &params.client,
        url: &params.url,
        range: range.as_deref(),
    })
    .await?;

    let status = resp.status();
    if status != StatusCode::OK && status != StatusCode::PARTIAL_CONTENT {
        return Err(FetchError::UnexpectedStatus(status.as_u16()));
    }

    // 发了 Range 却收到 200：服务器忽略了区间，响应体从第 0 字节开始。
    // 本段确认量归零、从头重写，否则整文件的字节会错位写到续传偏移上。
    if status == StatusCode::OK && range.is_some() {
        let mut d = params.descriptor.lock().await;
        let seg = &mut d.segments[params.seg_index];
        if seg.confirmed > 0 {
            tracing::warn!(
                segment = params.seg_index,
                discarded = seg.confirmed,
                "服务器未按 Range 响应，放弃本段已确认进度从头重写"
            );
            seg.confirmed = 0;
            params.store.save(&d).await?;
        }
    }

    let mut stream = resp.bytes_stream();
    loop {
        let chunk = match tokio::time::timeout(params.read_timeout, stream.next()).await {
            Err(_) => return Err(FetchError::ReadTimeout),
            Ok(None) => break,
            Ok(Some(Err(e))) => return Err(FetchError::Request(e)),
            Ok(Some(Ok(chunk))) => chunk,
        };

        flush_chunk(FlushChunkParams {
            chunk: &chunk,
            file: &mut params.file,
            descriptor: &params.descriptor,
            store: &params.store,
            seg_index: params.seg_index,
        })
        .await?;

        // 取消只在一块完整刷写之后生效，记录保持可续传状态
        if params.cancel.is_cancelled() {
            return Ok(AttemptEnd::Cancelled);
        }

        let complete = {
            let d = params.descriptor.lock().await;
            d.segments[params.seg_index].is_complete()
        };
        if complete {
            return Ok(AttemptEnd::Completed);
        }
    }

    // 流正常结束
    if open_ended {
        finish_open_ended(params).await?;
        return Ok(AttemptEnd::Completed);
    }

    let missing = {
        let d = params.descriptor.lock().await;
        d.segments[params.seg_index].remaining().unwrap_or(0)
    };
    if missing == 0 {
        Ok(AttemptEnd::Completed)
    } else {
        Err(FetchError::PrematureEnd { missing })
    }
}

/// 本次尝试的 Range 请求头：总是从本段已确认偏移续传。
///
/// 开放区间且尚无确认字节时返回 `None`（整文件 GET）。
fn range_for(seg: &SegmentProgress) -> Option<String> {
    match seg.end {
        Some(end) => Some(format!("bytes={}-{}", seg.next_offset(), end)),
        None if seg.confirmed > 0 => Some(format!("bytes={}-", seg.next_offset())),
        None => None,
    }
}

/// 开放区间在流结束后封口：补写区间终点与总大小并落盘，
/// 完成判定由此从字节数比对转为流结束事实。
async fn finish_open_ended(params: &FetchSegmentParams) -> Result<(), FetchError> {
    let mut d = params.descriptor.lock().await;
    let seg = &mut d.segments[params.seg_index];
    if seg.confirmed > 0 {
        seg.end = Some(seg.start + seg.confirmed - 1);
    }
    d.total_size = Some(d.confirmed_bytes());
    params.store.save(&d).await?;
    Ok(())
}
