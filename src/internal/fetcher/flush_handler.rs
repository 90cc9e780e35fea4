//! 处理单块数据——写入绝对偏移、提升段内确认量、进度落盘。

use std::io::SeekFrom;

use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::internal::store::structs::progress_store::ProgressStore;
use crate::internal::store::structs::transfer_descriptor::TransferDescriptor;

use super::error::FetchError;

/// 处理单块数据时的参数（形参超过 3 个，用 struct 承载）。
pub struct FlushChunkParams<'a> {
    pub chunk: &'a [u8],
    pub file: &'a mut File,
    pub descriptor: &'a Mutex<TransferDescriptor>,
    pub store: &'a ProgressStore,
    pub seg_index: usize,
}

/// 将一块数据写入对应的绝对文件偏移，然后在持有记录锁的状态下
/// 提升段内确认量并调用存储落盘。返回本次确认的字节数。
///
/// 每次缓冲刷写都跟随一次完整的存储重写：崩溃时的进度损失窗口
/// 至多为一块未刷写的缓冲。写入量按段上界截断，不会越过相邻段。
pub async fn flush_chunk(params: FlushChunkParams<'_>) -> Result<u64, FetchError> {
    let (offset, take) = {
        let d = params.descriptor.lock().await;
        let seg = &d.segments[params.seg_index];
        let take = match seg.remaining() {
            Some(remaining) => (params.chunk.len() as u64).min(remaining),
            None => params.chunk.len() as u64,
        };
        (seg.next_offset(), take)
    };
    if take == 0 {
        return Ok(0);
    }

    params
        .file
        .seek(SeekFrom::Start(offset))
        .await
        .map_err(FetchError::SeekFile)?;
    params
        .file
        .write_all(&params.chunk[..take as usize])
        .await
        .map_err(FetchError::WriteFile)?;

    let mut d = params.descriptor.lock().await;
    d.segments[params.seg_index].confirmed += take;
    params.store.save(&d).await?;
    Ok(take)
}
