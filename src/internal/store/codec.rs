//! 传输记录的显式二进制编码：带版本号、逐字段、长度前缀。
//!
//! 不依赖任何对象图序列化格式，保证存储数据在实现重写后仍可读取。
//! 整数一律小端；字符串为 u32 长度前缀的 UTF-8 字节。

use bytes::{Buf, BufMut};
use thiserror::Error;

use super::structs::segment_progress::SegmentProgress;
use super::structs::transfer_descriptor::TransferDescriptor;

/// 编码魔数
const MAGIC: [u8; 4] = *b"RFTD";

/// 当前编码版本
const VERSION: u8 = 1;

/// 传输记录编解码错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("进度数据魔数不匹配")]
    BadMagic,

    #[error("不支持的进度数据版本: {0}")]
    UnsupportedVersion(u8),

    #[error("进度数据长度不足")]
    Truncated,

    #[error("进度数据包含非法 UTF-8 字符串")]
    InvalidUtf8,

    #[error("进度数据末尾存在多余字节")]
    TrailingBytes,
}

/// 编码传输记录为带版本号的字节序列。
pub fn encode(descriptor: &TransferDescriptor) -> Vec<u8> {
    let mut buf = Vec::with_capacity(
        64 + descriptor.source.len() + descriptor.dest.len() + descriptor.segments.len() * 25,
    );
    buf.put_slice(&MAGIC);
    buf.put_u8(VERSION);
    put_string(&mut buf, &descriptor.source);
    put_string(&mut buf, &descriptor.dest);
    match descriptor.total_size {
        Some(total) => {
            buf.put_u8(1);
            buf.put_u64_le(total);
        }
        None => buf.put_u8(0),
    }
    buf.put_u8(descriptor.completed as u8);
    buf.put_u32_le(descriptor.segments.len() as u32);
    for seg in &descriptor.segments {
        buf.put_u64_le(seg.start);
        match seg.end {
            Some(end) => {
                buf.put_u8(1);
                buf.put_u64_le(end);
            }
            None => buf.put_u8(0),
        }
        buf.put_u64_le(seg.confirmed);
    }
    buf
}

/// 解码字节序列为传输记录；版本不符或数据不完整时报错，不做部分恢复。
pub fn decode(mut data: &[u8]) -> Result<TransferDescriptor, CodecError> {
    let buf = &mut data;
    if buf.remaining() < MAGIC.len() {
        return Err(CodecError::Truncated);
    }
    let mut magic = [0u8; 4];
    buf.copy_to_slice(&mut magic);
    if magic != MAGIC {
        return Err(CodecError::BadMagic);
    }

    let version = take_u8(buf)?;
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let source = take_string(buf)?;
    let dest = take_string(buf)?;
    let total_size = match take_u8(buf)? {
        0 => None,
        _ => Some(take_u64(buf)?),
    };
    let completed = take_u8(buf)? != 0;

    let count = take_u32(buf)? as usize;
    let mut segments = Vec::with_capacity(count);
    for _ in 0..count {
        let start = take_u64(buf)?;
        let end = match take_u8(buf)? {
            0 => None,
            _ => Some(take_u64(buf)?),
        };
        let confirmed = take_u64(buf)?;
        segments.push(SegmentProgress {
            start,
            end,
            confirmed,
        });
    }

    if buf.has_remaining() {
        return Err(CodecError::TrailingBytes);
    }

    Ok(TransferDescriptor {
        source,
        dest,
        total_size,
        segments,
        completed,
    })
}

fn put_string(buf: &mut Vec<u8>, s: &str) {
    buf.put_u32_le(s.len() as u32);
    buf.put_slice(s.as_bytes());
}

fn take_u8(buf: &mut &[u8]) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Truncated);
    }
    Ok(buf.get_u8())
}

fn take_u32(buf: &mut &[u8]) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Truncated);
    }
    Ok(buf.get_u32_le())
}

fn take_u64(buf: &mut &[u8]) -> Result<u64, CodecError> {
    if buf.remaining() < 8 {
        return Err(CodecError::Truncated);
    }
    Ok(buf.get_u64_le())
}

fn take_string(buf: &mut &[u8]) -> Result<String, CodecError> {
    let len = take_u32(buf)? as usize;
    if buf.remaining() < len {
        return Err(CodecError::Truncated);
    }
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
}
