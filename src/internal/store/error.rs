//! 进度存储相关错误类型。

use thiserror::Error;

use super::codec::CodecError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("创建存储目录失败: {0}")]
    CreateDir(std::io::Error),

    #[error("读取进度条目失败: {0}")]
    ReadEntry(std::io::Error),

    #[error("写入进度条目失败: {0}")]
    WriteEntry(std::io::Error),

    #[error("替换进度条目失败: {0}")]
    ReplaceEntry(std::io::Error),

    #[error("删除进度条目失败: {0}")]
    DeleteEntry(std::io::Error),

    #[error("读取密钥文件失败: {0}")]
    ReadKey(std::io::Error),

    #[error("写入密钥文件失败: {0}")]
    WriteKey(std::io::Error),

    #[error("密钥长度错误: 期望 {expected} 字节，实际 {actual} 字节")]
    BadKeyLength { expected: usize, actual: usize },

    #[error("加密进度数据失败")]
    Encrypt,

    #[error("解密进度数据失败")]
    Decrypt,

    #[error("进度数据编码错误: {0}")]
    Codec(#[from] CodecError),
}
