//! 一次传输的不可变配置：来源、目标、并发与重试参数。
//!
//! 配置在创建时校验，之后按引用传入存储与调度器，不依赖任何进程级可变状态。

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::super::error::ConfigError;

/// 默认并发分段数
pub const DEFAULT_CONCURRENCY: usize = 4;

/// 默认最大尝试次数（首次请求计入）
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// 默认单次读取超时
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// 默认连接超时
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// 一次传输的配置。创建后不可变，按引用传入各组件。
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// 下载来源地址
    pub source: Url,
    /// 本地目标文件路径
    pub dest: PathBuf,
    /// 期望并发分段数；为 1 或服务器不支持 Range 时退化为单流下载
    pub concurrency: usize,
    /// 单个分段的最大尝试次数（含首次请求）
    pub max_retries: usize,
    /// 单次流式读取的超时；超时视为瞬时失败，按重试策略处理
    pub read_timeout: Duration,
    /// 建立连接的超时
    pub connect_timeout: Duration,
    /// 进度存储目录；密钥文件与进度条目都保存在这里
    pub store_dir: PathBuf,
}

impl TransferConfig {
    /// 创建配置并校验来源地址与目标路径；其余参数取默认值，可链式覆盖。
    pub fn new(source: &str, dest: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let source = Url::parse(source)?;
        let dest = dest.into();
        if dest.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDest);
        }

        Ok(Self {
            source,
            dest,
            concurrency: DEFAULT_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
            read_timeout: DEFAULT_READ_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            store_dir: default_store_dir(),
        })
    }

    /// 设置期望并发分段数。
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    /// 设置单个分段的最大尝试次数。
    pub fn max_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// 设置单次流式读取的超时。
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// 设置进度存储目录。
    pub fn store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// 校验配置；调度器启动前调用。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    /// 目标路径的字符串形式；进度记录与条目命名统一使用该形式。
    pub fn dest_id(&self) -> String {
        self.dest.to_string_lossy().into_owned()
    }
}

/// 默认进度存储目录：系统数据目录下的 `range_fetch`，取不到时退回当前目录。
pub fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("range_fetch")
}
