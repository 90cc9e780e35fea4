//! 远程资源能力：总大小与 Range 支持情况，决定分段或单流策略。

/// 探测得到的远程资源能力。
///
/// 缺少确定的大小或 Range 支持指示时，调度器退化为单流下载。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCapability {
    /// 资源总大小（字节）；服务器未给出时为 `None`
    pub content_length: Option<u64>,
    /// 服务器是否声明支持字节 Range 请求
    pub accepts_ranges: bool,
}

impl RemoteCapability {
    /// 一无所知的能力（探测失败时的降级值）：大小未知、不支持 Range。
    pub fn unknown() -> Self {
        Self {
            content_length: None,
            accepts_ranges: false,
        }
    }
}
