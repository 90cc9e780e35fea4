//! 发起单段 Range 请求，返回响应供流式读取。

use reqwest::header::RANGE;
use reqwest::{Client, Response};

use super::error::FetchError;

/// 发起 Range 请求时的参数（形参超过 3 个时用 struct 承载）。
pub struct FetchRangeParams<'a> {
    pub client: &'a Client,
    pub url: &'a str,
    /// Range 请求头的值；`None` 时发起整文件 GET
    pub range: Option<&'a str>,
}

/// 发起单段 GET 请求，返回响应体供调用方做 `bytes_stream()`。
pub async fn fetch_range_response(params: FetchRangeParams<'_>) -> Result<Response, FetchError> {
    let mut req = params.client.get(params.url);
    if let Some(range) = params.range {
        req = req.header(RANGE, range);
    }
    let resp = req.send().await?;
    Ok(resp)
}
