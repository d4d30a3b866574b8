//! API 响应体。

use serde::Serialize;

/// 失败响应体：`detail` 沿用旧接口字段名，`code` 供客户端稳定匹配。
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) detail: String,
    pub(crate) code: String,
}
