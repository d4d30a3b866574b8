//! HTTP 接口公共层：错误、响应体与内部类型。

pub(crate) mod error;
pub(crate) mod response;
pub(crate) mod types;
