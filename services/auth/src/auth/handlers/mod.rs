//! 鉴权 HTTP 接口处理模块。

mod http;
mod login;
mod principal;

pub(crate) use http::{login_handler, me_handler};
