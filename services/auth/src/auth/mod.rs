//! 鉴权模块：密码摘要、token 签发校验与接口处理。

pub(crate) mod handlers;
pub(crate) mod password;
pub(crate) mod token;
