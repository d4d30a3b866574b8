//! 用户管理：内存注册表与 CRUD 接口。

pub(crate) mod handlers;
pub(crate) mod store;
