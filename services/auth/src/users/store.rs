//! 用户凭证存储（内存）。

use std::collections::BTreeMap;

use axum::http::StatusCode;
use ef_shared_protocol::{UserCreate, UserUpdate};
use thiserror::Error;

use crate::{api::error::ApiError, api::types::UserRecord, auth::password::hash_password};

/// 存储层错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum StoreError {
    #[error("User ID {0} already exists")]
    IdTaken(i64),
    #[error("Username already registered")]
    UsernameTaken(String),
    #[error("User not found")]
    NotFound(i64),
}

/// 存储错误映射到 API 错误。
pub(crate) fn store_error_to_api(err: StoreError) -> ApiError {
    match err {
        StoreError::IdTaken(_) => {
            ApiError::new(StatusCode::BAD_REQUEST, "USER_ID_TAKEN", err.to_string())
        }
        StoreError::UsernameTaken(_) => {
            ApiError::new(StatusCode::BAD_REQUEST, "USERNAME_TAKEN", err.to_string())
        }
        StoreError::NotFound(_) => {
            ApiError::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", err.to_string())
        }
    }
}

/// 用户注册表：以 id 为主键，username 全局唯一（区分大小写）。
#[derive(Debug, Default)]
pub(crate) struct UserRegistry {
    users: BTreeMap<i64, UserRecord>,
}

impl UserRegistry {
    /// 预置演示账号：`admin/admin123` 与 `user/user123`。
    pub(crate) fn seeded() -> Self {
        let mut registry = Self::default();
        for (id, username, password, permissions) in [
            (1, "admin", "admin123", &["admin", "user"][..]),
            (2, "user", "user123", &["user"][..]),
        ] {
            registry.users.insert(
                id,
                UserRecord {
                    id,
                    username: username.to_string(),
                    password_hash: hash_password(password),
                    permissions: permissions.iter().map(|p| p.to_string()).collect(),
                    is_active: true,
                },
            );
        }
        registry
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: i64) -> Option<&UserRecord> {
        self.users.get(&id)
    }

    pub(crate) fn find_by_username(&self, username: &str) -> Option<&UserRecord> {
        self.users.values().find(|user| user.username == username)
    }

    /// 全量列表，按 id 升序。
    pub(crate) fn list(&self) -> Vec<&UserRecord> {
        self.users.values().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.users.len()
    }

    /// 注册新用户，id 或 username 冲突时拒绝。
    pub(crate) fn create(&mut self, req: UserCreate) -> Result<&UserRecord, StoreError> {
        if self.users.contains_key(&req.id) {
            return Err(StoreError::IdTaken(req.id));
        }
        if self.find_by_username(&req.username).is_some() {
            return Err(StoreError::UsernameTaken(req.username));
        }

        let record = UserRecord {
            id: req.id,
            username: req.username,
            password_hash: hash_password(&req.password),
            permissions: req.permissions,
            is_active: true,
        };
        Ok(&*self.users.entry(record.id).or_insert(record))
    }

    /// 局部更新：仅覆盖携带的字段，新密码重新计算摘要。
    pub(crate) fn update(&mut self, id: i64, req: UserUpdate) -> Result<&UserRecord, StoreError> {
        if !self.users.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if let Some(username) = req.username.as_deref()
            && self
                .find_by_username(username)
                .is_some_and(|other| other.id != id)
        {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }

        let Some(record) = self.users.get_mut(&id) else {
            return Err(StoreError::NotFound(id));
        };
        if let Some(username) = req.username {
            record.username = username;
        }
        if let Some(password) = req.password {
            record.password_hash = hash_password(&password);
        }
        if let Some(permissions) = req.permissions {
            record.permissions = permissions;
        }
        Ok(&*record)
    }

    /// 删除用户，不可恢复。
    pub(crate) fn delete(&mut self, id: i64) -> Result<UserRecord, StoreError> {
        self.users.remove(&id).ok_or(StoreError::NotFound(id))
    }
}

/// 便于测试构造权限集合。
#[cfg(test)]
pub(crate) fn permission_set(items: &[&str]) -> std::collections::BTreeSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}
