//! Access token（HS256 JWT）签发与校验。

use axum::http::StatusCode;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use ef_shared_protocol::{Role, ui_permissions};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use crate::api::{
    error::ApiError,
    types::{AccessTokenClaims, JWT_ALG, JWT_TYP, JwtHeader, UserRecord},
};

type HmacSha256 = Hmac<Sha256>;

/// 当前 unix 秒。
pub(crate) fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

/// token 校验失败的内部原因；对外统一映射为 401。
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TokenError {
    #[error("missing bearer token")]
    Missing,
    #[error("token is not three dot-separated segments")]
    Format,
    #[error("signature segment is not base64url")]
    SignatureFormat,
    #[error("signature mismatch")]
    SignatureVerify,
    #[error("header segment invalid")]
    Header,
    #[error("unsupported algorithm `{0}`")]
    Algorithm(String),
    #[error("payload segment is not base64url")]
    Payload,
    #[error("claims invalid")]
    Claims,
    #[error("token expired")]
    Expired,
    #[error("subject claim missing")]
    MissingSubject,
    #[error("subject `{0}` no longer exists")]
    UnknownSubject(String),
}

/// token 错误映射到 API 错误，不泄露具体原因。
pub(crate) fn token_error_to_api(err: TokenError) -> ApiError {
    match err {
        TokenError::Missing => ApiError::new(
            StatusCode::UNAUTHORIZED,
            "MISSING_CREDENTIALS",
            "Not authenticated",
        ),
        _ => ApiError::unauthorized(),
    }
}

/// token 服务：持有签名密钥与有效期。
#[derive(Clone)]
pub(crate) struct TokenService {
    secret: String,
    ttl_sec: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl_sec", &self.ttl_sec)
            .finish()
    }
}

impl TokenService {
    pub(crate) fn new(secret: impl Into<String>, ttl_sec: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_sec,
        }
    }

    pub(crate) fn ttl_sec(&self) -> u64 {
        self.ttl_sec
    }

    /// 为用户签发 access token（`<header>.<payload>.<sig>`）。
    pub(crate) fn mint(&self, user: &UserRecord, now: u64) -> String {
        let claims = AccessTokenClaims {
            sub: Some(user.username.clone()),
            id: user.id,
            role: Role::from_permissions(&user.permissions),
            ui_permissions: ui_permissions(&user.permissions),
            exp: now.saturating_add(self.ttl_sec),
        };
        self.sign(&claims)
    }

    /// 按给定 claims 签名。
    pub(crate) fn sign(&self, claims: &AccessTokenClaims) -> String {
        let header = JwtHeader {
            alg: JWT_ALG.to_string(),
            typ: JWT_TYP.to_string(),
        };
        let header_raw = serde_json::to_vec(&header).expect("jwt header must be serializable");
        let payload_raw = serde_json::to_vec(claims).expect("jwt claims must be serializable");
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_raw),
            URL_SAFE_NO_PAD.encode(payload_raw)
        );

        let mut mac =
            HmacSha256::new_from_slice(self.secret.as_bytes()).expect("hmac key should be valid");
        mac.update(signing_input.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{signing_input}.{sig_b64}")
    }

    /// 校验签名、算法与有效期，返回 claims。主体是否仍存在由调用方判断。
    pub(crate) fn decode(&self, token: &str, now: u64) -> Result<AccessTokenClaims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let mut parts = token.split('.');
        let header_b64 = parts.next().unwrap_or_default();
        let payload_b64 = parts.next().unwrap_or_default();
        let sig_b64 = parts.next().unwrap_or_default();
        if header_b64.is_empty()
            || payload_b64.is_empty()
            || sig_b64.is_empty()
            || parts.next().is_some()
        {
            return Err(TokenError::Format);
        }

        let sig = URL_SAFE_NO_PAD
            .decode(sig_b64.as_bytes())
            .map_err(|_| TokenError::SignatureFormat)?;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| TokenError::SignatureVerify)?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&sig)
            .map_err(|_| TokenError::SignatureVerify)?;

        let header_raw = URL_SAFE_NO_PAD
            .decode(header_b64.as_bytes())
            .map_err(|_| TokenError::Header)?;
        let header: JwtHeader =
            serde_json::from_slice(&header_raw).map_err(|_| TokenError::Header)?;
        if header.alg != JWT_ALG {
            return Err(TokenError::Algorithm(header.alg));
        }

        let payload_raw = URL_SAFE_NO_PAD
            .decode(payload_b64.as_bytes())
            .map_err(|_| TokenError::Payload)?;
        let claims: AccessTokenClaims =
            serde_json::from_slice(&payload_raw).map_err(|_| TokenError::Claims)?;

        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        match claims.sub.as_deref() {
            Some(sub) if !sub.is_empty() => Ok(claims),
            _ => Err(TokenError::MissingSubject),
        }
    }
}
