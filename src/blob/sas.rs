//! 带时限读取令牌（SAS）的签发与校验
//!
//! 令牌为 HS256 JWT，声明里绑定容器与对象路径，
//! 过期时间由调用方给定的 TTL 决定。

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::{ExamSubError, Result};

/// 读取令牌声明
#[derive(Debug, Serialize, Deserialize)]
pub struct SasClaims {
    pub container: String,
    pub path: String,
    pub exp: i64,
}

/// 令牌签发器
#[derive(Clone)]
pub struct SasSigner {
    secret: String,
}

impl SasSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// 签发只读令牌
    pub fn issue_read_token(&self, container: &str, path: &str, ttl: Duration) -> Result<String> {
        let claims = SasClaims {
            container: container.to_string(),
            path: path.to_string(),
            exp: chrono::Utc::now().timestamp() + ttl.as_secs() as i64,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ExamSubError::object_storage(format!("签发读取令牌失败: {e}")))
    }

    /// 校验令牌并确认其绑定的容器与路径
    pub fn verify_read_token(&self, token: &str, container: &str, path: &str) -> Result<()> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<SasClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ExamSubError::validation(format!("读取令牌无效: {e}")))?;

        if data.claims.container != container || data.claims.path != path {
            return Err(ExamSubError::validation(
                "读取令牌与请求的对象不匹配".to_string(),
            ));
        }

        Ok(())
    }
}
