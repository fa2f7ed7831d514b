//! 外部身份/角色查询
//!
//! 流水线只依赖一个窄契约：某用户是否持有某角色。
//! 身份服务的对象模型不在本服务范围内。

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::config::AppConfig;
use crate::errors::{ExamSubError, Result};

/// 考官角色名
pub const ROLE_EXAMINER: &str = "examiner";

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    // 查询用户是否持有指定角色
    async fn has_role(&self, user_id: i64, role: &str) -> Result<bool>;
}

/// 基于 HTTP 的身份服务实现
///
/// GET {base_url}/api/v1/users/{user_id}/roles/{role}
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RoleCheckResponse {
    has_role: bool,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExamSubError::configuration(format!("构建 HTTP 客户端失败: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn has_role(&self, user_id: i64, role: &str) -> Result<bool> {
        let url = format!("{}/api/v1/users/{user_id}/roles/{role}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ExamSubError::service_unavailable(format!("身份服务不可达: {e}")))?;

        if !response.status().is_success() {
            return Err(ExamSubError::service_unavailable(format!(
                "身份服务返回 {}",
                response.status()
            )));
        }

        let body: RoleCheckResponse = response
            .json()
            .await
            .map_err(|e| ExamSubError::service_unavailable(format!("身份服务响应解析失败: {e}")))?;

        Ok(body.has_role)
    }
}

/// 开发环境实现：未配置身份服务时放行所有角色检查
pub struct PermissiveIdentityProvider;

#[async_trait::async_trait]
impl IdentityProvider for PermissiveIdentityProvider {
    async fn has_role(&self, user_id: i64, role: &str) -> Result<bool> {
        warn!(
            "Identity service not configured, allowing role '{}' for user {}",
            role, user_id
        );
        Ok(true)
    }
}

pub fn create_identity_provider() -> Result<Arc<dyn IdentityProvider>> {
    let config = AppConfig::get();

    if config.identity.base_url.is_empty() {
        warn!("identity.base_url is empty, role checks are permissive");
        return Ok(Arc::new(PermissiveIdentityProvider));
    }

    let provider = HttpIdentityProvider::new(
        &config.identity.base_url,
        Duration::from_secs(config.identity.timeout_secs),
    )?;
    Ok(Arc::new(provider))
}
