use serde::Deserialize;

use crate::models::violations::entities::ViolationRecord;

/// 违规回调请求体
///
/// POST /api/v1/violations/save
#[derive(Debug, Deserialize)]
pub struct SaveViolationsRequest {
    pub submission_id: i64,
    pub violations: Vec<ViolationRecord>,
    /// 复核人回报时置 true，状态落入 moderator_* 分支
    #[serde(default)]
    pub moderator_review: bool,
}
