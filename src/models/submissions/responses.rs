use serde::Serialize;

use crate::models::assessments::entities::Assessment;
use crate::models::submissions::entities::Submission;
use crate::models::violations::entities::Violation;

/// 批量上传处理结果
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub submission_ids: Vec<i64>,
    pub created: usize,
}

/// 提交详情（含违规与评分记录）
#[derive(Debug, Serialize)]
pub struct SubmissionDetailResponse {
    #[serde(flatten)]
    pub submission: Submission,
    pub violations: Vec<Violation>,
    pub assessments: Vec<Assessment>,
}
