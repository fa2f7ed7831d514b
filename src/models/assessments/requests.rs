use serde::{Deserialize, Serialize};

/// 提交的评分明细，需与考试科目的评分结构核对
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub sections: Vec<ScoreDetailSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDetailSection {
    pub name: String,
    pub criteria: Vec<ScoreDetailCriterion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDetailCriterion {
    pub name: String,
    pub score: f64,
    pub max_score: f64,
}

/// 保存评分请求
///
/// POST /api/v1/assessments/{id}/grade
#[derive(Debug, Deserialize)]
pub struct GradeAssessmentRequest {
    pub score_detail: ScoreDetail,
    pub comment: Option<String>,
}

/// 重新指派评分请求
///
/// POST /api/v1/submissions/{id}/assessments
#[derive(Debug, Deserialize)]
pub struct AssignAssessmentRequest {
    pub examiner_id: i64,
}
