use serde::{Deserialize, Serialize};

// 评分记录状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Pending,   // 已指派，尚未打开
    InReview,  // 考官已开始评阅
    Complete,  // 评分已保存
    Cancelled, // 其他评分被批准后作废
}

impl AssessmentStatus {
    pub const PENDING: &'static str = "pending";
    pub const IN_REVIEW: &'static str = "in_review";
    pub const COMPLETE: &'static str = "complete";
    pub const CANCELLED: &'static str = "cancelled";
}

impl<'de> Deserialize<'de> for AssessmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssessmentStatus::Pending => Self::PENDING,
            AssessmentStatus::InReview => Self::IN_REVIEW,
            AssessmentStatus::Complete => Self::COMPLETE,
            AssessmentStatus::Cancelled => Self::CANCELLED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AssessmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(AssessmentStatus::Pending),
            Self::IN_REVIEW => Ok(AssessmentStatus::InReview),
            Self::COMPLETE => Ok(AssessmentStatus::Complete),
            Self::CANCELLED => Ok(AssessmentStatus::Cancelled),
            _ => Err(format!("无效的评分状态: '{s}'")),
        }
    }
}

/// 评分业务实体
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub id: i64,
    pub submission_id: i64,
    pub examiner_id: i64,
    pub submission_name: String,
    pub score: Option<f64>,
    pub score_detail: Option<String>,
    pub comment: Option<String>,
    pub status: AssessmentStatus,
    pub graded_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl crate::entity::assessments::Model {
    /// 数据库实体转业务实体
    pub fn into_assessment(self) -> Assessment {
        Assessment {
            id: self.id,
            submission_id: self.submission_id,
            examiner_id: self.examiner_id,
            submission_name: self.submission_name,
            score: self.score,
            score_detail: self.score_detail,
            comment: self.comment,
            status: self.status.parse().unwrap_or(AssessmentStatus::Pending),
            graded_at: self.graded_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
