use serde::{Deserialize, Serialize};

// 提交校验/审核状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Processing,         // 初始状态，流水线处理中
    Validated,          // 自动校验通过
    Violated,           // 存在未解决违规
    Complained,         // 学生申诉中
    ModeratorValidated, // 复核人确认通过
    ModeratorViolated,  // 复核人确认违规
}

impl SubmissionStatus {
    pub const PROCESSING: &'static str = "processing";
    pub const VALIDATED: &'static str = "validated";
    pub const VIOLATED: &'static str = "violated";
    pub const COMPLAINED: &'static str = "complained";
    pub const MODERATOR_VALIDATED: &'static str = "moderator_validated";
    pub const MODERATOR_VIOLATED: &'static str = "moderator_violated";
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionStatus::Processing => Self::PROCESSING,
            SubmissionStatus::Validated => Self::VALIDATED,
            SubmissionStatus::Violated => Self::VIOLATED,
            SubmissionStatus::Complained => Self::COMPLAINED,
            SubmissionStatus::ModeratorValidated => Self::MODERATOR_VALIDATED,
            SubmissionStatus::ModeratorViolated => Self::MODERATOR_VIOLATED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PROCESSING => Ok(SubmissionStatus::Processing),
            Self::VALIDATED => Ok(SubmissionStatus::Validated),
            Self::VIOLATED => Ok(SubmissionStatus::Violated),
            Self::COMPLAINED => Ok(SubmissionStatus::Complained),
            Self::MODERATOR_VALIDATED => Ok(SubmissionStatus::ModeratorValidated),
            Self::MODERATOR_VIOLATED => Ok(SubmissionStatus::ModeratorViolated),
            _ => Err(format!("无效的提交状态: '{s}'")),
        }
    }
}

// 评分进度状态，与校验状态相互独立
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum GradeStatus {
    NotGraded,  // 尚未评分
    Graded,     // 已评分（唯一评分完成时自动进入）
    ReAssigned, // 已重新指派考官
    Approved,   // 评分已批准
}

impl GradeStatus {
    pub const NOT_GRADED: &'static str = "not_graded";
    pub const GRADED: &'static str = "graded";
    pub const RE_ASSIGNED: &'static str = "re_assigned";
    pub const APPROVED: &'static str = "approved";
}

impl<'de> Deserialize<'de> for GradeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GradeStatus::NotGraded => Self::NOT_GRADED,
            GradeStatus::Graded => Self::GRADED,
            GradeStatus::ReAssigned => Self::RE_ASSIGNED,
            GradeStatus::Approved => Self::APPROVED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for GradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::NOT_GRADED => Ok(GradeStatus::NotGraded),
            Self::GRADED => Ok(GradeStatus::Graded),
            Self::RE_ASSIGNED => Ok(GradeStatus::ReAssigned),
            Self::APPROVED => Ok(GradeStatus::Approved),
            _ => Err(format!("无效的评分状态: '{s}'")),
        }
    }
}

/// 提交业务实体
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: i64,
    pub exam_subject_id: i64,
    pub examiner_id: Option<i64>,
    pub moderator_id: Option<i64>,
    pub student_name: String,
    pub file_url: String,
    pub status: SubmissionStatus,
    pub grade_status: GradeStatus,
    pub is_active: bool,
    pub assigned_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl crate::entity::submissions::Model {
    /// 数据库实体转业务实体
    pub fn into_submission(self) -> Submission {
        Submission {
            id: self.id,
            exam_subject_id: self.exam_subject_id,
            examiner_id: self.examiner_id,
            moderator_id: self.moderator_id,
            student_name: self.student_name,
            file_url: self.file_url,
            status: self
                .status
                .parse()
                .unwrap_or(SubmissionStatus::Processing),
            grade_status: self.grade_status.parse().unwrap_or(GradeStatus::NotGraded),
            is_active: self.is_active,
            assigned_at: self.assigned_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// 创建提交的内部请求（由归档拆分器产生，批量落库）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub exam_subject_id: i64,
    pub examiner_id: Option<i64>,
    pub moderator_id: Option<i64>,
    pub student_name: String,
    pub file_url: String,
}
