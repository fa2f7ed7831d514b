//! 提交生命周期管理
//!
//! 两台相互独立的状态机：
//! - 校验状态：processing → {validated, violated} → complained →
//!   {moderator_validated, moderator_violated}，由未解决违规的有无驱动；
//! - 评分状态：not_graded → graded → {re_assigned, approved}，
//!   仅在提交恰好有一条评分记录完成时自动进入 graded，
//!   多条评分记录必须由管理端显式裁决。
//!
//! 评分明细校验失败是致命校验错误，不产生违规实体。

use std::sync::Arc;

use tracing::info;

use crate::errors::{ExamSubError, Result};
use crate::models::assessments::entities::{Assessment, AssessmentStatus};
use crate::models::assessments::requests::ScoreDetail;
use crate::models::exam_subjects::entities::ScoreStructure;
use crate::models::submissions::entities::{GradeStatus, SubmissionStatus};
use crate::storage::Storage;

/// 根据未解决违规数量推导下一个校验状态
pub fn next_status(moderator_review: bool, unresolved_violations: u64) -> SubmissionStatus {
    match (moderator_review, unresolved_violations > 0) {
        (false, false) => SubmissionStatus::Validated,
        (false, true) => SubmissionStatus::Violated,
        (true, false) => SubmissionStatus::ModeratorValidated,
        (true, true) => SubmissionStatus::ModeratorViolated,
    }
}

/// 恰好一条评分记录时才允许自动进入 graded
pub fn should_auto_grade(assessment_count: u64) -> bool {
    assessment_count == 1
}

/// 按评分结构核对评分明细，返回合计分
///
/// 只允许出现评分结构里已有的 section/criterion（键名大小写不敏感）；
/// max_score 必须与评分结构一致；每项得分落在 [0, max_score]；
/// 合计分不得超过评分结构声明的总分上限。
pub fn validate_score_detail(detail: &ScoreDetail, rubric: &ScoreStructure) -> Result<f64> {
    let mut total = 0.0;

    for section in &detail.sections {
        let rubric_section = rubric
            .sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(&section.name))
            .ok_or_else(|| {
                ExamSubError::validation(format!("评分结构中不存在 section '{}'", section.name))
            })?;

        for criterion in &section.criteria {
            let rubric_criterion = rubric_section
                .criteria
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(&criterion.name))
                .ok_or_else(|| {
                    ExamSubError::validation(format!(
                        "section '{}' 中不存在 criterion '{}'",
                        section.name, criterion.name
                    ))
                })?;

            if criterion.max_score != rubric_criterion.max_score {
                return Err(ExamSubError::validation(format!(
                    "criterion '{}' 的满分 {} 与评分结构的 {} 不一致",
                    criterion.name, criterion.max_score, rubric_criterion.max_score
                )));
            }
            if criterion.score < 0.0 || criterion.score > rubric_criterion.max_score {
                return Err(ExamSubError::validation(format!(
                    "criterion '{}' 的得分 {} 超出 [0, {}]",
                    criterion.name, criterion.score, rubric_criterion.max_score
                )));
            }

            total += criterion.score;
        }
    }

    if total > rubric.total_max_score {
        return Err(ExamSubError::validation(format!(
            "合计分 {total} 超过评分结构声明的总分上限 {}",
            rubric.total_max_score
        )));
    }

    Ok(total)
}

/// 状态机落库的封装
pub struct LifecycleManager {
    storage: Arc<dyn Storage>,
}

impl LifecycleManager {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 按当前未解决违规数量落一次校验状态
    pub async fn apply_review(
        &self,
        submission_id: i64,
        moderator_review: bool,
    ) -> Result<SubmissionStatus> {
        let unresolved = self
            .storage
            .count_unresolved_violations(submission_id)
            .await?;
        let status = next_status(moderator_review, unresolved);

        self.storage
            .update_submission_status(submission_id, status)
            .await?;
        info!("提交 {} 校验状态更新为 {}", submission_id, status);

        Ok(status)
    }

    /// 唯一评分记录完成时自动把评分状态置为 graded
    ///
    /// 存在多条评分记录时保持 not_graded，由管理端显式裁决。
    pub async fn maybe_auto_grade(&self, submission_id: i64) -> Result<bool> {
        let count = self
            .storage
            .count_assessments_by_submission(submission_id)
            .await?;
        if !should_auto_grade(count) {
            info!(
                "提交 {} 有 {} 条评分记录，跳过自动评分状态转移",
                submission_id, count
            );
            return Ok(false);
        }

        self.storage
            .update_submission_grade_status(submission_id, GradeStatus::Graded)
            .await?;
        info!("提交 {} 评分状态自动更新为 graded", submission_id);
        Ok(true)
    }

    /// 考官首次打开评分记录时 pending → in_review
    ///
    /// 其余状态原样返回，重复打开不再转移。
    pub async fn open_assessment(&self, assessment_id: i64) -> Result<Assessment> {
        let mut assessment = self
            .storage
            .get_assessment_by_id(assessment_id)
            .await?
            .ok_or_else(|| ExamSubError::not_found(format!("评分记录 {assessment_id} 不存在")))?;

        if assessment.status == AssessmentStatus::Pending {
            self.storage
                .update_assessment_status(assessment_id, AssessmentStatus::InReview)
                .await?;
            assessment.status = AssessmentStatus::InReview;
            info!("评分记录 {} 进入评阅中", assessment_id);
        }

        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessments::requests::{ScoreDetailCriterion, ScoreDetailSection};
    use crate::models::exam_subjects::entities::{ScoreCriterion, ScoreSection};

    fn login_rubric() -> ScoreStructure {
        ScoreStructure {
            total_max_score: 5.0,
            sections: vec![ScoreSection {
                name: "Login".to_string(),
                criteria: vec![ScoreCriterion {
                    name: "validation".to_string(),
                    max_score: 5.0,
                }],
            }],
        }
    }

    fn detail(score: f64, max_score: f64) -> ScoreDetail {
        ScoreDetail {
            sections: vec![ScoreDetailSection {
                name: "login".to_string(),
                criteria: vec![ScoreDetailCriterion {
                    name: "Validation".to_string(),
                    score,
                    max_score,
                }],
            }],
        }
    }

    #[test]
    fn test_next_status_matrix() {
        assert_eq!(next_status(false, 0), SubmissionStatus::Validated);
        assert_eq!(next_status(false, 2), SubmissionStatus::Violated);
        assert_eq!(next_status(true, 0), SubmissionStatus::ModeratorValidated);
        assert_eq!(next_status(true, 1), SubmissionStatus::ModeratorViolated);
    }

    #[test]
    fn test_auto_grade_only_with_single_assessment() {
        assert!(should_auto_grade(1));
        assert!(!should_auto_grade(0));
        assert!(!should_auto_grade(2));
    }

    #[test]
    fn test_score_within_max_passes() {
        let total = validate_score_detail(&detail(5.0, 5.0), &login_rubric()).unwrap();
        assert_eq!(total, 5.0);
    }

    #[test]
    fn test_score_above_max_fails() {
        assert!(validate_score_detail(&detail(6.0, 5.0), &login_rubric()).is_err());
    }

    #[test]
    fn test_mismatched_max_score_fails() {
        assert!(validate_score_detail(&detail(3.0, 10.0), &login_rubric()).is_err());
    }

    #[test]
    fn test_unknown_criterion_fails() {
        let detail = ScoreDetail {
            sections: vec![ScoreDetailSection {
                name: "Login".to_string(),
                criteria: vec![ScoreDetailCriterion {
                    name: "nonexistent".to_string(),
                    score: 1.0,
                    max_score: 5.0,
                }],
            }],
        };
        assert!(validate_score_detail(&detail, &login_rubric()).is_err());
    }

    #[test]
    fn test_negative_score_fails() {
        assert!(validate_score_detail(&detail(-1.0, 5.0), &login_rubric()).is_err());
    }

    #[test]
    fn test_total_above_declared_max_fails() {
        let mut rubric = login_rubric();
        rubric.total_max_score = 4.0;
        assert!(validate_score_detail(&detail(5.0, 5.0), &rubric).is_err());
    }
}
