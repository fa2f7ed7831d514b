//! 评分记录存储操作

use super::SeaOrmStorage;
use crate::entity::assessments::{ActiveModel, Column, Entity as Assessments};
use crate::entity::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions,
};
use crate::errors::{ExamSubError, Result};
use crate::models::assessments::entities::{Assessment, AssessmentStatus};
use crate::models::submissions::entities::GradeStatus;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建评分记录（指派考官，初始状态 Pending）
    pub async fn create_assessment_impl(
        &self,
        submission_id: i64,
        examiner_id: i64,
        submission_name: &str,
    ) -> Result<Assessment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            submission_id: Set(submission_id),
            examiner_id: Set(examiner_id),
            submission_name: Set(submission_name.to_string()),
            score: Set(None),
            score_detail: Set(None),
            comment: Set(None),
            status: Set(AssessmentStatus::Pending.to_string()),
            graded_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("创建评分记录失败: {e}")))?;

        Ok(result.into_assessment())
    }

    /// 通过 ID 获取评分记录
    pub async fn get_assessment_by_id_impl(&self, id: i64) -> Result<Option<Assessment>> {
        let result = Assessments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询评分记录失败: {e}")))?;

        Ok(result.map(|m| m.into_assessment()))
    }

    /// 列出提交的全部评分记录
    pub async fn list_assessments_by_submission_impl(
        &self,
        submission_id: i64,
    ) -> Result<Vec<Assessment>> {
        let results = Assessments::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询评分记录失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_assessment()).collect())
    }

    /// 统计提交的评分记录数量
    pub async fn count_assessments_by_submission_impl(&self, submission_id: i64) -> Result<u64> {
        Assessments::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .count(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("统计评分记录失败: {e}")))
    }

    /// 更新评分记录状态
    pub async fn update_assessment_status_impl(
        &self,
        id: i64,
        status: AssessmentStatus,
    ) -> Result<bool> {
        let existing = Assessments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询评分记录失败: {e}")))?;

        let Some(model) = existing else {
            return Ok(false);
        };

        let mut active: ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(chrono::Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("更新评分记录失败: {e}")))?;

        Ok(true)
    }

    /// 保存评分：写入分数、明细与评语，状态置为 Complete
    pub async fn complete_assessment_impl(
        &self,
        id: i64,
        score: f64,
        score_detail: &str,
        comment: Option<&str>,
    ) -> Result<Assessment> {
        let existing = Assessments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询评分记录失败: {e}")))?
            .ok_or_else(|| ExamSubError::not_found(format!("评分记录 {id} 不存在")))?;

        let now = chrono::Utc::now().timestamp();
        let mut active: ActiveModel = existing.into();
        active.score = Set(Some(score));
        active.score_detail = Set(Some(score_detail.to_string()));
        active.comment = Set(comment.map(|c| c.to_string()));
        active.status = Set(AssessmentStatus::Complete.to_string());
        active.graded_at = Set(Some(now));
        active.updated_at = Set(now);

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("保存评分失败: {e}")))?;

        Ok(result.into_assessment())
    }

    /// 批准评分
    ///
    /// 单事务内完成：提交评分状态置为 Approved，
    /// 同一提交的其余评分记录全部置为 Cancelled。
    pub async fn approve_assessment_impl(
        &self,
        assessment_id: i64,
        submission_id: i64,
    ) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ExamSubError::database_operation(format!("开启事务失败: {e}")))?;

        // 作废兄弟评分
        let siblings = Assessments::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .filter(Column::Id.ne(assessment_id))
            .all(&txn)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询兄弟评分失败: {e}")))?;

        for sibling in siblings {
            let mut active: ActiveModel = sibling.into();
            active.status = Set(AssessmentStatus::Cancelled.to_string());
            active.updated_at = Set(now);
            active
                .update(&txn)
                .await
                .map_err(|e| ExamSubError::database_operation(format!("作废评分失败: {e}")))?;
        }

        // 提交评分状态置为 Approved
        let submission = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| ExamSubError::not_found(format!("提交 {submission_id} 不存在")))?;

        let mut active: SubmissionActiveModel = submission.into();
        active.grade_status = Set(GradeStatus::Approved.to_string());
        active.updated_at = Set(now);
        active
            .update(&txn)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("更新提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ExamSubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(())
    }
}
