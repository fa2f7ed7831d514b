//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Entity as Submissions};
use crate::errors::{ExamSubError, Result};
use crate::models::submissions::entities::{
    GradeStatus, NewSubmission, Submission, SubmissionStatus,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 批量创建提交
    ///
    /// 归档拆分器在所有分组处理完毕后统一落库，单事务提交：
    /// 要么整批写入，要么整批回滚。
    pub async fn create_submissions_batch_impl(
        &self,
        submissions: Vec<NewSubmission>,
    ) -> Result<Vec<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ExamSubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(submissions.len());
        for sub in submissions {
            let model = ActiveModel {
                exam_subject_id: Set(sub.exam_subject_id),
                examiner_id: Set(sub.examiner_id),
                moderator_id: Set(sub.moderator_id),
                student_name: Set(sub.student_name),
                file_url: Set(sub.file_url),
                status: Set(SubmissionStatus::Processing.to_string()),
                grade_status: Set(GradeStatus::NotGraded.to_string()),
                is_active: Set(true),
                assigned_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            let result = model
                .insert(&txn)
                .await
                .map_err(|e| ExamSubError::database_operation(format!("创建提交失败: {e}")))?;
            created.push(result.into_submission());
        }

        txn.commit()
            .await
            .map_err(|e| ExamSubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 更新提交校验状态
    pub async fn update_submission_status_impl(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<bool> {
        self.update_submission_fields(id, Some(status), None, None)
            .await
    }

    /// 更新提交评分状态
    pub async fn update_submission_grade_status_impl(
        &self,
        id: i64,
        status: GradeStatus,
    ) -> Result<bool> {
        self.update_submission_fields(id, None, Some(status), None)
            .await
    }

    /// 软删除提交
    pub async fn deactivate_submission_impl(&self, id: i64) -> Result<bool> {
        self.update_submission_fields(id, None, None, Some(false))
            .await
    }

    async fn update_submission_fields(
        &self,
        id: i64,
        status: Option<SubmissionStatus>,
        grade_status: Option<GradeStatus>,
        is_active: Option<bool>,
    ) -> Result<bool> {
        let existing = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询提交失败: {e}")))?;

        let Some(model) = existing else {
            return Ok(false);
        };

        let mut active: ActiveModel = model.into();
        if let Some(s) = status {
            active.status = Set(s.to_string());
        }
        if let Some(g) = grade_status {
            active.grade_status = Set(g.to_string());
        }
        if let Some(a) = is_active {
            active.is_active = Set(a);
        }
        active.updated_at = Set(chrono::Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("更新提交失败: {e}")))?;

        Ok(true)
    }
}
