use std::sync::Arc;

use crate::models::{
    assessments::entities::{Assessment, AssessmentStatus},
    exam_subjects::entities::ExamSubject,
    notifications::entities::Notification,
    submissions::entities::{GradeStatus, NewSubmission, Submission, SubmissionStatus},
    violations::entities::{Violation, ViolationRecord},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 考试科目方法
    // 通过ID获取考试科目（评分结构与违规规则的配置载体）
    async fn get_exam_subject_by_id(&self, id: i64) -> Result<Option<ExamSubject>>;

    /// 提交管理方法
    // 批量创建提交（归档拆分器的输出，单事务落库）
    async fn create_submissions_batch(
        &self,
        submissions: Vec<NewSubmission>,
    ) -> Result<Vec<Submission>>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 更新提交校验状态
    async fn update_submission_status(&self, id: i64, status: SubmissionStatus) -> Result<bool>;
    // 更新提交评分状态
    async fn update_submission_grade_status(&self, id: i64, status: GradeStatus) -> Result<bool>;
    // 软删除提交（不物理删除）
    async fn deactivate_submission(&self, id: i64) -> Result<bool>;

    /// 违规管理方法
    // 批量写入违规记录
    async fn create_violations(
        &self,
        submission_id: i64,
        records: &[ViolationRecord],
    ) -> Result<Vec<Violation>>;
    // 列出提交的全部违规
    async fn list_violations_by_submission(&self, submission_id: i64) -> Result<Vec<Violation>>;
    // 统计未解决违规数量（状态机转移的判定依据）
    async fn count_unresolved_violations(&self, submission_id: i64) -> Result<u64>;

    /// 评分管理方法
    // 创建评分记录（指派考官）
    async fn create_assessment(
        &self,
        submission_id: i64,
        examiner_id: i64,
        submission_name: &str,
    ) -> Result<Assessment>;
    // 通过ID获取评分记录
    async fn get_assessment_by_id(&self, id: i64) -> Result<Option<Assessment>>;
    // 列出提交的全部评分记录
    async fn list_assessments_by_submission(&self, submission_id: i64) -> Result<Vec<Assessment>>;
    // 统计提交的评分记录数量
    async fn count_assessments_by_submission(&self, submission_id: i64) -> Result<u64>;
    // 更新评分记录状态（Pending→InReview 等）
    async fn update_assessment_status(&self, id: i64, status: AssessmentStatus) -> Result<bool>;
    // 保存评分（分数、明细、评语，状态置为 Complete）
    async fn complete_assessment(
        &self,
        id: i64,
        score: f64,
        score_detail: &str,
        comment: Option<&str>,
    ) -> Result<Assessment>;
    // 批准评分：目标提交置为 Approved，其余兄弟评分全部作废（单事务）
    async fn approve_assessment(&self, assessment_id: i64, submission_id: i64) -> Result<()>;

    /// 通知方法
    // 写入通知
    async fn create_notification(&self, recipient_id: i64, content: &str) -> Result<Notification>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
