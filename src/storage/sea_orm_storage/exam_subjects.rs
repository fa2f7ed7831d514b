//! 考试科目存储操作

use super::SeaOrmStorage;
use crate::entity::exam_subjects::Entity as ExamSubjects;
use crate::errors::{ExamSubError, Result};
use crate::models::exam_subjects::entities::ExamSubject;
use sea_orm::EntityTrait;

impl SeaOrmStorage {
    /// 通过 ID 获取考试科目
    pub async fn get_exam_subject_by_id_impl(&self, id: i64) -> Result<Option<ExamSubject>> {
        let result = ExamSubjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询考试科目失败: {e}")))?;

        Ok(result.map(|m| m.into_exam_subject()))
    }
}
