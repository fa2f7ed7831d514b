//! 违规记录存储操作

use super::SeaOrmStorage;
use crate::entity::violations::{ActiveModel, Column, Entity as Violations};
use crate::errors::{ExamSubError, Result};
use crate::models::violations::entities::{Violation, ViolationRecord};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量写入违规记录（单事务）
    pub async fn create_violations_impl(
        &self,
        submission_id: i64,
        records: &[ViolationRecord],
    ) -> Result<Vec<Violation>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ExamSubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(records.len());
        for record in records {
            let model = ActiveModel {
                submission_id: Set(submission_id),
                violation_type: Set(record.violation_type.to_string()),
                description: Set(record.description.clone()),
                resolved: Set(false),
                resolved_at: Set(None),
                created_at: Set(now),
                ..Default::default()
            };

            let result = model
                .insert(&txn)
                .await
                .map_err(|e| ExamSubError::database_operation(format!("写入违规失败: {e}")))?;
            created.push(result.into_violation());
        }

        txn.commit()
            .await
            .map_err(|e| ExamSubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    /// 列出提交的全部违规
    pub async fn list_violations_by_submission_impl(
        &self,
        submission_id: i64,
    ) -> Result<Vec<Violation>> {
        let results = Violations::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("查询违规失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_violation()).collect())
    }

    /// 统计未解决违规数量
    pub async fn count_unresolved_violations_impl(&self, submission_id: i64) -> Result<u64> {
        Violations::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .filter(Column::Resolved.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("统计违规失败: {e}")))
    }
}
