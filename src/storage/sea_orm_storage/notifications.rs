//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::ActiveModel;
use crate::errors::{ExamSubError, Result};
use crate::models::notifications::entities::Notification;
use sea_orm::{ActiveModelTrait, Set};

impl SeaOrmStorage {
    /// 写入通知
    pub async fn create_notification_impl(
        &self,
        recipient_id: i64,
        content: &str,
    ) -> Result<Notification> {
        let model = ActiveModel {
            recipient_id: Set(recipient_id),
            content: Set(content.to_string()),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("写入通知失败: {e}")))?;

        Ok(result.into_notification())
    }
}
