use serde::Serialize;

/// 通知业务实体
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub is_read: bool,
    pub created_at: i64,
}

impl crate::entity::notifications::Model {
    pub fn into_notification(self) -> Notification {
        Notification {
            id: self.id,
            recipient_id: self.recipient_id,
            content: self.content,
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}
