pub mod assessments;
pub mod common;
pub mod exam_subjects;
pub mod notifications;
pub mod submissions;
pub mod violations;

pub use common::error_code::ErrorCode;
pub use common::response::ApiResponse;

/// 程序启动时间（注入到 app_data，用于运行时长统计）
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
