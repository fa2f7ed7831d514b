//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assessments;
mod exam_subjects;
mod notifications;
mod submissions;
mod violations;

use crate::config::AppConfig;
use crate::errors::{ExamSubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ExamSubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ExamSubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| ExamSubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| ExamSubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ExamSubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    assessments::entities::{Assessment, AssessmentStatus},
    exam_subjects::entities::ExamSubject,
    notifications::entities::Notification,
    submissions::entities::{GradeStatus, NewSubmission, Submission, SubmissionStatus},
    violations::entities::{Violation, ViolationRecord},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 考试科目模块
    async fn get_exam_subject_by_id(&self, id: i64) -> Result<Option<ExamSubject>> {
        self.get_exam_subject_by_id_impl(id).await
    }

    // 提交模块
    async fn create_submissions_batch(
        &self,
        submissions: Vec<NewSubmission>,
    ) -> Result<Vec<Submission>> {
        self.create_submissions_batch_impl(submissions).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn update_submission_status(&self, id: i64, status: SubmissionStatus) -> Result<bool> {
        self.update_submission_status_impl(id, status).await
    }

    async fn update_submission_grade_status(&self, id: i64, status: GradeStatus) -> Result<bool> {
        self.update_submission_grade_status_impl(id, status).await
    }

    async fn deactivate_submission(&self, id: i64) -> Result<bool> {
        self.deactivate_submission_impl(id).await
    }

    // 违规模块
    async fn create_violations(
        &self,
        submission_id: i64,
        records: &[ViolationRecord],
    ) -> Result<Vec<Violation>> {
        self.create_violations_impl(submission_id, records).await
    }

    async fn list_violations_by_submission(&self, submission_id: i64) -> Result<Vec<Violation>> {
        self.list_violations_by_submission_impl(submission_id)
            .await
    }

    async fn count_unresolved_violations(&self, submission_id: i64) -> Result<u64> {
        self.count_unresolved_violations_impl(submission_id).await
    }

    // 评分模块
    async fn create_assessment(
        &self,
        submission_id: i64,
        examiner_id: i64,
        submission_name: &str,
    ) -> Result<Assessment> {
        self.create_assessment_impl(submission_id, examiner_id, submission_name)
            .await
    }

    async fn get_assessment_by_id(&self, id: i64) -> Result<Option<Assessment>> {
        self.get_assessment_by_id_impl(id).await
    }

    async fn list_assessments_by_submission(&self, submission_id: i64) -> Result<Vec<Assessment>> {
        self.list_assessments_by_submission_impl(submission_id)
            .await
    }

    async fn count_assessments_by_submission(&self, submission_id: i64) -> Result<u64> {
        self.count_assessments_by_submission_impl(submission_id)
            .await
    }

    async fn update_assessment_status(&self, id: i64, status: AssessmentStatus) -> Result<bool> {
        self.update_assessment_status_impl(id, status).await
    }

    async fn complete_assessment(
        &self,
        id: i64,
        score: f64,
        score_detail: &str,
        comment: Option<&str>,
    ) -> Result<Assessment> {
        self.complete_assessment_impl(id, score, score_detail, comment)
            .await
    }

    async fn approve_assessment(&self, assessment_id: i64, submission_id: i64) -> Result<()> {
        self.approve_assessment_impl(assessment_id, submission_id)
            .await
    }

    // 通知模块
    async fn create_notification(&self, recipient_id: i64, content: &str) -> Result<Notification> {
        self.create_notification_impl(recipient_id, content).await
    }
}
