//! 流水线编排器
//!
//! 两个触发入口：
//! - 上传处理：拆分批量归档后，为每条提交派生一个独立任务执行
//!   规则引擎与可选的编译校验，彼此失败隔离；上传调用在建档完成后
//!   即返回，后续校验异步进行。
//! - 违规回报回调：落库外部回报的违规并重新推导校验状态。
//!
//! 批次级取消通过 watch 信号广播；已完成提交的落库结果保持有效，
//! 不做兄弟回滚。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::blob::BlobStore;
use crate::config::AppConfig;
use crate::errors::{ExamSubError, Result};
use crate::models::exam_subjects::entities::{ExamSubject, ViolationRuleSet};
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::violations::entities::{ViolationRecord, ViolationType};
use crate::pipeline::decomposer::{ArchiveDecomposer, CreatedSubmission};
use crate::pipeline::lifecycle::LifecycleManager;
use crate::pipeline::policy::{self, PolicyEngine};
use crate::pipeline::sandbox::{BuildOutcome, BuildSandbox};
use crate::storage::Storage;

pub struct PipelineOrchestrator {
    storage: Arc<dyn Storage>,
    blob: Arc<dyn BlobStore>,
    sandbox: BuildSandbox,
    container: String,
    sas_ttl: Duration,
    cancel_tx: watch::Sender<bool>,
}

/// 派生任务共享的校验上下文
struct ValidationContext {
    storage: Arc<dyn Storage>,
    blob: Arc<dyn BlobStore>,
    sandbox: BuildSandbox,
    rules: ViolationRuleSet,
    container: String,
    notify_recipient: Option<i64>,
}

impl PipelineOrchestrator {
    pub fn new(storage: Arc<dyn Storage>, blob: Arc<dyn BlobStore>) -> Self {
        let config = AppConfig::get();
        Self::with_parts(
            storage,
            blob,
            BuildSandbox::from_config(),
            config.pipeline.submission_container.clone(),
            Duration::from_secs(config.storage.sas_ttl_secs),
        )
    }

    /// 按显式部件组装，不读全局配置
    pub fn with_parts(
        storage: Arc<dyn Storage>,
        blob: Arc<dyn BlobStore>,
        sandbox: BuildSandbox,
        container: impl Into<String>,
        sas_ttl: Duration,
    ) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            storage,
            blob,
            sandbox,
            container: container.into(),
            sas_ttl,
            cancel_tx,
        }
    }

    /// 广播批次取消信号；进行中的校验任务尽快停止
    pub fn cancel_inflight(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// 上传处理入口
    ///
    /// 拆分建档是同步完成的（≥1 分组成功即算成功），
    /// 每条提交的规则与编译校验在独立任务中异步执行。
    pub async fn process_upload(
        &self,
        exam_subject_id: i64,
        examiner_id: Option<i64>,
        moderator_id: Option<i64>,
        archive_bytes: Vec<u8>,
    ) -> Result<Vec<CreatedSubmission>> {
        let subject = self.load_subject(exam_subject_id).await?;
        let rules = subject.parse_violation_rules()?;

        let decomposer = ArchiveDecomposer::new(
            self.storage.clone(),
            self.blob.clone(),
            self.container.clone(),
            self.sas_ttl,
        );
        let created = decomposer
            .decompose(&archive_bytes, &subject, examiner_id, moderator_id)
            .await?;

        let context = Arc::new(ValidationContext {
            storage: self.storage.clone(),
            blob: self.blob.clone(),
            sandbox: self.sandbox.clone(),
            rules,
            container: self.container.clone(),
            notify_recipient: examiner_id,
        });

        // 每提交一个独立任务，互不阻塞
        for submission in &created {
            let context = context.clone();
            let submission = submission.clone();
            let cancel_rx = self.cancel_tx.subscribe();

            tokio::spawn(async move {
                let submission_id = submission.id;
                tokio::select! {
                    _ = cancelled(cancel_rx) => {
                        warn!("提交 {} 的校验被批次取消信号中断", submission_id);
                    }
                    result = validate_submission(context, submission) => {
                        if let Err(e) = result {
                            error!("提交 {} 校验失败: {}", submission_id, e);
                        }
                    }
                }
            });
        }

        Ok(created)
    }

    /// 违规回报回调入口
    ///
    /// 复核人回报时置 `moderator_review`，状态落入 moderator_* 分支。
    pub async fn report_violations(
        &self,
        submission_id: i64,
        records: &[ViolationRecord],
        moderator_review: bool,
    ) -> Result<SubmissionStatus> {
        self.storage
            .get_submission_by_id(submission_id)
            .await?
            .ok_or_else(|| ExamSubError::not_found(format!("提交 {submission_id} 不存在")))?;

        if !records.is_empty() {
            self.storage.create_violations(submission_id, records).await?;
        }

        LifecycleManager::new(self.storage.clone())
            .apply_review(submission_id, moderator_review)
            .await
    }

    async fn load_subject(&self, exam_subject_id: i64) -> Result<ExamSubject> {
        self.storage
            .get_exam_subject_by_id(exam_subject_id)
            .await?
            .ok_or_else(|| {
                ExamSubError::not_found(format!("考试科目 {exam_subject_id} 不存在"))
            })
    }
}

/// 等待取消信号翻转为 true
async fn cancelled(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            // 发送端已销毁，不会再有取消信号
            std::future::pending::<()>().await;
        }
    }
}

/// 单条提交的完整校验：规则引擎 → 可选编译校验 → 状态落库 → 通知
async fn validate_submission(
    ctx: Arc<ValidationContext>,
    submission: CreatedSubmission,
) -> Result<()> {
    let archive_bytes = ctx
        .blob
        .download(&submission.blob_path, &ctx.container)
        .await?;

    let mut records = PolicyEngine::evaluate(&archive_bytes, &ctx.rules)?;
    let structure_gated = records.iter().any(|r| {
        matches!(
            r.violation_type,
            ViolationType::WrongProjectStructure | ViolationType::InvalidFormat
        )
    });

    // 编译校验：构建失败折算为一条 CompilationError 违规，不是系统错误
    if ctx.rules.compilation_check && !structure_gated {
        match policy::extract_inner_archive(&archive_bytes, &ctx.rules)? {
            Some(inner) => {
                match ctx.sandbox.run(submission.id, &inner).await? {
                    BuildOutcome::Succeeded { .. } => {
                        info!("提交 {} 编译校验通过", submission.id);
                    }
                    BuildOutcome::Failed { reason } => {
                        records.push(ViolationRecord::new(
                            ViolationType::CompilationError,
                            reason,
                        ));
                    }
                }
            }
            None => {
                records.push(ViolationRecord::new(
                    ViolationType::CompilationError,
                    "缺少内层归档，无法执行编译校验".to_string(),
                ));
            }
        }
    }

    if !records.is_empty() {
        ctx.storage.create_violations(submission.id, &records).await?;
    }

    let status = LifecycleManager::new(ctx.storage.clone())
        .apply_review(submission.id, false)
        .await?;

    if let Some(recipient) = ctx.notify_recipient {
        let content = format!(
            "提交 {}（{}）校验完成，状态 {}，违规 {} 条",
            submission.id,
            submission.student_name,
            status,
            records.len()
        );
        if let Err(e) = ctx.storage.create_notification(recipient, &content).await {
            warn!("提交 {} 的通知写入失败: {}", submission.id, e);
        }
    }

    Ok(())
}
