//! 构建沙箱运行器
//!
//! 在提交专属的工作区内执行两阶段外部构建（依赖还原、编译），
//! 每阶段独立硬超时。超时或取消时按进程组强制终止并收尸，
//! 不允许遗留孤儿进程。工作区与依赖缓存目录都按提交 ID 派生，
//! 允许并发构建互不干扰；运行结束后尽力删除。

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::config::AppConfig;
use crate::errors::{ExamSubError, Result};
use crate::pipeline::archive_path;

/// 构建结果
///
/// 失败（含超时与缺少构建清单）是正常返回值，由编排器转换为
/// CompilationError 违规；只有沙箱自身故障才走错误通道。
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Succeeded { stdout: String },
    Failed { reason: String },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Succeeded { .. })
    }
}

/// 单阶段执行结果
enum PhaseOutcome {
    Completed { stdout: String },
    Failed { stderr: String },
    TimedOut,
}

#[derive(Clone)]
pub struct BuildSandbox {
    toolchain: String,
    workspace_root: PathBuf,
    restore_timeout: Duration,
    build_timeout: Duration,
}

impl BuildSandbox {
    pub fn new(
        toolchain: impl Into<String>,
        workspace_root: impl Into<PathBuf>,
        restore_timeout: Duration,
        build_timeout: Duration,
    ) -> Self {
        Self {
            toolchain: toolchain.into(),
            workspace_root: workspace_root.into(),
            restore_timeout,
            build_timeout,
        }
    }

    pub fn from_config() -> Self {
        let config = AppConfig::get();
        Self::new(
            &config.pipeline.toolchain,
            &config.pipeline.workspace_root,
            Duration::from_secs(config.pipeline.restore_timeout_secs),
            Duration::from_secs(config.pipeline.build_timeout_secs),
        )
    }

    /// 解包内层归档并执行 还原 → 构建
    ///
    /// 无论结果如何，工作区都会尽力清理。
    pub async fn run(&self, submission_id: i64, inner_archive: &[u8]) -> Result<BuildOutcome> {
        let workspace = self.workspace_root.join(format!("submission_{submission_id}"));
        let package_cache = workspace.join(".packages");

        let outcome = self
            .run_in_workspace(&workspace, &package_cache, inner_archive)
            .await;

        if let Err(e) = tokio::fs::remove_dir_all(&workspace).await {
            warn!("清理工作区 {} 失败: {}", workspace.display(), e);
        }

        outcome
    }

    async fn run_in_workspace(
        &self,
        workspace: &Path,
        package_cache: &Path,
        inner_archive: &[u8],
    ) -> Result<BuildOutcome> {
        extract_archive(inner_archive, workspace).await?;
        tokio::fs::create_dir_all(package_cache).await?;

        if !has_build_manifest(workspace).await? {
            return Ok(BuildOutcome::Failed {
                reason: "工作区内未找到构建清单 (.sln / .csproj)".to_string(),
            });
        }

        // 阶段一：依赖还原
        debug!("工作区 {} 进入还原阶段", workspace.display());
        match self
            .run_phase("restore", workspace, package_cache, self.restore_timeout)
            .await?
        {
            PhaseOutcome::TimedOut => {
                return Ok(BuildOutcome::Failed {
                    reason: format!(
                        "依赖还原超过 {} 秒被终止",
                        self.restore_timeout.as_secs()
                    ),
                });
            }
            PhaseOutcome::Failed { stderr } => {
                return Ok(BuildOutcome::Failed {
                    reason: format!("依赖还原失败: {stderr}"),
                });
            }
            PhaseOutcome::Completed { .. } => {}
        }

        // 阶段二：构建
        debug!("工作区 {} 进入构建阶段", workspace.display());
        match self
            .run_phase("build", workspace, package_cache, self.build_timeout)
            .await?
        {
            PhaseOutcome::TimedOut => Ok(BuildOutcome::Failed {
                reason: format!("构建超过 {} 秒被终止", self.build_timeout.as_secs()),
            }),
            PhaseOutcome::Failed { stderr } => Ok(BuildOutcome::Failed {
                reason: format!("构建失败: {stderr}"),
            }),
            PhaseOutcome::Completed { stdout } => Ok(BuildOutcome::Succeeded { stdout }),
        }
    }

    /// 执行单个工具链阶段，硬超时后 start_kill 并收尸
    async fn run_phase(
        &self,
        phase: &str,
        workspace: &Path,
        package_cache: &Path,
        deadline: Duration,
    ) -> Result<PhaseOutcome> {
        let mut command = Command::new(&self.toolchain);
        command
            .arg(phase)
            .current_dir(workspace)
            .env("NUGET_PACKAGES", package_cache)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // 子进程放进独立进程组，超时可整组强杀
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|e| {
            ExamSubError::process_execution(format!(
                "启动 '{} {phase}' 失败: {e}",
                self.toolchain
            ))
        })?;

        // 先把输出管道接走，避免子进程因管道写满而卡死
        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();
        let stdout_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(pipe) = stdout_pipe.as_mut() {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        });
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            if let Some(pipe) = stderr_pipe.as_mut() {
                let _ = pipe.read_to_string(&mut buf).await;
            }
            buf
        });

        let status = match timeout(deadline, child.wait()).await {
            Ok(status) => status.map_err(|e| {
                ExamSubError::process_execution(format!("等待 '{phase}' 阶段失败: {e}"))
            })?,
            Err(_) => {
                // 超时：整组强杀并收尸，绝不留下孤儿进程
                kill_process_tree(&mut child, phase).await;
                stdout_task.abort();
                stderr_task.abort();
                return Ok(PhaseOutcome::TimedOut);
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Ok(PhaseOutcome::Failed {
                stderr: detail.trim().to_string(),
            });
        }

        Ok(PhaseOutcome::Completed { stdout })
    }
}

/// 强杀子进程及其整个进程组，然后收尸
async fn kill_process_tree(child: &mut tokio::process::Child, phase: &str) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // spawn 时 process_group(0)，进程组号即子进程 pid
        unsafe {
            libc::kill(-(pid as i32), libc::SIGKILL);
        }
    }
    if let Err(e) = child.start_kill() {
        warn!("终止超时的 '{phase}' 进程失败: {e}");
    }
    let _ = child.wait().await;
}

/// 把内层归档解包到工作区，路径统一走规范化检查
///
/// zip 条目读取器借用归档且非 Send，先同步读完全部条目再异步写盘。
async fn extract_archive(bytes: &[u8], workspace: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut files: Vec<(String, Vec<u8>)> = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let path = archive_path::normalize(entry.name())?;
        if entry.is_dir() || path.is_empty() {
            continue;
        }

        // 条目头声明的大小不可信，预分配设上限
        let mut data = Vec::with_capacity(entry.size().min(64 * 1024) as usize);
        entry.read_to_end(&mut data)?;
        files.push((path, data));
    }
    drop(archive);

    tokio::fs::create_dir_all(workspace).await?;
    for (path, data) in files {
        let target = workspace.join(&path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, data).await?;
    }

    Ok(())
}

/// 工作区内是否存在 .sln 或 .csproj 构建清单
async fn has_build_manifest(workspace: &Path) -> Result<bool> {
    let mut pending = vec![workspace.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let name = entry.file_name();
            let name = name.to_string_lossy().to_lowercase();
            if name.ends_with(".sln") || name.ends_with(".csproj") {
                return Ok(true);
            }
        }
    }

    Ok(false)
}
