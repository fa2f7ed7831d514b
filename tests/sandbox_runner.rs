//! 构建沙箱集成测试
//!
//! 用可配置的工具链命令指向临时 shell 脚本，验证两阶段执行、
//! 超时强杀与工作区清理，不依赖真实的 dotnet 环境。

#![cfg(unix)]

use std::io::{Cursor, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::{Duration, Instant};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use rust_examsub_next::pipeline::{BuildOutcome, BuildSandbox};

fn project_archive() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("App.csproj", options).unwrap();
    writer.write_all(b"<Project />").unwrap();
    writer.start_file("Program.cs", options).unwrap();
    writer.write_all(b"class Program {}").unwrap();
    writer.finish().unwrap().into_inner()
}

fn fake_toolchain(dir: &Path, body: &str) -> String {
    let script = dir.join("toolchain.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_successful_two_phase_build() {
    let dir = tempfile::tempdir().unwrap();
    let toolchain = fake_toolchain(dir.path(), "echo phase $1; exit 0");
    let sandbox = BuildSandbox::new(
        toolchain,
        dir.path().join("ws"),
        Duration::from_secs(5),
        Duration::from_secs(5),
    );

    let outcome = sandbox.run(1, &project_archive()).await.unwrap();
    match outcome {
        BuildOutcome::Succeeded { stdout } => assert!(stdout.contains("phase build")),
        BuildOutcome::Failed { reason } => panic!("构建不应失败: {reason}"),
    }
}

#[tokio::test]
async fn test_nonzero_exit_reports_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let toolchain = fake_toolchain(dir.path(), "echo boom >&2; exit 1");
    let sandbox = BuildSandbox::new(
        toolchain,
        dir.path().join("ws"),
        Duration::from_secs(5),
        Duration::from_secs(5),
    );

    let outcome = sandbox.run(2, &project_archive()).await.unwrap();
    match outcome {
        BuildOutcome::Failed { reason } => assert!(reason.contains("boom")),
        BuildOutcome::Succeeded { .. } => panic!("非零退出码必须判为失败"),
    }
}

#[tokio::test]
async fn test_runaway_build_terminated_at_timeout() {
    let dir = tempfile::tempdir().unwrap();
    // restore 阶段无限等待，必须在超时边界被强杀
    let toolchain = fake_toolchain(dir.path(), "sleep 600");
    let sandbox = BuildSandbox::new(
        toolchain,
        dir.path().join("ws"),
        Duration::from_secs(1),
        Duration::from_secs(1),
    );

    let started = Instant::now();
    let outcome = sandbox.run(3, &project_archive()).await.unwrap();
    let elapsed = started.elapsed();

    assert!(!outcome.is_success());
    match outcome {
        BuildOutcome::Failed { reason } => assert!(reason.contains("终止")),
        BuildOutcome::Succeeded { .. } => unreachable!(),
    }
    // 超时后立刻返回，没有等满 sleep 时长
    assert!(elapsed < Duration::from_secs(10));
}

#[tokio::test]
async fn test_timeout_kills_entire_process_tree() {
    let dir = tempfile::tempdir().unwrap();
    let pidfile = dir.path().join("grandchild.pid");
    // 工具链脚本派生一个长眠孙进程并等待，超时强杀必须连孙进程一起清掉
    let body = format!("sleep 300 &\necho $! > {}\nwait", pidfile.display());
    let toolchain = fake_toolchain(dir.path(), &body);
    let sandbox = BuildSandbox::new(
        toolchain,
        dir.path().join("ws"),
        Duration::from_secs(1),
        Duration::from_secs(1),
    );

    let outcome = sandbox.run(6, &project_archive()).await.unwrap();
    assert!(!outcome.is_success());

    let pid: i32 = std::fs::read_to_string(&pidfile)
        .unwrap()
        .trim()
        .parse()
        .unwrap();

    // 给内核一点时间收尸
    let mut grandchild_gone = false;
    for _ in 0..20 {
        if !Path::new(&format!("/proc/{pid}")).exists() {
            grandchild_gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(grandchild_gone, "孙进程 {pid} 在超时强杀后仍然存活");
}

#[tokio::test]
async fn test_missing_manifest_is_reported_as_failure() {
    let dir = tempfile::tempdir().unwrap();
    let toolchain = fake_toolchain(dir.path(), "exit 0");
    let sandbox = BuildSandbox::new(
        toolchain,
        dir.path().join("ws"),
        Duration::from_secs(5),
        Duration::from_secs(5),
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("Program.cs", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"class Program {}").unwrap();
    let archive = writer.finish().unwrap().into_inner();

    let outcome = sandbox.run(4, &archive).await.unwrap();
    match outcome {
        BuildOutcome::Failed { reason } => assert!(reason.contains("构建清单")),
        BuildOutcome::Succeeded { .. } => panic!("缺少构建清单必须判为失败"),
    }
}

#[tokio::test]
async fn test_workspace_removed_after_run() {
    let dir = tempfile::tempdir().unwrap();
    let toolchain = fake_toolchain(dir.path(), "exit 0");
    let workspace_root = dir.path().join("ws");
    let sandbox = BuildSandbox::new(
        toolchain,
        workspace_root.clone(),
        Duration::from_secs(5),
        Duration::from_secs(5),
    );

    sandbox.run(5, &project_archive()).await.unwrap();
    assert!(!workspace_root.join("submission_5").exists());
}
