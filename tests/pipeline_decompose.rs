//! 归档拆分器集成测试
//!
//! 用内存构造的批量归档 + 临时目录对象存储 + 内存 Storage 替身，
//! 验证拆分、重打包、上传与批量建档的端到端行为。

mod common;

use std::io::{Cursor, Read, Write};
use std::time::Duration;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use rust_examsub_next::blob::FsBlobStore;
use rust_examsub_next::models::exam_subjects::entities::ExamSubject;
use rust_examsub_next::models::submissions::entities::SubmissionStatus;
use rust_examsub_next::pipeline::{ArchiveDecomposer, ZIP_HAS_NO_FILES};

use common::MemStorage;

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (path, data) in entries {
        if path.ends_with('/') {
            writer
                .add_directory(path.trim_end_matches('/'), options)
                .unwrap();
        } else {
            writer.start_file(*path, options).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

// 不压缩直接存储，条目内容在字节流中原样可见，便于定点破坏
fn build_zip_stored(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (path, data) in entries {
        writer.start_file(*path, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn subject() -> ExamSubject {
    ExamSubject {
        id: 7,
        subject_code: "CS 101".to_string(),
        exam_code: "Final".to_string(),
        title: "期末考试".to_string(),
        score_structure: None,
        violation_rules: None,
        created_at: 0,
        updated_at: 0,
    }
}

fn setup(dir: &tempfile::TempDir) -> (std::sync::Arc<MemStorage>, ArchiveDecomposer) {
    let storage = std::sync::Arc::new(MemStorage::new());
    let blob = std::sync::Arc::new(FsBlobStore::new(
        dir.path(),
        "http://localhost:8080",
        "test-secret",
    ));
    let decomposer = ArchiveDecomposer::new(
        storage.clone(),
        blob,
        "submissions",
        Duration::from_secs(7 * 24 * 3600),
    );
    (storage, decomposer)
}

#[tokio::test]
async fn test_one_submission_per_case_insensitive_group() {
    let dir = tempfile::tempdir().unwrap();
    let (storage, decomposer) = setup(&dir);

    let batch = build_zip(&[
        ("Alice/solution.zip", b"alice-inner"),
        ("alice/notes.txt", b"merged into Alice"),
        ("Bob/solution.zip", b"bob-inner"),
    ]);

    let created = decomposer
        .decompose(&batch, &subject(), Some(11), None)
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    let names: Vec<&str> = created.iter().map(|c| c.student_name.as_str()).collect();
    assert!(names.contains(&"Alice"));
    assert!(names.contains(&"Bob"));

    let stored = storage.submissions.lock().unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|s| s.status == SubmissionStatus::Processing));
    assert!(stored.iter().all(|s| s.examiner_id == Some(11)));
    assert!(stored.iter().all(|s| s.file_url.contains("?token=")));
}

#[tokio::test]
async fn test_per_student_archive_has_top_segment_stripped() {
    let dir = tempfile::tempdir().unwrap();
    let (_storage, decomposer) = setup(&dir);

    let batch = build_zip(&[
        ("Alice/solution.zip", b"inner"),
        ("Alice/src/main.cs", b"code"),
    ]);
    let created = decomposer
        .decompose(&batch, &subject(), None, None)
        .await
        .unwrap();
    assert_eq!(created.len(), 1);

    // 上传的对象路径按规范化编码组织
    assert_eq!(created[0].blob_path, "cs-101/final/Alice.zip");
    let object = dir.path().join("submissions").join(&created[0].blob_path);
    let bytes = std::fs::read(object).unwrap();

    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["solution.zip", "src/main.cs"]);

    let mut inner = archive.by_name("solution.zip").unwrap();
    let mut content = Vec::new();
    inner.read_to_end(&mut content).unwrap();
    assert_eq!(content, b"inner");
}

#[tokio::test]
async fn test_directory_only_archive_fails_with_zero_submissions() {
    let dir = tempfile::tempdir().unwrap();
    let (storage, decomposer) = setup(&dir);

    let batch = build_zip(&[("Alice/", b""), ("Bob/empty/", b"")]);
    let err = decomposer
        .decompose(&batch, &subject(), None, None)
        .await
        .unwrap_err();

    assert_eq!(err.message(), ZIP_HAS_NO_FILES);
    assert!(storage.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_traversal_entry_aborts_whole_batch() {
    let dir = tempfile::tempdir().unwrap();
    let (storage, decomposer) = setup(&dir);

    let batch = build_zip(&[
        ("Alice/solution.zip", b"ok"),
        ("Bob/../escape.cs", b"bad"),
    ]);
    assert!(
        decomposer
            .decompose(&batch, &subject(), None, None)
            .await
            .is_err()
    );
    assert!(storage.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_entry_skips_only_its_group() {
    let dir = tempfile::tempdir().unwrap();
    let (storage, decomposer) = setup(&dir);

    let marker = b"ALICE-PAYLOAD-MARKER";
    let mut batch = build_zip_stored(&[
        ("Alice/solution.zip", marker.as_slice()),
        ("Bob/solution.zip", b"bob-data"),
    ]);

    // 翻转 Alice 条目的存储数据，读取时 CRC 校验失败
    let pos = batch
        .windows(marker.len())
        .position(|window| window == marker)
        .unwrap();
    batch[pos] ^= 0xFF;

    let created = decomposer
        .decompose(&batch, &subject(), None, None)
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].student_name, "Bob");
    let stored = storage.submissions.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].student_name, "Bob");
}
