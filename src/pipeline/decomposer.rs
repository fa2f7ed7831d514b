//! 归档拆分器
//!
//! 把考官上传的批量归档按顶层目录拆成每学生归档：
//! 顶层目录名即学生标识（大小写不敏感合并），条目路径去掉顶层段后
//! 重新打包、上传对象存储、签发 7 天读取 URL，并为每个分组建一条
//! status=processing 的提交记录。
//!
//! 单个分组失败（条目损坏、打包或上传出错）只记录日志并跳过；
//! 全部失败才返回整体错误。
//! 所有提交行在最后一个事务内批量落库。

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::blob::BlobStore;
use crate::errors::{ExamSubError, Result};
use crate::models::exam_subjects::entities::ExamSubject;
use crate::models::submissions::entities::NewSubmission;
use crate::pipeline::archive_path;
use crate::storage::Storage;
use crate::utils::codes::normalize_code;

/// 零分组成功时返回的整体失败消息
pub const ZIP_HAS_NO_FILES: &str = "Zip has no files.";

/// 拆分结果中的一条提交
#[derive(Debug, Clone)]
pub struct CreatedSubmission {
    pub id: i64,
    pub student_name: String,
    pub blob_path: String,
}

pub struct ArchiveDecomposer {
    storage: Arc<dyn Storage>,
    blob: Arc<dyn BlobStore>,
    container: String,
    sas_ttl: Duration,
}

// 分组键为小写顶层名，展示名保留首次出现的原始大小写；
// 条目只记 (去顶层段路径, 归档内索引)，内容在打包时才解压，
// 坏条目只拖垮所属分组
type EntryGroups = BTreeMap<String, (String, Vec<(String, usize)>)>;

impl ArchiveDecomposer {
    pub fn new(
        storage: Arc<dyn Storage>,
        blob: Arc<dyn BlobStore>,
        container: impl Into<String>,
        sas_ttl: Duration,
    ) -> Self {
        Self {
            storage,
            blob,
            container: container.into(),
            sas_ttl,
        }
    }

    /// 拆分批量归档并批量建档
    pub async fn decompose(
        &self,
        bytes: &[u8],
        subject: &ExamSubject,
        examiner_id: Option<i64>,
        moderator_id: Option<i64>,
    ) -> Result<Vec<CreatedSubmission>> {
        let groups = collect_groups(bytes)?;

        // 逐组打包上传，失败跳过
        let mut pending: Vec<(NewSubmission, String)> = Vec::new();
        for (student_name, entries) in groups.into_values() {
            match self
                .pack_and_upload(bytes, subject, &student_name, &entries)
                .await
            {
                Ok((file_url, blob_path)) => {
                    pending.push((
                        NewSubmission {
                            exam_subject_id: subject.id,
                            examiner_id,
                            moderator_id,
                            student_name: student_name.clone(),
                            file_url,
                        },
                        blob_path,
                    ));
                }
                Err(e) => {
                    warn!(
                        "跳过分组 '{}' (考试科目 {}): {}",
                        student_name, subject.id, e
                    );
                }
            }
        }

        if pending.is_empty() {
            return Err(ExamSubError::invalid_archive(ZIP_HAS_NO_FILES));
        }

        let (submissions, blob_paths): (Vec<_>, Vec<_>) = pending.into_iter().unzip();
        let created = self.storage.create_submissions_batch(submissions).await?;

        info!(
            "考试科目 {} 拆分完成，创建 {} 条提交",
            subject.id,
            created.len()
        );

        Ok(created
            .into_iter()
            .zip(blob_paths)
            .map(|(submission, blob_path)| CreatedSubmission {
                id: submission.id,
                student_name: submission.student_name,
                blob_path,
            })
            .collect())
    }

    /// 重新打包一个分组并上传，返回 (读取 URL, 对象路径)
    async fn pack_and_upload(
        &self,
        bytes: &[u8],
        subject: &ExamSubject,
        student_name: &str,
        entries: &[(String, usize)],
    ) -> Result<(String, String)> {
        let packed = pack_group(bytes, entries)?;
        let blob_path = format!(
            "{}/{}/{}.zip",
            normalize_code(&subject.subject_code),
            normalize_code(&subject.exam_code),
            student_name
        );

        self.blob
            .upload(packed, &blob_path, &self.container)
            .await?;
        let file_url = self
            .blob
            .get_read_sas_url(&self.container, &blob_path, self.sas_ttl)?;

        Ok((file_url, blob_path))
    }
}

/// 按大小写不敏感的顶层段分组，条目路径去掉顶层段
///
/// 只读中央目录里的条目名，不解压内容。任何条目规范化失败都
/// 中止整个批次；纯目录条目与根部游离文件被忽略。
fn collect_groups(bytes: &[u8]) -> Result<EntryGroups> {
    let archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut groups: EntryGroups = BTreeMap::new();

    for index in 0..archive.len() {
        let Some(raw) = archive.name_for_index(index) else {
            continue;
        };
        if raw.ends_with('/') || raw.ends_with('\\') {
            continue;
        }
        let path = archive_path::normalize(raw)?;
        if path.is_empty() {
            continue;
        }

        let Some((top, rest)) = path.split_once('/') else {
            // 不属于任何学生目录的根部文件，无法归属
            warn!("忽略批量归档根部的游离文件: '{path}'");
            continue;
        };
        if top.is_empty() || rest.is_empty() {
            continue;
        }

        groups
            .entry(top.to_lowercase())
            .or_insert_with(|| (top.to_string(), Vec::new()))
            .1
            .push((rest.to_string(), index));
    }

    Ok(groups)
}

/// 重新打包一个分组为新的 zip 字节流
///
/// 条目内容在这里才解压，损坏的条目只使本组失败。
fn pack_group(bytes: &[u8], entries: &[(String, usize)]) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, index) in entries {
        let mut entry = archive.by_index(*index)?;
        // 条目头声明的大小不可信，预分配设上限
        let mut data = Vec::with_capacity(entry.size().min(64 * 1024) as usize);
        entry.read_to_end(&mut data)?;
        writer.start_file(path, options)?;
        writer.write_all(&data)?;
    }

    Ok(writer.finish()?.into_inner())
}
