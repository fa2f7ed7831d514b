use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;

use super::IntakeService;
use crate::config::AppConfig;
use crate::errors::ExamSubError;
use crate::models::submissions::responses::UploadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::pipeline::ZIP_HAS_NO_FILES;

/// 处理批量归档上传
/// POST /exam-subjects/{id}/submissions/upload
///
/// 只接受单个 zip 文件字段；拆分建档同步完成后即返回，
/// 规则与编译校验异步进行，结果通过提交详情或通知查询。
pub async fn process_upload(
    service: &IntakeService,
    request: &HttpRequest,
    exam_subject_id: i64,
    examiner_id: Option<i64>,
    moderator_id: Option<i64>,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let max_size = AppConfig::get().server.limits.max_payload_size;

    let mut archive_bytes: Vec<u8> = Vec::new();
    let mut file_received = false;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }
        if file_received {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::MultifileUploadNotAllowed,
                "一次只能上传一个批量归档",
            )));
        }
        file_received = true;

        let mut first_chunk = true;
        while let Some(chunk) = field.next().await {
            let data = chunk?;

            // 第一个 chunk 校验 zip 魔术字节
            if first_chunk {
                first_chunk = false;
                if !data.starts_with(b"PK") {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::InvalidArchive,
                        "上传内容不是 zip 归档",
                    )));
                }
            }

            if archive_bytes.len() + data.len() > max_size {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    "归档大小超出限制",
                )));
            }
            archive_bytes.extend_from_slice(&data);
        }
    }

    if !file_received || archive_bytes.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "上传载荷中没有文件字段",
        )));
    }

    let orchestrator = service.get_orchestrator(request);
    match orchestrator
        .process_upload(exam_subject_id, examiner_id, moderator_id, archive_bytes)
        .await
    {
        Ok(created) => {
            let response = UploadResponse {
                submission_ids: created.iter().map(|s| s.id).collect(),
                created: created.len(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "批量归档已受理")))
        }
        Err(ExamSubError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ExamSubjectNotFound, msg))),
        Err(ExamSubError::InvalidArchive(msg)) if msg == ZIP_HAS_NO_FILES => {
            Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ZipHasNoFiles, msg)))
        }
        Err(ExamSubError::InvalidArchive(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidArchive, msg))),
        Err(e) => {
            tracing::error!("批量上传处理失败: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UploadProcessingFailed,
                    format!("上传处理失败: {e}"),
                )),
            )
        }
    }
}
