use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FileService;
use crate::blob::sas::SasSigner;
use crate::config::AppConfig;
use crate::errors::ExamSubError;
use crate::models::{ApiResponse, ErrorCode};

/// 归档下载
/// GET /files/{container}/{path}?token=
///
/// 令牌是签发时绑定容器与对象路径的带时限 JWT，
/// 过期、伪造或与请求对象不符都拒绝。
pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    container: String,
    path: String,
    token: String,
) -> ActixResult<HttpResponse> {
    let signer = SasSigner::new(&AppConfig::get().storage.sas_secret);
    if let Err(e) = signer.verify_read_token(&token, &container, &path) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::SasTokenInvalid,
            e.message().to_string(),
        )));
    }

    let blob = service.get_blob_store(request);
    let bytes = match blob.download(&path, &container).await {
        Ok(bytes) => bytes,
        Err(ExamSubError::NotFound(msg)) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::FileNotFound, msg)));
        }
        Err(e) => {
            tracing::error!("归档下载失败 {}/{}: {}", container, path, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::StorageUnavailable,
                    format!("归档读取失败: {e}"),
                )),
            );
        }
    };

    let filename = path.rsplit('/').next().unwrap_or("archive.zip");
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes))
}
