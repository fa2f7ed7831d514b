use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::errors::ExamSubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::pipeline::LifecycleManager;

/// 获取评分记录详情
/// GET /assessments/{id}
///
/// 考官首次打开时评分记录由 pending 转入 in_review。
pub async fn get_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match LifecycleManager::new(storage)
        .open_assessment(assessment_id)
        .await
    {
        Ok(assessment) => Ok(HttpResponse::Ok().json(ApiResponse::success(assessment, "查询成功"))),
        Err(ExamSubError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::AssessmentNotFound, msg))),
        Err(e) => {
            tracing::error!("查询评分记录 {} 失败: {}", assessment_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询评分记录失败: {e}"),
                )),
            )
        }
    }
}
