use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::models::assessments::entities::AssessmentStatus;
use crate::models::{ApiResponse, ErrorCode};

/// 批准评分
/// POST /assessments/{id}/approve
///
/// 目标评分必须已是 complete，否则拒绝且不改动任何评分状态；
/// 批准在单事务内完成：提交评分状态置为 approved，兄弟评分全部作废。
pub async fn approve_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let assessment = match storage.get_assessment_by_id(assessment_id).await {
        Ok(Some(assessment)) => assessment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssessmentNotFound,
                "评分记录不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询评分记录失败: {e}"),
                )),
            );
        }
    };

    if assessment.status != AssessmentStatus::Complete {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AssessmentNotComplete,
            format!("评分记录处于 {}，只有 complete 状态可以批准", assessment.status),
        )));
    }

    match storage
        .approve_assessment(assessment.id, assessment.submission_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("评分已批准"))),
        Err(e) => {
            tracing::error!("批准评分 {} 失败: {}", assessment_id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("批准评分失败: {e}"),
                )),
            )
        }
    }
}
