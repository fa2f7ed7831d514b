use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ViolationService;
use crate::errors::ExamSubError;
use crate::models::violations::requests::SaveViolationsRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 保存违规回调
/// POST /violations/save
///
/// 落库回报的违规并按未解决违规数量重新推导提交的校验状态。
pub async fn save_violations(
    service: &ViolationService,
    request: &HttpRequest,
    req: SaveViolationsRequest,
) -> ActixResult<HttpResponse> {
    let orchestrator = service.get_orchestrator(request);

    match orchestrator
        .report_violations(req.submission_id, &req.violations, req.moderator_review)
        .await
    {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status, "违规已记录"))),
        Err(ExamSubError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionNotFound, msg))),
        Err(e) => {
            tracing::error!("违规回调处理失败: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("违规保存失败: {e}"),
                )),
            )
        }
    }
}
