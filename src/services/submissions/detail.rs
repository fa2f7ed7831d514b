use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::submissions::responses::SubmissionDetailResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 获取提交详情
/// GET /submissions/{id}
///
/// 上传调用只返回建档结果，校验结论要通过这里（或通知）观察。
pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询提交失败: {e}"),
                )),
            );
        }
    };

    let violations = match storage.list_violations_by_submission(submission_id).await {
        Ok(violations) => violations,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询违规记录失败: {e}"),
                )),
            );
        }
    };

    let assessments = match storage.list_assessments_by_submission(submission_id).await {
        Ok(assessments) => assessments,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询评分记录失败: {e}"),
                )),
            );
        }
    };

    let response = SubmissionDetailResponse {
        submission,
        violations,
        assessments,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
