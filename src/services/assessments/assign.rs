use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::identity::ROLE_EXAMINER;
use crate::models::assessments::requests::AssignAssessmentRequest;
use crate::models::submissions::entities::GradeStatus;
use crate::models::{ApiResponse, ErrorCode};

/// 从归档 URL 推导评分记录缓存的提交名
///
/// 取路径最后一段去掉扩展名与查询串；取不到时退回学生名。
fn submission_name_from_url(file_url: &str, student_name: &str) -> String {
    file_url
        .split('?')
        .next()
        .and_then(|path| path.rsplit('/').next())
        .map(|name| name.trim_end_matches(".zip"))
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .unwrap_or_else(|| student_name.to_string())
}

/// 重新指派考官
/// POST /submissions/{id}/assessments
///
/// 新考官必须经外部身份服务确认持有考官角色；
/// 成功后新建一条 pending 评分记录并把评分状态置为 re_assigned。
pub async fn assign_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    submission_id: i64,
    req: AssignAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let identity = service.get_identity(request);

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

    match identity.has_role(req.examiner_id, ROLE_EXAMINER).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ExaminerRoleRequired,
                format!("用户 {} 不持有考官角色", req.examiner_id),
            )));
        }
        Err(e) => {
            tracing::error!("考官角色查询失败: {}", e);
            return Ok(
                HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                    ErrorCode::IdentityServiceUnavailable,
                    format!("身份服务不可用: {e}"),
                )),
            );
        }
    }

    let submission_name = submission_name_from_url(&submission.file_url, &submission.student_name);

    let assessment = match storage
        .create_assessment(submission_id, req.examiner_id, &submission_name)
        .await
    {
        Ok(assessment) => assessment,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("创建评分记录失败: {e}"),
                )),
            );
        }
    };

    if let Err(e) = storage
        .update_submission_grade_status(submission_id, GradeStatus::ReAssigned)
        .await
    {
        tracing::warn!("提交 {} 评分状态更新失败: {}", submission_id, e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(assessment, "考官已指派")))
}

#[cfg(test)]
mod tests {
    use super::submission_name_from_url;

    #[test]
    fn test_name_derived_from_archive_filename() {
        let url = "http://localhost:8080/api/v1/files/submissions/cs101/final/Alice.zip?token=abc";
        assert_eq!(submission_name_from_url(url, "fallback"), "Alice");
    }

    #[test]
    fn test_falls_back_to_student_name() {
        assert_eq!(submission_name_from_url("", "Alice"), "Alice");
    }
}
