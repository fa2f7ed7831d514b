use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::models::assessments::requests::GradeAssessmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::pipeline::LifecycleManager;
use crate::pipeline::lifecycle::validate_score_detail;

/// 保存评分
/// POST /assessments/{id}/grade
///
/// 评分明细先按考试科目的评分结构核对，核对失败阻断保存；
/// 保存后若该提交只有这一条评分记录，评分状态自动置为 graded。
pub async fn grade_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment_id: i64,
    req: GradeAssessmentRequest,
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

    let submission = match storage.get_submission_by_id(assessment.submission_id).await {
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

    let subject = match storage
        .get_exam_subject_by_id(submission.exam_subject_id)
        .await
    {
        Ok(Some(subject)) => subject,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExamSubjectNotFound,
                "考试科目不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询考试科目失败: {e}"),
                )),
            );
        }
    };

    let rubric = match subject.parse_score_structure() {
        Ok(rubric) => rubric,
        Err(e) => {
            tracing::error!("考试科目 {} 评分结构不可用: {}", subject.id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "考试科目的评分结构配置不可用",
                )),
            );
        }
    };

    // 评分明细核对失败是致命校验错误，不产生违规
    let total = match validate_score_detail(&req.score_detail, &rubric) {
        Ok(total) => total,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ScoreValidationFailed,
                e.message().to_string(),
            )));
        }
    };

    let detail_json = match serde_json::to_string(&req.score_detail) {
        Ok(json) => json,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("评分明细序列化失败: {e}"),
                )),
            );
        }
    };

    let completed = match storage
        .complete_assessment(assessment_id, total, &detail_json, req.comment.as_deref())
        .await
    {
        Ok(completed) => completed,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("保存评分失败: {e}"),
                )),
            );
        }
    };

    if let Err(e) = LifecycleManager::new(storage)
        .maybe_auto_grade(assessment.submission_id)
        .await
    {
        tracing::warn!(
            "提交 {} 的自动评分状态转移失败: {}",
            assessment.submission_id,
            e
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(completed, "评分已保存")))
}
