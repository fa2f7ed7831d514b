use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::assessments::requests::AssignAssessmentRequest;
use crate::services::{AssessmentService, SubmissionService};

// 懒加载的全局服务实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static ASSESSMENT_SERVICE: Lazy<AssessmentService> = Lazy::new(AssessmentService::new_lazy);

// 获取提交详情
pub async fn get_submission(
    request: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&request, path.into_inner())
        .await
}

// 停用提交（软删除）
pub async fn deactivate_submission(
    request: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .deactivate_submission(&request, path.into_inner())
        .await
}

// 重新指派考官
pub async fn assign_assessment(
    request: HttpRequest,
    path: web::Path<i64>, // submission_id
    body: web::Json<AssignAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .assign_assessment(&request, path.into_inner(), body.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .route("/{id}", web::get().to(get_submission))
            .route("/{id}", web::delete().to(deactivate_submission))
            .route("/{id}/assessments", web::post().to(assign_assessment)),
    );
}
