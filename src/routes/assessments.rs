use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::assessments::requests::GradeAssessmentRequest;
use crate::services::AssessmentService;

// 懒加载的全局 AssessmentService 实例
static ASSESSMENT_SERVICE: Lazy<AssessmentService> = Lazy::new(AssessmentService::new_lazy);

// 获取评分记录详情
pub async fn get_assessment(
    request: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .get_assessment(&request, path.into_inner())
        .await
}

// 保存评分
pub async fn grade_assessment(
    request: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<GradeAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .grade_assessment(&request, path.into_inner(), body.into_inner())
        .await
}

// 批准评分
pub async fn approve_assessment(
    request: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE
        .approve_assessment(&request, path.into_inner())
        .await
}

// 配置路由
pub fn configure_assessments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assessments")
            .route("/{id}", web::get().to(get_assessment))
            .route("/{id}/grade", web::post().to(grade_assessment))
            .route("/{id}/approve", web::post().to(approve_assessment)),
    );
}
