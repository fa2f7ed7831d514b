use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::IntakeService;

// 懒加载的全局 IntakeService 实例
static INTAKE_SERVICE: Lazy<IntakeService> = Lazy::new(IntakeService::new_lazy);

/// 上传触发参数
#[derive(Debug, serde::Deserialize)]
pub struct UploadQuery {
    pub examiner_id: Option<i64>,
    pub moderator_id: Option<i64>,
}

// 批量归档上传
pub async fn upload_batch_archive(
    request: HttpRequest,
    path: web::Path<i64>, // exam_subject_id
    query: web::Query<UploadQuery>,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    INTAKE_SERVICE
        .process_upload(
            &request,
            path.into_inner(),
            query.examiner_id,
            query.moderator_id,
            payload,
        )
        .await
}

// 配置路由
pub fn configure_intake_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exam-subjects/{exam_subject_id}/submissions")
            .route("/upload", web::post().to(upload_batch_archive)),
    );
}
