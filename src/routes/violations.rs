use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::violations::requests::SaveViolationsRequest;
use crate::services::ViolationService;

// 懒加载的全局 ViolationService 实例
static VIOLATION_SERVICE: Lazy<ViolationService> = Lazy::new(ViolationService::new_lazy);

// 违规回报回调
pub async fn save_violations(
    request: HttpRequest,
    body: web::Json<SaveViolationsRequest>,
) -> ActixResult<HttpResponse> {
    VIOLATION_SERVICE
        .save_violations(&request, body.into_inner())
        .await
}

// 配置路由
pub fn configure_violations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/violations").route("/save", web::post().to(save_violations)),
    );
}
