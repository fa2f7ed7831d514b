use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::services::FileService;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

/// 下载令牌参数
#[derive(Debug, serde::Deserialize)]
pub struct FileTokenQuery {
    pub token: String,
}

// 归档下载（带时限读取令牌）
pub async fn handle_download(
    request: HttpRequest,
    path: web::Path<(String, String)>,
    query: web::Query<FileTokenQuery>,
) -> ActixResult<HttpResponse> {
    let (container, object_path) = path.into_inner();
    FILE_SERVICE
        .handle_download(&request, container, object_path, query.into_inner().token)
        .await
}

// 配置路由
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/files")
            .wrap(middleware::Compress::default())
            .route("/{container}/{path:.*}", web::get().to(handle_download)),
    );
}
