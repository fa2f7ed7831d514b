pub mod download;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::blob::BlobStore;

pub struct FileService {
    blob: Option<Arc<dyn BlobStore>>,
}

impl FileService {
    pub fn new_lazy() -> Self {
        Self { blob: None }
    }

    pub(crate) fn get_blob_store(&self, request: &HttpRequest) -> Arc<dyn BlobStore> {
        if let Some(blob) = &self.blob {
            blob.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn BlobStore>>>()
                .expect("Blob store not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 校验读取令牌并下载归档
    pub async fn handle_download(
        &self,
        request: &HttpRequest,
        container: String,
        path: String,
        token: String,
    ) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, container, path, token).await
    }
}
