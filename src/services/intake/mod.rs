pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::pipeline::PipelineOrchestrator;

pub struct IntakeService {
    orchestrator: Option<Arc<PipelineOrchestrator>>,
}

impl IntakeService {
    pub fn new_lazy() -> Self {
        Self { orchestrator: None }
    }

    pub(crate) fn get_orchestrator(&self, request: &HttpRequest) -> Arc<PipelineOrchestrator> {
        if let Some(orchestrator) = &self.orchestrator {
            orchestrator.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<PipelineOrchestrator>>>()
                .expect("Orchestrator not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 处理批量归档上传
    pub async fn process_upload(
        &self,
        request: &HttpRequest,
        exam_subject_id: i64,
        examiner_id: Option<i64>,
        moderator_id: Option<i64>,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::process_upload(
            self,
            request,
            exam_subject_id,
            examiner_id,
            moderator_id,
            payload,
        )
        .await
    }
}
