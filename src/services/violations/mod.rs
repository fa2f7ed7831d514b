pub mod save;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::violations::requests::SaveViolationsRequest;
use crate::pipeline::PipelineOrchestrator;

pub struct ViolationService {
    orchestrator: Option<Arc<PipelineOrchestrator>>,
}

impl ViolationService {
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

    /// 保存外部回报的违规
    pub async fn save_violations(
        &self,
        request: &HttpRequest,
        req: SaveViolationsRequest,
    ) -> ActixResult<HttpResponse> {
        save::save_violations(self, request, req).await
    }
}
