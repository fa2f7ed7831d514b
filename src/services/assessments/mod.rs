pub mod approve;
pub mod assign;
pub mod detail;
pub mod grade;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::identity::IdentityProvider;
use crate::models::assessments::requests::{AssignAssessmentRequest, GradeAssessmentRequest};
use crate::storage::Storage;

pub struct AssessmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssessmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_identity(&self, request: &HttpRequest) -> Arc<dyn IdentityProvider> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn IdentityProvider>>>()
            .expect("Identity provider not found in app data")
            .get_ref()
            .clone()
    }

    /// 获取评分记录详情（首次打开转入 in_review）
    pub async fn get_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assessment(self, request, assessment_id).await
    }

    /// 保存评分
    pub async fn grade_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
        req: GradeAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_assessment(self, request, assessment_id, req).await
    }

    /// 批准评分
    pub async fn approve_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        approve::approve_assessment(self, request, assessment_id).await
    }

    /// 重新指派考官
    pub async fn assign_assessment(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        req: AssignAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        assign::assign_assessment(self, request, submission_id, req).await
    }
}
