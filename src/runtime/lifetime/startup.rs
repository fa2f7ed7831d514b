use std::sync::Arc;

use tracing::warn;

use crate::blob::BlobStore;
use crate::identity::IdentityProvider;
use crate::pipeline::PipelineOrchestrator;
use crate::storage::Storage;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub blob_store: Arc<dyn BlobStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub orchestrator: Arc<PipelineOrchestrator>,
}

/// 准备服务器启动的上下文
/// 包括存储、对象存储、身份服务与流水线编排器
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    let blob_store = crate::blob::create_blob_store().expect("Failed to create blob store");
    warn!("Blob store initialized");

    let identity =
        crate::identity::create_identity_provider().expect("Failed to create identity provider");

    let orchestrator = Arc::new(PipelineOrchestrator::new(
        storage.clone(),
        blob_store.clone(),
    ));
    warn!("Pipeline orchestrator initialized");

    StartupContext {
        storage,
        blob_store,
        identity,
        orchestrator,
    }
}
