//! 对象存储层
//!
//! 流水线将对象存储视为不透明的键值 blob 服务：
//! 上传、下载、签发带时限的读取 URL。生产实现为本地文件系统 +
//! JWT 读取令牌；云端对象存储可通过实现 `BlobStore` 接入。

mod fs_store;
pub mod sas;

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::Result;

pub use fs_store::FsBlobStore;

#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    // 上传字节流，返回对象 URL
    async fn upload(&self, bytes: Vec<u8>, path: &str, container: &str) -> Result<String>;
    // 下载对象字节流
    async fn download(&self, path: &str, container: &str) -> Result<Vec<u8>>;
    // 签发带时限的读取 URL
    fn get_read_sas_url(&self, container: &str, path: &str, ttl: Duration) -> Result<String>;
}

pub fn create_blob_store() -> Result<Arc<dyn BlobStore>> {
    let config = AppConfig::get();
    let store = FsBlobStore::new(
        &config.storage.root,
        &config.storage.public_base_url,
        &config.storage.sas_secret,
    );
    Ok(Arc::new(store))
}
