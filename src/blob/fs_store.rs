//! 本地文件系统对象存储实现

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::blob::BlobStore;
use crate::blob::sas::SasSigner;
use crate::errors::{ExamSubError, Result};

/// 以本地目录为后端的对象存储
///
/// 对象按 `{root}/{container}/{path}` 存放；
/// 读取 URL 指向下载路由并附带 JWT 读取令牌。
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
    signer: SasSigner,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str, sas_secret: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            signer: SasSigner::new(sas_secret),
        }
    }

    pub fn signer(&self) -> &SasSigner {
        &self.signer
    }

    /// 拼出对象的磁盘路径，拒绝越界路径
    fn object_path(&self, container: &str, path: &str) -> Result<PathBuf> {
        for segment in path.split('/').chain(container.split('/')) {
            if segment == ".." {
                return Err(ExamSubError::validation(format!(
                    "对象路径非法: {container}/{path}"
                )));
            }
        }
        Ok(self.root.join(container).join(path))
    }

    fn object_url(&self, container: &str, path: &str) -> String {
        format!(
            "{}/api/v1/files/{container}/{path}",
            self.public_base_url
        )
    }
}

#[async_trait::async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(&self, bytes: Vec<u8>, path: &str, container: &str) -> Result<String> {
        let target = self.object_path(container, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExamSubError::object_storage(format!("创建存储目录失败: {e}")))?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| ExamSubError::object_storage(format!("写入对象失败: {e}")))?;

        Ok(self.object_url(container, path))
    }

    async fn download(&self, path: &str, container: &str) -> Result<Vec<u8>> {
        let target = self.object_path(container, path)?;
        if !Path::new(&target).exists() {
            return Err(ExamSubError::not_found(format!(
                "对象不存在: {container}/{path}"
            )));
        }

        tokio::fs::read(&target)
            .await
            .map_err(|e| ExamSubError::object_storage(format!("读取对象失败: {e}")))
    }

    fn get_read_sas_url(&self, container: &str, path: &str, ttl: Duration) -> Result<String> {
        let token = self.signer.issue_read_token(container, path, ttl)?;
        Ok(format!("{}?token={token}", self.object_url(container, path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_download_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost:8080", "secret");

        let url = store
            .upload(b"hello".to_vec(), "cs101/final/alice.zip", "submissions")
            .await
            .unwrap();
        assert!(url.ends_with("/api/v1/files/submissions/cs101/final/alice.zip"));

        let bytes = store
            .download("cs101/final/alice.zip", "submissions")
            .await
            .unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn test_download_missing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost:8080", "secret");

        assert!(store.download("nope.zip", "submissions").await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost:8080", "secret");

        assert!(
            store
                .upload(b"x".to_vec(), "../escape.zip", "submissions")
                .await
                .is_err()
        );
    }

    #[test]
    fn test_sas_url_contains_token() {
        let store = FsBlobStore::new("/tmp/blobs", "http://localhost:8080", "secret");
        let url = store
            .get_read_sas_url("submissions", "a.zip", Duration::from_secs(60))
            .unwrap();
        assert!(url.contains("?token="));
    }
}
