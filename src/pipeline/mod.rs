//! 提交接收与校验流水线核心
//!
//! 处理链：批量归档拆分 → 每学生归档上传与建档 →（每提交独立）
//! 规则引擎 + 可选编译校验 → 状态机落库 → 通知。
//! 单个分组或单个提交的失败不阻断批次，只有零成功才视为整体失败。

pub mod archive_path;
pub mod decomposer;
pub mod lifecycle;
pub mod orchestrator;
pub mod policy;
pub mod sandbox;

pub use decomposer::{ArchiveDecomposer, CreatedSubmission, ZIP_HAS_NO_FILES};
pub use lifecycle::LifecycleManager;
pub use orchestrator::PipelineOrchestrator;
pub use policy::PolicyEngine;
pub use sandbox::{BuildOutcome, BuildSandbox};
