use serde::{Deserialize, Serialize};

// 违规类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    WrongProjectStructure,      // 缺少约定的内层归档
    InvalidFormat,              // 归档格式非法
    MissingFile,                // 缺少必需文件
    IncorrectNamingConvention,  // 描述文件命名不符合模板
    KeyMismatch,                // 命中禁用关键字
    CompilationError,           // 编译校验失败
}

impl ViolationType {
    pub const WRONG_PROJECT_STRUCTURE: &'static str = "wrong_project_structure";
    pub const INVALID_FORMAT: &'static str = "invalid_format";
    pub const MISSING_FILE: &'static str = "missing_file";
    pub const INCORRECT_NAMING_CONVENTION: &'static str = "incorrect_naming_convention";
    pub const KEY_MISMATCH: &'static str = "key_mismatch";
    pub const COMPILATION_ERROR: &'static str = "compilation_error";
}

impl<'de> Deserialize<'de> for ViolationType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ViolationType::WrongProjectStructure => Self::WRONG_PROJECT_STRUCTURE,
            ViolationType::InvalidFormat => Self::INVALID_FORMAT,
            ViolationType::MissingFile => Self::MISSING_FILE,
            ViolationType::IncorrectNamingConvention => Self::INCORRECT_NAMING_CONVENTION,
            ViolationType::KeyMismatch => Self::KEY_MISMATCH,
            ViolationType::CompilationError => Self::COMPILATION_ERROR,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ViolationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::WRONG_PROJECT_STRUCTURE => Ok(ViolationType::WrongProjectStructure),
            Self::INVALID_FORMAT => Ok(ViolationType::InvalidFormat),
            Self::MISSING_FILE => Ok(ViolationType::MissingFile),
            Self::INCORRECT_NAMING_CONVENTION => Ok(ViolationType::IncorrectNamingConvention),
            Self::KEY_MISMATCH => Ok(ViolationType::KeyMismatch),
            Self::COMPILATION_ERROR => Ok(ViolationType::CompilationError),
            _ => Err(format!("无效的违规类型: '{s}'")),
        }
    }
}

/// 违规业务实体
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub id: i64,
    pub submission_id: i64,
    pub violation_type: ViolationType,
    pub description: String,
    pub resolved: bool,
    pub resolved_at: Option<i64>,
    pub created_at: i64,
}

impl crate::entity::violations::Model {
    /// 数据库实体转业务实体
    pub fn into_violation(self) -> Violation {
        Violation {
            id: self.id,
            submission_id: self.submission_id,
            violation_type: self
                .violation_type
                .parse()
                .unwrap_or(ViolationType::InvalidFormat),
            description: self.description,
            resolved: self.resolved,
            resolved_at: self.resolved_at,
            created_at: self.created_at,
        }
    }
}

/// 尚未落库的违规记录（规则引擎与编译校验的输出）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViolationRecord {
    pub violation_type: ViolationType,
    pub description: String,
}

impl ViolationRecord {
    pub fn new(violation_type: ViolationType, description: impl Into<String>) -> Self {
        Self {
            violation_type,
            description: description.into(),
        }
    }
}
