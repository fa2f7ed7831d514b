//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_examsub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ExamSubError {
            $($variant(String),)*
        }

        impl ExamSubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ExamSubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ExamSubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ExamSubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ExamSubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ExamSubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_examsub_errors! {
    Validation("E001", "Validation Error"),
    NotFound("E002", "Resource Not Found"),
    InvalidArchive("E003", "Invalid Archive"),
    ObjectStorage("E004", "Object Storage Error"),
    ProcessExecution("E005", "Process Execution Error"),
    ExternalTimeout("E006", "External Process Timeout"),
    InvalidOperation("E007", "Invalid Operation"),
    Configuration("E008", "Configuration Error"),
    ServiceUnavailable("E009", "Service Unavailable"),
    DatabaseConfig("E010", "Database Configuration Error"),
    DatabaseConnection("E011", "Database Connection Error"),
    DatabaseOperation("E012", "Database Operation Error"),
    FileOperation("E013", "File Operation Error"),
    Serialization("E014", "Serialization Error"),
    DateParse("E015", "Date Parse Error"),
}

impl ExamSubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ExamSubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ExamSubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ExamSubError {
    fn from(err: sea_orm::DbErr) -> Self {
        ExamSubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ExamSubError {
    fn from(err: std::io::Error) -> Self {
        ExamSubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ExamSubError {
    fn from(err: serde_json::Error) -> Self {
        ExamSubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ExamSubError {
    fn from(err: chrono::ParseError) -> Self {
        ExamSubError::DateParse(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExamSubError {
    fn from(err: zip::result::ZipError) -> Self {
        ExamSubError::InvalidArchive(err.to_string())
    }
}

impl From<reqwest::Error> for ExamSubError {
    fn from(err: reqwest::Error) -> Self {
        ExamSubError::ServiceUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExamSubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ExamSubError::validation("test").code(), "E001");
        assert_eq!(ExamSubError::invalid_archive("test").code(), "E003");
        assert_eq!(ExamSubError::external_timeout("test").code(), "E006");
        assert_eq!(ExamSubError::invalid_operation("test").code(), "E007");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ExamSubError::invalid_archive("test").error_type(),
            "Invalid Archive"
        );
        assert_eq!(
            ExamSubError::process_execution("test").error_type(),
            "Process Execution Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = ExamSubError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = ExamSubError::invalid_archive("path traversal");
        let formatted = err.format_simple();
        assert!(formatted.contains("Invalid Archive"));
        assert!(formatted.contains("path traversal"));
    }

    #[test]
    fn test_from_zip_error() {
        let err: ExamSubError = zip::result::ZipError::FileNotFound.into();
        assert_eq!(err.code(), "E003");
    }
}
