//! 归档条目路径规范化
//!
//! 归档内的条目路径来源不可信，统一在这里做一次规范化与越界检查。

use crate::errors::{ExamSubError, Result};

/// 规范化归档条目路径
///
/// 反斜杠转正斜杠，去掉前导斜杠与尾部目录标记；
/// 出现 `..` 段视为路径穿越，对整个批次归档致命。
pub fn normalize(raw: &str) -> Result<String> {
    let unified = raw.replace('\\', "/");
    let trimmed = unified.trim_start_matches('/').trim_end_matches('/');

    for segment in trimmed.split('/') {
        if segment == ".." {
            return Err(ExamSubError::invalid_archive(format!(
                "归档条目存在路径穿越: '{raw}'"
            )));
        }
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_converted() {
        assert_eq!(normalize(r"Alice\solution.zip").unwrap(), "Alice/solution.zip");
    }

    #[test]
    fn test_leading_slash_trimmed() {
        assert_eq!(normalize("/Alice/a.cs").unwrap(), "Alice/a.cs");
    }

    #[test]
    fn test_directory_marker_yields_bare_name() {
        assert_eq!(normalize("Alice/").unwrap(), "Alice");
        assert_eq!(normalize("/").unwrap(), "");
    }

    #[test]
    fn test_parent_segment_rejected() {
        assert!(normalize("Alice/../escape.cs").is_err());
        assert!(normalize(r"..\escape.cs").is_err());
    }

    #[test]
    fn test_plain_path_unchanged() {
        assert_eq!(normalize("Bob/src/main.cs").unwrap(), "Bob/src/main.cs");
    }
}
