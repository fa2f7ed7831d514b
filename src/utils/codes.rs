//! 科目/考试编码规范化
//!
//! 编码会拼进对象存储路径，统一小写并把非字母数字字符折叠为连字符。

pub fn normalize_code(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_dash = true; // 抑制前导连字符

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_folds_separators() {
        assert_eq!(normalize_code("CS 101 / Final"), "cs-101-final");
    }

    #[test]
    fn test_trims_edge_separators() {
        assert_eq!(normalize_code("  Exam-2026  "), "exam-2026");
    }

    #[test]
    fn test_plain_code_unchanged() {
        assert_eq!(normalize_code("cs101"), "cs101");
    }
}
