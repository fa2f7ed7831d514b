//! 违规规则引擎
//!
//! 对单个学生归档执行规则集检查，产出零或多条违规记录。
//! 结构规则是门槛：约定的内层归档不存在时直接短路，
//! 其余规则都依赖内层归档的内容。关键字规则与命名规则相互独立，
//! 违规可以并存。

use std::io::{Cursor, Read};

use crate::errors::Result;
use crate::models::exam_subjects::entities::{KeywordRule, NamingRule, ViolationRuleSet};
use crate::models::violations::entities::{ViolationRecord, ViolationType};
use zip::ZipArchive;

pub struct PolicyEngine;

impl PolicyEngine {
    /// 评估一个学生归档，返回检出的违规
    ///
    /// 打不开学生归档本身是错误（由调用方按单提交失败处理），
    /// 规则命中则是正常返回的违规记录。
    pub fn evaluate(archive_bytes: &[u8], rules: &ViolationRuleSet) -> Result<Vec<ViolationRecord>> {
        let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;

        // 结构门槛：内层归档必须存在
        let solution_name = rules
            .structure
            .as_ref()
            .filter(|r| r.enabled)
            .map(|r| r.solution_archive.as_str());

        let inner_bytes = match find_inner_archive(
            &mut archive,
            solution_name.unwrap_or("solution.zip"),
        )? {
            Some(bytes) => bytes,
            None => {
                if let Some(name) = solution_name {
                    return Ok(vec![ViolationRecord::new(
                        ViolationType::WrongProjectStructure,
                        format!("归档根部缺少约定的内层归档 '{name}'"),
                    )]);
                }
                // 结构规则未启用且没有内层归档：后续规则无从评估
                return Ok(Vec::new());
            }
        };

        let mut inner = match ZipArchive::new(Cursor::new(inner_bytes)) {
            Ok(inner) => inner,
            Err(e) => {
                return Ok(vec![ViolationRecord::new(
                    ViolationType::InvalidFormat,
                    format!("内层归档无法解析: {e}"),
                )]);
            }
        };

        let mut violations = Vec::new();

        if let Some(rule) = rules.keyword.as_ref().filter(|r| r.enabled) {
            if let Some(record) = scan_keywords(&mut inner, rule)? {
                violations.push(record);
            }
        }

        if let Some(rule) = rules.naming.as_ref().filter(|r| r.enabled) {
            if let Some(record) = check_naming(&mut inner, rule) {
                violations.push(record);
            }
        }

        Ok(violations)
    }
}

/// 取出学生归档里的内层归档字节（编排器在编译校验前调用）
pub fn extract_inner_archive(
    archive_bytes: &[u8],
    rules: &ViolationRuleSet,
) -> Result<Option<Vec<u8>>> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
    let name = rules
        .structure
        .as_ref()
        .map(|r| r.solution_archive.as_str())
        .unwrap_or("solution.zip");
    find_inner_archive(&mut archive, name)
}

/// 在学生归档根部查找内层归档（文件名大小写不敏感），返回其字节
fn find_inner_archive(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<Vec<u8>>> {
    let wanted = name.to_lowercase();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        if entry.name().to_lowercase() == wanted {
            // 条目头声明的大小不可信，预分配设上限
            let mut bytes = Vec::with_capacity(entry.size().min(64 * 1024) as usize);
            entry.read_to_end(&mut bytes)?;
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}

/// 关键字全文扫描
///
/// 限定扩展名内大小写不敏感匹配；所有命中聚合为一条 KeyMismatch，
/// 描述中逐项列出 "keyword in file"。
fn scan_keywords(
    inner: &mut ZipArchive<Cursor<Vec<u8>>>,
    rule: &KeywordRule,
) -> Result<Option<ViolationRecord>> {
    let extensions: Vec<String> = rule.extensions.iter().map(|e| e.to_lowercase()).collect();
    let mut hits = Vec::new();

    for index in 0..inner.len() {
        let mut entry = inner.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let lowered_name = name.to_lowercase();
        if !extensions.iter().any(|ext| lowered_name.ends_with(ext)) {
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size().min(64 * 1024) as usize);
        entry.read_to_end(&mut bytes)?;
        // 二进制文件按 lossy UTF-8 看待，通常不会命中
        let content = String::from_utf8_lossy(&bytes).to_lowercase();

        for keyword in rule.keywords.iter().filter(|k| k.disallowed) {
            if content.contains(&keyword.keyword.to_lowercase()) {
                hits.push(format!("{} in {}", keyword.keyword, name));
            }
        }
    }

    if hits.is_empty() {
        return Ok(None);
    }
    Ok(Some(ViolationRecord::new(
        ViolationType::KeyMismatch,
        format!("命中禁用关键字: {}", hits.join(", ")),
    )))
}

/// 命名规则检查
///
/// 内层归档根部必须恰好有一个描述文件，文件名匹配含 {StudentName}
/// 占位符的模板。四种失败互斥，只报告首个命中的一种：
/// 缺少描述文件 / 描述文件多于一个 / 前后缀不匹配 / 学生名段为空。
fn check_naming(inner: &mut ZipArchive<Cursor<Vec<u8>>>, rule: &NamingRule) -> Option<ViolationRecord> {
    let extension = rule.descriptor_extension.to_lowercase();
    let descriptors: Vec<String> = inner
        .file_names()
        .filter(|name| !name.contains('/'))
        .filter(|name| name.to_lowercase().ends_with(&extension))
        .map(|name| name.to_string())
        .collect();

    let fail = |description: String| {
        Some(ViolationRecord::new(
            ViolationType::IncorrectNamingConvention,
            description,
        ))
    };

    let descriptor = match descriptors.as_slice() {
        [] => {
            return fail(format!(
                "内层归档根部缺少 '{}' 描述文件",
                rule.descriptor_extension
            ));
        }
        [single] => single,
        _ => {
            return fail(format!(
                "内层归档根部存在多个描述文件: {}",
                descriptors.join(", ")
            ));
        }
    };

    let stem = descriptor
        .strip_suffix(&rule.descriptor_extension)
        .or_else(|| descriptor.get(..descriptor.len() - extension.len()))
        .unwrap_or(descriptor);

    let (prefix, suffix) = match rule.template.split_once("{StudentName}") {
        Some(parts) => parts,
        // 模板没有占位符时整串视为前缀
        None => (rule.template.as_str(), ""),
    };

    if !stem.starts_with(prefix) || !stem.ends_with(suffix) {
        return fail(format!(
            "描述文件 '{descriptor}' 不符合命名模板 '{}{}'",
            rule.template, rule.descriptor_extension
        ));
    }

    // 前后缀在 stem 内重叠时学生名段同样为空，不能直接切片
    if stem.len() < prefix.len() + suffix.len()
        || stem[prefix.len()..stem.len() - suffix.len()].is_empty()
    {
        return fail(format!("描述文件 '{descriptor}' 的学生名段为空"));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use crate::models::exam_subjects::entities::{KeywordEntry, StructureRule};

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (path, data) in entries {
            writer.start_file(*path, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn student_archive(inner_entries: &[(&str, &[u8])]) -> Vec<u8> {
        let inner = build_zip(inner_entries);
        build_zip(&[("solution.zip", inner.as_slice())])
    }

    fn rules_with_structure() -> ViolationRuleSet {
        ViolationRuleSet {
            structure: Some(StructureRule {
                enabled: true,
                solution_archive: "solution.zip".to_string(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_solution_archive_short_circuits() {
        let mut rules = rules_with_structure();
        rules.keyword = Some(KeywordRule {
            enabled: true,
            extensions: vec![".cs".to_string()],
            keywords: vec![KeywordEntry {
                keyword: "Console.ReadLine".to_string(),
                disallowed: true,
            }],
        });

        // 没有 solution.zip，关键字规则不应执行
        let archive = build_zip(&[("Program.cs", b"Console.ReadLine();")]);
        let violations = PolicyEngine::evaluate(&archive, &rules).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].violation_type,
            ViolationType::WrongProjectStructure
        );
    }

    #[test]
    fn test_keyword_hits_aggregate_into_one_violation() {
        let mut rules = rules_with_structure();
        rules.keyword = Some(KeywordRule {
            enabled: true,
            extensions: vec![".cs".to_string()],
            keywords: vec![KeywordEntry {
                keyword: "Console.ReadLine".to_string(),
                disallowed: true,
            }],
        });

        let archive = student_archive(&[
            ("Program.cs", b"var x = Console.ReadLine();"),
            ("Helper.cs", b"console.readline()"),
            ("notes.txt", b"Console.ReadLine is fine here"),
        ]);
        let violations = PolicyEngine::evaluate(&archive, &rules).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::KeyMismatch);
        assert!(violations[0].description.contains("Program.cs"));
        assert!(violations[0].description.contains("Helper.cs"));
        assert!(!violations[0].description.contains("notes.txt"));
    }

    #[test]
    fn test_clean_submission_has_no_violations() {
        let mut rules = rules_with_structure();
        rules.keyword = Some(KeywordRule {
            enabled: true,
            extensions: vec![".cs".to_string()],
            keywords: vec![KeywordEntry {
                keyword: "Console.ReadLine".to_string(),
                disallowed: true,
            }],
        });

        let archive = student_archive(&[("Program.cs", b"var x = 1;")]);
        assert!(PolicyEngine::evaluate(&archive, &rules).unwrap().is_empty());
    }

    fn naming_rules(template: &str) -> ViolationRuleSet {
        let mut rules = rules_with_structure();
        rules.naming = Some(NamingRule {
            enabled: true,
            template: template.to_string(),
            descriptor_extension: ".sln".to_string(),
        });
        rules
    }

    #[test]
    fn test_naming_template_passes() {
        let archive = student_archive(&[("Exam_Alice.sln", b""), ("src/a.cs", b"x")]);
        let violations =
            PolicyEngine::evaluate(&archive, &naming_rules("Exam_{StudentName}")).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_naming_prefix_mismatch_fails() {
        let archive = student_archive(&[("ExamAlice.sln", b"")]);
        let violations =
            PolicyEngine::evaluate(&archive, &naming_rules("Exam_{StudentName}")).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].violation_type,
            ViolationType::IncorrectNamingConvention
        );
    }

    #[test]
    fn test_naming_empty_student_segment_fails() {
        let archive = student_archive(&[("Exam_.sln", b"")]);
        let violations =
            PolicyEngine::evaluate(&archive, &naming_rules("Exam_{StudentName}")).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].violation_type,
            ViolationType::IncorrectNamingConvention
        );
    }

    #[test]
    fn test_naming_overlapping_prefix_suffix_counts_as_empty_segment() {
        // "Exam_Exam" 同时满足前缀 "Exam_" 与后缀 "_Exam"，但两段重叠
        let archive = student_archive(&[("Exam_Exam.sln", b"")]);
        let violations =
            PolicyEngine::evaluate(&archive, &naming_rules("Exam_{StudentName}_Exam")).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].violation_type,
            ViolationType::IncorrectNamingConvention
        );
        assert!(violations[0].description.contains("学生名段为空"));
    }

    #[test]
    fn test_naming_reports_only_first_failure() {
        // 没有描述文件时只报缺失，不再报其他命名失败
        let archive = student_archive(&[("src/a.cs", b"x")]);
        let violations =
            PolicyEngine::evaluate(&archive, &naming_rules("Exam_{StudentName}")).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].description.contains("缺少"));
    }

    #[test]
    fn test_multiple_descriptors_fail() {
        let archive = student_archive(&[("Exam_Alice.sln", b""), ("Exam_Bob.sln", b"")]);
        let violations =
            PolicyEngine::evaluate(&archive, &naming_rules("Exam_{StudentName}")).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].description.contains("多个"));
    }

    #[test]
    fn test_keyword_and_naming_accumulate() {
        let mut rules = naming_rules("Exam_{StudentName}");
        rules.keyword = Some(KeywordRule {
            enabled: true,
            extensions: vec![".cs".to_string()],
            keywords: vec![KeywordEntry {
                keyword: "Console.ReadLine".to_string(),
                disallowed: true,
            }],
        });

        let archive = student_archive(&[
            ("ExamAlice.sln", b"".as_slice()),
            ("Program.cs", b"Console.ReadLine();".as_slice()),
        ]);
        let violations = PolicyEngine::evaluate(&archive, &rules).unwrap();
        assert_eq!(violations.len(), 2);
    }
}
