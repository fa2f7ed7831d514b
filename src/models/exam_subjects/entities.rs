use serde::{Deserialize, Serialize};

use crate::errors::{ExamSubError, Result};

/// 考试科目业务实体
///
/// 评分结构与违规规则以 JSON 文本存储，在流水线边界解析为类型化配置；
/// 解析失败按配置错误处理，不作为提交违规。
#[derive(Debug, Clone, Serialize)]
pub struct ExamSubject {
    pub id: i64,
    pub subject_code: String,
    pub exam_code: String,
    pub title: String,
    pub score_structure: Option<String>,
    pub violation_rules: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl crate::entity::exam_subjects::Model {
    /// 数据库实体转业务实体
    pub fn into_exam_subject(self) -> ExamSubject {
        ExamSubject {
            id: self.id,
            subject_code: self.subject_code,
            exam_code: self.exam_code,
            title: self.title,
            score_structure: self.score_structure,
            violation_rules: self.violation_rules,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl ExamSubject {
    /// 解析评分结构（rubric）
    pub fn parse_score_structure(&self) -> Result<ScoreStructure> {
        let raw = self.score_structure.as_deref().ok_or_else(|| {
            ExamSubError::configuration(format!("考试科目 {} 未配置评分结构", self.id))
        })?;
        serde_json::from_str(raw).map_err(|e| {
            ExamSubError::configuration(format!("考试科目 {} 评分结构解析失败: {e}", self.id))
        })
    }

    /// 解析违规规则集
    pub fn parse_violation_rules(&self) -> Result<ViolationRuleSet> {
        let raw = self.violation_rules.as_deref().ok_or_else(|| {
            ExamSubError::configuration(format!("考试科目 {} 未配置违规规则", self.id))
        })?;
        serde_json::from_str(raw).map_err(|e| {
            ExamSubError::configuration(format!("考试科目 {} 违规规则解析失败: {e}", self.id))
        })
    }
}

// ============ 评分结构（rubric）============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreStructure {
    pub total_max_score: f64,
    pub sections: Vec<ScoreSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSection {
    pub name: String,
    pub criteria: Vec<ScoreCriterion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCriterion {
    pub name: String,
    pub max_score: f64,
}

// ============ 违规规则集 ============

/// 各规则相互独立，可单独开关；结构规则是后续所有规则的前置门槛。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationRuleSet {
    #[serde(default)]
    pub structure: Option<StructureRule>,
    #[serde(default)]
    pub keyword: Option<KeywordRule>,
    #[serde(default)]
    pub naming: Option<NamingRule>,
    #[serde(default)]
    pub compilation_check: bool,
}

/// 结构规则：约定的内层归档必须存在
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureRule {
    pub enabled: bool,
    /// 内层归档文件名，约定为 solution.zip
    #[serde(default = "default_solution_archive")]
    pub solution_archive: String,
}

fn default_solution_archive() -> String {
    "solution.zip".to_string()
}

/// 关键字规则：限定扩展名内全文扫描禁用关键字
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub enabled: bool,
    pub extensions: Vec<String>,
    pub keywords: Vec<KeywordEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    /// false 表示该关键字允许出现，扫描时跳过
    #[serde(default = "default_true")]
    pub disallowed: bool,
}

fn default_true() -> bool {
    true
}

/// 命名规则：内层归档根目录必须恰好有一个匹配模板的描述文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingRule {
    pub enabled: bool,
    /// 含 {StudentName} 占位符的模板，例如 "Exam_{StudentName}"
    pub template: String,
    /// 描述文件扩展名，例如 ".sln"
    #[serde(default = "default_descriptor_extension")]
    pub descriptor_extension: String,
}

fn default_descriptor_extension() -> String {
    ".sln".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_set_parses_with_defaults() {
        let raw = r#"{
            "structure": {"enabled": true},
            "keyword": {"enabled": true, "extensions": [".cs"], "keywords": [{"keyword": "Console.ReadLine"}]},
            "compilation_check": true
        }"#;
        let rules: ViolationRuleSet = serde_json::from_str(raw).unwrap();
        assert_eq!(
            rules.structure.as_ref().unwrap().solution_archive,
            "solution.zip"
        );
        assert!(rules.keyword.as_ref().unwrap().keywords[0].disallowed);
        assert!(rules.naming.is_none());
        assert!(rules.compilation_check);
    }

    #[test]
    fn test_score_structure_parses() {
        let raw = r#"{
            "total_max_score": 100,
            "sections": [
                {"name": "Login", "criteria": [{"name": "validation", "max_score": 5}]}
            ]
        }"#;
        let rubric: ScoreStructure = serde_json::from_str(raw).unwrap();
        assert_eq!(rubric.sections.len(), 1);
        assert_eq!(rubric.sections[0].criteria[0].max_score, 5.0);
    }
}
