//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_subject_id: i64,
    pub examiner_id: Option<i64>,
    pub moderator_id: Option<i64>,
    pub student_name: String,
    #[sea_orm(column_type = "Text")]
    pub file_url: String,
    pub status: String,
    pub grade_status: String,
    pub is_active: bool,
    pub assigned_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exam_subjects::Entity",
        from = "Column::ExamSubjectId",
        to = "super::exam_subjects::Column::Id"
    )]
    ExamSubject,
    #[sea_orm(has_many = "super::violations::Entity")]
    Violations,
    #[sea_orm(has_many = "super::assessments::Entity")]
    Assessments,
}

impl Related<super::exam_subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamSubject.def()
    }
}

impl Related<super::violations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Violations.def()
    }
}

impl Related<super::assessments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
