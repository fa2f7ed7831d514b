use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建考试科目表
        manager
            .create_table(
                Table::create()
                    .table(ExamSubjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamSubjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExamSubjects::SubjectCode)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamSubjects::ExamCode).string().not_null())
                    .col(ColumnDef::new(ExamSubjects::Title).string().not_null())
                    .col(ColumnDef::new(ExamSubjects::ScoreStructure).text().null())
                    .col(ColumnDef::new(ExamSubjects::ViolationRules).text().null())
                    .col(
                        ColumnDef::new(ExamSubjects::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamSubjects::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::ExamSubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::ExaminerId).big_integer().null())
                    .col(
                        ColumnDef::new(Submissions::ModeratorId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::StudentName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::FileUrl).text().not_null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::GradeStatus).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Submissions::AssignedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Submissions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::ExamSubjectId)
                            .to(ExamSubjects::Table, ExamSubjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建违规记录表
        manager
            .create_table(
                Table::create()
                    .table(Violations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Violations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Violations::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Violations::ViolationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Violations::Description).text().not_null())
                    .col(
                        ColumnDef::new(Violations::Resolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Violations::ResolvedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Violations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Violations::Table, Violations::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建评分记录表
        manager
            .create_table(
                Table::create()
                    .table(Assessments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assessments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assessments::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::ExaminerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::SubmissionName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assessments::Score).double().null())
                    .col(ColumnDef::new(Assessments::ScoreDetail).text().null())
                    .col(ColumnDef::new(Assessments::Comment).text().null())
                    .col(ColumnDef::new(Assessments::Status).string().not_null())
                    .col(ColumnDef::new(Assessments::GradedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Assessments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assessments::Table, Assessments::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建通知表
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Notifications::RecipientId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 提交表索引：按考试科目与状态查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_exam_subject")
                    .table(Submissions::Table)
                    .col(Submissions::ExamSubjectId)
                    .to_owned(),
            )
            .await?;

        // 违规表索引：按提交查询未解决违规
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_violations_submission")
                    .table(Violations::Table)
                    .col(Violations::SubmissionId)
                    .to_owned(),
            )
            .await?;

        // 评分表索引：按提交查询所有评分
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assessments_submission")
                    .table(Assessments::Table)
                    .col(Assessments::SubmissionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assessments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Violations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamSubjects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ExamSubjects {
    Table,
    Id,
    SubjectCode,
    ExamCode,
    Title,
    ScoreStructure,
    ViolationRules,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    ExamSubjectId,
    ExaminerId,
    ModeratorId,
    StudentName,
    FileUrl,
    Status,
    GradeStatus,
    IsActive,
    AssignedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Violations {
    Table,
    Id,
    SubmissionId,
    ViolationType,
    Description,
    Resolved,
    ResolvedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Assessments {
    Table,
    Id,
    SubmissionId,
    ExaminerId,
    SubmissionName,
    Score,
    ScoreDetail,
    Comment,
    Status,
    GradedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    RecipientId,
    Content,
    IsRead,
    CreatedAt,
}
