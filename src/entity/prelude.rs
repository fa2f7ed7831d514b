pub use super::assessments::Entity as Assessments;
pub use super::exam_subjects::Entity as ExamSubjects;
pub use super::notifications::Entity as Notifications;
pub use super::submissions::Entity as Submissions;
pub use super::violations::Entity as Violations;
