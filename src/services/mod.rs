pub mod assessments;
pub mod files;
pub mod intake;
pub mod submissions;
pub mod violations;

pub use assessments::AssessmentService;
pub use files::FileService;
pub use intake::IntakeService;
pub use submissions::SubmissionService;
pub use violations::ViolationService;
