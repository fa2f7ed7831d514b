pub mod assessments;

pub mod files;

pub mod intake;

pub mod submissions;

pub mod violations;

pub use assessments::configure_assessments_routes;
pub use files::configure_file_routes;
pub use intake::configure_intake_routes;
pub use submissions::configure_submissions_routes;
pub use violations::configure_violations_routes;
