pub mod codes;
pub mod parameter_error_handler;

pub use codes::normalize_code;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
