pub mod app_error;
pub mod password;
pub mod use_cases;
pub mod validators;
