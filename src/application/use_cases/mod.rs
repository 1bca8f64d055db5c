pub mod api_key;
pub mod proxy;
pub mod user;
