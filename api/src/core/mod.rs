pub mod analysis_dump;
pub mod app_state;
pub mod http;
