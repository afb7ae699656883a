pub mod git_analyze;
pub mod review;
