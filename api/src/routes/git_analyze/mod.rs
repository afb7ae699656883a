pub mod git_analyze_request;
pub mod git_analyze_response;
pub mod git_analyze_route;
