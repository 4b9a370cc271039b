use serde::Serialize;

pub mod content_route;
pub mod default_route;
pub mod draft_route;
pub mod refine_route;
pub mod research_route;

#[derive(Serialize)]
struct FailureResponse {
    success: bool,
    error: String,
}

impl FailureResponse {
    fn new(error: impl ToString) -> Self {
        FailureResponse {
            success: false,
            error: error.to_string(),
        }
    }
}
