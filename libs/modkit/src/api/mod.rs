//! HTTP API helpers shared by every REST module.

pub mod problem;
pub mod request_id;
pub mod response;

pub use problem::{Problem, ProblemResponse, ValidationError, APPLICATION_PROBLEM_JSON};
pub use request_id::XRequestId;
