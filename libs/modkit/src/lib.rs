//! # ModKit - shared building blocks for Vollmed modules
//!
//! - [`api::problem`]: RFC 9457 Problem Details responses
//! - [`api::request_id`]: the `x-request-id` header and its extension type
//! - [`api::response`]: short helpers for JSON / empty responses
//! - [`paging`]: page requests parsed from `page`/`size`/`sort` and the page envelope
//! - [`shutdown`]: OS signal based shutdown future

pub use anyhow::Result;

pub mod api;
pub mod paging;
pub mod shutdown;

pub use api::problem::{Problem, ProblemResponse, ValidationError};
pub use api::request_id::XRequestId;
pub use paging::{Direction, Page, PageDto, PageParams, PageRequest, SortOrder};
