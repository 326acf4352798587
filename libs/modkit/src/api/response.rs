use axum::{http::StatusCode, Json};

use crate::paging::PageDto;

/// Paginated JSON body.
pub type JsonPage<T> = Json<PageDto<T>>;

/// 204 No Content, the reply to a successful mutation.
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}
