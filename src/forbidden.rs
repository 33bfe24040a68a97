//! The page to display when a user requests data that belongs to someone else.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub struct ForbiddenError;

impl IntoResponse for ForbiddenError {
    fn into_response(self) -> Response {
        (
            StatusCode::FORBIDDEN,
            Html(
                error_view(
                    "Access Denied",
                    "403",
                    "Access denied.",
                    "You do not have permission to view or change this item.",
                )
                .into_string(),
            ),
        )
            .into_response()
    }
}
