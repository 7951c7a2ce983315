use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

use crate::models::InputError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Movie not found.")]
    NotFound,

    #[error("{context}: {source}")]
    Invalid {
        context: &'static str,
        source: InputError,
    },

    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: DbErr,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Invalid { .. } | AppError::Store { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    msg: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store { context, source } => tracing::error!(error = %source, "{context}"),
            AppError::Invalid { context, source } => tracing::warn!(error = %source, "{context}"),
            AppError::NotFound => {}
        }
        (self.status(), Json(ErrorBody { msg: self.to_string() })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Attaches a route's failure message to a store error.
pub trait StoreContext<T> {
    fn context(self, context: &'static str) -> AppResult<T>;
}

impl<T> StoreContext<T> for Result<T, DbErr> {
    fn context(self, context: &'static str) -> AppResult<T> {
        self.map_err(|source| AppError::Store { context, source })
    }
}
