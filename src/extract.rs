use std::convert::Infallible;

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header,
};

use crate::{
    error::{AppError, AppResult},
    models::{InputError, MovieFields, MovieInput},
};

/// Add/edit submission decoded from either a urlencoded form or a JSON body.
///
/// Decoding never rejects the request; the handler decides when a bad body is
/// reported, so route checks such as an unknown id come first.
pub struct MovieForm(pub Result<MovieFields, InputError>);

impl MovieForm {
    pub fn fields(self, context: &'static str) -> AppResult<MovieFields> {
        self.0.map_err(|source| AppError::Invalid { context, source })
    }
}

impl<S> FromRequest<S> for MovieForm
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(decode(req, state).await.and_then(MovieInput::into_fields)))
    }
}

async fn decode<S>(req: Request, state: &S) -> Result<MovieInput, InputError>
where
    S: Send + Sync,
{
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        let Json(input) = Json::<MovieInput>::from_request(req, state)
            .await
            .map_err(|e| InputError::Body(e.body_text()))?;
        Ok(input)
    } else {
        let Form(input) = Form::<MovieInput>::from_request(req, state)
            .await
            .map_err(|e| InputError::Body(e.body_text()))?;
        Ok(input)
    }
}
