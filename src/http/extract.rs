use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};

use crate::{errors::AppError, submission::RawSubmission};

/// Reads a submit request into a [`RawSubmission`].
///
/// Url-encoded and multipart bodies become form fields. Anything else is
/// kept as raw bytes for the JSON decoder. Body rejections keep axum's status,
/// so an oversized body is a 413 rather than a validation error.
pub struct Submission(pub RawSubmission);

impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::RequestRejected(e.status(), e.body_text()))?;

            return Ok(Submission(RawSubmission::from_form(
                read_multipart(multipart).await?,
            )));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::RequestRejected(e.status(), e.body_text()))?;

            return Ok(Submission(RawSubmission::from_form(pairs)));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::RequestRejected(e.status(), e.body_text()))?;

        Ok(Submission(RawSubmission::from_body(body)))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<Vec<(String, String)>, AppError> {
    let mut pairs = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::RequestRejected(e.status(), e.body_text()))?
    {
        // uploads are not part of a rating
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::RequestRejected(e.status(), e.body_text()))?;

        pairs.push((name, value));
    }

    Ok(pairs)
}
