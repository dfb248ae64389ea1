use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;

use crate::{
    errors::AppError,
    export::export_filename,
    http::extract::Submission,
    models::{Rating, RatingStats},
    ratings::{export_ratings_csv, get_stats, list_ratings, submit_rating},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct SubmitRatingResponse {
    pub success: bool,
    pub id: i32,
    pub beer: Rating,
}

pub async fn list_ratings_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Rating>>, (StatusCode, String)> {
    let ratings = list_ratings(state.ratings.as_ref()).await.map_err(|e| {
        tracing::error!("Error loading ratings: {}", e);
        e.to_response()
    })?;

    Ok(Json(ratings))
}

pub async fn submit_rating_handler(
    State(state): State<AppState>,
    Submission(submission): Submission,
) -> Result<Json<SubmitRatingResponse>, (StatusCode, String)> {
    match submit_rating(state.ratings.as_ref(), &submission).await {
        Ok(rating) => {
            tracing::info!("Saved beer rating with ID: {}", rating.id);
            Ok(Json(SubmitRatingResponse {
                success: true,
                id: rating.id,
                beer: rating,
            }))
        }
        Err(err @ AppError::InvalidSubmission(_)) => {
            tracing::warn!("Rejected beer rating: {}", err);
            Err(err.to_response())
        }
        Err(err) => {
            tracing::error!("Error saving beer rating: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<RatingStats>, (StatusCode, String)> {
    let stats = get_stats(state.ratings.as_ref()).await.map_err(|e| {
        tracing::error!("Error loading stats: {}", e);
        e.to_response()
    })?;

    Ok(Json(stats))
}

pub async fn export_ratings_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let csv = export_ratings_csv(state.ratings.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Error exporting ratings: {}", e);
            e.to_response()
        })?;

    let filename = export_filename(chrono::Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
