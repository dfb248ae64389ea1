use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use beer_rate::{
    build_router,
    config::Config,
    db::{MemoryRatingStore, RatingStore},
    errors::AppError,
    models::{NO_RATINGS_YET, NewRating, Rating, RatingStats},
    state::AppState,
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

/// Store double whose medium is always down.
struct UnavailableStore;

#[async_trait]
impl RatingStore for UnavailableStore {
    async fn insert(&self, _rating: NewRating) -> Result<Rating, AppError> {
        Err(AppError::StorageFailure("connection refused".into()))
    }

    async fn list_all(&self) -> Result<Vec<Rating>, AppError> {
        Err(AppError::StorageFailure("connection refused".into()))
    }
}

/// Store double that blows up mid-request.
struct PanickingStore;

#[async_trait]
impl RatingStore for PanickingStore {
    async fn insert(&self, _rating: NewRating) -> Result<Rating, AppError> {
        panic!("insert exploded");
    }

    async fn list_all(&self) -> Result<Vec<Rating>, AppError> {
        panic!("list_all exploded");
    }
}

fn setup_app(store: Arc<dyn RatingStore>) -> Router {
    build_router(AppState::new(store), &Config::default()).unwrap()
}

fn memory_app() -> Router {
    setup_app(Arc::new(MemoryRatingStore::new()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ratings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ratings")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

async fn body_json(body: Body) -> Value {
    serde_json::from_str(&body_text(body).await).expect("Should parse JSON")
}

async fn submit(app: &Router, request: Request<Body>) -> Value {
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response.into_body()).await
}

async fn list(app: &Router) -> Vec<Value> {
    let response = app.clone().oneshot(get("/api/ratings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response.into_body())
        .await
        .as_array()
        .cloned()
        .expect("list should be an array")
}

#[tokio::test]
async fn test_list_starts_empty() {
    let app = memory_app();

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_submit_form_and_list_newest_first() {
    let app = memory_app();

    let first = submit(
        &app,
        post_form("BeerName=Pliny+the+Elder&Style=IPA&Notes=Russian+River&Rating=4"),
    )
    .await;
    assert_eq!(first["success"], true);
    assert_eq!(first["id"], 1);
    assert_eq!(
        first["beer"],
        json!({
            "id": 1,
            "beerName": "Pliny the Elder",
            "brewery": "Russian River",
            "style": "IPA",
            "rating": 4
        })
    );

    let second = submit(
        &app,
        post_json(json!({"beerName": "Guinness", "style": "Stout", "rating": 3})),
    )
    .await;
    assert!(second["id"].as_i64().unwrap() > first["id"].as_i64().unwrap());

    let ratings = list(&app).await;
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0], second["beer"]);
    assert_eq!(ratings[1], first["beer"]);
}

#[tokio::test]
async fn test_submit_multipart_form() {
    let app = memory_app();
    let boundary = "beerboundary";
    let mut body = String::new();
    for (name, value) in [
        ("BeerName", "Orval"),
        ("Style", "Trappist"),
        ("Rating", "4"),
        ("Notes", "Abbaye d'Orval"),
    ] {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/ratings")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let created = submit(&app, request).await;

    assert_eq!(created["beer"]["beerName"], "Orval");
    assert_eq!(created["beer"]["brewery"], "Abbaye d'Orval");
    assert_eq!(created["beer"]["rating"], 4);
}

#[tokio::test]
async fn test_json_without_content_type() {
    let app = memory_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/ratings")
        .body(Body::from(r#"{"BEERNAME": "Duvel", "rating": 2}"#))
        .unwrap();

    let created = submit(&app, request).await;

    assert_eq!(created["beer"]["beerName"], "Duvel");
    assert_eq!(created["beer"]["style"], "");
}

#[tokio::test]
async fn test_invalid_submissions_are_rejected() {
    let app = memory_app();

    for request in [
        post_form("Style=IPA&Rating=4"),
        post_form("BeerName=Guinness&Rating=abc"),
        post_json(json!({"beerName": "Guinness"})),
        post_json(json!({"style": "IPA", "rating": 4})),
        Request::builder()
            .method("POST")
            .uri("/api/ratings")
            .body(Body::empty())
            .unwrap(),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response.into_body()).await.starts_with("Invalid data"));
    }

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_out_of_range_rating_is_stored() {
    let app = memory_app();

    let created = submit(&app, post_form("BeerName=Eleven&Rating=7")).await;

    assert_eq!(created["beer"]["rating"], 7);
    assert_eq!(list(&app).await[0]["rating"], 7);
}

#[tokio::test]
async fn test_stats() {
    let app = memory_app();

    let response = app.clone().oneshot(get("/api/ratings/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({
            "totalBeers": 0,
            "mostPopularStyle": "No ratings yet",
            "mostRatedBrewery": "No ratings yet",
            "ratingCounts": {}
        })
    );

    for (style, notes, value) in [
        ("IPA", "Bell's", 1),
        ("IPA", "Bell's", 1),
        ("Stout", "Guinness", 2),
        ("IPA", "Guinness", 4),
        ("Stout", "Bell's", 4),
        ("Lager", "Pilsner Urquell", 4),
    ] {
        submit(
            &app,
            post_json(json!({"beerName": "x", "style": style, "notes": notes, "rating": value})),
        )
        .await;
    }

    let response = app.clone().oneshot(get("/api/ratings/stats")).await.unwrap();
    assert_eq!(
        body_json(response.into_body()).await,
        json!({
            "totalBeers": 6,
            "mostPopularStyle": "IPA",
            "mostRatedBrewery": "Bell's",
            "ratingCounts": {"1": 2, "2": 1, "4": 3}
        })
    );
}

#[tokio::test]
async fn test_export_csv() {
    let app = memory_app();
    submit(&app, post_form("BeerName=Guinness&Style=Stout&Notes=Dublin&Rating=3")).await;
    submit(&app, post_form("BeerName=Orval&Style=Trappist&Rating=4")).await;

    let response = app.clone().oneshot(get("/api/ratings/export")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"beer-ratings-"));
    assert_eq!(
        body_text(response.into_body()).await,
        "Beer Name,Brewery,Style,Rating\n\"Orval\",\"\",\"Trappist\",4\n\"Guinness\",\"Dublin\",\"Stout\",3"
    );
}

#[tokio::test]
async fn test_storage_failure_is_distinguishable() {
    let app = setup_app(Arc::new(UnavailableStore));

    for request in [
        get("/api/ratings"),
        get("/api/ratings/stats"),
        get("/api/ratings/export"),
        post_form("BeerName=Guinness&Rating=3"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_text(response.into_body()).await.starts_with("Storage failure"));
    }

    // Validation runs before the store is touched
    let response = app.clone().oneshot(post_form("Rating=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = memory_app();

    let response = app.oneshot(get("/api/unknown")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_handler_panic_becomes_500() {
    let app = setup_app(Arc::new(PanickingStore));

    for request in [
        get("/api/ratings/stats"),
        get("/api/ratings"),
        post_form("BeerName=Guinness&Rating=3"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response.into_body()).await, "Unexpected server error");
    }

    // The router keeps serving after a panic
    let response = app.clone().oneshot(post_form("Rating=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_responses_parse_into_models() {
    let app = memory_app();

    let response = app.clone().oneshot(get("/api/ratings/stats")).await.unwrap();
    let stats: RatingStats = serde_json::from_str(&body_text(response.into_body()).await).unwrap();
    assert_eq!(stats.most_popular_style, NO_RATINGS_YET);

    let created = submit(&app, post_form("BeerName=Orval&Style=Trappist&Notes=Orval&Rating=4")).await;
    let beer: Rating = serde_json::from_value(created["beer"].clone()).unwrap();
    assert_eq!(
        beer,
        Rating {
            id: 1,
            beer_name: "Orval".into(),
            brewery: "Orval".into(),
            style: "Trappist".into(),
            rating: 4,
        }
    );

    let listed: Vec<Rating> = serde_json::from_value(Value::Array(list(&app).await)).unwrap();
    assert_eq!(listed, vec![beer]);

    let response = app.clone().oneshot(get("/api/ratings/stats")).await.unwrap();
    let stats: RatingStats = serde_json::from_str(&body_text(response.into_body()).await).unwrap();
    assert_eq!(stats.total_beers, 1);
    assert_eq!(stats.rating_counts.get(&4), Some(&1));
}

#[tokio::test]
async fn test_whitespace_beer_name_is_stored() {
    let app = memory_app();

    let created = submit(&app, post_form("BeerName=+++&Rating=2")).await;

    assert_eq!(created["beer"]["beerName"], "   ");
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let app = memory_app();
    let huge = "a".repeat(3 * 1024 * 1024);

    let raw = Request::builder()
        .method("POST")
        .uri("/api/ratings")
        .body(Body::from(huge.clone()))
        .unwrap();
    let response = app.clone().oneshot(raw).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = app
        .clone()
        .oneshot(post_form(&format!("BeerName=x&Rating=1&Notes={huge}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn test_rate_limit_returns_429() {
    let config = Config {
        rate_limit_per_minute: 1,
        ..Config::default()
    };
    let app = build_router(
        AppState::new(Arc::new(MemoryRatingStore::new())),
        &config,
    )
    .unwrap();

    let response = app.clone().oneshot(get("/api/ratings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/ratings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(body_text(response.into_body()).await.starts_with("Too many rating requests"));
}
