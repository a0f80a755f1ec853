/// Application routes configuration
use crate::handlers::{
    analyze_asteroid, analyze_mars_mission, analyze_missions, analyze_space_weather,
    classify_object, get_apod, get_asteroid_image, get_astronauts, get_iss_position,
    get_launches, get_mars_photos, get_neo, get_neo_feed, get_news, get_space_weather, health,
    index, not_found, search_images, summarize_articles, AppState,
};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// CORS restricted to the frontend origin when one is configured
pub fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "FRONTEND_URL is not a valid origin, allowing any");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

/// Build the application router with all routes
pub fn build_router(state: AppState, frontend_url: Option<&str>) -> Router {
    let nasa = Router::new()
        .route("/apod", get(get_apod))
        .route("/neo/feed", get(get_neo_feed))
        .route("/neo/image/:name", get(get_asteroid_image))
        .route("/neo/:id", get(get_neo))
        .route("/mars-photos/:rover", get(get_mars_photos))
        .route("/images/search", get(search_images));

    let iss = Router::new()
        .route("/position", get(get_iss_position))
        .route("/astronauts", get(get_astronauts))
        .route("/space-weather", get(get_space_weather));

    let ai = Router::new()
        .route("/analyze-asteroid", post(analyze_asteroid))
        .route("/analyze-space-weather", post(analyze_space_weather))
        .route("/classify-space-object", post(classify_object))
        .route("/analyze-mars-mission", post(analyze_mars_mission))
        .route("/mission-insights", post(analyze_missions))
        .route("/summarize-news", post(summarize_articles));

    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .nest("/api/nasa", nasa)
        .nest("/api/iss", iss)
        .route("/api/spacex/launches/:which", get(get_launches))
        .route("/api/spacenews/articles", get(get_news))
        .nest("/api/ai", ai)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(frontend_url))
        .with_state(state)
}
