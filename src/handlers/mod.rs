/// HTTP request handlers
use crate::analysis::{
    analyze_mars_conditions, classify_asteroid_risk, classify_space_object,
    classify_space_weather, mission_insights, summarize_news,
};
use crate::clients::Clients;
use crate::config::AppConfig;
use crate::domain::{
    AsteroidImage, Health, LaunchRecord, MarsConditions, MarsPhoto, MissionInsights,
    NearEarthObject, NewsArticle, NewsSummary, RiskAssessment, SpaceObject,
    SpaceObjectClassification, SpaceWeatherAssessment, SpaceWeatherObservation,
};
use crate::errors::{ApiError, ApiResult};
use crate::imagery::{AbortSignal, AsteroidImageResolver};
use crate::services::{IssService, LaunchListing, SpaceService};
use crate::utils::{optional_field, required_field};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::Uri,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub iss_service: Arc<IssService>,
    pub space_service: Arc<SpaceService>,
    pub image_resolver: Arc<AsteroidImageResolver>,
    /// Fires on shutdown so pending image lookups stop waiting on upstreams
    pub abort: AbortSignal,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn from_config(config: &AppConfig, abort: AbortSignal) -> ApiResult<Self> {
        let clients = Clients::from_config(config)?;
        let image_resolver =
            AsteroidImageResolver::new(clients.nasa_images.clone(), config.upstream_timeout);

        Ok(Self {
            iss_service: Arc::new(IssService::new(clients.iss)),
            space_service: Arc::new(SpaceService::new(
                clients.nasa,
                clients.nasa_images,
                clients.spacex,
                clients.news,
            )),
            image_resolver: Arc::new(image_resolver),
            abort,
            started_at: Utc::now(),
        })
    }
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Body of every analyzer response
#[derive(Serialize)]
pub struct AnalysisEnvelope<T: Serialize> {
    pub analysis: T,
    pub model: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub type AnalysisResponse<T> = Json<SuccessResponse<AnalysisEnvelope<T>>>;

fn analysis<T: Serialize>(analysis: T, model: &'static str) -> AnalysisResponse<T> {
    Json(SuccessResponse::new(AnalysisEnvelope {
        analysis,
        model,
        timestamp: Utc::now(),
    }))
}

/// Service index
pub async fn index() -> Json<Value> {
    Json(json!({
        "ok": true,
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "nasa": "/api/nasa",
            "iss": "/api/iss",
            "spacex": "/api/spacex",
            "spacenews": "/api/spacenews",
            "ai": "/api/ai"
        }
    }))
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let now = Utc::now();
    Json(Health {
        status: "ok",
        now,
        uptime_seconds: (now - state.started_at).num_seconds(),
    })
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("The requested route {uri} does not exist"))
}

// ---------------------------------------------------------------------------
// Upstream pass-through
// ---------------------------------------------------------------------------

pub async fn get_apod(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.space_service.apod(&params).await?))
}

pub async fn get_neo_feed(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.space_service.neo_feed(&params).await?))
}

pub async fn get_neo(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.space_service.neo(&id).await?))
}

pub async fn get_mars_photos(
    Path(rover): Path<String>,
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.space_service.mars_photos(&rover, &params).await?))
}

pub async fn search_images(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.space_service.image_search(&params).await?))
}

pub async fn get_iss_position(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.iss_service.position().await?))
}

pub async fn get_astronauts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.iss_service.astronauts().await?))
}

pub async fn get_launches(
    Path(which): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let listing: LaunchListing = which.parse()?;
    Ok(Json(state.space_service.launches(listing).await?))
}

pub async fn get_news(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.space_service.news(&params).await?))
}

// ---------------------------------------------------------------------------
// Derived data
// ---------------------------------------------------------------------------

/// Best available image for an asteroid; never fails
pub async fn get_asteroid_image(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Json<SuccessResponse<AsteroidImage>> {
    let image = state.image_resolver.resolve(&name, &state.abort).await;
    Json(SuccessResponse::new(image))
}

pub async fn get_space_weather(
    State(state): State<AppState>,
) -> Result<AnalysisResponse<SpaceWeatherAssessment>, ApiError> {
    let assessment = state.iss_service.space_weather().await?;
    Ok(analysis(assessment, "SpaceAI Weather Analyzer v1.0"))
}

// ---------------------------------------------------------------------------
// Analyzers
// ---------------------------------------------------------------------------

pub async fn analyze_asteroid(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<AnalysisResponse<RiskAssessment>, ApiError> {
    let Json(body) = body?;
    let neo: NearEarthObject = required_field(&body, "asteroid", "Asteroid")?;
    neo.validate()?;
    let assessment = classify_asteroid_risk(&neo);
    tracing::debug!(
        id = neo.id.as_deref().unwrap_or("-"),
        name = %neo.name,
        risk = %assessment.risk_level,
        "asteroid analyzed"
    );
    Ok(analysis(assessment, "SpaceAI Rule-Based Analyzer v1.0"))
}

pub async fn analyze_space_weather(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<AnalysisResponse<SpaceWeatherAssessment>, ApiError> {
    let Json(body) = body?;
    let observation: SpaceWeatherObservation =
        required_field(&body, "issPosition", "ISS position")?;
    observation.iss_position.validate()?;
    Ok(analysis(
        classify_space_weather(&observation.iss_position),
        "SpaceAI Weather Analyzer v1.0",
    ))
}

pub async fn classify_object(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<AnalysisResponse<SpaceObjectClassification>, ApiError> {
    let Json(body) = body?;
    let object: SpaceObject = required_field(&body, "objectData", "Space object")?;
    Ok(analysis(
        classify_space_object(&object),
        "SpaceAI Object Classifier v1.0",
    ))
}

pub async fn analyze_mars_mission(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<AnalysisResponse<MarsConditions>, ApiError> {
    let Json(body) = body?;
    let photos: Vec<MarsPhoto> = optional_field(&body, "marsPhotos", "Mars photo")?;
    Ok(analysis(
        analyze_mars_conditions(&photos),
        "SpaceAI Mars Analyzer v1.0",
    ))
}

pub async fn analyze_missions(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<AnalysisResponse<MissionInsights>, ApiError> {
    let Json(body) = body?;
    let launches: Vec<LaunchRecord> = optional_field(&body, "launchData", "Launch")?;
    Ok(analysis(
        mission_insights(&launches),
        "SpaceAI Mission Analyzer v1.0",
    ))
}

pub async fn summarize_articles(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<AnalysisResponse<NewsSummary>, ApiError> {
    let Json(body) = body?;
    let articles: Vec<NewsArticle> = optional_field(&body, "articles", "News article")?;
    Ok(analysis(
        summarize_news(&articles)?,
        "SpaceAI News Analyzer v1.0",
    ))
}
