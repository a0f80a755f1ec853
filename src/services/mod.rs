/// Business logic services layer
use crate::analysis::classify_space_weather;
use crate::clients::{
    IssClient, NasaClient, NasaImageClient, QueryParams, SpaceNewsClient, SpaceXClient,
};
use crate::domain::{SpaceWeatherAssessment, SpaceWeatherObservation};
use crate::errors::{ApiError, ApiResult};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

const APOD_PARAMS: &[&str] = &["date", "count", "start_date", "end_date", "thumbs"];
const NEO_FEED_PARAMS: &[&str] = &["start_date", "end_date"];
const MARS_PHOTO_PARAMS: &[&str] = &["sol", "earth_date", "camera", "page"];
const IMAGE_SEARCH_PARAMS: &[&str] = &["q", "media_type", "year_start", "year_end", "page"];
const NEWS_PARAMS: &[&str] = &[
    "limit",
    "offset",
    "search",
    "news_site",
    "published_at_gte",
    "published_at_lte",
];

/// Keep only the allowed, non-blank query parameters, in allow-list order.
pub fn pick_params(query: &HashMap<String, String>, allowed: &[&str]) -> QueryParams {
    allowed
        .iter()
        .filter_map(|&key| {
            let value = query.get(key)?.trim();
            (!value.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Values interpolated into upstream paths must be plain identifiers
fn path_segment<'a>(value: &'a str, what: &str) -> ApiResult<&'a str> {
    let ok = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(value)
    } else {
        Err(ApiError::InvalidInput(format!("invalid {what}: {value:?}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchListing {
    Next,
    Latest,
    Upcoming,
    Past,
}

impl LaunchListing {
    fn as_path(self) -> &'static str {
        match self {
            LaunchListing::Next => "next",
            LaunchListing::Latest => "latest",
            LaunchListing::Upcoming => "upcoming",
            LaunchListing::Past => "past",
        }
    }
}

impl FromStr for LaunchListing {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(LaunchListing::Next),
            "latest" => Ok(LaunchListing::Latest),
            "upcoming" => Ok(LaunchListing::Upcoming),
            "past" => Ok(LaunchListing::Past),
            other => Err(ApiError::NotFound(format!("unknown launch listing: {other}"))),
        }
    }
}

/// ISS tracking service
pub struct IssService {
    client: IssClient,
}

impl IssService {
    pub fn new(client: IssClient) -> Self {
        Self { client }
    }

    pub async fn position(&self) -> ApiResult<Value> {
        self.client.fetch_position().await
    }

    pub async fn astronauts(&self) -> ApiResult<Value> {
        self.client.fetch_astronauts().await
    }

    /// Classify the space-weather outlook under the station's current position
    pub async fn space_weather(&self) -> ApiResult<SpaceWeatherAssessment> {
        let payload = self.client.fetch_position().await?;
        let observation = observation_from_payload(payload)?;
        observation
            .iss_position
            .validate()
            .map_err(|e| ApiError::UpstreamPayload(e.to_string()))?;
        Ok(classify_space_weather(&observation.iss_position))
    }
}

fn observation_from_payload(payload: Value) -> ApiResult<SpaceWeatherObservation> {
    serde_json::from_value(payload).map_err(|e| {
        tracing::warn!(error = %e, "unexpected ISS position payload");
        ApiError::UpstreamPayload(format!("ISS position: {e}"))
    })
}

/// Pass-through access to NASA, SpaceX and news APIs
pub struct SpaceService {
    nasa_client: NasaClient,
    image_client: Arc<NasaImageClient>,
    spacex_client: SpaceXClient,
    news_client: SpaceNewsClient,
}

impl SpaceService {
    pub fn new(
        nasa_client: NasaClient,
        image_client: Arc<NasaImageClient>,
        spacex_client: SpaceXClient,
        news_client: SpaceNewsClient,
    ) -> Self {
        Self {
            nasa_client,
            image_client,
            spacex_client,
            news_client,
        }
    }

    pub async fn apod(&self, query: &HashMap<String, String>) -> ApiResult<Value> {
        self.nasa_client
            .fetch_apod(pick_params(query, APOD_PARAMS))
            .await
    }

    pub async fn neo_feed(&self, query: &HashMap<String, String>) -> ApiResult<Value> {
        self.nasa_client
            .fetch_neo_feed(pick_params(query, NEO_FEED_PARAMS))
            .await
    }

    pub async fn neo(&self, id: &str) -> ApiResult<Value> {
        self.nasa_client.fetch_neo(path_segment(id, "asteroid id")?).await
    }

    pub async fn mars_photos(
        &self,
        rover: &str,
        query: &HashMap<String, String>,
    ) -> ApiResult<Value> {
        let rover = path_segment(rover, "rover")?.to_lowercase();
        self.nasa_client
            .fetch_mars_photos(&rover, pick_params(query, MARS_PHOTO_PARAMS))
            .await
    }

    pub async fn image_search(&self, query: &HashMap<String, String>) -> ApiResult<Value> {
        self.image_client
            .search_raw(pick_params(query, IMAGE_SEARCH_PARAMS))
            .await
    }

    pub async fn launches(&self, listing: LaunchListing) -> ApiResult<Value> {
        self.spacex_client.fetch_launches(listing.as_path()).await
    }

    pub async fn news(&self, query: &HashMap<String, String>) -> ApiResult<Value> {
        self.news_client
            .fetch_articles(pick_params(query, NEWS_PARAMS))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpClient;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn pick_params_filters_and_orders() {
        let q = query(&[("end_date", "2024-01-07"), ("api_key", "stolen"), ("date", " "), ("count", "3")]);
        let picked = pick_params(&q, APOD_PARAMS);
        assert_eq!(
            picked,
            vec![
                ("count".to_string(), "3".to_string()),
                ("end_date".to_string(), "2024-01-07".to_string()),
            ]
        );
    }

    #[test]
    fn path_segments_reject_traversal() {
        assert_eq!(path_segment("curiosity", "rover").unwrap(), "curiosity");
        assert!(path_segment("../apod", "rover").is_err());
        assert!(path_segment("", "asteroid id").is_err());
    }

    #[test]
    fn launch_listings_parse() {
        assert_eq!("upcoming".parse::<LaunchListing>().unwrap(), LaunchListing::Upcoming);
        assert!(matches!(
            "rockets".parse::<LaunchListing>(),
            Err(ApiError::NotFound(_))
        ));
    }

    async fn iss_service(body: Value) -> (MockServer, IssService) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/iss-now.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        let service = IssService::new(IssClient::new(http, server.uri()));
        (server, service)
    }

    #[tokio::test]
    async fn space_weather_classifies_live_position() {
        let (_server, service) = iss_service(json!({
            "iss_position": {"latitude": "68.2", "longitude": "-145.8"},
            "message": "success"
        }))
        .await;

        let assessment = service.space_weather().await.unwrap();
        assert_eq!(assessment.region, crate::domain::Region::Arctic);
    }

    #[tokio::test]
    async fn space_weather_rejects_garbage_payload() {
        let (_server, service) = iss_service(json!({"message": "failure"})).await;
        assert!(matches!(
            service.space_weather().await,
            Err(ApiError::UpstreamPayload(_))
        ));
    }
}
