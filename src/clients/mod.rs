/// External API clients module
use crate::config::AppConfig;
use crate::errors::ApiResult;
use crate::imagery::{ImageCandidate, ImageSearch};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub type QueryParams = Vec<(String, String)>;

/// HTTP client wrapper with common configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("space-explorer/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    /// GET a JSON document, treating non-2xx statuses as errors
    pub async fn get_json(&self, url: &str, query: &[(String, String)]) -> ApiResult<Value> {
        tracing::debug!(url, "upstream request");
        let json = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(json)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// NASA open APIs client (APOD, NeoWs, Mars rover photos)
pub struct NasaClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(http_client: HttpClient, base_url: String, api_key: String) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    async fn get(&self, endpoint: &str, params: QueryParams) -> ApiResult<Value> {
        let mut query = params;
        query.push(("api_key".to_string(), self.api_key.clone()));
        self.http_client
            .get_json(&join_url(&self.base_url, endpoint), &query)
            .await
    }

    /// Fetch Astronomy Picture of the Day
    pub async fn fetch_apod(&self, params: QueryParams) -> ApiResult<Value> {
        self.get("/planetary/apod", params).await
    }

    /// Fetch Near Earth Objects feed
    pub async fn fetch_neo_feed(&self, params: QueryParams) -> ApiResult<Value> {
        self.get("/neo/rest/v1/feed", params).await
    }

    /// Look up a single near-Earth object by its NeoWs id
    pub async fn fetch_neo(&self, id: &str) -> ApiResult<Value> {
        self.get(&format!("/neo/rest/v1/neo/{id}"), Vec::new()).await
    }

    /// Fetch photos taken by a Mars rover
    pub async fn fetch_mars_photos(&self, rover: &str, params: QueryParams) -> ApiResult<Value> {
        self.get(&format!("/mars-photos/api/v1/rovers/{rover}/photos"), params)
            .await
    }
}

/// NASA Image and Video Library client
pub struct NasaImageClient {
    http_client: HttpClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    collection: SearchCollection,
}

#[derive(Debug, Deserialize)]
struct SearchCollection {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    data: Vec<SearchItemData>,
    #[serde(default)]
    links: Vec<SearchItemLink>,
}

#[derive(Debug, Deserialize)]
struct SearchItemData {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItemLink {
    href: Option<String>,
}

impl From<SearchItem> for ImageCandidate {
    fn from(item: SearchItem) -> Self {
        let (title, description) = item
            .data
            .into_iter()
            .next()
            .map(|d| (d.title, d.description))
            .unwrap_or_default();
        ImageCandidate {
            title,
            description,
            href: item.links.into_iter().next().and_then(|l| l.href),
        }
    }
}

impl NasaImageClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Raw library search, passed through to callers
    pub async fn search_raw(&self, params: QueryParams) -> ApiResult<Value> {
        self.http_client
            .get_json(&join_url(&self.base_url, "/search"), &params)
            .await
    }
}

#[async_trait]
impl ImageSearch for NasaImageClient {
    async fn search(&self, query: &str) -> ApiResult<Vec<ImageCandidate>> {
        let resp: SearchResponse = self
            .http_client
            .get_client()
            .get(join_url(&self.base_url, "/search"))
            .query(&[("q", query), ("media_type", "image")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .collection
            .items
            .into_iter()
            .map(ImageCandidate::from)
            .collect())
    }
}

/// ISS tracking client (Open Notify)
pub struct IssClient {
    http_client: HttpClient,
    base_url: String,
}

impl IssClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Fetch current ISS position
    pub async fn fetch_position(&self) -> ApiResult<Value> {
        self.http_client
            .get_json(&join_url(&self.base_url, "/iss-now.json"), &[])
            .await
    }

    /// Fetch the people currently in space
    pub async fn fetch_astronauts(&self) -> ApiResult<Value> {
        self.http_client
            .get_json(&join_url(&self.base_url, "/astros.json"), &[])
            .await
    }
}

/// SpaceX API client
pub struct SpaceXClient {
    http_client: HttpClient,
    base_url: String,
}

impl SpaceXClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Fetch a launch listing: next, latest, upcoming or past
    pub async fn fetch_launches(&self, listing: &str) -> ApiResult<Value> {
        self.http_client
            .get_json(&join_url(&self.base_url, &format!("/launches/{listing}")), &[])
            .await
    }
}

/// Spaceflight News API client
pub struct SpaceNewsClient {
    http_client: HttpClient,
    base_url: String,
}

impl SpaceNewsClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    pub async fn fetch_articles(&self, params: QueryParams) -> ApiResult<Value> {
        self.http_client
            .get_json(&join_url(&self.base_url, "/articles"), &params)
            .await
    }
}

/// All upstream clients, sharing one connection pool
pub struct Clients {
    pub nasa: NasaClient,
    pub nasa_images: Arc<NasaImageClient>,
    pub iss: IssClient,
    pub spacex: SpaceXClient,
    pub news: SpaceNewsClient,
}

impl Clients {
    pub fn from_config(config: &AppConfig) -> ApiResult<Self> {
        let http = HttpClient::new(config.upstream_timeout)?;
        Ok(Self {
            nasa: NasaClient::new(
                http.clone(),
                config.nasa_api_url.clone(),
                config.nasa_api_key.clone(),
            ),
            nasa_images: Arc::new(NasaImageClient::new(
                http.clone(),
                config.nasa_images_url.clone(),
            )),
            iss: IssClient::new(http.clone(), config.iss_api_url.clone()),
            spacex: SpaceXClient::new(http.clone(), config.spacex_api_url.clone()),
            news: SpaceNewsClient::new(http, config.space_news_url.clone()),
        })
    }
}
