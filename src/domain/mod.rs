/// Domain models for the application
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{ApiError, ApiResult};
use crate::utils::de_opt_num;

// ---------------------------------------------------------------------------
// Inputs, shaped like the upstream NeoWs / Open Notify payloads
// ---------------------------------------------------------------------------

/// Near-Earth object as returned by the NeoWs feed and lookup endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct NearEarthObject {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: Option<bool>,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
    #[serde(default)]
    pub estimated_diameter: Option<EstimatedDiameter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseApproach {
    #[serde(default)]
    pub miss_distance: Option<MissDistance>,
    #[serde(default)]
    pub relative_velocity: Option<RelativeVelocity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MissDistance {
    #[serde(default, deserialize_with = "de_opt_num")]
    pub kilometers: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelativeVelocity {
    #[serde(default, deserialize_with = "de_opt_num")]
    pub kilometers_per_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimatedDiameter {
    #[serde(default)]
    pub kilometers: Option<DiameterRange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiameterRange {
    #[serde(default, deserialize_with = "de_opt_num")]
    pub estimated_diameter_min: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_num")]
    pub estimated_diameter_max: Option<f64>,
}

impl EstimatedDiameter {
    pub fn max_km(&self) -> f64 {
        self.kilometers
            .as_ref()
            .and_then(|k| k.estimated_diameter_max)
            .unwrap_or(0.0)
    }
}

impl NearEarthObject {
    pub fn hazardous(&self) -> bool {
        self.is_potentially_hazardous_asteroid.unwrap_or(false)
    }

    /// Miss distance of the first close approach, 0 when unknown
    pub fn miss_distance_km(&self) -> f64 {
        self.close_approach_data
            .first()
            .and_then(|c| c.miss_distance.as_ref())
            .and_then(|m| m.kilometers)
            .unwrap_or(0.0)
    }

    /// Relative velocity of the first close approach, 0 when unknown
    pub fn velocity_kmh(&self) -> f64 {
        self.close_approach_data
            .first()
            .and_then(|c| c.relative_velocity.as_ref())
            .and_then(|v| v.kilometers_per_hour)
            .unwrap_or(0.0)
    }

    pub fn max_diameter_km(&self) -> f64 {
        self.estimated_diameter
            .as_ref()
            .map(EstimatedDiameter::max_km)
            .unwrap_or(0.0)
    }

    /// Reject payloads that break the physical invariants instead of
    /// classifying them.
    pub fn validate(&self) -> ApiResult<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("asteroid name must not be empty".into()));
        }

        for approach in &self.close_approach_data {
            if let Some(km) = approach.miss_distance.as_ref().and_then(|m| m.kilometers) {
                if !km.is_finite() || km < 0.0 {
                    return Err(ApiError::InvalidInput(format!(
                        "miss distance must be a non-negative number, got {km}"
                    )));
                }
            }
            if let Some(kmh) = approach.relative_velocity.as_ref().and_then(|v| v.kilometers_per_hour) {
                if !kmh.is_finite() {
                    return Err(ApiError::InvalidInput("relative velocity must be finite".into()));
                }
            }
        }

        if let Some(range) = self.estimated_diameter.as_ref().and_then(|d| d.kilometers.as_ref()) {
            let min = range.estimated_diameter_min.unwrap_or(0.0);
            let max = range.estimated_diameter_max.unwrap_or(min);
            if !min.is_finite() || !max.is_finite() || min < 0.0 || max < min {
                return Err(ApiError::InvalidInput(format!(
                    "estimated diameter range must satisfy 0 <= min <= max, got [{min}, {max}]"
                )));
            }
        }

        Ok(())
    }
}

/// `{"iss_position": {"latitude": "68.2", "longitude": "-145.8"}}`
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceWeatherObservation {
    pub iss_position: GeoPoint,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct GeoPoint {
    #[serde(default, deserialize_with = "de_opt_num")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_num")]
    pub longitude: Option<f64>,
}

impl GeoPoint {
    pub fn validate(&self) -> ApiResult<()> {
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ApiError::InvalidInput(format!(
                    "latitude must be within [-90, 90], got {lat}"
                )));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ApiError::InvalidInput(format!(
                    "longitude must be within [-180, 180], got {lon}"
                )));
            }
        }
        Ok(())
    }
}

/// Loose object payload for the coarse classifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceObject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub estimated_diameter: Option<EstimatedDiameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarsPhoto {
    pub sol: u32,
    pub camera: NamedRef,
    pub rover: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchRecord {
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default, alias = "summary")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Assessments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Fraction in [0, 1]
    pub confidence: f64,
    pub summary: String,
    pub analysis: String,
    pub recommendations: Vec<String>,
    pub factors: RiskFactors,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub miss_distance: String,
    pub diameter: String,
    pub hazardous: bool,
    pub velocity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Region {
    Arctic,
    Antarctic,
    HighLatitude,
    MidLow,
    Unknown,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::Arctic => "Arctic",
            Region::Antarctic => "Antarctic",
            Region::HighLatitude => "High Latitude",
            Region::MidLow => "Mid to Low Latitude",
            Region::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuroraChance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceWeatherAssessment {
    pub region: Region,
    pub aurora_chance: AuroraChance,
    pub visibility: String,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectKind {
    Asteroid,
    #[serde(rename = "Large Asteroid")]
    LargeAsteroid,
    #[serde(rename = "Medium Asteroid")]
    MediumAsteroid,
    #[serde(rename = "Small Asteroid")]
    SmallAsteroid,
    Unknown,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectKind::Asteroid => "Asteroid",
            ObjectKind::LargeAsteroid => "Large Asteroid",
            ObjectKind::MediumAsteroid => "Medium Asteroid",
            ObjectKind::SmallAsteroid => "Small Asteroid",
            ObjectKind::Unknown => "Unknown",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpaceObjectClassification {
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub confidence: f64,
    pub characteristics: Vec<String>,
    pub analysis: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MissionPhase {
    #[serde(rename = "Primary Mission")]
    Primary,
    #[serde(rename = "Long-term Operations")]
    LongTerm,
    #[serde(rename = "Extended Mission")]
    Extended,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarsConditions {
    pub conditions: MissionPhase,
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sol: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionInsights {
    pub insights: String,
    pub trends: Vec<String>,
    pub upcoming_count: usize,
    pub recent_success_rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub mentions: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
    pub text: String,
    pub trending_topics: Vec<TopicCount>,
    pub articles_analyzed: usize,
    pub key_insights: Vec<String>,
}

// ---------------------------------------------------------------------------
// Imagery
// ---------------------------------------------------------------------------

/// How much an image can be trusted to actually depict the named object,
/// strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchTier {
    Exact,
    CatalogNumber,
    LiveSearch,
    Representative,
}

impl MatchTier {
    pub fn is_verified(&self) -> bool {
        !matches!(self, MatchTier::Representative)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsteroidImage {
    pub url: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AsteroidType {
    #[serde(rename = "C-type")]
    Carbonaceous,
    #[serde(rename = "S-type")]
    Silicaceous,
    #[serde(rename = "M-type")]
    Metallic,
    #[serde(rename = "V-type")]
    Basaltic,
    #[serde(rename = "X-type")]
    Mixed,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
    pub uptime_seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn neo_parses_upstream_shape_with_string_numbers() {
        let neo: NearEarthObject = serde_json::from_value(json!({
            "id": "3542519",
            "name": "(2010 PK9)",
            "is_potentially_hazardous_asteroid": true,
            "close_approach_data": [{
                "miss_distance": {"kilometers": "750000.25"},
                "relative_velocity": {"kilometers_per_hour": "28500"}
            }],
            "estimated_diameter": {"kilometers": {
                "estimated_diameter_min": 0.3,
                "estimated_diameter_max": 0.8
            }}
        }))
        .unwrap();

        assert_eq!(neo.id.as_deref(), Some("3542519"));
        assert!(neo.hazardous());
        assert_eq!(neo.miss_distance_km(), 750000.25);
        assert_eq!(neo.velocity_kmh(), 28500.0);
        assert_eq!(neo.max_diameter_km(), 0.8);
        assert!(neo.validate().is_ok());
    }

    #[test]
    fn neo_sparse_payload_defaults_to_zero() {
        let neo: NearEarthObject = serde_json::from_value(json!({"name": "Sparse"})).unwrap();
        assert!(!neo.hazardous());
        assert_eq!(neo.miss_distance_km(), 0.0);
        assert_eq!(neo.velocity_kmh(), 0.0);
        assert_eq!(neo.max_diameter_km(), 0.0);
        assert!(neo.validate().is_ok());
    }

    #[test]
    fn neo_without_name_fails_to_parse() {
        let res = serde_json::from_value::<NearEarthObject>(json!({"close_approach_data": []}));
        assert!(res.is_err());
    }

    #[test]
    fn neo_wrong_hazard_type_fails_to_parse() {
        let res = serde_json::from_value::<NearEarthObject>(
            json!({"name": "X", "is_potentially_hazardous_asteroid": "yes"}),
        );
        assert!(res.is_err());
    }

    #[test]
    fn negative_miss_distance_is_invalid() {
        let neo: NearEarthObject = serde_json::from_value(json!({
            "name": "Backwards",
            "close_approach_data": [{"miss_distance": {"kilometers": -5}}]
        }))
        .unwrap();
        assert!(matches!(neo.validate(), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn inverted_diameter_range_is_invalid() {
        let neo: NearEarthObject = serde_json::from_value(json!({
            "name": "Inverted",
            "estimated_diameter": {"kilometers": {
                "estimated_diameter_min": 2.0,
                "estimated_diameter_max": 1.0
            }}
        }))
        .unwrap();
        assert!(neo.validate().is_err());
    }

    #[test]
    fn geo_point_range_checks() {
        let ok = GeoPoint { latitude: Some(-90.0), longitude: Some(180.0) };
        let bad_lat = GeoPoint { latitude: Some(91.0), longitude: Some(0.0) };
        let bad_lon = GeoPoint { latitude: Some(0.0), longitude: Some(-181.0) };
        assert!(ok.validate().is_ok());
        assert!(bad_lat.validate().is_err());
        assert!(bad_lon.validate().is_err());
    }

    #[test]
    fn nan_coordinates_are_rejected() {
        let nan = GeoPoint { latitude: Some(f64::NAN), longitude: Some(0.0) };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn match_tiers_order_strongest_first() {
        assert!(MatchTier::Exact < MatchTier::CatalogNumber);
        assert!(MatchTier::CatalogNumber < MatchTier::LiveSearch);
        assert!(MatchTier::LiveSearch < MatchTier::Representative);
        assert!(MatchTier::LiveSearch.is_verified());
        assert!(!MatchTier::Representative.is_verified());
    }

    #[test]
    fn enums_serialize_to_wire_names() {
        assert_eq!(serde_json::to_value(RiskLevel::High).unwrap(), "HIGH");
        assert_eq!(serde_json::to_value(Region::HighLatitude).unwrap(), "HighLatitude");
        assert_eq!(serde_json::to_value(ObjectKind::LargeAsteroid).unwrap(), "Large Asteroid");
        assert_eq!(serde_json::to_value(AsteroidType::Carbonaceous).unwrap(), "C-type");
        assert_eq!(serde_json::to_value(MatchTier::CatalogNumber).unwrap(), "catalogNumber");
    }
}
