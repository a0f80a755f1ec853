/// Rule-based classifiers for near-Earth objects and ISS space weather
mod insights;

pub use insights::{analyze_mars_conditions, mission_insights, summarize_news};

use crate::domain::{
    AuroraChance, GeoPoint, NearEarthObject, ObjectKind, Region, RiskAssessment, RiskFactors,
    RiskLevel, SpaceObject, SpaceObjectClassification, SpaceWeatherAssessment,
};
use crate::utils::group_thousands;

const HIGH_RISK_MISS_KM: f64 = 1_000_000.0;
const MEDIUM_RISK_MISS_KM: f64 = 5_000_000.0;
const LARGE_OBJECT_KM: f64 = 1.0;
const REGIONAL_OBJECT_KM: f64 = 0.1;
const LARGE_OBJECT_BONUS: u8 = 5;
const CONFIDENCE_CAP: u8 = 99;

const ASTEROID_TRAITS: &[&str] = &["Rocky composition", "Irregular shape", "Orbits Sun"];
const LARGE_TRAITS: &[&str] = &["Significant size", "Potential impact risk", "Trackable orbit"];
const MEDIUM_TRAITS: &[&str] = &["Moderate size", "Regular monitoring", "Stable orbit"];
const SMALL_TRAITS: &[&str] = &["Small size", "Low impact risk", "Frequent occurrence"];
const NO_TRAITS: &[&str] = &[];

const POLAR_LATITUDE: f64 = 60.0;
const HIGH_LATITUDE: f64 = 45.0;

fn fraction(pct: u8) -> f64 {
    f64::from(pct) / 100.0
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Classify the impact risk of a near-Earth object.
///
/// Only the first close approach is considered. Missing miss distance and
/// diameter read as 0, so an object without any close-approach record lands
/// in HIGH when hazardous and MEDIUM otherwise.
pub fn classify_asteroid_risk(neo: &NearEarthObject) -> RiskAssessment {
    let miss_km = neo.miss_distance_km();
    let diameter_km = neo.max_diameter_km();
    let hazardous = neo.hazardous();
    let name = neo.name.as_str();

    let (risk_level, mut pct, mut recommendations, mut analysis) =
        if hazardous && miss_km < HIGH_RISK_MISS_KM {
            (
                RiskLevel::High,
                95u8,
                to_strings(&[
                    "Continuous monitoring required",
                    "Alert space agencies immediately",
                    "Calculate precise trajectory",
                ]),
                format!(
                    "{name} poses a significant threat due to its potentially hazardous \
                     classification and close approach distance of {} km.",
                    group_thousands(miss_km)
                ),
            )
        } else if hazardous || miss_km < MEDIUM_RISK_MISS_KM {
            let reason = if hazardous {
                "hazardous classification"
            } else {
                "close approach"
            };
            (
                RiskLevel::Medium,
                90u8,
                to_strings(&["Regular monitoring advised", "Track orbital changes"]),
                format!(
                    "{name} requires attention. While not immediately dangerous, its {reason} \
                     warrants monitoring."
                ),
            )
        } else {
            (
                RiskLevel::Low,
                85u8,
                to_strings(&["Standard monitoring sufficient"]),
                format!(
                    "{name} poses minimal risk with a safe miss distance of {} km.",
                    group_thousands(miss_km)
                ),
            )
        };

    if diameter_km > LARGE_OBJECT_KM {
        recommendations.push("Large object - potential global impact".to_string());
        pct = pct.saturating_add(LARGE_OBJECT_BONUS).min(CONFIDENCE_CAP);
        analysis.push_str(&format!(
            " Its estimated diameter of up to {diameter_km:.2} km makes it a significant object."
        ));
    } else if diameter_km > REGIONAL_OBJECT_KM {
        recommendations.push("Regional impact potential".to_string());
        analysis.push_str(&format!(
            " With an estimated diameter of {diameter_km:.3} km, it's a medium-sized asteroid."
        ));
    } else {
        analysis.push_str(" This is a relatively small asteroid with diameter under 100 meters.");
    }

    RiskAssessment {
        risk_level,
        confidence: fraction(pct),
        summary: format!("{name} classified as {risk_level} risk with {pct}% confidence"),
        analysis,
        recommendations,
        factors: RiskFactors {
            miss_distance: format!("{} km", group_thousands(miss_km)),
            diameter: format!("{diameter_km:.3} km"),
            hazardous,
            velocity: format!("{} km/h", group_thousands(neo.velocity_kmh())),
        },
    }
}

/// Estimate aurora visibility beneath the ISS from its sub-point latitude.
pub fn classify_space_weather(position: &GeoPoint) -> SpaceWeatherAssessment {
    let (lat, lon) = match (position.latitude, position.longitude) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => (lat, lon),
        _ => {
            return SpaceWeatherAssessment {
                region: Region::Unknown,
                aurora_chance: AuroraChance::Low,
                visibility: "Unknown".to_string(),
                analysis: "ISS position is unavailable, observation conditions cannot be assessed."
                    .to_string(),
                recommendations: vec!["Retry once fresh position telemetry is available".to_string()],
            };
        }
    };

    let (region, aurora_chance, visibility) = if lat.abs() > POLAR_LATITUDE {
        let region = if lat > 0.0 { Region::Arctic } else { Region::Antarctic };
        (region, AuroraChance::High, "Excellent for aurora viewing")
    } else if lat.abs() > HIGH_LATITUDE {
        (Region::HighLatitude, AuroraChance::Medium, "Possible aurora activity")
    } else {
        (Region::MidLow, AuroraChance::Low, "Clear space observations")
    };

    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    let first = if aurora_chance == AuroraChance::High {
        "Excellent time for aurora photography"
    } else {
        "Good conditions for space observations"
    };

    SpaceWeatherAssessment {
        region,
        aurora_chance,
        visibility: visibility.to_string(),
        analysis: format!(
            "ISS is currently over {} region at {:.1}°{ns}, {:.1}°{ew}. {visibility} expected.",
            region.label(),
            lat.abs(),
            lon.abs(),
        ),
        recommendations: to_strings(&[
            first,
            "Minimal atmospheric interference expected",
            "Optimal viewing conditions for Earth observation",
        ]),
    }
}

/// Coarse size-based classification of an arbitrary space object.
pub fn classify_space_object(object: &SpaceObject) -> SpaceObjectClassification {
    let named_asteroid = object
        .name
        .as_deref()
        .is_some_and(|n| n.to_lowercase().contains("asteroid"));

    let (kind, pct, characteristics) = if named_asteroid {
        (ObjectKind::Asteroid, 90, ASTEROID_TRAITS)
    } else if let Some(diameter) = &object.estimated_diameter {
        let km = diameter.max_km();
        if km > 100.0 {
            (ObjectKind::LargeAsteroid, 85, LARGE_TRAITS)
        } else if km > 1.0 {
            (ObjectKind::MediumAsteroid, 80, MEDIUM_TRAITS)
        } else {
            (ObjectKind::SmallAsteroid, 75, SMALL_TRAITS)
        }
    } else {
        (ObjectKind::Unknown, 50, NO_TRAITS)
    };

    SpaceObjectClassification {
        kind,
        confidence: fraction(pct),
        characteristics: to_strings(characteristics),
        analysis: format!(
            "Based on available data, this object is classified as a {kind} with {pct}% confidence."
        ),
    }
}
