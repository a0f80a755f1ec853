/// Mission-level summaries built from rover photos, launch lists and news

use crate::domain::{
    LaunchRecord, MarsConditions, MarsPhoto, MissionInsights, MissionPhase, NewsArticle,
    NewsSummary, TopicCount,
};
use crate::errors::{ApiError, ApiResult};

const RECENT_LAUNCH_WINDOW: usize = 5;
const TRENDING_TOPIC_LIMIT: usize = 5;
const NEWS_KEYWORDS: [&str; 10] = [
    "Mars", "SpaceX", "NASA", "ISS", "asteroid", "launch", "mission", "space", "rocket",
    "satellite",
];

fn camera_insight(camera: &str) -> &'static str {
    match camera {
        "MAST" => "High-resolution imaging and terrain analysis",
        "NAVCAM" => "Navigation and path planning operations",
        "FHAZ" => "Front hazard avoidance and safety checks",
        "RHAZ" => "Rear hazard avoidance and maneuvering",
        "MAHLI" => "Close-up scientific analysis",
        "MARDI" => "Descent and landing documentation",
        _ => "scientific operations",
    }
}

/// Describe a rover's mission phase from its most recent photo.
pub fn analyze_mars_conditions(photos: &[MarsPhoto]) -> MarsConditions {
    let Some(latest) = photos.first() else {
        return MarsConditions {
            conditions: MissionPhase::Unknown,
            analysis: "No recent Mars data available".to_string(),
            sol: None,
            rover: None,
            camera: None,
            recommendations: Vec::new(),
        };
    };

    let sol = latest.sol;
    let rover = latest.rover.name.as_str();
    let camera = latest.camera.name.as_str();

    let (conditions, opening) = if sol > 3000 {
        (
            MissionPhase::Extended,
            format!("{rover} has been operating for {sol} sols, well beyond its planned mission duration. "),
        )
    } else if sol > 1000 {
        (
            MissionPhase::LongTerm,
            format!("{rover} is in long-term operational phase at sol {sol}. "),
        )
    } else {
        (
            MissionPhase::Primary,
            format!("{rover} is in its primary mission phase at sol {sol}. "),
        )
    };

    MarsConditions {
        conditions,
        analysis: format!(
            "{opening}Recent {camera} imagery suggests {} are ongoing.",
            camera_insight(camera)
        ),
        sol: Some(sol),
        rover: Some(rover.to_string()),
        camera: Some(camera.to_string()),
        recommendations: vec![
            "Rover systems operating nominally".to_string(),
            "Continued scientific data collection".to_string(),
            "Regular health monitoring maintained".to_string(),
        ],
    }
}

/// Upcoming-launch count and recent success trend.
pub fn mission_insights(launches: &[LaunchRecord]) -> MissionInsights {
    if launches.is_empty() {
        return MissionInsights {
            insights: "No recent launch data available".to_string(),
            trends: Vec::new(),
            upcoming_count: 0,
            recent_success_rate: "N/A".to_string(),
        };
    }

    let upcoming_count = launches.iter().filter(|l| l.upcoming).count();
    let recent: Vec<&LaunchRecord> = launches
        .iter()
        .filter(|l| !l.upcoming)
        .take(RECENT_LAUNCH_WINDOW)
        .collect();

    let mut insights = String::new();
    let mut trends = Vec::new();

    if upcoming_count > 0 {
        insights.push_str(&format!("{upcoming_count} upcoming missions scheduled. "));
        trends.push("Active launch schedule".to_string());
    }

    let recent_success_rate = if recent.is_empty() {
        "N/A".to_string()
    } else {
        let successes = recent.iter().filter(|l| l.success == Some(true)).count();
        let rate = successes as f64 / recent.len() as f64;
        let pct = (rate * 100.0).round();

        insights.push_str(&format!("Recent mission success rate: {pct:.0}%. "));
        trends.push(
            if rate > 0.8 {
                "High reliability"
            } else if rate > 0.6 {
                "Moderate reliability"
            } else {
                "Reliability concerns"
            }
            .to_string(),
        );
        format!("{pct:.0}%")
    };

    MissionInsights {
        insights,
        trends,
        upcoming_count,
        recent_success_rate,
    }
}

/// Keyword-frequency digest of a batch of articles.
pub fn summarize_news(articles: &[NewsArticle]) -> ApiResult<NewsSummary> {
    if articles.is_empty() {
        return Err(ApiError::InvalidInput("News articles are required".into()));
    }

    let mut counts = [0usize; NEWS_KEYWORDS.len()];
    for article in articles {
        let text = format!(
            "{} {}",
            article.title,
            article.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();

        for (slot, keyword) in counts.iter_mut().zip(NEWS_KEYWORDS) {
            *slot += text.matches(keyword.to_lowercase().as_str()).count();
        }
    }

    let mut trending_topics: Vec<TopicCount> = NEWS_KEYWORDS
        .iter()
        .zip(counts)
        .filter(|(_, mentions)| *mentions > 0)
        .map(|(topic, mentions)| TopicCount {
            topic: topic.to_string(),
            mentions,
        })
        .collect();
    // stable: ties keep keyword order
    trending_topics.sort_by(|a, b| b.mentions.cmp(&a.mentions));
    trending_topics.truncate(TRENDING_TOPIC_LIMIT);

    let (top_topic, top_mentions) = trending_topics
        .first()
        .map(|t| (t.topic.clone(), t.mentions))
        .unwrap_or_else(|| ("space".to_string(), 0));

    let text = format!(
        "Recent space news highlights {} key topics. {} appears to be trending with {} mentions across {} articles.",
        trending_topics.len(),
        capitalize(&top_topic),
        top_mentions,
        articles.len()
    );

    Ok(NewsSummary {
        text,
        key_insights: vec![
            format!("{top_topic} is the most discussed topic"),
            format!("{} articles analyzed", articles.len()),
            format!("{} trending topics identified", trending_topics.len()),
        ],
        trending_topics,
        articles_analyzed: articles.len(),
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
