/// Asteroid image resolution: static catalog first, live search next,
/// representative image last
mod catalog;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{AsteroidImage, MatchTier};
use crate::errors::ApiResult;

const LIVE_SEARCH_SOURCE: &str = "NASA Image Library";
const RELEVANT_TERMS: [&str; 3] = ["asteroid", "neo", "near earth"];
const EXCLUDED_TERMS: [&str; 6] = ["truck", "vehicle", "building", "facility", "launch", "rocket"];

/// One hit from an external image search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageCandidate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub href: Option<String>,
}

impl ImageCandidate {
    /// Keep asteroid imagery, drop hardware and facility shots that merely
    /// mention a mission.
    pub fn depicts_asteroid(&self) -> bool {
        let title = self.title.as_deref().unwrap_or_default().to_lowercase();
        let description = self.description.as_deref().unwrap_or_default().to_lowercase();
        let mentions = |term: &str| title.contains(term) || description.contains(term);

        self.href.is_some()
            && RELEVANT_TERMS.iter().any(|t| mentions(t))
            && !EXCLUDED_TERMS.iter().any(|t| mentions(t))
    }

    fn into_image(self, fallback_title: &str) -> Option<AsteroidImage> {
        if !self.depicts_asteroid() {
            return None;
        }
        Some(AsteroidImage {
            url: self.href?,
            title: self.title.unwrap_or_else(|| fallback_title.to_string()),
            description: self.description.unwrap_or_default(),
            source: LIVE_SEARCH_SOURCE.to_string(),
            tier: MatchTier::LiveSearch,
        })
    }
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, query: &str) -> ApiResult<Vec<ImageCandidate>>;
}

/// Caller side of an abort signal.
#[derive(Debug)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }
}

/// Cancels in-flight image searches; resolution then falls through to the
/// representative image.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

pub fn abort_pair() -> (AbortHandle, AbortSignal) {
    let (tx, rx) = watch::channel(false);
    (AbortHandle { tx }, AbortSignal { rx })
}

impl AbortSignal {
    /// A signal that never fires
    #[cfg(test)]
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once aborted; pends forever if the handle is gone without
    /// having fired.
    pub async fn aborted(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|aborted| *aborted).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Asteroid name split into a display name and the catalog number that
/// NeoWs puts in leading parentheses, e.g. "(433) Eros".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsteroidName {
    pub display: String,
    pub catalog_number: Option<String>,
}

impl AsteroidName {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        let (catalog_number, rest) = match split_leading_number(trimmed) {
            Some((number, rest)) => (Some(number.to_string()), rest),
            None => (None, trimmed),
        };

        let cleaned = strip_numbered_parenthetical(rest.trim_start());
        let cleaned = cleaned.trim();

        // "(2025 XY1)" strips down to nothing; show the designation instead
        let display = if cleaned.is_empty() {
            trimmed
                .trim_start_matches('(')
                .trim_end_matches(')')
                .trim()
                .to_string()
        } else {
            cleaned.to_string()
        };

        Self {
            display,
            catalog_number,
        }
    }

    fn number(&self) -> Option<u64> {
        self.catalog_number.as_deref().and_then(|n| n.parse().ok())
    }
}

/// "(433) Eros" -> ("433", " Eros")
fn split_leading_number(s: &str) -> Option<(&str, &str)> {
    let inner = s.strip_prefix('(')?;
    let digits = inner.find(|c: char| !c.is_ascii_digit())?;
    if digits == 0 {
        return None;
    }
    let rest = inner[digits..].strip_prefix(')')?;
    Some((&inner[..digits], rest))
}

/// Remove the first "(<digit>...)" group together with the whitespace in
/// front of it: "Bennu (1999 RQ36)" -> "Bennu"
fn strip_numbered_parenthetical(s: &str) -> String {
    for (open, _) in s.match_indices('(') {
        let after = &s[open + 1..];
        if !after.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        let Some(close) = after.find(')') else {
            break;
        };
        return format!("{}{}", s[..open].trim_end(), &after[close + 1..]);
    }
    s.to_string()
}

fn search_queries(name: &str) -> [String; 4] {
    [
        format!("asteroid {name}"),
        format!("{name} asteroid"),
        format!("near earth object {name}"),
        format!("NEO {name}"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    ExactName,
    CatalogNumber,
    LiveSearch,
}

/// Tried in order; the representative image closes the chain.
const STRATEGY_CHAIN: [Strategy; 3] = [
    Strategy::ExactName,
    Strategy::CatalogNumber,
    Strategy::LiveSearch,
];

pub struct AsteroidImageResolver {
    search: Arc<dyn ImageSearch>,
    search_timeout: Duration,
}

impl AsteroidImageResolver {
    pub fn new(search: Arc<dyn ImageSearch>, search_timeout: Duration) -> Self {
        Self {
            search,
            search_timeout,
        }
    }

    /// Resolve an image for any asteroid name. Never fails: upstream errors,
    /// timeouts and aborts all end in the representative image.
    pub async fn resolve(&self, raw_name: &str, abort: &AbortSignal) -> AsteroidImage {
        let name = AsteroidName::parse(raw_name);

        for strategy in STRATEGY_CHAIN {
            let found = match strategy {
                Strategy::ExactName => exact_match(&name),
                Strategy::CatalogNumber => catalog_number_match(&name),
                Strategy::LiveSearch => self.live_search(&name, abort).await,
            };
            if let Some(image) = found {
                debug!(
                    name = %name.display,
                    ?strategy,
                    verified = image.tier.is_verified(),
                    "asteroid image resolved"
                );
                return image;
            }
        }

        let image = representative_match(&name);
        debug!(name = %name.display, url = %image.url, "using representative asteroid image");
        image
    }

    async fn live_search(&self, name: &AsteroidName, abort: &AbortSignal) -> Option<AsteroidImage> {
        for query in search_queries(&name.display) {
            if abort.is_aborted() {
                info!(name = %name.display, "image search aborted");
                return None;
            }

            let attempt = tokio::time::timeout(self.search_timeout, self.search.search(&query));
            let outcome = tokio::select! {
                biased;
                _ = abort.aborted() => {
                    info!(name = %name.display, query = %query, "image search aborted mid-request");
                    return None;
                }
                outcome = attempt => outcome,
            };

            match outcome {
                Ok(Ok(candidates)) => {
                    let best = candidates
                        .into_iter()
                        .find_map(|c| c.into_image(&name.display));
                    if best.is_some() {
                        return best;
                    }
                    debug!(query = %query, "no asteroid imagery in search results");
                }
                // an unreachable search service ends the live stage
                Ok(Err(e)) => {
                    warn!(query = %query, error = %e, "image search failed");
                    return None;
                }
                Err(_) => {
                    warn!(
                        query = %query,
                        timeout_secs = self.search_timeout.as_secs(),
                        "image search timed out"
                    );
                    return None;
                }
            }
        }
        None
    }
}

fn exact_match(name: &AsteroidName) -> Option<AsteroidImage> {
    catalog::by_name(&name.display).map(|entry| AsteroidImage {
        url: entry.url.to_string(),
        title: name.display.clone(),
        description: entry.description.to_string(),
        source: entry.source.to_string(),
        tier: MatchTier::Exact,
    })
}

fn catalog_number_match(name: &AsteroidName) -> Option<AsteroidImage> {
    let number = name.catalog_number.as_deref()?;
    catalog::by_catalog_number(number).map(|entry| AsteroidImage {
        url: entry.url.to_string(),
        title: name.display.clone(),
        description: entry.description.to_string(),
        source: entry.source.to_string(),
        tier: MatchTier::CatalogNumber,
    })
}

fn representative_match(name: &AsteroidName) -> AsteroidImage {
    let kind = catalog::asteroid_type(&name.display, name.number());
    let image = catalog::representative(kind);
    AsteroidImage {
        url: image.url.to_string(),
        title: name.display.clone(),
        description: image.description.to_string(),
        source: image.source.to_string(),
        tier: MatchTier::Representative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSearch {
        results: HashMap<String, Vec<ImageCandidate>>,
        fail: bool,
        delay: Option<Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSearch {
        fn with(mut self, query: &str, results: Vec<ImageCandidate>) -> Self {
            self.results.insert(query.to_string(), results);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageSearch for FakeSearch {
        async fn search(&self, query: &str) -> ApiResult<Vec<ImageCandidate>> {
            self.calls.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ApiError::NotFound("image search offline".into()));
            }
            Ok(self.results.get(query).cloned().unwrap_or_default())
        }
    }

    fn candidate(title: &str, description: &str, href: &str) -> ImageCandidate {
        ImageCandidate {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            href: Some(href.to_string()),
        }
    }

    fn resolver(search: Arc<FakeSearch>) -> AsteroidImageResolver {
        AsteroidImageResolver::new(search, Duration::from_secs(10))
    }

    #[test]
    fn parse_strips_leading_catalog_number() {
        let name = AsteroidName::parse("(2000) LF3");
        assert_eq!(name.display, "LF3");
        assert_eq!(name.catalog_number.as_deref(), Some("2000"));
    }

    #[test]
    fn parse_strips_trailing_designation() {
        let name = AsteroidName::parse("  Bennu (1999 RQ36) ");
        assert_eq!(name.display, "Bennu");
        assert_eq!(name.catalog_number, None);
    }

    #[test]
    fn parse_keeps_non_numeric_parenthetical() {
        let name = AsteroidName::parse("433 Eros (A898 PA)");
        assert_eq!(name.display, "433 Eros (A898 PA)");
    }

    #[test]
    fn parse_bare_designation_keeps_it_visible() {
        let name = AsteroidName::parse("(2025 XY1)");
        assert_eq!(name.display, "2025 XY1");
        assert_eq!(name.catalog_number, None);
    }

    #[test]
    fn candidate_filtering() {
        assert!(candidate("Asteroid Vesta", "", "https://x/1.jpg").depicts_asteroid());
        assert!(candidate("Dawn", "near earth flyby", "https://x/2.jpg").depicts_asteroid());
        assert!(!candidate("Asteroid hauler truck", "", "https://x/3.jpg").depicts_asteroid());
        assert!(!candidate("Asteroid", "rocket launch prep", "https://x/4.jpg").depicts_asteroid());
        assert!(!candidate("Saturn V", "moon mission", "https://x/5.jpg").depicts_asteroid());

        let no_link = ImageCandidate {
            title: Some("Asteroid".into()),
            ..Default::default()
        };
        assert!(!no_link.depicts_asteroid());
    }

    #[tokio::test]
    async fn exact_match_is_stable_and_offline() {
        let search = Arc::new(FakeSearch::default());
        let resolver = resolver(search.clone());

        let first = resolver.resolve("Bennu", &AbortSignal::never()).await;
        for _ in 0..3 {
            assert_eq!(resolver.resolve("Bennu", &AbortSignal::never()).await, first);
        }

        assert_eq!(first.tier, MatchTier::Exact);
        assert_eq!(first.title, "Bennu");
        assert_eq!(first.source, "NASA/Goddard/University of Arizona");
        assert!(search.calls().is_empty());
    }

    #[tokio::test]
    async fn catalog_number_match_uses_description() {
        let search = Arc::new(FakeSearch::default());
        let image = resolver(search.clone())
            .resolve("(433) 1898 DQ", &AbortSignal::never())
            .await;

        assert_eq!(image.tier, MatchTier::CatalogNumber);
        assert_eq!(image.title, "1898 DQ");
        assert!(image.description.contains("433 Eros"));
        assert!(search.calls().is_empty());
    }

    #[tokio::test]
    async fn live_search_picks_first_surviving_candidate() {
        let search = Arc::new(FakeSearch::default().with(
            "asteroid Zeta",
            vec![
                candidate("Asteroid transport truck", "", "https://img/truck.jpg"),
                candidate("Asteroid Zeta", "NEO imaged by radar", "https://img/zeta.jpg"),
                candidate("Asteroid Zeta again", "", "https://img/zeta2.jpg"),
            ],
        ));

        let image = resolver(search.clone()).resolve("Zeta", &AbortSignal::never()).await;

        assert_eq!(image.tier, MatchTier::LiveSearch);
        assert_eq!(image.url, "https://img/zeta.jpg");
        assert_eq!(image.source, "NASA Image Library");
        assert_eq!(search.calls(), vec!["asteroid Zeta"]);
    }

    #[tokio::test]
    async fn live_search_respects_query_order() {
        let search = Arc::new(
            FakeSearch::default()
                .with("asteroid Zeta", vec![candidate("Asteroid rocket", "", "https://img/r.jpg")])
                .with("Zeta asteroid", vec![candidate("Zeta", "an asteroid", "https://img/second.jpg")])
                .with("NEO Zeta", vec![candidate("NEO Zeta", "", "https://img/fourth.jpg")]),
        );

        let image = resolver(search.clone()).resolve("Zeta", &AbortSignal::never()).await;

        assert_eq!(image.url, "https://img/second.jpg");
        assert_eq!(search.calls(), vec!["asteroid Zeta", "Zeta asteroid"]);
    }

    #[tokio::test]
    async fn failing_search_falls_back_to_representative() {
        let search = Arc::new(FakeSearch {
            fail: true,
            ..Default::default()
        });

        let image = resolver(search.clone()).resolve("Zzyyxx123", &AbortSignal::never()).await;

        assert_eq!(image.tier, MatchTier::Representative);
        assert!(image.url.starts_with("https://"));
        assert!(!image.source.is_empty());
        assert_eq!(image.title, "Zzyyxx123");
        assert_eq!(search.calls(), vec!["asteroid Zzyyxx123"]);
    }

    #[tokio::test]
    async fn representative_uses_known_type() {
        let search = Arc::new(FakeSearch::default());
        let image = resolver(search).resolve("16 Psyche", &AbortSignal::never()).await;
        assert_eq!(image.tier, MatchTier::Representative);
        assert!(image.description.contains("M-type"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_search_is_time_boxed() {
        let search = Arc::new(FakeSearch {
            delay: Some(Duration::from_secs(60)),
            ..Default::default()
        }
        .with("asteroid Zeta", vec![candidate("Asteroid Zeta", "", "https://img/late.jpg")]));

        let image = resolver(search.clone()).resolve("Zeta", &AbortSignal::never()).await;

        assert_eq!(image.tier, MatchTier::Representative);
        assert_eq!(search.calls(), vec!["asteroid Zeta"]);
    }

    #[tokio::test]
    async fn filtered_out_results_still_try_later_queries() {
        let search = Arc::new(FakeSearch::default());
        let image = resolver(search.clone()).resolve("Zzyyxx123", &AbortSignal::never()).await;

        assert_eq!(image.tier, MatchTier::Representative);
        assert_eq!(search.calls().len(), 4);
    }

    #[tokio::test]
    async fn aborted_signal_skips_network_but_not_catalog() {
        let search = Arc::new(FakeSearch::default());
        let resolver = resolver(search.clone());
        let (handle, signal) = abort_pair();
        handle.abort();

        let unknown = resolver.resolve("Zeta", &signal).await;
        assert_eq!(unknown.tier, MatchTier::Representative);

        let known = resolver.resolve("Vesta", &signal).await;
        assert_eq!(known.tier, MatchTier::Exact);

        assert!(search.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn abort_interrupts_in_flight_search() {
        let search = Arc::new(FakeSearch {
            delay: Some(Duration::from_secs(60)),
            ..Default::default()
        });
        let resolver = AsteroidImageResolver::new(search.clone(), Duration::from_secs(120));
        let (handle, signal) = abort_pair();

        let (image, _) = tokio::join!(resolver.resolve("Zeta", &signal), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.abort();
        });

        assert_eq!(image.tier, MatchTier::Representative);
        assert_eq!(search.calls(), vec!["asteroid Zeta"]);
    }

    #[tokio::test]
    async fn never_signal_does_not_fire() {
        let signal = AbortSignal::never();
        assert!(!signal.is_aborted());
        let fired = tokio::time::timeout(Duration::from_millis(20), signal.aborted()).await;
        assert!(fired.is_err());
    }
}
