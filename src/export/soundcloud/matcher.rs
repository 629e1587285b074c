//! Fuzzy track matching against the SoundCloud catalog.
//!
//! SoundCloud has no cross-catalog id to go by, and its uploads are
//! user-generated: titles carry "(Official Video)" noise, artists hide
//! in uploader usernames, and half the results for any popular song are
//! remixes and covers. Matching therefore works in two stages:
//!
//! 1. A ladder of search queries, from most to least specific, built
//!    from cleaned title/artist text. The first query whose results
//!    produce an acceptable candidate wins; later rungs only run when
//!    earlier ones come up dry.
//! 2. A scoring pass over each result batch. Exact and substring
//!    agreements add points; candidates that look like derivative works
//!    (remix, cover, live, ...) have their score divided by 3 so an
//!    original upload beats them unless the request itself asks for a
//!    derivative.
//!
//! Search failures are never fatal here - a failed query logs and falls
//! through to the next rung. Only exhausting the whole ladder without a
//! candidate at or above the acceptance threshold yields no match.

use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, warn};

use super::adapter::{self, TrackCandidate};
use crate::export::config::ExportConfig;
use crate::export::domain::ProviderAccount;
use crate::export::http::ApiClient;

/// Keywords that mark a derivative work wherever they appear in a title.
const DERIVATIVE_KEYWORDS: &[&str] = &[
    "mashup",
    "cover",
    "vs",
    "version",
    "rework",
    "flip",
    "dub",
    "instrumental",
    "karaoke",
    "acoustic",
    "live",
    "extended",
];

/// Two-word derivative markers, matched as consecutive words.
const DERIVATIVE_PHRASES: &[(&str, &str)] = &[("radio", "edit"), ("club", "mix")];

/// Keywords that only count when they appear inside `()` or `[]`.
const BRACKET_KEYWORDS: &[&str] = &["remix", "edit", "mix", "vip", "bootleg"];

/// Markers that cut off a featured-artist suffix.
const FEATURING_MARKERS: &[&str] = &["feat.", "feat", "featuring", "ft."];

/// Finds the best SoundCloud track for a title/artist pair.
pub struct TrackMatcher {
    client: Arc<ApiClient>,
    api_base: String,
    search_limit: u32,
    threshold: i64,
}

impl TrackMatcher {
    /// Create a matcher searching the given API base.
    pub fn new(client: Arc<ApiClient>, config: &ExportConfig, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            search_limit: config.search_limit,
            threshold: config.match_threshold,
        }
    }

    /// Find the best-matching track id, or `None` when nothing on the
    /// ladder reaches the acceptance threshold.
    pub async fn best_match(
        &self,
        account: &ProviderAccount,
        title: &str,
        artists: &str,
    ) -> Option<u64> {
        let clean_title = clean_text(title);
        let expanded = expanded_title(title);
        let clean_artists = clean_text(artists);
        // Asking for a remix is the one case where remix results are
        // not penalized
        let target_is_derivative = is_derivative(title);

        let queries = build_queries(&clean_title, &expanded, &clean_artists);
        let mut best: Option<(i64, u64)> = None;

        for query in &queries {
            let candidates = match self.search(account, query).await {
                Ok(candidates) => candidates,
                Err(err) => {
                    // A single failed query is not fatal
                    warn!(query, error = %err, "soundcloud search query failed, trying next");
                    continue;
                }
            };

            for candidate in &candidates {
                let mut score = score_candidate(&candidate.title, &candidate.artist, &clean_title, &clean_artists)
                    .max(score_candidate(
                        &candidate.title,
                        &candidate.artist,
                        &expanded,
                        &clean_artists,
                    ));
                if is_derivative(&candidate.title) && !target_is_derivative {
                    score /= 3;
                }
                // Strict >, so the earliest candidate wins ties
                if best.is_none_or(|(top, _)| score > top) {
                    best = Some((score, candidate.id));
                }
            }

            if let Some((score, id)) = best
                && score >= self.threshold
            {
                debug!(query, score, id, "accepted soundcloud match");
                return Some(id);
            }
        }

        debug!(title, artists, "no soundcloud match above threshold");
        None
    }

    /// One search call: bounded result count, public tracks only,
    /// popularity order.
    async fn search(
        &self,
        account: &ProviderAccount,
        query: &str,
    ) -> Result<Vec<TrackCandidate>, crate::export::domain::ExportError> {
        let url = format!(
            "{}/tracks?q={}&limit={}&sharing=public&order=hotness",
            self.api_base,
            urlencoding::encode(query),
            self.search_limit
        );
        let body = self.client.request(account, Method::GET, &url, None).await?;
        adapter::to_candidates(body)
    }
}

/// Build the ordered, deduplicated query ladder.
///
/// Most specific first: full title plus artists, then progressively
/// looser combinations down to title plus the main artist only.
fn build_queries(clean_title: &str, expanded_title: &str, clean_artists: &str) -> Vec<String> {
    let main_artist = clean_artists
        .split(',')
        .next()
        .map(str::trim)
        .unwrap_or_default();

    let raw = [
        format!("{clean_title} {clean_artists}"),
        format!("{expanded_title} {clean_artists}"),
        clean_title.to_string(),
        expanded_title.to_string(),
        format!("{clean_artists} {clean_title}"),
        format!("{clean_title} {main_artist}"),
        format!("{expanded_title} {main_artist}"),
    ];

    let mut queries: Vec<String> = Vec::with_capacity(raw.len());
    for candidate in raw {
        let trimmed = candidate.trim().to_string();
        if !trimmed.is_empty() && !queries.contains(&trimmed) {
            queries.push(trimmed);
        }
    }
    queries
}

/// Score one candidate against one target title/artist pair.
///
/// All components stack: an exact title match also satisfies the
/// substring and prefix checks.
fn score_candidate(
    candidate_title: &str,
    candidate_artist: &str,
    target_title: &str,
    target_artist: &str,
) -> i64 {
    let ct = candidate_title.to_lowercase();
    let ca = candidate_artist.to_lowercase();
    let tt = target_title.to_lowercase();
    let ta = target_artist.to_lowercase();

    let mut score = 0;

    if !tt.is_empty() && ct == tt {
        score += 100;
    }
    if !ta.is_empty() && ca == ta {
        score += 50;
    }

    let title_contains = !tt.is_empty() && ct.contains(&tt);
    let artist_contains = !ta.is_empty() && ca.contains(&ta);
    if title_contains {
        score += 40;
    }
    if artist_contains {
        score += 30;
    }
    if title_contains && artist_contains {
        score += 20;
    }

    let title_prefix: String = tt.chars().take(4).collect();
    if title_prefix.chars().count() == 4 && ct.contains(&title_prefix) {
        score += 15;
    }
    let artist_prefix: String = ta.chars().take(4).collect();
    if artist_prefix.chars().count() == 4 && ca.contains(&artist_prefix) {
        score += 10;
    }

    score
}

/// True if a title looks like a derivative work (remix, cover, live
/// recording, ...).
pub(crate) fn is_derivative(title: &str) -> bool {
    let words = words_of(title);

    if words
        .iter()
        .any(|w| DERIVATIVE_KEYWORDS.contains(&w.as_str()))
    {
        return true;
    }
    if words
        .windows(2)
        .any(|pair| DERIVATIVE_PHRASES.contains(&(pair[0].as_str(), pair[1].as_str())))
    {
        return true;
    }
    if bracketed_content(title)
        .iter()
        .flat_map(|segment| words_of(segment))
        .any(|w| BRACKET_KEYWORDS.contains(&w.as_str()))
    {
        return true;
    }
    // A bare trailing "remix" ("Song Remix") with no brackets
    matches!(words.last(), Some(last) if last == "remix")
}

/// Normalize a title or artist string for searching: drop bracketed
/// segments, cut featured-artist suffixes, collapse whitespace.
pub(crate) fn clean_text(text: &str) -> String {
    collapse_whitespace(&strip_featuring(&strip_bracketed(text)))
}

/// The title with bracketed content inlined instead of dropped:
/// `"One More Time (Club Mix)"` becomes `"One More Time Club Mix"`.
/// Useful when the parenthetical part is the distinguishing half.
pub(crate) fn expanded_title(text: &str) -> String {
    let unbracketed: String = text
        .chars()
        .map(|c| match c {
            '(' | ')' | '[' | ']' => ' ',
            other => other,
        })
        .collect();
    collapse_whitespace(&strip_featuring(&unbracketed))
}

/// Remove `( ... )` and `[ ... ]` segments, brackets included.
fn strip_bracketed(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            other if depth == 0 => result.push(other),
            _ => {}
        }
    }
    result
}

/// The contents of every `( ... )` / `[ ... ]` segment.
fn bracketed_content(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            other if depth > 0 => current.push(other),
            _ => {}
        }
    }
    segments
}

/// Cut the string at the first featuring marker, dropping the marker
/// and everything after it.
fn strip_featuring(text: &str) -> String {
    let mut kept = Vec::new();
    for word in text.split_whitespace() {
        if FEATURING_MARKERS.contains(&word.to_lowercase().as_str()) {
            break;
        }
        kept.push(word);
    }
    kept.join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase alphanumeric words of a string.
fn words_of(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
