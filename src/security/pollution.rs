//! Parameter-pollution guard.
//!
//! # Responsibilities
//! - When a query parameter repeats, keep only the last occurrence
//! - Whitelisted parameters keep every occurrence (array semantics)

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use url::form_urlencoded;

use crate::http::server::AppState;
use crate::security::sanitize::rewrite_query;

pub async fn pollution_guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(query) = req.uri().query() {
        if let Some(collapsed) = collapse_duplicates(query, &state.config.pollution.whitelist) {
            let uri = rewrite_query(req.uri(), &collapsed);
            *req.uri_mut() = uri;
        }
    }
    next.run(req).await
}

/// Collapse duplicate parameters to their last occurrence, preserving pair
/// order otherwise. Returns `None` when nothing was dropped.
fn collapse_duplicates(query: &str, whitelist: &[String]) -> Option<String> {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut dropped = false;
    let mut kept: Vec<&(String, String)> = Vec::with_capacity(pairs.len());
    for (idx, pair) in pairs.iter().enumerate() {
        let (key, _) = pair;
        if whitelist.iter().any(|w| w == key) {
            kept.push(pair);
            continue;
        }
        let is_last = !pairs[idx + 1..].iter().any(|(k, _)| k == key);
        if is_last {
            kept.push(pair);
        } else {
            dropped = true;
        }
    }

    if !dropped {
        return None;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in kept {
        serializer.append_pair(k, v);
    }
    Some(serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist() -> Vec<String> {
        vec!["sort".to_string()]
    }

    #[test]
    fn last_occurrence_wins() {
        let collapsed = collapse_duplicates("status=A&status=B", &whitelist()).unwrap();
        assert_eq!(collapsed, "status=B");
    }

    #[test]
    fn whitelisted_parameters_keep_all_occurrences() {
        assert!(collapse_duplicates("sort=name&sort=-age", &whitelist()).is_none());
    }

    #[test]
    fn unique_parameters_pass_untouched() {
        assert!(collapse_duplicates("status=A&ward=icu", &whitelist()).is_none());
    }

    #[test]
    fn mixed_duplicates_preserve_other_pairs() {
        let collapsed =
            collapse_duplicates("ward=icu&status=A&sort=name&status=B", &whitelist()).unwrap();
        assert_eq!(collapsed, "ward=icu&sort=name&status=B");
    }
}
