//! Input sanitization.
//!
//! # Responsibilities
//! - Strip object keys that the document store would read as query
//!   operators (`$`-prefixed or dotted) from JSON and urlencoded bodies and
//!   from the query string
//! - Neutralize executable-script sequences in string values
//! - Enforce the body cap while the body is buffered here, before any
//!   handler can read it

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, uri::PathAndQuery, HeaderValue, Uri},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use url::form_urlencoded;

use crate::http::error::ApiError;
use crate::http::server::AppState;

pub async fn sanitize_request(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();

    if let Some(query) = parts.uri.query() {
        if let Some(clean) = sanitize_query(query) {
            parts.uri = rewrite_query(&parts.uri, &clean);
        }
    }

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    let body = if content_type.starts_with("application/json") {
        let bytes = to_bytes(body, state.config.limits.body_cap_bytes)
            .await
            .map_err(|_| ApiError::payload_too_large())?;
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(mut value) => {
                scrub_value(&mut value);
                // Re-serialized regardless; handlers parse it again anyway.
                let clean = serde_json::to_vec(&value).map_err(|_| ApiError::bad_request("malformed JSON body"))?;
                parts
                    .headers
                    .insert(header::CONTENT_LENGTH, HeaderValue::from(clean.len()));
                Body::from(clean)
            }
            // Unparseable bodies pass through untouched; the handler's own
            // extractor produces the 400.
            Err(_) => Body::from(bytes),
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let bytes = to_bytes(body, state.config.limits.body_cap_bytes)
            .await
            .map_err(|_| ApiError::payload_too_large())?;
        let clean = sanitize_form(&bytes);
        parts
            .headers
            .insert(header::CONTENT_LENGTH, HeaderValue::from(clean.len()));
        Body::from(clean)
    } else {
        body
    };

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Remove operator keys and neutralize scripts in the query string.
/// Returns `None` when nothing needed to change.
fn sanitize_query(query: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let kept: Vec<(String, String)> = pairs
        .iter()
        .filter(|(k, _)| !is_operator_key(k))
        .map(|(k, v)| (k.clone(), neutralize_scripts(v)))
        .collect();

    if kept == pairs {
        return None;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in &kept {
        serializer.append_pair(k, v);
    }
    Some(serializer.finish())
}

/// Sanitize a urlencoded body the same way as the query string.
fn sanitize_form(bytes: &[u8]) -> Vec<u8> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in form_urlencoded::parse(bytes) {
        if is_operator_key(&k) {
            continue;
        }
        serializer.append_pair(&k, &neutralize_scripts(&v));
    }
    serializer.finish().into_bytes()
}

/// Keys the document store would interpret as query operators.
fn is_operator_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

/// Recursively drop operator keys and neutralize script sequences.
fn scrub_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let banned: Vec<String> = map
                .keys()
                .filter(|k| is_operator_key(k))
                .cloned()
                .collect();
            for key in banned {
                map.remove(&key);
            }
            for nested in map.values_mut() {
                scrub_value(nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                scrub_value(item);
            }
        }
        Value::String(s) => {
            let clean = neutralize_scripts(s);
            if clean != *s {
                *s = clean;
            }
        }
        _ => {}
    }
}

/// Escape `<script` / `</script` openings so the value can no longer carry
/// an executable tag. Other markup is left alone.
fn neutralize_scripts(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (idx, ch) in input.char_indices() {
        if ch == '<' {
            let rest = &input[idx + 1..];
            let rest = rest.strip_prefix('/').unwrap_or(rest);
            if rest
                .get(..6)
                .is_some_and(|p| p.eq_ignore_ascii_case("script"))
            {
                out.push_str("&lt;");
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// Swap the query component of a URI, keeping everything else.
pub(crate) fn rewrite_query(uri: &Uri, query: &str) -> Uri {
    let path_and_query = if query.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), query)
    };
    let mut parts = uri.clone().into_parts();
    match path_and_query.parse::<PathAndQuery>() {
        Ok(pq) => {
            parts.path_and_query = Some(pq);
            Uri::from_parts(parts).unwrap_or_else(|_| uri.clone())
        }
        Err(_) => uri.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_keys_are_stripped_recursively() {
        let mut value = json!({
            "$where": "1==1",
            "name": "Ada",
            "nested": { "a.b": 1, "ok": { "$gt": 5 } },
            "list": [{ "$in": [1] }]
        });
        scrub_value(&mut value);
        assert_eq!(
            value,
            json!({
                "name": "Ada",
                "nested": { "ok": {} },
                "list": [{}]
            })
        );
    }

    #[test]
    fn script_sequences_are_neutralized() {
        assert_eq!(
            neutralize_scripts("<script>alert(1)</script>"),
            "&lt;script>alert(1)&lt;/script>"
        );
        assert_eq!(neutralize_scripts("<SCRIPT src=x>"), "&lt;SCRIPT src=x>");
        // Ordinary comparisons survive.
        assert_eq!(neutralize_scripts("a < b"), "a < b");
        assert_eq!(neutralize_scripts("<b>bold</b>"), "<b>bold</b>");
    }

    #[test]
    fn query_operator_keys_are_dropped() {
        let clean = sanitize_query("$where=1%3D%3D1&status=active").unwrap();
        assert_eq!(clean, "status=active");
    }

    #[test]
    fn clean_query_passes_untouched() {
        assert!(sanitize_query("status=active&ward=icu").is_none());
    }

    #[test]
    fn form_bodies_are_sanitized() {
        let clean = sanitize_form(b"$gt=5&name=Ada");
        assert_eq!(clean, b"name=Ada");
    }
}
