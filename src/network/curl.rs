use crate::models::HttpMethod;
use crate::network::client::PreparedRequest;

/// Format a prepared request as a cURL command.
///
/// Bearer tokens are masked unless `reveal_token` is set.
pub fn to_curl(request: &PreparedRequest, reveal_token: bool) -> String {
    let mut parts = vec!["curl".to_string()];

    // Method
    if request.method != HttpMethod::GET {
        parts.push(format!("-X {}", request.method.as_str()));
    }

    // URL
    parts.push(format!("'{}'", shell_quote(&request.url)));

    // Headers
    for header in &request.headers {
        let value = if header.key.eq_ignore_ascii_case("authorization") && !reveal_token {
            redact(&header.value)
        } else {
            header.value.clone()
        };
        parts.push(format!("-H '{}: {}'", shell_quote(&header.key), shell_quote(&value)));
    }

    // Body
    if let Some(body) = request.body.as_deref().filter(|b| !b.is_empty()) {
        parts.push(format!("-d '{}'", shell_quote(body)));
    }

    parts.join(" \\\n  ")
}

/// Escape `'` for use inside a single-quoted shell word.
fn shell_quote(value: &str) -> String {
    value.replace('\'', "'\\''")
}

fn redact(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{} ***", scheme),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Header;

    fn prepared(method: HttpMethod, body: Option<&str>) -> PreparedRequest {
        PreparedRequest {
            method,
            url: "http://localhost:8080/api/itineraries/42".into(),
            headers: vec![
                Header::new("Content-Type", "application/json"),
                Header::new("Authorization", "Bearer secret-token"),
            ],
            body: body.map(String::from),
        }
    }

    #[test]
    fn test_simple_get() {
        let curl = to_curl(&prepared(HttpMethod::GET, None), false);
        assert!(curl.starts_with("curl \\\n  'http://localhost:8080/api/itineraries/42'"));
        assert!(curl.contains("-H 'Authorization: Bearer ***'"));
        assert!(!curl.contains("secret-token"));
        assert!(!curl.contains("-X"));
    }

    #[test]
    fn test_put_with_body_and_token() {
        let curl = to_curl(&prepared(HttpMethod::PUT, Some(r#"{"title":"Bob's trip"}"#)), true);
        assert!(curl.contains("-X PUT"));
        assert!(curl.contains("Bearer secret-token"));
        assert!(curl.contains(r#"-d '{"title":"Bob'\''s trip"}'"#));
    }

    #[test]
    fn test_quotes_in_url_and_headers_are_escaped() {
        let request = PreparedRequest {
            method: HttpMethod::GET,
            url: "http://localhost:8080/api/itineraries/destination/O'Hare".into(),
            headers: vec![Header::new("X-Note", "it's fine")],
            body: None,
        };
        let curl = to_curl(&request, false);
        assert!(curl.contains(r"'http://localhost:8080/api/itineraries/destination/O'\''Hare'"));
        assert!(curl.contains(r"-H 'X-Note: it'\''s fine'"));
    }
}
