//! Live adapters that talk to the real provider APIs.

pub mod openai;
pub mod stability;

/// Shorten a response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 500;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let mut end = LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::truncate_body;

    #[test]
    fn short_body_unchanged() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_body_truncated() {
        let body = "x".repeat(600);
        let out = truncate_body(&body);
        assert_eq!(out.len(), 503);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "ä".repeat(400);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
    }
}
