use thiserror::Error;

use crate::event::EventRequest;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_PATH_LEN: usize = 2048;
const MAX_REFERRER_LEN: usize = 2048;

/// Why an inbound event was rejected.
///
/// `Malformed` maps to 400, the rest map to 403 at the HTTP layer. Messages
/// are caller-visible and deliberately free of internal detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("invalid {0}")]
    Malformed(&'static str),
    #[error("domain not allowed")]
    DomainNotAllowed,
    #[error("origin mismatch")]
    OriginMismatch,
}

/// Structural validation of the raw payload (spec bounds, no authorization).
pub fn validate_event(event: &EventRequest) -> Result<(), RejectReason> {
    if event.domain.is_empty() || event.domain.len() > MAX_DOMAIN_LEN {
        return Err(RejectReason::Malformed("domain"));
    }
    if !event.path.starts_with('/') || event.path.len() > MAX_PATH_LEN {
        return Err(RejectReason::Malformed("path"));
    }
    if event.referrer.len() > MAX_REFERRER_LEN {
        return Err(RejectReason::Malformed("referrer"));
    }
    if !event.screen_size.is_empty() && !is_screen_size(&event.screen_size) {
        return Err(RejectReason::Malformed("screen_size"));
    }
    Ok(())
}

/// Authorization: allow-list membership plus exact Origin binding.
///
/// An empty allow-list permits all domains. The Origin header must equal
/// `http://` or `https://` + domain exactly so a page cannot attribute
/// traffic to a domain it does not control.
pub fn authorize_event(
    event: &EventRequest,
    allowed_domains: &[String],
    origin: &str,
) -> Result<(), RejectReason> {
    if !allowed_domains.is_empty() && !allowed_domains.iter().any(|d| d == &event.domain) {
        return Err(RejectReason::DomainNotAllowed);
    }
    if origin != format!("http://{}", event.domain) && origin != format!("https://{}", event.domain)
    {
        return Err(RejectReason::OriginMismatch);
    }
    Ok(())
}

/// Exact `<digits>x<digits>` match, e.g. "1920x1080".
fn is_screen_size(s: &str) -> bool {
    match s.split_once('x') {
        Some((w, h)) => {
            !w.is_empty()
                && !h.is_empty()
                && w.chars().all(|c| c.is_ascii_digit())
                && h.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(domain: &str, path: &str) -> EventRequest {
        EventRequest {
            domain: domain.to_string(),
            path: path.to_string(),
            referrer: String::new(),
            screen_size: String::new(),
        }
    }

    #[test]
    fn accepts_a_plain_page_view() {
        assert_eq!(validate_event(&event("a.com", "/x")), Ok(()));
    }

    #[test]
    fn rejects_empty_and_oversized_domain() {
        assert_eq!(
            validate_event(&event("", "/x")),
            Err(RejectReason::Malformed("domain"))
        );
        let long = "d".repeat(254);
        assert_eq!(
            validate_event(&event(&long, "/x")),
            Err(RejectReason::Malformed("domain"))
        );
        // 253 chars is the limit, not past it.
        let max = "d".repeat(253);
        assert_eq!(validate_event(&event(&max, "/x")), Ok(()));
    }

    #[test]
    fn rejects_path_without_leading_slash() {
        assert_eq!(
            validate_event(&event("a.com", "x")),
            Err(RejectReason::Malformed("path"))
        );
    }

    #[test]
    fn rejects_oversized_path_and_referrer() {
        let mut e = event("a.com", "/x");
        e.path = format!("/{}", "p".repeat(2048));
        assert_eq!(validate_event(&e), Err(RejectReason::Malformed("path")));

        let mut e = event("a.com", "/x");
        e.referrer = "r".repeat(2049);
        assert_eq!(validate_event(&e), Err(RejectReason::Malformed("referrer")));
    }

    #[test]
    fn screen_size_pattern() {
        let mut e = event("a.com", "/x");
        e.screen_size = "1920x1080".to_string();
        assert_eq!(validate_event(&e), Ok(()));

        e.screen_size = "abcxdef".to_string();
        assert_eq!(
            validate_event(&e),
            Err(RejectReason::Malformed("screen_size"))
        );

        e.screen_size = "1920x".to_string();
        assert_eq!(
            validate_event(&e),
            Err(RejectReason::Malformed("screen_size"))
        );
    }

    #[test]
    fn allow_list_membership() {
        let allowed = vec!["a.com".to_string()];
        assert_eq!(
            authorize_event(&event("a.com", "/x"), &allowed, "https://a.com"),
            Ok(())
        );
        assert_eq!(
            authorize_event(&event("b.com", "/x"), &allowed, "https://b.com"),
            Err(RejectReason::DomainNotAllowed)
        );
        // Empty allow-list permits all.
        assert_eq!(
            authorize_event(&event("b.com", "/x"), &[], "https://b.com"),
            Ok(())
        );
    }

    #[test]
    fn origin_must_match_domain_exactly() {
        assert_eq!(
            authorize_event(&event("a.com", "/x"), &[], "http://a.com"),
            Ok(())
        );
        assert_eq!(
            authorize_event(&event("a.com", "/x"), &[], "https://evil.com"),
            Err(RejectReason::OriginMismatch)
        );
        assert_eq!(
            authorize_event(&event("a.com", "/x"), &[], "https://a.com.evil.com"),
            Err(RejectReason::OriginMismatch)
        );
        assert_eq!(
            authorize_event(&event("a.com", "/x"), &[], ""),
            Err(RejectReason::OriginMismatch)
        );
    }
}
