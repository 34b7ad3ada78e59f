use actix_web::HttpRequest;
use secrecy::{ExposeSecret, Secret};

use crate::configuration::SETTINGS_CONFIG;
use crate::errors::ApiError;

const API_KEY_HEADER: &str = "X-API-Key";

/// Proof that the caller presented the configured key. When no key is
/// configured the check is a no-op; authorization proper lives with the
/// boundary layer in front of this service.
pub struct AuthenticatedCaller;

impl TryFrom<&HttpRequest> for AuthenticatedCaller {
    type Error = ApiError;

    fn try_from(req: &HttpRequest) -> Result<Self, Self::Error> {
        let presented = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if key_matches(presented, SETTINGS_CONFIG.server.api_key.as_ref()) {
            Ok(AuthenticatedCaller)
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

fn key_matches(presented: Option<&str>, expected: Option<&Secret<String>>) -> bool {
    match expected {
        None => true,
        Some(expected) => presented == Some(expected.expose_secret().as_str()),
    }
}

#[cfg(test)]
mod tests {
    use secrecy::Secret;

    use super::key_matches;

    #[test]
    fn open_access_when_no_key_is_configured() {
        assert!(key_matches(None, None));
        assert!(key_matches(Some("anything"), None));
    }

    #[test]
    fn configured_key_must_match_exactly() {
        let expected = Secret::new("test-key".to_string());
        assert!(key_matches(Some("test-key"), Some(&expected)));
        assert!(!key_matches(Some("TEST-KEY"), Some(&expected)));
        assert!(!key_matches(Some("nope"), Some(&expected)));
        assert!(!key_matches(None, Some(&expected)));
    }
}
