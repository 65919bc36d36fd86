use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Claims read from a JWT-shaped token payload.
///
/// The token is decoded, never verified: signature checks belong to the
/// server. These claims are only used to cross-check the cached profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default, deserialize_with = "text_claim")]
    pub email: Option<String>,

    /// Subject; numeric subjects are rendered as decimal text.
    #[serde(default, deserialize_with = "text_claim")]
    pub sub: Option<String>,

    #[serde(default, deserialize_with = "text_claim")]
    pub role: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenDecodeError {
    #[error("token has {0} segments, expected 3")]
    SegmentCount(usize),

    #[error("token payload is not base64url: {0}")]
    Base64(String),

    #[error("token payload is not a JSON object: {0}")]
    Json(String),
}

impl TokenClaims {
    /// Address the token was issued for: `email`, else `sub`.
    pub fn subject(&self) -> Option<&str> {
        non_empty(&self.email).or_else(|| non_empty(&self.sub))
    }
}

/// Decode the payload segment of a three-part base64url token.
///
/// Trailing `=` padding is tolerated.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenDecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_header, payload, _signature] = segments.as_slice() else {
        return Err(TokenDecodeError::SegmentCount(segments.len()));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenDecodeError::Base64(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| TokenDecodeError::Json(e.to_string()))
}

fn non_empty(claim: &Option<String>) -> Option<&str> {
    claim.as_deref().filter(|s| !s.is_empty())
}

fn text_claim<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_email_and_role() {
        let token = encode_test_token(&json!({"email": "a@x.com", "role": "admin", "exp": 1}));
        let claims = decode_claims(&token).unwrap();

        assert_eq!(claims.email.as_deref(), Some("a@x.com"));
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert_eq!(claims.subject(), Some("a@x.com"));
    }

    #[test]
    fn subject_falls_back_to_sub() {
        let token = encode_test_token(&json!({"sub": "s@x.com"}));
        assert_eq!(decode_claims(&token).unwrap().subject(), Some("s@x.com"));

        let numeric = encode_test_token(&json!({"sub": 42}));
        assert_eq!(decode_claims(&numeric).unwrap().subject(), Some("42"));
    }

    #[test]
    fn empty_email_falls_back_to_sub() {
        let token = encode_test_token(&json!({"email": "", "sub": "a@x.com"}));
        assert_eq!(decode_claims(&token).unwrap().subject(), Some("a@x.com"));

        let both_empty = encode_test_token(&json!({"email": "", "sub": ""}));
        assert_eq!(decode_claims(&both_empty).unwrap().subject(), None);
    }

    #[test]
    fn no_subject_when_payload_is_silent() {
        let token = encode_test_token(&json!({"role": "student", "email": null}));
        assert_eq!(decode_claims(&token).unwrap().subject(), None);
    }

    #[test]
    fn rejects_non_jwt_shapes() {
        assert_eq!(decode_claims("opaque-legacy-token"), Err(TokenDecodeError::SegmentCount(1)));
        assert_eq!(decode_claims("a.b.c.d"), Err(TokenDecodeError::SegmentCount(4)));
        assert!(matches!(decode_claims("x.!!!.y"), Err(TokenDecodeError::Base64(_))));

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("plain text"));
        assert!(matches!(decode_claims(&not_json), Err(TokenDecodeError::Json(_))));
    }

    #[test]
    fn tolerates_padding() {
        let body = base64::engine::general_purpose::URL_SAFE.encode(r#"{"email":"p@x.com"}"#);
        let token = format!("h.{body}.s");
        assert_eq!(decode_claims(&token).unwrap().subject(), Some("p@x.com"));
    }
}
