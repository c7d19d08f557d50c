//! Signed Bearer Tokens
//!
//! Compact HS256 JSON Web Tokens: `base64url(header).base64url(claims).base64url(mac)`.
//! The signer only knows about the registered `exp` claim; callers bring
//! their own claim struct.

use axum::http::{HeaderMap, header};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::Sha256;
use thiserror::Error;

use crate::crypto::{from_base64_url, to_base64_url};

type HmacSha256 = Hmac<Sha256>;

/// Fixed JOSE header; tokens carrying anything else are rejected
const HEADER_ALG: &str = "HS256";
const HEADER_TYP: &str = "JWT";

/// Token encode/verify errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token algorithm is not supported")]
    UnsupportedAlgorithm,

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token could not be encoded: {0}")]
    Encode(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Only the claim the signer enforces
#[derive(Deserialize)]
struct Expiry {
    exp: i64,
}

/// HMAC-SHA256 token signer/verifier
#[derive(Clone)]
pub struct TokenSigner {
    key: [u8; 32],
}

impl TokenSigner {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.key).map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Sign `claims`; the claim struct must carry a numeric `exp`
    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        let header = Header {
            alg: HEADER_ALG.to_string(),
            typ: HEADER_TYP.to_string(),
        };
        let header_json =
            serde_json::to_vec(&header).map_err(|e| TokenError::Encode(e.to_string()))?;
        let claims_json =
            serde_json::to_vec(claims).map_err(|e| TokenError::Encode(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            to_base64_url(&header_json),
            to_base64_url(&claims_json)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();

        Ok(format!("{}.{}", signing_input, to_base64_url(&signature)))
    }

    /// Verify signature and expiry against the current time
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify signature and expiry against `now` (unix seconds)
    pub fn verify_at<C: DeserializeOwned>(&self, token: &str, now: i64) -> Result<C, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header_json = from_base64_url(header_b64).map_err(|_| TokenError::Malformed)?;
        let header: Header =
            serde_json::from_slice(&header_json).map_err(|_| TokenError::Malformed)?;
        if header.alg != HEADER_ALG {
            return Err(TokenError::UnsupportedAlgorithm);
        }

        let signature = from_base64_url(signature_b64).map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims_json = from_base64_url(claims_b64).map_err(|_| TokenError::Malformed)?;
        let expiry: Expiry =
            serde_json::from_slice(&claims_json).map_err(|_| TokenError::Malformed)?;
        if expiry.exp <= now {
            return Err(TokenError::Expired);
        }

        serde_json::from_slice(&claims_json).map_err(|_| TokenError::Malformed)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of reading the `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerToken<'a> {
    /// No header, or not a `Bearer` scheme
    Missing,
    /// Token text after `Bearer `
    Present(&'a str),
}

/// Extract the bearer token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> BearerToken<'_> {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return BearerToken::Missing;
    };

    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            BearerToken::Present(token.trim())
        }
        _ => BearerToken::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestClaims {
        sub: i64,
        name: String,
        exp: i64,
    }

    fn claims(exp: i64) -> TestClaims {
        TestClaims {
            sub: 7,
            name: "hanako".to_string(),
            exp,
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = TokenSigner::new([1u8; 32]);
        let token = signer.sign(&claims(2_000)).unwrap();

        assert_eq!(token.split('.').count(), 3);
        let decoded: TestClaims = signer.verify_at(&token, 1_000).unwrap();
        assert_eq!(decoded, claims(2_000));
    }

    #[test]
    fn test_expired_token() {
        let signer = TokenSigner::new([1u8; 32]);
        let token = signer.sign(&claims(1_000)).unwrap();

        let result = signer.verify_at::<TestClaims>(&token, 1_000);
        assert_eq!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = TokenSigner::new([1u8; 32]).sign(&claims(2_000)).unwrap();
        let other = TokenSigner::new([2u8; 32]);

        let result = other.verify_at::<TestClaims>(&token, 1_000);
        assert_eq!(result, Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_claims_rejected() {
        let signer = TokenSigner::new([1u8; 32]);
        let token = signer.sign(&claims(2_000)).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let mut forged = claims(2_000);
        forged.sub = 8;
        let forged_b64 = to_base64_url(&serde_json::to_vec(&forged).unwrap());
        let tampered = format!("{}.{}.{}", parts[0], forged_b64, parts[2]);

        let result = signer.verify_at::<TestClaims>(&tampered, 1_000);
        assert_eq!(result, Err(TokenError::BadSignature));
    }

    #[test]
    fn test_none_algorithm_rejected() {
        let signer = TokenSigner::new([1u8; 32]);
        let header = to_base64_url(br#"{"alg":"none","typ":"JWT"}"#);
        let body = to_base64_url(&serde_json::to_vec(&claims(2_000)).unwrap());
        let token = format!("{}.{}.", header, body);

        let result = signer.verify_at::<TestClaims>(&token, 1_000);
        assert_eq!(result, Err(TokenError::UnsupportedAlgorithm));
    }

    #[test]
    fn test_malformed_tokens() {
        let signer = TokenSigner::new([1u8; 32]);
        for token in ["", "abc", "a.b", "a.b.c.d", "!!.??.**"] {
            assert_eq!(
                signer.verify_at::<TestClaims>(token, 0),
                Err(TokenError::Malformed),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), BearerToken::Missing);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&headers), BearerToken::Present("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer xyz"));
        assert_eq!(extract_bearer(&headers), BearerToken::Present("xyz"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(extract_bearer(&headers), BearerToken::Missing);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), BearerToken::Missing);
    }
}
