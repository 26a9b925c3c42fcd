use std::collections::BTreeSet;

use crate::cache::error::TokenError;
use crate::sources::TokenResponse;

/// Bearer credential held by the token cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub value: String,
    /// token type as reported by the issuer, not interpreted
    pub kind: String,
    /// diagnostics only, never enforced locally
    pub granted_scopes: BTreeSet<String>,
    pub issued_at: i64,           // unix seconds
    pub validity_seconds: u64,
}

impl Credential {
    /// Build a credential from a token endpoint response received at `issued_at`.
    pub fn from_response(response: TokenResponse, issued_at: i64) -> Result<Self, TokenError> {
        if response.access_token.trim().is_empty() {
            return Err(TokenError::MalformedResponse("empty access_token".to_owned()));
        }
        let granted_scopes = response
            .scope
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        Ok(Self {
            value: response.access_token,
            kind: response.token_type,
            granted_scopes,
            issued_at,
            validity_seconds: response.expires_in,
        })
    }

    pub fn expires_at(&self) -> i64 {
        self.issued_at.saturating_add(self.validity_seconds as i64)
    }

    /// A credential inside the safety margin counts as already expired.
    pub fn is_usable_at(&self, now: i64, safety_margin_seconds: u64) -> bool {
        self.expires_at() > now.saturating_add(safety_margin_seconds as i64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn response(expires_in: u64) -> TokenResponse {
        TokenResponse {
            access_token: "abc".to_owned(),
            token_type: "Bearer".to_owned(),
            expires_in,
            scope: "content openid".to_owned(),
        }
    }

    #[test]
    fn expiry_is_issue_time_plus_validity() {
        let credential = Credential::from_response(response(3600), 1_000).unwrap();
        assert_eq!(credential.expires_at(), 4_600);
        assert_eq!(credential.kind, "Bearer");
        assert!(credential.granted_scopes.contains("content"));
        assert!(credential.granted_scopes.contains("openid"));
    }

    #[test]
    fn safety_margin_boundary() {
        let credential = Credential::from_response(response(3600), 0).unwrap();
        assert!(credential.is_usable_at(3000, 60));
        assert!(credential.is_usable_at(3539, 60));
        // exactly at the margin is already expired
        assert!(!credential.is_usable_at(3540, 60));
        assert!(!credential.is_usable_at(3560, 60));
    }

    #[test]
    fn empty_access_token_is_rejected() {
        let mut empty = response(3600);
        empty.access_token = "  ".to_owned();
        let err = Credential::from_response(empty, 0).unwrap_err();
        assert!(matches!(err, TokenError::MalformedResponse(_)));
    }
}
