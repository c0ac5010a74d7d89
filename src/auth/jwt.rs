use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{Claims, TokenKind, TokenPair, TokenSubject};
use crate::{config::AuthConfig, error::AppError};

pub const INVALID_TOKEN: &str = "Invalid or expired token";

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

/// Signs and checks access and refresh tokens. Each kind has its own secret,
/// so a token of one kind never verifies as the other.
#[derive(Clone)]
pub struct TokenCodec {
    access: JwtKeys,
    refresh: JwtKeys,
    access_ttl_secs: usize,
    refresh_ttl_secs: usize,
}

impl TokenCodec {
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl_secs: u64,
        refresh_ttl_secs: u64,
    ) -> Self {
        Self {
            access: JwtKeys::from_secret(access_secret),
            refresh: JwtKeys::from_secret(refresh_secret),
            access_ttl_secs: access_ttl_secs as usize,
            refresh_ttl_secs: refresh_ttl_secs as usize,
        }
    }

    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self::new(
            cfg.access_secret.as_bytes(),
            cfg.refresh_secret.as_bytes(),
            cfg.access_ttl_secs,
            cfg.refresh_ttl_secs,
        )
    }

    pub fn issue_access(&self, subject: &TokenSubject) -> Result<String, AppError> {
        let claims = self.claims(subject, TokenKind::Access, &new_jti());
        encode_token(&self.access, &claims)
    }

    pub fn issue_refresh(&self, subject: &TokenSubject) -> Result<String, AppError> {
        let claims = self.claims(subject, TokenKind::Refresh, &new_jti());
        encode_token(&self.refresh, &claims)
    }

    /// Both tokens of a pair carry the same `jti`.
    pub fn issue_pair(&self, subject: &TokenSubject) -> Result<TokenPair, AppError> {
        let jti = new_jti();
        let access = self.claims(subject, TokenKind::Access, &jti);
        let refresh = self.claims(subject, TokenKind::Refresh, &jti);

        Ok(TokenPair {
            access_token: encode_token(&self.access, &access)?,
            refresh_token: encode_token(&self.refresh, &refresh)?,
            refresh_expires_at: unix_to_datetime(refresh.exp),
        })
    }

    /// Any failure collapses into one `Unauthorized` so callers cannot tell
    /// a bad signature from an expired token.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, AppError> {
        let keys = match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &keys.dec, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(kind = ?kind, "token rejected: {err}");
                AppError::unauthorized(INVALID_TOKEN)
            })
    }

    fn claims(&self, subject: &TokenSubject, kind: TokenKind, jti: &str) -> Claims {
        let iat = now_unix();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        Claims {
            user_id: subject.user_id,
            email: subject.email.clone(),
            role: subject.role,
            jti: jti.to_string(),
            iat,
            exp: iat + ttl,
        }
    }
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

fn new_jti() -> String {
    Uuid::new_v4().to_string()
}

fn unix_to_datetime(secs: usize) -> DateTime<FixedOffset> {
    Utc.timestamp_opt(secs as i64, 0)
        .single()
        .unwrap_or_else(Utc::now)
        .fixed_offset()
}
