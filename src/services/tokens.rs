//! JWT issuing and verification

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{UserClaims, UserPublic},
};

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    BadSignature,
    Malformed,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TokenError::Expired => "Token has expired",
            TokenError::BadSignature => "Token signature is invalid",
            TokenError::Malformed => "Token is malformed",
        };
        f.write_str(reason)
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// A freshly signed token with the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: UserClaims,
}

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    algorithm: Algorithm,
    validity: Duration,
}

impl TokenService {
    /// Only HMAC algorithms are accepted since signing uses a shared secret
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let algorithm = Algorithm::from_str(&config.jwt_algorithm)
            .ok()
            .filter(|a| matches!(a, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512))
            .ok_or_else(|| {
                AppError::Internal(format!("Unsupported JWT algorithm: {}", config.jwt_algorithm))
            })?;

        Ok(Self {
            secret: config.jwt_secret.clone(),
            algorithm,
            validity: Duration::hours(config.jwt_expiration_hours as i64),
        })
    }

    /// Validity window in seconds
    pub fn expires_in(&self) -> i64 {
        self.validity.num_seconds()
    }

    pub fn issue(&self, user: &UserPublic) -> AppResult<IssuedToken> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, user: &UserPublic, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        self.sign(UserClaims {
            user_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        })
    }

    /// Same identity, new expiry window; the password is not checked again
    pub fn refresh(&self, current: &UserClaims) -> AppResult<IssuedToken> {
        let now = Utc::now();
        self.sign(UserClaims {
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
            ..current.clone()
        })
    }

    pub fn decode(&self, token: &str) -> Result<UserClaims, TokenError> {
        Ok(UserClaims::from_token(token, &self.secret, self.algorithm)?)
    }

    pub fn verify(&self, token: &str) -> Option<UserClaims> {
        self.decode(token).ok()
    }

    fn sign(&self, claims: UserClaims) -> AppResult<IssuedToken> {
        let token = claims
            .create_token(&self.secret, self.algorithm)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;
        Ok(IssuedToken { token, claims })
    }
}
