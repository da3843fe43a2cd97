use std::result::Result as DefaultResult;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{decode as jwt_decode, Algorithm, DecodingKey, Validation as JwtValidation};
use serde::{Deserialize, Serialize};

use crate::confidentiality::AbstractConfidentiality;
use crate::constant::app_meta;
use crate::error::{AppError, AppErrorCode};
use crate::{AppAuthCfg, AppSharedState};

#[derive(Debug, Clone)]
pub enum AuthJwtError {
    MissingAuthHeader,
    InvalidScheme,
    KeystoreFailure,
    VerifyFailure(JwtErrorKind),
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppUserRole {
    Buyer,
    Artisan,
}

/// claim decoded from the bearer token issued by the external identity
/// service, treated as trusted input once signature verification passes
#[derive(Deserialize, Serialize)]
pub struct AppAuthedClaim {
    pub profile: u32,
    pub iat: i64,
    pub exp: i64,
    pub aud: Vec<String>,
    pub role: AppUserRole,
    pub nickname: Option<String>,
    pub email: Option<String>,
}

impl AppAuthedClaim {
    pub fn contain_role(&self, r: AppUserRole) -> bool {
        self.role == r
    }
}

pub trait AbstractAuthKeystore: Send + Sync {
    fn decoding_key(&self) -> DefaultResult<DecodingKey, AppError>;
}

pub struct AppAuthKeystore {
    key: DecodingKey,
}

impl AppAuthKeystore {
    pub fn try_build(
        cfg: &AppAuthCfg,
        confidential: &dyn AbstractConfidentiality,
    ) -> DefaultResult<Self, AppError> {
        let payload = confidential.try_get_payload(cfg.secret_path.as_str())?;
        // the payload is a serialized JSON value, a raw secret has to be
        // stored as a JSON string in the source file
        let secret = serde_json::from_str::<String>(payload.as_str()).map_err(|e| AppError {
            code: AppErrorCode::CryptoFailure,
            detail: Some(format!("auth-secret-malformed: {}", e)),
        })?;
        if secret.is_empty() {
            return Err(AppError {
                code: AppErrorCode::CryptoFailure,
                detail: Some("auth-secret-empty".to_string()),
            });
        }
        let key = DecodingKey::from_secret(secret.as_bytes());
        Ok(Self { key })
    }
}

impl AbstractAuthKeystore for AppAuthKeystore {
    fn decoding_key(&self) -> DefaultResult<DecodingKey, AppError> {
        Ok(self.key.clone())
    }
}

pub fn validate_encoded_token(
    keystore: &dyn AbstractAuthKeystore,
    encoded: &str,
) -> DefaultResult<AppAuthedClaim, AuthJwtError> {
    let key = keystore
        .decoding_key()
        .map_err(|_e| AuthJwtError::KeystoreFailure)?;
    let validator = {
        let aud = [app_meta::LABAL];
        let required_claims = ["profile", "aud", "exp", "iat", "role"];
        let mut v = JwtValidation::new(Algorithm::HS256);
        v.set_audience(&aud);
        v.set_required_spec_claims(&required_claims);
        v
    };
    let decoded = jwt_decode::<AppAuthedClaim>(encoded, &key, &validator)?;
    Ok(decoded.claims)
} // end of fn validate_encoded_token

impl From<JwtError> for AuthJwtError {
    fn from(value: JwtError) -> Self {
        Self::VerifyFailure(value.into_kind())
    }
}

impl AuthJwtError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuthHeader | Self::InvalidScheme => StatusCode::UNAUTHORIZED,
            Self::KeystoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
            Self::VerifyFailure(ekind) => match ekind {
                JwtErrorKind::Json(_d) => StatusCode::BAD_REQUEST,
                JwtErrorKind::InvalidToken => StatusCode::BAD_REQUEST,
                JwtErrorKind::MissingRequiredClaim(_d) => StatusCode::UNAUTHORIZED,
                JwtErrorKind::InvalidAudience
                | JwtErrorKind::InvalidIssuer
                | JwtErrorKind::ExpiredSignature
                | JwtErrorKind::InvalidSignature
                | JwtErrorKind::InvalidAlgorithmName => StatusCode::UNAUTHORIZED,
                _others => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AuthJwtError {
    fn into_response(self) -> Response {
        (self.status_code(), "{}".to_string()).into_response()
    }
}

#[async_trait]
impl FromRequestParts<AppSharedState> for AppAuthedClaim {
    type Rejection = AuthJwtError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppSharedState,
    ) -> DefaultResult<Self, Self::Rejection> {
        let hdr_val = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthJwtError::MissingAuthHeader)?;
        let raw = hdr_val
            .to_str()
            .map_err(|_e| AuthJwtError::InvalidScheme)?;
        let encoded = raw
            .strip_prefix("Bearer ")
            .ok_or(AuthJwtError::InvalidScheme)?;
        let keystore = state.auth_keystore();
        validate_encoded_token(keystore.as_ref().as_ref(), encoded.trim())
    }
} // end of impl FromRequestParts for AppAuthedClaim
