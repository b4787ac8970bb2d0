//! Utilidades JWT
//!
//! Funciones helper para verificar los bearer tokens emitidos por el
//! servicio de identidad. Este backend no emite tokens de login; solo
//! los valida y extrae el claim `userId`.

use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Claims del token tal y como los emite el servicio de identidad
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

impl JwtClaims {
    /// El claim `userId` como Uuid; requerido por el lado de escritura
    pub fn user_uuid(&self) -> Result<Uuid, AppError> {
        self.user_id
            .parse()
            .map_err(|_| AppError::Unauthorized(format!("claim userId inválido: '{}'", self.user_id)))
    }
}

/// Generar un token firmado (usado por herramientas y tests)
pub fn generate_token(
    user_id: Uuid,
    secret: &str,
    expires_in_secs: i64,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(expires_in_secs);

    let claims = JwtClaims {
        user_id: user_id.to_string(),
        email: None,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar un token
pub fn verify_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    let token_data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Unauthorized(format!("token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer el token del header `Authorization: Bearer <token>`
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("header Authorization sin esquema Bearer".to_string()))?;

    if token.is_empty() {
        return Err(AppError::Unauthorized("token vacío".to_string()));
    }

    Ok(token)
}

/// Autenticar una petición a partir de sus headers
pub fn authenticate(headers: &HeaderMap, config: &EnvironmentConfig) -> Result<JwtClaims, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("header Authorization ausente".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    verify_token(token, &config.jwt_secret)
}
