//! Autenticación
//!
//! Capacidad inyectada que el despachador consulta antes de enrutar. La
//! variante sin autenticación es explícita en la configuración, no un
//! bypass silencioso.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use pos_config::{AuthConfig, AuthMode};
use pos_errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use tracing::warn;

pub enum Authenticator {
    /// Sin autenticación configurada
    Disabled,
    /// Token Bearer estático tomado de la configuración
    StaticToken { token: String },
}

impl Authenticator {
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        match config.mode {
            AuthMode::Disabled => Ok(Self::Disabled),
            AuthMode::Token => config
                .token
                .as_ref()
                .map(|t| Self::StaticToken {
                    token: t.expose_secret().clone(),
                })
                .ok_or_else(|| {
                    AppError::internal("auth.token es obligatorio cuando auth.mode = \"token\"")
                }),
        }
    }

    pub fn authorize(&self, headers: &HeaderMap) -> AppResult<()> {
        match self {
            Self::Disabled => Ok(()),
            Self::StaticToken { token } => {
                let header = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok());

                match header {
                    Some(h) if h.strip_prefix("Bearer ") == Some(token.as_str()) => Ok(()),
                    Some(_) => {
                        warn!("Token de autorización inválido");
                        Err(AppError::unauthorized("No autorizado"))
                    }
                    None => {
                        warn!("Falta la cabecera de autorización");
                        Err(AppError::unauthorized("No autorizado"))
                    }
                }
            }
        }
    }
}

/// Middleware que consulta la capacidad de autenticación antes del
/// despacho de la petición
pub async fn auth_middleware(
    State(auth): State<Arc<Authenticator>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    auth.authorize(request.headers())?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use secrecy::Secret;

    fn headers_con(valor: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(valor).unwrap());
        headers
    }

    #[test]
    fn deshabilitada_permite_todo() {
        let auth = Authenticator::Disabled;
        auth.authorize(&HeaderMap::new()).unwrap();
    }

    #[test]
    fn token_valido_pasa() {
        let auth = Authenticator::StaticToken {
            token: "secreto".to_string(),
        };
        auth.authorize(&headers_con("Bearer secreto")).unwrap();
    }

    #[test]
    fn token_invalido_o_ausente_rechaza() {
        let auth = Authenticator::StaticToken {
            token: "secreto".to_string(),
        };

        let err = auth.authorize(&headers_con("Bearer otro")).unwrap_err();
        assert_eq!(err.to_string(), "No autorizado");

        assert!(auth.authorize(&HeaderMap::new()).is_err());
        assert!(auth.authorize(&headers_con("secreto")).is_err());
    }

    #[test]
    fn configuracion_token_sin_secreto_falla() {
        let config = AuthConfig {
            mode: AuthMode::Token,
            token: None,
        };
        assert!(Authenticator::from_config(&config).is_err());

        let config = AuthConfig {
            mode: AuthMode::Token,
            token: Some(Secret::new("abc".to_string())),
        };
        assert!(matches!(
            Authenticator::from_config(&config).unwrap(),
            Authenticator::StaticToken { .. }
        ));
    }
}
