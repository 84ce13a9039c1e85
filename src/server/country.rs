//! Country-based access control.
//!
//! Every request's client IP is resolved to a country code through an
//! external geolocation endpoint; requests from outside the allowed country
//! are rejected before they reach a handler.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::DbError;

/// How long a geolocation lookup may take before it counts as failed.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct CountryGate {
    client: reqwest::Client,
    lookup_url: String,
    allowed_country: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    country_code: String,
}

impl CountryGate {
    /// `lookup_url` is a template where `{ip}` is replaced with the client
    /// address, e.g. `https://ipapi.co/{ip}/json/`.
    pub fn new(
        client: reqwest::Client,
        lookup_url: impl Into<String>,
        allowed_country: impl Into<String>,
    ) -> Self {
        Self {
            client,
            lookup_url: lookup_url.into(),
            allowed_country: allowed_country.into(),
        }
    }

    /// Resolve `ip` to a country code. An unreachable lookup service yields
    /// an empty country code, which never matches an allowed country; a
    /// reachable one answering badly is an internal error.
    async fn lookup_country(&self, ip: &str) -> Result<String, DbError> {
        let url = self.lookup_url.replace("{ip}", ip);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "country lookup request failed");
                return Ok(String::new());
            }
        };
        if !response.status().is_success() {
            return Err(DbError::Internal(format!(
                "country lookup returned {}",
                response.status()
            )));
        }
        let data: LookupResponse = response
            .json()
            .await
            .map_err(|e| DbError::Internal(format!("country lookup returned invalid JSON: {e}")))?;
        Ok(data.country_code)
    }
}

pub async fn check_country(
    State(gate): State<CountryGate>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let country = match gate.lookup_country(&addr.ip().to_string()).await {
        Ok(country) => country,
        Err(error) => return error.into_response(),
    };
    if country != gate.allowed_country {
        tracing::debug!(%addr, %country, "rejected by country gate");
        return DbError::Forbidden.into_response();
    }
    next.run(request).await
}
