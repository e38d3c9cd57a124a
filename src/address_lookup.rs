//! Client for the government address search API.
//!
//! Requests go out once, without retries. Response statuses are classified
//! into [`LookupError`] so callers can tell a throttled request from bad input
//! or an unavailable upstream.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::services::ServiceError;

pub const DEFAULT_LIMIT: u8 = 5;
pub const MAX_LIMIT: u8 = 20;
pub const MIN_QUERY_CHARS: usize = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Granularity of the searched object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    Housenumber,
    Street,
    Locality,
    Municipality,
}

impl AddressKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            AddressKind::Housenumber => "housenumber",
            AddressKind::Street => "street",
            AddressKind::Locality => "locality",
            AddressKind::Municipality => "municipality",
        }
    }
}

impl Display for AddressKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "housenumber" => Ok(AddressKind::Housenumber),
            "street" => Ok(AddressKind::Street),
            "locality" => Ok(AddressKind::Locality),
            "municipality" => Ok(AddressKind::Municipality),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Validated search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressSearch {
    pub q: String,
    pub limit: u8,
    pub kind: Option<AddressKind>,
    pub postcode: Option<String>,
    pub citycode: Option<String>,
    /// Latitude and longitude used to bias results.
    pub near: Option<(f64, f64)>,
    pub autocomplete: Option<bool>,
}

impl AddressSearch {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            limit: DEFAULT_LIMIT,
            kind: None,
            postcode: None,
            citycode: None,
            near: None,
            autocomplete: None,
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.q.clone()), ("limit", self.limit.to_string())];
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.to_string()));
        }
        if let Some(postcode) = &self.postcode {
            pairs.push(("postcode", postcode.clone()));
        }
        if let Some(citycode) = &self.citycode {
            pairs.push(("citycode", citycode.clone()));
        }
        if let Some((lat, lon)) = self.near {
            pairs.push(("lat", lat.to_string()));
            pairs.push(("lon", lon.to_string()));
        }
        if let Some(autocomplete) = self.autocomplete {
            pairs.push(("autocomplete", if autocomplete { "1" } else { "0" }.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// `[longitude, latitude]`.
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AddressProperties {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub score: f64,
    pub id: Option<String>,
    pub name: Option<String>,
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub citycode: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub context: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub importance: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AddressFeature {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: AddressProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AddressFeatureCollection {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<AddressFeature>,
    pub query: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("address search rate limit reached")]
    RateLimited,

    #[error("address search rejected the request: {0}")]
    BadRequest(String),

    #[error("address search failed: {0}")]
    Upstream(String),
}

impl From<LookupError> for ServiceError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::RateLimited => ServiceError::RateLimited,
            LookupError::BadRequest(message) => ServiceError::invalid("q", message),
            LookupError::Upstream(message) => ServiceError::Upstream(message),
        }
    }
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
}

/// Maps a non-success status and its body onto a [`LookupError`].
pub fn classify_status(status: StatusCode, body: &str) -> Option<LookupError> {
    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::TOO_MANY_REQUESTS => LookupError::RateLimited,
        StatusCode::BAD_REQUEST => {
            let message = serde_json::from_str::<UpstreamErrorBody>(body)
                .ok()
                .and_then(|parsed| parsed.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "invalid address search".to_string());
            LookupError::BadRequest(message)
        }
        other => LookupError::Upstream(format!("unexpected status {other}")),
    })
}

#[derive(Debug, Clone)]
pub struct AddressLookupClient {
    http: reqwest::Client,
    base_url: String,
}

impl AddressLookupClient {
    /// Builds a client whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| LookupError::Upstream(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub async fn search(
        &self,
        search: &AddressSearch,
    ) -> Result<AddressFeatureCollection, LookupError> {
        let resp = self
            .http
            .get(&self.base_url)
            .header("Accept", "application/json")
            .query(&search.query_pairs())
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = classify_status(status, &body)
                .unwrap_or_else(|| LookupError::Upstream(format!("unexpected status {status}")));
            log::warn!("address search returned {status}: {err}");
            return Err(err);
        }

        resp.json::<AddressFeatureCollection>().await.map_err(|err| {
            if err.is_timeout() {
                transport_error(err)
            } else {
                LookupError::Upstream(format!("invalid response body: {err}"))
            }
        })
    }
}

fn transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        log::warn!("address search timed out: {err}");
        LookupError::Upstream("address search timed out".to_string())
    } else {
        LookupError::Upstream(err.to_string())
    }
}
