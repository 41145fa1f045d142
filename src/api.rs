// API client module: a small blocking client for the ESMFold prediction
// endpoint. One request per run, no retries and no client-side timeout.
//
// The HTTP layer sits behind the `Transport` trait so the request shape
// and the status/JSON handling can be exercised without a network.

use crate::config::Credential;
use crate::error::{FoldError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// NVIDIA-hosted ESMFold endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://health.api.nvidia.com/v1/biology/nvidia/esmfold";

/// Key of the structure list in the prediction response.
pub const STRUCTURES_KEY: &str = "pdbs";

/// Request payload. Serializes to exactly `{"sequence": "..."}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FoldRequest {
    pub sequence: String,
}

impl FoldRequest {
    pub fn new(sequence: impl Into<String>) -> Self {
        FoldRequest {
            sequence: sequence.into(),
        }
    }
}

/// Status and body as received, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one POST and hands back whatever came back. Implementations must
/// not interpret the status code.
pub trait Transport {
    fn post(&self, url: &str, headers: HeaderMap, body: String) -> Result<RawResponse>;
}

/// `reqwest` blocking transport used by the binary.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, headers: HeaderMap, body: String) -> Result<RawResponse> {
        let res = self.client.post(url).headers(headers).body(body).send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        Ok(RawResponse { status, body })
    }
}

/// Parsed prediction response. Only the structure list is interpreted;
/// the rest of the body is kept for diagnostics.
#[derive(Debug, Clone)]
pub struct FoldResponse {
    body: Value,
}

impl FoldResponse {
    pub fn parse(text: &str) -> Result<Self> {
        let body: Value = serde_json::from_str(text)?;
        Ok(FoldResponse { body })
    }

    /// Top-level keys, in document order. Empty when the body is not an object.
    pub fn keys(&self) -> Vec<String> {
        match &self.body {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// First entry of the `pdbs` list.
    pub fn first_structure(&self) -> Result<&str> {
        let shape_error = |reason: &str| FoldError::ResponseShape {
            reason: reason.to_string(),
            keys: self.keys(),
        };

        let map = self
            .body
            .as_object()
            .ok_or_else(|| shape_error("response body is not a JSON object"))?;
        let entries = map
            .get(STRUCTURES_KEY)
            .ok_or_else(|| shape_error("'pdbs' key not found"))?
            .as_array()
            .ok_or_else(|| shape_error("'pdbs' is not a list"))?;
        let first = entries
            .first()
            .ok_or_else(|| shape_error("'pdbs' is empty"))?;
        first
            .as_str()
            .ok_or_else(|| shape_error("first entry of 'pdbs' is not a string"))
    }
}

/// Client for the prediction endpoint. Holds the transport, the endpoint
/// URL and the bearer credential.
pub struct FoldClient<T: Transport> {
    transport: T,
    endpoint: String,
    credential: Credential,
}

impl<T: Transport> FoldClient<T> {
    pub fn new(transport: T, endpoint: impl Into<String>, credential: Credential) -> Self {
        FoldClient {
            transport,
            endpoint: endpoint.into(),
            credential,
        }
    }

    /// Bearer authorization plus JSON accept/content-type headers.
    pub fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.credential.expose()))
            .map_err(|_| FoldError::InvalidCredential)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// POST the sequence and parse the reply. Non-2xx statuses become
    /// `FoldError::Http` carrying the raw body.
    pub fn predict(&self, req: &FoldRequest) -> Result<FoldResponse> {
        let body = serde_json::to_string(req)?;
        info!(
            endpoint = %self.endpoint,
            residues = req.sequence.len(),
            "submitting sequence for structure prediction"
        );

        let res = self.transport.post(&self.endpoint, self.headers()?, body)?;
        debug!(
            status = res.status,
            bytes = res.body.len(),
            "received response"
        );
        if !res.is_success() {
            return Err(FoldError::Http {
                status: res.status,
                body: res.body,
            });
        }

        let parsed = FoldResponse::parse(&res.body)?;
        debug!("response keys: {:?}", parsed.keys());
        Ok(parsed)
    }
}
