//! Single-attempt HTTP proxy for the authoritative classifier.
//!
//! One request, one bounded attempt, no state between calls. Every failure
//! mode is classified into [`RemoteError`] so the caller can branch on it
//! explicitly instead of unwinding through a catch-all.

use std::time::Instant;

use exovet_core::{CandidateRecord, ClassificationResult, ResultDetails};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{RemoteConfig, RemoteError};

const USER_AGENT: &str = concat!("exovet/", env!("CARGO_PKG_VERSION"));

/// How much of a non-JSON error body to carry into the error message.
const BODY_SNIPPET_LEN: usize = 200;

/// Client for the authoritative classification endpoint.
pub struct RemoteClassifier {
    client: reqwest::Client,
    config: RemoteConfig,
}

/// What the authority actually sent. Everything except the verdict shape is
/// optional here; normalization decides what to repair and what to pass
/// through.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteReply {
    candidate_identifier: Option<String>,
    is_exoplanet: Option<bool>,
    confidence: Option<f64>,
    details: Option<ResultDetails>,
    note: Option<String>,
}

/// Outcome of a connectivity probe. Failures are reported, not propagated.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub endpoint: String,
    pub available: bool,
    pub status: Option<u16>,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

impl RemoteClassifier {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Dispatch one candidate to the authoritative endpoint.
    ///
    /// The record must be complete; the delegated orchestrator validates
    /// before calling. Single attempt, bounded by the configured timeout.
    pub async fn classify(
        &self,
        record: &CandidateRecord,
    ) -> Result<ClassificationResult, RemoteError> {
        info!(
            endpoint = %self.config.endpoint,
            candidate = %record.candidate_identifier,
            "dispatching candidate to authoritative classifier"
        );

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .timeout(self.config.timeout)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(record);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.classify_error(e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.classify_error(e))?;

        if !status.is_success() {
            return Err(RemoteError::Protocol {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        let reply: RemoteReply = serde_json::from_str(&body).map_err(|e| {
            RemoteError::InvalidResponse(format!("{e}; body: {}", snippet(&body)))
        })?;
        Ok(self.normalize(reply, record))
    }

    /// Probe the endpoint with a canned candidate and report reachability,
    /// status, and round-trip latency without failing.
    pub async fn probe(&self) -> ProbeReport {
        let record = probe_record();
        let start = Instant::now();
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .timeout(self.config.timeout)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&record);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) => ProbeReport {
                endpoint: self.config.endpoint.clone(),
                available: true,
                status: Some(response.status().as_u16()),
                latency_ms: Some(start.elapsed().as_millis() as u64),
                error: None,
            },
            Err(e) => {
                let err = self.classify_error(e);
                ProbeReport {
                    endpoint: self.config.endpoint.clone(),
                    available: false,
                    status: None,
                    latency_ms: None,
                    error: Some(format!("{}: {err}", err.kind())),
                }
            }
        }
    }

    /// Map a transport-layer error into the taxonomy.
    fn classify_error(&self, e: reqwest::Error) -> RemoteError {
        if e.is_timeout() {
            RemoteError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            RemoteError::Unavailable(e.to_string())
        } else if e.is_decode() || e.is_body() {
            RemoteError::InvalidResponse(e.to_string())
        } else {
            RemoteError::Unknown(e.to_string())
        }
    }

    /// Normalize a well-formed reply: backfill the identifier from the
    /// request, pass advisory-missing fields through unrepaired.
    fn normalize(&self, reply: RemoteReply, record: &CandidateRecord) -> ClassificationResult {
        if reply.candidate_identifier.is_none() {
            warn!(
                candidate = %record.candidate_identifier,
                "authority omitted candidateIdentifier; backfilling from request"
            );
        }
        if reply.is_exoplanet.is_none() {
            warn!("authority response missing advisory field isExoplanet");
        }
        if reply.confidence.is_none() {
            warn!("authority response missing advisory field confidence");
        }

        ClassificationResult {
            candidate_identifier: reply
                .candidate_identifier
                .unwrap_or_else(|| record.candidate_identifier.clone()),
            is_exoplanet: reply.is_exoplanet,
            confidence: reply.confidence,
            details: reply.details,
            note: reply.note,
        }
    }
}

/// Best-effort error message from a failure body: a JSON `message` field if
/// there is one, else a truncated slice of the raw text.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| snippet(body))
}

fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        return body.to_string();
    }
    let mut end = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

/// Fully-populated synthetic candidate for connectivity checks.
fn probe_record() -> CandidateRecord {
    CandidateRecord {
        candidate_identifier: "connectivity_test".into(),
        koi_period: Some(10.0),
        koi_time0bk: Some(100.0),
        koi_impact: Some(0.5),
        koi_duration: Some(5.0),
        koi_depth: Some(1000.0),
        koi_prad: Some(1.0),
        koi_teq: Some(300.0),
        koi_insol: Some(1.0),
        koi_model_snr: Some(10.0),
        koi_steff: Some(5000.0),
        koi_slogg: Some(4.0),
        koi_srad: Some(1.0),
        ra: Some(0.0),
        dec: Some(0.0),
        koi_kepmag: Some(15.0),
    }
}
