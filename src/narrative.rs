//! Narrative-generation collaborator.
//!
//! The pipeline treats narrative text as best-effort enrichment from an
//! opaque text-generation service: callers inject a generator, and any
//! failure or timeout degrades to an explicit marker string, never an
//! abort.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::settings::NarrativeSettings;

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service error: {0}")]
    Service(String),
}

/// Bounded selection of derived fields shipped to the text-generation
/// service. Everything here is already computed; the service only writes
/// prose around it.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativePayload {
    pub client_name: String,
    pub cash: f64,
    pub portfolio_total: f64,
    pub net_worth: f64,
    pub liquidity_pct: f64,
    pub income: Option<f64>,
    pub expense: Option<f64>,
    pub savings_rate: f64,
    pub federal_tax: Option<f64>,
    pub secondary_tax: Option<f64>,
    pub risk_classification: String,
    pub compliance_flags: Vec<String>,
}

pub trait NarrativeGenerator {
    fn generate(&self, payload: &NarrativePayload) -> Result<String, NarrativeError>;
}

/// Run the injected generator, substituting the documented marker string on
/// any failure. The pipeline never propagates narrative errors.
pub fn narrative_or_fallback(
    generator: &dyn NarrativeGenerator,
    payload: &NarrativePayload,
) -> String {
    match generator.generate(payload) {
        Ok(text) => text,
        Err(e) => {
            warn!("narrative generation failed: {e}");
            format!("[narrative unavailable: {e}]")
        }
    }
}

const INSTRUCTION_TEMPLATE: &str = "You are a financial communications assistant. Given the \
derived snapshot fields below, write a concise, professional executive summary for the client. \
Focus on liquidity, savings behavior, portfolio concentration and any compliance follow-ups. \
Do not invent figures; use only the values provided.\n\nSnapshot:\n";

// ---------------------------------------------------------------------------
// HTTP implementation (generateContent-style endpoint)
// ---------------------------------------------------------------------------

pub struct HttpNarrativeGenerator {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl HttpNarrativeGenerator {
    pub fn new(settings: &NarrativeSettings) -> Result<Self, NarrativeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

impl NarrativeGenerator for HttpNarrativeGenerator {
    fn generate(&self, payload: &NarrativePayload) -> Result<String, NarrativeError> {
        if self.api_key.is_empty() {
            return Err(NarrativeError::Service("no API key configured".to_string()));
        }

        let prompt = format!(
            "{INSTRUCTION_TEMPLATE}{}",
            serde_json::to_string_pretty(payload)
                .map_err(|e| NarrativeError::Service(format!("payload serialization: {e}")))?
        );
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };

        let url = format!("{}?key={}", self.endpoint, self.api_key);
        info!("calling narrative service");
        let response = self.client.post(&url).json(&request).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(NarrativeError::Service(format!("{status}: {body}")));
        }

        let parsed: GenerateResponse = response.json()?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| NarrativeError::Service("empty response from service".to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

// ---------------------------------------------------------------------------
// Local placeholder (narrative disabled or unconfigured)
// ---------------------------------------------------------------------------

/// Deterministic summary built from the payload alone. Selected when the
/// narrative call is disabled, so runs stay reproducible offline.
pub struct PlaceholderNarrative;

impl NarrativeGenerator for PlaceholderNarrative {
    fn generate(&self, payload: &NarrativePayload) -> Result<String, NarrativeError> {
        let mut out = format!(
            "Automated summary for {}: estimated net worth {:.2}, of which {:.2} is cash \
             ({:.1}% liquidity). Portfolio risk classification: {}.",
            payload.client_name,
            payload.net_worth,
            payload.cash,
            payload.liquidity_pct,
            payload.risk_classification,
        );
        if payload.compliance_flags.is_empty() {
            out.push_str(" No compliance follow-ups identified.");
        } else {
            out.push_str(&format!(
                " Compliance follow-ups: {}.",
                payload.compliance_flags.join("; ")
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NarrativePayload {
        NarrativePayload {
            client_name: "Alex Parker".to_string(),
            cash: 42000.0,
            portfolio_total: 100000.0,
            net_worth: 142000.0,
            liquidity_pct: 29.6,
            income: Some(2000.0),
            expense: Some(800.0),
            savings_rate: 60.0,
            federal_tax: Some(8469.0),
            secondary_tax: Some(6240.0),
            risk_classification: "High concentration".to_string(),
            compliance_flags: vec!["No cost-basis columns present".to_string()],
        }
    }

    struct FailingGenerator;

    impl NarrativeGenerator for FailingGenerator {
        fn generate(&self, _payload: &NarrativePayload) -> Result<String, NarrativeError> {
            Err(NarrativeError::Service("boom".to_string()))
        }
    }

    #[test]
    fn test_payload_serializes_with_optional_fields() {
        let json = serde_json::to_string(&payload()).unwrap();
        assert!(json.contains("Alex Parker"));
        assert!(json.contains("\"income\":2000.0"));
        let mut p = payload();
        p.income = None;
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"income\":null"));
    }

    #[test]
    fn test_fallback_marker_on_error() {
        let text = narrative_or_fallback(&FailingGenerator, &payload());
        assert!(text.starts_with("[narrative unavailable:"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        let a = PlaceholderNarrative.generate(&payload()).unwrap();
        let b = PlaceholderNarrative.generate(&payload()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("Alex Parker"));
        assert!(a.contains("High concentration"));
    }

    #[test]
    fn test_http_generator_requires_api_key() {
        let settings = NarrativeSettings {
            endpoint: "http://localhost:1".to_string(),
            api_key: String::new(),
            timeout_secs: 1,
            enabled: true,
        };
        let generator = HttpNarrativeGenerator::new(&settings).unwrap();
        let err = generator.generate(&payload()).unwrap_err();
        assert!(matches!(err, NarrativeError::Service(_)));
    }
}
