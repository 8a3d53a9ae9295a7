//! Stdin/stdout JSON protocol used by the `hair_bridge` binary.
//!
//! Request: `{"front": "<base64>", "back": "...", "left": "...", "right": "..."}`.
//! All four keys are required. Response is `{"success": true, "results": {...}}`
//! or `{"success": false, "error": "...", "traceback": "..."}`.
use crate::analyzer::{AnalysisResult, HairAnalyzer};
use crate::error::{Error, Result};
use crate::heatmap::sink::ArtifactSink;
use crate::types::View;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BridgeRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
}

impl BridgeRequest {
    pub fn payload(&self, view: View) -> Option<&str> {
        match view {
            View::Front => self.front.as_deref(),
            View::Back => self.back.as_deref(),
            View::Left => self.left.as_deref(),
            View::Right => self.right.as_deref(),
        }
    }

    /// Base64-decode the four payloads in view order.
    pub fn decode(&self) -> Result<Vec<Vec<u8>>> {
        let present: Vec<(View, &str)> = View::ALL
            .into_iter()
            .filter_map(|v| self.payload(v).map(|p| (v, p)))
            .collect();
        if present.len() != View::ALL.len() {
            return Err(Error::ImageCount {
                expected: View::ALL.len(),
                got: present.len(),
            });
        }
        present
            .into_iter()
            .map(|(view, payload)| {
                let compact: Vec<u8> = payload
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace())
                    .collect();
                STANDARD
                    .decode(compact)
                    .map_err(|source| Error::Base64 {
                        view: view.to_string(),
                        source,
                    })
            })
            .collect()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct BridgeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

impl BridgeResponse {
    pub fn ok(results: AnalysisResult) -> Self {
        Self {
            success: true,
            results: Some(results),
            error: None,
            traceback: None,
        }
    }

    pub fn failure(err: &Error) -> Self {
        Self {
            success: false,
            results: None,
            error: Some(err.to_string()),
            traceback: Some(error_chain(err)),
        }
    }
}

/// The error and each of its sources, one per line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut lines = vec![err.to_string()];
    let mut cur = err.source();
    while let Some(e) = cur {
        lines.push(format!("caused by: {e}"));
        cur = e.source();
    }
    lines.join("\n")
}

/// Parse `input`, run the analysis and return the results.
pub fn run_request(
    input: &str,
    analyzer: &HairAnalyzer,
    sink: &dyn ArtifactSink,
) -> Result<AnalysisResult> {
    let request: BridgeRequest = serde_json::from_str(input)?;
    let buffers = request.decode()?;
    analyzer.analyze_encoded(&buffers, None, sink)
}

/// [`run_request`] mapped onto the response shape.
pub fn handle(input: &str, analyzer: &HairAnalyzer, sink: &dyn ArtifactSink) -> BridgeResponse {
    match run_request(input, analyzer, sink) {
        Ok(results) => BridgeResponse::ok(results),
        Err(err) => BridgeResponse::failure(&err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::sink::MemorySink;

    #[test]
    fn missing_view_is_a_count_error() {
        let req: BridgeRequest =
            serde_json::from_str(r#"{"front": "", "back": "", "left": ""}"#).unwrap();
        let err = req.decode().unwrap_err();
        assert_eq!(err.to_string(), "Exactly 4 images required, got 3");
    }

    #[test]
    fn bad_base64_names_the_view() {
        let req = BridgeRequest {
            front: Some("aGVsbG8=".into()),
            back: Some("aGVsbG8=".into()),
            left: Some("aGVsbG8=".into()),
            right: Some("not base64!".into()),
        };
        let err = req.decode().unwrap_err();
        assert!(matches!(err, Error::Base64 { ref view, .. } if view == "right"));
    }

    #[test]
    fn line_wrapped_base64_is_accepted() {
        let wrapped = "aGVs\r\nbG8g\nd29y bGQ=\n";
        let req = BridgeRequest {
            front: Some(wrapped.into()),
            back: Some(" aGVsbG8= ".into()),
            left: Some("aGVsbG8=".into()),
            right: Some("aGVs\tbG8=".into()),
        };
        let out = req.decode().unwrap();
        assert_eq!(out[0], b"hello world");
        assert!(out[1..].iter().all(|b| b == b"hello"));
    }

    #[test]
    fn failure_response_has_stable_shape() {
        let analyzer = HairAnalyzer::default();
        let sink = MemorySink::new();
        let resp = handle("{}", &analyzer, &sink);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("Exactly 4 images required"));
        assert!(json.get("traceback").is_some());
        assert!(json.get("results").is_none());
    }

    #[test]
    fn malformed_json_fails() {
        let analyzer = HairAnalyzer::default();
        let resp = handle("not json", &analyzer, &MemorySink::new());
        assert!(!resp.success);
    }

    #[test]
    fn decode_error_traceback_includes_cause() {
        let analyzer = HairAnalyzer::default();
        let junk = STANDARD.encode(b"junk");
        let input = serde_json::json!({
            "front": junk, "back": junk, "left": junk, "right": junk
        })
        .to_string();
        let resp = handle(&input, &analyzer, &MemorySink::new());
        assert!(!resp.success);
        let tb = resp.traceback.unwrap();
        assert!(tb.contains("Front"));
        assert!(tb.contains("caused by:"));
    }
}
