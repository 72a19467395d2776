use crate::analysis::AnalysisResult;
use serde::{Deserialize, Serialize};

pub const DANGER_THRESHOLD: f64 = 75.0;
pub const WARNING_THRESHOLD: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Secure,
    Warning,
    Danger,
}

impl Status {
    /// Boundaries are exclusive upward: exactly 45 is secure, exactly 75
    /// is warning.
    pub fn from_score(score: f64) -> Self {
        if score > DANGER_THRESHOLD {
            Status::Danger
        } else if score > WARNING_THRESHOLD {
            Status::Warning
        } else {
            Status::Secure
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictEnvelope {
    pub status: Status,
    pub message: String,
    #[serde(rename = "aiScore")]
    pub ai_score: f64,
    #[serde(rename = "quantumVerified")]
    pub quantum_verified: bool,
}

impl VerdictEnvelope {
    pub fn new(result: AnalysisResult, quantum_verified: bool) -> Self {
        Self {
            status: Status::from_score(result.risk_score),
            message: result.justification,
            ai_score: result.risk_score,
            quantum_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_up_to_and_including_45() {
        assert_eq!(Status::from_score(0.0), Status::Secure);
        assert_eq!(Status::from_score(45.0), Status::Secure);
    }

    #[test]
    fn warning_above_45_up_to_and_including_75() {
        assert_eq!(Status::from_score(45.0001), Status::Warning);
        assert_eq!(Status::from_score(75.0), Status::Warning);
    }

    #[test]
    fn danger_above_75() {
        assert_eq!(Status::from_score(75.0001), Status::Danger);
        assert_eq!(Status::from_score(100.0), Status::Danger);
    }

    #[test]
    fn envelope_serializes_wire_names() {
        let envelope = VerdictEnvelope::new(
            AnalysisResult {
                risk_score: 80.0,
                justification: "Suspicious login form".to_string(),
            },
            true,
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "danger");
        assert_eq!(json["message"], "Suspicious login form");
        assert_eq!(json["aiScore"], 80.0);
        assert_eq!(json["quantumVerified"], true);
    }
}
