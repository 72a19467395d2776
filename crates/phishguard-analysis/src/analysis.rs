use crate::ai::AiProvider;
use crate::snapshot::PageSnapshot;
use serde_json::Value;
use tracing::warn;

pub const MAX_CONTENT_CHARS: usize = 1500;
pub const MAX_LINKS: usize = 5;

pub const FALLBACK_SCORE: f64 = 50.0;
pub const FALLBACK_JUSTIFICATION: &str = "AI analysis failed. The score is a neutral default.";
pub const DEFAULT_JUSTIFICATION: &str = "No justification provided.";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub risk_score: f64,
    pub justification: String,
}

impl AnalysisResult {
    /// Fail-open neutral verdict used whenever the provider call or
    /// response parsing breaks. Never surfaced to the caller as an error.
    pub fn neutral_fallback() -> Self {
        Self {
            risk_score: FALLBACK_SCORE,
            justification: FALLBACK_JUSTIFICATION.to_string(),
        }
    }
}

pub fn analyze(provider: &dyn AiProvider, snapshot: &PageSnapshot) -> AnalysisResult {
    let prompt = build_prompt(snapshot);
    let raw = match provider.generate(&prompt) {
        Ok(text) => text,
        Err(err) => {
            warn!("ai request failed, using neutral fallback: {}", err.message());
            return AnalysisResult::neutral_fallback();
        }
    };
    parse_response(&raw)
}

pub fn build_prompt(snapshot: &PageSnapshot) -> String {
    let content: String = snapshot.text_content.chars().take(MAX_CONTENT_CHARS).collect();
    let links = &snapshot.dom_elements.links;
    let links = &links[..links.len().min(MAX_LINKS)];
    let password = if snapshot.dom_elements.has_password_input {
        "Yes"
    } else {
        "No"
    };

    format!(
        "Analyze the following website data for phishing and social engineering threats.\n\
         Act as a cybersecurity expert. Provide a detailed analysis and respond ONLY with\n\
         a JSON object containing two keys: \"risk_score\" (a number from 0 to 100) and\n\
         \"justification\" (a brief explanation).\n\
         \n\
         - URL: {}\n\
         - Title: {}\n\
         - Content snippet: \"{}...\"\n\
         - Does it have a password field? {}\n\
         - Links found on page (first 5): {}\n\
         \n\
         Based on this data, what is the phishing risk score and why?\n",
        snapshot.url,
        snapshot.metadata.title,
        content,
        password,
        format_links(links)
    )
}

/// Models often wrap JSON in markdown fences; strip the literal markers
/// before parsing.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "")
}

fn parse_response(raw: &str) -> AnalysisResult {
    let cleaned = strip_fences(raw);
    let value: Value = match serde_json::from_str(cleaned.trim()) {
        Ok(value) => value,
        Err(err) => {
            warn!("ai response was not valid json, using neutral fallback: {err}");
            return AnalysisResult::neutral_fallback();
        }
    };

    // A syntactically valid object with no risk_score scores 0.0, not the
    // neutral 50.0.
    let risk_score = match value.get("risk_score") {
        None => 0.0,
        Some(score) => match coerce_score(score) {
            Some(score) => score,
            None => {
                warn!("ai risk_score was not numeric, using neutral fallback");
                return AnalysisResult::neutral_fallback();
            }
        },
    };

    let justification = match value.get("justification") {
        None => DEFAULT_JUSTIFICATION.to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };

    AnalysisResult {
        risk_score,
        justification,
    }
}

fn coerce_score(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn format_links(links: &[String]) -> String {
    let quoted: Vec<String> = links.iter().map(|link| format!("\"{link}\"")).collect();
    format!("[{}]", quoted.join(", "))
}
