use serde::{Deserialize, Serialize};

/// Captured page data as the browser extension ships it. Every field is
/// optional on the wire; absent fields deserialize to empty/false.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSnapshot {
    pub url: String,
    pub metadata: Metadata,
    #[serde(rename = "textContent")]
    pub text_content: String,
    #[serde(rename = "domElements")]
    pub dom_elements: DomElements,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DomElements {
    #[serde(rename = "hasPasswordInput")]
    pub has_password_input: bool,
    pub links: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_fills_defaults() {
        let snapshot: PageSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.url, "");
        assert_eq!(snapshot.metadata.title, "");
        assert_eq!(snapshot.text_content, "");
        assert!(!snapshot.dom_elements.has_password_input);
        assert!(snapshot.dom_elements.links.is_empty());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let raw = r#"{
            "url": "http://example.com",
            "metadata": {"title": "Login"},
            "textContent": "Enter password",
            "domElements": {"hasPasswordInput": true, "links": ["http://a"]}
        }"#;
        let snapshot: PageSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.url, "http://example.com");
        assert_eq!(snapshot.metadata.title, "Login");
        assert_eq!(snapshot.text_content, "Enter password");
        assert!(snapshot.dom_elements.has_password_input);
        assert_eq!(snapshot.dom_elements.links, vec!["http://a"]);
    }
}
