//! Request DTOs for the panel API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::host::Element;

/// Request body for a selection change (PUT /selection)
///
/// # Fields
/// - `element`: The newly selected element, or null when the selection was cleared
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub element: Option<Element>,
}

impl SelectionRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match &self.element {
            Some(element) if element.id.trim().is_empty() => {
                Some("Element id cannot be empty".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_request_deserialize() {
        let json = r#"{"element": {"id": "abc", "type": "Block"}}"#;
        let req: SelectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.element, Some(Element::new("abc", "Block")));
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_selection_request_cleared() {
        let req: SelectionRequest = serde_json::from_str(r#"{"element": null}"#).unwrap();
        assert!(req.element.is_none());

        let req: SelectionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.element.is_none());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_empty_id() {
        let req = SelectionRequest {
            element: Some(Element::new("  ", "Block")),
        };
        assert!(req.validate().is_some());
    }
}
