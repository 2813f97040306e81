//! Wire types for the W3C WebDriver protocol.

use serde::Deserialize;

/// Key under which the WebDriver protocol nests element identifiers.
///
/// Defined by the W3C WebDriver spec; the same constant for every
/// conforming driver.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// `value` payload of a successful `POST /session` response.
#[derive(Debug, Deserialize)]
pub struct NewSessionValue {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// A web element reference as returned by element lookup commands.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    pub id: String,
}

/// Window geometry from `GET /session/{id}/window/rect`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WindowRect {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_element_ref_from_w3c_key() {
        let json = format!(r#"{{"{ELEMENT_KEY}": "abc-123"}}"#);
        let element: ElementRef = serde_json::from_str(&json).unwrap();
        assert_eq!(element.id, "abc-123");
    }

    #[test]
    fn deserializes_window_rect() {
        let json = r#"{"width": 1280.0, "height": 720.0, "x": 0.0, "y": 0.0}"#;
        let rect: WindowRect = serde_json::from_str(json).unwrap();
        assert_eq!(rect.width, 1280.0);
        assert_eq!(rect.height, 720.0);
    }

    #[test]
    fn deserializes_new_session_value() {
        let json = r#"{"sessionId": "f3a1", "capabilities": {"browserName": "chrome"}}"#;
        let value: NewSessionValue = serde_json::from_str(json).unwrap();
        assert_eq!(value.session_id, "f3a1");
    }
}
