//! Minimal W3C WebDriver client.
//!
//! Speaks the WebDriver wire protocol (JSON over HTTP) directly against a
//! running driver such as chromedriver. Only the handful of commands the
//! watcher needs are implemented: navigation, window geometry, script
//! execution, element lookup, attribute and text reads.
//!
//! # Usage
//!
//! ```rust,ignore
//! let session = WebDriverSession::connect("http://localhost:9515").await?;
//! session.goto("https://example.com").await?;
//! for card in session.find_all("div[class='card']").await? {
//!     let link = card.find("a").await?;
//!     println!("{:?}", link.attribute("href").await?);
//! }
//! session.close().await?;
//! ```

pub mod models;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

pub use models::{ElementRef, NewSessionValue, WindowRect, ELEMENT_KEY};

/// Errors returned by WebDriver commands.
#[derive(Debug, Error)]
pub enum WebDriverError {
    /// HTTP transport failed before a protocol response was read
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The driver answered with a protocol-level error
    #[error("webdriver error: {error}: {message}")]
    Api { error: String, message: String },

    /// The driver answered with a payload we could not decode
    #[error("unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),
}

impl WebDriverError {
    /// True when the driver reported `no such element` for a lookup.
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Self::Api { error, .. } if error == "no such element")
    }
}

/// Result type alias for WebDriver commands.
pub type Result<T> = std::result::Result<T, WebDriverError>;

/// Unwrap the `value` field of a WebDriver response, mapping protocol
/// errors to [`WebDriverError::Api`].
async fn unwrap_value(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let mut body: Value = response.json().await?;
    let value = body
        .get_mut("value")
        .map(Value::take)
        .unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }

    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Err(WebDriverError::Api { error, message })
}

async fn get_value(client: &Client, url: String) -> Result<Value> {
    let response = client.get(url).send().await?;
    unwrap_value(response).await
}

async fn post_value(client: &Client, url: String, body: Value) -> Result<Value> {
    let response = client.post(url).json(&body).send().await?;
    unwrap_value(response).await
}

/// A live browser session on a WebDriver server.
///
/// Cheap to clone; clones share the same underlying session.
#[derive(Debug, Clone)]
pub struct WebDriverSession {
    client: Client,
    session_url: String,
}

impl WebDriverSession {
    /// Open a new session against a WebDriver server, e.g.
    /// `http://localhost:9515` for chromedriver.
    pub async fn connect(server_url: &str) -> Result<Self> {
        let client = Client::new();
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": { "browserName": "chrome" }
            }
        });

        let base = server_url.trim_end_matches('/');
        let value = post_value(&client, format!("{base}/session"), capabilities).await?;
        let session: NewSessionValue = serde_json::from_value(value)?;
        debug!(session_id = %session.session_id, "WebDriver session created");

        Ok(Self {
            session_url: format!("{base}/session/{}", session.session_id),
            client,
        })
    }

    /// Navigate the browser to a URL.
    pub async fn goto(&self, url: &str) -> Result<()> {
        post_value(
            &self.client,
            format!("{}/url", self.session_url),
            json!({ "url": url }),
        )
        .await?;
        Ok(())
    }

    /// Read the geometry of the current window.
    pub async fn window_rect(&self) -> Result<WindowRect> {
        let value = get_value(&self.client, format!("{}/window/rect", self.session_url)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Execute a synchronous script in the page, returning its result.
    pub async fn execute(&self, script: &str) -> Result<Value> {
        post_value(
            &self.client,
            format!("{}/execute/sync", self.session_url),
            json!({ "script": script, "args": [] }),
        )
        .await
    }

    /// Find all elements matching a CSS selector. An empty match is not
    /// an error.
    pub async fn find_all(&self, selector: &str) -> Result<Vec<Element>> {
        let value = post_value(
            &self.client,
            format!("{}/elements", self.session_url),
            json!({ "using": "css selector", "value": selector }),
        )
        .await?;
        let refs: Vec<ElementRef> = serde_json::from_value(value)?;
        Ok(refs
            .into_iter()
            .map(|element| Element {
                client: self.client.clone(),
                session_url: self.session_url.clone(),
                id: element.id,
            })
            .collect())
    }

    /// End the session and close the browser window.
    pub async fn close(self) -> Result<()> {
        let response = self.client.delete(self.session_url).send().await?;
        unwrap_value(response).await?;
        Ok(())
    }
}

/// A handle to a single element within a session.
#[derive(Debug, Clone)]
pub struct Element {
    client: Client,
    session_url: String,
    id: String,
}

impl Element {
    fn url(&self, suffix: &str) -> String {
        format!("{}/element/{}/{}", self.session_url, self.id, suffix)
    }

    /// Find the first descendant matching a CSS selector. Fails with a
    /// `no such element` protocol error when nothing matches.
    pub async fn find(&self, selector: &str) -> Result<Element> {
        let value = post_value(
            &self.client,
            self.url("element"),
            json!({ "using": "css selector", "value": selector }),
        )
        .await?;
        let element: ElementRef = serde_json::from_value(value)?;
        Ok(Element {
            client: self.client.clone(),
            session_url: self.session_url.clone(),
            id: element.id,
        })
    }

    /// Read an attribute, `None` when the attribute is not present.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let value = get_value(&self.client, self.url(&format!("attribute/{name}"))).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Read the rendered text of the element.
    pub async fn text(&self) -> Result<String> {
        let value = get_value(&self.client, self.url("text")).await?;
        Ok(serde_json::from_value(value)?)
    }
}
