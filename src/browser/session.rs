use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::browser::driver::{MouseButton, PageDriver, WaitState};
use crate::cli::config::BrowserConfig;
use crate::error::{CoverageError, Result};

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Navigate { url: String, timeout_ms: u64 },
    NewPage,
    Evaluate { script: String },
    WaitFor { selector: String, state: WaitState, timeout_ms: u64 },
    Click { selector: String, button: MouseButton },
    DoubleClick { selector: String },
    Fill { selector: String, value: String },
    IsVisible { selector: String, timeout_ms: u64 },
    TextContent { selector: String },
    CurrentUrl,
    Wait { duration_ms: u64 },
    Quit,
}

impl BrowserRequest {
    /// Command name as it appears on the wire, for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            BrowserRequest::Navigate { .. } => "navigate",
            BrowserRequest::NewPage => "new_page",
            BrowserRequest::Evaluate { .. } => "evaluate",
            BrowserRequest::WaitFor { .. } => "wait_for",
            BrowserRequest::Click { .. } => "click",
            BrowserRequest::DoubleClick { .. } => "double_click",
            BrowserRequest::Fill { .. } => "fill",
            BrowserRequest::IsVisible { .. } => "is_visible",
            BrowserRequest::TextContent { .. } => "text_content",
            BrowserRequest::CurrentUrl => "current_url",
            BrowserRequest::Wait { .. } => "wait",
            BrowserRequest::Quit => "quit",
        }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
}

/// A persistent browser session backed by browser_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium browser open.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    navigation_timeout_ms: u64,
    closed: bool,
}

impl BrowserSession {
    /// Launch a new browser session by spawning the configured server script.
    pub fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut command = Command::new("node");
        command.arg(&config.server_script);
        if !config.headless {
            command.arg("--headed");
        }
        if config.slow_mo_ms > 0 {
            command.arg(format!("--slow-mo={}", config.slow_mo_ms));
        }
        command.arg(format!("--timeout={}", config.action_timeout_ms));

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| CoverageError::SubprocessSpawn {
                script: config.server_script.clone(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            CoverageError::SessionIO("Failed to capture stdin of browser server".into())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            CoverageError::SessionIO("Failed to capture stdout of browser server".into())
        })?;

        let mut session = BrowserSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
            navigation_timeout_ms: config.navigation_timeout_ms,
            closed: false,
        };

        let response = session.read_response("browser server ready signal")?;
        if !response.ok || response.ready != Some(true) {
            return Err(CoverageError::SessionProtocol {
                command: "launch".into(),
                error: "Did not receive ready signal from browser server".into(),
            });
        }

        debug!(script = %config.server_script, "browser session ready");
        Ok(session)
    }

    fn read_response(&mut self, context: &str) -> Result<BrowserResponse> {
        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            CoverageError::SessionIO(format!("Failed to read from browser server stdout: {}", e))
        })?;

        if line.trim().is_empty() {
            return Err(CoverageError::SessionIO(
                "Empty response from browser server (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| CoverageError::JsonParse {
            context: context.into(),
            source: e,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse> {
        let json = serde_json::to_string(request).map_err(|e| CoverageError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            CoverageError::SessionIO(format!("Failed to write to browser server stdin: {}", e))
        })?;
        self.stdin.flush().map_err(|e| {
            CoverageError::SessionIO(format!("Failed to flush browser server stdin: {}", e))
        })?;

        self.read_response("browser server response")
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(CoverageError::SessionProtocol {
                command: request.name().into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Best-effort: the process may already be gone
        if let Err(e) = self.send(&BrowserRequest::Quit) {
            debug!(error = %e, "quit request not acknowledged");
        }
        if let Err(e) = self.child.wait() {
            warn!(error = %e, "browser server did not exit cleanly");
        }
        Ok(())
    }
}

impl PageDriver for BrowserSession {
    /// Discard the current browser context and open a fresh page.
    fn new_page(&mut self) -> Result<()> {
        self.send_ok(&BrowserRequest::NewPage)?;
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        let timeout_ms = self.navigation_timeout_ms;
        self.send_ok(&BrowserRequest::Navigate {
            url: url.to_string(),
            timeout_ms,
        })?;
        Ok(())
    }

    fn evaluate(&mut self, script: &str) -> Result<Value> {
        let response = self.send_ok(&BrowserRequest::Evaluate {
            script: script.to_string(),
        })?;
        Ok(response.data.unwrap_or(Value::Null))
    }

    fn wait_for(&mut self, selector: &str, state: WaitState, timeout_ms: u64) -> Result<()> {
        self.send_ok(&BrowserRequest::WaitFor {
            selector: selector.to_string(),
            state,
            timeout_ms,
        })?;
        Ok(())
    }

    fn click(&mut self, selector: &str, button: MouseButton) -> Result<()> {
        self.send_ok(&BrowserRequest::Click {
            selector: selector.to_string(),
            button,
        })?;
        Ok(())
    }

    fn double_click(&mut self, selector: &str) -> Result<()> {
        self.send_ok(&BrowserRequest::DoubleClick {
            selector: selector.to_string(),
        })?;
        Ok(())
    }

    fn fill(&mut self, selector: &str, value: &str) -> Result<()> {
        self.send_ok(&BrowserRequest::Fill {
            selector: selector.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }

    fn is_visible(&mut self, selector: &str, timeout_ms: u64) -> Result<bool> {
        let response = self.send_ok(&BrowserRequest::IsVisible {
            selector: selector.to_string(),
            timeout_ms,
        })?;
        Ok(response.visible.unwrap_or(false))
    }

    fn text_content(&mut self, selector: &str) -> Result<Option<String>> {
        let response = self.send_ok(&BrowserRequest::TextContent {
            selector: selector.to_string(),
        })?;
        Ok(response.text)
    }

    fn current_url(&mut self) -> Result<String> {
        let request = BrowserRequest::CurrentUrl;
        let response = self.send_ok(&request)?;
        response.url.ok_or_else(|| CoverageError::SessionProtocol {
            command: request.name().into(),
            error: "No URL in current_url response".into(),
        })
    }

    fn pause(&mut self, ms: u64) -> Result<()> {
        if ms == 0 {
            return Ok(());
        }
        self.send_ok(&BrowserRequest::Wait { duration_ms: ms })?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
