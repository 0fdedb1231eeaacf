use std::time::Duration;

use sqa_core::error::{codes, AppError};

const LOCAL_HOST_PREFIX: &str = "http://127.0.0.1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_millis(800);

fn unhealthy(status: u16) -> AppError {
    AppError::new(codes::AI_OLLAMA_UNHEALTHY, "Ollama health check failed")
        .with_details(format!("status={status}"))
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    timeout: Duration,
}

/// Accept `http://127.0.0.1` optionally followed by `:<port>` and nothing else.
fn is_local_base_url(base_url: &str) -> bool {
    let Some(rest) = base_url.strip_prefix(LOCAL_HOST_PREFIX) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    let Some(port) = rest.strip_prefix(':') else {
        return false;
    };
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(port.parse::<u16>(), Ok(p) if p != 0)
}

impl OllamaClient {
    /// Create a client for a local Ollama server. Only `127.0.0.1` is accepted.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !is_local_base_url(&base_url) {
            return Err(AppError::new(
                codes::AI_REMOTE_NOT_ALLOWED,
                "Ollama base URL must be localhost (127.0.0.1)",
            )
            .with_details(format!("base_url={base_url}")));
        }

        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe `/api/tags` before spending a long generation timeout on a dead server.
    pub fn health_check(&self) -> Result<(), AppError> {
        let url = format!("{}/api/tags", self.base_url);
        let resp = ureq::get(&url)
            .timeout(HEALTH_CHECK_TIMEOUT.min(self.timeout))
            .call();

        match resp {
            Ok(r) if r.status() == 200 => Ok(()),
            Ok(r) => Err(unhealthy(r.status())),
            Err(ureq::Error::Status(status, _)) => Err(unhealthy(status)),
            Err(e) => Err(AppError::new(
                codes::AI_OLLAMA_UNREACHABLE,
                "Ollama is not reachable on 127.0.0.1",
            )
            .with_details(format!("base_url={}; err={e}", self.base_url))
            .with_retryable(true)),
        }
    }
}
