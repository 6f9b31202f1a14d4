use std::{fs, path::Path, thread, time::Duration};

use log::{debug, warn};
use reqwest::blocking::Client;

use crate::registry::ArtifactRecord;

use super::{RenderError, Renderer};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_BACKOFF: Duration = Duration::from_millis(250);

/// Fetches rendered diagrams from the PlantUML service.
///
/// A failed request is retried up to `max_attempts` attempts in total,
/// waiting a little longer after each failure.
#[derive(Debug, Clone)]
pub struct RemoteRenderer {
    client: Client,
    max_attempts: u32,
    backoff: Duration,
}

impl RemoteRenderer {
    /// Creates a renderer making at most `max_attempts` requests per diagram.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Client`] if the HTTP client cannot be built.
    pub fn new(max_attempts: u32) -> Result<Self, RenderError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RenderError::Client)?;

        Ok(Self {
            client,
            max_attempts: max_attempts.max(1),
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Sets the delay after the first failed attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

impl Renderer for RemoteRenderer {
    fn render(&self, target: &Path, record: &ArtifactRecord) -> Result<(), RenderError> {
        let url = record.url().ok_or_else(|| RenderError::MissingUrl {
            path: target.to_path_buf(),
        })?;

        let mut attempt = 1;
        let body = loop {
            match self.fetch(url) {
                Ok(body) => break body,
                Err(err) if attempt < self.max_attempts => {
                    warn!(url, attempt, err:%; "PlantUML request failed, retrying");
                    thread::sleep(self.backoff * attempt);
                    attempt += 1;
                }
                Err(err) => {
                    return Err(RenderError::Fetch {
                        url: url.to_string(),
                        attempts: attempt,
                        message: err.to_string(),
                    });
                }
            }
        };

        debug!(url, bytes = body.len(); "Fetched rendered diagram");
        fs::write(target, body).map_err(|err| RenderError::write(target, err))
    }
}
