//! # Support Agent
//!
//! Client for the remote answer service that backs the frame.
//!
//! The service accepts `{ "message": question }` and replies with
//! `{ "message": answer }`. It is trained on the Farcaster docs and takes a
//! few seconds to respond, so every call is bounded by a single timeout.
//!
//! ## Failure
//! - One attempt per question, no retries
//! - Timeout, connection errors, non-2xx statuses and undecodable bodies all
//!   collapse into [`FALLBACK`]
//! - The frame never surfaces an agent failure as an HTTP error
use std::time::Duration;

use anyhow::Error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const AGENT_URL: &str = "https://farcaster-support-agent.fly.dev";
pub const AGENT_TIMEOUT: Duration = Duration::from_millis(4000);

pub const FALLBACK: &str = "It took too long to answer that! Try again, or chat in Converse.";

#[derive(Serialize)]
struct Question<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct Answer {
    message: String,
}

#[derive(Clone, Debug)]
pub struct Agent {
    client: Client,
    url: String,
    timeout: Duration,
}

impl Agent {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }

    /// Sends one question and returns the raw outcome.
    pub async fn ask(&self, query: &str) -> Result<String, Error> {
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&Question { message: query })
            .send()
            .await?
            .error_for_status()?;

        let answer: Answer = response.json().await?;

        Ok(answer.message)
    }

    /// Answer for `query`, or [`FALLBACK`] when the agent could not answer in time.
    pub async fn get_response(&self, query: &str) -> String {
        match self.ask(query).await {
            Ok(answer) => {
                debug!("Agent answered {} chars", answer.len());
                answer
            }
            Err(e) => {
                warn!("Agent failed, using fallback: {e}");
                FALLBACK.to_string()
            }
        }
    }
}
