// Serving loops.
//
// In AWS Lambda the skill speaks the custom runtime protocol over plain HTTP:
// long-poll for the next invocation, answer it, repeat. Outside Lambda it
// answers a single envelope read from stdin, which is handy for trying
// requests locally.

use anyhow::{anyhow, Context as _};
use reqwest::Client;
use serde::Serialize;
use tokio::io::AsyncReadExt;

use super::Skill;

const RUNTIME_API_VERSION: &str = "2018-06-01";
const REQUEST_ID_HEADER: &str = "Lambda-Runtime-Aws-Request-Id";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvocationError {
    error_message: String,
    error_type: &'static str,
}

struct Invocation {
    request_id: String,
    body: String,
}

pub struct LambdaRuntime {
    client: Client,
    base_url: String,
}

impl LambdaRuntime {
    pub fn new(api_host: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("http://{}/{}/runtime", api_host, RUNTIME_API_VERSION),
        }
    }

    /// `None` unless running inside Lambda.
    pub fn from_env() -> Option<Self> {
        std::env::var("AWS_LAMBDA_RUNTIME_API")
            .ok()
            .map(|host| Self::new(&host))
    }

    /// Serves invocations until fetching the next one fails.
    pub async fn run(&self, skill: &Skill) -> anyhow::Result<()> {
        tracing::info!("Lambda runtime loop started");

        loop {
            let invocation = self.next_invocation().await?;
            tracing::debug!(request_id = %invocation.request_id, "Received invocation");

            let result = match skill.handle_json(&invocation.body).await {
                Ok(reply) => self.post_response(&invocation.request_id, &reply).await,
                Err(err) => {
                    tracing::error!(
                        request_id = %invocation.request_id,
                        "Undecodable request envelope: {}",
                        err
                    );
                    self.post_error(&invocation.request_id, err.to_string())
                        .await
                }
            };

            // One lost reply shouldn't take the whole runtime down.
            if let Err(err) = result {
                tracing::error!(
                    request_id = %invocation.request_id,
                    "Failed to report invocation result: {:#}",
                    err
                );
            }
        }
    }

    async fn next_invocation(&self) -> anyhow::Result<Invocation> {
        let response = self
            .client
            .get(format!("{}/invocation/next", self.base_url))
            .send()
            .await
            .context("Failed to fetch next invocation")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Runtime API returned {} for next invocation",
                response.status()
            ));
        }

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Invocation is missing {}", REQUEST_ID_HEADER))?;

        let body = response.text().await.context("Failed to read invocation body")?;
        Ok(Invocation { request_id, body })
    }

    async fn post_response<T: Serialize>(&self, request_id: &str, reply: &T) -> anyhow::Result<()> {
        self.client
            .post(format!("{}/invocation/{}/response", self.base_url, request_id))
            .json(reply)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn post_error(&self, request_id: &str, message: String) -> anyhow::Result<()> {
        let error = InvocationError {
            error_message: message,
            error_type: "InvalidRequestEnvelope",
        };

        self.client
            .post(format!("{}/invocation/{}/error", self.base_url, request_id))
            .json(&error)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Answers one request envelope from stdin and prints the reply to stdout.
pub async fn serve_stdin(skill: &Skill) -> anyhow::Result<()> {
    let mut body = String::new();
    tokio::io::stdin()
        .read_to_string(&mut body)
        .await
        .context("Failed to read request envelope from stdin")?;

    let reply = skill
        .handle_json(&body)
        .await
        .context("Request envelope is not valid JSON")?;

    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}
