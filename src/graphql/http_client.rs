use serde::Serialize;
use serde::de::DeserializeOwned;

use super::*;

/// Retries transport failures. GraphQL-level errors are answers, not failures, and are
/// returned on the first attempt.
pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<anyhow::Error> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) if err.downcast_ref::<GraphqlError>().is_some() => return Err(err),
            Err(err) => {
                tracing::debug!(attempt = i + 1, error = %format!("{:#}", err), "{} failed", label);
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(std::time::Duration::from_millis(200 * (1 << i)));
                }
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

impl GraphqlClient {
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!(
                "unauthorized (token invalid/expired; run `repoconf console set --url ... --token ... --repo ...`)"
            );
        }
        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            anyhow::bail!("forbidden (insufficient permissions to administer this repository)");
        }
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!(
                "graphql endpoint not found at {} (check the console url)",
                self.endpoint.graphql_url
            );
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }

    pub(super) fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Posts one operation and unwraps `data`, turning an `errors` list into
    /// [`GraphqlError::Response`].
    pub(super) fn execute<V: Serialize, T: DeserializeOwned>(
        &self,
        operation_name: &str,
        query: String,
        variables: V,
    ) -> Result<T> {
        let resp = self
            .client
            .post(&self.endpoint.graphql_url)
            .header(reqwest::header::AUTHORIZATION, self.auth())
            .json(&GraphqlRequest {
                operation_name: operation_name.to_string(),
                query,
                variables,
            })
            .send()
            .with_context(|| format!("{} request", operation_name))?;

        // Some servers answer validation failures with 400 and a regular errors body.
        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            let body: GraphqlResponse<serde_json::Value> = resp
                .json()
                .with_context(|| format!("parse {} error response", operation_name))?;
            if body.errors.is_empty() {
                anyhow::bail!("{} rejected with 400 Bad Request", operation_name);
            }
            return Err(GraphqlError::Response {
                operation: operation_name.to_string(),
                errors: body.errors,
            }
            .into());
        }

        let body: GraphqlResponse<T> = self
            .ensure_ok(resp, operation_name)?
            .json()
            .with_context(|| format!("parse {} response", operation_name))?;
        Ok(body.into_result(operation_name)?)
    }
}
