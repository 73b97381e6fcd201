use crate::config::RequestContext;
use crate::error::RequestError;
use crate::traits::{HttpTransport, Sleeper};
use crate::utils::http::{HttpRequest, HttpResponse};
use crate::utils::retry::{FailureClass, RetryPolicy};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Wraps a transport with the retry policy.
///
/// Every failed attempt is logged with the context label; only the last
/// failure is returned to the caller.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: RetryPolicy,
}

impl RequestExecutor {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        sleeper: Arc<dyn Sleeper>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    pub async fn execute(
        &self,
        request: HttpRequest,
        ctx: &RequestContext,
    ) -> Result<HttpResponse, RequestError> {
        let mut backoff = self.policy.start();

        loop {
            let failure = match self.transport.send(&request).await {
                Ok(response) if request.accepts(response.status) => {
                    if backoff.attempt() > 1 {
                        debug!(
                            context = %ctx,
                            "{} {} succeeded on attempt {}",
                            request.method,
                            request.url,
                            backoff.attempt()
                        );
                    }
                    return Ok(response);
                }
                Ok(response) => RequestError::http(response.status, response.body),
                Err(e) => e,
            };

            error!(context = %ctx, "Request failed: {}", failure);

            let class = FailureClass::of(&failure);
            let attempt = backoff.attempt();
            match backoff.on_failure(class) {
                Some(wait) => {
                    let reason = if class == FailureClass::ServerError {
                        " due to server error"
                    } else {
                        ""
                    };
                    warn!(
                        context = %ctx,
                        "Retrying {} {} ({}/{}){} in {:.1}s",
                        request.method,
                        request.url,
                        attempt,
                        backoff.max_attempts(),
                        reason,
                        wait.as_secs_f64()
                    );
                    self.sleeper.sleep(wait).await;
                }
                None => return Err(failure),
            }
        }
    }
}
