use crate::config::models::OptimizerSettings;
use crate::error::CliError;
use slategrid::workflows::optimize::{OptimizeError, OptimizeRequest, OptimizeResponse, Optimizer};
use tracing::debug;

/// Optimizer client that POSTs the request as JSON and reads the board from the reply.
pub struct HttpOptimizer {
    client: reqwest::Client,
    url: String,
}

impl HttpOptimizer {
    pub fn new(settings: &OptimizerSettings) -> Result<Self, CliError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("slategrid/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: settings.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Optimizer for HttpOptimizer {
    async fn optimize(&self, request: &OptimizeRequest) -> Result<OptimizeResponse, OptimizeError> {
        debug!(url = %self.url, items = request.items.len(), "Posting optimizer request.");
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| OptimizeError::Transport(Box::new(e)))?;

        response
            .json::<OptimizeResponse>()
            .await
            .map_err(|e| OptimizeError::Transport(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn settings(url: &str) -> OptimizerSettings {
        OptimizerSettings {
            url: url.to_string(),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn client_keeps_the_configured_url() {
        let optimizer = HttpOptimizer::new(&settings("http://127.0.0.1:8000/optimize")).unwrap();
        assert_eq!(optimizer.url(), "http://127.0.0.1:8000/optimize");
    }

    #[tokio::test]
    async fn malformed_url_is_a_transport_error() {
        let optimizer = HttpOptimizer::new(&settings("not a url")).unwrap();
        let request = OptimizeRequest {
            items: Vec::new(),
            width: 6,
            height: 1,
            global_effect_modes: BTreeMap::new(),
        };
        let result = optimizer.optimize(&request).await;
        assert!(matches!(result, Err(OptimizeError::Transport(_))));
    }
}
