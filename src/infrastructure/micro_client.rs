use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::application::ports::{CallOptions, RemoteService, TransportError};
use crate::domain::Envelope;

/// RPC handler names registered by each remote service.
pub const BILLING_HANDLER: &str = "BillingService";
pub const TAX_HANDLER: &str = "TaxService";
pub const GEO_HANDLER: &str = "GeoIpService";
pub const REPORTER_HANDLER: &str = "ReporterService";

#[derive(Debug, Serialize)]
struct RpcCall<'a> {
    service: &'a str,
    endpoint: String,
    request: Value,
}

/// [`RemoteService`] speaking to one service through the micro API gateway.
///
/// Every call is a `POST {base}/rpc` naming the registered service and the
/// `<Handler>.<Method>` endpoint.
#[derive(Clone)]
pub struct MicroClient {
    client: Client,
    rpc_url: String,
    service: String,
    handler: &'static str,
    timeout: Duration,
}

impl MicroClient {
    pub fn new(
        client: Client,
        base_url: &str,
        service: impl Into<String>,
        handler: &'static str,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            rpc_url: format!("{}/rpc", base_url.trim_end_matches('/')),
            service: service.into(),
            handler,
            timeout,
        }
    }

    pub fn endpoint(&self, method: &str) -> String {
        format!("{}.{method}", self.handler)
    }
}

#[async_trait]
impl RemoteService for MicroClient {
    async fn call(
        &self,
        method: &str,
        request: Value,
        options: CallOptions,
    ) -> Result<Envelope, TransportError> {
        let call = RpcCall {
            service: &self.service,
            endpoint: self.endpoint(method),
            request,
        };
        debug!(service = %self.service, endpoint = %call.endpoint, "rpc call");

        let response = self
            .client
            .post(&self.rpc_url)
            .timeout(options.timeout.unwrap_or(self.timeout))
            .json(&call)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
