//! Dispatch of typed requests to the remote services.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::application::errors::GatewayError;
use crate::application::methods::{BillingMethod, GeoMethod, ReporterMethod, TaxMethod};
use crate::application::ports::{CallOptions, RemoteService};
use crate::domain::Envelope;

/// Per-call timeout for bulk operations (key file upload, tariff rates).
pub const LONG_CALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Remote services reachable through the gateway.
#[derive(Clone)]
pub struct RemoteServices {
    pub billing: Arc<dyn RemoteService>,
    pub tax: Arc<dyn RemoteService>,
    pub geo: Arc<dyn RemoteService>,
    pub reporter: Arc<dyn RemoteService>,
}

/// Serialises requests, invokes the remote method and checks the envelope status.
///
/// Checked calls turn any status other than 200 into [`GatewayError::Rejected`].
/// `*_unchecked` calls return the envelope as-is for handlers that apply their
/// own status mapping.
#[derive(Clone)]
pub struct Gateway {
    services: RemoteServices,
}

impl Gateway {
    pub fn new(services: RemoteServices) -> Self {
        Self { services }
    }

    /// Gateway that routes every service to the same client.
    pub fn single(client: Arc<dyn RemoteService>) -> Self {
        Self::new(RemoteServices {
            billing: client.clone(),
            tax: client.clone(),
            geo: client.clone(),
            reporter: client,
        })
    }

    pub async fn billing<R: Serialize + ?Sized>(
        &self,
        method: BillingMethod,
        request: &R,
    ) -> Result<Envelope, GatewayError> {
        self.billing_with(method, request, CallOptions::default())
            .await
    }

    pub async fn billing_with<R: Serialize + ?Sized>(
        &self,
        method: BillingMethod,
        request: &R,
        options: CallOptions,
    ) -> Result<Envelope, GatewayError> {
        let envelope = self
            .invoke(&self.services.billing, "billing", method.as_str(), request, options)
            .await?;
        check(envelope)
    }

    pub async fn billing_unchecked<R: Serialize + ?Sized>(
        &self,
        method: BillingMethod,
        request: &R,
    ) -> Result<Envelope, GatewayError> {
        self.invoke(
            &self.services.billing,
            "billing",
            method.as_str(),
            request,
            CallOptions::default(),
        )
        .await
    }

    /// Tax service responses carry no status; only transport failures are errors.
    pub async fn tax<R: Serialize + ?Sized>(
        &self,
        method: TaxMethod,
        request: &R,
    ) -> Result<Envelope, GatewayError> {
        self.invoke(
            &self.services.tax,
            "tax",
            method.as_str(),
            request,
            CallOptions::default(),
        )
        .await
    }

    /// Geo responses carry no status either.
    pub async fn geo<R: Serialize + ?Sized>(
        &self,
        method: GeoMethod,
        request: &R,
    ) -> Result<Envelope, GatewayError> {
        self.invoke(
            &self.services.geo,
            "geo",
            method.as_str(),
            request,
            CallOptions::default(),
        )
        .await
    }

    pub async fn reporter<R: Serialize + ?Sized>(
        &self,
        method: ReporterMethod,
        request: &R,
    ) -> Result<Envelope, GatewayError> {
        self.invoke(
            &self.services.reporter,
            "reporter",
            method.as_str(),
            request,
            CallOptions::default(),
        )
        .await
    }

    async fn invoke<R: Serialize + ?Sized>(
        &self,
        client: &Arc<dyn RemoteService>,
        service: &'static str,
        method: &'static str,
        request: &R,
        options: CallOptions,
    ) -> Result<Envelope, GatewayError> {
        let request = serde_json::to_value(request)?;
        debug!(service, method, "dispatching remote call");

        client
            .call(method, request, options)
            .await
            .map_err(|source| {
                error!(service, method, error = %source, "remote call failed");
                GatewayError::Transport {
                    service,
                    method,
                    source,
                }
            })
    }
}

fn check(envelope: Envelope) -> Result<Envelope, GatewayError> {
    if envelope.is_ok() {
        Ok(envelope)
    } else {
        Err(GatewayError::Rejected(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockRemoteService, TransportError};
    use crate::domain::errors;
    use mockall::predicate::eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_billing_passes_method_and_request() {
        let mut billing = MockRemoteService::new();
        billing
            .expect_call()
            .withf(|method, request, options| {
                method == "GetAdminUsers" && request == &json!({}) && options.timeout.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(Envelope::ok().with_field("users", json!([]))));

        let gateway = Gateway::single(Arc::new(billing));
        let envelope = gateway
            .billing(BillingMethod::GetAdminUsers, &json!({}))
            .await
            .unwrap();

        assert_eq!(envelope.field("users"), Some(&json!([])));
    }

    #[tokio::test]
    async fn test_billing_rejects_non_success_status() {
        let mut billing = MockRemoteService::new();
        billing.expect_call().returning(|_, _, _| {
            Ok(Envelope::with_status(
                400,
                errors::INCORRECT_MERCHANT_ID.into(),
            ))
        });

        let gateway = Gateway::single(Arc::new(billing));
        let err = gateway
            .billing(BillingMethod::GetMerchantBy, &json!({"merchant_id": "x"}))
            .await
            .unwrap_err();

        assert_eq!(err.envelope().map(|e| e.status), Some(400));
    }

    #[tokio::test]
    async fn test_unchecked_call_returns_rejected_envelope() {
        let mut billing = MockRemoteService::new();
        billing
            .expect_call()
            .with(eq("GetRoleList"), eq(json!({"type": "system"})), eq(CallOptions::default()))
            .returning(|_, _, _| Ok(Envelope::with_status(404, errors::INVALID_ROLE_TYPE.into())));

        let gateway = Gateway::single(Arc::new(billing));
        let envelope = gateway
            .billing_unchecked(BillingMethod::GetRoleList, &json!({"type": "system"}))
            .await
            .unwrap();

        assert_eq!(envelope.status, 404);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let mut tax = MockRemoteService::new();
        tax.expect_call()
            .returning(|_, _, _| Err(TransportError::Unavailable("no route".into())));

        let gateway = Gateway::single(Arc::new(tax));
        let err = gateway
            .tax(TaxMethod::GetRates, &json!({"limit": 100}))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::Transport {
                service: "tax",
                method: "GetRates",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_long_call_timeout_is_forwarded() {
        let mut billing = MockRemoteService::new();
        billing
            .expect_call()
            .withf(|_, _, options| options.timeout == Some(LONG_CALL_TIMEOUT))
            .returning(|_, _, _| Ok(Envelope::ok()));

        let gateway = Gateway::single(Arc::new(billing));
        gateway
            .billing_with(
                BillingMethod::UploadKeysFile,
                &json!({}),
                CallOptions::with_timeout(LONG_CALL_TIMEOUT),
            )
            .await
            .unwrap();
    }
}
