use async_trait::async_trait;
use rusoto_sts::{GetCallerIdentityRequest, Sts, StsClient};

use crate::client_factory::timed_call;
use crate::error::InventoryError;
use crate::record::UNAVAILABLE;
use log::warn;
use std::time::Duration;

pub struct CallerIdentityClient {
    client: StsClient,
    timeout: Duration,
}

#[async_trait]
pub trait GetCallerIdentity: Send + Sync {
    async fn caller_arn(&self) -> Result<String, InventoryError>;
}

#[async_trait]
impl GetCallerIdentity for CallerIdentityClient {
    async fn caller_arn(&self) -> Result<String, InventoryError> {
        let response = timed_call(
            "sts:GetCallerIdentity",
            self.timeout,
            self.client
                .get_caller_identity(GetCallerIdentityRequest::default()),
        )
        .await?;
        Ok(response
            .arn
            .or(response.account)
            .unwrap_or_else(|| UNAVAILABLE.to_string()))
    }
}

impl CallerIdentityClient {
    pub fn new_with_client(client: StsClient, timeout: Duration) -> Self {
        CallerIdentityClient { client, timeout }
    }
}

/// The identity shown in the report header; `NA` when it cannot be resolved.
pub async fn describe_caller(source: &dyn GetCallerIdentity) -> String {
    match source.caller_arn().await {
        Ok(arn) => arn,
        Err(error) => {
            warn!("{} failed: {}", error.call_name(), error);
            UNAVAILABLE.to_string()
        }
    }
}
