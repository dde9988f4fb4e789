use crate::client_factory::timed_call;
use crate::error::InventoryError;
use async_trait::async_trait;
use rusoto_ec2::{DescribeRegionsRequest, Ec2, Ec2Client};
use std::time::Duration;

pub struct RegionClient {
    client: Ec2Client,
    timeout: Duration,
}

#[async_trait]
pub trait DescribeRegions: Send + Sync {
    async fn describe_region_names(&self) -> Result<Vec<String>, InventoryError>;
}

#[async_trait]
impl DescribeRegions for RegionClient {
    async fn describe_region_names(&self) -> Result<Vec<String>, InventoryError> {
        let result = timed_call(
            "ec2:DescribeRegions",
            self.timeout,
            self.client
                .describe_regions(DescribeRegionsRequest::default()),
        )
        .await?;

        Ok(result
            .regions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|region| region.region_name)
            .collect())
    }
}

impl RegionClient {
    pub fn new_with_client(client: Ec2Client, timeout: Duration) -> Self {
        RegionClient { client, timeout }
    }
}

/// Fetches the region list once. The result is sorted, deduplicated and never
/// empty.
pub async fn enumerate_regions(
    source: &dyn DescribeRegions,
) -> Result<Vec<String>, InventoryError> {
    let mut regions = source.describe_region_names().await?;
    regions.sort();
    regions.dedup();
    if regions.is_empty() {
        return Err(InventoryError::NoRegions);
    }
    Ok(regions)
}
