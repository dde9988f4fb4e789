use async_trait::async_trait;
use rusoto_s3::{Bucket, S3Client, S3};

use crate::client_factory::timed_call;
use crate::error::InventoryError;
use crate::record::{or_missing, ResourceRecord};
use crate::report::Section;
use log::warn;
use std::time::Duration;

pub const SECTION_TITLE: &str = "S3 BUCKETS";

pub struct S3BucketClient {
    client: S3Client,
    timeout: Duration,
}

#[derive(Debug, PartialEq)]
pub struct BucketRecord {
    pub name: String,
    pub creation_date: String,
}

impl From<Bucket> for BucketRecord {
    fn from(bucket: Bucket) -> Self {
        BucketRecord {
            name: or_missing(bucket.name),
            creation_date: or_missing(bucket.creation_date),
        }
    }
}

impl ResourceRecord for BucketRecord {
    fn columns() -> &'static [&'static str] {
        &["BucketName", "CreationDate"]
    }

    fn fields(&self) -> Vec<String> {
        vec![self.name.clone(), self.creation_date.clone()]
    }
}

#[async_trait]
pub trait ListBuckets: Send + Sync {
    async fn list_all_buckets(&self) -> Result<Vec<Bucket>, InventoryError>;
}

#[async_trait]
impl ListBuckets for S3BucketClient {
    async fn list_all_buckets(&self) -> Result<Vec<Bucket>, InventoryError> {
        let output = timed_call("s3:ListBuckets", self.timeout, self.client.list_buckets()).await?;
        Ok(output.buckets.unwrap_or_default())
    }
}

impl S3BucketClient {
    pub fn new_with_client(client: S3Client, timeout: Duration) -> Self {
        S3BucketClient { client, timeout }
    }
}

/// Builds the S3 section. A failed listing becomes a single error row.
pub async fn collect_buckets(source: &dyn ListBuckets) -> Section {
    match source.list_all_buckets().await {
        Ok(buckets) => {
            let records: Vec<BucketRecord> = buckets.into_iter().map(BucketRecord::from).collect();
            Section::from_records(SECTION_TITLE, &records)
        }
        Err(error) => {
            warn!("{} failed: {}", error.call_name(), error);
            Section::failed::<BucketRecord>(SECTION_TITLE, &error)
        }
    }
}
