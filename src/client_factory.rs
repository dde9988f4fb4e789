use crate::error::InventoryError;
use rusoto_core::credential::ChainProvider;
use rusoto_core::{Client, HttpClient, Region};
use rusoto_ec2::Ec2Client;
use rusoto_iam::IamClient;
use rusoto_lambda::LambdaClient;
use rusoto_s3::S3Client;
use rusoto_sts::StsClient;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

const CREDENTIALS_TIMEOUT: Duration = Duration::from_millis(500);

/// Builds service clients for regions discovered at runtime.
pub trait ClientFactory: Send + Sync {
    fn ec2(&self, region: Region) -> Ec2Client;
    fn lambda(&self, region: Region) -> LambdaClient;
}

pub struct AwsClientFactory {
    client: Client,
    home_region: Region,
}

impl ClientFactory for AwsClientFactory {
    fn ec2(&self, region: Region) -> Ec2Client {
        Ec2Client::new_with_client(self.client.clone(), region)
    }

    fn lambda(&self, region: Region) -> LambdaClient {
        LambdaClient::new_with_client(self.client.clone(), region)
    }
}

impl AwsClientFactory {
    pub fn new(home_region: &str) -> Result<Self, InventoryError> {
        let mut credentials = ChainProvider::new();
        credentials.set_timeout(CREDENTIALS_TIMEOUT);
        let dispatcher = HttpClient::new()?;
        Ok(AwsClientFactory {
            client: Client::new_with(credentials, dispatcher),
            home_region: resolve_region(home_region, "ec2"),
        })
    }

    pub fn home_ec2(&self) -> Ec2Client {
        self.ec2(self.home_region.clone())
    }

    pub fn s3(&self) -> S3Client {
        S3Client::new_with_client(self.client.clone(), self.home_region.clone())
    }

    pub fn iam(&self) -> IamClient {
        IamClient::new_with_client(self.client.clone(), iam_region(&self.home_region))
    }

    pub fn sts(&self) -> StsClient {
        StsClient::new_with_client(self.client.clone(), self.home_region.clone())
    }
}

/// Maps a region name onto rusoto's `Region`, falling back to the public
/// endpoint naming scheme for regions newer than the SDK.
pub fn resolve_region(name: &str, service: &str) -> Region {
    Region::from_str(name).unwrap_or_else(|_| Region::Custom {
        name: name.to_string(),
        endpoint: format!("https://{}.{}.amazonaws.com", service, name),
    })
}

/// IAM has one endpoint per partition; picks the one `home_region` belongs to.
pub fn iam_region(home_region: &Region) -> Region {
    let name = home_region.name();
    if name.starts_with("cn-") {
        Region::CnNorth1
    } else if name.starts_with("us-gov-") {
        Region::Custom {
            name: "us-gov-west-1".to_string(),
            endpoint: "https://iam.us-gov.amazonaws.com".to_string(),
        }
    } else {
        Region::UsEast1
    }
}

/// Awaits a provider call, failing with `InventoryError::Timeout` once `after`
/// has elapsed.
pub async fn timed_call<T, E, F>(
    call: &'static str,
    after: Duration,
    future: F,
) -> Result<T, InventoryError>
where
    F: Future<Output = Result<T, E>>,
    InventoryError: From<E>,
{
    match tokio::time::timeout(after, future).await {
        Ok(result) => result.map_err(InventoryError::from),
        Err(_) => Err(InventoryError::Timeout { call, after }),
    }
}

#[cfg(test)]
mod tests {
    use crate::client_factory::{iam_region, resolve_region, timed_call};
    use crate::error::InventoryError;
    use rusoto_core::Region;
    use std::time::Duration;

    #[test]
    fn test_resolve_known_region() {
        assert_eq!(resolve_region("eu-west-1", "lambda"), Region::EuWest1);
    }

    #[test]
    fn test_resolve_unknown_region() {
        assert_eq!(
            resolve_region("xx-test-9", "lambda"),
            Region::Custom {
                name: "xx-test-9".to_string(),
                endpoint: "https://lambda.xx-test-9.amazonaws.com".to_string(),
            }
        );
    }

    #[test]
    fn test_iam_region_follows_partition() {
        assert_eq!(iam_region(&Region::EuWest1), Region::UsEast1);
        assert_eq!(iam_region(&Region::CnNorthwest1), Region::CnNorth1);
        assert_eq!(
            iam_region(&Region::UsGovEast1),
            Region::Custom {
                name: "us-gov-west-1".to_string(),
                endpoint: "https://iam.us-gov.amazonaws.com".to_string(),
            }
        );
        assert_eq!(
            iam_region(&resolve_region("cn-south-9", "ec2")),
            Region::CnNorth1
        );
    }

    #[tokio::test]
    async fn test_timed_call_times_out() {
        let result: Result<(), InventoryError> =
            timed_call("s3:ListBuckets", Duration::from_millis(10), async {
                tokio::time::delay_for(Duration::from_secs(5)).await;
                Ok::<(), InventoryError>(())
            })
            .await;

        match result {
            Err(InventoryError::Timeout { call, .. }) => assert_eq!(call, "s3:ListBuckets"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
