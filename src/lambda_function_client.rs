use async_trait::async_trait;
use rusoto_lambda::{FunctionConfiguration, Lambda, ListFunctionsRequest};

use crate::client_factory::{resolve_region, timed_call, ClientFactory};
use crate::error::InventoryError;
use crate::record::{or_missing, ResourceRecord};
use crate::report::{RegionOutcome, Section};
use log::{debug, warn};
use std::time::Duration;

pub const SECTION_TITLE: &str = "LAMBDA FUNCTIONS";

pub struct LambdaFunctionClient<'a> {
    factory: &'a dyn ClientFactory,
    timeout: Duration,
}

#[derive(Debug, PartialEq)]
pub struct FunctionRecord {
    pub region: String,
    pub function_name: String,
    pub runtime: String,
    pub memory_size: String,
    pub timeout: String,
    pub last_modified: String,
    pub role: String,
}

impl FunctionRecord {
    fn from_configuration(region: &str, function: FunctionConfiguration) -> Self {
        FunctionRecord {
            region: region.to_string(),
            function_name: or_missing(function.function_name),
            runtime: or_missing(function.runtime),
            memory_size: or_missing(function.memory_size.map(|size| size.to_string())),
            timeout: or_missing(function.timeout.map(|seconds| seconds.to_string())),
            last_modified: or_missing(function.last_modified),
            role: or_missing(function.role),
        }
    }
}

impl ResourceRecord for FunctionRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "Region",
            "FunctionName",
            "Runtime",
            "MemorySize",
            "Timeout",
            "LastModified",
            "Role",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.region.clone(),
            self.function_name.clone(),
            self.runtime.clone(),
            self.memory_size.clone(),
            self.timeout.clone(),
            self.last_modified.clone(),
            self.role.clone(),
        ]
    }
}

#[async_trait]
pub trait ListFunctions: Send + Sync {
    async fn list_region_functions(
        &self,
        region: &str,
    ) -> Result<Vec<FunctionConfiguration>, InventoryError>;
}

#[async_trait]
impl<'a> ListFunctions for LambdaFunctionClient<'a> {
    async fn list_region_functions(
        &self,
        region: &str,
    ) -> Result<Vec<FunctionConfiguration>, InventoryError> {
        let client = self.factory.lambda(resolve_region(region, "lambda"));
        let response = timed_call(
            "lambda:ListFunctions",
            self.timeout,
            client.list_functions(ListFunctionsRequest::default()),
        )
        .await?;

        Ok(response.functions.unwrap_or_default())
    }
}

impl<'a> LambdaFunctionClient<'a> {
    pub fn new(factory: &'a dyn ClientFactory, timeout: Duration) -> Self {
        LambdaFunctionClient { factory, timeout }
    }
}

async fn list_region(source: &dyn ListFunctions, region: &str) -> RegionOutcome<FunctionRecord> {
    match source.list_region_functions(region).await {
        Ok(functions) if functions.is_empty() => RegionOutcome::NoData,
        Ok(functions) => RegionOutcome::Rows(
            functions
                .into_iter()
                .map(|function| FunctionRecord::from_configuration(region, function))
                .collect(),
        ),
        Err(error) => RegionOutcome::Failed(error),
    }
}

/// Visits `regions` in order and builds the Lambda section, returning the
/// regions whose listing failed alongside it.
pub async fn collect_functions(
    source: &dyn ListFunctions,
    regions: &[String],
) -> (Section, Vec<String>) {
    let mut records = Vec::new();
    let mut failed_regions = Vec::new();
    for region in regions {
        match list_region(source, region).await {
            RegionOutcome::Rows(rows) => {
                debug!("{}: {} functions", region, rows.len());
                records.extend(rows);
            }
            RegionOutcome::NoData => debug!("{}: no functions", region),
            RegionOutcome::Failed(error) => {
                warn!("{} failed in {}: {}", error.call_name(), region, error);
                failed_regions.push(region.clone());
            }
        }
    }
    (Section::from_records(SECTION_TITLE, &records), failed_regions)
}

#[cfg(test)]
mod tests {
    use crate::client_factory::ClientFactory;
    use crate::error::InventoryError;
    use crate::lambda_function_client::{
        collect_functions, LambdaFunctionClient, ListFunctions,
    };
    use async_trait::async_trait;
    use rusoto_core::Region;
    use rusoto_ec2::Ec2Client;
    use rusoto_lambda::{FunctionConfiguration, LambdaClient};
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use std::time::Duration;

    // eu-west-1 answers with the canned listing, every other region is denied.
    struct MockFactory;

    impl ClientFactory for MockFactory {
        fn ec2(&self, region: Region) -> Ec2Client {
            Ec2Client::new_with(
                MockRequestDispatcher::with_status(500),
                MockCredentialsProvider,
                region,
            )
        }

        fn lambda(&self, region: Region) -> LambdaClient {
            let dispatcher = if region.name() == "eu-west-1" {
                MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                    "test_resources/valid",
                    "list_functions.json",
                ))
            } else {
                MockRequestDispatcher::with_status(403).with_body(
                    r#"{"Type":"User","message":"not authorized to perform lambda:ListFunctions"}"#,
                )
            };
            LambdaClient::new_with(dispatcher, MockCredentialsProvider, region)
        }
    }

    struct StubFunctions;

    #[async_trait]
    impl ListFunctions for StubFunctions {
        async fn list_region_functions(
            &self,
            region: &str,
        ) -> Result<Vec<FunctionConfiguration>, InventoryError> {
            match region {
                "eu-west-1" => Ok(vec![FunctionConfiguration {
                    function_name: Some("f1".to_string()),
                    runtime: Some("python3.8".to_string()),
                    memory_size: Some(128),
                    timeout: Some(3),
                    ..Default::default()
                }]),
                _ => Ok(vec![]),
            }
        }
    }

    fn regions(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn test_list_region_functions() {
        let factory = MockFactory;
        let client = LambdaFunctionClient::new(&factory, Duration::from_secs(5));
        let (section, failed) =
            collect_functions(&client, &regions(&["eu-west-1", "us-east-1"])).await;

        assert_eq!(failed, vec!["us-east-1".to_string()]);
        assert_eq!(
            section.rows,
            vec![vec![
                "eu-west-1",
                "thumbnailer",
                "nodejs12.x",
                "256",
                "30",
                "2020-11-20T10:15:30.000+0000",
                "arn:aws:iam::111111111111:role/thumbnailer-role",
            ]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()]
        );
    }

    #[tokio::test]
    async fn test_empty_region_contributes_nothing() {
        let (section, failed) =
            collect_functions(&StubFunctions, &regions(&["eu-west-1", "us-east-1"])).await;

        assert!(failed.is_empty());
        assert_eq!(section.rows.len(), 1);
        assert_eq!(
            section.rows[0],
            vec!["eu-west-1", "f1", "python3.8", "128", "3", "-", "-"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }
}
