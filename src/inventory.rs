use crate::caller_identity_client::{describe_caller, GetCallerIdentity};
use crate::config::InventoryConfig;
use crate::ec2_instance_client::{collect_instances, DescribeInstances};
use crate::error::InventoryError;
use crate::iam_user_client::{collect_users, ListUsers};
use crate::lambda_function_client::{collect_functions, ListFunctions};
use crate::precondition::check_required_tools;
use crate::publisher::{PublishedReport, Publisher};
use crate::region_client::{enumerate_regions, DescribeRegions};
use crate::render::{render_pretty, render_raw, render_spreadsheet};
use crate::report::{Report, ReportHeader, Section};
use crate::run_stamp::RunStamp;
use crate::s3_bucket_client::{collect_buckets, ListBuckets};
use log::{info, warn};

/// Everything the inventory reads from the provider.
pub struct Sources<'a> {
    pub regions: &'a dyn DescribeRegions,
    pub instances: &'a dyn DescribeInstances,
    pub buckets: &'a dyn ListBuckets,
    pub functions: &'a dyn ListFunctions,
    pub users: &'a dyn ListUsers,
    pub identity: &'a dyn GetCallerIdentity,
}

/// Runs the collectors in order and builds the report. Only missing tools and
/// a failed region listing abort.
pub async fn build_report(
    config: &InventoryConfig,
    sources: &Sources<'_>,
    stamp: RunStamp,
) -> Result<Report, InventoryError> {
    check_required_tools(&config.required_tools)?;
    if config.owner_filter.is_empty() {
        warn!("owner filter is empty, the EC2 section will have no rows");
    }

    let regions = enumerate_regions(sources.regions).await?;
    info!("enumerated {} regions", regions.len());

    let caller_identity = describe_caller(sources.identity).await;

    info!("collecting EC2 instances");
    let (instances, failed_ec2) =
        collect_instances(sources.instances, &regions, &config.owner_filter).await;
    info!("collecting S3 buckets");
    let buckets = collect_buckets(sources.buckets).await;
    info!("collecting Lambda functions");
    let (functions, failed_lambda) = collect_functions(sources.functions, &regions).await;
    info!("collecting IAM users");
    let users = collect_users(sources.users).await;

    if !failed_ec2.is_empty() {
        warn!(
            "EC2 listing failed in {} of {} regions: {}",
            failed_ec2.len(),
            regions.len(),
            failed_ec2.join(",")
        );
    }
    if !failed_lambda.is_empty() {
        warn!(
            "Lambda listing failed in {} of {} regions: {}",
            failed_lambda.len(),
            regions.len(),
            failed_lambda.join(",")
        );
    }
    info!(
        "collected {} instances, {} buckets, {} functions, {} users",
        instances.rows.len(),
        data_rows(&buckets),
        functions.rows.len(),
        data_rows(&users)
    );

    Ok(Report::new(
        ReportHeader {
            stamp,
            owner_filter: config.owner_filter_display(),
            caller_identity,
        },
        instances,
        buckets,
        functions,
        users,
    ))
}

fn data_rows(section: &Section) -> usize {
    if section.is_failed() {
        0
    } else {
        section.rows.len()
    }
}

/// Builds the report and writes its three renderings.
pub async fn run(
    config: &InventoryConfig,
    sources: &Sources<'_>,
    stamp: RunStamp,
) -> Result<PublishedReport, InventoryError> {
    let report = build_report(config, sources, stamp).await?;

    let raw = render_raw(&report);
    let pretty = render_pretty(&raw);
    let spreadsheet = render_spreadsheet(&raw);

    let publisher = Publisher::new(
        config.output_dir.clone(),
        config.shared_output_dir.clone(),
    );
    publisher.publish(&stamp, &raw, &pretty, &spreadsheet)
}
