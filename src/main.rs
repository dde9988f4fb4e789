mod caller_identity_client;
mod client_factory;
mod config;
mod ec2_instance_client;
mod error;
mod iam_user_client;
mod inventory;
mod lambda_function_client;
mod precondition;
mod publisher;
mod record;
mod region_client;
mod render;
mod report;
mod run_stamp;
mod s3_bucket_client;

use anyhow::Context;
use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::PathBuf;

use crate::caller_identity_client::CallerIdentityClient;
use crate::client_factory::AwsClientFactory;
use crate::config::{ConfigFile, InventoryConfig, Overrides};
use crate::ec2_instance_client::Ec2InstanceClient;
use crate::iam_user_client::IamUserClient;
use crate::inventory::Sources;
use crate::lambda_function_client::LambdaFunctionClient;
use crate::region_client::RegionClient;
use crate::run_stamp::RunStamp;
use crate::s3_bucket_client::S3BucketClient;

/// Lists EC2 instances, S3 buckets, Lambda functions and IAM users across all
/// regions and writes them as raw, pretty and spreadsheet reports.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON config file; command line values take precedence
    #[arg(short, long, env = "INVENTORY_CONFIG")]
    config: Option<PathBuf>,

    /// Account id whose EC2 reservations are reported (repeatable)
    #[arg(long = "owner", env = "INVENTORY_OWNERS", value_delimiter = ',')]
    owners: Vec<String>,

    /// Directory for the three report files
    #[arg(short, long, env = "INVENTORY_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Directory that receives a copy of the spreadsheet report
    #[arg(long, env = "INVENTORY_SHARED_DIR")]
    shared_output_dir: Option<PathBuf>,

    /// Command that must be on PATH before anything runs (repeatable)
    #[arg(long = "require")]
    required_tools: Vec<String>,

    /// Per-call timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Region used for region listing, S3 and STS
    #[arg(long, env = "AWS_REGION")]
    home_region: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            owner_filters: self.owners.clone(),
            output_dir: self.output_dir.clone(),
            shared_output_dir: self.shared_output_dir.clone(),
            required_tools: self.required_tools.clone(),
            call_timeout_secs: self.timeout_secs,
            home_region: self.home_region.clone(),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<InventoryConfig> {
    let file = match args.config {
        Some(ref path) => ConfigFile::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConfigFile::default(),
    };
    Ok(InventoryConfig::resolve(file, args.overrides())?)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(error) = run(&args).await {
        error!("{:#}", error);
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let factory = AwsClientFactory::new(&config.home_region)?;
    let timeout = config.call_timeout;

    let regions = RegionClient::new_with_client(factory.home_ec2(), timeout);
    let instances = Ec2InstanceClient::new(&factory, timeout);
    let buckets = S3BucketClient::new_with_client(factory.s3(), timeout);
    let functions = LambdaFunctionClient::new(&factory, timeout);
    let users = IamUserClient::new_with_client(factory.iam(), timeout);
    let identity = CallerIdentityClient::new_with_client(factory.sts(), timeout);
    let sources = Sources {
        regions: &regions,
        instances: &instances,
        buckets: &buckets,
        functions: &functions,
        users: &users,
        identity: &identity,
    };

    let published = inventory::run(&config, &sources, RunStamp::now())
        .await
        .context("inventory run aborted")?;

    info!("raw report: {}", published.raw.display());
    info!("pretty report: {}", published.pretty.display());
    info!("spreadsheet report: {}", published.spreadsheet.display());
    if let Some(ref shared_copy) = published.shared_copy {
        info!("shared copy: {}", shared_copy.display());
    }
    Ok(())
}
