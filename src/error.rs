use std::error::Error;

use rusoto_core::request::TlsError;
use rusoto_core::RusotoError;
use rusoto_ec2::{DescribeInstancesError, DescribeRegionsError};
use rusoto_iam::ListUsersError;
use rusoto_lambda::ListFunctionsError;
use rusoto_s3::ListBucketsError;
use rusoto_sts::GetCallerIdentityError;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub enum InventoryError {
    MissingTool(String),
    NoRegions,
    Timeout {
        call: &'static str,
        after: Duration,
    },
    DescribeRegionsError(RusotoError<DescribeRegionsError>),
    DescribeInstancesError(RusotoError<DescribeInstancesError>),
    ListBucketsError(RusotoError<ListBucketsError>),
    ListFunctionsError(RusotoError<ListFunctionsError>),
    ListUsersError(RusotoError<ListUsersError>),
    GetCallerIdentityError(RusotoError<GetCallerIdentityError>),
    Tls(TlsError),
    Config(String),
    ConfigParse(serde_json::Error),
    Io {
        path: PathBuf,
        source: io::Error,
    },
}

impl InventoryError {
    /// The `service:Operation` the error came from, or the pipeline stage for
    /// local failures.
    pub fn call_name(&self) -> &'static str {
        match *self {
            InventoryError::MissingTool(_) => "precondition",
            InventoryError::NoRegions => "ec2:DescribeRegions",
            InventoryError::Timeout { call, .. } => call,
            InventoryError::DescribeRegionsError(_) => "ec2:DescribeRegions",
            InventoryError::DescribeInstancesError(_) => "ec2:DescribeInstances",
            InventoryError::ListBucketsError(_) => "s3:ListBuckets",
            InventoryError::ListFunctionsError(_) => "lambda:ListFunctions",
            InventoryError::ListUsersError(_) => "iam:ListUsers",
            InventoryError::GetCallerIdentityError(_) => "sts:GetCallerIdentity",
            InventoryError::Tls(_) => "http-client",
            InventoryError::Config(_) | InventoryError::ConfigParse(_) => "config",
            InventoryError::Io { .. } => "publish",
        }
    }
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            InventoryError::MissingTool(ref tool) => {
                write!(f, "Required tool `{}` was not found on PATH", tool)
            }
            InventoryError::NoRegions => write!(f, "Region listing returned no regions"),
            InventoryError::Timeout { call, after } => {
                write!(f, "{} did not answer within {}s", call, after.as_secs())
            }
            InventoryError::DescribeRegionsError(ref error) => Display::fmt(error, f),
            InventoryError::DescribeInstancesError(ref error) => Display::fmt(error, f),
            InventoryError::ListBucketsError(ref error) => Display::fmt(error, f),
            InventoryError::ListFunctionsError(ref error) => Display::fmt(error, f),
            InventoryError::ListUsersError(ref error) => Display::fmt(error, f),
            InventoryError::GetCallerIdentityError(ref error) => Display::fmt(error, f),
            InventoryError::Tls(ref error) => write!(f, "Failed to build HTTP client: {}", error),
            InventoryError::Config(ref message) => write!(f, "Invalid configuration: {}", message),
            InventoryError::ConfigParse(ref error) => {
                write!(f, "Failed to parse config file: {}", error)
            }
            InventoryError::Io { ref path, ref source } => {
                write!(f, "{}: {}", path.display(), source)
            }
        }
    }
}

impl Error for InventoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            InventoryError::DescribeRegionsError(ref error) => Some(error),
            InventoryError::DescribeInstancesError(ref error) => Some(error),
            InventoryError::ListBucketsError(ref error) => Some(error),
            InventoryError::ListFunctionsError(ref error) => Some(error),
            InventoryError::ListUsersError(ref error) => Some(error),
            InventoryError::GetCallerIdentityError(ref error) => Some(error),
            InventoryError::Tls(ref error) => Some(error),
            InventoryError::ConfigParse(ref error) => Some(error),
            InventoryError::Io { ref source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RusotoError<DescribeRegionsError>> for InventoryError {
    fn from(e: RusotoError<DescribeRegionsError>) -> InventoryError {
        InventoryError::DescribeRegionsError(e)
    }
}

impl From<RusotoError<DescribeInstancesError>> for InventoryError {
    fn from(e: RusotoError<DescribeInstancesError>) -> InventoryError {
        InventoryError::DescribeInstancesError(e)
    }
}

impl From<RusotoError<ListBucketsError>> for InventoryError {
    fn from(e: RusotoError<ListBucketsError>) -> InventoryError {
        InventoryError::ListBucketsError(e)
    }
}

impl From<RusotoError<ListFunctionsError>> for InventoryError {
    fn from(e: RusotoError<ListFunctionsError>) -> InventoryError {
        InventoryError::ListFunctionsError(e)
    }
}

impl From<RusotoError<ListUsersError>> for InventoryError {
    fn from(e: RusotoError<ListUsersError>) -> InventoryError {
        InventoryError::ListUsersError(e)
    }
}

impl From<RusotoError<GetCallerIdentityError>> for InventoryError {
    fn from(e: RusotoError<GetCallerIdentityError>) -> InventoryError {
        InventoryError::GetCallerIdentityError(e)
    }
}

impl From<TlsError> for InventoryError {
    fn from(e: TlsError) -> InventoryError {
        InventoryError::Tls(e)
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(e: serde_json::Error) -> InventoryError {
        InventoryError::ConfigParse(e)
    }
}
