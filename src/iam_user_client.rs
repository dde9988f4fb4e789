use async_trait::async_trait;
use rusoto_iam::{Iam, IamClient, ListUsersRequest, User};

use crate::client_factory::timed_call;
use crate::error::InventoryError;
use crate::record::{or_missing, ResourceRecord};
use crate::report::Section;
use log::warn;
use std::time::Duration;

pub const SECTION_TITLE: &str = "IAM USERS";

pub struct IamUserClient {
    client: IamClient,
    timeout: Duration,
}

#[derive(Debug, PartialEq)]
pub struct UserRecord {
    pub user_name: String,
    pub user_id: String,
    pub create_date: String,
    pub arn: String,
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        UserRecord {
            user_name: or_missing(Some(user.user_name)),
            user_id: or_missing(Some(user.user_id)),
            create_date: or_missing(Some(user.create_date)),
            arn: or_missing(Some(user.arn)),
        }
    }
}

impl ResourceRecord for UserRecord {
    fn columns() -> &'static [&'static str] {
        &["UserName", "UserId", "CreateDate", "Arn"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.user_name.clone(),
            self.user_id.clone(),
            self.create_date.clone(),
            self.arn.clone(),
        ]
    }
}

#[async_trait]
pub trait ListUsers: Send + Sync {
    async fn list_all_users(&self) -> Result<Vec<User>, InventoryError>;
}

#[async_trait]
impl ListUsers for IamUserClient {
    async fn list_all_users(&self) -> Result<Vec<User>, InventoryError> {
        let response = timed_call(
            "iam:ListUsers",
            self.timeout,
            self.client.list_users(ListUsersRequest::default()),
        )
        .await?;
        Ok(response.users)
    }
}

impl IamUserClient {
    pub fn new_with_client(client: IamClient, timeout: Duration) -> Self {
        IamUserClient { client, timeout }
    }
}

/// Builds the IAM section. A failed listing becomes a single error row.
pub async fn collect_users(source: &dyn ListUsers) -> Section {
    match source.list_all_users().await {
        Ok(users) => {
            let records: Vec<UserRecord> = users.into_iter().map(UserRecord::from).collect();
            Section::from_records(SECTION_TITLE, &records)
        }
        Err(error) => {
            warn!("{} failed: {}", error.call_name(), error);
            Section::failed::<UserRecord>(SECTION_TITLE, &error)
        }
    }
}
