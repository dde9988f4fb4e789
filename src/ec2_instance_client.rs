use async_trait::async_trait;
use rusoto_ec2::{DescribeInstancesRequest, Ec2, Instance, Reservation};

use crate::client_factory::{resolve_region, timed_call, ClientFactory};
use crate::config::OwnerFilter;
use crate::error::InventoryError;
use crate::record::{join_or_missing, or_missing, ResourceRecord};
use crate::report::{RegionOutcome, Section};
use log::{debug, warn};
use std::time::Duration;

pub const SECTION_TITLE: &str = "EC2 INSTANCES";

pub struct Ec2InstanceClient<'a> {
    factory: &'a dyn ClientFactory,
    timeout: Duration,
}

#[derive(Debug, PartialEq)]
pub struct InstanceRecord {
    pub region: String,
    pub owner_id: String,
    pub instance_id: String,
    pub name: String,
    pub state: String,
    pub instance_type: String,
    pub public_dns: String,
    pub public_ip: String,
    pub private_ip: String,
    pub vpc_id: String,
    pub subnet_id: String,
    pub availability_zone: String,
    pub security_groups: String,
    pub volumes: String,
    pub launch_time: String,
}

impl InstanceRecord {
    fn from_instance(region: &str, owner_id: &str, instance: Instance) -> Self {
        let name = instance.tags.as_ref().and_then(|tags| {
            tags.iter()
                .find(|tag| tag.key.as_deref() == Some("Name"))
                .and_then(|tag| tag.value.clone())
        });
        let security_groups = instance
            .security_groups
            .unwrap_or_default()
            .into_iter()
            .map(|group| {
                format!(
                    "{}:{}",
                    or_missing(group.group_name),
                    or_missing(group.group_id)
                )
            })
            .collect();
        let volumes = instance
            .block_device_mappings
            .unwrap_or_default()
            .into_iter()
            .filter_map(|mapping| mapping.ebs.and_then(|ebs| ebs.volume_id))
            .collect();

        InstanceRecord {
            region: region.to_string(),
            owner_id: owner_id.to_string(),
            instance_id: or_missing(instance.instance_id),
            name: or_missing(name),
            state: or_missing(instance.state.and_then(|state| state.name)),
            instance_type: or_missing(instance.instance_type),
            public_dns: or_missing(instance.public_dns_name),
            public_ip: or_missing(instance.public_ip_address),
            private_ip: or_missing(instance.private_ip_address),
            vpc_id: or_missing(instance.vpc_id),
            subnet_id: or_missing(instance.subnet_id),
            availability_zone: or_missing(
                instance.placement.and_then(|placement| placement.availability_zone),
            ),
            security_groups: join_or_missing(security_groups),
            volumes: join_or_missing(volumes),
            launch_time: or_missing(instance.launch_time),
        }
    }
}

impl ResourceRecord for InstanceRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "Region",
            "OwnerId",
            "InstanceId",
            "Name",
            "State",
            "InstanceType",
            "PublicDnsName",
            "PublicIpAddress",
            "PrivateIpAddress",
            "VpcId",
            "SubnetId",
            "AvailabilityZone",
            "SecurityGroups",
            "Volumes",
            "LaunchTime",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.region.clone(),
            self.owner_id.clone(),
            self.instance_id.clone(),
            self.name.clone(),
            self.state.clone(),
            self.instance_type.clone(),
            self.public_dns.clone(),
            self.public_ip.clone(),
            self.private_ip.clone(),
            self.vpc_id.clone(),
            self.subnet_id.clone(),
            self.availability_zone.clone(),
            self.security_groups.clone(),
            self.volumes.clone(),
            self.launch_time.clone(),
        ]
    }
}

#[async_trait]
pub trait DescribeInstances: Send + Sync {
    async fn describe_reservations(&self, region: &str)
        -> Result<Vec<Reservation>, InventoryError>;
}

#[async_trait]
impl<'a> DescribeInstances for Ec2InstanceClient<'a> {
    async fn describe_reservations(
        &self,
        region: &str,
    ) -> Result<Vec<Reservation>, InventoryError> {
        let client = self.factory.ec2(resolve_region(region, "ec2"));
        let result = timed_call(
            "ec2:DescribeInstances",
            self.timeout,
            client.describe_instances(DescribeInstancesRequest::default()),
        )
        .await?;

        Ok(result.reservations.unwrap_or_default())
    }
}

impl<'a> Ec2InstanceClient<'a> {
    pub fn new(factory: &'a dyn ClientFactory, timeout: Duration) -> Self {
        Ec2InstanceClient { factory, timeout }
    }
}

/// Keeps the reservations owned by a filtered account and flattens their
/// instances into records.
pub fn filter_reservations(
    region: &str,
    reservations: Vec<Reservation>,
    owners: &OwnerFilter,
) -> Vec<InstanceRecord> {
    let mut records = Vec::new();
    for reservation in reservations {
        let owner_id = match reservation.owner_id {
            Some(ref owner_id) if owners.contains(owner_id) => owner_id.clone(),
            _ => continue,
        };
        for instance in reservation.instances.unwrap_or_default() {
            records.push(InstanceRecord::from_instance(region, &owner_id, instance));
        }
    }
    records
}

pub async fn describe_region(
    source: &dyn DescribeInstances,
    region: &str,
    owners: &OwnerFilter,
) -> RegionOutcome<InstanceRecord> {
    match source.describe_reservations(region).await {
        Ok(reservations) => {
            let records = filter_reservations(region, reservations, owners);
            if records.is_empty() {
                RegionOutcome::NoData
            } else {
                RegionOutcome::Rows(records)
            }
        }
        Err(error) => RegionOutcome::Failed(error),
    }
}

/// Visits `regions` in order and builds the EC2 section. A failing region is
/// logged and contributes no rows.
pub async fn collect_instances(
    source: &dyn DescribeInstances,
    regions: &[String],
    owners: &OwnerFilter,
) -> (Section, Vec<String>) {
    let mut records = Vec::new();
    let mut failed_regions = Vec::new();
    for region in regions {
        match describe_region(source, region, owners).await {
            RegionOutcome::Rows(rows) => {
                debug!("{}: {} matching instances", region, rows.len());
                records.extend(rows);
            }
            RegionOutcome::NoData => debug!("{}: no instances for the owner filter", region),
            RegionOutcome::Failed(error) => {
                warn!("{} failed in {}: {}", error.call_name(), region, error);
                failed_regions.push(region.clone());
            }
        }
    }
    (Section::from_records(SECTION_TITLE, &records), failed_regions)
}
