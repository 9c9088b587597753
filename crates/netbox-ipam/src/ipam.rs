//! IPAM resource operations
//!
//! Covers IP addresses, prefixes, VRFs, aggregates, RIRs, prefix roles and
//! VLANs under `/api/ipam/`. Deletes and updates take the natural key of a
//! record (address, prefix, name or VLAN id) and resolve it to the numeric
//! id with a full collection scan before the mutating request is sent.

use crate::connection::{first_error_message, Connection, Fields, PostOutcome};
use crate::error::NetBoxError;
use crate::models::*;
use crate::resolve::{find_id, key_display};
use crate::validate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Collection path for IP addresses
pub const IP_ADDRESSES: &str = "/ipam/ip-addresses/";
/// Collection path for prefixes
pub const PREFIXES: &str = "/ipam/prefixes/";
/// Collection path for VRFs
pub const VRFS: &str = "/ipam/vrfs/";
/// Collection path for aggregates
pub const AGGREGATES: &str = "/ipam/aggregates/";
/// Collection path for RIRs
pub const RIRS: &str = "/ipam/rirs/";
/// Collection path for prefix roles
pub const ROLES: &str = "/ipam/roles/";
/// Collection path for VLANs
pub const VLANS: &str = "/ipam/vlans/";

fn required<const N: usize>(pairs: [(&str, Value); N]) -> Fields {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// IPAM operations over a borrowed [`Connection`]
#[derive(Debug, Clone, Copy)]
pub struct Ipam<'a> {
    conn: &'a Connection,
}

impl Connection {
    /// IPAM operations on this connection
    pub fn ipam(&self) -> Ipam<'_> {
        Ipam::new(self)
    }
}

impl<'a> Ipam<'a> {
    /// Wrap a connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // IP addresses

    /// List IP addresses
    pub async fn list_ip_addresses(&self) -> Result<Page<IpAddress>, NetBoxError> {
        self.conn.get(IP_ADDRESSES).await
    }

    /// Get an IP address by its NetBox id
    pub async fn get_ip_address(&self, id: u64) -> Result<IpAddress, NetBoxError> {
        self.conn.get(&format!("{}{}/", IP_ADDRESSES, id)).await
    }

    /// Create an IP address such as `10.0.0.5/24`
    ///
    /// The address may have host bits set. `fields` carries optional
    /// attributes (`status`, `dns_name`, `description`, ...).
    pub async fn create_ip_address(&self, address: &str, fields: &Fields) -> Result<IpAddress, NetBoxError> {
        validate::host_address(address)?;
        let body = required([("address", Value::from(address))]);
        self.create("IP address", IP_ADDRESSES, body, fields).await
    }

    /// Update the IP address with this exact address string
    pub async fn update_ip_address(&self, address: &str, changes: &Fields) -> Result<IpAddress, NetBoxError> {
        self.update_by_key("IP address", IP_ADDRESSES, "address", Value::from(address), changes).await
    }

    /// Delete the IP address with this exact address string
    pub async fn delete_ip_address(&self, address: &str) -> Result<(), NetBoxError> {
        self.delete_by_key("IP address", IP_ADDRESSES, "address", Value::from(address)).await
    }

    // Prefixes

    /// List prefixes
    pub async fn list_ip_prefixes(&self) -> Result<Page<Prefix>, NetBoxError> {
        self.conn.get(PREFIXES).await
    }

    /// Create a prefix; host bits must be zero
    pub async fn create_ip_prefix(&self, prefix: &str, fields: &Fields) -> Result<Prefix, NetBoxError> {
        validate::network(prefix)?;
        let body = required([("prefix", Value::from(prefix))]);
        self.create("IP prefix", PREFIXES, body, fields).await
    }

    /// Update the prefix with this exact prefix string
    pub async fn update_ip_prefix(&self, prefix: &str, changes: &Fields) -> Result<Prefix, NetBoxError> {
        self.update_by_key("IP prefix", PREFIXES, "prefix", Value::from(prefix), changes).await
    }

    /// Delete the prefix with this exact prefix string
    pub async fn delete_ip_prefix(&self, prefix: &str) -> Result<(), NetBoxError> {
        self.delete_by_key("IP prefix", PREFIXES, "prefix", Value::from(prefix)).await
    }

    // VRFs

    /// List VRFs
    pub async fn list_vrfs(&self) -> Result<Page<Vrf>, NetBoxError> {
        self.conn.get(VRFS).await
    }

    /// Create a VRF with a route distinguisher in any format
    pub async fn create_vrf(&self, name: &str, rd: &str, fields: &Fields) -> Result<Vrf, NetBoxError> {
        let body = required([("name", Value::from(name)), ("rd", Value::from(rd))]);
        self.create("vrf", VRFS, body, fields).await
    }

    /// Update the VRF with this name
    pub async fn update_vrf(&self, name: &str, changes: &Fields) -> Result<Vrf, NetBoxError> {
        self.update_by_key("vrf", VRFS, "name", Value::from(name), changes).await
    }

    /// Delete the VRF with this name
    pub async fn delete_vrf(&self, name: &str) -> Result<(), NetBoxError> {
        self.delete_by_key("vrf", VRFS, "name", Value::from(name)).await
    }

    // Aggregates

    /// List aggregates
    pub async fn list_aggregates(&self) -> Result<Page<Aggregate>, NetBoxError> {
        self.conn.get(AGGREGATES).await
    }

    /// Create an aggregate allocated by the RIR called `rir`
    ///
    /// The prefix is checked before any request is made, then the RIR name
    /// is resolved to its id.
    pub async fn create_aggregate(&self, prefix: &str, rir: &str, fields: &Fields) -> Result<Aggregate, NetBoxError> {
        validate::network(prefix)?;
        let rir_id = self.resolve_id("rir", RIRS, "name", &Value::from(rir)).await?;
        let body = required([("prefix", Value::from(prefix)), ("rir", Value::from(rir_id))]);
        self.create("aggregate", AGGREGATES, body, fields).await
    }

    /// Delete the aggregate with this exact prefix string
    pub async fn delete_aggregate(&self, prefix: &str) -> Result<(), NetBoxError> {
        self.delete_by_key("aggregate", AGGREGATES, "prefix", Value::from(prefix)).await
    }

    // RIRs

    /// List RIRs
    pub async fn list_rirs(&self) -> Result<Page<Rir>, NetBoxError> {
        self.conn.get(RIRS).await
    }

    /// Create a RIR
    pub async fn create_rir(&self, name: &str, slug: &str, fields: &Fields) -> Result<Rir, NetBoxError> {
        let body = required([("name", Value::from(name)), ("slug", Value::from(slug))]);
        self.create("rir", RIRS, body, fields).await
    }

    /// Delete the RIR with this name
    pub async fn delete_rir(&self, name: &str) -> Result<(), NetBoxError> {
        self.delete_by_key("rir", RIRS, "name", Value::from(name)).await
    }

    // Prefix roles

    /// List prefix roles
    pub async fn list_prefix_roles(&self) -> Result<Page<Role>, NetBoxError> {
        self.conn.get(ROLES).await
    }

    /// Create a prefix role
    pub async fn create_prefix_role(&self, name: &str, slug: &str, fields: &Fields) -> Result<Role, NetBoxError> {
        let body = required([("name", Value::from(name)), ("slug", Value::from(slug))]);
        self.create("prefix role", ROLES, body, fields).await
    }

    /// Delete the prefix role with this name
    pub async fn delete_prefix_role(&self, name: &str) -> Result<(), NetBoxError> {
        self.delete_by_key("prefix role", ROLES, "name", Value::from(name)).await
    }

    // VLANs

    /// List VLANs
    pub async fn list_vlans(&self) -> Result<Page<Vlan>, NetBoxError> {
        self.conn.get(VLANS).await
    }

    /// Create a VLAN
    pub async fn create_vlan(&self, vid: u16, name: &str, fields: &Fields) -> Result<Vlan, NetBoxError> {
        let body = required([("vid", Value::from(vid)), ("name", Value::from(name))]);
        self.create("VLAN", VLANS, body, fields).await
    }

    /// Update the VLAN with this VLAN id (802.1Q tag, not the NetBox id)
    pub async fn update_vlan(&self, vid: u16, changes: &Fields) -> Result<Vlan, NetBoxError> {
        self.update_by_key("VLAN", VLANS, "vid", Value::from(vid), changes).await
    }

    /// Delete the VLAN with this VLAN id (802.1Q tag, not the NetBox id)
    pub async fn delete_vlan(&self, vid: u16) -> Result<(), NetBoxError> {
        self.delete_by_key("VLAN", VLANS, "vid", Value::from(vid)).await
    }

    /// Resolve a natural key to a NetBox id
    ///
    /// Fetches the collection at `path` and returns the id of the first
    /// record whose `field` equals `key`, or [`NetBoxError::NotFound`].
    pub async fn resolve_id(
        &self,
        resource: &'static str,
        path: &str,
        field: &str,
        key: &Value,
    ) -> Result<u64, NetBoxError> {
        let page: Page<Value> = self.conn.get(path).await?;
        let id = find_id(&page.results, field, key).ok_or_else(|| NetBoxError::NotFound {
            resource,
            key: key_display(key),
        })?;
        debug!("Resolved {} {} to id {}", resource, key_display(key), id);
        Ok(id)
    }

    async fn create<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
        body: Fields,
        fields: &Fields,
    ) -> Result<T, NetBoxError> {
        debug!("Creating {} at {}", resource, path);

        match self.conn.post(path, body, fields).await? {
            PostOutcome::Created(record) => Ok(serde_json::from_value(record)?),
            PostOutcome::Rejected { status, message } => {
                warn!("NetBox rejected {} creation ({}): {}", resource, status, message);
                Err(NetBoxError::Create { resource, message })
            }
        }
    }

    async fn update_by_key<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        path: &str,
        field: &str,
        key: Value,
        changes: &Fields,
    ) -> Result<T, NetBoxError> {
        let id = self.resolve_id(resource, path, field, &key).await?;
        let response = self
            .conn
            .patch(&format!("{}{}/", path, id), &Value::Object(changes.clone()))
            .await?;

        if !response.ok {
            let message = first_error_message(&response.body);
            warn!("NetBox rejected {} {} update ({}): {}", resource, key_display(&key), response.status, message);
            return Err(NetBoxError::Update { resource, key: key_display(&key), message });
        }

        Ok(serde_json::from_value(response.body)?)
    }

    async fn delete_by_key(
        &self,
        resource: &'static str,
        path: &str,
        field: &str,
        key: Value,
    ) -> Result<(), NetBoxError> {
        let id = self.resolve_id(resource, path, field, &key).await?;
        let status = self.conn.delete_status(path, id).await?;

        if status != 204 {
            warn!("NetBox refused to delete {} {} ({})", resource, key_display(&key), status);
            return Err(NetBoxError::Delete { resource, key: key_display(&key), status });
        }

        debug!("Deleted {} {}", resource, key_display(&key));
        Ok(())
    }
}
