//! NetBox IPAM REST API Client
//!
//! A Rust client library for the IPAM part of the NetBox REST API: IP
//! addresses, prefixes, VRFs, aggregates, RIRs, prefix roles and VLANs.
//! Records can be deleted or updated by their natural key (an address, a
//! prefix, a name or a VLAN id); the client looks up the NetBox id first.
//!
//! # Example
//!
//! ```no_run
//! use netbox_ipam::{Connection, ConnectionConfig, Fields};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionConfig::new("netbox.example.com", "your-api-token");
//! let conn = Connection::new(&config)?;
//! let ipam = conn.ipam();
//!
//! // Create, list and delete an IP address
//! let ip = ipam.create_ip_address("10.0.0.5/32", &Fields::new()).await?;
//! println!("created {} with id {}", ip.address, ip.id);
//!
//! let addresses = ipam.list_ip_addresses().await?;
//! println!("{} addresses", addresses.results.len());
//!
//! ipam.delete_ip_address("10.0.0.5/32").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Each operation awaits its requests one after another and never issues
//! requests in parallel. The connection holds no mutable state, so a shared
//! `&Connection` can be used from several tasks.

pub mod config;
pub mod connection;
pub mod error;
pub mod ipam;
pub mod models;
pub mod resolve;
pub mod validate;

pub use config::ConnectionConfig;
pub use connection::{ApiResponse, Connection, Fields, PostOutcome};
pub use error::NetBoxError;
pub use ipam::Ipam;
pub use models::*;
