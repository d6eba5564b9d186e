//! LetsCloud API client and data models.
//!
//! Provides typed structures and an asynchronous client for the LetsCloud
//! cloud-hosting API: account profile, locations, SSH keys, instances and
//! snapshots.
//!
//! ```no_run
//! # async fn run() -> letscloud::Result<()> {
//! let client = letscloud::LetsCloud::new("my-api-key")?;
//! for instance in client.instances().await? {
//!     println!("{} {}", instance.identifier, instance.hostname);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{LetsCloud, LetsCloudBuilder};
pub use letscloud_core::{ClientConfig, Envelope, Error, HttpRequester, Requester};
pub use models::{
    CreateInstanceRequest, Image, Instance, InstancePasswordResetRequest, IpAddress, Location,
    LocationPlans, Plan, Profile, Snapshot, SnapshotLabelRequest, SshKey, SshKeyCreateRequest,
    SshKeyDeleteRequest,
};

/// Convenient result alias that reuses the shared LetsCloud error type.
pub type Result<T> = letscloud_core::Result<T>;

/// Crate version, also sent in the default `User-Agent`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
