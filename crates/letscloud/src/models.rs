//! LetsCloud resource models and request payloads.
//!
//! Resource records mirror the provider's JSON. Every field falls back to its
//! default when absent so partial responses still decode.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Account profile of the API key owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Account holder name.
    pub name: String,
    /// Company name.
    pub company_name: String,
    /// Contact e-mail.
    pub email: String,
    /// Billing currency code.
    pub currency: String,
    /// Account balance, as formatted by the provider.
    pub balance: String,
}

/// Data center where instances can be hosted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    /// Location slug (e.g. `MIA2`).
    pub slug: String,
    /// Country name.
    pub country: String,
    /// City name.
    pub city: String,
    /// Whether new instances can be created there.
    pub available: bool,
}

/// Location entry of the `/locations/{slug}/plans` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationPlans {
    /// Location slug.
    pub slug: String,
    /// Country name.
    pub country: String,
    /// City name.
    pub city: String,
    /// Plans offered at this location.
    pub plans: Vec<Plan>,
}

/// Pricing plan for an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    /// Currency code of `monthly_value`.
    pub currencycode: String,
    /// Short display code.
    pub shortcode: String,
    /// Plan slug (e.g. `2vcpu-2gb`).
    pub slug: String,
    /// vCPU cores.
    pub core: u32,
    /// Memory in MB.
    pub memory: u64,
    /// Disk in GB.
    pub disk: u64,
    /// Monthly bandwidth allowance.
    pub bandwidth: u64,
    /// Monthly price, as formatted by the provider.
    pub monthly_value: String,
}

/// Operating system image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    /// Image slug (e.g. `ubuntu-22.04-x86_64`).
    pub slug: String,
    /// Distribution name.
    pub distro: String,
    /// Operating system family.
    pub os: String,
}

/// SSH key registered on the account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshKey {
    /// Key slug.
    pub slug: String,
    /// Key title.
    pub title: String,
    /// Public key material.
    pub public_key: String,
    /// Private key, only returned when the provider generated the pair.
    pub private_key: String,
}

/// Virtual machine instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
    /// Instance identifier.
    pub identifier: String,
    /// Whether the instance is powered on.
    pub booted: bool,
    /// Whether provisioning finished.
    pub built: bool,
    /// Whether the instance is locked by the provider.
    pub locked: bool,
    /// Whether the instance is suspended.
    pub suspended: bool,
    /// Memory in MB.
    pub memory: u64,
    /// Total disk size in GB.
    pub total_disk_size: u64,
    /// vCPU count.
    pub cpus: u32,
    /// Display label.
    pub label: String,
    /// Assigned IP addresses.
    pub ip_addresses: Vec<IpAddress>,
    /// Label of the image the instance was built from.
    pub template_label: String,
    /// Hostname.
    pub hostname: String,
    /// Root password set at creation.
    pub initial_root_password: String,
}

/// IP address assigned to an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpAddress {
    /// IPv4 or IPv6 address.
    pub address: String,
}

/// Instance snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Snapshot slug.
    pub slug: String,
    /// Size in GB.
    pub size: u64,
    /// Display label.
    pub label: String,
    /// OS of the source instance.
    pub os_reference: String,
    /// Provider reference.
    pub reference: String,
    /// Whether the snapshot finished building.
    pub build: bool,
    /// Locations holding a copy.
    pub locations: Vec<String>,
}

/// Payload of `POST /instances`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateInstanceRequest {
    /// Location slug.
    #[validate(length(min = 1, message = "location_slug is required"))]
    pub location_slug: String,
    /// Plan slug.
    #[validate(length(min = 1, message = "plan_slug is required"))]
    pub plan_slug: String,
    /// Hostname.
    #[validate(length(min = 1, message = "hostname is required"))]
    pub hostname: String,
    /// Display label.
    #[validate(length(min = 1, message = "label is required"))]
    pub label: String,
    /// Image slug.
    #[validate(length(min = 1, message = "image_slug is required"))]
    pub image_slug: String,
    /// SSH key slug to install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_slug: Option<String>,
    /// Root password; at least 8 characters when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl CreateInstanceRequest {
    /// Creates a request with all required fields and no optional ones.
    #[must_use]
    pub fn new(
        location_slug: impl Into<String>,
        plan_slug: impl Into<String>,
        hostname: impl Into<String>,
        label: impl Into<String>,
        image_slug: impl Into<String>,
    ) -> Self {
        Self {
            location_slug: location_slug.into(),
            plan_slug: plan_slug.into(),
            hostname: hostname.into(),
            label: label.into(),
            image_slug: image_slug.into(),
            ssh_slug: None,
            password: None,
        }
    }

    /// Installs the given SSH key on the new instance.
    #[must_use]
    pub fn with_ssh_slug(mut self, ssh_slug: impl Into<String>) -> Self {
        self.ssh_slug = Some(ssh_slug.into());
        self
    }

    /// Sets the root password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Payload of `POST /sshkeys`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SshKeyCreateRequest {
    /// Key title.
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    /// Public key; the provider generates a pair when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Payload of `DELETE /sshkeys`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SshKeyDeleteRequest {
    /// Slug of the key to delete.
    #[validate(length(min = 1, message = "slug is required"))]
    pub slug: String,
}

/// Payload of `PUT /instances/{id}/reset-password`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct InstancePasswordResetRequest {
    /// New root password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Payload carrying a snapshot label, used to create and rename snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SnapshotLabelRequest {
    /// Snapshot label.
    #[validate(length(min = 1, message = "label is required"))]
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_instance_request_roundtrip_passes_validation() {
        let request = CreateInstanceRequest::new("MIA2", "2vcpu-2gb", "my-host", "aaa", "centos-7.1");

        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(
            payload,
            json!({
                "location_slug": "MIA2",
                "plan_slug": "2vcpu-2gb",
                "hostname": "my-host",
                "label": "aaa",
                "image_slug": "centos-7.1"
            })
        );

        let decoded: CreateInstanceRequest = serde_json::from_value(payload).unwrap();
        assert!(decoded.validate().is_ok());
        assert_eq!(decoded, request);
    }

    #[test]
    fn create_instance_request_missing_fields() {
        let request = CreateInstanceRequest {
            label: "aaa".into(),
            ..CreateInstanceRequest::default()
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("location_slug"));
        assert!(fields.contains_key("plan_slug"));
        assert!(fields.contains_key("hostname"));
        assert!(fields.contains_key("image_slug"));
        assert!(!fields.contains_key("label"));
    }

    #[test]
    fn create_instance_request_short_password() {
        let request = CreateInstanceRequest::new("MIA2", "2vcpu-2gb", "my-host", "aaa", "centos-7.1")
            .with_password("short");
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let request = request.with_password("long-enough").with_ssh_slug("laptop");
        assert!(request.validate().is_ok());
        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(payload["ssh_slug"], "laptop");
        assert_eq!(payload["password"], "long-enough");
    }

    #[test]
    fn ssh_key_request_omits_missing_key() {
        let request = SshKeyCreateRequest {
            title: "laptop".into(),
            key: None,
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"title": "laptop"}));
        assert!(request.validate().is_ok());

        assert!(SshKeyCreateRequest::default().validate().is_err());
    }

    #[test]
    fn instance_decodes_with_defaults() {
        let instance: Instance = serde_json::from_value(json!({"identifier": "x"})).unwrap();
        assert_eq!(
            instance,
            Instance {
                identifier: "x".into(),
                ..Instance::default()
            }
        );
    }

    #[test]
    fn instance_decodes_full_payload() {
        let instance: Instance = serde_json::from_value(json!({
            "identifier": "abc123",
            "booted": true,
            "built": true,
            "locked": false,
            "suspended": false,
            "memory": 2048,
            "total_disk_size": 40,
            "cpus": 2,
            "label": "web",
            "ip_addresses": [{"address": "203.0.113.10"}],
            "template_label": "Ubuntu 22.04",
            "hostname": "web.example.com",
            "initial_root_password": "s3cret!"
        }))
        .unwrap();

        assert!(instance.booted);
        assert_eq!(instance.cpus, 2);
        assert_eq!(instance.ip_addresses[0].address, "203.0.113.10");
        assert_eq!(instance.initial_root_password, "s3cret!");
    }
}
