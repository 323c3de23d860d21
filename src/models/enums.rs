use serde::{Deserialize, Serialize};
use std::fmt;

// Values outside the known set land in `Custom` and are written back as read.

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Platform,
    Connectivity,
    Analytics,
    Security,
    Integration,
    Devices,
    #[default]
    Other,
    #[serde(untagged)]
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Beta,
    ComingSoon,
    Deprecated,
    Inactive,
    #[serde(untagged)]
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Core,
    Data,
    Messaging,
    Management,
    Monitoring,
    #[default]
    Other,
    #[serde(untagged)]
    Custom(String),
}

/// Wire protocol of a service. Decides which spec kind its versions carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProtocolType {
    #[default]
    Rest,
    Mqtt,
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolType::Rest => write!(f, "REST"),
            ProtocolType::Mqtt => write!(f, "MQTT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    #[default]
    Stable,
    Beta,
    Deprecated,
    Active,
    #[serde(untagged)]
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayType {
    #[default]
    #[serde(rename = "imageLeft")]
    ImageLeft,
    #[serde(rename = "imageRight")]
    ImageRight,
    #[serde(untagged)]
    Custom(String),
}

/// What an embedded image is used for. Picks the recompression quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    Icon,
    Hero,
    Gallery,
}
