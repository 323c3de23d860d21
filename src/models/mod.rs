// Models module - the content tree: products, services, versions, cards, notes and specs

pub mod api_spec;
pub mod api_version;
pub mod embedded_image;
pub mod enums;
pub mod info_card;
pub mod manifest;
pub mod product;
pub mod project_data;
pub mod release_note;
pub mod service;

pub use api_spec::{ApiSpecContent, ApiSpecs, SpecFile};
pub use api_version::{ApiVersion, Tutorial, compare_versions, latest_version};
pub use embedded_image::EmbeddedImage;
pub use enums::{
    DisplayType, ImageRole, ProductCategory, ProductStatus, ProtocolType, ServiceCategory,
    VersionStatus,
};
pub use info_card::InfoCard;
pub use manifest::{LastUpdated, Manifest, ManifestCounts};
pub use product::{Product, UseCase};
pub use project_data::{Assets, ExampleSet, ProjectData, ServiceKeyed, VersionKeyed};
pub use release_note::ReleaseNote;
pub use service::Service;
