//! Services module - session state and export coordination.

pub mod export_service;
pub mod project_service;

// Re-export for convenience
pub use export_service::ExportService;
pub use project_service::ProjectService;
