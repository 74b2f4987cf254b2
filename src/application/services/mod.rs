//! Business logic services for the application layer.

pub mod link_management_service;
pub mod link_orchestrator;

pub use link_management_service::{BatchSummary, LinkManagementService};
pub use link_orchestrator::{
    DEFAULT_DESCRIPTION, DEFAULT_TITLE, LinkOrchestrator, LinkPreview, LinkProcessingResult,
    LinkStatistics, synthesize_summary,
};
