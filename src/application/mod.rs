//! Application layer services implementing business logic.
//!
//! This layer drives domain transitions by coordinating the repository, the
//! external collaborators and the background queue. Handlers and binaries
//! talk to [`services::LinkManagementService`] only.
//!
//! # Available Services
//!
//! - [`services::link_orchestrator::LinkOrchestrator`] - Link lifecycle and enrichment pipeline
//! - [`services::link_management_service::LinkManagementService`] - Scheduling and notification

pub mod services;
