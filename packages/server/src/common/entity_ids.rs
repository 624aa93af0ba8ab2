//! Typed ID definitions for all domain entities.

pub use super::id::Id;

/// Marker type for Service entities (approved directory entries).
pub struct Service;

/// Marker type for Category entities (the category vocabulary).
pub struct Category;

/// Marker type for DiscoveredService entities (staged discoveries).
pub struct DiscoveredService;

/// Marker type for DiscoveryRun entities (pipeline run lineage).
pub struct DiscoveryRun;

/// Typed ID for Service entities.
pub type ServiceId = Id<Service>;

/// Typed ID for Category entities.
pub type CategoryId = Id<Category>;

/// Typed ID for DiscoveredService entities.
pub type DiscoveryId = Id<DiscoveredService>;

/// Typed ID for DiscoveryRun entities.
pub type DiscoveryRunId = Id<DiscoveryRun>;
