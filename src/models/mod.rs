pub mod company;
pub mod location;
pub mod location_audit;
pub mod location_type;

pub use company::{Company, NewCompany};
pub use location::{Location, LocationDraft, LocationStatus, OperatingHours};
pub use location_audit::{AuditAction, LocationAuditEntry};
pub use location_type::{LocationType, NewLocationType};
