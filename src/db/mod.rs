pub mod companies;
pub mod location_audit;
pub mod location_types;
pub mod locations;
