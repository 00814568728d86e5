// Per-table cleaning strategies

pub mod base;
pub mod building_permits;
pub mod census;
pub mod crime;
pub mod dc_housing;
pub mod dc_tax;
pub mod generic;
pub mod hmda;
pub mod nulls_only;
pub mod project;
pub mod subsidy;
pub mod zone_counts;

pub use base::{CleanOutcome, CleanerContext, TableCleaner};
pub use building_permits::BuildingPermitsCleaner;
pub use census::CensusCleaner;
pub use crime::CrimeCleaner;
pub use dc_housing::DcHousingCleaner;
pub use dc_tax::DcTaxCleaner;
pub use generic::GenericCleaner;
pub use hmda::HmdaCleaner;
pub use nulls_only::NullsOnlyCleaner;
pub use project::ProjectCleaner;
pub use subsidy::SubsidyCleaner;
pub use zone_counts::ZoneCountsCleaner;
