pub mod address;
pub mod lotplan;
pub mod parcel;
pub mod resolution;

pub use address::{AddressFields, AddressQuery};
pub use lotplan::LotPlanToken;
pub use parcel::{ParcelAttributes, ParcelFeature};
pub use resolution::{Outcome, ParcelBatch, ResolutionFailure, ResolutionResult};
