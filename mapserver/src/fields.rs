//! Attribute names exposed by the Queensland Land Parcel Property
//! Framework layers. Centralised so a service schema change is a
//! one-file edit.

pub const LOTPLAN: &str = "lotplan";
pub const LOT: &str = "lot";
pub const PLAN: &str = "plan";
pub const TENURE: &str = "tenure";
pub const LOCALITY: &str = "locality";
pub const SHIRE_NAME: &str = "shire_name";

pub const ADDRESS: &str = "address";
pub const STREET_NUMBER: &str = "street_number";
pub const STREET_NAME: &str = "street_name";
pub const STREET_TYPE: &str = "street_type";
pub const STREET_SUFFIX: &str = "street_suffix";
pub const STATE: &str = "state";
