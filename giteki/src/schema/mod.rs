pub mod codes;
pub mod types;

pub use codes::RADIO_ACCESS_TECHNOLOGIES;
pub use types::{EquipmentRecord, NaturalKey, NewEquipmentRecord, RadioAccessTechnology};
