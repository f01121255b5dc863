use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A certified-equipment entry that has not been stored yet.
///
/// `file` is provenance only; it is not part of the record's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEquipmentRecord {
    pub certified_name: String,
    pub equipment_type: String,
    pub model: String,
    pub auth_number: String,
    pub radio_type: String,
    pub applied_regulation: String,
    pub auth_date: NaiveDate,
    pub note: String,
    pub file: String,
}

impl NewEquipmentRecord {
    /// The fields whose combination is unique across the whole store.
    pub fn natural_key(&self) -> NaturalKey<'_> {
        NaturalKey {
            certified_name: &self.certified_name,
            equipment_type: &self.equipment_type,
            model: &self.model,
            auth_number: &self.auth_number,
            radio_type: &self.radio_type,
            auth_date: self.auth_date,
        }
    }
}

/// A stored equipment entry with its generated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: i64,
    #[serde(flatten)]
    pub record: NewEquipmentRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NaturalKey<'a> {
    pub certified_name: &'a str,
    pub equipment_type: &'a str,
    pub model: &'a str,
    pub auth_number: &'a str,
    pub radio_type: &'a str,
    pub auth_date: NaiveDate,
}

impl fmt::Display for NaturalKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {} / {} / {}",
            self.certified_name,
            self.equipment_type,
            self.model,
            self.auth_number,
            self.radio_type,
            self.auth_date.format("%Y-%m-%d"),
        )
    }
}

/// Reference entry describing an equipment-type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioAccessTechnology {
    pub equipment_type: String,
    pub description: String,
}
