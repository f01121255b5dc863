use crate::error::Result;
use crate::store::Store;

/// File-level idempotence gate.
///
/// A file counts as imported as soon as one record carries its name as
/// provenance. A file that later grows new rows under the same name is
/// therefore not re-read.
pub struct ImportPlanner<'a> {
    store: &'a Store,
}

impl<'a> ImportPlanner<'a> {
    pub fn new(store: &'a Store) -> Self {
        ImportPlanner { store }
    }

    pub fn already_imported(&self, file: &str) -> Result<bool> {
        Ok(self.store.count_by_provenance(file)? > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NewEquipmentRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_already_imported_follows_provenance() {
        let store = Store::open_in_memory().unwrap();
        let planner = ImportPlanner::new(&store);
        assert!(!planner.already_imported("jan.xls").unwrap());

        store
            .insert_record(&NewEquipmentRecord {
                certified_name: "Example Corp".into(),
                equipment_type: "第2条第1項第19号".into(),
                model: "EX-100".into(),
                auth_number: "001-A00001".into(),
                radio_type: "DS".into(),
                applied_regulation: "".into(),
                auth_date: NaiveDate::from_ymd_opt(2015, 1, 20).unwrap(),
                note: "".into(),
                file: "jan.xls".into(),
            })
            .unwrap();

        assert!(planner.already_imported("jan.xls").unwrap());
        assert!(!planner.already_imported("feb.xls").unwrap());
    }
}
