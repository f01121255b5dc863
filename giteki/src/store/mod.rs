use crate::error::Result;
use crate::schema::{
    EquipmentRecord, NewEquipmentRecord, RadioAccessTechnology, RADIO_ACCESS_TECHNOLOGIES,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-backed storage for equipment records and the reference code table.
///
/// The connection is owned by the store and released when the store is closed
/// or dropped.
pub struct Store {
    conn: Connection,
}

/// Result of a single record insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted { id: i64 },
    /// The natural key is already present; the store was left unchanged.
    Duplicate,
}

/// Result of seeding a single reference code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted,
    AlreadyPresent,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub already_present: usize,
}

impl SeedReport {
    fn record(&mut self, outcome: SeedOutcome) {
        match outcome {
            SeedOutcome::Inserted => self.inserted += 1,
            SeedOutcome::AlreadyPresent => self.already_present += 1,
        }
    }
}

impl Store {
    /// Open or create the store at the given path and initialize it.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Store { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure both tables exist and seed the reference codes.
    /// Safe to call any number of times against the same database.
    pub fn initialize(&self) -> Result<SeedReport> {
        self.create_tables()?;
        let report = self.seed_radio_access_technologies()?;
        log::debug!(
            "seeded reference codes: {} inserted, {} already present",
            report.inserted,
            report.already_present
        );
        Ok(report)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS equipment_info (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                certified_name TEXT NOT NULL,
                equipment_type TEXT NOT NULL,
                model TEXT NOT NULL,
                auth_number TEXT NOT NULL,
                radio_type TEXT NOT NULL,
                applied_regulation TEXT NOT NULL,
                auth_date TEXT NOT NULL,
                note TEXT NOT NULL,
                file TEXT NOT NULL,
                UNIQUE (certified_name, equipment_type, model, auth_number, radio_type, auth_date)
            );

            CREATE INDEX IF NOT EXISTS idx_equipment_info_file ON equipment_info(file);

            CREATE TABLE IF NOT EXISTS radio_access_technology (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                equipment_type TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn seed_radio_access_technologies(&self) -> Result<SeedReport> {
        // Dropping the transaction on an early return rolls the seed back.
        let tx = self.conn.unchecked_transaction()?;
        let mut report = SeedReport::default();
        for (code, description) in RADIO_ACCESS_TECHNOLOGIES {
            report.record(insert_radio_access_technology(&tx, code, description)?);
        }
        tx.commit()?;
        Ok(report)
    }

    // ── Equipment Records ────────────────────────────────────────────

    /// Insert one record. A natural-key collision is reported as
    /// `InsertOutcome::Duplicate`; every other failure is an error.
    pub fn insert_record(&self, record: &NewEquipmentRecord) -> Result<InsertOutcome> {
        let result = self.conn.execute(
            "INSERT INTO equipment_info (
                certified_name, equipment_type, model, auth_number, radio_type,
                applied_regulation, auth_date, note, file
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.certified_name,
                record.equipment_type,
                record.model,
                record.auth_number,
                record.radio_type,
                record.applied_regulation,
                record.auth_date,
                record.note,
                record.file,
            ],
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted {
                id: self.conn.last_insert_rowid(),
            }),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of records whose provenance is the given file name.
    pub fn count_by_provenance(&self, file: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM equipment_info WHERE file = ?1",
            params![file],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// All records in insertion order.
    pub fn list_all(&self) -> Result<Vec<EquipmentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, certified_name, equipment_type, model, auth_number, radio_type,
                    applied_regulation, auth_date, note, file
             FROM equipment_info ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EquipmentRecord {
                id: row.get(0)?,
                record: NewEquipmentRecord {
                    certified_name: row.get(1)?,
                    equipment_type: row.get(2)?,
                    model: row.get(3)?,
                    auth_number: row.get(4)?,
                    radio_type: row.get(5)?,
                    applied_regulation: row.get(6)?,
                    auth_date: row.get(7)?,
                    note: row.get(8)?,
                    file: row.get(9)?,
                },
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn count_records(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM equipment_info", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Record counts per source file, in the order the files were first imported.
    pub fn provenance_counts(&self) -> Result<Vec<(String, usize)>> {
        let mut stmt = self.conn.prepare(
            "SELECT file, COUNT(*) FROM equipment_info GROUP BY file ORDER BY MIN(id)",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    // ── Reference Codes ──────────────────────────────────────────────

    pub fn list_radio_access_technologies(&self) -> Result<Vec<RadioAccessTechnology>> {
        let mut stmt = self.conn.prepare(
            "SELECT equipment_type, description FROM radio_access_technology ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RadioAccessTechnology {
                equipment_type: row.get(0)?,
                description: row.get(1)?,
            })
        })?;

        let mut codes = Vec::new();
        for row in rows {
            codes.push(row?);
        }
        Ok(codes)
    }

    /// Look up the description of an equipment-type code. Unknown codes are
    /// not an error; records may carry codes missing from the reference table.
    pub fn describe_equipment_type(&self, code: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row(
                "SELECT description FROM radio_access_technology WHERE equipment_type = ?1",
                params![code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(result)
    }

    /// Close the underlying connection, surfacing any error from SQLite.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}

fn insert_radio_access_technology(
    conn: &Connection,
    code: &str,
    description: &str,
) -> Result<SeedOutcome> {
    let result = conn.execute(
        "INSERT INTO radio_access_technology (equipment_type, description) VALUES (?1, ?2)",
        params![code, description],
    );
    match result {
        Ok(_) => Ok(SeedOutcome::Inserted),
        Err(e) if is_unique_violation(&e) => Ok(SeedOutcome::AlreadyPresent),
        Err(e) => Err(e.into()),
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitekiError;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn record(model: &str, file: &str) -> NewEquipmentRecord {
        NewEquipmentRecord {
            certified_name: "Example Corp".into(),
            equipment_type: "第2条第1項第19号".into(),
            model: model.into(),
            auth_number: "001-A00001".into(),
            radio_type: "DS".into(),
            applied_regulation: "".into(),
            auth_date: NaiveDate::from_ymd_opt(2015, 1, 20).unwrap(),
            note: "".into(),
            file: file.into(),
        }
    }

    #[test]
    fn test_initialize_seeds_reference_codes() {
        let store = Store::open_in_memory().unwrap();
        let codes = store.list_radio_access_technologies().unwrap();
        assert_eq!(codes.len(), RADIO_ACCESS_TECHNOLOGIES.len());
        assert_eq!(codes[0].equipment_type, RADIO_ACCESS_TECHNOLOGIES[0].0);
    }

    #[test]
    fn test_seed_is_idempotent_across_opens() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("giteki.db");

        let store = Store::open(&path).unwrap();
        store.close().unwrap();

        let store = Store::open(&path).unwrap();
        let report = store.initialize().unwrap();
        assert_eq!(
            report,
            SeedReport {
                inserted: 0,
                already_present: RADIO_ACCESS_TECHNOLOGIES.len(),
            }
        );
        assert_eq!(
            store.list_radio_access_technologies().unwrap().len(),
            RADIO_ACCESS_TECHNOLOGIES.len()
        );
    }

    #[test]
    fn test_insert_assigns_ids_in_order() {
        let store = Store::open_in_memory().unwrap();
        let first = store.insert_record(&record("EX-100", "jan.xls")).unwrap();
        let second = store.insert_record(&record("EX-200", "jan.xls")).unwrap();

        match (first, second) {
            (InsertOutcome::Inserted { id: a }, InsertOutcome::Inserted { id: b }) => {
                assert!(a < b)
            }
            other => panic!("expected two inserts, got {other:?}"),
        }

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].record.model, "EX-100");
        assert_eq!(all[1].record.model, "EX-200");
    }

    #[test]
    fn test_duplicate_natural_key_leaves_store_unchanged() {
        let store = Store::open_in_memory().unwrap();
        store.insert_record(&record("EX-100", "jan.xls")).unwrap();

        let mut again = record("EX-100", "feb.xls");
        again.note = "different note".into();
        let outcome = store.insert_record(&again).unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate);

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.file, "jan.xls");
        assert_eq!(all[0].record.note, "");
        assert_eq!(store.count_by_provenance("feb.xls").unwrap(), 0);
    }

    #[test]
    fn test_different_date_is_a_different_record() {
        let store = Store::open_in_memory().unwrap();
        store.insert_record(&record("EX-100", "jan.xls")).unwrap();

        let mut later = record("EX-100", "jan.xls");
        later.auth_date = NaiveDate::from_ymd_opt(2015, 2, 1).unwrap();
        assert!(matches!(
            store.insert_record(&later).unwrap(),
            InsertOutcome::Inserted { .. }
        ));
        assert_eq!(store.count_records().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_across_connections() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("giteki.db");
        let a = Store::open(&path).unwrap();
        let b = Store::open(&path).unwrap();

        assert!(matches!(
            a.insert_record(&record("EX-100", "jan.xls")).unwrap(),
            InsertOutcome::Inserted { .. }
        ));
        assert_eq!(
            b.insert_record(&record("EX-100", "other.xls")).unwrap(),
            InsertOutcome::Duplicate
        );
        assert_eq!(b.count_records().unwrap(), 1);
    }

    #[test]
    fn test_count_by_provenance() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.count_by_provenance("jan.xls").unwrap(), 0);

        store.insert_record(&record("EX-100", "jan.xls")).unwrap();
        store.insert_record(&record("EX-200", "jan.xls")).unwrap();
        store.insert_record(&record("EX-300", "feb.xls")).unwrap();

        assert_eq!(store.count_by_provenance("jan.xls").unwrap(), 2);
        assert_eq!(store.count_by_provenance("feb.xls").unwrap(), 1);
        assert_eq!(
            store.provenance_counts().unwrap(),
            vec![("jan.xls".to_string(), 2), ("feb.xls".to_string(), 1)]
        );
    }

    #[test]
    fn test_unknown_equipment_type_is_storable() {
        let store = Store::open_in_memory().unwrap();
        let mut unknown = record("EX-100", "jan.xls");
        unknown.equipment_type = "第99条".into();
        assert!(matches!(
            store.insert_record(&unknown).unwrap(),
            InsertOutcome::Inserted { .. }
        ));
        assert!(store.describe_equipment_type("第99条").unwrap().is_none());
        assert!(store
            .describe_equipment_type(RADIO_ACCESS_TECHNOLOGIES[0].0)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_other_store_failures_are_errors() {
        let store = Store::open_in_memory().unwrap();
        store.conn.execute_batch("DROP TABLE equipment_info").unwrap();

        let err = store.insert_record(&record("EX-100", "jan.xls")).unwrap_err();
        assert!(matches!(err, GitekiError::Sqlite(_)));
    }
}
