use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::domain::{Claim, Entity, Patient, Provider};
use crate::error::{EtlError, Result};
use crate::reference::{medication_category, DIAGNOSIS_REF, MEDICATIONS};

use super::{ResolvedPrescription, Warehouse, WriteMode};

/// Embedded SQLite warehouse. A single connection per loader instance; each
/// write path runs in its own transaction scope.
pub struct SqliteWarehouse {
    conn: Mutex<Connection>,
}

impl SqliteWarehouse {
    /// Open (or create) the warehouse database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!("Connecting to warehouse at {}", path.display());
        let conn = Connection::open(path).map_err(|e| EtlError::Connection {
            message: format!("failed to open warehouse '{}': {e}", path.display()),
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| EtlError::Connection {
                message: format!("failed to configure warehouse: {e}"),
            })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory warehouse, used by tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| EtlError::Connection {
            message: format!("failed to open in-memory warehouse: {e}"),
        })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn date_str(date: Option<chrono::NaiveDate>) -> Option<String> {
    date.map(|d| d.to_string())
}

#[async_trait]
impl Warehouse for SqliteWarehouse {
    async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| EtlError::Connection {
                message: format!("warehouse did not answer: {e}"),
            })
    }

    async fn ensure_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(include_str!("../../migrations/001_create_warehouse.sql"))?;

        // Reference tables are seeded from the static formulary.
        for (id, name) in MEDICATIONS {
            conn.execute(
                "INSERT OR IGNORE INTO medications (medication_id, medication_name, category) VALUES (?1, ?2, ?3)",
                params![id, name, medication_category(name)],
            )?;
        }
        for (code, description) in DIAGNOSIS_REF {
            conn.execute(
                "INSERT OR IGNORE INTO diagnosis_ref (diagnosis_code, description) VALUES (?1, ?2)",
                params![code, description],
            )?;
        }

        info!("Warehouse schema applied");
        Ok(())
    }

    async fn replace_patients(&self, rows: &[Patient]) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM patients", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO patients (patient_id, age, gender, race, zip_code, insurance_type,
                    chronic_conditions, last_visit_date, age_category, risk_level, patient_status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for p in rows {
                stmt.execute(params![
                    p.patient_id,
                    p.age,
                    p.gender.as_str(),
                    p.race,
                    p.zip_code,
                    p.insurance_type,
                    p.chronic_conditions,
                    date_str(p.last_visit_date),
                    p.age_category.as_str(),
                    p.risk_level.as_str(),
                    p.patient_status.as_str(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    async fn replace_providers(&self, rows: &[Provider]) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM providers", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO providers (provider_id, hospital_name, provider_type, state, city,
                    beds, teaching_hospital, hospital_size, full_address,
                    avg_cost, readmission_rate, patient_volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for p in rows {
                stmt.execute(params![
                    p.provider_id,
                    p.hospital_name,
                    p.provider_type,
                    p.state,
                    p.city,
                    p.beds,
                    p.teaching_hospital,
                    p.hospital_size.as_str(),
                    p.full_address,
                    p.avg_cost,
                    p.readmission_rate,
                    p.patient_volume,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    async fn write_claims(&self, rows: &[Claim], mode: WriteMode) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        if mode == WriteMode::Replace {
            tx.execute("DELETE FROM claims", [])?;
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO claims (claim_id, patient_id, provider_id, admission_date,
                    discharge_date, diagnosis_code, procedure_code, cost, insurance_type,
                    length_of_stay, readmission_date, readmission_flag, cost_per_day,
                    cost_category, los_category, admission_month, admission_quarter, admission_year)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            )?;
            for c in rows {
                stmt.execute(params![
                    c.claim_id,
                    c.patient_id,
                    c.provider_id,
                    date_str(c.admission_date),
                    date_str(c.discharge_date),
                    c.diagnosis_code,
                    c.procedure_code,
                    c.cost,
                    c.insurance_type,
                    c.length_of_stay,
                    date_str(c.readmission_date),
                    c.readmission_flag,
                    c.cost_per_day,
                    c.cost_category.as_str(),
                    c.los_category.as_str(),
                    c.admission_month,
                    c.admission_quarter,
                    c.admission_year,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    async fn write_prescriptions(
        &self,
        rows: &[ResolvedPrescription],
        mode: WriteMode,
    ) -> Result<usize> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        if mode == WriteMode::Replace {
            tx.execute("DELETE FROM prescriptions", [])?;
        }
        {
            let mut stmt = tx.prepare(
                "INSERT INTO prescriptions (prescription_id, patient_id, provider_id,
                    medication_id, medication_name, prescription_date, days_supplied,
                    days_prescribed, quantity, cost, adherence_rate, adherence_category,
                    cost_per_day, medication_category, prescription_month,
                    prescription_quarter, prescription_year)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            )?;
            for r in rows {
                let rx = &r.rx;
                stmt.execute(params![
                    rx.prescription_id,
                    rx.patient_id,
                    rx.provider_id,
                    r.medication_id,
                    rx.medication_name,
                    date_str(rx.prescription_date),
                    rx.days_supplied,
                    rx.days_prescribed,
                    rx.quantity,
                    rx.cost,
                    rx.adherence_rate,
                    rx.adherence_category.as_str(),
                    rx.cost_per_day,
                    rx.medication_category,
                    rx.prescription_month,
                    rx.prescription_quarter,
                    rx.prescription_year,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    async fn medication_lookup(&self) -> Result<HashMap<String, i64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT medication_name, medication_id FROM medications")?;
        let mut rows = stmt.query([])?;
        let mut map = HashMap::new();
        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            let id: i64 = row.get(1)?;
            map.insert(name, id);
        }
        Ok(map)
    }

    async fn refresh_provider_metrics(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            UPDATE providers SET
                avg_cost = COALESCE((SELECT AVG(c.cost) FROM claims c
                    WHERE c.provider_id = providers.provider_id), 0),
                readmission_rate = COALESCE((SELECT AVG(c.readmission_flag) FROM claims c
                    WHERE c.provider_id = providers.provider_id), 0),
                patient_volume = COALESCE((SELECT COUNT(DISTINCT c.patient_id) FROM claims c
                    WHERE c.provider_id = providers.provider_id), 0);
            "#,
        )?;
        info!("Provider metrics updated from loaded claims");
        Ok(())
    }

    async fn table_counts(&self) -> Result<BTreeMap<Entity, u64>> {
        let conn = self.conn.lock().unwrap();
        let mut counts = BTreeMap::new();
        for entity in Entity::LOAD_ORDER {
            let count: u64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", entity.name()),
                [],
                |row| row.get(0),
            )?;
            counts.insert(entity, count);
        }
        Ok(counts)
    }
}
