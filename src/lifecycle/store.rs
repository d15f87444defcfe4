use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::leave::{LeaveRequest, LeaveStatus, LeaveType};

/// Persistence collaborator for the lifecycle manager. Implementations must
/// hand back consistent snapshots; the manager never caches across calls.
#[async_trait]
pub trait LeaveStore: Send + Sync {
    /// Stores a new record and returns it with its assigned id.
    async fn insert(&self, record: LeaveRequest) -> Result<LeaveRequest>;
    async fn get(&self, id: u64) -> Result<Option<LeaveRequest>>;
    async fn update(&self, record: &LeaveRequest) -> Result<()>;
    async fn list(&self) -> Result<Vec<LeaveRequest>>;
    async fn list_by_employee(&self, employee_id: u64) -> Result<Vec<LeaveRequest>>;
    /// Unconditional removal; returns false when the id was unknown.
    async fn delete(&self, id: u64) -> Result<bool>;
}

/// In-memory store for unit tests and embedded use.
pub struct MemoryLeaveStore {
    records: RwLock<HashMap<u64, LeaveRequest>>,
    next_id: AtomicU64,
}

impl MemoryLeaveStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryLeaveStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeaveStore for MemoryLeaveStore {
    async fn insert(&self, mut record: LeaveRequest) -> Result<LeaveRequest> {
        record.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut records = self.records.write().expect("leave store lock poisoned");
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<LeaveRequest>> {
        let records = self.records.read().expect("leave store lock poisoned");
        Ok(records.get(&id).cloned())
    }

    async fn update(&self, record: &LeaveRequest) -> Result<()> {
        let mut records = self.records.write().expect("leave store lock poisoned");
        if !records.contains_key(&record.id) {
            return Err(anyhow!("unknown leave request #{}", record.id));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<LeaveRequest>> {
        let records = self.records.read().expect("leave store lock poisoned");
        let mut all: Vec<_> = records.values().cloned().collect();
        all.sort_by_key(|r| r.id);
        Ok(all)
    }

    async fn list_by_employee(&self, employee_id: u64) -> Result<Vec<LeaveRequest>> {
        let own = self
            .list()
            .await?
            .into_iter()
            .filter(|r| r.employee_id == employee_id)
            .collect();
        Ok(own)
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let mut records = self.records.write().expect("leave store lock poisoned");
        Ok(records.remove(&id).is_some())
    }
}

/// MySQL-backed store. `cc_to` is persisted comma-joined (the backend's wire
/// shape); remarks live in a child table ordered by insertion id.
#[derive(Clone)]
pub struct MySqlLeaveStore {
    pool: MySqlPool,
}

impl MySqlLeaveStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn remarks_for(&self, id: u64) -> Result<Vec<String>> {
        let remarks = sqlx::query_as::<_, (String,)>(
            "SELECT remark FROM leave_remarks WHERE leave_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .context("fetching remarks")?;

        Ok(remarks.into_iter().map(|(r,)| r).collect())
    }

    async fn rows_to_records(&self, rows: Vec<LeaveRow>) -> Result<Vec<LeaveRequest>> {
        let grouped = sqlx::query_as::<_, (u64, String)>(
            "SELECT leave_id, remark FROM leave_remarks ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("fetching remarks")?;

        let mut by_leave: HashMap<u64, Vec<String>> = HashMap::new();
        for (leave_id, remark) in grouped {
            by_leave.entry(leave_id).or_default().push(remark);
        }

        rows.into_iter()
            .map(|row| {
                let remarks = by_leave.remove(&row.id).unwrap_or_default();
                row.into_record(remarks)
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct LeaveRow {
    id: u64,
    employee_id: u64,
    from_date: NaiveDate,
    to_date: NaiveDate,
    leave_type: String,
    reason: String,
    applying_to: String,
    cc_to: String,
    contact_details: String,
    status: String,
    attachment: Option<String>,
    number_of_days: i64,
}

impl LeaveRow {
    fn into_record(self, remarks: Vec<String>) -> Result<LeaveRequest> {
        let leave_type: LeaveType = self
            .leave_type
            .parse()
            .map_err(|_| anyhow!("unknown leave type '{}' in store", self.leave_type))?;
        let status: LeaveStatus = self
            .status
            .parse()
            .map_err(|_| anyhow!("unknown status '{}' in store", self.status))?;

        let cc_to = self
            .cc_to
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(LeaveRequest {
            id: self.id,
            employee_id: self.employee_id,
            from_date: self.from_date,
            to_date: self.to_date,
            leave_type,
            reason: self.reason,
            applying_to: self.applying_to,
            cc_to,
            contact_details: self.contact_details,
            status,
            attachment: self.attachment,
            remarks,
            number_of_days: self.number_of_days,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, employee_id, from_date, to_date, leave_type, reason, \
     applying_to, cc_to, contact_details, status, attachment, number_of_days \
     FROM leave_requests";

#[async_trait]
impl LeaveStore for MySqlLeaveStore {
    async fn insert(&self, mut record: LeaveRequest) -> Result<LeaveRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, from_date, to_date, leave_type, reason,
                 applying_to, cc_to, contact_details, status, attachment, number_of_days)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.employee_id)
        .bind(record.from_date)
        .bind(record.to_date)
        .bind(record.leave_type.to_string())
        .bind(&record.reason)
        .bind(&record.applying_to)
        .bind(record.cc_to.join(","))
        .bind(&record.contact_details)
        .bind(record.status.to_string())
        .bind(&record.attachment)
        .bind(record.number_of_days)
        .execute(&self.pool)
        .await
        .context("inserting leave request")?;

        record.id = result.last_insert_id();
        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<LeaveRequest>> {
        let row = sqlx::query_as::<_, LeaveRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("fetching leave request")?;

        match row {
            Some(row) => {
                let remarks = self.remarks_for(id).await?;
                Ok(Some(row.into_record(remarks)?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, record: &LeaveRequest) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, attachment = ?
            WHERE id = ?
            "#,
        )
        .bind(record.status.to_string())
        .bind(&record.attachment)
        .bind(record.id)
        .execute(&self.pool)
        .await
        .context("updating leave request")?;

        // The remark trail is append-only: persist only the tail that the
        // child table does not have yet.
        let stored: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM leave_remarks WHERE leave_id = ?")
                .bind(record.id)
                .fetch_one(&self.pool)
                .await
                .context("counting remarks")?;

        for remark in record.remarks.iter().skip(stored as usize) {
            sqlx::query("INSERT INTO leave_remarks (leave_id, remark) VALUES (?, ?)")
                .bind(record.id)
                .bind(remark)
                .execute(&self.pool)
                .await
                .context("appending remark")?;
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .context("listing leave requests")?;

        self.rows_to_records(rows).await
    }

    async fn list_by_employee(&self, employee_id: u64) -> Result<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRow>(&format!(
            "{SELECT_COLUMNS} WHERE employee_id = ? ORDER BY id"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
        .context("listing leave requests by employee")?;

        self.rows_to_records(rows).await
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        // leave_remarks rows go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("deleting leave request")?;

        Ok(result.rows_affected() > 0)
    }
}
