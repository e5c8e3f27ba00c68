use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use proposal_core::{
    LifecycleState, LineItem, Proposal, ProposalContent, ProposalRepository, QuotationLedger,
    RepositoryError,
};
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::debug;

use crate::decimal::{decimal_to_text, get_decimal};

const MEMORY: &str = ":memory:";

const SELECT_PROPOSAL: &str = "SELECT id, state, tax_percent, payload, deleted_at, created_at, updated_at
     FROM proposal";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connects to `connection_string`.
    ///
    /// `":memory:"` opens a private in-memory database on a single pooled
    /// connection. A bare path is opened read-write and created if missing.
    /// Anything starting with `sqlite:` is used as a sqlx URL unchanged.
    pub async fn new(connection_string: &str) -> Result<Self> {
        let pool = if connection_string == MEMORY {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
        } else {
            SqlitePool::connect(&database_url(connection_string)).await
        }
        .with_context(|| format!("Failed to connect to database: {}", connection_string))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn database_url(connection_string: &str) -> String {
    if connection_string.starts_with("sqlite:") {
        connection_string.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", connection_string)
    }
}

fn row_to_line_item(row: &SqliteRow) -> Result<LineItem, RepositoryError> {
    let quantity: i64 = row
        .try_get("quantity")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    Ok(LineItem {
        description: row
            .try_get("description")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        unit_price: get_decimal(row, "unit_price")?,
        quantity: u32::try_from(quantity)
            .map_err(|_| RepositoryError::Database(format!("Invalid quantity: {}", quantity)))?,
        note: row
            .try_get("note")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
    })
}

/// Rebuilds a proposal from its row and line items. The line-item table is
/// authoritative for the ledger; the payload supplies everything else.
fn row_to_proposal(
    row: &SqliteRow,
    items: Vec<LineItem>,
) -> Result<Proposal, RepositoryError> {
    let payload: String = row
        .try_get("payload")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    let mut content: ProposalContent = serde_json::from_str(&payload)
        .map_err(|e| RepositoryError::Database(format!("Invalid proposal payload: {}", e)))?;

    let mut ledger = QuotationLedger::new(get_decimal(row, "tax_percent")?)
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    for item in items {
        ledger.add_item(item);
    }
    content.ledger = ledger;

    let state: String = row
        .try_get("state")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

    Ok(Proposal {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Database(e.to_string()))?,
        content,
        state: LifecycleState::parse(&state)
            .ok_or_else(|| RepositoryError::Database(format!("Invalid state: {}", state)))?,
        deleted_at: row
            .try_get::<Option<DateTime<Utc>>, _>("deleted_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get deleted_at: {}", e)))?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {}", e)))?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
    })
}

async fn fetch_line_items(
    conn: &mut SqliteConnection,
    proposal_id: i64,
) -> Result<Vec<LineItem>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT description, unit_price, quantity, note
         FROM proposal_line_item WHERE proposal_id = ? ORDER BY position",
    )
    .bind(proposal_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| RepositoryError::Database(e.to_string()))?;

    rows.iter().map(row_to_line_item).collect()
}

async fn fetch_proposal(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Proposal, RepositoryError> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_PROPOSAL))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

    let items = fetch_line_items(conn, id).await?;
    row_to_proposal(&row, items)
}

async fn insert_line_items(
    conn: &mut SqliteConnection,
    proposal_id: i64,
    ledger: &QuotationLedger,
) -> Result<(), RepositoryError> {
    for (position, item) in ledger.items().iter().enumerate() {
        sqlx::query(
            "INSERT INTO proposal_line_item (
                proposal_id, position, description, unit_price, quantity, note
            ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(proposal_id)
        .bind(position as i64)
        .bind(&item.description)
        .bind(decimal_to_text(item.unit_price))
        .bind(i64::from(item.quantity))
        .bind(&item.note)
        .execute(&mut *conn)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    }
    Ok(())
}

fn payload_json(content: &ProposalContent) -> Result<String, RepositoryError> {
    serde_json::to_string(content)
        .map_err(|e| RepositoryError::Database(format!("Failed to encode proposal payload: {}", e)))
}

#[async_trait]
impl ProposalRepository for SqliteRepository {
    async fn create_proposal(
        &self,
        content: ProposalContent,
    ) -> Result<Proposal, RepositoryError> {
        let now = Utc::now();
        let payload = payload_json(&content)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO proposal (
                client_name, customer_type, state, tax_percent, subtotal, tax_amount,
                total, amount_in_words, payload, deleted_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)",
        )
        .bind(&content.client.name)
        .bind(&content.client.customer_type)
        .bind(LifecycleState::Active.as_str())
        .bind(decimal_to_text(content.ledger.tax_percent()))
        .bind(decimal_to_text(content.totals.subtotal))
        .bind(decimal_to_text(content.totals.tax_amount))
        .bind(decimal_to_text(content.totals.total))
        .bind(&content.amount_in_words)
        .bind(payload)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        insert_line_items(&mut tx, id, &content.ledger).await?;
        let proposal = fetch_proposal(&mut tx, id).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        debug!(id, items = proposal.content.ledger.len(), "proposal row inserted");
        Ok(proposal)
    }

    async fn replace_proposal(
        &self,
        id: i64,
        content: &ProposalContent,
    ) -> Result<Proposal, RepositoryError> {
        let now = Utc::now();
        let payload = payload_json(content)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE proposal SET
                client_name = ?, customer_type = ?, tax_percent = ?, subtotal = ?,
                tax_amount = ?, total = ?, amount_in_words = ?, payload = ?, updated_at = ?
             WHERE id = ? AND state = ?",
        )
        .bind(&content.client.name)
        .bind(&content.client.customer_type)
        .bind(decimal_to_text(content.ledger.tax_percent()))
        .bind(decimal_to_text(content.totals.subtotal))
        .bind(decimal_to_text(content.totals.tax_amount))
        .bind(decimal_to_text(content.totals.total))
        .bind(&content.amount_in_words)
        .bind(payload)
        .bind(now)
        .bind(id)
        .bind(LifecycleState::Active.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM proposal_line_item WHERE proposal_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        insert_line_items(&mut tx, id, &content.ledger).await?;
        let proposal = fetch_proposal(&mut tx, id).await?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        debug!(id, items = proposal.content.ledger.len(), "proposal row replaced");
        Ok(proposal)
    }

    async fn get_proposal(
        &self,
        id: i64,
    ) -> Result<Proposal, RepositoryError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        fetch_proposal(&mut conn, id).await
    }

    async fn list_proposals(
        &self,
        state: LifecycleState,
    ) -> Result<Vec<Proposal>, RepositoryError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let rows = sqlx::query(&format!("{} WHERE state = ? ORDER BY id", SELECT_PROPOSAL))
            .bind(state.as_str())
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let mut proposals = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row
                .try_get("id")
                .map_err(|e| RepositoryError::Database(e.to_string()))?;
            let items = fetch_line_items(&mut conn, id).await?;
            proposals.push(row_to_proposal(row, items)?);
        }
        Ok(proposals)
    }

    async fn transition_state(
        &self,
        id: i64,
        from: LifecycleState,
        to: LifecycleState,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<Proposal, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE proposal SET state = ?, deleted_at = ?, updated_at = ?
             WHERE id = ? AND state = ?",
        )
        .bind(to.as_str())
        .bind(deleted_at)
        .bind(Utc::now())
        .bind(id)
        .bind(from.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let proposal = fetch_proposal(&mut tx, id).await?;
        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        debug!(id, %from, %to, "proposal state changed");
        Ok(proposal)
    }

    async fn delete_proposal(
        &self,
        id: i64,
        state: LifecycleState,
    ) -> Result<Proposal, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        // Write before reading so the transaction holds the write lock and
        // never has to upgrade from a read snapshot.
        let claimed = sqlx::query(
            "UPDATE proposal SET updated_at = updated_at WHERE id = ? AND state = ?",
        )
        .bind(id)
        .bind(state.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if claimed.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let proposal = fetch_proposal(&mut tx, id).await?;

        sqlx::query("DELETE FROM proposal_line_item WHERE proposal_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        sqlx::query("DELETE FROM proposal WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        debug!(id, "proposal row deleted");
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bare_path_becomes_create_url() {
        assert_eq!(database_url("proposals.db"), "sqlite:proposals.db?mode=rwc");
    }

    #[test]
    fn sqlx_url_is_kept() {
        assert_eq!(database_url("sqlite://data/p.db"), "sqlite://data/p.db");
    }

    #[tokio::test]
    async fn memory_database_survives_across_queries() {
        let repo = SqliteRepository::new(MEMORY).await.expect("Should connect");
        repo.run_migrations().await.expect("Should migrate");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM proposal")
            .fetch_one(repo.pool())
            .await
            .expect("Table should exist on the pooled connection");

        assert_eq!(count, 0);
    }
}
