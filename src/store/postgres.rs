use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::{parse_id, LeadStore, StoreError};
use crate::config::DatabaseConfig;
use crate::filter::{FilterOrder, FilterWhere, LeadFilter, SqlParam};
use crate::models::{Lead, LeadPatch, NewLead};

const TABLE: &str = "leads";

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, phone, company, city, state, source, status, \
     score, lead_value, last_activity_at, is_qualified, created_at, updated_at";

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS leads (
        id               UUID PRIMARY KEY,
        first_name       TEXT NOT NULL,
        last_name        TEXT NOT NULL,
        email            TEXT NOT NULL UNIQUE,
        phone            TEXT NOT NULL,
        company          TEXT,
        city             TEXT,
        state            TEXT,
        source           TEXT,
        status           TEXT,
        score            DOUBLE PRECISION,
        lead_value       DOUBLE PRECISION,
        last_activity_at TIMESTAMPTZ,
        is_qualified     BOOLEAN,
        created_at       TIMESTAMPTZ NOT NULL,
        updated_at       TIMESTAMPTZ NOT NULL
    )
"#;

const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS leads_created_at_idx ON leads (created_at DESC)";

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Row shape as stored; enumerations are plain text columns
#[derive(Debug, FromRow)]
struct LeadRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    company: Option<String>,
    city: Option<String>,
    state: Option<String>,
    source: Option<String>,
    status: Option<String>,
    score: Option<f64>,
    lead_value: Option<f64>,
    last_activity_at: Option<DateTime<Utc>>,
    is_qualified: Option<bool>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LeadRow {
    fn into_lead(self) -> Result<Lead, StoreError> {
        let id = self.id;
        let decode = |e: crate::models::UnknownVariant| StoreError::Decode { id, reason: e.to_string() };
        Ok(Lead {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            city: self.city,
            state: self.state,
            source: self.source.as_deref().map(str::parse).transpose().map_err(decode)?,
            status: self.status.as_deref().map(str::parse).transpose().map_err(decode)?,
            score: self.score,
            lead_value: self.lead_value,
            last_activity_at: self.last_activity_at,
            is_qualified: self.is_qualified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_leads(rows: Vec<LeadRow>) -> Result<Vec<Lead>, StoreError> {
    rows.into_iter().map(LeadRow::into_lead).collect()
}

/// Turn a unique-constraint failure on insert/update into `DuplicateEmail`
fn email_conflict(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::DuplicateEmail(email.to_string());
        }
    }
    StoreError::Sqlx(err)
}

/// PostgreSQL-backed lead store
#[derive(Clone)]
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        if config.url.trim().is_empty() {
            return Err(StoreError::ConfigMissing("DATABASE_URL"));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Created lead store pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Create the leads table and its ordering index if missing
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_CREATED_AT_INDEX).execute(&self.pool).await?;
        info!("Lead table ready");
        Ok(())
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn insert(&self, input: NewLead) -> Result<Lead, StoreError> {
        let lead = Lead::create(input, Utc::now());
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) RETURNING {}",
            TABLE, LEAD_COLUMNS, LEAD_COLUMNS
        );

        let row = sqlx::query_as::<_, LeadRow>(&sql)
            .bind(lead.id)
            .bind(&lead.first_name)
            .bind(&lead.last_name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(&lead.company)
            .bind(&lead.city)
            .bind(&lead.state)
            .bind(lead.source.map(|s| s.as_str()))
            .bind(lead.status.map(|s| s.as_str()))
            .bind(lead.score)
            .bind(lead.lead_value)
            .bind(lead.last_activity_at)
            .bind(lead.is_qualified)
            .bind(lead.created_at)
            .bind(lead.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| email_conflict(e, &lead.email))?;

        row.into_lead()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>, StoreError> {
        let id = parse_id(id)?;
        let sql = format!("SELECT {} FROM {} WHERE id = $1", LEAD_COLUMNS, TABLE);
        let row = sqlx::query_as::<_, LeadRow>(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(LeadRow::into_lead).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Lead>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE email = $1", LEAD_COLUMNS, TABLE);
        let row = sqlx::query_as::<_, LeadRow>(&sql).bind(email).fetch_optional(&self.pool).await?;
        row.map(LeadRow::into_lead).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Lead>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} {} LIMIT $1 OFFSET $2",
            LEAD_COLUMNS,
            TABLE,
            FilterOrder::generate(&FilterOrder::NEWEST_FIRST)
        );
        let rows = sqlx::query_as::<_, LeadRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        into_leads(rows)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", TABLE);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn update(&self, id: &str, patch: LeadPatch) -> Result<Option<Lead>, StoreError> {
        let id = parse_id(id)?;
        let email = patch.email.clone().unwrap_or_default();

        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET updated_at = ", TABLE));
        qb.push_bind(Utc::now());
        if let Some(v) = patch.first_name { qb.push(", first_name = ").push_bind(v); }
        if let Some(v) = patch.last_name { qb.push(", last_name = ").push_bind(v); }
        if let Some(v) = patch.email { qb.push(", email = ").push_bind(v); }
        if let Some(v) = patch.phone { qb.push(", phone = ").push_bind(v); }
        if let Some(v) = patch.company { qb.push(", company = ").push_bind(v); }
        if let Some(v) = patch.city { qb.push(", city = ").push_bind(v); }
        if let Some(v) = patch.state { qb.push(", state = ").push_bind(v); }
        if let Some(v) = patch.source { qb.push(", source = ").push_bind(v.as_str()); }
        if let Some(v) = patch.status { qb.push(", status = ").push_bind(v.as_str()); }
        if let Some(v) = patch.score { qb.push(", score = ").push_bind(v); }
        if let Some(v) = patch.lead_value { qb.push(", lead_value = ").push_bind(v); }
        if let Some(v) = patch.last_activity_at { qb.push(", last_activity_at = ").push_bind(v); }
        if let Some(v) = patch.is_qualified { qb.push(", is_qualified = ").push_bind(v); }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ").push(LEAD_COLUMNS);

        let row = qb
            .build_query_as::<LeadRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| email_conflict(e, &email))?;
        row.map(LeadRow::into_lead).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let id = parse_id(id)?;
        let sql = format!("DELETE FROM {} WHERE id = $1", TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, filter: &LeadFilter) -> Result<Vec<Lead>, StoreError> {
        let where_result = FilterWhere::generate(filter, 0);
        let sql = format!(
            "SELECT {} FROM {} WHERE {} {}",
            LEAD_COLUMNS,
            TABLE,
            where_result.query,
            FilterOrder::generate(&FilterOrder::NEWEST_FIRST)
        );
        tracing::debug!("Lead search: {} ({} params)", sql, where_result.params.len());

        let mut q = sqlx::query_as::<_, LeadRow>(&sql);
        for p in where_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        into_leads(q.fetch_all(&self.pool).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed lead store pool");
    }
}

fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: &SqlParam,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlParam::Text(s) => q.bind(s.clone()),
        SqlParam::Float(f) => q.bind(*f),
        SqlParam::Timestamp(t) => q.bind(*t),
        SqlParam::Bool(b) => q.bind(*b),
    }
}
