use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgArguments, PgPool, Row};

use crate::catalog::{CatalogCreate, CatalogUpdate, RawRecord};
use crate::database::store::{CatalogStore, StoreError};
use crate::filter::{compile_filter, CatalogFilter, SqlResult};

const UNIQUE_VIOLATION: &str = "23505";

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "catalog" (
    "poi"             TEXT PRIMARY KEY,
    "city"            TEXT NOT NULL,
    "country"         TEXT NOT NULL,
    "currency"        TEXT,
    "latitude"        DOUBLE PRECISION,
    "longitude"       DOUBLE PRECISION,
    "rating"          DOUBLE PRECISION,
    "description"     TEXT,
    "spending"        TEXT,
    "budget"          BIGINT,
    "vibes"           TEXT,
    "activities"      TEXT,
    "food"            TEXT,
    "best_season"     TEXT,
    "trip_days"       BIGINT,
    "nearest_airport" TEXT,
    "transport"       TEXT,
    "accessibility"   TEXT,
    "direction"       TEXT,
    "created_at"      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    "updated_at"      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#;

const INSERT_SQL: &str = r#"
WITH inserted AS (
    INSERT INTO "catalog" (
        "poi", "city", "country", "currency", "latitude", "longitude", "rating",
        "description", "spending", "budget", "vibes", "activities", "food",
        "best_season", "trip_days", "nearest_airport", "transport",
        "accessibility", "direction"
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
    RETURNING *
)
SELECT row_to_json(inserted) AS row FROM inserted"#;

/// Catalog store backed by the Postgres `catalog` table.
pub struct PgCatalogStore {
    pool: PgPool,
    query_logging: bool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool, query_logging: bool) -> Self {
        Self { pool, query_logging }
    }

    /// Create the `catalog` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    fn log_query(&self, sql: &str, params: &[Value]) {
        if self.query_logging {
            tracing::debug!(sql = %sql.trim(), params = ?params, "catalog query");
        }
    }

    async fn fetch_rows(&self, sql: &str, params: &[Value]) -> Result<Vec<RawRecord>, StoreError> {
        self.log_query(sql, params);
        let mut q = sqlx::query(sql);
        for p in params.iter() {
            q = bind_param_query(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_record).collect()
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, catalog: CatalogCreate) -> Result<RawRecord, StoreError> {
        self.log_query(INSERT_SQL, &[Value::String(catalog.poi.clone())]);
        let result = sqlx::query(INSERT_SQL)
            .bind(&catalog.poi)
            .bind(&catalog.city)
            .bind(&catalog.country)
            .bind(&catalog.currency)
            .bind(catalog.latitude)
            .bind(catalog.longitude)
            .bind(catalog.rating)
            .bind(&catalog.description)
            .bind(&catalog.spending)
            .bind(catalog.budget)
            .bind(&catalog.vibes)
            .bind(&catalog.activities)
            .bind(&catalog.food)
            .bind(&catalog.best_season)
            .bind(catalog.trip_days)
            .bind(&catalog.nearest_airport)
            .bind(&catalog.transport)
            .bind(&catalog.accessibility)
            .bind(&catalog.direction)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => row_to_record(&row),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(StoreError::Duplicate(catalog.poi))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, poi: &str) -> Result<Option<RawRecord>, StoreError> {
        let sql = r#"SELECT row_to_json(t) AS row FROM (SELECT * FROM "catalog" WHERE "poi" = $1) t"#;
        let params = [Value::String(poi.to_string())];
        Ok(self.fetch_rows(sql, &params).await?.into_iter().next())
    }

    async fn list(&self, filter: &CatalogFilter) -> Result<Vec<RawRecord>, StoreError> {
        let where_result = compile_filter(filter);
        let sql = format!(
            r#"SELECT row_to_json(t) AS row FROM (SELECT * FROM "catalog" WHERE {} ORDER BY "poi") t"#,
            where_result.query
        );
        self.fetch_rows(&sql, &where_result.params).await
    }

    async fn update(&self, poi: &str, update: CatalogUpdate) -> Result<RawRecord, StoreError> {
        let statement = update_statement(poi, update.changes());
        self.fetch_rows(&statement.query, &statement.params)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(poi.to_string()))
    }

    async fn delete(&self, poi: &str) -> Result<(), StoreError> {
        let sql = r#"DELETE FROM "catalog" WHERE "poi" = $1"#;
        self.log_query(sql, &[Value::String(poi.to_string())]);
        let result = sqlx::query(sql).bind(poi).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(poi.to_string()));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// `UPDATE ... RETURNING` for the supplied columns. Cleared columns are
/// written as a literal `NULL` so no untyped parameter reaches Postgres; the
/// key is always the last placeholder.
fn update_statement(poi: &str, changes: Map<String, Value>) -> SqlResult {
    let mut params: Vec<Value> = Vec::with_capacity(changes.len() + 1);
    let mut assignments: Vec<String> = Vec::with_capacity(changes.len() + 1);
    for (column, value) in changes {
        if value.is_null() {
            assignments.push(format!("\"{}\" = NULL", column));
        } else {
            params.push(value);
            assignments.push(format!("\"{}\" = ${}", column, params.len()));
        }
    }
    assignments.push("\"updated_at\" = NOW()".to_string());
    params.push(Value::String(poi.to_string()));

    let query = format!(
        r#"WITH updated AS (UPDATE "catalog" SET {} WHERE "poi" = ${} RETURNING *) SELECT row_to_json(updated) AS row FROM updated"#,
        assignments.join(", "),
        params.len()
    );
    SqlResult { query, params }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<RawRecord, StoreError> {
    match row.try_get::<Value, _>("row")? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Decode(format!("unexpected record format: {}", other))),
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Criteria and update columns are scalar; arrays and objects go in as JSONB
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
