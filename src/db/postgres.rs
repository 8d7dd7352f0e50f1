//! PostgreSQL product store
//!
//! Concrete implementation using tokio-postgres.

use crate::config::ConnectionConfig;
use crate::config::connections::SslMode;
use crate::db::provider::{ProductStore, TABLE_NAME};
use crate::db::schema::{Column, SAMPLE_ROWS, SchemaTree, Table};
use crate::db::types::DataType;
use crate::error::{DbError, DbResult};
use crate::scrape::types::{ProductRecord, StoredRow};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;
use tokio_postgres::Client;

/// Upper bound for any single store operation, connection included
const OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

const CREATE_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS "TopBrands" (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255),
    price VARCHAR(50),
    rating FLOAT,
    reviews INTEGER
)"#;

const DELETE_ALL: &str = r#"DELETE FROM "TopBrands""#;

const INSERT_ROW: &str =
    r#"INSERT INTO "TopBrands" (name, price, rating, reviews) VALUES ($1, $2, $3, $4)"#;

const COUNT_ROWS: &str = r#"SELECT COUNT(*) FROM "TopBrands""#;

const TOP_RATED: &str = r#"SELECT id, name, price, rating, reviews FROM "TopBrands"
    ORDER BY rating DESC NULLS LAST, id ASC LIMIT 1"#;

/// PostgreSQL-backed [`ProductStore`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresStore;

impl PostgresStore {
    pub fn new() -> Self {
        Self
    }

    /// Open a connection for one operation.
    ///
    /// The connection task is spawned in the background and ends when the
    /// returned client is dropped, so releasing the client releases the
    /// connection on every exit path.
    async fn connect(config: &ConnectionConfig) -> DbResult<Client> {
        config
            .validate()
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        let conn_string = config.connection_string_with_password();
        let db = config.display_name();

        let client = match config.ssl_mode {
            SslMode::Disable => {
                let (client, connection) =
                    tokio_postgres::connect(&conn_string, tokio_postgres::NoTls)
                        .await
                        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::warn!(%db, error = %e, "database connection closed with error");
                    }
                });
                client
            }
            SslMode::Prefer | SslMode::Require => {
                let tls_config = make_tls_config();
                let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
                let (client, connection) = tokio_postgres::connect(&conn_string, tls)
                    .await
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::warn!(%db, error = %e, "database connection closed with error");
                    }
                });
                client
            }
        };

        Ok(client)
    }
}

/// Run one store operation under [`OPERATION_TIMEOUT`]
async fn bounded<T>(op: impl Future<Output = DbResult<T>>) -> DbResult<T> {
    tokio::time::timeout(OPERATION_TIMEOUT, op)
        .await
        .map_err(|_| DbError::Timeout)?
}

fn query_err(e: tokio_postgres::Error) -> DbError {
    DbError::QueryFailed(e.to_string())
}

#[async_trait]
impl ProductStore for PostgresStore {
    async fn ensure_schema(&self, config: &ConnectionConfig) -> DbResult<()> {
        bounded(async {
            let client = Self::connect(config).await?;
            client.batch_execute(CREATE_TABLE).await.map_err(query_err)
        })
        .await
    }

    async fn replace_all(
        &self,
        config: &ConnectionConfig,
        records: &[ProductRecord],
    ) -> DbResult<usize> {
        bounded(async {
            let mut client = Self::connect(config).await?;
            client.batch_execute(CREATE_TABLE).await.map_err(query_err)?;

            // Rolled back on drop unless committed
            let tx = client.transaction().await.map_err(query_err)?;
            let deleted = tx.execute(DELETE_ALL, &[]).await.map_err(query_err)?;

            let insert = tx.prepare(INSERT_ROW).await.map_err(query_err)?;
            for record in records {
                let reviews = i32::try_from(record.reviews).unwrap_or(i32::MAX);
                tx.execute(
                    &insert,
                    &[&record.name, &record.price, &record.rating, &reviews],
                )
                .await
                .map_err(query_err)?;
            }
            tx.commit().await.map_err(query_err)?;

            tracing::info!(
                target_db = %config.display_name(),
                deleted,
                inserted = records.len(),
                "replaced stored products"
            );
            Ok(records.len())
        })
        .await
    }

    async fn count_rows(&self, config: &ConnectionConfig) -> DbResult<i64> {
        bounded(async {
            let client = Self::connect(config).await?;
            let row = client.query_one(COUNT_ROWS, &[]).await.map_err(query_err)?;
            Ok(row.get::<_, i64>(0))
        })
        .await
    }

    async fn top_rated_row(&self, config: &ConnectionConfig) -> DbResult<Option<StoredRow>> {
        bounded(async {
            let client = Self::connect(config).await?;
            let row = client.query_opt(TOP_RATED, &[]).await.map_err(query_err)?;
            Ok(row.map(|row| StoredRow {
                id: row.get(0),
                name: row.get::<_, Option<String>>(1).unwrap_or_default(),
                price: row.get::<_, Option<String>>(2).unwrap_or_default(),
                rating: row.get::<_, Option<f64>>(3).unwrap_or_default(),
                reviews: row
                    .get::<_, Option<i32>>(4)
                    .and_then(|r| u32::try_from(r).ok())
                    .unwrap_or(0),
            }))
        })
        .await
    }

    async fn table_info(&self, config: &ConnectionConfig) -> DbResult<SchemaTree> {
        bounded(async {
            let client = Self::connect(config).await?;
            load_schema(&client).await
        })
        .await
    }
}

/// Read tables, columns and primary keys of the `public` schema, plus a few
/// sample rows per table.
async fn load_schema(client: &Client) -> DbResult<SchemaTree> {
    let map_err = |e: tokio_postgres::Error| DbError::SchemaLoadFailed(e.to_string());

    let rel_rows = client
        .query(
            "SELECT c.relname, a.attname, format_type(a.atttypid, a.atttypmod), a.attnotnull \
             FROM pg_class c \
             JOIN pg_namespace n ON n.oid = c.relnamespace \
             JOIN pg_attribute a ON a.attrelid = c.oid \
             WHERE c.relkind = 'r' \
               AND n.nspname = 'public' \
               AND a.attnum > 0 AND NOT a.attisdropped \
             ORDER BY c.relname, a.attnum",
            &[],
        )
        .await
        .map_err(&map_err)?;

    let pk_rows = client
        .query(
            "SELECT c.relname, a.attname \
             FROM pg_constraint con \
             JOIN pg_class c ON c.oid = con.conrelid \
             JOIN pg_namespace n ON n.oid = c.relnamespace \
             JOIN LATERAL unnest(con.conkey) AS u(attnum) ON true \
             JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = u.attnum \
             WHERE con.contype = 'p' AND n.nspname = 'public'",
            &[],
        )
        .await
        .map_err(&map_err)?;

    let pk_set: HashSet<(String, String)> = pk_rows
        .iter()
        .map(|r| (r.get::<_, String>(0), r.get::<_, String>(1)))
        .collect();

    // Keep catalog order while grouping columns per table
    let mut order: Vec<String> = Vec::new();
    let mut columns: HashMap<String, Vec<Column>> = HashMap::new();
    for row in &rel_rows {
        let table: String = row.get(0);
        let name: String = row.get(1);
        let type_name: String = row.get(2);
        let not_null: bool = row.get(3);

        let is_primary_key = pk_set.contains(&(table.clone(), name.clone()));
        let entry = columns.entry(table.clone()).or_insert_with(|| {
            order.push(table.clone());
            Vec::new()
        });
        entry.push(Column {
            name,
            data_type: DataType::from_format_type(&type_name),
            nullable: !not_null,
            is_primary_key,
        });
    }

    let mut tables = Vec::with_capacity(order.len());
    for name in order {
        let columns = columns.remove(&name).unwrap_or_default();
        let sample_rows = load_samples(client, &name, &columns)
            .await
            .map_err(&map_err)?;
        tables.push(Table {
            name,
            columns,
            sample_rows,
        });
    }

    // The products table first; it is what questions are about
    tables.sort_by_key(|t| t.name != TABLE_NAME);

    Ok(SchemaTree { tables })
}

async fn load_samples(
    client: &Client,
    table: &str,
    columns: &[Column],
) -> Result<Vec<Vec<Option<String>>>, tokio_postgres::Error> {
    if columns.is_empty() {
        return Ok(Vec::new());
    }
    let select_list: Vec<String> = columns
        .iter()
        .map(|c| format!("{}::text", quote_ident(&c.name)))
        .collect();
    let sql = format!(
        "SELECT {} FROM public.{} LIMIT {}",
        select_list.join(", "),
        quote_ident(table),
        SAMPLE_ROWS
    );

    let rows = client.query(&sql, &[]).await?;
    Ok(rows
        .iter()
        .map(|row| {
            (0..columns.len())
                .map(|i| row.get::<_, Option<String>>(i))
                .collect()
        })
        .collect())
}

/// Quote a SQL identifier
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Build a rustls ClientConfig that trusts OS certificates (with Mozilla roots as fallback)
fn make_tls_config() -> rustls::ClientConfig {
    let mut root_store = rustls::RootCertStore::empty();

    let native_certs = rustls_native_certs::load_native_certs();
    let mut loaded = 0;
    for cert in native_certs.certs {
        if root_store.add(cert).is_ok() {
            loaded += 1;
        }
    }
    if loaded == 0 {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}
