//! Database access layer for flavormap-server
//!
//! One `spots` table. Rows come back in insertion order (rowid), which is the
//! order clients expect from `GET /api/spots`.

use anyhow::{Context, Result};
use flavormap_common::time::{parse_iso, to_iso};
use flavormap_common::Spot;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tracing::info;

/// Open (creating if needed) the database file and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // mode=rwc: create the file on first run
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .context("Failed to open database")?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_spots_table(&pool).await?;
    Ok(pool)
}

/// In-memory database with the schema applied
///
/// Limited to a single connection: every connection to `sqlite::memory:` is a
/// separate database.
pub async fn init_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;

    create_spots_table(&pool).await?;
    Ok(pool)
}

async fn create_spots_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS spots (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            cuisine TEXT NOT NULL,
            emoji TEXT NOT NULL,
            note TEXT NOT NULL DEFAULT '',
            lat REAL NOT NULL,
            lng REAL NOT NULL,
            created_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create spots table")?;

    Ok(())
}

/// All spots in insertion order
pub async fn list_spots(pool: &SqlitePool) -> sqlx::Result<Vec<Spot>> {
    let rows = sqlx::query(
        "SELECT id, name, cuisine, emoji, note, lat, lng, created_at FROM spots ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(row_to_spot).collect()
}

pub async fn insert_spot(pool: &SqlitePool, spot: &Spot) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO spots (id, name, cuisine, emoji, note, lat, lng, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&spot.id)
    .bind(&spot.name)
    .bind(&spot.cuisine)
    .bind(&spot.emoji)
    .bind(&spot.note)
    .bind(spot.lat)
    .bind(spot.lng)
    .bind(spot.created_at.map(to_iso))
    .execute(pool)
    .await?;

    Ok(())
}

fn row_to_spot(row: &SqliteRow) -> sqlx::Result<Spot> {
    let created_at: Option<String> = row.try_get("created_at")?;

    Ok(Spot {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        cuisine: row.try_get("cuisine")?,
        emoji: row.try_get("emoji")?,
        note: row.try_get("note")?,
        lat: row.try_get("lat")?,
        lng: row.try_get("lng")?,
        created_at: created_at.as_deref().and_then(parse_iso),
    })
}
