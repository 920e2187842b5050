//! PostgreSQL storage for games
//!
//! Rows are matched on their natural key (home team, away team, start time).
//! The table name comes from configuration and is checked before it is ever
//! placed into SQL text.

use crate::config::DatabaseConfig;
use crate::error::{ImporterError, Result};
use crate::models::{GameRow, ImportSummary, UpsertOutcome};
use chrono::{DateTime, Utc};
use game_validator::StoredGame;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};

/// Whether a name can be used as an unquoted SQL identifier
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Game table access
pub struct GameStore {
    pool: PgPool,
    table: String,
}

impl GameStore {
    /// Connect to the database
    pub async fn connect(config: &DatabaseConfig, table: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        info!("Connected to database");
        Self::new(pool, table)
    }

    /// Wrap an existing pool
    pub fn new(pool: PgPool, table: &str) -> Result<Self> {
        if !is_sql_identifier(table) {
            return Err(ImporterError::invalid_config(format!("invalid table name: {table}")));
        }
        Ok(Self { pool, table: table.to_string() })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Update the row with the same natural key, or insert a new one
    pub async fn upsert_game(&self, row: &GameRow) -> Result<UpsertOutcome> {
        let existing: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM {} WHERE home_team = $1 AND away_team = $2 AND start_time = $3 LIMIT 1",
            self.table
        ))
        .bind(&row.home_team)
        .bind(&row.away_team)
        .bind(row.start_time)
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some(id) => {
                sqlx::query(&format!(
                    "UPDATE {} SET sport_id = $1, home_score = $2, away_score = $3, result = $4, \
                     is_closed = $5, stadium = $6 WHERE id = $7",
                    self.table
                ))
                .bind(row.sport_id)
                .bind(row.home_score)
                .bind(row.away_score)
                .bind(&row.result)
                .bind(row.is_closed)
                .bind(&row.stadium)
                .bind(id)
                .execute(&self.pool)
                .await?;
                debug!("Updated game {}: {} vs {}", id, row.away_team, row.home_team);
                Ok(UpsertOutcome::Updated)
            }
            None => {
                sqlx::query(&format!(
                    "INSERT INTO {} (sport_id, home_team, away_team, start_time, home_score, \
                     away_score, result, is_closed, stadium) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                    self.table
                ))
                .bind(row.sport_id)
                .bind(&row.home_team)
                .bind(&row.away_team)
                .bind(row.start_time)
                .bind(row.home_score)
                .bind(row.away_score)
                .bind(&row.result)
                .bind(row.is_closed)
                .bind(&row.stadium)
                .execute(&self.pool)
                .await?;
                debug!("Inserted game: {} vs {} at {}", row.away_team, row.home_team, row.start_time);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    /// Upsert every row; a failing row is counted and the rest continue
    pub async fn upsert_games(&self, rows: &[GameRow]) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for row in rows {
            match self.upsert_game(row).await {
                Ok(UpsertOutcome::Inserted) => summary.inserted += 1,
                Ok(UpsertOutcome::Updated) => summary.updated += 1,
                Err(e) => {
                    warn!(
                        "Failed to store {} vs {} at {}: {}",
                        row.away_team, row.home_team, row.start_time, e
                    );
                    summary.failed += 1;
                }
            }
        }
        info!(
            "Stored games: {} inserted, {} updated, {} failed",
            summary.inserted, summary.updated, summary.failed
        );
        summary
    }

    /// Games of one sport starting at or after `since` (all games when `None`),
    /// ordered by start time
    pub async fn fetch_games(
        &self,
        sport_id: i32,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<StoredGame>> {
        let rows = sqlx::query(&format!(
            "SELECT id, home_team, away_team, start_time, home_score, away_score, result, is_closed \
             FROM {} WHERE sport_id = $1 AND ($2::timestamptz IS NULL OR start_time >= $2) \
             ORDER BY start_time, id",
            self.table
        ))
        .bind(sport_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let games = rows.iter().map(stored_game).collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Fetched {} games (since {:?})", games.len(), since);
        Ok(games)
    }

    /// Clear scores, result and closed flag of the given games
    pub async fn clear_scores(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(&format!(
            "UPDATE {} SET home_score = NULL, away_score = NULL, result = NULL, is_closed = false \
             WHERE id = ANY($1)",
            self.table
        ))
        .bind(ids)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete the given games
    pub async fn delete_games(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ANY($1)", self.table))
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Number of games of one sport
    pub async fn count_games(&self, sport_id: i32) -> Result<i64> {
        let count = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE sport_id = $1", self.table))
            .bind(sport_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn stored_game(row: &PgRow) -> std::result::Result<StoredGame, sqlx::Error> {
    Ok(StoredGame {
        id: row.try_get("id")?,
        home_team: row.try_get("home_team")?,
        away_team: row.try_get("away_team")?,
        start_time: row.try_get("start_time")?,
        home_score: row.try_get("home_score")?,
        away_score: row.try_get("away_score")?,
        result: row.try_get("result")?,
        is_closed: row.try_get::<Option<bool>, _>("is_closed")?.unwrap_or(false),
    })
}
