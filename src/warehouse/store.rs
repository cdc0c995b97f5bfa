//! SQLite-backed warehouse store.
//!
//! One `Warehouse` owns one connection for the whole run and is threaded
//! explicitly through the pipeline; it is not safe for concurrent use.

use super::models::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use super::schema::{CREATE_TABLES, DROP_TABLES};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use tracing::info;

/// Handle to the warehouse database.
pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    /// Open (or create) the warehouse database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open database {}", path.as_ref().display()))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        info!("Opened warehouse database at {}", path.as_ref().display());
        Ok(Warehouse { conn })
    }

    /// Open an in-memory warehouse. Mostly useful for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Warehouse { conn })
    }

    /// Drop and recreate all five tables.
    pub fn reset_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(DROP_TABLES)
            .context("Failed to drop warehouse tables")?;
        self.conn
            .execute_batch(CREATE_TABLES)
            .context("Failed to create warehouse tables")?;
        Ok(())
    }

    /// Create the tables if they do not exist, without dropping anything.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_TABLES)
            .context("Failed to create warehouse tables")
    }

    /// Begin the commit scope for one input file. All rows staged through
    /// this handle become durable together on `commit`; dropping the
    /// transaction without committing rolls them back.
    pub fn file_transaction(&self) -> Result<Transaction<'_>> {
        self.conn
            .unchecked_transaction()
            .context("Failed to begin transaction")
    }

    /// Insert a song row. A row with the same `song_id` already present
    /// makes this a no-op.
    pub fn insert_song(&self, row: &SongRow) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO songs (song_id, title, artist_id, year, duration)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.song_id, row.title, row.artist_id, row.year, row.duration],
        )?;
        Ok(())
    }

    /// Insert an artist row. Idempotent on `artist_id`.
    pub fn insert_artist(&self, row: &ArtistRow) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO artists (artist_id, name, location, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.artist_id, row.name, row.location, row.latitude, row.longitude],
        )?;
        Ok(())
    }

    /// Insert a user row. An existing `user_id` keeps its original fields
    /// except `level`, which takes the incoming value (last write wins).
    pub fn upsert_user(&self, row: &UserRow) -> Result<()> {
        self.conn.execute(
            "INSERT INTO users (user_id, first_name, last_name, gender, level)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (user_id) DO UPDATE SET level = excluded.level",
            params![row.user_id, row.first_name, row.last_name, row.gender, row.level],
        )?;
        Ok(())
    }

    /// Insert a time dimension row. Idempotent on `start_time`.
    pub fn insert_time(&self, row: &TimeRow) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO time (start_time, hour, day, week, month, year, weekday)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.start_time,
                row.hour,
                row.day,
                row.week,
                row.month,
                row.year,
                row.weekday
            ],
        )?;
        Ok(())
    }

    /// Insert a songplay fact row. The surrogate `songplay_id` is generated
    /// by the store.
    pub fn insert_songplay(&self, row: &SongplayRow) -> Result<()> {
        self.conn.execute(
            "INSERT INTO songplays
                 (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                row.start_time,
                row.user_id,
                row.level,
                row.song_id,
                row.artist_id,
                row.session_id,
                row.location,
                row.user_agent
            ],
        )?;
        Ok(())
    }

    /// Resolve a (title, artist name, duration) triple against the catalog.
    ///
    /// Matching is case-sensitive and the duration comparison is exact, so
    /// near-duplicate durations captured with different precision will not
    /// match. Returns the first matching (song_id, artist_id) pair in the
    /// store's default order, or `None` when nothing matches.
    pub fn find_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
    ) -> Result<Option<(String, String)>> {
        match self.conn.query_row(
            "SELECT s.song_id, a.artist_id
             FROM songs s
             JOIN artists a ON s.artist_id = a.artist_id
             WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3",
            params![title, artist_name, duration],
            |r| Ok((r.get(0)?, r.get(1)?)),
        ) {
            Ok(pair) => Ok(Some(pair)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Row counts as (songs, artists, users, time, songplays).
    pub fn get_counts(&self) -> Result<(i64, i64, i64, i64, i64)> {
        let count = |table: &str| -> Result<i64> {
            Ok(self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?)
        };
        Ok((
            count("songs")?,
            count("artists")?,
            count("users")?,
            count("time")?,
            count("songplays")?,
        ))
    }

    /// Fetch one user row by id.
    pub fn get_user(&self, user_id: i64) -> Result<Option<UserRow>> {
        match self.conn.query_row(
            "SELECT user_id, first_name, last_name, gender, level
             FROM users WHERE user_id = ?1",
            params![user_id],
            |r| {
                Ok(UserRow {
                    user_id: r.get(0)?,
                    first_name: r.get(1)?,
                    last_name: r.get(2)?,
                    gender: r.get(3)?,
                    level: r.get(4)?,
                })
            },
        ) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one song row by id.
    pub fn get_song(&self, song_id: &str) -> Result<Option<SongRow>> {
        match self.conn.query_row(
            "SELECT song_id, title, artist_id, year, duration
             FROM songs WHERE song_id = ?1",
            params![song_id],
            |r| {
                Ok(SongRow {
                    song_id: r.get(0)?,
                    title: r.get(1)?,
                    artist_id: r.get(2)?,
                    year: r.get(3)?,
                    duration: r.get(4)?,
                })
            },
        ) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch one artist row by id.
    pub fn get_artist(&self, artist_id: &str) -> Result<Option<ArtistRow>> {
        match self.conn.query_row(
            "SELECT artist_id, name, location, latitude, longitude
             FROM artists WHERE artist_id = ?1",
            params![artist_id],
            |r| {
                Ok(ArtistRow {
                    artist_id: r.get(0)?,
                    name: r.get(1)?,
                    location: r.get(2)?,
                    latitude: r.get(3)?,
                    longitude: r.get(4)?,
                })
            },
        ) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch all songplay fact rows in insertion order.
    pub fn get_songplays(&self) -> Result<Vec<SongplayRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT start_time, user_id, level, song_id, artist_id, session_id, location, user_agent
             FROM songplays ORDER BY songplay_id",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(SongplayRow {
                    start_time: r.get(0)?,
                    user_id: r.get(1)?,
                    level: r.get(2)?,
                    song_id: r.get(3)?,
                    artist_id: r.get(4)?,
                    session_id: r.get(5)?,
                    location: r.get(6)?,
                    user_agent: r.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Delete one artist row; cascades to facts referencing it.
    pub fn delete_artist(&self, artist_id: &str) -> Result<usize> {
        Ok(self.conn.execute(
            "DELETE FROM artists WHERE artist_id = ?1",
            params![artist_id],
        )?)
    }
}
