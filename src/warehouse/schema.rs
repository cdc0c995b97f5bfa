//! Schema text for the warehouse tables.
//!
//! `songplays` references the three dimensions it denormalizes from, with
//! cascading referential actions so pruning a dimension row drops the facts
//! that point at it. `songs.artist_id` is advisory only: song and artist
//! rows arrive from the same file but in no guaranteed order relative to
//! other files, so it carries no constraint.

pub const CREATE_TABLES: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id    INTEGER PRIMARY KEY,
        first_name TEXT,
        last_name  TEXT,
        gender     TEXT,
        level      TEXT
    );

    CREATE TABLE IF NOT EXISTS artists (
        artist_id TEXT PRIMARY KEY,
        name      TEXT NOT NULL,
        location  TEXT,
        latitude  REAL,
        longitude REAL
    );

    CREATE TABLE IF NOT EXISTS songs (
        song_id   TEXT PRIMARY KEY,
        title     TEXT NOT NULL,
        artist_id TEXT,
        year      INTEGER,
        duration  REAL NOT NULL
    );

    CREATE TABLE IF NOT EXISTS time (
        start_time TEXT PRIMARY KEY,
        hour       INTEGER NOT NULL,
        day        INTEGER NOT NULL,
        week       INTEGER NOT NULL,
        month      INTEGER NOT NULL,
        year       INTEGER NOT NULL,
        weekday    INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS songplays (
        songplay_id INTEGER PRIMARY KEY AUTOINCREMENT,
        start_time  TEXT NOT NULL,
        user_id     INTEGER NOT NULL,
        level       TEXT,
        song_id     TEXT,
        artist_id   TEXT,
        session_id  INTEGER NOT NULL,
        location    TEXT,
        user_agent  TEXT,
        FOREIGN KEY (user_id) REFERENCES users (user_id) ON DELETE CASCADE ON UPDATE CASCADE,
        FOREIGN KEY (song_id) REFERENCES songs (song_id) ON DELETE CASCADE ON UPDATE CASCADE,
        FOREIGN KEY (artist_id) REFERENCES artists (artist_id) ON DELETE CASCADE ON UPDATE CASCADE
    );
"#;

pub const DROP_TABLES: &str = r#"
    DROP TABLE IF EXISTS songplays;
    DROP TABLE IF EXISTS time;
    DROP TABLE IF EXISTS users;
    DROP TABLE IF EXISTS songs;
    DROP TABLE IF EXISTS artists;
"#;
