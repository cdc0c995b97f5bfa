//! Common fixtures for the end-to-end ETL tests.
//!
//! Builds a scratch data directory with the two feed roots and offers
//! small builders for song metadata records and event log lines.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct FixtureTree {
    dir: TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("song_data")).unwrap();
        fs::create_dir_all(dir.path().join("log_data")).unwrap();
        Self { dir }
    }

    pub fn song_root(&self) -> PathBuf {
        self.dir.path().join("song_data")
    }

    pub fn log_root(&self) -> PathBuf {
        self.dir.path().join("log_data")
    }

    pub fn write_song_file(&self, name: &str, contents: &str) {
        fs::write(self.song_root().join(name), contents).unwrap();
    }

    pub fn write_log_file(&self, name: &str, lines: &[String]) {
        fs::write(self.log_root().join(name), lines.join("\n")).unwrap();
    }
}

pub fn song_json(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    year: i32,
    duration: f64,
) -> String {
    format!(
        concat!(
            r#"{{"num_songs": 1, "artist_id": "{artist_id}", "artist_latitude": 40.85, "#,
            r#""artist_longitude": 14.27, "artist_location": "Naples, IT", "#,
            r#""artist_name": "{artist_name}", "song_id": "{song_id}", "title": "{title}", "#,
            r#""duration": {duration}, "year": {year}}}"#
        ),
        artist_id = artist_id,
        artist_name = artist_name,
        song_id = song_id,
        title = title,
        duration = duration,
        year = year,
    )
}

pub fn next_song_line(
    user_id: i64,
    level: &str,
    ts: i64,
    session_id: i64,
    song: &str,
    artist: &str,
    length: f64,
) -> String {
    format!(
        concat!(
            r#"{{"page": "NextSong", "ts": {ts}, "userId": "{user_id}", "level": "{level}", "#,
            r#""firstName": "Lily", "lastName": "Koch", "gender": "F", "#,
            r#""song": "{song}", "artist": "{artist}", "length": {length}, "#,
            r#""sessionId": {session_id}, "location": "San Jose, CA", "userAgent": "Mozilla/5.0"}}"#
        ),
        ts = ts,
        user_id = user_id,
        level = level,
        song = song,
        artist = artist,
        length = length,
        session_id = session_id,
    )
}

pub fn page_view_line(page: &str, user_id: i64, ts: i64, session_id: i64) -> String {
    format!(
        concat!(
            r#"{{"page": "{page}", "ts": {ts}, "userId": {user_id}, "#,
            r#""level": "free", "sessionId": {session_id}}}"#
        ),
        page = page,
        ts = ts,
        user_id = user_id,
        session_id = session_id,
    )
}
