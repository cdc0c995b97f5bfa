//! Input record models for the two NDJSON feeds.
//!
//! Song metadata files carry exactly one record each; event log files carry
//! zero or more records, one per line. Parsing failures surface as
//! [`MalformedRecord`] and abort the run, they are never skipped.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A file whose content does not match its record type's contract.
#[derive(Debug, Error)]
#[error("malformed record in {path}: {reason}")]
pub struct MalformedRecord {
    pub path: PathBuf,
    pub reason: String,
}

impl MalformedRecord {
    pub fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// One song metadata record as found in the song-data feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

/// One raw application event as found in the log feed.
///
/// Everything is optional at this stage: only `page == "NextSong"` events
/// get validated further, the rest are dropped wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub ts: Option<i64>,
    #[serde(rename = "userId", default, deserialize_with = "lenient_user_id")]
    pub user_id: Option<i64>,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "userAgent", default)]
    pub user_agent: Option<String>,
}

/// The log feed serializes `userId` as either a JSON number or a numeric
/// string, and uses the empty string for anonymous sessions.
fn lenient_user_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => Ok(n.as_i64()),
        serde_json::Value::String(s) if s.is_empty() => Ok(None),
        serde_json::Value::String(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid userId: {:?}", s))),
        other => Err(serde::de::Error::custom(format!(
            "invalid userId: {}",
            other
        ))),
    }
}

/// Parse a song metadata file, which must contain exactly one record.
pub fn parse_song_file(path: &Path, contents: &str) -> Result<SongRecord, MalformedRecord> {
    let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
    let first = lines
        .next()
        .ok_or_else(|| MalformedRecord::new(path, "expected exactly one record, found none"))?;
    if lines.next().is_some() {
        return Err(MalformedRecord::new(
            path,
            "expected exactly one record, found more than one",
        ));
    }
    serde_json::from_str(first).map_err(|e| MalformedRecord::new(path, e.to_string()))
}

/// Parse an event log file into its raw records, one per non-empty line.
pub fn parse_event_file(path: &Path, contents: &str) -> Result<Vec<EventRecord>, MalformedRecord> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            serde_json::from_str(l)
                .map_err(|e| MalformedRecord::new(path, format!("line {}: {}", i + 1, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SONG_LINE: &str = r#"{"num_songs": 1, "artist_id": "ARD7TVE1187B99BFB1", "artist_latitude": null, "artist_longitude": null, "artist_location": "California - LA", "artist_name": "Casual", "song_id": "SOMZWCG12A8C13C480", "title": "I Didn't Mean To", "duration": 218.93179, "year": 0}"#;

    #[test]
    fn parses_song_record() {
        let path = Path::new("song.json");
        let record = parse_song_file(path, SONG_LINE).unwrap();
        assert_eq!(record.song_id, "SOMZWCG12A8C13C480");
        assert_eq!(record.title, "I Didn't Mean To");
        assert_eq!(record.artist_id, "ARD7TVE1187B99BFB1");
        assert_eq!(record.artist_name, "Casual");
        assert_eq!(record.year, 0);
        assert_eq!(record.duration, 218.93179);
        assert_eq!(record.artist_location.as_deref(), Some("California - LA"));
        assert_eq!(record.artist_latitude, None);
        assert_eq!(record.artist_longitude, None);
    }

    #[test]
    fn song_file_with_no_record_is_malformed() {
        let err = parse_song_file(Path::new("empty.json"), "\n\n").unwrap_err();
        assert!(err.reason.contains("found none"));
    }

    #[test]
    fn song_file_with_two_records_is_malformed() {
        let contents = format!("{}\n{}\n", SONG_LINE, SONG_LINE);
        let err = parse_song_file(Path::new("double.json"), &contents).unwrap_err();
        assert!(err.reason.contains("more than one"));
    }

    #[test]
    fn song_file_missing_required_field_is_malformed() {
        let contents = r#"{"song_id": "S1", "artist_id": "A1", "year": 1999, "duration": 1.0, "artist_name": "X"}"#;
        let err = parse_song_file(Path::new("partial.json"), contents).unwrap_err();
        assert!(err.reason.contains("title"));
    }

    #[test]
    fn parses_event_records() {
        let contents = concat!(
            r#"{"page": "NextSong", "ts": 1541903636796, "userId": "39", "sessionId": 38, "level": "free", "song": "Intro", "artist": "Muse", "length": 200.5}"#,
            "\n",
            r#"{"page": "Home", "ts": 1541903636796, "userId": 8, "sessionId": 38, "level": "free"}"#,
            "\n",
        );
        let records = parse_event_file(Path::new("events.json"), contents).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].page.as_deref(), Some("NextSong"));
        assert_eq!(records[0].user_id, Some(39));
        assert_eq!(records[1].user_id, Some(8));
    }

    #[test]
    fn empty_user_id_string_parses_as_absent() {
        let contents = r#"{"page": "Home", "ts": 1, "userId": "", "sessionId": 2}"#;
        let records = parse_event_file(Path::new("events.json"), contents).unwrap();
        assert_eq!(records[0].user_id, None);
    }

    #[test]
    fn missing_page_parses_as_absent() {
        let contents = r#"{"ts": 1, "userId": 5, "sessionId": 2}"#;
        let records = parse_event_file(Path::new("events.json"), contents).unwrap();
        assert_eq!(records[0].page, None);
    }

    #[test]
    fn unparseable_line_is_malformed() {
        let contents = "{\"page\": \"NextSong\"\nnot json at all\n";
        let err = parse_event_file(Path::new("events.json"), contents).unwrap_err();
        assert!(err.reason.starts_with("line 1"));
    }

    #[test]
    fn empty_event_file_yields_no_records() {
        let records = parse_event_file(Path::new("events.json"), "").unwrap();
        assert!(records.is_empty());
    }
}
