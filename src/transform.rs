//! Pure shaping of input records into warehouse rows.
//!
//! Everything here is side-effect free; the lookup join against the catalog
//! happens in the pipeline, which owns the warehouse handle.

use crate::records::{EventRecord, MalformedRecord, SongRecord};
use crate::warehouse::{ArtistRow, SongRow, TimeRow, UserRow};
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use std::path::Path;

/// Split one song metadata record into its song and artist rows.
pub fn split_song_record(record: SongRecord) -> (SongRow, ArtistRow) {
    let song = SongRow {
        song_id: record.song_id,
        title: record.title,
        artist_id: record.artist_id.clone(),
        year: record.year,
        duration: record.duration,
    };
    let artist = ArtistRow {
        artist_id: record.artist_id,
        name: record.artist_name,
        location: record.artist_location,
        latitude: record.artist_latitude,
        longitude: record.artist_longitude,
    };
    (song, artist)
}

/// One validated track-play event, ready to become warehouse rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub start_time: NaiveDateTime,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl Playback {
    pub fn user_row(&self) -> UserRow {
        UserRow {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }

    pub fn time_row(&self) -> TimeRow {
        decompose_timestamp(self.start_time)
    }
}

/// Derive the calendar fields of the time dimension. Week is the ISO week
/// number and weekday counts from Monday = 0.
pub fn decompose_timestamp(start_time: NaiveDateTime) -> TimeRow {
    TimeRow {
        start_time,
        hour: start_time.hour(),
        day: start_time.day(),
        week: start_time.iso_week().week(),
        month: start_time.month(),
        year: start_time.year(),
        weekday: start_time.weekday().num_days_from_monday(),
    }
}

/// Keep only the `NextSong` events (the page view meaning a track actually
/// played) and validate the fields a fact row cannot do without. Events
/// with any other page value, or none at all, are dropped; a retained
/// event missing a required field is a malformed record.
pub fn filter_playbacks(
    path: &Path,
    records: Vec<EventRecord>,
) -> Result<Vec<Playback>, MalformedRecord> {
    records
        .into_iter()
        .filter(|r| r.page.as_deref() == Some("NextSong"))
        .map(|r| validate_playback(path, r))
        .collect()
}

fn validate_playback(path: &Path, record: EventRecord) -> Result<Playback, MalformedRecord> {
    let missing = |field: &str| MalformedRecord::new(path, format!("NextSong event without {}", field));

    let ts = record.ts.ok_or_else(|| missing("ts"))?;
    let start_time = DateTime::from_timestamp_millis(ts)
        .ok_or_else(|| MalformedRecord::new(path, format!("timestamp out of range: {}", ts)))?
        .naive_utc();

    Ok(Playback {
        start_time,
        user_id: record.user_id.ok_or_else(|| missing("userId"))?,
        first_name: record.first_name,
        last_name: record.last_name,
        gender: record.gender,
        level: record.level.ok_or_else(|| missing("level"))?,
        song: record.song,
        artist: record.artist,
        length: record.length,
        session_id: record.session_id.ok_or_else(|| missing("sessionId"))?,
        location: record.location,
        user_agent: record.user_agent,
    })
}
