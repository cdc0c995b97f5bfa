//! Load driver: discover files, transform each one, commit per file.

use crate::discovery::discover_json_files;
use crate::records::{parse_event_file, parse_song_file};
use crate::transform::{filter_playbacks, split_song_record};
use crate::warehouse::{SongplayRow, Warehouse};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Process the song metadata root, then the event log root. Songs come
/// first so the event lookup join has a catalog to resolve against.
pub fn run(warehouse: &Warehouse, song_root: &Path, log_root: &Path) -> Result<()> {
    process_root(warehouse, song_root, load_song_file)?;
    process_root(warehouse, log_root, load_log_file)?;
    Ok(())
}

/// Walk one data root and feed every file through `load`, committing after
/// each file. The first failing file aborts the run; rows from files
/// already committed stay durable, the failing file rolls back whole.
///
/// The two counter lines printed here are part of the CLI contract and go
/// to stdout, not to the log.
pub fn process_root(
    warehouse: &Warehouse,
    root: &Path,
    load: fn(&Warehouse, &Path) -> Result<()>,
) -> Result<()> {
    let files = discover_json_files(root)?;
    println!("{} files found in {}", files.len(), root.display());

    for (i, file) in files.iter().enumerate() {
        let tx = warehouse.file_transaction()?;
        load(warehouse, file).with_context(|| format!("Failed to process {}", file.display()))?;
        tx.commit()
            .with_context(|| format!("Failed to commit {}", file.display()))?;
        println!("{}/{} files processed.", i + 1, files.len());
    }
    Ok(())
}

/// Load one song metadata file: exactly one record, split into a song row
/// and an artist row.
pub fn load_song_file(warehouse: &Warehouse, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let record = parse_song_file(path, &contents)?;
    debug!("Loading song {} from {}", record.song_id, path.display());

    let (song, artist) = split_song_record(record);
    warehouse.insert_song(&song)?;
    warehouse.insert_artist(&artist)?;
    Ok(())
}

/// Load one event log file: filter to track plays, then stage time rows,
/// user rows and fact rows, in that order, so the fact table's references
/// exist before the facts do.
pub fn load_log_file(warehouse: &Warehouse, path: &Path) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = parse_event_file(path, &contents)?;
    let playbacks = filter_playbacks(path, records)?;
    debug!(
        "Loading {} playbacks from {}",
        playbacks.len(),
        path.display()
    );

    for playback in &playbacks {
        warehouse.insert_time(&playback.time_row())?;
    }
    for playback in &playbacks {
        warehouse.upsert_user(&playback.user_row())?;
    }
    for playback in playbacks {
        let resolved = match (&playback.song, &playback.artist, playback.length) {
            (Some(song), Some(artist), Some(length)) => {
                warehouse.find_song(song, artist, length)?
            }
            _ => None,
        };
        let (song_id, artist_id) = match resolved {
            Some((song_id, artist_id)) => (Some(song_id), Some(artist_id)),
            None => (None, None),
        };
        warehouse.insert_songplay(&SongplayRow {
            start_time: playback.start_time,
            user_id: playback.user_id,
            level: playback.level,
            song_id,
            artist_id,
            session_id: playback.session_id,
            location: playback.location,
            user_agent: playback.user_agent,
        })?;
    }
    Ok(())
}
