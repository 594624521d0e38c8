pub mod error;

pub use crate::journal::error::JournalError;

use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ENTRY_PREFIX: &str = "entry_";
pub const ENTRY_EXTENSION: &str = "md";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TIMESTAMP_WIDTH: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub timestamp: NaiveDateTime,
    pub content: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedEntryPolicy {
    #[default]
    Abort,
    Skip,
}

pub fn load_entries(
    dir: &Path,
    policy: MalformedEntryPolicy,
) -> Result<Vec<JournalEntry>, JournalError> {
    let listing = fs::read_dir(dir).map_err(|error| JournalError::filesystem(dir, error))?;

    let mut entries = Vec::new();
    for item in listing {
        let item = item.map_err(|error| JournalError::filesystem(dir, error))?;
        let path = item.path();
        let file_name = item.file_name().to_string_lossy().into_owned();

        if !file_name.starts_with(ENTRY_PREFIX) || !path.is_file() {
            continue;
        }

        let timestamp = match parse_entry_timestamp(&file_name) {
            Ok(timestamp) => timestamp,
            Err(error) if policy == MalformedEntryPolicy::Skip => {
                warn!(error = %error, file = %file_name, "skipping malformed journal entry");
                continue;
            }
            Err(error) => return Err(error),
        };

        let content =
            fs::read_to_string(&path).map_err(|error| JournalError::filesystem(&path, error))?;

        entries.push(JournalEntry {
            timestamp,
            content,
            file_name,
        });
    }

    entries.sort_by(|left, right| {
        left.timestamp
            .cmp(&right.timestamp)
            .then_with(|| left.file_name.cmp(&right.file_name))
    });
    debug!(count = entries.len(), dir = %dir.display(), "journal entries loaded");

    Ok(entries)
}

pub fn parse_entry_timestamp(file_name: &str) -> Result<NaiveDateTime, JournalError> {
    let malformed = |reason: String| JournalError::Parse {
        file_name: file_name.to_string(),
        reason,
    };

    let rest = file_name
        .strip_prefix(ENTRY_PREFIX)
        .ok_or_else(|| malformed(format!("missing `{ENTRY_PREFIX}` prefix")))?;
    let raw = rest.get(..TIMESTAMP_WIDTH).ok_or_else(|| {
        malformed(format!(
            "expected {TIMESTAMP_WIDTH} timestamp characters after the prefix"
        ))
    })?;

    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|error| malformed(format!("`{raw}` does not match YYYYMMDD_HHMMSS ({error})")))
}

pub fn entry_file_name(timestamp: NaiveDateTime) -> String {
    format!(
        "{ENTRY_PREFIX}{}.{ENTRY_EXTENSION}",
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

pub fn render_entry(reflection: &str, response: &str, written_at: NaiveDateTime) -> String {
    format!(
        "# Journal Entry\n\n## Your Reflection\n{}\n\n## Companion's Response\n{}\n\n## Timestamp\n{}\n",
        reflection.trim_end(),
        response.trim_end(),
        written_at.format("%Y-%m-%d %H:%M:%S")
    )
}

// same-second saves overwrite each other
pub fn save_entry(dir: &Path, reflection: &str, response: &str) -> Result<PathBuf, JournalError> {
    save_entry_at(dir, reflection, response, Local::now().naive_local())
}

pub fn save_entry_at(
    dir: &Path,
    reflection: &str,
    response: &str,
    written_at: NaiveDateTime,
) -> Result<PathBuf, JournalError> {
    fs::create_dir_all(dir).map_err(|error| JournalError::filesystem(dir, error))?;

    let path = dir.join(entry_file_name(written_at));
    fs::write(&path, render_entry(reflection, response, written_at))
        .map_err(|error| JournalError::filesystem(&path, error))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{
        JournalError, MalformedEntryPolicy, entry_file_name, load_entries, parse_entry_timestamp,
        save_entry_at,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid datetime")
    }

    #[test]
    fn parses_timestamp_after_prefix() {
        let parsed = parse_entry_timestamp("entry_20240131_235959.md").expect("timestamp");
        assert_eq!(parsed, at(2024, 1, 31, 23, 59, 59));
    }

    #[test]
    fn rejects_short_and_malformed_names() {
        assert!(matches!(
            parse_entry_timestamp("entry_2024.md"),
            Err(JournalError::Parse { .. })
        ));
        assert!(matches!(
            parse_entry_timestamp("entry_20241399_000000.md"),
            Err(JournalError::Parse { .. })
        ));
    }

    #[test]
    fn loads_all_well_formed_entries_in_chronological_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let names = [
            "entry_20240305_080000.md",
            "entry_20240101_120000.md",
            "entry_20240220_211500.md",
        ];
        for name in names {
            fs::write(dir.path().join(name), format!("text of {name}")).expect("write entry");
        }
        fs::write(dir.path().join("mood_trend.svg"), "<svg/>").expect("write artifact");
        fs::write(dir.path().join("notes.txt"), "ignored").expect("write other");

        let entries = load_entries(dir.path(), MalformedEntryPolicy::Abort).expect("load");

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].timestamp, at(2024, 1, 1, 12, 0, 0));
        assert_eq!(entries[1].timestamp, at(2024, 2, 20, 21, 15, 0));
        assert_eq!(entries[2].timestamp, at(2024, 3, 5, 8, 0, 0));
        assert_eq!(entries[2].content, "text of entry_20240305_080000.md");
        for entry in &entries {
            assert_eq!(entry_file_name(entry.timestamp), entry.file_name);
        }
    }

    #[test]
    fn malformed_entry_aborts_with_file_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("entry_20240101_120000.md"), "ok").expect("write");
        fs::write(dir.path().join("entry_notatimestamp.md"), "bad").expect("write");

        let error = load_entries(dir.path(), MalformedEntryPolicy::Abort).expect_err("must fail");
        match error {
            JournalError::Parse { file_name, .. } => {
                assert_eq!(file_name, "entry_notatimestamp.md")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skip_policy_drops_malformed_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("entry_20240101_120000.md"), "ok").expect("write");
        fs::write(dir.path().join("entry_notatimestamp.md"), "bad").expect("write");

        let entries = load_entries(dir.path(), MalformedEntryPolicy::Skip).expect("load");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "ok");
    }

    #[test]
    fn missing_directory_is_a_filesystem_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");

        assert!(matches!(
            load_entries(&missing, MalformedEntryPolicy::Abort),
            Err(JournalError::Filesystem { .. })
        ));
    }

    #[test]
    fn saved_entry_is_loadable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let journal_dir = dir.path().join("journal");
        let written_at = at(2024, 6, 1, 9, 30, 5);

        let path = save_entry_at(&journal_dir, "Felt calm today.", "That sounds lovely.", written_at)
            .expect("save");
        assert!(path.ends_with("entry_20240601_093005.md"));

        let entries = load_entries(&journal_dir, MalformedEntryPolicy::Abort).expect("load");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timestamp, written_at);
        assert!(entries[0].content.contains("## Your Reflection\nFelt calm today."));
        assert!(entries[0].content.contains("2024-06-01 09:30:05"));
    }
}
