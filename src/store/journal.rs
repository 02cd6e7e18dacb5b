use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::ShapeStore;
use crate::codec::{NewShapeRow, ShapeRow};
use crate::error::{StoreError, StoreResult};
use crate::shape::{ShapeId, ShapeType};

/// One line of the journal file
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum JournalEntry {
    Append { row: ShapeRow },
    Delete { id: ShapeId },
}

/// Writes one encoded entry and makes it durable
type WriteFn = fn(&mut File, &[u8]) -> io::Result<()>;

fn write_synced(file: &mut File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_data()
}

/// File-backed store kept as an append-only JSON-lines journal.
///
/// The file is never rewritten: an undo is recorded as a `delete` entry for the
/// tail row. Opening the file replays every entry to rebuild the row list, and
/// ids keep counting from the highest id ever appended.
///
/// A failed write is truncated away so the file and the in-memory rows stay in
/// step. If that truncation fails as well, the store refuses further writes.
#[derive(Debug)]
pub struct JournalStore {
    path: PathBuf,
    file: File,
    rows: Vec<ShapeRow>,
    next_id: u64,
    write: WriteFn,
    failed: bool,
}

impl JournalStore {
    /// Opens the journal at `path`, creating an empty one if it does not exist
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let mut rows: Vec<ShapeRow> = Vec::new();
        let mut highest = 0;
        for (index, line) in BufReader::new(&file).lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            let entry: JournalEntry =
                serde_json::from_str(&line).map_err(|e| StoreError::Corrupt {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            match entry {
                JournalEntry::Append { row } => {
                    if row.id.value() <= highest {
                        return Err(StoreError::Corrupt {
                            line: line_no,
                            reason: format!("id {} is not above {}", row.id.value(), highest),
                        });
                    }
                    highest = row.id.value();
                    rows.push(row);
                }
                JournalEntry::Delete { id } => match rows.last() {
                    Some(last) if last.id == id => {
                        rows.pop();
                    }
                    _ => {
                        return Err(StoreError::Corrupt {
                            line: line_no,
                            reason: format!("delete of {} is not the tail row", id),
                        });
                    }
                },
            }
        }

        log::info!("Opened journal {} with {} shapes", path.display(), rows.len());
        Ok(Self {
            path,
            file,
            rows,
            next_id: highest + 1,
            write: write_synced,
            failed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn write_entry(&mut self, entry: &JournalEntry) -> StoreResult<()> {
        if self.failed {
            return Err(StoreError::Unavailable(format!(
                "journal {} has an unrecoverable partial write",
                self.path.display()
            )));
        }
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let len = self.file.metadata()?.len();
        if let Err(e) = (self.write)(&mut self.file, line.as_bytes()) {
            match self.file.set_len(len) {
                Ok(()) => log::warn!("Rolled back failed journal write: {}", e),
                Err(truncate) => {
                    log::error!(
                        "Could not roll back journal {} after {}: {}",
                        self.path.display(),
                        e,
                        truncate
                    );
                    self.failed = true;
                }
            }
            return Err(e.into());
        }
        Ok(())
    }
}

impl ShapeStore for JournalStore {
    fn append(&mut self, row: NewShapeRow) -> StoreResult<ShapeId> {
        let row = row.with_id(ShapeId(self.next_id));
        self.write_entry(&JournalEntry::Append { row: row.clone() })?;
        self.next_id += 1;
        log::debug!("Journaled {} {}", row.shape_type, row.id);
        let id = row.id;
        self.rows.push(row);
        Ok(id)
    }

    fn list_all(&self) -> StoreResult<Vec<ShapeRow>> {
        Ok(self.rows.clone())
    }

    fn list_by_type(&self, shape_type: ShapeType) -> StoreResult<Vec<ShapeRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.shape_type == shape_type)
            .cloned()
            .collect())
    }

    fn delete_highest_id(&mut self) -> StoreResult<Option<ShapeRow>> {
        let Some(id) = self.rows.last().map(|row| row.id) else {
            return Ok(None);
        };
        self.write_entry(&JournalEntry::Delete { id })?;
        log::debug!("Journaled delete of {}", id);
        Ok(self.rows.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::shape::{Argb, Point, Shape, ShapeStyle};
    use std::fs;

    struct TempJournal(PathBuf);

    impl TempJournal {
        fn new() -> Self {
            let name = format!("shape_canvas_unit_{}.journal", uuid::Uuid::new_v4());
            Self(std::env::temp_dir().join(name))
        }
    }

    impl Drop for TempJournal {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn torn_write(file: &mut File, bytes: &[u8]) -> io::Result<()> {
        file.write_all(&bytes[..bytes.len() / 2])?;
        Err(io::Error::other("disk full"))
    }

    fn unsynced_write(file: &mut File, bytes: &[u8]) -> io::Result<()> {
        file.write_all(bytes)?;
        Err(io::Error::other("sync failed"))
    }

    fn row() -> NewShapeRow {
        let shape = Shape::rectangle_from_corners(Point::new(0, 0), Point::new(3, 3), true);
        codec::encode(&shape, &ShapeStyle::new(Argb::BLACK, Argb::WHITE))
    }

    #[test]
    fn test_torn_append_is_rolled_back() {
        let journal = TempJournal::new();
        let mut store = JournalStore::open(&journal.0).unwrap();
        store.append(row()).unwrap();
        let len = fs::metadata(&journal.0).unwrap().len();

        store.write = torn_write;
        assert!(matches!(store.append(row()), Err(StoreError::Io(_))));
        assert_eq!(fs::metadata(&journal.0).unwrap().len(), len);
        assert_eq!(store.len(), 1);

        store.write = write_synced;
        assert_eq!(store.append(row()).unwrap(), ShapeId(2));
        drop(store);

        let reopened = JournalStore::open(&journal.0).unwrap();
        let ids: Vec<_> = reopened.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![ShapeId(1), ShapeId(2)]);
    }

    #[test]
    fn test_unsynced_entries_are_rolled_back() {
        let journal = TempJournal::new();
        let mut store = JournalStore::open(&journal.0).unwrap();
        store.append(row()).unwrap();
        store.append(row()).unwrap();

        store.write = unsynced_write;
        assert!(store.append(row()).is_err());
        assert!(store.delete_highest_id().is_err());
        assert_eq!(store.len(), 2);

        store.write = write_synced;
        assert_eq!(store.append(row()).unwrap(), ShapeId(3));
        assert_eq!(store.delete_highest_id().unwrap().map(|r| r.id), Some(ShapeId(3)));
        drop(store);

        let reopened = JournalStore::open(&journal.0).unwrap();
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn test_failed_store_refuses_writes() {
        let journal = TempJournal::new();
        let mut store = JournalStore::open(&journal.0).unwrap();
        store.append(row()).unwrap();
        store.failed = true;

        assert!(matches!(store.append(row()), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.delete_highest_id(), Err(StoreError::Unavailable(_))));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }
}
