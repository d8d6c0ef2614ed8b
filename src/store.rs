use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

/// Key-value persistence for game progress.
///
/// `load` never fails: missing or unreadable entries are simply absent.
pub trait ProgressStore {
    fn load(&self, key: &str) -> Option<Value>;
    fn save(&self, key: &str, value: &Value) -> io::Result<()>;
    fn clear(&self, key: &str) -> io::Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileProgressStore {
    dir: PathBuf,
}

impl FileProgressStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            dir: AppDirs::progress_dir().unwrap_or_else(|| PathBuf::from("strands_progress")),
        }
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl Default for FileProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring unreadable progress file"
                );
                None
            }
        }
    }

    fn save(&self, key: &str, value: &Value) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let data = serde_json::to_vec_pretty(value)?;
        fs::write(self.path_for(key), data)
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Progress that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.entries.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &Value) -> io::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for &S {
    fn load(&self, key: &str) -> Option<Value> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &Value) -> io::Result<()> {
        (**self).save(key, value)
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        (**self).clear(key)
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn load(&self, key: &str) -> Option<Value> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &Value) -> io::Result<()> {
        (**self).save(key, value)
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        (**self).clear(key)
    }
}
