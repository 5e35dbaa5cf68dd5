use crate::error::Result;
use std::fs;
use std::io;
use std::path::PathBuf;

/// String-keyed persistence for small JSON documents.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let final_path = self.key_path(key);
        let tmp_path = self
            .dir
            .join(format!("{}.json.tmp", sanitize_key(key)));

        fs::write(&tmp_path, value)?;
        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path)?;
                    fs::rename(&tmp_path, &final_path)?;
                    Ok(())
                } else {
                    Err(rename_err.into())
                }
            }
        }
    }
}

fn sanitize_key(key: &str) -> String {
    let sanitized = key
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
        .collect::<String>();
    if sanitized.is_empty() {
        "default".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory store poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory store poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStore, KeyValueStore};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "accuquery_store_{prefix}_{}_{}",
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn missing_key_reads_as_none() {
        let dir = temp_dir("missing");
        let store = FileStore::new(&dir);
        assert!(store.get("absent").expect("read should succeed").is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn set_then_get_overwrites_previous_value() {
        let dir = temp_dir("overwrite");
        let store = FileStore::new(&dir);
        store.set("accuquery_audit_logs", "[1]").expect("first write");
        store.set("accuquery_audit_logs", "[2]").expect("second write");

        assert_eq!(
            store.get("accuquery_audit_logs").expect("read should succeed").as_deref(),
            Some("[2]")
        );
        assert!(!dir.join("accuquery_audit_logs.json.tmp").exists());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let dir = temp_dir("sanitize");
        let store = FileStore::new(&dir);
        store.set("../escape/key", "{}").expect("write should succeed");
        assert!(dir.join("escapekey.json").exists());

        let _ = fs::remove_dir_all(dir);
    }
}
