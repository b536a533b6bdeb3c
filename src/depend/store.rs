use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::error::StoreError;
use crate::scheduler::JobId;
use crate::unit::JobKey;

/// Job key -> scheduler job ids, written to disk after every change
///
/// The file is a JSON object of lists. Older files stored a bare string per key;
/// those are read as one-element lists. A missing file starts an empty store.
pub struct DependencyStore {
    path: PathBuf,
    records: BTreeMap<String, Vec<JobId>>,
}

/// On-disk value: a list, or a single id from older files
#[derive(Deserialize)]
#[serde(untagged)]
enum Recorded {
    Many(Vec<JobId>),
    One(JobId),
}

impl DependencyStore {
    pub fn open(path: &Path) -> Result<DependencyStore, StoreError> {
        if !path.exists() {
            info!("Creating new dependency file {}", path.display());
            let store = DependencyStore { path: path.to_path_buf(), records: BTreeMap::new() };
            store.save()?;
            return Ok(store);
        }

        info!("Loading dependencies from {}", path.display());
        let json_string = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: BTreeMap<String, Recorded> = serde_json::from_str(&json_string).map_err(|source| StoreError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let records = raw
            .into_iter()
            .map(|(name, recorded)| match recorded {
                Recorded::Many(ids) => (name, ids),
                Recorded::One(id) => (name, vec![id]),
            })
            .collect();

        Ok(DependencyStore { path: path.to_path_buf(), records })
    }

    /// Recorded ids, empty if nothing was ever recorded under `key`
    pub fn get(&self, key: &JobKey) -> Vec<JobId> {
        self.records.get(&key.to_string()).cloned().unwrap_or_default()
    }

    /// Forget earlier ids: `key` now depends on exactly `id`
    pub fn replace(&mut self, key: &JobKey, id: &JobId) -> Result<(), StoreError> {
        debug!("{key} -> [{id}]");
        self.records.insert(key.to_string(), vec![id.clone()]);
        self.save()
    }

    /// Add `id` after any ids already recorded under `key`
    pub fn append(&mut self, key: &JobKey, id: &JobId) -> Result<(), StoreError> {
        debug!("{key} += {id}");
        self.records.entry(key.to_string()).or_default().push(id.clone());
        self.save()
    }

    /// Drop every occurrence of `ids` from the ids recorded under `key`
    pub fn remove(&mut self, key: &JobKey, ids: &[JobId]) -> Result<(), StoreError> {
        let name = key.to_string();
        let Some(recorded) = self.records.get_mut(&name) else {
            return Ok(());
        };
        let before = recorded.len();
        recorded.retain(|id| !ids.contains(id));
        if recorded.len() == before {
            return Ok(());
        }
        debug!("{name} -= {} id(s)", before - recorded.len());
        self.save()
    }

    pub fn clear(&mut self, key: &JobKey) -> Result<(), StoreError> {
        let name = key.to_string();
        if let Some(ids) = self.records.get_mut(&name) {
            debug!("{name} cleared");
            ids.clear();
            self.save()?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole map to a temporary file next to the store, then rename it
    /// over the store so a crash never leaves a truncated file behind
    fn save(&self) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write { path: self.path.clone(), source };
        let json = serde_json::to_string_pretty(&self.records)
            .map_err(|err| write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        fs::write(&tmp_path, json).map_err(write_error)?;
        fs::rename(&tmp_path, &self.path).map_err(write_error)
    }
}
