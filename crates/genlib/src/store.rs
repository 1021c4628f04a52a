use crate::error::Error;
use genlib_core::synth::CachedModule;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Read access to previously generated modules.
///
/// The generation pipeline only ever reads through this trait; writes belong
/// to whoever resolves modules (see [`FileStore::put`]).
pub trait ModuleStore {
    /// Every cached module, keyed by module path.
    fn all_modules(&self) -> Result<BTreeMap<String, CachedModule>, Error>;

    /// The description a two-segment module was first generated from.
    fn cached_prompt(&self, module_path: &str) -> Result<Option<String>, Error>;
}

/// Module cache kept as one JSON file per dotted name.
///
/// Files are named after the md5 digest of the dotted name; the name itself
/// is stored in the record.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Use `dir` if given, otherwise the platform cache directory.
    pub fn open(dir: Option<PathBuf>) -> Result<Self, Error> {
        match dir {
            Some(dir) => Ok(Self::new(dir)),
            None => Ok(Self::new(default_cache_dir()?)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        let hash = md5::compute(name.as_bytes());
        self.dir.join(format!("{:x}.json", hash))
    }

    pub fn get(&self, name: &str) -> Result<Option<CachedModule>, Error> {
        let path = self.path_for(name);

        if !path.exists() {
            return Ok(None);
        }

        read_entry(&path).map(Some)
    }

    pub fn put(&self, name: &str, module: &CachedModule) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::Store(format!("Failed to create cache directory: {}", e)))?;

        let json = serde_json::to_string_pretty(module)
            .map_err(|e| Error::Store(format!("Failed to serialize {}: {}", name, e)))?;

        fs::write(self.path_for(name), json)
            .map_err(|e| Error::Store(format!("Failed to write {} to cache: {}", name, e)))?;

        debug!("Cached {} in {}", name, self.dir.display());

        Ok(())
    }

    /// Remove one entry. Returns `false` if it was not cached.
    pub fn remove(&self, name: &str) -> Result<bool, Error> {
        let path = self.path_for(name);

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)
            .map_err(|e| Error::Store(format!("Failed to remove {}: {}", name, e)))?;

        Ok(true)
    }

    /// Remove every entry and return how many were removed.
    pub fn clear(&self) -> Result<usize, Error> {
        let mut removed = 0;

        for path in self.entry_paths()? {
            fs::remove_file(&path)
                .map_err(|e| Error::Store(format!("Failed to remove {}: {}", path.display(), e)))?;
            removed += 1;
        }

        Ok(removed)
    }

    /// Every readable entry keyed by its dotted name. Corrupt files are skipped.
    pub fn entries(&self) -> Result<BTreeMap<String, CachedModule>, Error> {
        let mut entries = BTreeMap::new();

        for path in self.entry_paths()? {
            match read_entry(&path) {
                Ok(module) => {
                    entries.insert(module.module_name.clone(), module);
                }
                Err(e) => warn!("Skipping cache entry: {}", e),
            }
        }

        Ok(entries)
    }

    fn entry_paths(&self) -> Result<Vec<PathBuf>, Error> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let read_dir = fs::read_dir(&self.dir)
            .map_err(|e| Error::Store(format!("Failed to read cache directory: {}", e)))?;

        let mut paths = Vec::new();
        for entry in read_dir {
            let path = entry
                .map_err(|e| Error::Store(format!("Failed to read cache directory: {}", e)))?
                .path();

            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }
}

impl ModuleStore for FileStore {
    // Each generation is stored under its two-segment module path with the
    // complete module source, so deeper entries would only repeat that code.
    fn all_modules(&self) -> Result<BTreeMap<String, CachedModule>, Error> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|(name, _)| name.split('.').count() <= 2)
            .collect())
    }

    fn cached_prompt(&self, module_path: &str) -> Result<Option<String>, Error> {
        Ok(self.get(module_path)?.and_then(|module| module.prompt))
    }
}

fn default_cache_dir() -> Result<PathBuf, Error> {
    dirs_next::cache_dir()
        .map(|dir| dir.join("genlib"))
        .ok_or_else(|| Error::Store("Unable to determine cache directory".to_string()))
}

fn read_entry(path: &Path) -> Result<CachedModule, Error> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Store(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::CorruptEntry(path.display().to_string(), e.to_string()))
}
