use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;

use super::KeyValueStorage;

/// One `<key>.json` file per key inside a data directory.
pub struct FileKeyValueStorage {
    data_dir: PathBuf,
}

impl FileKeyValueStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Could not create data directory {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileKeyValueStorage {
    fn store(&self, key: &str, bytes: &[u8]) -> anyhow::Result<()> {
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, bytes)
            .with_context(|| format!("Could not write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Could not replace {}", path.display()))?;

        log::debug!("Stored {} bytes in {}", bytes.len(), path.display());
        Ok(())
    }

    fn load(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Could not read {}", path.display())),
        }
    }
}
