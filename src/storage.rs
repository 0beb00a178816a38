use std::io::Write;
use std::path::{Path, PathBuf};

/// Flat directory of small files, written atomically.
#[derive(Clone, Debug)]
pub struct BackendLocal {
    pub base_dir: PathBuf,
}

impl BackendLocal {
    pub fn new(storage_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)?;
        Ok(BackendLocal { base_dir: path })
    }

    pub fn path(&self, ident: &str) -> PathBuf {
        self.base_dir.join(ident)
    }

    pub fn exists(&self, ident: &str) -> bool {
        std::fs::metadata(self.path(ident)).is_ok()
    }

    pub fn read(&self, ident: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.path(ident))
    }

    pub fn write(&self, ident: &str, data: &[u8]) -> std::io::Result<()> {
        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{ident}-"))
            .tempfile_in(&self.base_dir)?;
        temp.write_all(data)?;
        temp.persist(self.path(ident)).map_err(|err| err.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BackendLocal::new(tmp.path().join("store")).unwrap();

        assert!(!store.exists("a.yaml"));
        store.write("a.yaml", b"one").unwrap();
        store.write("a.yaml", b"two").unwrap();

        assert!(store.exists("a.yaml"));
        assert_eq!(store.read("a.yaml").unwrap(), b"two");
        // no leftovers from the atomic writes
        assert_eq!(std::fs::read_dir(&store.base_dir).unwrap().count(), 1);
    }
}
