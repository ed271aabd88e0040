//! The EOS table file handed to the integrator.

use crate::error::WrapperResult;
use ns_eos::EquationOfState;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Scoped table file. A temporary file is deleted when closed or dropped; a
/// named file stays on disk for the caller.
#[derive(Debug)]
pub enum TableFile {
    Temp(NamedTempFile),
    Named(PathBuf),
}

impl TableFile {
    pub fn temporary<E: EquationOfState + ?Sized>(eos: &E) -> WrapperResult<Self> {
        let mut file = NamedTempFile::new()?;
        let rows = eos.write_table(&mut BufWriter::new(file.as_file_mut()))?;
        debug!(path = %file.path().display(), rows, "Write EOS into temp file");
        Ok(TableFile::Temp(file))
    }

    pub fn named<E: EquationOfState + ?Sized>(eos: &E, path: &Path) -> WrapperResult<Self> {
        let file = File::create(path)?;
        let rows = eos.write_table(&mut BufWriter::new(file))?;
        debug!(path = %path.display(), rows, "Write EOS into file");
        Ok(TableFile::Named(path.to_path_buf()))
    }

    pub fn path(&self) -> &Path {
        match self {
            TableFile::Temp(file) => file.path(),
            TableFile::Named(path) => path,
        }
    }

    /// Release the file; temporary files are removed.
    pub fn close(self) -> WrapperResult<()> {
        match self {
            TableFile::Temp(file) => Ok(file.close()?),
            TableFile::Named(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ns_eos::{Polytrope, read_table};

    #[test]
    fn temporary_file_is_removed_on_close() {
        let eos = Polytrope::new(254.0, 2.0, 2.0).unwrap();
        let table = TableFile::temporary(&eos).unwrap();
        let path = table.path().to_path_buf();
        assert_eq!(read_table(&path).unwrap().len(), eos.table_rows().len());
        table.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn named_file_survives_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eos.dat");
        let eos = Polytrope::new(254.0, 2.0, 2.0).unwrap();
        let table = TableFile::named(&eos, &path).unwrap();
        table.close().unwrap();
        assert!(path.exists());
        assert!(!read_table(&path).unwrap().is_empty());
    }
}
