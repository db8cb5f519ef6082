use crate::error::DbError;
use crate::persistence::JsonFileBackend;
use crate::repository::JournalRepository;
use std::path::Path;

/// Opens the journal kept in `data_dir`, creating the directory on first use.
///
/// This is the entry point the binaries use; tests and embedders can build a
/// `JournalRepository` over any other `JournalBackend`.
pub fn connect(data_dir: &Path) -> Result<JournalRepository, DbError> {
    let backend = JsonFileBackend::open(data_dir)?;
    tracing::info!(path = %data_dir.display(), "Opening journal.");
    JournalRepository::open(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_creates_a_fresh_journal() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("journal");
        let repo = connect(&data_dir).unwrap();
        assert!(data_dir.is_dir());
        assert!(repo.accounts().is_empty());
        assert!(repo.active_account().is_none());
    }
}
