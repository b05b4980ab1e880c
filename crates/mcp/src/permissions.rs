#![forbid(unsafe_code)]

use termorder_core::Taxonomy;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum PermissionError {
    #[error("server is read-only; writes to {taxonomy} are disabled")]
    ReadOnly { taxonomy: Taxonomy },
}

/// Write gate consulted by every mutating tool before the store is read.
#[derive(Debug, Clone, Default)]
pub(crate) struct Permissions {
    read_only: bool,
}

impl Permissions {
    pub(crate) fn new(read_only: bool) -> Self {
        Self { read_only }
    }

    pub(crate) fn check_write(&self, taxonomy: &Taxonomy) -> Result<(), PermissionError> {
        if self.read_only {
            tracing::warn!(%taxonomy, "write denied by read-only mode");
            return Err(PermissionError::ReadOnly {
                taxonomy: taxonomy.clone(),
            });
        }
        Ok(())
    }
}
