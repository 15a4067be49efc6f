//! Files picked for the next upload.

use docvault_entity::upload::UploadFile;

/// The pending upload input.
///
/// Dispatching an upload drains the selection whatever the outcome, so the
/// same files can be picked again right away.
#[derive(Debug, Clone, Default)]
pub struct UploadSelection {
    files: Vec<UploadFile>,
}

impl UploadSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    pub fn add(&mut self, file: UploadFile) {
        self.files.push(file);
    }

    /// Number of files picked.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is picked.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Names of the picked files.
    pub fn names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }

    /// Removes and returns every picked file.
    pub fn take(&mut self) -> Vec<UploadFile> {
        std::mem::take(&mut self.files)
    }
}

impl FromIterator<UploadFile> for UploadSelection {
    fn from_iter<I: IntoIterator<Item = UploadFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}
