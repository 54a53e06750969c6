use std::path::{Path, PathBuf};

use vitrina_core::PageFamily;

/// Output locations under one data directory (`data/` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new("data")
    }
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Per-family table file.
    #[must_use]
    pub fn family(&self, family: PageFamily) -> PathBuf {
        let name = match family {
            PageFamily::NewItem => "new_car_details.csv",
            PageFamily::UsedItem => "used_car_details.csv",
            PageFamily::Campaign => "campaign_data.csv",
        };
        self.root.join(name)
    }

    /// Merged new + used car table.
    #[must_use]
    pub fn combined_cars(&self) -> PathBuf {
        self.root.join("combined_car_details.csv")
    }
}
