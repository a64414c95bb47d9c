// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::course::CourseSet;
use crate::utils::error::StorageError;

/// Counts gathered while extracting, written next to the course JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionStats {
    pub matches_found: usize,
    pub excluded: usize,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Saves the course set as pretty JSON: `<name>_courses.json`
    pub fn save_courses(&self, name: &str, courses: &CourseSet) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_courses.json", name));

        let json = courses
            .to_json_pretty()
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved {} courses to {}", courses.len(), file_path.display());

        Ok(file_path)
    }

    /// Saves metadata about the extraction run: `<name>_meta.json`
    pub fn save_metadata(
        &self,
        name: &str,
        source: &Path,
        courses: &CourseSet,
        stats: ExtractionStats,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_meta.json", name));

        let metadata = serde_json::json!({
            "source": source.display().to_string(),
            "course_count": courses.len(),
            "matches_found": stats.matches_found,
            "excluded_count": stats.excluded,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}
