use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::models::{Category, CategorySummary, Choice, JobRecord};

/// Catalog bundled into the binary
const EMBEDDED_CATALOG: &str = include_str!("../../data/jobs.json");

/// Errors raised while loading the catalog
#[derive(Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    Io { path: PathBuf, source: std::io::Error },

    /// Catalog content is not a valid JSON array of job records
    Parse(serde_json::Error),

    /// Two records share the same id
    DuplicateId(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io { path, source } => {
                write!(f, "Failed to read catalog {}: {}", path.display(), source)
            }
            CatalogError::Parse(e) => write!(f, "Invalid catalog: {}", e),
            CatalogError::DuplicateId(id) => write!(f, "Duplicate job id in catalog: {}", id),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io { source, .. } => Some(source),
            CatalogError::Parse(e) => Some(e),
            CatalogError::DuplicateId(_) => None,
        }
    }
}

/// Read-only, ordered collection of job postings
///
/// The store never changes after construction. Record order is the order of the
/// source document and is what "relevance" ordering falls back to.
#[derive(Debug, Clone)]
pub struct JobStore {
    jobs: Vec<JobRecord>,
}

impl JobStore {
    /// Build a store, rejecting duplicate ids
    pub fn new(jobs: Vec<JobRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(jobs.len());
        for job in &jobs {
            if !seen.insert(job.id.as_str()) {
                return Err(CatalogError::DuplicateId(job.id.clone()));
            }
        }

        debug!("Catalog built with {} jobs", jobs.len());
        Ok(Self { jobs })
    }

    /// Load the catalog shipped with the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load a catalog from a JSON array on disk
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_json(&content)?;
        info!("Loaded {} jobs from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let jobs: Vec<JobRecord> = serde_json::from_str(content).map_err(CatalogError::Parse)?;
        Self::new(jobs)
    }

    pub fn all(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Look up a record by its id
    pub fn get(&self, id: &str) -> Option<&JobRecord> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn by_category(&self, category: Category) -> Vec<&JobRecord> {
        self.jobs.iter().filter(|job| job.category == category).collect()
    }

    /// One entry per category in declaration order, empty categories included
    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        Category::ALL
            .iter()
            .map(|&category| CategorySummary {
                id: category,
                label: category.label(),
                count: self.jobs.iter().filter(|job| job.category == category).count(),
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{embedded, job};
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_catalog_loads() {
        let store = embedded();
        assert_eq!(store.len(), 30);
        assert_eq!(store.all()[0].id, "job-001");
        assert_eq!(store.all()[29].id, "job-030");
    }

    #[test]
    fn test_get_by_id() {
        let store = embedded();
        let record = store.get("job-013").unwrap();
        assert_eq!(record.title, "Backend Developer");
        assert_eq!(record.company, "TechCorp");
        assert!(store.get("job-999").is_none());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = JobStore::new(vec![job("a", "One", "X"), job("a", "Two", "Y")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_by_category_preserves_order() {
        let store = embedded();
        let ids: Vec<&str> = store
            .by_category(Category::It)
            .iter()
            .map(|job| job.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["job-001", "job-006", "job-011", "job-013", "job-018", "job-023", "job-025", "job-030"]
        );
    }

    #[test]
    fn test_category_summaries_cover_every_category() {
        let store = embedded();
        let summaries = store.category_summaries();
        assert_eq!(summaries.len(), Category::ALL.len());
        assert_eq!(summaries[0].id, Category::It);
        assert_eq!(summaries[0].label, "IT & Software");
        assert_eq!(summaries[0].count, 8);
        assert_eq!(summaries.iter().map(|s| s.count).sum::<usize>(), 30);
    }

    #[test]
    fn test_from_path_reads_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let jobs = vec![job("x-1", "Tester", "Acme")];
        write!(file, "{}", serde_json::to_string(&jobs).unwrap()).unwrap();

        let store = JobStore::from_path(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("x-1").unwrap().company, "Acme");
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = JobStore::from_path(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_malformed_catalog_is_a_parse_error() {
        let result = JobStore::from_json("[{\"id\": 1}]");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }
}
