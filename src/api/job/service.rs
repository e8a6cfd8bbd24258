use actix_web::{HttpResponse, ResponseError};
use rand::Rng;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};
use validator::{Validate, ValidationErrors};

use crate::api::validation::{field_errors, ErrorResponse};
use crate::catalog::{JobRecord, JobStore};
use crate::query::{self, paginate, total_pages, QueryError, QueryState};
use crate::saved::{KeyValueStore, SavedJobs, StorageError};
use super::dto::{
    ApplicationResponse, CategoriesResponse, JobDetailResponse, JobSummary, ListingResponse, SavedJobsResponse,
    ToggleSavedResponse,
};
use super::models::Application;

/// Saved-jobs registry shared by every HTTP worker
pub type SharedSavedJobs = Arc<Mutex<SavedJobs<Box<dyn KeyValueStore>>>>;

/// Where a not-found page sends the user back to
const LISTING_PATH: &str = "/jobs";

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Listing parameters could not be interpreted
    InvalidQuery(QueryError),

    /// Request body failed validation
    ValidationError(ValidationErrors),

    /// Job not found
    NotFound(String),

    /// Saved jobs could not be persisted
    StorageError(StorageError),

    /// Saved jobs registry is unusable after a panic while it was held
    StateUnavailable,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::InvalidQuery(e) => write!(f, "{}", e),
            ServiceError::ValidationError(e) => write!(f, "Validation error: {}", e),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
            ServiceError::StorageError(e) => write!(f, "{}", e),
            ServiceError::StateUnavailable => write!(f, "Saved jobs registry unavailable"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<QueryError> for ServiceError {
    fn from(e: QueryError) -> Self {
        ServiceError::InvalidQuery(e)
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        ServiceError::StorageError(e)
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InvalidQuery(e) => {
                warn!("Invalid query: {}", e);
                HttpResponse::BadRequest().json(ErrorResponse::message("Invalid query", e.to_string()))
            }
            ServiceError::ValidationError(errors) => {
                warn!("Validation error: {}", errors);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: field_errors(errors),
                })
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({
                        "message": format!("Job with id {} not found", id),
                        "back": LISTING_PATH,
                    }),
                })
            }
            ServiceError::StorageError(e) => {
                error!("Storage error: {}", e);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::message("Failed to process request", "Saved jobs could not be stored"))
            }
            ServiceError::StateUnavailable => {
                error!("Saved jobs registry lock poisoned");
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::message("Failed to process request", "Saved jobs are unavailable"))
            }
        }
    }
}

/// Job service containing business logic
pub struct JobService {
    catalog: Arc<JobStore>,
    saved: SharedSavedJobs,
    page_size: usize,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(catalog: Arc<JobStore>, saved: SharedSavedJobs, page_size: usize) -> Self {
        Self {
            catalog,
            saved,
            page_size: page_size.max(1),
        }
    }

    pub fn catalog(&self) -> &JobStore {
        &self.catalog
    }

    pub(crate) fn lock_saved(&self) -> Result<MutexGuard<'_, SavedJobs<Box<dyn KeyValueStore>>>, ServiceError> {
        self.saved.lock().map_err(|_| ServiceError::StateUnavailable)
    }

    /// Build one page of the listing
    ///
    /// # Business Logic
    /// - Runs search, filter and sort over the catalog
    /// - Clamps the requested page into the available range
    /// - Marks each card with its saved state
    pub fn list(&self, mut state: QueryState) -> Result<ListingResponse, ServiceError> {
        let results = query::run(&self.catalog, state.search_query(), state.filters(), state.sort_by());
        let total = results.len();
        let total_pages = total_pages(total, self.page_size);

        let requested = state.current_page();
        state.clamp_to(total_pages);
        if requested != state.current_page() {
            debug!("Clamped page {} to {} of {}", requested, state.current_page(), total_pages);
        }

        let saved = self.lock_saved()?;
        let jobs = paginate(&results, state.current_page(), self.page_size)
            .iter()
            .map(|job| JobSummary::new(job, saved.is_saved(&job.id)))
            .collect();

        info!(
            "Service: Listing q={:?} filters={} sort={} -> {} results",
            state.search_query(),
            state.filters().active_count(),
            state.sort_by(),
            total
        );

        Ok(ListingResponse {
            jobs,
            total,
            page: state.current_page(),
            total_pages,
            page_size: self.page_size,
            query: state.to_query_string(),
            active_filters: state.active_filter_count(),
            pager: state.pager(total, self.page_size),
        })
    }

    fn find(&self, id: &str) -> Result<&JobRecord, ServiceError> {
        self.catalog.get(id).ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    pub fn detail(&self, id: &str) -> Result<JobDetailResponse, ServiceError> {
        let job = self.find(id)?;
        let saved = self.lock_saved()?.is_saved(&job.id);
        Ok(JobDetailResponse::new(job, saved))
    }

    pub fn categories(&self) -> CategoriesResponse {
        CategoriesResponse {
            total: self.catalog.len(),
            categories: self.catalog.category_summaries(),
        }
    }

    /// Accept an application without storing or forwarding it
    ///
    /// # Returns
    /// - `Ok(ApplicationResponse)` - confirmation with a reference code
    /// - `Err(ServiceError)` - unknown job or invalid submission
    pub fn apply(&self, id: &str, application: Application) -> Result<ApplicationResponse, ServiceError> {
        let job = self.find(id)?;
        application.validate().map_err(ServiceError::ValidationError)?;

        let reference = format!("APP-{:06}", rand::thread_rng().gen_range(0..1_000_000));
        info!(
            "Service: Application {} received for job {} (resume attached: {})",
            reference,
            job.id,
            application.resume.is_some()
        );

        Ok(ApplicationResponse {
            message: format!("Application submitted for {} at {}", job.title, job.company),
            job_id: job.id.clone(),
            reference,
        })
    }

    /// Saved jobs in catalog order
    pub fn saved_jobs(&self) -> Result<SavedJobsResponse, ServiceError> {
        let saved = self.lock_saved()?;
        let jobs: Vec<JobSummary> = saved
            .records(&self.catalog)
            .into_iter()
            .map(|job| JobSummary::new(job, true))
            .collect();

        Ok(SavedJobsResponse {
            total: jobs.len(),
            jobs,
        })
    }

    /// Save or unsave a catalog job
    pub fn toggle_saved(&self, id: &str) -> Result<ToggleSavedResponse, ServiceError> {
        let job = self.find(id)?;
        let mut saved = self.lock_saved()?;
        let now_saved = saved.toggle(&job.id)?;

        Ok(ToggleSavedResponse {
            id: job.id.clone(),
            saved: now_saved,
            saved_jobs: saved.ids().to_vec(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::service;
    use super::*;
    use crate::query::QueryParams;

    fn state(q: Option<&str>, category: Option<&str>, sort: Option<&str>, page: Option<usize>) -> QueryState {
        QueryState::from_params(&QueryParams {
            q: q.map(str::to_string),
            category: category.map(str::to_string),
            sort: sort.map(str::to_string),
            page,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_default_listing_pages_full_catalog() {
        let response = service().list(QueryState::default()).unwrap();
        assert_eq!(response.total, 30);
        assert_eq!(response.total_pages, 4);
        assert_eq!(response.jobs.len(), 9);
        assert_eq!(response.jobs[0].id, "job-001");
        assert_eq!(response.query, "");
        assert_eq!(response.pager.as_ref().unwrap().next.as_deref(), Some("page=2"));
    }

    #[test]
    fn test_last_page_holds_remainder() {
        let response = service().list(state(None, None, None, Some(4))).unwrap();
        assert_eq!(response.page, 4);
        assert_eq!(response.jobs.len(), 3);
    }

    #[test]
    fn test_stale_page_is_clamped() {
        let response = service().list(state(Some("developer"), None, None, Some(5))).unwrap();
        assert_eq!(response.total, 4);
        assert_eq!(response.total_pages, 1);
        assert_eq!(response.page, 1);
        assert_eq!(response.jobs.len(), 4);
        assert!(response.pager.is_none());
    }

    #[test]
    fn test_no_results_is_an_empty_page() {
        let response = service().list(state(Some("astronaut"), None, None, Some(3))).unwrap();
        assert_eq!(response.total, 0);
        assert_eq!(response.total_pages, 0);
        assert_eq!(response.page, 1);
        assert!(response.jobs.is_empty());
    }

    #[test]
    fn test_developer_it_jobs_by_salary_first_page() {
        let response = service()
            .list(state(Some("Developer"), Some("it"), Some("salary"), Some(1)))
            .unwrap();
        let ids: Vec<&str> = response.jobs.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, vec!["job-001", "job-013", "job-030", "job-006"]);
        assert_eq!(response.active_filters, 2);
        assert_eq!(response.query, "q=Developer&category=it&sort=salary");
    }

    #[test]
    fn test_salary_order_spans_pages() {
        use super::fixtures::shared_saved;
        use crate::catalog::store::fixtures::job;
        use crate::catalog::Category;

        // 12 IT developer roles at $61k..$72k, inserted out of order, plus a non-match
        let mut jobs: Vec<JobRecord> = [7, 2, 11, 0, 9, 4, 5, 10, 1, 8, 3, 6]
            .into_iter()
            .map(|n| {
                let mut record = job(&format!("dev-{n:02}"), "Backend Developer", "Acme");
                record.salary = Some(format!("${},000", 61 + n));
                record
            })
            .collect();
        let mut marketer = job("mkt-01", "Developer Relations", "Acme");
        marketer.category = Category::Marketing;
        marketer.salary = Some("$999,000".to_string());
        jobs.push(marketer);

        let catalog = Arc::new(JobStore::new(jobs).unwrap());
        let service = JobService::new(catalog, shared_saved(), 9);

        let first = service
            .list(state(Some("Developer"), Some("it"), Some("salary"), Some(1)))
            .unwrap();
        assert_eq!(first.total, 12);
        assert_eq!(first.total_pages, 2);
        let salaries: Vec<&str> = first.jobs.iter().map(|job| job.salary.as_deref().unwrap()).collect();
        assert_eq!(
            salaries,
            vec!["$72,000", "$71,000", "$70,000", "$69,000", "$68,000", "$67,000", "$66,000", "$65,000", "$64,000"]
        );
        assert_eq!(
            first.pager.as_ref().unwrap().next.as_deref(),
            Some("q=Developer&category=it&sort=salary&page=2")
        );

        let second = service
            .list(state(Some("Developer"), Some("it"), Some("salary"), Some(2)))
            .unwrap();
        let ids: Vec<&str> = second.jobs.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, vec!["dev-02", "dev-01", "dev-00"]);
        assert!(!second.pager.as_ref().unwrap().has_next);
    }

    #[test]
    fn test_saved_flag_is_reflected_in_listing_and_detail() {
        let service = service();
        service.toggle_saved("job-002").unwrap();

        let listing = service.list(QueryState::default()).unwrap();
        assert!(listing.jobs.iter().find(|job| job.id == "job-002").unwrap().saved);
        assert!(!listing.jobs.iter().find(|job| job.id == "job-001").unwrap().saved);

        assert!(service.detail("job-002").unwrap().saved);
    }

    #[test]
    fn test_detail_unknown_id_is_not_found() {
        assert!(matches!(service().detail("job-404"), Err(ServiceError::NotFound(id)) if id == "job-404"));
    }

    #[test]
    fn test_toggle_unknown_id_is_not_found() {
        let service = service();
        assert!(matches!(service.toggle_saved("nope"), Err(ServiceError::NotFound(_))));
        assert_eq!(service.saved_jobs().unwrap().total, 0);
    }

    #[test]
    fn test_saved_jobs_listing_and_untoggle() {
        let service = service();
        service.toggle_saved("job-010").unwrap();
        let response = service.toggle_saved("job-003").unwrap();
        assert!(response.saved);
        assert_eq!(response.saved_jobs, vec!["job-010".to_string(), "job-003".to_string()]);

        let saved = service.saved_jobs().unwrap();
        let ids: Vec<&str> = saved.jobs.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, vec!["job-003", "job-010"]);

        let response = service.toggle_saved("job-010").unwrap();
        assert!(!response.saved);
        assert_eq!(service.saved_jobs().unwrap().total, 1);
    }

    #[test]
    fn test_apply_returns_confirmation() {
        let application = Application {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            cover_letter: None,
            resume: None,
        };
        let response = service().apply("job-005", application).unwrap();
        assert_eq!(response.job_id, "job-005");
        assert!(response.reference.starts_with("APP-"));
        assert_eq!(response.message, "Application submitted for Policy Analyst at Government Affairs Office");
    }

    #[test]
    fn test_apply_rejects_invalid_submission() {
        let application = Application {
            name: "Ada".to_string(),
            email: "ada".to_string(),
            cover_letter: None,
            resume: None,
        };
        assert!(matches!(
            service().apply("job-005", application),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn test_categories() {
        let response = service().categories();
        assert_eq!(response.total, 30);
        assert_eq!(response.categories.len(), 5);
    }
}
