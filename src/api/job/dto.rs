use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::{Category, CategorySummary, Choice, ExperienceLevel, JobRecord, JobType, LocationType};
use crate::query::Pager;

/// Display labels for a record's enum fields
#[derive(Debug, Serialize)]
pub struct JobLabels {
    pub experience_level: &'static str,
    pub job_type: &'static str,
    pub location_type: &'static str,
    pub category: &'static str,
}

impl JobLabels {
    fn of(job: &JobRecord) -> Self {
        JobLabels {
            experience_level: job.experience_level.label(),
            job_type: job.job_type.label(),
            location_type: job.location_type.label(),
            category: job.category.label(),
        }
    }
}

/// Card shown in listings
#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub experience_level: ExperienceLevel,
    pub job_type: JobType,
    pub location_type: LocationType,
    pub category: Category,
    pub posted_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
    pub labels: JobLabels,
    pub saved: bool,
}

impl JobSummary {
    pub fn new(job: &JobRecord, saved: bool) -> Self {
        JobSummary {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            salary: job.salary.clone(),
            experience_level: job.experience_level,
            job_type: job.job_type,
            location_type: job.location_type,
            category: job.category,
            posted_date: job.posted_date,
            company_logo: job.company_logo.clone(),
            labels: JobLabels::of(job),
            saved,
        }
    }
}

/// Response for a listing page
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub jobs: Vec<JobSummary>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Shareable query string of this view
    pub query: String,
    pub active_filters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pager: Option<Pager>,
}

/// Response for a single job
#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: JobRecord,
    pub labels: JobLabels,
    pub saved: bool,
}

impl JobDetailResponse {
    pub fn new(job: &JobRecord, saved: bool) -> Self {
        JobDetailResponse {
            job: job.clone(),
            labels: JobLabels::of(job),
            saved,
        }
    }
}

/// Response for the category tabs
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub total: usize,
    pub categories: Vec<CategorySummary>,
}

/// Confirmation returned after an application
#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub message: String,
    pub job_id: String,
    pub reference: String,
}

/// Response for the saved jobs view
#[derive(Debug, Serialize)]
pub struct SavedJobsResponse {
    pub total: usize,
    pub jobs: Vec<JobSummary>,
}

/// Response for a saved-jobs toggle
#[derive(Debug, Serialize)]
pub struct ToggleSavedResponse {
    pub id: String,
    pub saved: bool,
    pub saved_jobs: Vec<String>,
}
