use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::catalog::{Category, ExperienceLevel, JobRecord, JobStore, JobType, LocationType, models::UnknownChoice};

/// Ordering applied after search and filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recently posted first
    Date,
    /// Highest salary first
    Salary,
    /// Keep the order search and filter produced
    #[default]
    Relevance,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Salary => "salary",
            SortKey::Relevance => "relevance",
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "salary" => Ok(SortKey::Salary),
            "relevance" => Ok(SortKey::Relevance),
            _ => Err(UnknownChoice {
                field: "sort",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active filter selections
///
/// Each set accepts any of its values (OR within a field); every non-empty field
/// must accept the record (AND across fields). An empty set imposes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub categories: BTreeSet<Category>,
    pub experience_levels: BTreeSet<ExperienceLevel>,
    pub job_types: BTreeSet<JobType>,
    pub location_types: BTreeSet<LocationType>,
    /// Case-insensitive substring of the record's `location`
    pub location: Option<String>,
}

impl FilterState {
    /// True when no field constrains the result
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.experience_levels.is_empty()
            && self.job_types.is_empty()
            && self.location_types.is_empty()
            && self.location_needle().is_none()
    }

    /// Number of fields that constrain the result
    pub fn active_count(&self) -> usize {
        [
            !self.categories.is_empty(),
            !self.experience_levels.is_empty(),
            !self.job_types.is_empty(),
            !self.location_types.is_empty(),
            self.location_needle().is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn matches(&self, job: &JobRecord) -> bool {
        accepts(&self.categories, &job.category)
            && accepts(&self.experience_levels, &job.experience_level)
            && accepts(&self.job_types, &job.job_type)
            && accepts(&self.location_types, &job.location_type)
            && self.location_needle().map_or(true, |needle| {
                job.location.to_lowercase().contains(&needle.to_lowercase())
            })
    }

    pub(crate) fn location_needle(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
    }
}

fn accepts<T: Ord>(accepted: &BTreeSet<T>, value: &T) -> bool {
    accepted.is_empty() || accepted.contains(value)
}

/// Case-insensitive substring match on title, company or id
///
/// An empty query matches every record.
pub fn search<'a>(query: &str, jobs: &'a [JobRecord]) -> Vec<&'a JobRecord> {
    let needle = query.to_lowercase();
    jobs.iter()
        .filter(|job| {
            job.title.to_lowercase().contains(&needle)
                || job.company.to_lowercase().contains(&needle)
                || job.id.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Keep the records accepted by every active filter, preserving order
pub fn filter<'a>(jobs: &[&'a JobRecord], filters: &FilterState) -> Vec<&'a JobRecord> {
    jobs.iter().copied().filter(|job| filters.matches(job)).collect()
}

/// Return a sorted copy of `jobs`; ties keep their input order
pub fn sort<'a>(jobs: &[&'a JobRecord], key: SortKey) -> Vec<&'a JobRecord> {
    let mut sorted = jobs.to_vec();
    match key {
        SortKey::Date => sorted.sort_by(|a, b| b.posted_date.cmp(&a.posted_date)),
        SortKey::Salary => sorted.sort_by_key(|job| std::cmp::Reverse(salary_key(job.salary.as_deref()))),
        SortKey::Relevance => {}
    }
    sorted
}

/// Numeric sort key for a free-text salary
///
/// Every non-digit is dropped and the remaining digits are read as one integer,
/// so "$120,000 - $150,000" keys as 120000150000. Missing salaries and strings
/// without digits key as 0; overlong digit runs saturate.
pub fn salary_key(salary: Option<&str>) -> u64 {
    salary
        .into_iter()
        .flat_map(str::chars)
        .filter_map(|c| c.to_digit(10))
        .fold(0u64, |acc, digit| acc.saturating_mul(10).saturating_add(u64::from(digit)))
}

/// Search (or take the whole store), then filter, then sort
pub fn run<'a>(store: &'a JobStore, query: &str, filters: &FilterState, sort_by: SortKey) -> Vec<&'a JobRecord> {
    let searched: Vec<&JobRecord> = if query.is_empty() {
        store.all().iter().collect()
    } else {
        search(query, store.all())
    };

    let filtered = if filters.is_empty() {
        searched
    } else {
        filter(&searched, filters)
    };

    sort(&filtered, sort_by)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::fixtures::{embedded, job};
    use chrono::NaiveDate;

    fn ids<'a>(jobs: &[&'a JobRecord]) -> Vec<&'a str> {
        jobs.iter().map(|job| job.id.as_str()).collect()
    }

    #[test]
    fn test_empty_search_returns_full_store_in_order() {
        let store = embedded();
        let result = search("", store.all());
        assert_eq!(result.len(), store.len());
        assert_eq!(ids(&result), store.all().iter().map(|j| j.id.as_str()).collect::<Vec<_>>());
    }

    #[test]
    fn test_search_is_case_insensitive_on_company() {
        let store = embedded();
        let result = search("techcorp", store.all());
        assert_eq!(ids(&result), vec!["job-001", "job-013", "job-025"]);
        assert!(result.iter().all(|job| job.company == "TechCorp"));
    }

    #[test]
    fn test_search_matches_title_or_id() {
        let store = embedded();
        assert_eq!(ids(&search("NURSE", store.all())), vec!["job-004", "job-028"]);
        assert_eq!(ids(&search("job-02", store.all())).len(), 10);
    }

    #[test]
    fn test_filter_without_constraints_is_identity() {
        let store = embedded();
        let all: Vec<&JobRecord> = store.all().iter().collect();
        let result = filter(&all, &FilterState::default());
        assert_eq!(ids(&result), ids(&all));
    }

    #[test]
    fn test_filter_by_category() {
        let store = embedded();
        let all: Vec<&JobRecord> = store.all().iter().collect();
        let filters = FilterState {
            categories: [Category::It].into(),
            ..Default::default()
        };
        let result = filter(&all, &filters);
        assert_eq!(result.len(), 8);
        assert!(result.iter().all(|job| job.category == Category::It));
    }

    #[test]
    fn test_filter_fields_intersect() {
        let store = embedded();
        let all: Vec<&JobRecord> = store.all().iter().collect();
        let filters = FilterState {
            categories: [Category::It].into(),
            experience_levels: [ExperienceLevel::Senior].into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&all, &filters)), vec!["job-001", "job-011", "job-023", "job-025"]);
    }

    #[test]
    fn test_filter_values_within_a_field_are_alternatives() {
        let store = embedded();
        let all: Vec<&JobRecord> = store.all().iter().collect();
        let filters = FilterState {
            categories: [Category::Finance, Category::Healthcare].into(),
            experience_levels: [ExperienceLevel::Entry].into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&all, &filters)), vec!["job-009", "job-021"]);
    }

    #[test]
    fn test_filter_location_substring_ignores_case() {
        let store = embedded();
        let all: Vec<&JobRecord> = store.all().iter().collect();
        let filters = FilterState {
            location: Some("seattle".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&all, &filters)), vec!["job-009", "job-011", "job-021", "job-023"]);
    }

    #[test]
    fn test_empty_location_imposes_nothing() {
        let filters = FilterState {
            location: Some(String::new()),
            ..Default::default()
        };
        assert!(filters.is_empty());
        assert_eq!(filters.active_count(), 0);
    }

    #[test]
    fn test_sort_by_date_is_descending_and_stable() {
        let store = embedded();
        let all: Vec<&JobRecord> = store.all().iter().collect();
        let sorted = sort(&all, SortKey::Date);

        assert_eq!(sorted[0].id, "job-030");
        assert!(sorted.windows(2).all(|w| w[0].posted_date >= w[1].posted_date));

        // job-012 and job-015 share 2023-06-20
        let pos = |id: &str| sorted.iter().position(|job| job.id == id).unwrap();
        assert_eq!(pos("job-015"), pos("job-012") + 1);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let store = embedded();
        let all: Vec<&JobRecord> = store.all().iter().collect();
        let before = ids(&all);
        let _ = sort(&all, SortKey::Date);
        assert_eq!(ids(&all), before);
    }

    #[test]
    fn test_sort_by_salary_puts_missing_salary_last() {
        let mut high = job("high", "A", "X");
        high.salary = Some("$150,000".to_string());
        let mut low = job("low", "B", "X");
        low.salary = Some("$90,000".to_string());
        let none = job("none", "C", "X");

        let sorted = sort(&[&none, &low, &high], SortKey::Salary);
        assert_eq!(ids(&sorted), vec!["high", "low", "none"]);
    }

    #[test]
    fn test_sort_by_salary_keeps_ties_in_input_order() {
        let mut first = job("first", "A", "X");
        first.salary = Some("$50,000".to_string());
        let mut second = job("second", "B", "X");
        second.salary = Some("50000".to_string());

        let sorted = sort(&[&first, &second], SortKey::Salary);
        assert_eq!(ids(&sorted), vec!["first", "second"]);
    }

    #[test]
    fn test_relevance_keeps_input_order() {
        let mut a = job("a", "A", "X");
        a.posted_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let b = job("b", "B", "X");
        assert_eq!(ids(&sort(&[&a, &b], SortKey::Relevance)), vec!["a", "b"]);
    }

    #[test]
    fn test_salary_key_concatenates_range_digits() {
        assert_eq!(salary_key(Some("$120,000 - $150,000")), 120_000_150_000);
        assert_eq!(salary_key(Some("$90,000")), 90_000);
        assert_eq!(salary_key(Some("Competitive")), 0);
        assert_eq!(salary_key(None), 0);
        assert_eq!(salary_key(Some("99999999999999999999999")), u64::MAX);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("Salary".parse::<SortKey>().unwrap(), SortKey::Salary);
        assert!("newest".parse::<SortKey>().is_err());
        assert_eq!(SortKey::default(), SortKey::Relevance);
    }

    #[test]
    fn test_developer_it_jobs_by_salary() {
        let store = embedded();
        let filters = FilterState {
            categories: [Category::It].into(),
            ..Default::default()
        };
        let result = run(&store, "Developer", &filters, SortKey::Salary);
        assert_eq!(ids(&result), vec!["job-001", "job-013", "job-030", "job-006"]);
    }
}
