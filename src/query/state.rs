use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;
use validator::Validate;

use super::engine::{FilterState, SortKey};
use super::pagination::{clamp_page, total_pages};
use crate::catalog::models::{Choice, UnknownChoice};

/// Raw listing parameters as they appear in a shareable address
///
/// Set-valued parameters are comma separated, e.g. `category=it,finance`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct QueryParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub experience: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "locationType")]
    pub location_type: Option<String>,
    pub sort: Option<String>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,
}

/// Listing parameters that could not be interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    UnknownValue(UnknownChoice),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownValue(e) => write!(f, "Invalid query parameter: {}", e),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<UnknownChoice> for QueryError {
    fn from(e: UnknownChoice) -> Self {
        QueryError::UnknownValue(e)
    }
}

/// The user's current search text, filter selections, sort key and page
///
/// Every mutator that changes the result sequence resets the page to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search_query: String,
    filters: FilterState,
    sort_by: SortKey,
    current_page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            filters: FilterState::default(),
            sort_by: SortKey::default(),
            current_page: 1,
        }
    }
}

impl QueryState {
    /// Interpret address parameters
    pub fn from_params(params: &QueryParams) -> Result<Self, QueryError> {
        let filters = FilterState {
            categories: parse_set(params.category.as_deref())?,
            experience_levels: parse_set(params.experience.as_deref())?,
            job_types: parse_set(params.job_type.as_deref())?,
            location_types: parse_set(params.location_type.as_deref())?,
            location: params
                .location
                .as_deref()
                .map(str::trim)
                .filter(|location| !location.is_empty())
                .map(str::to_string),
        };

        let sort_by = match params.sort.as_deref().map(str::trim) {
            Some(sort) if !sort.is_empty() => sort.parse::<SortKey>()?,
            _ => SortKey::default(),
        };

        Ok(Self {
            search_query: params.q.clone().unwrap_or_default(),
            filters,
            sort_by,
            current_page: params.page.unwrap_or(1).max(1),
        })
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.current_page = 1;
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.current_page = 1;
    }

    /// Add `value` to its field's set, or remove it if already selected
    pub fn toggle_filter_value<F: FilterField>(&mut self, value: F) {
        let set = F::set_mut(&mut self.filters);
        if !set.remove(&value) {
            set.insert(value);
        }
        self.current_page = 1;
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.filters.location = location
            .map(|location| location.trim().to_string())
            .filter(|location| !location.is_empty());
        self.current_page = 1;
    }

    pub fn set_sort(&mut self, sort_by: SortKey) {
        self.sort_by = sort_by;
        self.current_page = 1;
    }

    /// Drop every filter and return to relevance order
    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
        self.sort_by = SortKey::default();
        self.current_page = 1;
    }

    /// Request a page; out-of-range values are clamped when the listing is built
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Clamp the current page against the size of the derived result
    pub fn clamp_to(&mut self, total_pages: usize) {
        self.current_page = clamp_page(self.current_page, total_pages);
    }

    /// Active filter fields, plus one when a non-default sort is chosen
    pub fn active_filter_count(&self) -> usize {
        self.filters.active_count() + usize::from(self.sort_by != SortKey::Relevance)
    }

    /// Encode as address parameters, omitting defaults
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        if !self.search_query.is_empty() {
            serializer.append_pair("q", &self.search_query);
        }
        append_set(&mut serializer, &self.filters.categories);
        append_set(&mut serializer, &self.filters.experience_levels);
        append_set(&mut serializer, &self.filters.job_types);
        if let Some(location) = self.filters.location_needle() {
            serializer.append_pair("location", location);
        }
        append_set(&mut serializer, &self.filters.location_types);
        if self.sort_by != SortKey::Relevance {
            serializer.append_pair("sort", self.sort_by.as_str());
        }
        if self.current_page > 1 {
            serializer.append_pair("page", &self.current_page.to_string());
        }

        serializer.finish()
    }

    /// Pager for a result of `total` records, `None` when a single page suffices
    pub fn pager(&self, total: usize, page_size: usize) -> Option<Pager> {
        let total_pages = total_pages(total, page_size);
        if total_pages <= 1 {
            return None;
        }

        let page = clamp_page(self.current_page, total_pages);
        let link = |target: usize| {
            let mut state = self.clone();
            state.current_page = target;
            state.to_query_string()
        };

        Some(Pager {
            page,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
            previous: (page > 1).then(|| link(page - 1)),
            next: (page < total_pages).then(|| link(page + 1)),
        })
    }
}

/// Page navigation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// Query string of the previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    /// Query string of the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Choice enums that own a set inside [`FilterState`]
pub trait FilterField: Choice + Ord {
    fn set_mut(filters: &mut FilterState) -> &mut BTreeSet<Self>;
}

impl FilterField for crate::catalog::Category {
    fn set_mut(filters: &mut FilterState) -> &mut BTreeSet<Self> {
        &mut filters.categories
    }
}

impl FilterField for crate::catalog::ExperienceLevel {
    fn set_mut(filters: &mut FilterState) -> &mut BTreeSet<Self> {
        &mut filters.experience_levels
    }
}

impl FilterField for crate::catalog::JobType {
    fn set_mut(filters: &mut FilterState) -> &mut BTreeSet<Self> {
        &mut filters.job_types
    }
}

impl FilterField for crate::catalog::LocationType {
    fn set_mut(filters: &mut FilterState) -> &mut BTreeSet<Self> {
        &mut filters.location_types
    }
}

fn parse_set<T>(raw: Option<&str>) -> Result<BTreeSet<T>, UnknownChoice>
where
    T: Choice + Ord + FromStr<Err = UnknownChoice>,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<T>)
        .collect()
}

fn append_set<T: Choice>(serializer: &mut form_urlencoded::Serializer<'_, String>, set: &BTreeSet<T>) {
    if set.is_empty() {
        return;
    }
    let joined = set.iter().map(|value| value.id()).collect::<Vec<_>>().join(",");
    serializer.append_pair(T::FIELD, &joined);
}
