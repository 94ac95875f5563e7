//! List query state shared by every management page.
//!
//! A [`ListQuery`] is the single source of truth for which page of a
//! resource is on screen: page number, page size, free-text search, the
//! active sort and any multi-value filters. It round-trips through the URL
//! query-string form (`?page=2&sort=name&sortOrder=desc&states=AVAILABLE`)
//! and produces the parameters the backend expects (0-based `page`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Query parameter names.
pub mod keys {
    pub const PAGE: &str = "page";
    pub const SIZE: &str = "size";
    pub const SEARCH: &str = "search";
    pub const SORT: &str = "sort";
    pub const SORT_ORDER: &str = "sortOrder";
    pub const ROLES: &str = "roles";
    pub const STATES: &str = "states";
    pub const CATEGORIES: &str = "categories";
    pub const DATES: &str = "assignedDate";
    pub const RETURNED_DATE: &str = "returnedDate";
}

/// Day filters travel as `YYYY-MM-DD`.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single active sort of a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub key: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(key: impl Into<String>, order: SortOrder) -> Self {
        Self {
            key: key.into(),
            order,
        }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, SortOrder::Asc)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, SortOrder::Desc)
    }

    /// The sort that results from activating `key` while `current` is active.
    ///
    /// Re-activating the current key flips its order; any other key starts
    /// out descending.
    pub fn toggled_on(current: Option<&Self>, key: &str) -> Self {
        match current {
            Some(sort) if sort.key == key => Self::new(key, sort.order.toggled()),
            _ => Self::desc(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    pub size: u32,
    pub search: String,
    pub sort: Option<Sort>,
    /// Multi-value filters keyed by parameter name, e.g. `states`.
    pub filters: BTreeMap<String, Vec<String>>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort: None,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the URL query-string form. Missing or malformed values fall
    /// back to their defaults; unknown keys become filters. A `sortOrder`
    /// without a `sort` key is ignored.
    pub fn from_query_string(query: &str) -> Self {
        let (mut result, sort_key, sort_order) = Self::parse(query);
        result.sort = sort_key.map(|key| Sort::new(key, sort_order.unwrap_or_default()));
        result
    }

    /// Like [`Self::from_query_string`], but the page always has a sort. The
    /// sort key and order each fall back to `default` on their own, so
    /// `?sortOrder=desc` sorts the default key descending.
    pub fn from_query_string_or(query: &str, default: Sort) -> Self {
        let (mut result, sort_key, sort_order) = Self::parse(query);
        result.sort = Some(Sort::new(
            sort_key.unwrap_or(default.key),
            sort_order.unwrap_or(default.order),
        ));
        result
    }

    fn parse(query: &str) -> (Self, Option<String>, Option<SortOrder>) {
        let mut result = Self::default();
        let mut sort_key = None;
        let mut sort_order = None;

        for (key, value) in parse_pairs(query) {
            match key.as_str() {
                keys::PAGE => {
                    result.page = value
                        .parse()
                        .ok()
                        .filter(|page| *page >= 1)
                        .unwrap_or(DEFAULT_PAGE);
                }
                keys::SIZE => {
                    result.size = value
                        .parse()
                        .ok()
                        .filter(|size| *size >= 1)
                        .unwrap_or(DEFAULT_PAGE_SIZE);
                }
                keys::SEARCH => result.search = value,
                keys::SORT if !value.is_empty() => sort_key = Some(value),
                keys::SORT_ORDER => sort_order = SortOrder::parse(&value),
                _ if !value.is_empty() => result.filters.entry(key).or_default().push(value),
                _ => {}
            }
        }

        (result, sort_key, sort_order)
    }

    /// URL query-string form with a 1-based page. Empty values are dropped.
    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.pairs(self.page))
    }

    /// Parameters sent to the backend, whose pages are 0-based.
    pub fn api_params(&self) -> Vec<(String, String)> {
        self.pairs(self.page.saturating_sub(1))
    }

    pub fn api_query_string(&self) -> String {
        encode_pairs(&self.api_params())
    }

    fn pairs(&self, page: u32) -> Vec<(String, String)> {
        let mut pairs = vec![
            (keys::PAGE.to_owned(), page.to_string()),
            (keys::SIZE.to_owned(), self.size.to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push((keys::SEARCH.to_owned(), self.search.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push((keys::SORT.to_owned(), sort.key.clone()));
            pairs.push((keys::SORT_ORDER.to_owned(), sort.order.to_string()));
        }
        for (key, values) in &self.filters {
            for value in values.iter().filter(|value| !value.is_empty()) {
                pairs.push((key.clone(), value.clone()));
            }
        }
        pairs
    }

    /// Filter values for `key`, empty when the filter is not set.
    pub fn filter(&self, key: &str) -> &[String] {
        self.filters.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Applies a new sort; the list restarts at page 1.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self.page = DEFAULT_PAGE;
        self
    }

    /// Applies a new search keyword; the list restarts at page 1.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into().trim().to_owned();
        self.page = DEFAULT_PAGE;
        self
    }

    /// Replaces the values of one filter; the list restarts at page 1.
    pub fn with_filter(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        let key = key.into();
        if values.is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, values);
        }
        self.page = DEFAULT_PAGE;
        self
    }

    /// Sets a single-day filter from `YYYY-MM-DD` input. Blank input clears
    /// the filter. Either way the list restarts at page 1.
    pub fn with_day(self, key: &str, input: &str) -> Result<Self, chrono::ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(self.with_filter(key, Vec::new()));
        }
        let day = NaiveDate::parse_from_str(input, DAY_FORMAT)?;
        Ok(self.with_filter(key, vec![day.format(DAY_FORMAT).to_string()]))
    }

    /// Spreads the single-day filter under `key` over the backend's
    /// `{field}From` and `{field}To` pair.
    pub fn with_day_range(mut self, key: &str, field: &str) -> Self {
        if let Some(day) = self.filters.remove(key).and_then(|days| days.into_iter().next()) {
            self.filters.insert(format!("{field}From"), vec![day.clone()]);
            self.filters.insert(format!("{field}To"), vec![day]);
        }
        self
    }
}

fn parse_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

/// Encodes key/value pairs as `a=1&b=2`.
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
