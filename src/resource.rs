//! Resource descriptors and query parameter builders.
//!
//! A [`ResourceDescriptor`] names one fetchable cluster resource: the
//! endpoint URL plus an ordered list of query parameters. The typed
//! `*Params` builders produce the parameter lists the dashboard grids use,
//! with the stock defaults (trailing one-week window aligned to day
//! bounds, page size 25, newest-modified-first ordering).

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// One fetchable cluster resource.
///
/// Parameters keep their insertion order so built URIs are deterministic,
/// which matters for request assertions in tests and for log readability.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    url: String,
    params: Vec<(String, String)>,
}

impl ResourceDescriptor {
    /// Create a descriptor for an endpoint URL with no parameters.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Append one query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Append a list of query parameters.
    pub fn with_params(mut self, pairs: Vec<(String, String)>) -> Self {
        self.params.extend(pairs);
        self
    }

    /// The endpoint URL without parameters.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The query parameters in order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Build the full request URI with a percent-encoded query string.
    ///
    /// Repeated keys are kept (multi-field `order` uses one key per field,
    /// which is how the cluster API expects list parameters).
    pub fn uri(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.url, query.join("&"))
    }
}

/// Format a timestamp the way the cluster API expects (UTC, millisecond
/// precision, `Z` suffix).
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Midnight UTC at the start of the given day.
fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(ts)
}

/// The last representable millisecond of the given day.
fn end_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map(|naive| naive.and_utc())
        .unwrap_or(ts)
}

/// The stock grid window: one week back aligned to day bounds.
fn default_window() -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    (start_of_day(now - Duration::weeks(1)), end_of_day(now))
}

fn push_opt(pairs: &mut Vec<(String, String)>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        pairs.push((key.to_string(), v.clone()));
    }
}

fn push_opt_i64(pairs: &mut Vec<(String, String)>, key: &str, value: &Option<i64>) {
    if let Some(v) = value {
        pairs.push((key.to_string(), v.to_string()));
    }
}

fn push_time(pairs: &mut Vec<(String, String)>, key: &str, value: &Option<DateTime<Utc>>) {
    if let Some(v) = value {
        pairs.push((key.to_string(), format_timestamp(v)));
    }
}

fn push_order(pairs: &mut Vec<(String, String)>, order: &[String]) {
    for field in order {
        pairs.push(("order".to_string(), field.clone()));
    }
}

// ============================================================================
// Jobs
// ============================================================================

/// Query parameters for the jobs grid.
#[derive(Debug, Clone, PartialEq)]
pub struct JobsParams {
    pub page: i64,
    pub page_size: i64,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    pub order: Vec<String>,
    pub status: Option<String>,
    pub error_category: Option<String>,
    pub job_type_id: Option<i64>,
    pub job_type_name: Option<String>,
    pub job_type_category: Option<String>,
}

impl Default for JobsParams {
    fn default() -> Self {
        let (started, ended) = default_window();
        Self {
            page: 1,
            page_size: 25,
            started: Some(started),
            ended: Some(ended),
            order: vec!["-last_modified".to_string()],
            status: None,
            error_category: None,
            job_type_id: None,
            job_type_name: None,
            job_type_category: None,
        }
    }
}

impl JobsParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("page_size".to_string(), self.page_size.to_string()));
        push_time(&mut pairs, "started", &self.started);
        push_time(&mut pairs, "ended", &self.ended);
        push_order(&mut pairs, &self.order);
        push_opt(&mut pairs, "status", &self.status);
        push_opt(&mut pairs, "error_category", &self.error_category);
        push_opt_i64(&mut pairs, "job_type_id", &self.job_type_id);
        push_opt(&mut pairs, "job_type_name", &self.job_type_name);
        push_opt(&mut pairs, "job_type_category", &self.job_type_category);
        pairs
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// Query parameters for the recipes grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipesParams {
    pub page: i64,
    pub page_size: i64,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    pub order: Vec<String>,
    pub type_id: Option<i64>,
    pub type_name: Option<String>,
}

impl Default for RecipesParams {
    fn default() -> Self {
        let (started, ended) = default_window();
        Self {
            page: 1,
            page_size: 25,
            started: Some(started),
            ended: Some(ended),
            order: vec!["-last_modified".to_string()],
            type_id: None,
            type_name: None,
        }
    }
}

impl RecipesParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("page_size".to_string(), self.page_size.to_string()));
        push_time(&mut pairs, "started", &self.started);
        push_time(&mut pairs, "ended", &self.ended);
        push_order(&mut pairs, &self.order);
        push_opt_i64(&mut pairs, "type_id", &self.type_id);
        push_opt(&mut pairs, "type_name", &self.type_name);
        pairs
    }
}

// ============================================================================
// Ingests
// ============================================================================

/// Query parameters for the ingest records grid.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestsParams {
    pub page: i64,
    pub page_size: i64,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    pub order: Vec<String>,
    pub status: Option<String>,
}

impl Default for IngestsParams {
    fn default() -> Self {
        let (started, ended) = default_window();
        Self {
            page: 1,
            page_size: 25,
            started: Some(started),
            ended: Some(ended),
            order: vec!["-last_modified".to_string()],
            status: None,
        }
    }
}

impl IngestsParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("page_size".to_string(), self.page_size.to_string()));
        push_time(&mut pairs, "started", &self.started);
        push_time(&mut pairs, "ended", &self.ended);
        push_order(&mut pairs, &self.order);
        push_opt(&mut pairs, "status", &self.status);
        pairs
    }
}

// ============================================================================
// Ingest feed
// ============================================================================

/// Query parameters for the ingest-rate feed (`ingests/status/`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedParams {
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    /// Bucket by ingest time instead of data time.
    pub use_ingest_time: Option<bool>,
}

impl FeedParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_time(&mut pairs, "started", &self.started);
        push_time(&mut pairs, "ended", &self.ended);
        if let Some(flag) = self.use_ingest_time {
            pairs.push(("use_ingest_time".to_string(), flag.to_string()));
        }
        pairs
    }
}

// ============================================================================
// Job load
// ============================================================================

/// Query parameters for the queue load history (`load/`).
///
/// The load chart wants the whole window in one page, so the page size
/// defaults high instead of to the grid size.
#[derive(Debug, Clone, PartialEq)]
pub struct JobLoadParams {
    pub page_size: i64,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    pub job_type_id: Option<i64>,
    pub job_type_name: Option<String>,
    pub job_type_category: Option<String>,
}

impl Default for JobLoadParams {
    fn default() -> Self {
        Self {
            page_size: 1000,
            started: None,
            ended: None,
            job_type_id: None,
            job_type_name: None,
            job_type_category: None,
        }
    }
}

impl JobLoadParams {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_time(&mut pairs, "started", &self.started);
        push_time(&mut pairs, "ended", &self.ended);
        push_opt_i64(&mut pairs, "job_type_id", &self.job_type_id);
        push_opt(&mut pairs, "job_type_name", &self.job_type_name);
        push_opt(&mut pairs, "job_type_category", &self.job_type_category);
        pairs.push(("page_size".to_string(), self.page_size.to_string()));
        pairs
    }
}
