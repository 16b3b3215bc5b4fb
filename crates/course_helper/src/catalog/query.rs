//! Catalog query parameters, result pages, and the retrying query service.

use super::error::CatalogError;
use super::types::Course;
use crate::db::{CatalogStore, CourseFilter};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 100;

/// Query string parameters exactly as received. Numbers stay text so that
/// malformed values fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalogParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A normalized catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub q: String,
    pub page: u32,
    pub limit: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl CatalogQuery {
    /// Builds a query, clamping `page` to at least 1 and `limit` to 1..=100.
    pub fn new(q: impl Into<String>, page: i64, limit: i64) -> Self {
        Self {
            q: q.into(),
            page: page.clamp(1, u32::MAX as i64) as u32,
            limit: limit.clamp(1, MAX_LIMIT as i64) as u32,
        }
    }

    pub fn from_raw(raw: RawCatalogParams) -> Self {
        let page = parse_or(raw.page.as_deref(), DEFAULT_PAGE);
        let limit = parse_or(raw.limit.as_deref(), DEFAULT_LIMIT);
        Self::new(raw.q.unwrap_or_default(), page, limit)
    }

    pub fn skip(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    pub fn filter(&self) -> CourseFilter {
        CourseFilter::new(&self.q)
    }
}

fn parse_or(raw: Option<&str>, default: u32) -> i64 {
    match raw.map(str::trim) {
        None | Some("") => default as i64,
        Some(text) => match text.parse::<i64>() {
            Ok(n) => n,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
            Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
            Err(_) => {
                debug!("Malformed numeric parameter {:?}, using {}", text, default);
                default as i64
            }
        },
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub courses: Vec<Course>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub pages: u64,
}

/// Number of pages needed for `total` results.
pub fn page_count(total: u64, limit: u32) -> u64 {
    total.div_ceil(limit.max(1) as u64)
}

/// Retry policy for store access: a fixed delay between a bounded number of retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

/// Answers catalog queries against a store, retrying transient failures.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    retry: RetryPolicy,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Runs a filtered, sorted, paginated read.
    pub async fn query(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        let filter = query.filter();
        let skip = query.skip();
        let take = query.limit as u64;

        let (courses, total) = self
            .with_retry("query", || {
                let courses = self.store.find_page(&filter, skip, take)?;
                let total = self.store.count_matching(&filter)?;
                Ok((courses, total))
            })
            .await?;

        Ok(CatalogPage {
            courses,
            total,
            page: query.page,
            limit: query.limit,
            pages: page_count(total, query.limit),
        })
    }

    /// Returns the whole collection in code order.
    pub async fn all(&self) -> Result<Vec<Course>, CatalogError> {
        self.with_retry("collection", || self.store.find_all()).await
    }

    /// Counts every course in the store.
    pub async fn count(&self) -> Result<u64, CatalogError> {
        self.with_retry("count", || {
            self.store.count_matching(&CourseFilter::default())
        })
        .await
    }

    /// Pings the store and runs `op`, retrying retryable failures with a fixed delay.
    async fn with_retry<T, F>(&self, operation: &str, mut op: F) -> Result<T, CatalogError>
    where
        F: FnMut() -> Result<T, CatalogError>,
    {
        let correlation_id = generate_correlation_id();
        let start = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let result = self.store.ping().and_then(|_| op());

            match result {
                Ok(value) => {
                    debug!(
                        correlation_id = %correlation_id,
                        operation = operation,
                        attempt = attempt,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Catalog read succeeded"
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt <= self.retry.max_retries => {
                    warn!(
                        correlation_id = %correlation_id,
                        operation = operation,
                        attempt = attempt,
                        error = %e,
                        delay_ms = self.retry.delay.as_millis() as u64,
                        "Catalog read failed, retrying"
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => {
                    error!(
                        correlation_id = %correlation_id,
                        operation = operation,
                        attempt = attempt,
                        error = %e,
                        "Catalog read failed"
                    );
                    if e.is_retryable() {
                        return Err(CatalogError::Exhausted {
                            attempts: attempt,
                            last_error: e.to_string(),
                        });
                    }
                    return Err(e);
                }
            }
        }
    }
}

/// Generates a short correlation ID for request tracing.
fn generate_correlation_id() -> String {
    let random: u32 = rand::thread_rng().gen();
    format!("{:08x}", random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::course;
    use crate::db::CatalogDbManager;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn raw(q: Option<&str>, page: Option<&str>, limit: Option<&str>) -> RawCatalogParams {
        RawCatalogParams {
            q: q.map(String::from),
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_defaults() {
        let q = CatalogQuery::from_raw(RawCatalogParams::default());
        assert_eq!(q, CatalogQuery::default());
        assert_eq!(q.skip(), 0);
    }

    #[test]
    fn test_clamping() {
        let q = CatalogQuery::from_raw(raw(None, Some("0"), Some("500")));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 100);

        let q = CatalogQuery::from_raw(raw(None, Some("-4"), Some("0")));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 1);
    }

    #[test]
    fn test_oversized_numbers_clamp() {
        let q = CatalogQuery::from_raw(raw(
            None,
            Some("99999999999999999999"),
            Some("100000000000000000000"),
        ));
        assert_eq!(q.page, u32::MAX);
        assert_eq!(q.limit, 100);

        let q = CatalogQuery::from_raw(raw(None, Some("-99999999999999999999"), None));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let q = CatalogQuery::from_raw(raw(Some("calc"), Some("two"), Some("1e3")));
        assert_eq!(q.q, "calc");
        assert_eq!(q.page, DEFAULT_PAGE);
        assert_eq!(q.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_skip_and_page_count() {
        let q = CatalogQuery::new("", 3, 50);
        assert_eq!(q.skip(), 100);
        assert_eq!(page_count(120, 50), 3);
        assert_eq!(page_count(100, 50), 2);
        assert_eq!(page_count(0, 50), 0);
    }

    fn catalog_of(n: usize) -> Arc<CatalogDbManager> {
        let db = CatalogDbManager::open_in_memory().unwrap();
        // Insert in reverse so ordering comes from the query, not insertion
        let courses: Vec<_> = (0..n)
            .rev()
            .map(|i| {
                course(
                    &i.to_string(),
                    &format!("C{:04}", i),
                    "課程",
                    &format!("Course {i}"),
                )
            })
            .collect();
        db.upsert_courses(&courses).unwrap();
        Arc::new(db)
    }

    #[tokio::test]
    async fn test_first_page_of_120() {
        let service = CatalogService::new(catalog_of(120), RetryPolicy::default());
        let page = service
            .query(&CatalogQuery::from_raw(raw(Some(""), Some("1"), Some("50"))))
            .await
            .unwrap();

        assert_eq!(page.courses.len(), 50);
        assert_eq!(page.total, 120);
        assert_eq!(page.pages, 3);
        assert_eq!(page.courses[0].code, "C0000");
        assert!(page.courses.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[tokio::test]
    async fn test_last_and_past_last_page() {
        let service = CatalogService::new(catalog_of(120), RetryPolicy::default());

        let last = service.query(&CatalogQuery::new("", 3, 50)).await.unwrap();
        assert_eq!(last.courses.len(), 20);
        assert_eq!(last.courses[0].code, "C0100");

        let beyond = service.query(&CatalogQuery::new("", 9, 50)).await.unwrap();
        assert!(beyond.courses.is_empty());
        assert_eq!(beyond.total, 120);
    }

    #[tokio::test]
    async fn test_filtered_total() {
        let service = CatalogService::new(catalog_of(120), RetryPolicy::default());
        let page = service
            .query(&CatalogQuery::new("course 11", 1, 5))
            .await
            .unwrap();
        // "Course 11" and "Course 110".."Course 119"
        assert_eq!(page.total, 11);
        assert_eq!(page.pages, 3);
        assert_eq!(page.courses.len(), 5);
    }

    /// A store whose ping fails a fixed number of times.
    struct FlakyStore {
        inner: CatalogDbManager,
        failures_left: AtomicU32,
        pings: AtomicU32,
    }

    impl FlakyStore {
        fn new(failures: u32) -> Self {
            let inner = CatalogDbManager::open_in_memory().unwrap();
            inner
                .upsert_courses(&[course("1", "A001", "微積分", "Calculus")])
                .unwrap();
            Self {
                inner,
                failures_left: AtomicU32::new(failures),
                pings: AtomicU32::new(0),
            }
        }
    }

    impl CatalogStore for FlakyStore {
        fn ping(&self) -> Result<(), CatalogError> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(CatalogError::Database {
                    message: "connection refused".to_string(),
                });
            }
            self.inner.ping()
        }

        fn count_matching(&self, filter: &CourseFilter) -> Result<u64, CatalogError> {
            self.inner.count_matching(filter)
        }

        fn find_page(
            &self,
            filter: &CourseFilter,
            skip: u64,
            take: u64,
        ) -> Result<Vec<Course>, CatalogError> {
            self.inner.find_page(filter, skip, take)
        }

        fn find_all(&self) -> Result<Vec<Course>, CatalogError> {
            self.inner.find_all()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers() {
        let store = Arc::new(FlakyStore::new(2));
        let service = CatalogService::new(store.clone(), RetryPolicy::default());

        let page = service.query(&CatalogQuery::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(store.pings.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up() {
        let store = Arc::new(FlakyStore::new(u32::MAX));
        let policy = RetryPolicy {
            max_retries: 3,
            delay: Duration::from_millis(1000),
        };
        let service = CatalogService::new(store.clone(), policy);

        let started = tokio::time::Instant::now();
        let err = service.all().await.unwrap_err();

        assert!(matches!(err, CatalogError::Exhausted { attempts: 4, .. }));
        assert_eq!(store.pings.load(Ordering::SeqCst), 4);
        assert!(started.elapsed() >= Duration::from_millis(3000));
    }
}
