use std::sync::Arc;
use std::time::Duration;

use course_helper::catalog::{
    BilingualName, CatalogClient, CatalogError, CatalogQuery, CatalogRef, CatalogService, Course,
    Day, Period, RetryPolicy, SearchDebouncer, SearchState, TimeGrid,
};
use course_helper::db::{CatalogDbManager, CatalogStore, CourseFilter};
use course_helper::schedule::{layout_week, AddOutcome, ScheduleSession};
use course_helper::server::create_router;
use course_helper::types::AppState;
use tokio::net::TcpListener;

fn course(i: usize) -> Course {
    let mut time = TimeGrid::default();
    time.slots_mut(Day::ALL[i % 7]).push(Period::ALL[i % 13]);

    Course {
        id: format!("{}", 300000 + i),
        code: format!("{:07}", i),
        name: BilingualName {
            zh: format!("課程{i}"),
            en: format!("Course {i}"),
        },
        course_type: "★".to_string(),
        credit: 2.0,
        hours: 2,
        time,
        classroom: Vec::new(),
        teacher: vec![CatalogRef {
            name: if i % 10 == 0 { "Chen Yu".to_string() } else { "Lee".to_string() },
            code: String::new(),
            link: String::new(),
        }],
    }
}

async fn spawn_server(store: Arc<dyn CatalogStore>) -> String {
    let state = Arc::new(AppState::new(CatalogService::new(
        store,
        RetryPolicy {
            max_retries: 1,
            delay: Duration::from_millis(10),
        },
    )));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .await
            .expect("serve");
    });

    format!("http://{address}")
}

fn seeded_store(n: usize) -> Arc<CatalogDbManager> {
    let db = CatalogDbManager::open_in_memory().expect("open");
    let courses: Vec<Course> = (0..n).map(course).collect();
    db.upsert_courses(&courses).expect("seed");
    Arc::new(db)
}

#[tokio::test]
async fn pages_through_catalog_over_http() {
    let base = spawn_server(seeded_store(120)).await;
    let client = CatalogClient::new(&base).expect("client");

    let first = client
        .fetch_page(&CatalogQuery::default())
        .await
        .expect("first page");
    assert_eq!(first.courses.len(), 50);
    assert_eq!(first.total, 120);
    assert_eq!(first.pages, 3);
    assert!(first.courses.windows(2).all(|w| w[0].code < w[1].code));

    let clamped = client
        .fetch_page(&CatalogQuery {
            q: String::new(),
            page: 0,
            limit: 500,
        })
        .await
        .expect("clamped page");
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.limit, 100);

    let by_teacher = client
        .fetch_page(&CatalogQuery::new("chen", 1, 50))
        .await
        .expect("teacher search");
    assert_eq!(by_teacher.total, 12);

    let all = client.fetch_collection().await.expect("collection");
    assert_eq!(all.len(), 120);
}

#[tokio::test]
async fn search_results_feed_the_schedule() {
    let base = spawn_server(seeded_store(30)).await;
    let client = Arc::new(CatalogClient::new(&base).expect("client"));
    let mut search = SearchDebouncer::new(client, Duration::from_millis(20), 50);
    let mut rx = search.subscribe();

    search.input("course 1");
    let page = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.expect("search state");
            if let SearchState::Ready { page, .. } = rx.borrow_and_update().clone() {
                return page;
            }
        }
    })
    .await
    .expect("search finished");

    // "Course 1" and "Course 10".."Course 19"
    assert_eq!(page.total, 11);

    // Each seeded course meets once, at a distinct (day, period) for these ids
    let mut session = ScheduleSession::new();
    for course in page.courses {
        assert_eq!(session.add(course), AddOutcome::Added);
    }
    assert_eq!(session.selected().len(), 11);
    assert_eq!(session.totals().total_hours, 22);

    // Courses 13 and 14 meet on the weekend, which the grid doesn't draw
    let blocks = layout_week(session.selected());
    assert_eq!(blocks.len(), 9);
    assert!(blocks.iter().all(|b| b.span == 1));
}

struct DownStore;

impl CatalogStore for DownStore {
    fn ping(&self) -> Result<(), CatalogError> {
        Err(CatalogError::Database {
            message: "unable to open database file".to_string(),
        })
    }

    fn count_matching(&self, _filter: &CourseFilter) -> Result<u64, CatalogError> {
        unreachable!("ping always fails")
    }

    fn find_page(
        &self,
        _filter: &CourseFilter,
        _skip: u64,
        _take: u64,
    ) -> Result<Vec<Course>, CatalogError> {
        unreachable!("ping always fails")
    }

    fn find_all(&self) -> Result<Vec<Course>, CatalogError> {
        unreachable!("ping always fails")
    }
}

#[tokio::test]
async fn store_failure_becomes_error_body() {
    let base = spawn_server(Arc::new(DownStore)).await;
    let client = CatalogClient::new(&base).expect("client");

    let err = client
        .fetch_page(&CatalogQuery::default())
        .await
        .expect_err("store is down");

    match err {
        CatalogError::Service {
            status,
            details,
            timestamp,
            ..
        } => {
            assert_eq!(status, 500);
            assert!(details.contains("unable to open database file"));
            assert!(chrono::DateTime::parse_from_rfc3339(&timestamp).is_ok());
        }
        other => panic!("unexpected error {:?}", other),
    }
}
