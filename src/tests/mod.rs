use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::prober::{self, ProbeError, POSTS_ROUTE};
use crate::runner::{ContentSource, FeedError, Options, Runner};
use crate::view::{ErrorMode, PageController};

fn raw_post(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "slug": format!("recipe-{id}"),
        "date": "2024-03-05T10:00:00",
        "link": format!("https://postmanoil.com/blog/recipe-{id}"),
        "title": { "rendered": title },
        "content": { "rendered": "<p>Heat the oil &amp; fry the garlic until golden.</p>" },
        "_embedded": {
            "author": [{ "name": "Chef Ada" }],
            "wp:featuredmedia": [{ "source_url": format!("https://cdn.example.com/{id}.jpg") }],
            "wp:term": [[{ "name": "Dinner" }, { "name": "Quick" }]]
        }
    })
}

fn posts(count: u64) -> Value {
    Value::Array((1..=count).map(|i| raw_post(i, &format!("Recipe {i}"))).collect())
}

fn runner_for(site_url: &str) -> Runner {
    Runner::new(Options {
        site_url: site_url.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    })
    .unwrap()
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().build().unwrap()
}

#[tokio::test]
async fn embedded_root_endpoint_wins_when_it_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTS_ROUTE))
        .and(query_param("_embed", "1"))
        .and(query_param("per_page", "9"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "30")
                .set_body_json(posts(9)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/blog{POSTS_ROUTE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts(1)))
        .expect(0)
        .mount(&server)
        .await;

    let hit = prober::probe(&client(), &server.uri(), &prober::default_candidates(), 1)
        .await
        .unwrap();
    assert_eq!(hit.attempts, 1);
    assert_eq!(hit.items.len(), 9);
    assert_eq!(hit.headers.get("x-wp-total").map(String::as_str), Some("30"));
}

#[tokio::test]
async fn rejected_candidates_fall_through_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTS_ROUTE))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/blog{POSTS_ROUTE}")))
        .and(query_param("_embed", "1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/blog{POSTS_ROUTE}")))
        .and(query_param_is_missing("_embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts(2)))
        .expect(1)
        .mount(&server)
        .await;

    let hit = prober::probe(&client(), &server.uri(), &prober::default_candidates(), 1)
        .await
        .unwrap();
    assert_eq!(hit.attempts, 4);
    assert!(hit.url.contains("/blog/wp-json/wp/v2/posts"));
    assert!(!hit.url.contains("_embed"));
}

#[tokio::test]
async fn non_array_body_fails_without_trying_later_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTS_ROUTE))
        .and(query_param("_embed", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param_is_missing("_embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts(3)))
        .expect(0)
        .mount(&server)
        .await;

    let err = prober::probe(&client(), &server.uri(), &prober::default_candidates(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::InvalidBody { .. }));
}

#[tokio::test]
async fn truncated_or_object_body_is_an_invalid_body() {
    for body in [r#"[{"id": 1, "title": "#, r#"{"code": "rest_no_route"}"#] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = runner_for(&server.uri()).fetch_page(1).await.unwrap_err();
        assert!(matches!(
            err,
            FeedError::Probe(ProbeError::InvalidBody { .. })
        ));
    }
}

#[tokio::test]
async fn every_candidate_failing_reports_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let runner = runner_for(&server.uri());
    let err = runner.fetch_page(1).await.unwrap_err();
    assert!(matches!(
        err,
        FeedError::Probe(ProbeError::NotFound { attempted: 4 })
    ));
}

#[tokio::test]
async fn live_page_is_normalized_with_header_totals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTS_ROUTE))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "40")
                .insert_header("X-WP-TotalPages", "5")
                .set_body_json(posts(9)),
        )
        .mount(&server)
        .await;

    let fetched = runner_for(&server.uri()).fetch_page(2).await.unwrap();
    assert_eq!(fetched.totals.total_posts, 40);
    assert_eq!(fetched.totals.total_pages, 5);
    assert_eq!(fetched.posts.len(), 9);
    assert!(!fetched.is_fallback());

    let first = &fetched.posts[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.title, "Recipe 1");
    assert_eq!(first.author, "Chef Ada");
    assert_eq!(first.categories, vec!["Dinner".to_string(), "Quick".to_string()]);
    assert_eq!(first.featured_image, "https://cdn.example.com/1.jpg");
    assert_eq!(first.date, "March 5, 2024");
    assert_eq!(first.read_time, "1 min read");
    assert!(first.excerpt.starts_with("Heat the oil & fry the garlic"));
    assert!(fetched.posts.iter().all(|p| p.satisfies_invariants()));
}

#[tokio::test]
async fn unreachable_site_serves_placeholder_page() {
    // Nothing listens on the discard port.
    let runner = runner_for("http://127.0.0.1:9");
    for page in [1u32, 2] {
        let fetched = runner.fetch_page_or_fallback(page).await;
        assert!(fetched.is_fallback());
        let expected = std::cmp::min(9, 12 - (page as usize - 1) * 9);
        assert_eq!(fetched.posts.len(), expected);
        assert_eq!(fetched.totals.total_posts, 12);
        assert_eq!(fetched.totals.total_pages, 2);
    }
}

#[tokio::test]
async fn controller_falls_back_when_feed_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let runner = runner_for(&server.uri());
    let mut controller = PageController::new(ErrorMode::Fallback);
    assert!(controller.load(&runner, 2).await);
    let state = controller.state();
    assert!(state.is_fallback());
    assert!(state.error.is_none());
    assert!(!state.loading);
    assert_eq!(state.current_page, 2);
    assert_eq!(state.posts.len(), 3);
}

#[tokio::test]
async fn controller_refetches_last_page_when_past_the_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("page", "7"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "12")
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "12")
                .set_body_json(posts(3)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let runner = runner_for(&server.uri());
    let mut controller = PageController::new(ErrorMode::Fallback);
    assert!(controller.load(&runner, 7).await);
    let state = controller.state();
    assert_eq!(state.current_page, 2);
    assert_eq!(state.total_pages, 2);
    assert_eq!(state.posts.len(), 3);
    assert!(matches!(state.source, Some(ContentSource::Live { .. })));
}

#[tokio::test]
async fn page_past_end_without_total_headers_settles_on_fetched_page() {
    let server = MockServer::start().await;
    for page in ["1", "2"] {
        Mock::given(method("GET"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts(9)))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(10)
        .mount(&server)
        .await;

    let runner = runner_for(&server.uri());
    let mut controller = PageController::new(ErrorMode::Fallback);
    assert!(controller.load(&runner, 7).await);
    let state = controller.state();
    assert!(state.total_pages <= 2);
    assert!(state.current_page <= state.total_pages);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.posts.len(), 9);
    assert_eq!(state.total_posts, 9);
    assert!(!state.loading);
    assert!(matches!(state.source, Some(ContentSource::Live { .. })));
}

#[tokio::test]
async fn surfaced_error_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "2")
                .set_body_json(posts(2)),
        )
        .mount(&server)
        .await;

    let runner = runner_for(&server.uri());
    let mut controller = PageController::new(ErrorMode::Surface);
    controller.load(&runner, 1).await;
    assert!(controller.state().error.is_some());
    assert!(controller.state().posts.is_empty());

    assert!(controller.retry_load(&runner).await);
    let state = controller.state();
    assert!(state.error.is_none());
    assert_eq!(state.posts.len(), 2);
    assert_eq!(state.total_pages, 1);
}

#[tokio::test]
async fn navigation_outside_listing_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "18")
                .set_body_json(posts(9)),
        )
        .mount(&server)
        .await;

    let runner = runner_for(&server.uri());
    let mut controller = PageController::new(ErrorMode::Fallback);
    controller.load(&runner, 1).await;
    assert!(!controller.navigate(&runner, 3).await);
    assert!(!controller.navigate(&runner, 0).await);
    assert_eq!(controller.state().current_page, 1);
    assert!(controller.navigate(&runner, 2).await);
    assert_eq!(controller.state().current_page, 2);
}
