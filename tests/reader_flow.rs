use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use httpmock::MockServer;
use quire::application::blog::{AuthorRef, BlogService};
use quire::application::pages::{AuthorPage, ListingPage, Navigation};
use quire::application::store::{RequestStatus, Store};
use quire::infra::cms::CmsClient;
use tokio::sync::mpsc;
use url::Url;

fn service(server: &MockServer) -> (BlogService, Arc<Store>) {
    let base = Url::parse(&server.base_url()).expect("base url");
    let client = CmsClient::new(base, Duration::from_secs(5)).expect("client");
    let store = Arc::new(Store::new());
    (BlogService::new(Arc::new(client), store.clone()), store)
}

#[tokio::test]
async fn listing_moves_from_idle_to_succeeded() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/blogs");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r##"{"data":[
                    {"id":1,"attributes":{"title":"# Hello World","slug":"hello-world"}},
                    {"id":2,"title":"Plain title","slug":"plain"}
                ]}"##,
            );
    });

    let (service, store) = service(&server);
    let mut states = store.subscribe();
    assert_eq!(states.borrow().posts.status, RequestStatus::Idle);

    let observer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while states.changed().await.is_ok() {
            let status = states.borrow_and_update().posts.status;
            if seen.last() != Some(&status) {
                seen.push(status);
            }
            if status == RequestStatus::Succeeded {
                break;
            }
        }
        seen
    });

    let posts = service.list_all_posts().await.expect("posts");
    mock.assert();
    assert_eq!(posts.len(), 2);

    let seen = observer.await.expect("observer");
    assert_eq!(seen, [RequestStatus::Loading, RequestStatus::Succeeded]);

    let state = store.snapshot();
    assert_eq!(state.posts.status, RequestStatus::Succeeded);
    let titles: Vec<_> = state.posts.data.iter().map(|p| p.display_title()).collect();
    assert_eq!(titles, ["Hello World", "Plain title"]);
}

#[tokio::test]
async fn missing_slug_fails_on_both_routes() {
    let server = MockServer::start();
    let primary = server.mock(|when, then| {
        when.method("GET").path("/api/blogs/slug/missing");
        then.status(404)
            .header("content-type", "application/json")
            .body(r#"{"data":null,"error":{"status":404,"name":"NotFoundError","message":"Not Found"}}"#);
    });
    let direct = server.mock(|when, then| {
        when.method("GET").path("/api/blogs/missing");
        then.status(404)
            .header("content-type", "application/json")
            .body(r#"{"data":null,"error":{"status":404,"name":"NotFoundError","message":"Not Found"}}"#);
    });

    let (service, store) = service(&server);
    service
        .get_post_by_slug("missing")
        .await
        .expect_err("missing post");
    primary.assert();
    direct.assert();

    let current = store.snapshot().current_post;
    assert_eq!(current.status, RequestStatus::Failed);
    assert!(current.error.is_some_and(|message| !message.is_empty()));
    assert_eq!(current.data, None);
}

#[tokio::test]
async fn listing_page_filters_by_selected_tags() {
    let server = MockServer::start();
    let tagged = server.mock(|when, then| {
        when.method("GET").path("/api/blogs").query_param("tags", "rust");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"title":"A","slug":"a"}]"#);
    });
    let all = server.mock(|when, then| {
        when.method("GET").path("/api/blogs");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"title":"A","slug":"a"},{"title":"B","slug":"b"}]"#);
    });
    server.mock(|when, then| {
        when.method("GET").path("/api/blog-categories");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[]}"#);
    });

    let (service, _) = service(&server);
    let mut page = ListingPage::new(service, NonZeroUsize::new(6).expect("non-zero"));
    page.open().await.expect("open");
    assert_eq!(page.visible_posts().len(), 2);

    page.toggle_category("rust").await.expect("tagged");
    assert_eq!(page.visible_posts().len(), 1);

    page.toggle_category("rust").await.expect("all again");
    assert_eq!(page.visible_posts().len(), 2);

    all.assert_hits(2);
    tagged.assert();
}

#[tokio::test]
async fn author_by_id_uses_author_route() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/blogs/author/5");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"title":"A","slug":"a","blog_author":{"id":5,"name":"Ada"}}]"#);
    });

    let (service, store) = service(&server);
    let posts = service
        .list_posts_by_author(AuthorRef::Id(5))
        .await
        .expect("posts");
    mock.assert();
    assert_eq!(posts[0].author.as_ref().map(|a| a.slug.as_str()), Some("ada"));
    assert_eq!(store.snapshot().author_posts.data.len(), 1);
}

#[tokio::test]
async fn unknown_author_page_navigates_home() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/blogs");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[]}"#);
    });

    let (service, _) = service(&server);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut page =
        AuthorPage::new(service, "ghost", Duration::from_millis(50)).with_navigator(tx);

    page.open().await.expect_err("no posts");
    assert!(page.redirect_pending());
    assert_eq!(rx.recv().await, Some(Navigation::Root));
}
