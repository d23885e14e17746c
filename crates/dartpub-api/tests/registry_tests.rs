//! End-to-end command tests against a local mock repository.

use dartpub_api::pubspec::{DependencyKind, VersionConstraint};
use dartpub_api::{
    ApiError, ClientConfig, DocumentationStatus, PubClient, SearchOrder, SearchQuery,
};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dartpub_api=debug")),
        )
        .with_test_writer()
        .try_init();
}

async fn setup() -> (ServerGuard, PubClient) {
    init_tracing();
    let server = Server::new_async().await;
    let config = ClientConfig::default()
        .with_hosted_url(format!("{}/", server.url()))
        .with_timeout_ms(5_000);
    let client = PubClient::from_config(&config).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_search_sends_query_parameters() {
    let (mut server, client) = setup().await;
    let next = format!("{}/api/search?q=http+client&page=3", server.url());
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "http client".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("sort".into(), "popularity".into()),
        ]))
        .match_header("accept", "application/json")
        .match_header("accept-encoding", Matcher::Regex("gzip".into()))
        .match_header("user-agent", Matcher::Regex(r"^dartpub/\S+ \(Rust ".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "packages": [{ "package": "http" }, { "package": "dio" }],
                "next": next
            })
            .to_string(),
        )
        .create_async()
        .await;

    let query = SearchQuery::text("http client")
        .with_page(2)
        .with_sort(SearchOrder::Popularity);
    let page = client.search().fetch(&query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.packages(), ["http", "dio"]);
    assert!(page.next_page_url().is_some());
}

#[tokio::test]
async fn test_search_without_parameters_hits_bare_endpoint() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"packages": []}"#)
        .create_async()
        .await;

    let value = client.search().execute(&SearchQuery::default()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(value, json!({ "packages": [] }));
}

#[tokio::test]
async fn test_package_fetch() {
    let (mut server, client) = setup().await;
    let body = json!({
        "name": "shelf",
        "latest": {
            "version": "1.4.1",
            "pubspec": {
                "name": "shelf",
                "version": "1.4.1",
                "environment": { "sdk": "^3.0.0" },
                "dependencies": {
                    "async": "^2.5.0",
                    "http_parser": "^4.0.0"
                },
                "dev_dependencies": {
                    "test": "^1.16.0",
                    "shelf_test_handler": { "path": "../shelf_test_handler" }
                }
            },
            "archive_url": "https://pub.dev/api/archives/shelf-1.4.1.tar.gz",
            "published": "2023-05-24T17:43:51.000Z"
        },
        "versions": [
            {
                "version": "1.4.0",
                "pubspec": { "name": "shelf", "version": "1.4.0" },
                "retracted": true
            },
            {
                "version": "1.4.1",
                "pubspec": { "name": "shelf", "version": "1.4.1" }
            }
        ]
    });
    let mock = server
        .mock("GET", "/api/package/shelf")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let info = client.package().fetch("shelf").await.unwrap();

    mock.assert_async().await;
    assert_eq!(info.name(), "shelf");
    let pubspec = info.latest().pubspec();
    assert_eq!(pubspec.dependencies().len(), 2);
    assert_eq!(
        pubspec.dev_dependencies()["shelf_test_handler"].kind(),
        DependencyKind::Path
    );
    let constraint = VersionConstraint::parse("^1.4.0").unwrap();
    assert_eq!(
        info.latest_matching(&constraint)
            .map(|v| v.version().to_string()),
        Some("1.4.1".into())
    );
}

#[tokio::test]
async fn test_documentation_fetch() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/documentation/shelf")
        .with_status(200)
        .with_body(
            json!({
                "name": "shelf",
                "latestStableVersion": "1.4.1",
                "versions": [
                    { "version": "1.4.1", "status": "completed", "hasDocumentation": true },
                    { "version": "1.4.0", "status": "failed", "hasDocumentation": false }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let docs = client.documentation().fetch("shelf").await.unwrap();

    mock.assert_async().await;
    assert_eq!(docs.versions()[1].status(), DocumentationStatus::Failed);
    let url = docs.versions()[0]
        .documentation_url(client.cursor())
        .unwrap();
    assert_eq!(url.path(), "/documentation/shelf/1.4.1");
    assert_eq!(url.host_str(), client.cursor().base_host().host_str());
}

#[tokio::test]
async fn test_not_found_is_response_error() {
    let (mut server, client) = setup().await;
    let mock = server
        .mock("GET", "/api/package/does_not_exist")
        .with_status(404)
        .with_body(r#"{"error": {"code": "NotFound", "message": "Could not find package"}}"#)
        .create_async()
        .await;

    let err = client.package().execute("does_not_exist").await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ApiError::ResponseError { status: 404 }));
    assert!(err.is_remote_error());
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let (mut server, client) = setup().await;
    let location = format!("{}/api/package/new_name", server.url());
    let redirect = server
        .mock("GET", "/api/package/old_name")
        .with_status(301)
        .with_header("location", &location)
        .create_async()
        .await;
    let target = server
        .mock("GET", "/api/package/new_name")
        .with_status(200)
        .with_body(r#"{"name": "new_name"}"#)
        .create_async()
        .await;

    let value = client.package().execute("old_name").await.unwrap();

    redirect.assert_async().await;
    target.assert_async().await;
    assert_eq!(value["name"], "new_name");
}

#[tokio::test]
async fn test_custom_user_agent_is_sent() {
    init_tracing();
    let mut server = Server::new_async().await;
    let config = ClientConfig::default()
        .with_hosted_url(server.url())
        .with_user_agent("mirror-sync/1.0");
    let client = PubClient::from_config(&config).unwrap();
    let mock = server
        .mock("GET", "/api/documentation/http")
        .match_header("user-agent", "mirror-sync/1.0")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    client.documentation().execute("http").await.unwrap();

    mock.assert_async().await;
}
