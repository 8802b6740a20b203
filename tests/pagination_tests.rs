//! Integration tests for paging through a list.
//!
//! The mock server serves six applicants two at a time, with `Link` and
//! `X-Total-Count` headers shaped like the live API's.

use onfido::rest::Pagination;
use onfido::{ApiToken, Context, OnfidoClient, OnfidoConfig, PageDetails};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOTAL: u32 = 6;
const PER_PAGE: u32 = 2;
const LAST_PAGE: u32 = TOTAL / PER_PAGE;

fn link(base: &str, page: u32, rel: &str) -> String {
    format!("<{base}/v3.6/applicants?page={page}&per_page={PER_PAGE}>; rel=\"{rel}\"")
}

fn link_header(base: &str, page: u32) -> String {
    let mut links = Vec::new();
    if page > 1 {
        links.push(link(base, 1, "first"));
        links.push(link(base, page - 1, "prev"));
    }
    if page < LAST_PAGE {
        links.push(link(base, page + 1, "next"));
        links.push(link(base, LAST_PAGE, "last"));
    }
    links.join(", ")
}

async fn mount_pages(server: &MockServer) {
    for page in 1..=LAST_PAGE {
        let first_id = (page - 1) * PER_PAGE + 1;
        let applicants: Vec<_> = (first_id..first_id + PER_PAGE)
            .map(|n| json!({"id": format!("applicant-{n}")}))
            .collect();

        Mock::given(method("GET"))
            .and(path("/v3.6/applicants"))
            .and(query_param("page", page.to_string().as_str()))
            .and(query_param("per_page", PER_PAGE.to_string().as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", TOTAL.to_string().as_str())
                    .insert_header("Link", link_header(&server.uri(), page).as_str())
                    .set_body_json(json!({ "applicants": applicants })),
            )
            .mount(server)
            .await;
    }
}

fn client_for(server: &MockServer) -> OnfidoClient {
    let config = OnfidoConfig::builder()
        .api_token(ApiToken::new("test-token").unwrap())
        .base_url(server.uri())
        .build()
        .unwrap();
    OnfidoClient::new(config).unwrap()
}

async fn fetch_page(client: &OnfidoClient, page: u32) -> (Vec<String>, PageDetails) {
    let list = client
        .list_applicants(
            &Context::background(),
            &[Pagination::Page(page).into(), Pagination::Limit(PER_PAGE).into()],
        )
        .await
        .unwrap();
    let (items, details) = list.into_parts();
    (items.into_iter().map(|a| a.id).collect(), details)
}

#[tokio::test]
async fn test_first_page() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let client = client_for(&server);

    let (ids, details) = fetch_page(&client, 1).await;

    assert_eq!(ids, vec!["applicant-1", "applicant-2"]);
    assert_eq!(
        details,
        PageDetails {
            total: Some(6),
            limit: Some(2),
            first_page: None,
            last_page: Some(3),
            next_page: Some(2),
            prev_page: None,
        }
    );
}

#[tokio::test]
async fn test_middle_page() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let client = client_for(&server);

    let (ids, details) = fetch_page(&client, 2).await;

    assert_eq!(ids, vec!["applicant-3", "applicant-4"]);
    assert_eq!(details.first_page, Some(1));
    assert_eq!(details.prev_page, Some(1));
    assert_eq!(details.next_page, Some(3));
    assert_eq!(details.last_page, Some(3));
}

#[tokio::test]
async fn test_final_page() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let client = client_for(&server);

    let (ids, details) = fetch_page(&client, 3).await;

    assert_eq!(ids, vec!["applicant-5", "applicant-6"]);
    assert_eq!(details.first_page, Some(1));
    assert_eq!(details.prev_page, Some(2));
    assert_eq!(details.next_page, None);
    assert_eq!(details.last_page, None);
}

#[tokio::test]
async fn test_walking_next_links_visits_every_item() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let client = client_for(&server);

    let mut seen = Vec::new();
    let mut page = Some(1);
    while let Some(current) = page {
        let (ids, details) = fetch_page(&client, current).await;
        seen.extend(ids);
        page = details.next_page;
    }

    assert_eq!(seen.len(), TOTAL as usize);
}

#[tokio::test]
async fn test_unpaginated_response_has_empty_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v3.6/applicants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"applicants": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let list = client
        .list_applicants(&Context::background(), &[])
        .await
        .unwrap();

    assert!(list.is_empty());
    assert_eq!(*list.page(), PageDetails::default());
}
