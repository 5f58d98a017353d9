//! Integration tests for the gas API and subgraph clients using mockito for
//! HTTP mocking.

use gitcoin_mcp_server::client::subgraph::SubgraphClient;
use gitcoin_mcp_server::domain::Breakdown;
use gitcoin_mcp_server::imports::conviction_voting::{fetch_grants, GRANTS_QUERY};
use gitcoin_mcp_server::{GasApiClient, Metrics, ProviderError};
use mockito::{Matcher, Server};
use serde_json::json;

#[test]
fn test_gas_history() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/history")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("breakdown".into(), "daily".into()),
            Matcher::UrlEncoded("mins".into(), "60".into()),
        ]))
        .match_header("x-api-key", "test-api-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "history": [
                {"gas_price": 12.0, "created_on": "2022-05-01T00:00:00Z"},
                {"gas_price": 30.5, "created_on": "2022-05-02T00:00:00Z"}
            ]
        }"#,
        )
        .create();

    let client = GasApiClient::with_base_url(server.url(), Some("test-api-key".to_string()));
    let history = client.gas_history(Breakdown::Daily, 60).unwrap();

    mock.assert();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].gas_price, 30.5);
}

#[test]
fn test_gas_history_without_api_key() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/history")
        .match_query(Matcher::Any)
        .match_header("x-api-key", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"history": []}"#)
        .create();

    let client = GasApiClient::with_base_url(server.url(), None);
    let history = client.gas_history(Breakdown::Hourly, 1).unwrap();

    mock.assert();
    assert!(history.is_empty());
}

#[test]
fn test_conf_time_spread_anchored() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/conf_time_spread")
        .match_query(Matcher::UrlEncoded("gas_price".into(), "1.5".into()))
        .with_status(200)
        .with_body(r#"{"spread": [{"gas_price": 1.5, "mins": 45.0}]}"#)
        .create();

    let client = GasApiClient::with_base_url(server.url(), None);
    let spread = client.conf_time_spread(Some(1.5)).unwrap();

    mock.assert();
    assert_eq!(spread.len(), 1);
    assert_eq!(spread[0].mins, 45.0);
}

#[test]
fn test_conf_time_spread_unanchored() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/conf_time_spread")
        .with_status(200)
        .with_body(
            r#"{"spread": [{"gas_price": 2.0, "mins": 30.0}, {"gas_price": 40.0, "mins": 1.0}]}"#,
        )
        .create();

    let client = GasApiClient::with_base_url(server.url(), None);
    let spread = client.conf_time_spread(None).unwrap();

    mock.assert();
    assert_eq!(spread.len(), 2);
}

#[test]
fn test_recommended_gas_price() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/recommended")
        .match_query(Matcher::UrlEncoded("confirm_time_minutes".into(), "4".into()))
        .with_status(200)
        .with_body(r#"{"gas_price": 27.3}"#)
        .create();

    let client = GasApiClient::with_base_url(server.url(), None);
    let price = client.recommend_min_gas_price_to_confirm_in_time(4).unwrap();

    mock.assert();
    assert_eq!(price, 27.3);
}

#[test]
fn test_gas_advisories() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/advisories")
        .with_status(200)
        .with_body(r#"{"advisories": [{"title": "Network congested", "body": "Expect delays", "active": true}]}"#)
        .create();

    let client = GasApiClient::with_base_url(server.url(), None);
    let advisories = client.gas_advisories().unwrap();

    mock.assert();
    assert_eq!(advisories.len(), 1);
    assert!(advisories[0].active);
}

#[test]
fn test_convert_amount() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/conversion")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("amount".into(), "1".into()),
            Matcher::UrlEncoded("from".into(), "ETH".into()),
            Matcher::UrlEncoded("to".into(), "USDT".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"amount": 1834.62}"#)
        .create();

    let client = GasApiClient::with_base_url(server.url(), None);
    let amount = client.convert_amount(1.0, "ETH", "USDT").unwrap();

    mock.assert();
    assert_eq!(amount, 1834.62);
}

#[test]
fn test_unauthorized_error() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/advisories")
        .with_status(401)
        .with_body(r#"{"error": "Unauthorized"}"#)
        .create();

    let client = GasApiClient::with_base_url(server.url(), Some("wrong-key".to_string()));
    let result = client.gas_advisories();

    mock.assert();
    assert!(matches!(result, Err(ProviderError::Unauthorized)));
}

#[test]
fn test_rate_limit_error() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/recommended")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body(r#"{"error": "Too many requests"}"#)
        .create();

    let client = GasApiClient::with_base_url(server.url(), None);
    let result = client.recommend_min_gas_price_to_confirm_in_time(4);

    mock.assert();
    assert!(matches!(result, Err(ProviderError::RateLimitExceeded)));
}

#[test]
fn test_generic_api_error() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/gas/history")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Internal Server Error")
        .create();

    let client = GasApiClient::with_base_url(server.url(), None);
    let result = client.gas_history(Breakdown::Weekly, 180);

    mock.assert();
    match result {
        Err(ProviderError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[test]
fn test_requests_are_counted() {
    let mut server = Server::new();

    let _ok = server
        .mock("GET", "/gas/advisories")
        .with_status(200)
        .with_body(r#"{"advisories": []}"#)
        .create();
    let _err = server
        .mock("GET", "/gas/recommended")
        .match_query(Matcher::Any)
        .with_status(500)
        .create();

    let metrics = Metrics::new();
    let client = GasApiClient::with_base_url(server.url(), None).with_metrics(metrics.clone());

    client.gas_advisories().unwrap();
    assert!(client.recommend_min_gas_price_to_confirm_in_time(4).is_err());

    assert_eq!(metrics.http_requests_total(), 2);
    assert_eq!(metrics.http_errors_total(), 1);
}

#[test]
fn test_subgraph_query() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/subgraphs/name/1hive/conviction")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({ "query": GRANTS_QUERY })))
        .with_status(200)
        .with_body(
            r#"{
            "data": {
                "grants": [
                    {"id": "0x1", "votes": [{"id": "v1", "amount": "1000000000000000000", "createdAt": "1653500000"}], "releases": []}
                ]
            }
        }"#,
        )
        .create();

    let client = SubgraphClient::new(format!("{}/subgraphs/name/1hive/conviction", server.url()), 10);
    let grants = fetch_grants(&client).unwrap();

    mock.assert();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].id, "0x1");
    assert_eq!(grants[0].votes[0].amount, "1000000000000000000");
}

#[test]
fn test_subgraph_query_failed() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/graphql")
        .with_status(502)
        .with_body("Bad Gateway")
        .create();

    let client = SubgraphClient::new(format!("{}/graphql", server.url()), 10);
    let result = fetch_grants(&client);

    mock.assert();
    match result {
        Err(ProviderError::QueryFailed { status, query }) => {
            assert_eq!(status, 502);
            assert!(query.contains("getGrants"));
        }
        other => panic!("expected QueryFailed, got {:?}", other),
    }
}

#[test]
fn test_subgraph_malformed_body() {
    let mut server = Server::new();

    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": {"grants": "nope"}}"#)
        .create();

    let client = SubgraphClient::new(format!("{}/graphql", server.url()), 10);
    assert!(matches!(
        fetch_grants(&client),
        Err(ProviderError::JsonError(_))
    ));
}
