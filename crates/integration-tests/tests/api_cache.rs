//! Read-through cache behavior of the API client.

use std::time::{SystemTime, UNIX_EPOCH};

use itx_store_client::cache::{CACHE_PREFIX, CacheEntry};
use itx_store_client::transport::Method;
use itx_store_client::{ApiError, KeyValueStore, TransportError};
use itx_store_core::Product;
use itx_store_integration_tests::{product_detail_json, sample_catalog, scripted_client};

fn now_millis() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_millis(),
    )
    .expect("epoch millis fit in u64")
}

#[tokio::test]
async fn first_fetch_hits_network_and_populates_cache() {
    let (client, transport, store) = scripted_client();
    transport.push_json(&sample_catalog());

    let products = client.fetch_product_list().await.expect("list fetch");
    assert_eq!(products.len(), 3);
    assert_eq!(transport.request_count(), 1);

    let request = transport.requests().remove(0);
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, "https://store.test/api/product");

    // The entry landed under the namespaced key with a fresh timestamp.
    let raw = store.get("itx-cache:products").expect("cached entry");
    let entry: CacheEntry<Vec<Product>> = serde_json::from_str(&raw).expect("entry decodes");
    assert_eq!(entry.data, products);
    assert!(now_millis() - entry.ts < 60_000);
}

#[tokio::test]
async fn fresh_cache_entry_avoids_network() {
    let (client, transport, _store) = scripted_client();
    transport.push_json(&sample_catalog());

    let first = client.fetch_product_list().await.expect("first fetch");
    // No response scripted for a second call: a network attempt would fail.
    let second = client.fetch_product_list().await.expect("cached fetch");

    assert_eq!(first, second);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn expired_entry_triggers_exactly_one_refetch_and_overwrite() {
    let (client, transport, store) = scripted_client();

    // Plant an entry written more than one hour ago.
    let stale = CacheEntry {
        ts: now_millis() - 2 * 60 * 60 * 1000,
        data: serde_json::json!([{"id": "old", "brand": "Old", "model": "Phone", "imgUrl": ""}]),
    };
    store
        .set(
            &format!("{CACHE_PREFIX}products"),
            &serde_json::to_string(&stale).expect("encode stale entry"),
        )
        .expect("seed store");

    transport.push_json(&sample_catalog());

    let products = client.fetch_product_list().await.expect("refetch");
    assert_eq!(transport.request_count(), 1);
    assert_eq!(products.len(), 3);

    // The stale entry was overwritten with the new payload and timestamp.
    let raw = store.get("itx-cache:products").expect("cached entry");
    let entry: CacheEntry<Vec<Product>> = serde_json::from_str(&raw).expect("entry decodes");
    assert_eq!(entry.data, products);
    assert!(now_millis() - entry.ts < 60_000);
}

#[tokio::test]
async fn malformed_entry_counts_as_miss() {
    let (client, transport, store) = scripted_client();
    store.set("itx-cache:products", "{definitely not json").expect("seed store");
    transport.push_json(&sample_catalog());

    let products = client.fetch_product_list().await.expect("refetch");
    assert_eq!(products.len(), 3);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn product_cache_is_isolated_per_id() {
    let (client, transport, _store) = scripted_client();
    transport.push_json(&product_detail_json("a", "Apple", "iPhone 14", 900.0));
    transport.push_json(&product_detail_json("b", "Samsung", "Galaxy S23", 850.0));

    let a = client.fetch_product("a").await.expect("fetch a");
    let b = client.fetch_product("b").await.expect("fetch b");
    assert_eq!(a.id, "a");
    assert_eq!(b.id, "b");
    // Caching `product:a` did not satisfy the request for `product:b`.
    assert_eq!(transport.request_count(), 2);

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        ["https://store.test/api/product/a", "https://store.test/api/product/b"]
    );

    // Both are now served from cache independently.
    let a_again = client.fetch_product("a").await.expect("cached a");
    assert_eq!(a_again, a);
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn non_success_status_becomes_request_error() {
    let (client, transport, store) = scripted_client();
    transport.push_response(404, "not found");

    let err = client.fetch_product("missing").await.expect_err("404 fails");
    assert_eq!(err.status(), Some(404));
    // Nothing was cached for the failed fetch.
    assert!(store.is_empty());
}

#[tokio::test]
async fn transport_failure_propagates_unchanged() {
    let (client, transport, _store) = scripted_client();
    transport.push_unreachable("dns failure");

    let err = client.fetch_product_list().await.expect_err("failure propagates");
    assert!(matches!(
        err,
        ApiError::Transport(TransportError::Unreachable(message)) if message == "dns failure"
    ));
}

#[tokio::test]
async fn unparseable_body_is_a_parse_error() {
    let (client, transport, store) = scripted_client();
    transport.push_response(200, "<html>maintenance</html>");

    let err = client.fetch_product_list().await.expect_err("bad body fails");
    assert!(matches!(err, ApiError::Parse(_)));
    assert!(store.is_empty());
}
