//! Cart persistence through the file-backed store.

use itx_store_client::{CART_KEY, CartStore, FileStore, KeyValueStore};
use itx_store_core::CartLineItem;

fn item(id: &str, color: &str) -> CartLineItem {
    CartLineItem {
        id: id.into(),
        brand: "Google".into(),
        model: "Pixel 8".into(),
        price: Some("750".parse().expect("price")),
        img_url: "https://store.test/images/g1.jpg".into(),
        color_name: color.into(),
        storage_name: "128 GB".into(),
    }
}

#[test]
fn cart_round_trips_through_a_fresh_store_instance() {
    let dir = tempfile::tempdir().expect("temp dir");

    {
        let cart = CartStore::new(FileStore::new(dir.path()).expect("open store"));
        cart.add_item(item("g1", "Obsidian"));
        cart.add_item(item("g1", "Porcelain"));
        cart.add_item(item("a1", "Obsidian"));
        cart.remove_item(2);
    }

    // A new process lifetime: fresh CartStore over the same directory.
    let reloaded = CartStore::new(FileStore::new(dir.path()).expect("reopen store"));
    assert_eq!(reloaded.count(), 2);
    assert_eq!(
        reloaded
            .items()
            .iter()
            .map(|item| item.color_name.as_str())
            .collect::<Vec<_>>(),
        ["Obsidian", "Porcelain"]
    );
}

#[test]
fn cart_snapshot_uses_its_own_key() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FileStore::new(dir.path()).expect("open store");

    let cart = CartStore::new(store.clone());
    cart.add_item(item("g1", "Obsidian"));

    // Persisted under `cartItems`, outside the cache namespace.
    let raw = store.get(CART_KEY).expect("persisted snapshot");
    let decoded: Vec<CartLineItem> = serde_json::from_str(&raw).expect("snapshot decodes");
    assert_eq!(decoded, cart.items());
    assert!(store.get("itx-cache:cartItems").is_none());
}

#[test]
fn unreadable_snapshot_resets_to_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FileStore::new(dir.path()).expect("open store");
    store.set(CART_KEY, "not even json").expect("seed");

    let cart = CartStore::new(store);
    assert_eq!(cart.count(), 0);
}
