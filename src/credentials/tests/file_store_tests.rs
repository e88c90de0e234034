//! Unit tests for the file-backed key-value store.

use camino::Utf8PathBuf;

use crate::credentials::{
    adapters::FileKeyValueStore,
    ports::{KeyValueStore, KeyValueStoreError},
};
use rstest::{fixture, rstest};

#[fixture]
fn store_dir() -> Utf8PathBuf {
    let base = Utf8PathBuf::try_from(std::env::temp_dir()).expect("temp dir must be UTF-8");
    base.join(format!("supabridge_store_{}", uuid::Uuid::new_v4()))
        .join("nested")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn values_persist_across_handles(store_dir: Utf8PathBuf) {
    let first = FileKeyValueStore::open(&store_dir).expect("open store");
    first
        .set("supabase.connection", "{\"a\":1}")
        .await
        .expect("write");

    let second = FileKeyValueStore::open(&store_dir).expect("reopen store");
    let value = second.get("supabase.connection").await.expect("read");

    assert_eq!(value.as_deref(), Some("{\"a\":1}"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_keys_read_as_none_and_remove_cleanly(store_dir: Utf8PathBuf) {
    let store = FileKeyValueStore::open(&store_dir).expect("open store");

    assert!(store.get("absent").await.expect("read").is_none());
    store.remove("absent").await.expect("remove missing");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_deletes_stored_value(store_dir: Utf8PathBuf) {
    let store = FileKeyValueStore::open(&store_dir).expect("open store");
    store.set("token", "value").await.expect("write");

    store.remove("token").await.expect("remove");

    assert!(store.get("token").await.expect("read").is_none());
}

#[rstest]
#[case("../escape")]
#[case(".hidden")]
#[case("")]
#[case("a/b")]
#[tokio::test(flavor = "multi_thread")]
async fn unsafe_keys_are_rejected(store_dir: Utf8PathBuf, #[case] key: &str) {
    let store = FileKeyValueStore::open(&store_dir).expect("open store");

    let result = store.set(key, "value").await;

    assert!(matches!(result, Err(KeyValueStoreError::InvalidKey(_))));
}
