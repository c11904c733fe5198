use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

use credential_store::cli::{self, Prompter};
use credential_store::config::{AppConfig, StoreBackend};
use credential_store::hashing::MIN_COST;
use credential_store::{
    AttributeChanges, Attributes, BcryptHasher, CredentialStore, JsonFileClient, UserError,
};

// Helper to build a store over a JSON data directory
async fn open_store(dir: &TempDir) -> CredentialStore {
    let mut store = CredentialStore::new(
        Arc::new(JsonFileClient::new(dir.path())),
        Arc::new(BcryptHasher::new(MIN_COST).unwrap()),
    );
    store.initialize("users").await.unwrap();
    store
}

// Helper to build a config pointing at a scratch directory
fn test_config(dir: &TempDir) -> AppConfig {
    AppConfig {
        backend: StoreBackend::Json,
        data_dir: dir.path().to_string_lossy().to_string(),
        collection: "users".to_string(),
        hash_cost: MIN_COST,
        login_page: None,
    }
}

// Helper to run one CLI invocation with scripted input
async fn run_cli(config: &AppConfig, flag: &str, input: &str) -> Result<String, String> {
    let args = vec![flag.to_string()];
    let mut prompter = Prompter::new(input.as_bytes(), Vec::new());
    cli::run(&args, config, &mut prompter)
        .await
        .map_err(|e| e.to_string())?;
    Ok(String::from_utf8(prompter.writer().clone()).unwrap())
}

#[tokio::test]
async fn test_user_lifecycle_persists_across_reopen() {
    let tmp_dir = TempDir::new().unwrap();

    {
        let store = open_store(&tmp_dir).await;
        let extra = json!({"display_name": "Alice", "is_active": true});
        let extra: Attributes = extra.as_object().cloned().unwrap();
        assert!(store.create_user("alice", "secret", extra).await.unwrap());

        let changes = AttributeChanges::new()
            .set("email", "alice@example.com")
            .delete("is_active");
        assert!(store.update_user("alice", &changes).await.unwrap());
    }

    let store = open_store(&tmp_dir).await;
    let user = store.get_user(Some("alice"), None).await.unwrap().unwrap();
    assert_eq!(user.attribute("display_name"), Some(&json!("Alice")));
    assert_eq!(user.attribute("email"), Some(&json!("alice@example.com")));
    assert!(!user.has_field("is_active"));
    assert!(store.authenticate("alice", "secret").await.unwrap());

    let raw = std::fs::read_to_string(tmp_dir.path().join("users.json")).unwrap();
    assert!(!raw.contains("\"secret\""));
}

#[tokio::test]
async fn test_delete_then_lookup_by_id() {
    let tmp_dir = TempDir::new().unwrap();
    let store = open_store(&tmp_dir).await;
    store.create_user("alice", "secret", Attributes::new()).await.unwrap();
    let alice = store.get_user(Some("alice"), None).await.unwrap().unwrap();

    let deleted = store.delete_user(None, Some(&alice.id)).await.unwrap();
    assert_eq!(deleted.as_ref(), Some(&alice));
    assert!(store.get_user(None, Some(&alice.id)).await.unwrap().is_none());
    assert!(!store.authenticate("alice", "secret").await.unwrap());
}

#[tokio::test]
async fn test_uninitialized_store_fails() {
    let tmp_dir = TempDir::new().unwrap();
    let store = CredentialStore::new(
        Arc::new(JsonFileClient::new(tmp_dir.path())),
        Arc::new(BcryptHasher::new(MIN_COST).unwrap()),
    );
    assert!(matches!(
        store.get_users().await,
        Err(UserError::Uninitialized)
    ));
}

#[tokio::test]
async fn test_cli_create_list_update_delete() {
    let tmp_dir = TempDir::new().unwrap();
    let config = test_config(&tmp_dir);

    run_cli(&config, "--createuser", "joe\nJoe Smith\njoe@example.com\nsecret\n")
        .await
        .unwrap();
    // A second create with the same name leaves the first record alone
    run_cli(&config, "--createuser", "joe\nImpostor\n\nother\n")
        .await
        .unwrap();

    let listing = run_cli(&config, "--listusers", "").await.unwrap();
    assert_eq!(listing.lines().count(), 1);
    assert!(listing.contains("\"realname\":\"Joe Smith\""));

    run_cli(&config, "--updateuser", "joe\nJoseph Smith\n\n\n")
        .await
        .unwrap();
    let listing = run_cli(&config, "--listusers", "").await.unwrap();
    assert!(listing.contains("\"realname\":\"Joseph Smith\""));
    assert!(listing.contains("\"email\":\"joe@example.com\""));

    let auth = run_cli(&config, "--authenticate", "joe\nsecret\n").await.unwrap();
    assert!(auth.ends_with("authenticated\n"));

    let deleted = run_cli(&config, "--deleteuser", "joe\n").await.unwrap();
    assert!(deleted.contains("\"username\":\"joe\""));
    let listing = run_cli(&config, "--listusers", "").await.unwrap();
    assert!(listing.is_empty());
}

#[tokio::test]
async fn test_cli_usage_and_login_page() {
    let tmp_dir = TempDir::new().unwrap();
    let mut config = test_config(&tmp_dir);

    let usage = run_cli(&config, "--help", "").await.unwrap();
    assert!(usage.contains("--createuser"));
    // Usage never touches the data directory
    assert!(!tmp_dir.path().join("users.json").exists());

    let page = tmp_dir.path().join("login.html");
    std::fs::write(&page, "<form>custom</form>").unwrap();
    config.login_page = Some(page.to_string_lossy().to_string());
    let html = run_cli(&config, "--loginpage", "").await.unwrap();
    assert!(html.contains("<form>custom</form>"));

    config.login_page = Some(tmp_dir.path().join("gone.html").to_string_lossy().to_string());
    let err = run_cli(&config, "--loginpage", "").await.unwrap_err();
    assert!(err.contains("Login page not found"));
}
