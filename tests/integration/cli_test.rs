//! Integration tests for the command-line front end.

mod helpers;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use docvault_cli::{Cli, snapshot};
use docvault_core::config::AppConfig;
use docvault_core::error::ErrorKind;
use docvault_core::result::AppResult;
use docvault_storage::providers::InMemoryDocumentApi;

use helpers::{Ids, sample_forest};

struct CliEnv {
    dir: tempfile::TempDir,
    api: Arc<InMemoryDocumentApi>,
    ids: Ids,
    config: AppConfig,
}

impl CliEnv {
    async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let (forest, ids) = sample_forest();
        snapshot::save(&dir.path().join("forest.json"), &forest)
            .await
            .expect("seed snapshot");
        Self {
            dir,
            api: Arc::new(InMemoryDocumentApi::with_forest(forest)),
            ids,
            config: AppConfig::default(),
        }
    }

    fn forest_path(&self) -> std::path::PathBuf {
        self.dir.path().join("forest.json")
    }

    async fn run(&self, args: &[&str]) -> AppResult<()> {
        let forest = self.forest_path();
        let mut argv = vec!["docvault", "--forest", forest.to_str().expect("utf8")];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).expect("arguments parse");
        cli.execute(&self.config, self.api.clone()).await
    }

    async fn folder_names(&self, path: &Path) -> Vec<String> {
        snapshot::load(path)
            .await
            .expect("load")
            .iter()
            .flat_map(|archive| archive.child_folders.iter().map(|f| f.name.clone()))
            .collect()
    }
}

#[tokio::test]
async fn test_mkdir_writes_snapshot_back() {
    let env = CliEnv::new().await;
    let a2 = env.ids.a2().to_string();

    env.run(&["mkdir", &a2, "Reports"]).await.expect("mkdir");

    let names = env.folder_names(&env.forest_path()).await;
    assert_eq!(names, vec!["Docs", "Invoices", "Misc", "Reports"]);
}

#[tokio::test]
async fn test_delete_with_yes_drops_node_from_snapshot() {
    let env = CliEnv::new().await;
    let f1 = env.ids.f1().to_string();

    env.run(&["delete", &f1, "--yes"]).await.expect("delete");

    let names = env.folder_names(&env.forest_path()).await;
    assert_eq!(names, vec!["Invoices", "Misc"]);
    assert_eq!(env.api.snapshot().await[0].child_folders.len(), 1);
}

#[tokio::test]
async fn test_rejected_move_leaves_snapshot_alone() {
    let env = CliEnv::new().await;
    let before = snapshot::load(&env.forest_path()).await.expect("load");
    let f1 = env.ids.f1().to_string();
    let f2 = env.ids.f2().to_string();

    let err = env.run(&["move", &f1, &f2]).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(snapshot::load(&env.forest_path()).await.expect("load"), before);
    assert_eq!(env.api.call_count(), 0);
}

#[tokio::test]
async fn test_copy_and_picker_view() {
    let env = CliEnv::new().await;
    let f1 = env.ids.f1().to_string();
    let a1 = env.ids.a1().to_string();

    env.run(&["--format", "json", "tree", "--picker", &f1, "--mode", "copy"])
        .await
        .expect("picker");
    env.run(&["copy", &f1, &a1]).await.expect("copy");

    let names = env.folder_names(&env.forest_path()).await;
    assert_eq!(names, vec!["Docs", "Invoices", "Docs - copy", "Misc"]);
}

#[tokio::test]
async fn test_upload_reads_files_from_disk() {
    let env = CliEnv::new().await;
    let file = env.dir.path().join("invoice.pdf");
    tokio::fs::write(&file, b"%PDF-1.7").await.expect("write");
    let invoices = env.ids.invoices().to_string();

    env.run(&["upload", &invoices, file.to_str().expect("utf8")])
        .await
        .expect("upload");

    assert_eq!(
        env.api.stored_files(env.ids.a1, Some(env.ids.invoices)),
        vec!["invoice.pdf"]
    );
}

#[tokio::test]
async fn test_missing_snapshot_is_not_found() {
    let env = CliEnv::new().await;
    tokio::fs::remove_file(env.forest_path()).await.expect("remove");

    let err = env.run(&["tree"]).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[test]
fn test_malformed_node_id_is_a_usage_error() {
    let result = Cli::try_parse_from(["docvault", "actions", "drawer:42"]);
    assert!(result.is_err());
}
