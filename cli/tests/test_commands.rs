#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use pl_cli::{
        cli::{Cli, Commands},
        commands::{self, open_store, seed::seed_samples},
    };
    use prompt_library_shared::{ContentStore, FsContentStore};
    use serde_json::Value;

    #[test]
    fn defaults_need_no_flags() {
        let cli = Cli::parse_from(["pl-cli", "build-data"]);
        assert_eq!(cli.prompts_dir, std::path::PathBuf::from("prompts"));
        assert!(cli.api_base.is_none());
        let Commands::BuildData {
            output,
        } = cli.command
        else {
            panic!("expected build-data");
        };
        let options = output.publish_options();
        assert_eq!(options.output_dir, std::path::PathBuf::from("public/data"));
        assert_eq!(options.mirror_dirs, vec![std::path::PathBuf::from("out/PromptLibrary/data")]);
        assert_eq!(options.per_page, 9);

        let cli = Cli::parse_from(["pl-cli", "generate-index", "--no-mirror", "--per-page", "0"]);
        let Commands::GenerateIndex {
            output,
        } = cli.command
        else {
            panic!("expected generate-index");
        };
        let options = output.publish_options();
        assert!(options.mirror_dirs.is_empty());
        assert_eq!(options.per_page, 1);
    }

    #[test]
    fn api_base_selects_http_store() {
        assert!(open_store(std::path::Path::new("prompts"), Some("http://localhost:3000")).is_ok());
        assert!(open_store(std::path::Path::new("prompts"), Some("::nope::")).is_err());
    }

    #[tokio::test]
    async fn seed_only_fills_an_empty_library() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsContentStore::new(dir.path().join("prompts"));

        assert_eq!(seed_samples(&store).await.expect("seed"), 3);
        assert_eq!(seed_samples(&store).await.expect("seed again"), 0);

        let records = store.list_all().await.expect("list");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].slug, "effective-learning-sample");
        assert!(records.iter().all(|record| record.is_new));
    }

    #[tokio::test]
    async fn build_data_command_writes_both_targets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prompts = dir.path().join("prompts");
        seed_samples(&FsContentStore::new(&prompts)).await.expect("seed");

        let out = dir.path().join("public");
        let mirror = dir.path().join("mirror");
        let cli = Cli::parse_from([
            "pl-cli".to_string(),
            "--prompts-dir".to_string(),
            prompts.display().to_string(),
            "build-data".to_string(),
            "--output-dir".to_string(),
            out.display().to_string(),
            "--mirror-dir".to_string(),
            mirror.display().to_string(),
            "--per-page".to_string(),
            "2".to_string(),
        ]);
        commands::run(cli).await.expect("build-data");

        for target in [&out, &mirror] {
            let index: Value =
                serde_json::from_str(&fs::read_to_string(target.join("prompts-index.json")).expect("read"))
                    .expect("json");
            assert_eq!(index.as_array().expect("array").len(), 3);
            let meta: Value = serde_json::from_str(
                &fs::read_to_string(target.join("paginated/all-prompts-meta.json")).expect("read"),
            )
            .expect("json");
            assert_eq!(meta["totalPages"], 2);
            assert!(target.join("paginated/all-prompts-page-2.json").exists());
            assert!(target.join("paginated/categories/数据分析/page-1.json").exists());
        }
    }

    #[tokio::test]
    async fn delete_command_tolerates_missing_prompt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prompts = dir.path().join("prompts");
        let cli = Cli::parse_from([
            "pl-cli".to_string(),
            "delete".to_string(),
            "ghost".to_string(),
            "--prompts-dir".to_string(),
            prompts.display().to_string(),
        ]);
        commands::run(cli).await.expect("delete of missing prompt succeeds");
    }
}
