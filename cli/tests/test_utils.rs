#[cfg(test)]
mod tests {
    use std::{fs, io::Read};

    use flate2::read::GzDecoder;
    use pl_cli::utils;
    use serde_json::{json, Value};

    #[test]
    fn strip_sidecar_keys_keeps_everything_else() {
        let mut value = json!({
            "featured": true,
            "rating": 8,
            "createdAt": "2024-01-01",
            "views": 10,
            "likes": 2,
            "usageCount": 3,
            "favoriteCount": 1,
            "slug": "old-slug",
            "custom": {"nested": true}
        });
        assert!(utils::strip_sidecar_keys(&mut value));
        assert_eq!(
            value,
            json!({
                "featured": true,
                "rating": 8,
                "createdAt": "2024-01-01",
                "custom": {"nested": true}
            })
        );
        assert!(!utils::strip_sidecar_keys(&mut value));
    }

    #[test]
    fn update_json_files_counts_failures_without_aborting() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("a.json"), r#"{"featured": false, "views": 4}"#).expect("write");
        fs::write(dir.path().join("b.json"), r#"{"likes": 1, "slug": "b"}"#).expect("write");
        fs::write(dir.path().join("broken.json"), "{ nope").expect("write");
        fs::write(dir.path().join("a.md"), "# not json").expect("write");

        let summary = utils::update_json_files(dir.path()).expect("update");
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let a: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("a.json")).expect("read"))
                .expect("json");
        assert_eq!(a, json!({"featured": false}));
        let b = fs::read_to_string(dir.path().join("b.json")).expect("read");
        assert_eq!(b.trim(), "{}");
        assert_eq!(fs::read_to_string(dir.path().join("broken.json")).expect("read"), "{ nope");
    }

    #[test]
    fn update_json_file_keeps_remaining_key_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ordered.json");
        fs::write(
            &path,
            r#"{"updatedAt": "2024-02-02", "views": 9, "featured": true, "createdAt": "2024-01-01", "likes": 1, "rating": 5}"#,
        )
        .expect("write");

        utils::update_json_file(&path).expect("update");
        let raw = fs::read_to_string(&path).expect("read");
        let positions = ["updatedAt", "featured", "createdAt", "rating"]
            .map(|key| raw.find(&format!("\"{key}\"")).expect("key kept"));
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{raw}");
        assert!(!raw.contains("views") && !raw.contains("likes"));
    }

    #[test]
    fn update_json_files_requires_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(utils::update_json_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn minify_strips_comments_and_whitespace() {
        let minifier = utils::HtmlMinifier::new().expect("regexes compile");
        let html = "<html>\n  <!-- build info -->\n  <body>\n    <p>Hello   world</p>\n  \
                    </body>\n  <!--[if IE]><p>old</p><![endif]-->\n</html>";
        let minified = minifier.minify(html);
        assert!(!minified.contains("build info"));
        assert!(minified.contains("<!--[if IE]>"));
        assert!(minified.contains("<p>Hello world</p>"));
        assert!(minified.contains("<html><body>"));
    }

    #[test]
    fn optimize_build_writes_gzip_siblings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("PromptLibrary");
        fs::create_dir_all(&nested).expect("mkdir");
        fs::write(nested.join("index.html"), "<div>\n   <span>x</span>\n</div>").expect("write");
        fs::write(dir.path().join("app.js"), "console.log(1);").expect("write");
        fs::write(dir.path().join("site.css"), "body {}").expect("write");
        fs::write(dir.path().join("logo.svg"), "<svg/>").expect("write");

        let summary = utils::optimize_build(dir.path()).expect("optimize");
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 0);

        let html = fs::read_to_string(nested.join("index.html")).expect("read");
        assert_eq!(html, "<div><span>x</span></div>");

        let mut decoded = String::new();
        GzDecoder::new(fs::File::open(nested.join("index.html.gz")).expect("open gz"))
            .read_to_string(&mut decoded)
            .expect("decode");
        assert_eq!(decoded, html);
        assert!(dir.path().join("app.js.gz").exists());
        assert!(dir.path().join("site.css.gz").exists());
        assert!(!dir.path().join("logo.svg.gz").exists());
        assert_eq!(fs::read_to_string(dir.path().join("app.js")).expect("read"), "console.log(1);");
    }

    #[test]
    fn optimize_build_fails_on_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = utils::optimize_build(&dir.path().join("out")).expect_err("missing dir");
        assert!(err.to_string().contains("does not exist"));
    }
}
