//! # Integration Tests
//!
//! End-to-end tests composing the library crates the way the orchestrator
//! does: parse -> group -> decode -> materialize -> dispatch, against a mock
//! HTTP endpoint.

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // Verify the contracts crate surface
        let _ = contracts::DispatchResult::success("https://x/a.txt", "status 200");
    }
}

#[cfg(test)]
mod e2e_tests {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use contracts::{DispatchConfig, ShardRecord, StagedFile};
    use dispatcher::create_http_dispatcher;
    use tempfile::tempdir;

    fn record(destination: &str, position: u32, total_count: u32, content: &[u8]) -> ShardRecord {
        ShardRecord {
            destination: destination.into(),
            position,
            total_count,
            payload: STANDARD.encode(content),
        }
    }

    fn dispatch_config() -> DispatchConfig {
        DispatchConfig {
            timeout_secs: 5,
            max_in_flight: 2,
        }
    }

    /// Stage every group, splitting destinations that fail before dispatch.
    fn stage_all(
        materializer: &assembly::Materializer,
        records: Vec<ShardRecord>,
    ) -> (Vec<StagedFile>, Vec<(String, contracts::RelayError)>) {
        let mut staged = Vec::new();
        let mut skipped = Vec::new();

        for group in assembly::group_by_destination(records) {
            let destination = group.destination.clone();
            let outcome = ingestion::decode_group(group)
                .and_then(|shards| materializer.materialize(&destination, &shards));
            match outcome {
                Ok(file) => staged.push(file),
                Err(e) => skipped.push((destination, e)),
            }
        }

        (staged, skipped)
    }

    /// End-to-end: out-of-order shards for two destinations, one endpoint
    /// accepting and one failing, reconstructed and dispatched with
    /// per-destination isolation.
    #[tokio::test]
    async fn test_e2e_reassembly_and_dispatch() {
        let mut server = mockito::Server::new_async().await;
        let ok_mock = server
            .mock("PUT", "/alpha.bin")
            .match_body("first-second-third")
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("PUT", "/beta.bin")
            .with_status(500)
            .with_body("storage offline")
            .create_async()
            .await;

        let alpha = format!("{}/alpha.bin", server.url());
        let beta = format!("{}/beta.bin", server.url());

        // Shards arrive interleaved and out of order
        let records = vec![
            record(&alpha, 2, 3, b"third"),
            record(&beta, 0, 2, b"beta-"),
            record(&alpha, 0, 3, b"first-"),
            record(&beta, 1, 2, b"data"),
            record(&alpha, 1, 3, b"second-"),
        ];

        let dir = tempdir().unwrap();
        let materializer = assembly::Materializer::new(dir.path()).unwrap();
        let (staged, skipped) = stage_all(&materializer, records);

        assert_eq!(staged.len(), 2);
        assert!(skipped.is_empty());
        assert_eq!(
            std::fs::read(&staged[0].local_path).unwrap(),
            b"first-second-third"
        );
        assert_eq!(std::fs::read(&staged[1].local_path).unwrap(), b"beta-data");

        let relay_dispatcher = create_http_dispatcher(&dispatch_config()).unwrap();
        let results = relay_dispatcher.dispatch_all(staged).await;

        assert_eq!(results.len(), 2);
        assert!(results[0].succeeded, "alpha should succeed: {:?}", results);
        assert!(!results[1].succeeded, "beta should fail: {:?}", results);
        assert!(results[1].detail.contains("status 500"));
        assert!(results[1].detail.contains("storage offline"));

        ok_mock.assert_async().await;

        // Staged files are left in place after dispatch
        assert!(dir.path().join("alpha.bin").exists());
        assert!(dir.path().join("beta.bin").exists());
    }

    /// Two shards of a.txt delivered in reverse order reassemble to
    /// "hello world!" and PUT to the endpoint.
    #[tokio::test]
    async fn test_e2e_hello_world_scenario() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/a.txt")
            .match_body("hello world!")
            .with_status(200)
            .create_async()
            .await;

        let destination = format!("{}/a.txt", server.url());
        let batch = format!(
            r#"[
                {{"destination":"{destination}","position":1,"totalCount":2,"payload":"d29ybGQh"}},
                {{"destination":"{destination}","position":0,"totalCount":2,"payload":"aGVsbG8g"}}
            ]"#
        );

        let records = ingestion::parse_batch(&batch).unwrap();
        let dir = tempdir().unwrap();
        let materializer = assembly::Materializer::new(dir.path()).unwrap();
        let (staged, skipped) = stage_all(&materializer, records);

        assert!(skipped.is_empty());
        assert_eq!(std::fs::read(&staged[0].local_path).unwrap(), b"hello world!");

        let relay_dispatcher = create_http_dispatcher(&dispatch_config()).unwrap();
        let results = relay_dispatcher.dispatch_all(staged).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].succeeded);
        mock.assert_async().await;
    }

    /// A destination with no derivable filename is skipped; the valid
    /// sibling is still staged and dispatched.
    #[tokio::test]
    async fn test_e2e_partial_batch_isolation() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/good.txt")
            .with_status(200)
            .create_async()
            .await;

        let good = format!("{}/good.txt", server.url());
        let records = vec![
            record("https://example.com/", 0, 1, b"orphaned"),
            record(&good, 0, 1, b"content"),
        ];

        let dir = tempdir().unwrap();
        let materializer = assembly::Materializer::new(dir.path()).unwrap();
        let (staged, skipped) = stage_all(&materializer, records);

        assert_eq!(staged.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "https://example.com/");
        assert!(matches!(
            skipped[0].1,
            contracts::RelayError::PathParse { .. }
        ));

        let relay_dispatcher = create_http_dispatcher(&dispatch_config()).unwrap();
        let results = relay_dispatcher.dispatch_all(staged).await;
        assert_eq!(results.len(), 1);
        assert!(results[0].succeeded);
    }

    /// A malformed payload fails only its own destination.
    #[tokio::test]
    async fn test_e2e_decode_failure_is_destination_local() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/ok.txt")
            .with_status(200)
            .create_async()
            .await;

        let ok = format!("{}/ok.txt", server.url());
        let mut bad = record("https://x/bad.txt", 0, 1, b"ignored");
        bad.payload = "%%%not-base64%%%".to_string();

        let dir = tempdir().unwrap();
        let materializer = assembly::Materializer::new(dir.path()).unwrap();
        let (staged, skipped) = stage_all(&materializer, vec![bad, record(&ok, 0, 1, b"fine")]);

        assert_eq!(staged.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert!(matches!(skipped[0].1, contracts::RelayError::Decode { .. }));

        let relay_dispatcher = create_http_dispatcher(&dispatch_config()).unwrap();
        let results = relay_dispatcher.dispatch_all(staged).await;
        assert!(results[0].succeeded);
    }

    /// The staging root from a loaded config file drives materialization.
    #[tokio::test]
    async fn test_e2e_config_driven_staging() {
        let dir = tempdir().unwrap();
        let staging_root = dir.path().join("staged");
        let content = format!(
            "[staging]\nroot = \"{}\"\n\n[dispatch]\ntimeout_secs = 5\nmax_in_flight = 1\n",
            staging_root.display()
        );
        let config_path = dir.path().join("relay.toml");
        std::fs::write(&config_path, content).unwrap();

        let relay = config_loader::ConfigLoader::load_from_path(&config_path).unwrap();
        assert_eq!(relay.dispatch.max_in_flight, 1);

        let materializer = assembly::Materializer::new(&relay.staging.root).unwrap();
        let (staged, skipped) = stage_all(
            &materializer,
            vec![record("https://x/from-config.txt", 0, 1, b"configured")],
        );

        assert!(skipped.is_empty());
        assert_eq!(staged[0].local_path, staging_root.join("from-config.txt"));
        assert_eq!(std::fs::read(&staged[0].local_path).unwrap(), b"configured");
    }

    /// Re-delivery of a destination overwrites the previous staging run;
    /// the endpoint receives only the second content.
    #[tokio::test]
    async fn test_e2e_redelivery_replaces_staged_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/again.txt")
            .match_body("take two")
            .with_status(200)
            .create_async()
            .await;

        let destination = format!("{}/again.txt", server.url());
        let dir = tempdir().unwrap();
        let materializer = assembly::Materializer::new(dir.path()).unwrap();

        let (_first, _) = stage_all(
            &materializer,
            vec![record(&destination, 0, 1, b"take one, much longer content")],
        );
        let (second, _) = stage_all(&materializer, vec![record(&destination, 0, 1, b"take two")]);

        let relay_dispatcher = create_http_dispatcher(&dispatch_config()).unwrap();
        let results = relay_dispatcher.dispatch_all(second).await;

        assert!(results[0].succeeded);
        mock.assert_async().await;
    }
}
