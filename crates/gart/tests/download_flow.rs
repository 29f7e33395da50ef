mod support;

use gart::{
    Asset, AssetFile, AssetType, ClientError, FileStatus, Session, SessionConfig, SitePages,
};
use support::{Route, ScriptedNet};

fn asset(id: &str, files: &[(&str, &str, u64)]) -> Asset {
    Asset {
        id: id.into(),
        kind: AssetType::Music,
        author: None,
        favorites: 0,
        tags: vec![],
        licenses: vec![],
        attribution: None,
        files: files
            .iter()
            .map(|(name, validator, size)| AssetFile {
                name: name.to_string(),
                validator: validator.to_string(),
                size: *size,
            })
            .collect(),
    }
}

fn file_route(body: &str, validator: &str) -> Route {
    Route::File {
        body: body.into(),
        validator: validator.into(),
        size: body.len() as u64,
    }
}

fn test_session(net: ScriptedNet, root: &std::path::Path) -> Session<ScriptedNet, SitePages> {
    Session::with_parts(SessionConfig::default().with_root_dir(root), net, SitePages)
}

#[tokio::test]
async fn first_download_writes_files_and_records_validators() {
    let dir = tempfile::tempdir().unwrap();
    let net = ScriptedNet::new();
    net.route("files/track.ogg", file_route("oggdata", "v-track-1"));
    net.route("files/cover.png", file_route("pngdata", "v-cover-1"));

    let session = test_session(net.clone(), dir.path());
    let target = asset("song", &[("track.ogg", "v-track-1", 7), ("cover.png", "v-cover-1", 7)]);

    let report = session.download(&target).await.unwrap();
    assert_eq!(report.downloaded(), 2);
    assert_eq!(report.cached(), 0);
    assert_eq!(report.failed(), 0);
    assert_eq!(net.bodies_fetched(), 2);

    let written = dir.path().join("content").join("song").join("track.ogg");
    assert_eq!(std::fs::read(written).unwrap(), b"oggdata");
}

#[tokio::test]
async fn unchanged_validators_skip_every_body_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let net = ScriptedNet::new();
    net.route("files/track.ogg", file_route("oggdata", "v1"));

    let target = asset("song", &[("track.ogg", "v1", 7)]);
    test_session(net.clone(), dir.path())
        .download(&target)
        .await
        .unwrap();
    assert_eq!(net.bodies_fetched(), 1);

    // Fresh session, same store: the server confirms the recorded
    // validator and no body crosses the wire.
    let report = test_session(net.clone(), dir.path())
        .download(&target)
        .await
        .unwrap();
    assert!(report.all_cached());
    assert_eq!(net.bodies_fetched(), 1);
}

#[tokio::test]
async fn one_cached_one_new_fetches_exactly_one_body() {
    let dir = tempfile::tempdir().unwrap();
    let net = ScriptedNet::new();
    net.route("files/track.ogg", file_route("oggdata", "v1"));

    // First run seeds the cache with track.ogg only.
    test_session(net.clone(), dir.path())
        .download(&asset("song", &[("track.ogg", "v1", 7)]))
        .await
        .unwrap();
    assert_eq!(net.bodies_fetched(), 1);

    // Second run sees an extra file.
    net.route("files/cover.png", file_route("pngdata", "v2"));
    let report = test_session(net.clone(), dir.path())
        .download(&asset(
            "song",
            &[("track.ogg", "v1", 7), ("cover.png", "v2", 7)],
        ))
        .await
        .unwrap();

    assert_eq!(report.cached(), 1);
    assert_eq!(report.downloaded(), 1);
    assert_eq!(net.bodies_fetched(), 2, "exactly one extra body fetch");
}

#[tokio::test]
async fn changed_validator_refetches_and_updates_record() {
    let dir = tempfile::tempdir().unwrap();
    let net = ScriptedNet::new();
    net.route("files/track.ogg", file_route("old-bytes", "v1"));

    let session = test_session(net.clone(), dir.path());
    session
        .download(&asset("song", &[("track.ogg", "v1", 9)]))
        .await
        .unwrap();

    // Content rotated server-side.
    net.replace("files/track.ogg", file_route("new-bytes", "v2"));
    let report = test_session(net.clone(), dir.path())
        .download(&asset("song", &[("track.ogg", "v2", 9)]))
        .await
        .unwrap();
    assert_eq!(report.downloaded(), 1);
    assert_eq!(net.bodies_fetched(), 2);

    let written = dir.path().join("content").join("song").join("track.ogg");
    assert_eq!(std::fs::read(written).unwrap(), b"new-bytes");

    // And now it is current again.
    let report = test_session(net.clone(), dir.path())
        .download(&asset("song", &[("track.ogg", "v2", 9)]))
        .await
        .unwrap();
    assert!(report.all_cached());
    assert_eq!(net.bodies_fetched(), 2);
}

#[tokio::test]
async fn deleting_the_store_behaves_like_first_download() {
    let dir = tempfile::tempdir().unwrap();
    let net = ScriptedNet::new();
    net.route("files/a.ogg", file_route("aaa", "va"));
    net.route("files/b.ogg", file_route("bbb", "vb"));
    let target = asset("song", &[("a.ogg", "va", 3), ("b.ogg", "vb", 3)]);

    test_session(net.clone(), dir.path())
        .download(&target)
        .await
        .unwrap();
    assert_eq!(net.bodies_fetched(), 2);

    // Documented invalidation: remove the store wholesale.
    std::fs::remove_dir_all(dir.path().join("cache")).unwrap();

    let report = test_session(net.clone(), dir.path())
        .download(&target)
        .await
        .unwrap();
    assert_eq!(report.downloaded(), 2);
    assert_eq!(net.bodies_fetched(), 4, "full refetch after invalidation");
}

#[tokio::test]
async fn one_failure_does_not_abort_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let net = ScriptedNet::new();
    net.route("files/good.ogg", file_route("fine", "v1"));
    net.route("files/bad.ogg", Route::Status(500));

    let mut report = test_session(net.clone(), dir.path())
        .download(&asset("song", &[("good.ogg", "v1", 4), ("bad.ogg", "vX", 4)]))
        .await
        .unwrap();

    report.sort_by_filename();
    assert_eq!(report.downloaded(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.outcomes[0].filename, "bad.ogg");
    match &report.outcomes[0].status {
        FileStatus::Failed { reason } => {
            assert!(reason.to_string().contains("bad.ogg"), "failure names the file")
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn all_files_failing_fails_the_call() {
    let dir = tempfile::tempdir().unwrap();
    let net = ScriptedNet::new();
    net.route("files/", Route::Status(500));

    let err = test_session(net.clone(), dir.path())
        .download(&asset("song", &[("a.ogg", "v", 1), ("b.ogg", "v", 1)]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::AllFilesFailed { failed: 2, .. }
    ));
}

#[tokio::test]
async fn failed_file_is_not_marked_known_good() {
    let dir = tempfile::tempdir().unwrap();
    let net = ScriptedNet::new();
    net.route("files/a.ogg", Route::Status(500));

    let target = asset("song", &[("a.ogg", "v1", 1)]);
    let _ = test_session(net.clone(), dir.path()).download(&target).await;

    // Server recovers; the next run must fetch the body, proving no cache
    // record was written for the failed attempt.
    net.replace("files/a.ogg", file_route("bytes", "v1"));
    let report = test_session(net.clone(), dir.path())
        .download(&target)
        .await
        .unwrap();
    assert_eq!(report.downloaded(), 1);
}

#[tokio::test]
async fn empty_file_list_is_an_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let session = test_session(ScriptedNet::new(), dir.path());
    let report = session.download(&asset("bare", &[])).await.unwrap();
    assert!(report.outcomes.is_empty());
    assert!(!report.all_cached());
}
