use std::path::Path;
use std::sync::Arc;

use jarcheck_core::{TestRecord, TestStatus};
use jarcheck_runner::{Config, Harness};
use jarcheck_storage::{InMemoryStore, JsonFileStore, SnapshotStore};
use jarcheck_workspace::ScriptFlavor;
use tempfile::{tempdir, TempDir};

fn config() -> Config {
    let mut cfg = Config::default();
    cfg.launch.script = Some(ScriptFlavor::Batch);
    cfg
}

fn fixture(jars: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    let jar_dir = dir.path().join("jars");
    std::fs::create_dir_all(&jar_dir).unwrap();
    for name in jars {
        std::fs::write(jar_dir.join(name), b"PK").unwrap();
    }
    dir
}

fn harness(dir: &Path) -> Harness {
    Harness::open(dir.to_path_buf(), config()).0
}

fn last_line(h: &Harness) -> String {
    h.feedback().last().unwrap_or_default().to_string()
}

#[test]
fn load_jars_builds_pending_registry_and_overwrites_snapshot() {
    let dir = fixture(&["b.jar", "a.jar", "c.txt"]);
    let snapshot = dir.path().join("output.json");
    JsonFileStore::new(&snapshot)
        .save(&[TestRecord { artifact_name: "old.jar".into(), status: TestStatus::Pass, notes: "x".into() }])
        .unwrap();

    let mut h = harness(dir.path());
    assert!(h.load_jars());

    let names: Vec<_> = h.registry().records().iter().map(|r| r.artifact_name.clone()).collect();
    assert_eq!(names, ["a.jar", "b.jar"]);
    assert!(h.registry().records().iter().all(|r| r.status == TestStatus::Pending && r.notes.is_empty()));

    let saved = JsonFileStore::new(&snapshot).load().unwrap();
    assert_eq!(saved, h.registry().records());
}

#[test]
fn verdict_without_active_test_is_reported() {
    let dir = fixture(&["a.jar"]);
    let mut h = harness(dir.path());
    h.load_jars();
    let before = h.registry().clone();

    assert!(!h.update_status(TestStatus::Pass, "fine"));
    assert!(last_line(&h).starts_with("Error:"), "{}", last_line(&h));
    assert_eq!(h.registry(), &before);

    assert!(!h.record_verdict(5, TestStatus::Fail, "nope"));
    assert!(last_line(&h).contains("out of range"));
    assert_eq!(h.registry(), &before);
}

#[test]
fn verdict_persists_full_snapshot() {
    let dir = fixture(&["a.jar", "b.jar"]);
    let store = Arc::new(InMemoryStore::new());
    let (mut h, _events) = Harness::with_store(dir.path().to_path_buf(), config(), Box::new(Arc::clone(&store)));
    assert!(h.load_jars());
    assert_eq!(store.save_count(), 1);
    assert!(h.start_test());
    assert_eq!(store.save_count(), 1);

    assert!(h.update_status(TestStatus::Fail, "crashed on boot"));
    assert_eq!(store.save_count(), 2);
    assert_eq!(store.load().unwrap(), h.registry().records());
    assert_eq!(h.progress().percent, 50);
    assert_eq!(h.registry().records()[0].notes, "crashed on boot");

    // a rejected verdict writes nothing
    assert!(!h.record_verdict(9, TestStatus::Pass, ""));
    assert_eq!(store.save_count(), 2);
}

#[test]
fn start_test_stages_first_artifact() {
    let dir = fixture(&["a.jar", "b.jar"]);
    std::fs::create_dir_all(dir.path().join("configs/plugins")).unwrap();
    std::fs::write(dir.path().join("configs/plugins/x.yml"), "k: v").unwrap();

    let mut h = harness(dir.path());
    h.load_jars();
    assert!(h.start_test());
    assert_eq!(h.registry().current(), Some(0));

    let test_dir = dir.path().join("test");
    assert!(test_dir.join("a.jar").is_file());
    assert!(test_dir.join("plugins/x.yml").is_file());
    assert_eq!(
        std::fs::read_to_string(test_dir.join("run.bat")).unwrap(),
        "@echo off\njava -Xmx1G -jar a.jar\n"
    );
}

#[test]
fn next_test_walks_pending_records_then_reports_completion() {
    let dir = fixture(&["a.jar", "b.jar", "c.jar"]);
    let mut h = harness(dir.path());
    h.load_jars();
    h.start_test();
    h.update_status(TestStatus::Pass, "");

    assert!(h.next_test());
    assert_eq!(h.registry().current(), Some(1));
    assert!(dir.path().join("test/b.jar").is_file());
    assert!(!dir.path().join("test/a.jar").exists());

    h.update_status(TestStatus::Fail, "hangs");
    assert!(h.next_test());
    assert_eq!(h.registry().current(), Some(2));
    h.update_status(TestStatus::Pass, "");

    assert!(!h.next_test());
    assert!(last_line(&h).contains("no pending tests"));
    assert_eq!(h.registry().current(), Some(2));
    assert_eq!(h.progress().percent, 100);
}

#[test]
fn staging_a_vanished_artifact_leaves_no_script() {
    let dir = fixture(&["a.jar", "b.jar"]);
    let mut h = harness(dir.path());
    h.load_jars();
    h.start_test();
    std::fs::remove_file(dir.path().join("jars/b.jar")).unwrap();

    assert!(!h.next_test());
    assert!(last_line(&h).contains("artifact not found"));
    assert!(!dir.path().join("test/run.bat").exists());
}

#[test]
fn generate_log_writes_one_line_per_record() {
    let dir = fixture(&["x.jar"]);
    let mut h = harness(dir.path());
    h.load_jars();
    h.start_test();
    h.update_status(TestStatus::Fail, "crashed");
    assert!(h.generate_log());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("test_output_log.txt")).unwrap(),
        "x.jar - Fail - crashed\n"
    );
}

#[test]
fn open_snapshot_restores_records_without_cursor() {
    let dir = fixture(&["a.jar", "b.jar"]);
    {
        let mut h = harness(dir.path());
        h.load_jars();
        h.start_test();
        h.update_status(TestStatus::Pass, "ok");
    }
    let mut h = harness(dir.path());
    assert!(h.open_snapshot());
    assert_eq!(h.registry().current(), None);
    assert_eq!(h.registry().records()[0].status, TestStatus::Pass);
    assert!(h.next_test());
    assert_eq!(h.registry().current(), Some(1));
}

#[test]
fn stop_without_server_is_a_notice() {
    let dir = fixture(&[]);
    let mut h = harness(dir.path());
    assert!(!h.stop_server());
    assert_eq!(last_line(&h), "No server process is currently running.");
}

#[cfg(unix)]
#[tokio::test]
async fn live_server_blocks_restaging_until_next_test() {
    let dir = fixture(&["a.jar", "b.jar"]);
    let mut cfg = Config::default();
    cfg.launch.script = Some(ScriptFlavor::Posix);
    // stands in for a long-running server: `exec sh -c 'sleep 30' -jar 'a.jar'`
    cfg.launch.java = "sh".into();
    cfg.launch.heap_flag = "-c 'sleep 30'".into();
    cfg.launch.stop_grace_secs = 2;
    let (mut h, mut events) = Harness::open(dir.path().to_path_buf(), cfg);

    h.load_jars();
    assert!(h.start_test());
    assert!(h.start_server());
    assert!(h.is_server_running());
    assert!(!h.start_server());

    assert!(!h.start_test());
    assert!(!h.reset_workspace());
    assert!(dir.path().join("test/a.jar").exists());

    assert!(h.next_test());
    assert_eq!(h.registry().current(), Some(1));
    assert!(last_line(&h).contains("once the server has exited"));

    assert!(wait_for_stop(&mut h, &mut events).await);
    assert!(!h.is_server_running());
    assert!(last_line(&h).starts_with("Staged b.jar"), "{}", last_line(&h));
    assert!(dir.path().join("test/b.jar").exists());
    assert!(!dir.path().join("test/a.jar").exists());
}

#[cfg(unix)]
async fn wait_for_stop(
    h: &mut Harness,
    events: &mut tokio::sync::mpsc::UnboundedReceiver<jarcheck_launcher::LaunchEvent>,
) -> bool {
    use std::time::Duration;

    while let Ok(Some(event)) = tokio::time::timeout(Duration::from_secs(10), events.recv()).await {
        let done = matches!(event, jarcheck_launcher::LaunchEvent::Stopped { .. });
        h.on_launch_event(event);
        if done {
            return true;
        }
    }
    false
}

#[cfg(unix)]
#[tokio::test]
async fn server_ignoring_sigterm_still_blocks_the_workspace() {
    use std::time::Duration;

    let dir = fixture(&["a.jar", "b.jar"]);
    let mut cfg = Config::default();
    cfg.launch.script = Some(ScriptFlavor::Posix);
    cfg.launch.java = "sh".into();
    cfg.launch.heap_flag = r#"-c 'trap "" TERM; sleep 3'"#.into();
    cfg.launch.stop_grace_secs = 5;
    let (mut h, mut events) = Harness::open(dir.path().to_path_buf(), cfg);

    h.load_jars();
    assert!(h.start_test());
    assert!(h.start_server());
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(h.stop_server());
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(h.is_server_stopping());

    assert!(!h.start_server());
    assert!(last_line(&h).starts_with("Error:"), "{}", last_line(&h));
    assert!(!h.start_test());
    assert!(last_line(&h).contains("shutting down"), "{}", last_line(&h));
    assert!(!h.reset_workspace());
    assert!(dir.path().join("test/a.jar").exists());
    assert!(dir.path().join("test/run.sh").exists());

    assert!(wait_for_stop(&mut h, &mut events).await);
    assert!(!h.is_server_running());
    assert!(h.reset_workspace());
    assert!(!dir.path().join("test/a.jar").exists());
}
