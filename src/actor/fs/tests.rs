use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use super::debouncer::{DEBOUNCE_MS, Debouncer};
use super::types::ChangeKind;
use super::{WatchBinding, affected, dispatch_changes, watch_roots};
use crate::actor::messages::RunnerMsg;
use crate::config::test_config_at;
use crate::core::Category;

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn bindings_at(root: &Path) -> Vec<WatchBinding> {
    let config = test_config_at(root, "");
    WatchBinding::from_registry(&config.registry).unwrap()
}

// =============================================================================
// Debouncer
// =============================================================================

#[test]
fn test_debouncer_empty() {
    let debouncer = Debouncer::new();
    assert!(!debouncer.is_ready());
}

#[test]
fn test_event_routing_by_kind() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/tmp/a.scss"], create_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/b.scss"], modify_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/c.scss"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/a.scss")],
        ChangeKind::Created
    );
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/b.scss")],
        ChangeKind::Modified
    );
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/c.scss")],
        ChangeKind::Removed
    );
}

#[test]
fn test_temp_file_ignored() {
    let mut debouncer = Debouncer::new();

    debouncer.add_event(&make_event(vec!["/tmp/style.scss"], modify_kind()));
    let first_time = debouncer.last_event.unwrap();

    std::thread::sleep(Duration::from_millis(5));

    debouncer.add_event(&make_event(vec!["/tmp/.style.scss.swp"], modify_kind()));
    assert_eq!(debouncer.last_event.unwrap(), first_time);
    assert_eq!(debouncer.changes.len(), 1);
}

#[test]
fn test_metadata_change_ignored() {
    let mut debouncer = Debouncer::new();
    let kind = notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ));
    debouncer.add_event(&make_event(vec!["/tmp/main.js"], kind));
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_created_then_removed_cancels() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec!["/tmp/x.js"], create_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/x.js"], remove_kind()));
    assert!(debouncer.changes.is_empty());
}

#[test]
fn test_removed_then_created_is_restore() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec!["/tmp/x.js"], remove_kind()));
    debouncer.add_event(&make_event(vec!["/tmp/x.js"], create_kind()));
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/x.js")],
        ChangeKind::Created
    );
}

#[test]
fn test_ready_after_quiet_window() {
    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec!["/tmp/a.scss"], modify_kind()));
    assert!(debouncer.take_if_ready().is_none());

    std::thread::sleep(Duration::from_millis(DEBOUNCE_MS + 20));
    let changes = debouncer.take_if_ready().unwrap();
    assert_eq!(changes.len(), 1);
    assert!(debouncer.take_if_ready().is_none());
}

#[test]
fn test_sleep_duration_capped_by_idle() {
    let debouncer = Debouncer::new();
    assert_eq!(
        debouncer.sleep_duration(Duration::from_secs(1)),
        Duration::from_secs(1)
    );

    let mut debouncer = Debouncer::new();
    debouncer.add_event(&make_event(vec!["/tmp/a.scss"], modify_kind()));
    assert!(debouncer.sleep_duration(Duration::from_secs(1)) <= Duration::from_millis(DEBOUNCE_MS));
}

// =============================================================================
// Bindings
// =============================================================================

#[test]
fn test_styles_watch_is_wider_than_src() {
    let dir = TempDir::new().unwrap();
    let bindings = bindings_at(dir.path());
    let root = crate::utils::path::normalize_path(dir.path());

    let partial = root.join("src/assets/sass/components/_button.scss");
    assert_eq!(affected(&bindings, [partial.as_path()]), vec![Category::Styles]);
}

#[test]
fn test_changes_map_to_exact_categories() {
    let dir = TempDir::new().unwrap();
    let bindings = bindings_at(dir.path());
    let root = crate::utils::path::normalize_path(dir.path());

    let paths = [
        root.join("src/assets/js/main.js"),
        root.join("src/assets/images/icons/logo.png"),
        root.join("src/assets/images/photo.jpg"),
        root.join("src/view/partials/nav.jinja"),
    ];
    let categories = affected(&bindings, paths.iter().map(PathBuf::as_path));

    assert_eq!(
        categories,
        vec![Category::Scripts, Category::Images, Category::Views]
    );
}

#[test]
fn test_unbound_paths_match_nothing() {
    let dir = TempDir::new().unwrap();
    let bindings = bindings_at(dir.path());
    let root = crate::utils::path::normalize_path(dir.path());

    let paths = [
        // scripts only watch the top level
        root.join("src/assets/js/lib/util.js"),
        root.join("README.md"),
        root.join("build/assets/css/style.css"),
    ];
    assert!(affected(&bindings, paths.iter().map(PathBuf::as_path)).is_empty());
}

#[test]
fn test_hidden_paths_match_nothing() {
    let dir = TempDir::new().unwrap();
    let bindings = bindings_at(dir.path());
    let root = crate::utils::path::normalize_path(dir.path());

    let paths = [
        root.join("src/assets/fonts/.gitkeep"),
        root.join("src/assets/images/.cache/logo.png"),
        root.join("src/assets/sass/.hidden.scss"),
    ];
    assert!(affected(&bindings, paths.iter().map(PathBuf::as_path)).is_empty());
}

#[test]
fn test_watch_roots_drop_nested() {
    let dir = TempDir::new().unwrap();
    let config = test_config_at(
        dir.path(),
        "[paths.scripts]\nsrc = [\"src/assets/js/*.js\"]\nwatch = [\"src/**/*.js\"]",
    );
    let root = &config.root;

    let roots = watch_roots(&config.registry);
    assert!(roots.contains(&root.join("src")));
    assert!(!roots.contains(&root.join("src/assets/sass")));
    assert_eq!(roots.len(), 1);
}

#[tokio::test]
async fn test_dispatch_sends_one_run_per_category() {
    let dir = TempDir::new().unwrap();
    let bindings = bindings_at(dir.path());
    let root = crate::utils::path::normalize_path(dir.path());

    let mut debouncer = Debouncer::new();
    let style = root.join("src/assets/sass/style.scss");
    let partial = root.join("src/assets/sass/_vars.scss");
    debouncer.add_event(&make_event(
        vec![style.to_str().unwrap(), partial.to_str().unwrap()],
        modify_kind(),
    ));
    tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS + 20)).await;

    let (tx, mut rx) = mpsc::channel(8);
    dispatch_changes(&mut debouncer, &bindings, &tx).await.unwrap();
    drop(tx);

    assert_eq!(rx.recv().await, Some(RunnerMsg::Run(Category::Styles)));
    assert_eq!(rx.recv().await, None);
}
