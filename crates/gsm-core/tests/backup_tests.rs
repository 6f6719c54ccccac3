use std::fs;
use std::path::{Path, PathBuf};

use gsm_core::{Prompt, RegistryStore, SaveManager};

struct PickOnce {
    dest: Option<PathBuf>,
    picks: usize,
}

impl Prompt for PickOnce {
    fn text_input(&mut self, _title: &str, _label: &str) -> Option<String> {
        None
    }
    fn pick_directory(&mut self, _title: &str, _start: Option<&Path>) -> Option<PathBuf> {
        self.picks += 1;
        self.dest.take()
    }
    fn warn(&mut self, _title: &str, _message: &str) {}
    fn confirm(&mut self, _title: &str, _message: &str) -> bool {
        false
    }
}

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

#[test]
fn backup_copies_tree_and_replaces_previous_copy() {
    let d = tempfile::tempdir().unwrap();
    let games = d.path().join("games");
    let dest = d.path().join("backup");
    write(&games.join("a/slot1.sav"), "one");
    write(&games.join("a/profiles/p1/state.dat"), "deep");
    fs::create_dir_all(games.join("a/empty")).unwrap();
    write(&dest.join("a/stale.sav"), "old");

    let mut m = SaveManager::open(RegistryStore::new(d.path().join("save_paths.json"))).unwrap();
    m.add_manual(&games.join("a").to_string_lossy(), "A").unwrap();
    let before = fs::read_to_string(d.path().join("save_paths.json")).unwrap();

    let mut prompt = PickOnce {
        dest: Some(dest.clone()),
        picks: 0,
    };
    let report = m.backup(&mut prompt).expect("report");
    assert_eq!(report.failed(), 0);
    assert_eq!(report.items[0].destination, dest.join("a"));
    assert_eq!(fs::read_to_string(dest.join("a/slot1.sav")).unwrap(), "one");
    assert_eq!(
        fs::read_to_string(dest.join("a/profiles/p1/state.dat")).unwrap(),
        "deep"
    );
    assert!(dest.join("a/empty").is_dir());
    assert!(!dest.join("a/stale.sav").exists());
    assert_eq!(report.totals().files, 2);

    let after = fs::read_to_string(d.path().join("save_paths.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn empty_registry_skips_prompt() {
    let d = tempfile::tempdir().unwrap();
    let m = SaveManager::open(RegistryStore::new(d.path().join("save_paths.json"))).unwrap();
    let mut prompt = PickOnce {
        dest: Some(d.path().join("backup")),
        picks: 0,
    };
    assert!(m.backup(&mut prompt).is_none());
    assert_eq!(prompt.picks, 0);
    assert!(!d.path().join("backup").exists());
}

#[test]
fn no_destination_chosen_is_a_no_op() {
    let d = tempfile::tempdir().unwrap();
    let mut m = SaveManager::open(RegistryStore::new(d.path().join("save_paths.json"))).unwrap();
    m.add_manual("/does/not/matter", "").unwrap();
    let mut prompt = PickOnce {
        dest: None,
        picks: 0,
    };
    assert!(m.backup(&mut prompt).is_none());
    assert_eq!(prompt.picks, 1);
}

#[test]
fn one_failure_does_not_stop_the_batch() {
    let d = tempfile::tempdir().unwrap();
    let games = d.path().join("games");
    let dest = d.path().join("backup");
    write(&games.join("first/a.sav"), "1");
    write(&games.join("last/b.sav"), "2");
    fs::create_dir_all(&dest).unwrap();

    let mut m = SaveManager::open(RegistryStore::new(d.path().join("save_paths.json"))).unwrap();
    m.add_manual(&games.join("first").to_string_lossy(), "").unwrap();
    m.add_manual(&games.join("missing").to_string_lossy(), "").unwrap();
    m.add_manual(&games.join("last").to_string_lossy(), "").unwrap();

    let mut prompt = PickOnce {
        dest: Some(dest.clone()),
        picks: 0,
    };
    let report = m.backup(&mut prompt).unwrap();
    assert_eq!(report.items.len(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.items[1].result,
        Err(gsm_core::CopyError::MissingSource { .. })
    ));
    let msg = report.failures().next().unwrap().to_string();
    assert!(msg.contains("missing"));
    assert!(dest.join("first/a.sav").exists());
    assert!(dest.join("last/b.sav").exists());
    assert!(report.summary().contains("1 failed"));
}

#[test]
fn copy_tree_counts_what_it_copies() {
    let d = tempfile::tempdir().unwrap();
    let src = d.path().join("src");
    write(&src.join("x.bin"), "12345");
    write(&src.join("sub/y.bin"), "678");
    let stats = gsm_core::copy_tree(&src, &d.path().join("out")).unwrap();
    assert_eq!(stats.files, 2);
    assert_eq!(stats.bytes, 8);
    assert_eq!(stats.dirs, 2);
}

#[test]
fn destination_equal_to_source_leaves_saves_alone() {
    let d = tempfile::tempdir().unwrap();
    let games = d.path().join("games");
    write(&games.join("a/slot.sav"), "keep me");

    let mut m = SaveManager::open(RegistryStore::new(d.path().join("save_paths.json"))).unwrap();
    m.add_manual(&games.join("a").to_string_lossy(), "A").unwrap();
    let mut prompt = PickOnce {
        dest: Some(games.clone()),
        picks: 0,
    };
    let report = m.backup(&mut prompt).unwrap();
    assert!(matches!(
        report.items[0].result,
        Err(gsm_core::CopyError::Overlap { .. })
    ));
    assert_eq!(
        fs::read_to_string(games.join("a/slot.sav")).unwrap(),
        "keep me"
    );
}

#[test]
fn destination_inside_source_is_rejected() {
    let d = tempfile::tempdir().unwrap();
    let games = d.path().join("games");
    write(&games.join("a/slot.sav"), "keep me");
    fs::create_dir_all(games.join("a/sub")).unwrap();

    let mut m = SaveManager::open(RegistryStore::new(d.path().join("save_paths.json"))).unwrap();
    m.add_manual(&games.join("a").to_string_lossy(), "A").unwrap();
    let mut prompt = PickOnce {
        dest: Some(games.join("a/sub")),
        picks: 0,
    };
    let report = m.backup(&mut prompt).unwrap();
    assert!(matches!(
        report.items[0].result,
        Err(gsm_core::CopyError::Overlap { .. })
    ));
    assert!(!games.join("a/sub/a").exists());
    assert_eq!(
        fs::read_to_string(games.join("a/slot.sav")).unwrap(),
        "keep me"
    );
}

#[test]
fn copy_tree_refuses_to_copy_into_itself() {
    let d = tempfile::tempdir().unwrap();
    let src = d.path().join("src");
    write(&src.join("x.bin"), "1");
    let err = gsm_core::copy_tree(&src, &src.join("nested/copy")).unwrap_err();
    assert!(matches!(err, gsm_core::CopyError::Overlap { .. }));
    assert!(!src.join("nested").exists());
}
