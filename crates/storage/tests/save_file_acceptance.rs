use shared::persisted::PersistedState;
use storage::{
    default_export_path, export_to_file, import_from_file, DirStore, StateStore,
    CURRENT_GAME_VERSION,
};

#[test]
fn exported_save_file_imports_into_a_fresh_run() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = default_export_path(&temp.path().join("exports"));

    let mut state = PersistedState::fresh(CURRENT_GAME_VERSION);
    state.current_stage = 3;
    state.weapon_blacklist.insert("Terra Blade".into(), true);
    export_to_file(&path, &state).expect("export");
    assert!(path.ends_with("TerrariaRandomWeapon.save"));

    let imported =
        import_from_file(&path, PersistedState::fresh(CURRENT_GAME_VERSION), 10).expect("import");
    assert_eq!(imported, state);
}

#[test]
fn pre_version_save_file_is_migrated_on_import() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("old.save");
    std::fs::write(
        &path,
        r#"{"currentStage": 2, "weaponBlacklist": {"Fiery Greatsword": true}, "selectedWeapon": "Fiery Greatsword"}"#,
    )
    .expect("write");

    let imported =
        import_from_file(&path, PersistedState::fresh(CURRENT_GAME_VERSION), 5).expect("import");
    assert_eq!(imported.current_stage, 2);
    assert!(imported.is_blacklisted("Volcano"));
    assert!(imported.is_selected("Volcano"));
    assert_eq!(imported.terraria_version, CURRENT_GAME_VERSION);
}

#[test]
fn invalid_save_file_reports_its_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("broken.save");
    std::fs::write(&path, "not json").expect("write");

    let err = import_from_file(&path, PersistedState::fresh(CURRENT_GAME_VERSION), 5)
        .expect_err("should fail");
    assert!(err.to_string().contains("broken.save"));
}

#[test]
fn dir_store_persists_state_across_instances() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut state = PersistedState::fresh(CURRENT_GAME_VERSION);
    state.open_weapon_list = true;

    StateStore::new(DirStore::new(temp.path()))
        .save(&state)
        .expect("save");
    let loaded = StateStore::new(DirStore::new(temp.path()))
        .load(PersistedState::fresh(CURRENT_GAME_VERSION), 5)
        .expect("load");
    assert_eq!(loaded, state);
}
