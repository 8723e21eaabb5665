fn main() {
    println!("Run `cargo test -p layout-compat` to check resolution against the fixture Steam tree.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use steampath_steam::{
        CollectingSink, FixedInstallPath, SavePathTable, Steam, SteamError, Warning, known_apps,
    };

    /// Returns the fake Steam install checked in under `fixtures/`.
    fn fixture_install() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("steam")
    }

    fn load_fixture(relative: &str) -> String {
        let path = fixture_install().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// Copies the fixture manifest into a fresh install whose only library is
    /// the install itself, the way a default Steam setup looks.
    fn relocated_install() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let steamapps = tmp.path().join("steamapps");
        fs::create_dir_all(steamapps.join("common").join("Pathway")).unwrap();
        fs::write(
            steamapps.join("appmanifest_546430.acf"),
            load_fixture("steamapps/appmanifest_546430.acf"),
        )
        .unwrap();

        let escaped = tmp.path().to_string_lossy().replace('\\', "\\\\");
        fs::write(
            steamapps.join("libraryfolders.vdf"),
            format!("\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{escaped}\"\n\t}}\n}}\n"),
        )
        .unwrap();
        tmp
    }

    fn steam_at(path: &Path) -> Steam {
        Steam::with_provider(FixedInstallPath::new(path))
    }

    #[test]
    fn fixture_library_folders_parse() {
        let config = steam_at(&fixture_install()).read_library_config().unwrap();
        let folders = config.get_object("libraryfolders").unwrap();
        assert_eq!(folders.keys().collect::<Vec<_>>(), vec!["0", "1"]);

        let second = folders.get_object("1").unwrap();
        assert_eq!(second.get_str("path"), Some(r"Y:\SteamLibrary"));
        assert_eq!(second.get_str("label"), Some("Games"));
        assert!(second.get_object("apps").unwrap().contains_key("546430"));
    }

    #[test]
    fn fixture_offline_libraries_are_dropped() {
        let sink = Arc::new(CollectingSink::new());
        let steam = steam_at(&fixture_install()).diagnostics(sink.clone());

        let paths = steam.list_library_paths().unwrap();
        assert!(paths.is_empty());
        assert_eq!(
            sink.warnings(),
            vec![
                Warning::LibraryMissing {
                    path: PathBuf::from(r"X:\Program Files (x86)\Steam"),
                },
                Warning::LibraryMissing {
                    path: PathBuf::from(r"Y:\SteamLibrary"),
                },
            ]
        );
    }

    #[test]
    fn fixture_app_on_offline_library_is_not_found() {
        let err = steam_at(&fixture_install())
            .get_application(known_apps::PATHWAY, None)
            .unwrap_err();
        assert!(matches!(err, SteamError::NotFound(_)));
    }

    #[test]
    fn fixture_manifest_roundtrip() {
        let text = load_fixture("steamapps/appmanifest_546430.acf");
        let parsed = steampath_vdf::parse(&text).unwrap();
        let written = steampath_vdf::to_string(&parsed);

        assert_eq!(written, text);
        assert_eq!(steampath_vdf::parse(&written).unwrap(), parsed);

        let state = parsed.get_object("AppState").unwrap();
        let keys: Vec<&str> = state.keys().collect();
        assert_eq!(keys.first(), Some(&"appid"));
        assert_eq!(keys.last(), Some(&"MountedConfig"));
    }

    #[test]
    fn fixture_library_folders_roundtrip() {
        let text = load_fixture("steamapps/libraryfolders.vdf");
        let parsed = steampath_vdf::parse(&text).unwrap();
        assert_eq!(steampath_vdf::to_string(&parsed), text);
    }

    #[test]
    fn fixture_remote_paths() {
        let steam = steam_at(&fixture_install());

        let remotes = steam.list_remote_paths(known_apps::PATHWAY).unwrap();
        assert_eq!(
            remotes,
            vec![
                fixture_install()
                    .join("userdata")
                    .join("12345")
                    .join("546430")
                    .join("remote")
            ]
        );

        assert!(steam.list_remote_paths("999999").unwrap().is_empty());
    }

    #[test]
    fn relocated_install_resolves_pathway() {
        let install = relocated_install();
        let steam = steam_at(install.path());

        let libraries = steam.list_library_paths().unwrap();
        assert_eq!(libraries, vec![install.path().to_path_buf()]);

        let app = steam
            .get_application(known_apps::PATHWAY, Some(r"C:\ignored"))
            .unwrap();
        assert_eq!(app.id, "546430");
        assert_eq!(app.app_id, "546430");
        assert_eq!(app.name, "Pathway");
        assert_eq!(app.install_dir, "Pathway");
        assert!(app.game_path.is_dir());
        assert_eq!(
            app.game_path,
            install.path().join("steamapps").join("common").join("Pathway")
        );
        assert_eq!(
            app.save_path.as_deref(),
            Some(r"%LOCALAPPDATA%\Robotality\Pathway")
        );
    }

    #[test]
    fn relocated_install_without_table_uses_fallback() {
        let install = relocated_install();
        let steam = steam_at(install.path()).save_paths(SavePathTable::empty());

        let app = steam
            .get_application(known_apps::PATHWAY, Some("/saves/pathway"))
            .unwrap();
        assert_eq!(app.save_path.as_deref(), Some("/saves/pathway"));

        let app = steam.get_application(known_apps::PATHWAY, None).unwrap();
        assert!(app.save_path.is_none());
    }

    #[test]
    fn relocated_install_unknown_app() {
        let install = relocated_install();
        let err = steam_at(install.path())
            .get_application("999999", None)
            .unwrap_err();
        assert!(matches!(err, SteamError::NotFound(_)));
    }

    #[test]
    fn application_serializes_for_consumers() {
        let install = relocated_install();
        let app = steam_at(install.path())
            .get_application(known_apps::PATHWAY, None)
            .unwrap();

        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["appId"], "546430");
        assert_eq!(json["installDir"], "Pathway");
        assert_eq!(json["savePath"], r"%LOCALAPPDATA%\Robotality\Pathway");
    }
}
