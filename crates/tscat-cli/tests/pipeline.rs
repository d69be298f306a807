//! Full build pipeline through the command dispatcher.

use std::fs;
use std::path::Path;

use tscat_cli::cli::{Cli, Commands};
use tscat_cli::inspect::{StatsArgs, stats_summary};
use tscat_cli::merge::MergeArgs;
use tscat_cli::prune::PruneArgs;
use tscat_cli::resolve::{ResolveArgs, resolve_text};
use tscat_cli::{TscatConfig, run};
use tscat_core::{MessageKey, read_catalog, write_catalog};

fn cli(config: &Path, command: Commands) -> Cli {
    Cli {
        config: Some(config.to_path_buf()),
        verbose: 0,
        log_json: false,
        command,
    }
}

#[test]
fn merge_translate_prune_resolve() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    let config_path = root.join("tscat.toml");
    fs::write(
        &config_path,
        format!(
            "[output]\nsource_language = \"en_US\"\n\n[lookup]\nlocale_dir = {:?}\nfile_pattern = \"base_{{locale}}.ts\"\n",
            root.display().to_string()
        ),
    )
    .expect("write config");
    let config = TscatConfig::from_toml_file(&config_path).expect("config");
    let catalog_path = root.join("base_fr_FR.ts");

    // First extraction creates the catalog.
    let first = root.join("first.json");
    fs::write(
        &first,
        r#"[
  {"context": "Menu", "source": "Open", "location": {"file": "menu.cpp", "line": 10}},
  {"context": "Menu", "source": "Quit", "location": {"file": "menu.cpp", "line": 20}},
  {"context": "Menu", "source": "Open", "location": {"file": "toolbar.cpp", "line": 3}}
]"#,
    )
    .expect("write extraction");
    run(cli(
        &config_path,
        Commands::Merge(MergeArgs {
            existing: catalog_path.clone(),
            skeleton: first,
            output: None,
            locale: Some("fr_FR".into()),
            drop_vanished: false,
            json: true,
        }),
    ))
    .expect("first merge");

    // A translator finishes one message.
    let mut catalog = read_catalog(&catalog_path).expect("read");
    assert_eq!(catalog.source_language(), Some("en_US"));
    catalog
        .set_translation(&MessageKey::new("Menu", "Open", None), "Ouvrir")
        .expect("editable");
    write_catalog(&catalog_path, &catalog).expect("write");

    // The second extraction drops both strings' old call sites and Quit.
    let second = root.join("second.json");
    fs::write(
        &second,
        r#"[{"context": "Menu", "source": "Open", "location": {"file": "menu.cpp", "line": 12}}]"#,
    )
    .expect("write extraction");
    run(cli(
        &config_path,
        Commands::Merge(MergeArgs {
            existing: catalog_path.clone(),
            skeleton: second,
            output: None,
            locale: None,
            drop_vanished: false,
            json: false,
        }),
    ))
    .expect("second merge");

    let stats = stats_summary(&StatsArgs {
        catalog: catalog_path.clone(),
        json: false,
    })
    .expect("stats");
    assert_eq!(stats.stats.finished, 1);
    assert_eq!(stats.stats.vanished, 1);

    run(cli(
        &config_path,
        Commands::Prune(PruneArgs {
            catalog: catalog_path.clone(),
            obsolete: false,
            vanished: false,
        }),
    ))
    .expect("prune");
    assert_eq!(read_catalog(&catalog_path).expect("read").len(), 1);

    let resolved = resolve_text(
        &ResolveArgs {
            catalog: None,
            locale: Some("fr_FR".into()),
            context: "Menu".into(),
            source: "Open".into(),
            disambiguation: None,
        },
        &config,
    )
    .expect("resolve");
    assert_eq!(resolved, "Ouvrir");
}

#[test]
fn invalid_config_stops_before_any_command() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("tscat.toml");
    fs::write(&config_path, "[output]\nformat_version = \"9.0\"\n").expect("write config");
    let error = run(cli(
        &config_path,
        Commands::Prune(PruneArgs {
            catalog: dir.path().join("missing.ts"),
            obsolete: true,
            vanished: false,
        }),
    ))
    .expect_err("invalid config");
    assert_eq!(error.exit_code(), 2);
}
