use std::fs;
use std::path::Path;

use clap::Parser;
use tempfile::TempDir;

use tiled2bin_verify::cli::Cli;
use tiled2bin_verify::config::VerifyConfig;
use tiled2bin_verify::error::VerifyError;
use tiled2bin_verify::processor::verify::Status;
use tiled2bin_verify::verify;

const SIZE: usize = 32;
const MARKED: usize = 5 * SIZE + 5;

/// 32x32 screen of GID 1 with GID 10 at (5,5).
fn chunk_csv() -> String {
    let mut gids = vec!["1"; SIZE * SIZE];
    gids[MARKED] = "10";
    gids.chunks(SIZE)
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join(",\n")
}

fn map_xml(properties: &str, encoding: &str, csv: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" infinite="1" tilewidth="8" tileheight="8">
 <properties>
{properties}
 </properties>
 <layer id="1" name="map" width="32" height="32">
  <data encoding="{encoding}">
   <chunk x="0" y="0" width="32" height="32">
{csv}
</chunk>
  </data>
 </layer>
</map>"#
    )
}

const SCREEN_PROPS: &str = r#"  <property name="screenWidth" type="int" value="32"/>
  <property name="screenHeight" type="int" value="32"/>"#;

fn setup(xml: &str) -> (TempDir, VerifyConfig) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("maps.tmx"), xml).unwrap();
    let config = VerifyConfig {
        map_file: tmp.path().join("maps.tmx"),
        bin_pattern: format!("{}/maps*_*.bin", tmp.path().display()),
        strict_names: false,
    };
    (tmp, config)
}

fn write_screen(dir: &Path, name: &str, marked: u8) {
    let mut bytes = vec![0u8; SIZE * SIZE];
    bytes[MARKED] = marked;
    fs::write(dir.join(name), bytes).unwrap();
}

#[test]
fn exported_screen_matches_map() {
    let (tmp, config) = setup(&map_xml(SCREEN_PROPS, "csv", &chunk_csv()));
    write_screen(tmp.path(), "maps_0.bin", 9);

    let report = verify(&config).expect("verification runs");
    assert!(report.success);
    assert_eq!(report.geometry.screens_per_row, 1);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].status, Status::Pass);
}

#[test]
fn changed_byte_fails_at_marked_tile() {
    for wrong in [0u8, 8, 10, 255] {
        let (tmp, config) = setup(&map_xml(SCREEN_PROPS, "csv", &chunk_csv()));
        write_screen(tmp.path(), "maps_0.bin", wrong);

        let report = verify(&config).unwrap();
        assert!(!report.success);
        let file = &report.files[0];
        assert_eq!(file.status, Status::Fail);
        match &file.error {
            Some(VerifyError::ContentMismatch(m)) => {
                assert_eq!((m.local_x, m.local_y), (5, 5));
                assert_eq!(m.actual, wrong);
                assert_eq!(m.expected, 9);
                assert_eq!(m.raw_gid, 10);
            }
            other => panic!("expected content mismatch, got {other:?}"),
        }
    }
}

#[test]
fn wrong_size_fails_and_run_continues() {
    let (tmp, config) = setup(&map_xml(SCREEN_PROPS, "csv", &chunk_csv()));
    write_screen(tmp.path(), "maps_0.bin", 9);
    fs::write(tmp.path().join("maps_1.bin"), [0u8; 100]).unwrap();

    let report = verify(&config).unwrap();
    assert!(!report.success);
    assert_eq!(report.files[0].status, Status::Pass);
    assert_eq!(report.files[1].status, Status::Fail);
    assert!(matches!(
        report.files[1].error,
        Some(VerifyError::SizeMismatch {
            actual: 100,
            expected: 1024
        })
    ));
}

#[test]
fn unnamed_screen_is_skipped() {
    let (tmp, config) = setup(&map_xml(SCREEN_PROPS, "csv", &chunk_csv()));
    write_screen(tmp.path(), "maps_0.bin", 9);
    write_screen(tmp.path(), "maps_backup.bin", 9);

    let report = verify(&config).unwrap();
    assert!(report.success);
    let skipped: Vec<_> = report
        .files
        .iter()
        .filter(|f| f.status == Status::Skip)
        .collect();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].file.ends_with("maps_backup.bin"));

    let strict = VerifyConfig {
        strict_names: true,
        ..config
    };
    assert!(!verify(&strict).unwrap().success);
}

#[test]
fn fatal_map_problems_abort() {
    let (_tmp, config) = setup(&map_xml(SCREEN_PROPS, "base64", "AAAA"));
    assert!(matches!(verify(&config), Err(VerifyError::Structural(_))));

    let width_only = r#"  <property name="screenWidth" value="32"/>"#;
    let (_tmp, config) = setup(&map_xml(width_only, "csv", &chunk_csv()));
    assert!(matches!(verify(&config), Err(VerifyError::Config(_))));

    let (_tmp, config) = setup(&map_xml(SCREEN_PROPS, "csv", "1,2,three"));
    assert!(matches!(verify(&config), Err(VerifyError::Parse { .. })));

    let (tmp, config) = setup(&map_xml(SCREEN_PROPS, "csv", &chunk_csv()));
    assert!(matches!(verify(&config), Err(VerifyError::NoBinaries(_))));

    fs::remove_file(tmp.path().join("maps.tmx")).unwrap();
    assert!(matches!(verify(&config), Err(VerifyError::NotFound(_))));
}

#[test]
fn config_file_and_flags_layer() {
    let (tmp, config) = setup(&map_xml(SCREEN_PROPS, "csv", &chunk_csv()));
    write_screen(tmp.path(), "maps_0.bin", 9);

    let cfg_path = tmp.path().join("verify.json");
    let json = serde_json::json!({
        "mapFile": "does/not/exist.tmx",
        "binPattern": config.bin_pattern,
    });
    fs::write(&cfg_path, json.to_string()).unwrap();

    let map_arg = config.map_file.display().to_string();
    let cfg_arg = cfg_path.display().to_string();
    let cli = Cli::try_parse_from(["tiled2bin-verify", "--config", &cfg_arg, "--map", &map_arg])
        .unwrap();

    let resolved = cli.resolve_config().unwrap();
    assert_eq!(resolved, config);
    assert!(verify(&resolved).unwrap().success);
}
