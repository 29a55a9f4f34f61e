//! Integration tests driving the `migrate` and `inspect` commands on disk.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use twm_cli::cli::{InspectArgs, MigrateArgs, TargetArgs};
use twm_cli::commands::{resolve_config, run_inspect, run_migrate};
use twm_model::DatasourceStatus;
use twm_package::DEFAULT_SUFFIX;

const WORKBOOK: &str = r#"<?xml version='1.0' encoding='utf-8' ?>
<workbook version='18.1'>
  <datasources>
    <datasource caption='Orders' inline='true' name='federated.1'>
      <connection class='federated'>
        <named-connections>
          <named-connection caption='cluster.redshift.amazonaws.com' name='redshift.1'>
            <connection class='redshift' dbname='dev' port='5439' schema='public' server='cluster.redshift.amazonaws.com' username='admin' />
          </named-connection>
        </named-connections>
        <relation connection='redshift.1' name='orders' table='[public].[orders]' type='table' />
        <metadata-records>
          <metadata-record class='column'>
            <remote-name>order_id</remote-name>
            <parent-name>[orders]</parent-name>
            <remote-alias>order_id</remote-alias>
          </metadata-record>
        </metadata-records>
      </connection>
      <column name='[Calculation_1]'>
        <calculation class='tableau' formula='COUNTD([order_id])' />
      </column>
    </datasource>
    <datasource caption='Published' hasconnection='false' name='sqlproxy.2'>
      <repository-location id='Published' />
    </datasource>
  </datasources>
</workbook>
"#;

const CONFIG: &str = r#"
account = "acme"
username = "LOADER"
database = "ANALYTICS"
warehouse = "REPORTING_WH"
schema = "core"
role = "REPORTER"
"#;

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("snowflake.toml");
    fs::write(&path, CONFIG).unwrap();
    path
}

fn build_twbx(path: &Path) {
    build_twbx_with(path, "Sales.twb", WORKBOOK);
}

fn build_twbx_with(path: &Path, descriptor: &str, text: &str) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    writer.start_file(descriptor, options).unwrap();
    writer.write_all(text.as_bytes()).unwrap();
    writer.start_file("Data/extract.hyper", options).unwrap();
    writer.write_all(b"hyper").unwrap();
    writer.finish().unwrap();
}

fn migrate_args(input: PathBuf, config: PathBuf) -> MigrateArgs {
    MigrateArgs {
        input,
        target: TargetArgs {
            config: Some(config),
            ..TargetArgs::default()
        },
        suffix: DEFAULT_SUFFIX.to_string(),
        dry_run: false,
        report_json: None,
        show_renames: false,
    }
}

fn read_entry(archive: &Path, name: &str) -> String {
    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut text = String::new();
    zip.by_name(name).unwrap().read_to_string(&mut text).unwrap();
    text
}

#[test]
fn test_migrate_packaged_workbook() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Sales.twbx");
    build_twbx(&input);
    let config = write_config(dir.path());

    let result = run_migrate(&migrate_args(input, config)).unwrap();

    let output = result.output.clone().unwrap();
    assert_eq!(
        output.file_name().unwrap().to_str(),
        Some("Sales-Snowflake.twbx")
    );
    let descriptor = read_entry(&output, "Sales.twb");
    assert!(descriptor.contains("class='snowflake'") || descriptor.contains("class=\"snowflake\""));
    assert!(descriptor.contains("acme.snowflakecomputing.com"));
    assert!(descriptor.contains("[CORE].[ORDERS]"));
    assert!(descriptor.contains("COUNTD([ORDER_ID])"));
    assert!(descriptor.contains("<remote-name>ORDER_ID</remote-name>"));
    assert_eq!(read_entry(&output, "Data/extract.hyper"), "hyper");

    assert_eq!(result.report.migrated_count(), 1);
    assert_eq!(result.report.skipped_count(), 1);
    assert_eq!(
        result.report.datasources[1].status,
        DatasourceStatus::SkippedNoConnection
    );
    assert!(
        result
            .renames
            .iter()
            .any(|entry| entry.original == "order_id" && entry.normalized == "ORDER_ID")
    );
}

#[test]
fn test_migrate_plain_descriptor_writes_suffixed_copy() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Sales.twb");
    fs::write(&input, WORKBOOK).unwrap();
    let config = write_config(dir.path());
    let mut args = migrate_args(input.clone(), config);
    args.suffix = "-sf".to_string();

    let result = run_migrate(&args).unwrap();

    let output = result.output.unwrap();
    assert_eq!(output, dir.path().join("Sales-sf.twb"));
    let migrated = fs::read_to_string(&output).unwrap();
    assert!(migrated.contains("[CORE].[ORDERS]"));
    assert_eq!(fs::read_to_string(&input).unwrap(), WORKBOOK);
}

#[test]
fn test_dry_run_writes_nothing_but_the_report() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Sales.twbx");
    build_twbx(&input);
    let config = write_config(dir.path());
    let report_path = dir.path().join("report.json");
    let mut args = migrate_args(input, config);
    args.dry_run = true;
    args.report_json = Some(report_path.clone());

    let result = run_migrate(&args).unwrap();

    assert!(result.output.is_none());
    assert!(!dir.path().join("Sales").exists());
    assert!(!dir.path().join("Sales-Snowflake.twbx").exists());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["output"], serde_json::Value::Null);
    assert_eq!(json["report"]["datasources"][0]["status"], "migrated");
    assert_eq!(
        json["report"]["datasources"][1]["status"],
        "skipped_no_connection"
    );
    assert_eq!(json["renames"][0]["original"], "orders");
    assert_eq!(json["renames"][0]["normalized"], "ORDERS");
}

#[test]
fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let target = TargetArgs {
        config: Some(write_config(dir.path())),
        schema: Some("MART".to_string()),
        ..TargetArgs::default()
    };

    let config = resolve_config(&target).unwrap();

    assert_eq!(config.schema, "MART");
    assert_eq!(config.account, "acme");
}

#[test]
fn test_missing_settings_are_reported() {
    let target = TargetArgs {
        account: Some("acme".to_string()),
        ..TargetArgs::default()
    };
    let error = resolve_config(&target).unwrap_err();
    assert!(format!("{error:#}").contains("username"));
}

#[test]
fn test_missing_input_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let args = migrate_args(dir.path().join("Missing.twbx"), config);

    let error = run_migrate(&args).unwrap_err();

    assert!(error.to_string().contains("does not exist"));
    assert!(!dir.path().join("Missing").exists());
}

#[test]
fn test_malformed_descriptor_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Broken.twb");
    fs::write(&input, "<workbook><datasources></workbook>").unwrap();
    let config = write_config(dir.path());

    assert!(run_migrate(&migrate_args(input, config)).is_err());
    assert!(!dir.path().join("Broken-Snowflake.twb").exists());
}

#[test]
fn test_malformed_packaged_descriptor_extracts_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Bad.twbx");
    build_twbx_with(&input, "Bad.twb", "<workbook><datasources></workbook>");
    let config = write_config(dir.path());

    let error = run_migrate(&migrate_args(input.clone(), config)).unwrap_err();

    assert!(format!("{error:#}").contains("malformed"));
    assert!(!dir.path().join("Bad").exists());
    assert!(!dir.path().join("Bad-Snowflake.twbx").exists());
    assert!(input.is_file());
}

#[test]
fn test_inspect_lists_datasources() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("Sales.twbx");
    build_twbx(&input);

    let result = run_inspect(&InspectArgs {
        input: input.clone(),
    })
    .unwrap();

    assert_eq!(result.datasources.len(), 2);
    assert_eq!(result.datasources[0].caption.as_deref(), Some("Orders"));
    assert!(result.datasources[0].has_source_connection());
    assert!(!result.datasources[1].embedded);
    assert!(!dir.path().join("Sales").exists());
}
