use configuration::settings::PipelineSettings;
use configuration::{ConnectionConfig, LoadMode, Normalization};
use database::{drop_table, fetch_table, DbHandle};
use pipeline::{PipelineError, prepare_dataset, run, run_with_connection};
use polars::prelude::*;
use std::fs;
use std::path::Path;

fn settings_for(root: &Path, table: &str) -> PipelineSettings {
    PipelineSettings {
        input_dir: root.join("raw"),
        output_dir: root.join("processed"),
        output_file_name: "etl_pipeline_processed.csv".to_string(),
        table_name: table.to_string(),
        load_mode: LoadMode::Replace,
        normalization: Normalization::Passthrough,
    }
}

fn write_inputs(root: &Path) {
    let raw = root.join("raw");
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("a.csv"), "a,b\n1,3\n").unwrap();
    fs::write(raw.join("b.csv"), "a,b\n2,4\n").unwrap();
    fs::write(raw.join("README.txt"), "not an input").unwrap();
}

/// Five files of 1000 rows: two integer ranges and an entirely empty column.
fn write_volume_inputs(root: &Path) {
    let raw = root.join("raw");
    fs::create_dir_all(&raw).unwrap();
    for i in 0..5 {
        let rows: String = (0..1000).map(|n| format!("{},{},\n", n, n + 1000)).collect();
        fs::write(raw.join(format!("sample_{i}.csv")), format!("col1,col2,col3\n{rows}")).unwrap();
    }
}

#[test]
fn combines_two_files_into_one_dataset() {
    let root = tempfile::tempdir().unwrap();
    write_inputs(root.path());

    let prepared = prepare_dataset(&settings_for(root.path(), "unused")).unwrap();

    assert_eq!(prepared.files.len(), 2);
    let expected = df!("a" => &[1i64, 2], "b" => &[3i64, 4]).unwrap();
    assert!(prepared.dataset.equals_missing(&expected));
}

#[test]
fn empty_input_directory_is_not_an_error() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("raw")).unwrap();

    let prepared = prepare_dataset(&settings_for(root.path(), "unused")).unwrap();

    assert!(prepared.files.is_empty());
    assert_eq!(prepared.dataset.height(), 0);
}

#[test]
fn malformed_input_aborts_in_the_read_stage() {
    let root = tempfile::tempdir().unwrap();
    write_inputs(root.path());
    fs::write(root.path().join("raw").join("c.csv"), "a,b\n5,6,7\n").unwrap();

    let err = prepare_dataset(&settings_for(root.path(), "unused")).unwrap_err();

    assert!(matches!(err, PipelineError::Read(_)));
    assert_eq!(err.stage(), "read");
}

#[test]
fn trim_policy_is_applied_after_concatenation() {
    let root = tempfile::tempdir().unwrap();
    let raw = root.path().join("raw");
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("one.csv"), "name\n\" padded \"\n").unwrap();
    fs::write(raw.join("two.csv"), "name,qty\nplain,2\n").unwrap();

    let mut settings = settings_for(root.path(), "unused");
    settings.normalization = Normalization::TrimStrings;
    let prepared = prepare_dataset(&settings).unwrap();

    let names: Vec<Option<&str>> = prepared
        .dataset
        .column("name")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(names, vec![Some("padded"), Some("plain")]);
    assert_eq!(prepared.dataset.column("qty").unwrap().null_count(), 1);
}

#[test]
fn five_thousand_rows_survive_transform_and_write() {
    let root = tempfile::tempdir().unwrap();
    write_volume_inputs(root.path());
    let settings = settings_for(root.path(), "unused");
    fs::create_dir_all(&settings.output_dir).unwrap();

    let prepared = prepare_dataset(&settings).unwrap();
    let written = ingest::write_csv(&prepared.dataset, settings.output_path()).unwrap();

    assert_eq!(prepared.files.len(), 5);
    assert_eq!(written, 5000);
    assert_eq!(prepared.dataset.get_column_names(), vec!["col1", "col2", "col3"]);
    assert_eq!(prepared.dataset.column("col3").unwrap().null_count(), 5000);

    let reread = ingest::read_csv(settings.output_path()).unwrap();
    assert_eq!(reread.height(), 5000);
    assert_eq!(reread.column("col3").unwrap().null_count(), 5000);
    assert!(
        reread
            .column("col1")
            .unwrap()
            .equals_missing(prepared.dataset.column("col1").unwrap())
    );
}

#[tokio::test]
async fn missing_connection_details_fail_before_any_file_io() {
    let root = tempfile::tempdir().unwrap();
    write_inputs(root.path());
    let settings = settings_for(root.path(), "unused");
    let config = ConnectionConfig {
        host: Some("localhost".to_string()),
        user: Some("test_user".to_string()),
        ..Default::default()
    };

    let err = run_with_connection(&settings, &config).await.unwrap_err();

    match &err {
        PipelineError::Configuration(db) => assert!(db.is_configuration_error()),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!settings.output_dir.exists());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn written_and_loaded_data_match_the_transformed_dataset() {
    dotenvy::dotenv().ok();
    let root = tempfile::tempdir().unwrap();
    write_inputs(root.path());
    let settings = settings_for(root.path(), "etl_test_end_to_end");
    let handle = DbHandle::connect(&ConnectionConfig::from_env()).unwrap();

    let expected = prepare_dataset(&settings).unwrap().dataset;
    let summary = run(&settings, &handle).await.unwrap();
    // A second run replaces rather than appends.
    run(&settings, &handle).await.unwrap();

    assert_eq!(summary.rows, 2);
    assert_eq!(summary.rows_loaded, 2);
    let written = ingest::read_csv(&summary.output_path).unwrap();
    assert!(written.equals_missing(&expected));
    let stored = fetch_table(&handle, &settings.table_name).await.unwrap();
    assert!(stored.equals_missing(&expected));

    drop_table(&handle, &settings.table_name).await.unwrap();
    handle.close().await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn five_thousand_rows_load_with_an_empty_text_column() {
    dotenvy::dotenv().ok();
    let root = tempfile::tempdir().unwrap();
    write_volume_inputs(root.path());
    let settings = settings_for(root.path(), "etl_test_volume");
    let handle = DbHandle::connect(&ConnectionConfig::from_env()).unwrap();

    let summary = run(&settings, &handle).await.unwrap();

    assert_eq!(summary.files, 5);
    assert_eq!(summary.rows_loaded, 5000);
    let stored = fetch_table(&handle, &settings.table_name).await.unwrap();
    assert_eq!(stored.height(), 5000);
    assert_eq!(stored.get_column_names(), vec!["col1", "col2", "col3"]);
    assert_eq!(stored.column("col3").unwrap().dtype(), &DataType::String);
    assert_eq!(stored.column("col3").unwrap().null_count(), 5000);
    let col2: Vec<Option<i64>> = stored.column("col2").unwrap().i64().unwrap().into_iter().take(3).collect();
    assert_eq!(col2, vec![Some(1000), Some(1001), Some(1002)]);

    drop_table(&handle, &settings.table_name).await.unwrap();
    handle.close().await;
}
