use ironarc::config::{GenerationMode, PipelineConfig};
use ironarc::testing::{FixedNamesSource, sentinel_record, write_corrupt_archive};
use ironarc::*;
use std::collections::HashMap;
use std::fs;

#[test]
fn two_archives_of_alpha_beta_records() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let arch = tmp.path().join("arch");
    let out = tmp.path().join("csv");

    generate_archives_with(&arch, 2, 3, GenerationMode::Sequential, |i| {
        FixedNamesSource::new(i as u64, &["alpha", "beta"])
    })?;
    let tables = aggregate(&arch, Some(2))?;
    write_tables(&tables, &out)?;

    let levels = fs::read_to_string(out.join("levels.csv"))?;
    assert_eq!(levels.lines().count(), 7);
    assert_eq!(levels.lines().next(), Some("id,level"));

    let names = fs::read_to_string(out.join("names.csv"))?;
    assert_eq!(names.lines().next(), Some("id,object_name"));
    assert_eq!(names.lines().count(), 13);

    let rows = read_names(&out)?;
    let mut by_id: HashMap<_, Vec<String>> = HashMap::new();
    for row in rows {
        by_id.entry(row.id).or_default().push(row.object_name);
    }
    assert_eq!(by_id.len(), 6);
    for names in by_id.values() {
        assert_eq!(names, &["alpha", "beta"]);
    }

    let level_rows = read_levels(&out)?;
    assert!(level_rows.iter().all(|r| by_id.contains_key(&r.id)));
    assert!(level_rows.iter().all(|r| (1..=100).contains(&r.level)));
    Ok(())
}

#[test]
fn run_generates_and_aggregates() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let cfg = PipelineConfig {
        archive_count: 5,
        records_per_archive: 12,
        parallelism: Some(3),
        seed: Some(2024),
        generation_mode: GenerationMode::Parallel,
        ..PipelineConfig::new(tmp.path().join("a"), tmp.path().join("t"))
    };
    let summary = run(&cfg)?;

    assert_eq!(summary.archives_written, 5);
    assert_eq!(summary.records_written, 60);
    assert_eq!(summary.archives_read, 5);
    assert_eq!(summary.archives_skipped, 0);
    assert_eq!(summary.level_rows, 60);
    assert!(summary.name_rows >= 60 && summary.name_rows <= 600);

    assert_eq!(read_levels(tmp.path().join("t"))?.len(), 60);
    assert_eq!(read_names(tmp.path().join("t"))?.len(), summary.name_rows);
    Ok(())
}

#[test]
fn seeded_runs_produce_the_same_rows() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let mut results = Vec::new();
    for name in ["first", "second"] {
        let cfg = PipelineConfig {
            archive_count: 3,
            records_per_archive: 4,
            parallelism: Some(2),
            seed: Some(5),
            ..PipelineConfig::new(tmp.path().join(name).join("a"), tmp.path().join(name).join("t"))
        };
        run(&cfg)?;
        let mut levels = read_levels(&cfg.table_dir)?;
        levels.sort_by_key(|r| r.id);
        results.push(levels);
    }
    assert_eq!(results[0], results[1]);
    Ok(())
}

#[test]
fn table_dir_blocked_by_file_is_a_directory_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let blocked = tmp.path().join("t");
    fs::write(&blocked, "occupied")?;
    let cfg = PipelineConfig {
        archive_count: 1,
        records_per_archive: 1,
        ..PipelineConfig::new(tmp.path().join("a"), &blocked)
    };
    let err = run(&cfg).unwrap_err();
    assert!(matches!(err, PipelineError::Directory { .. }));
    Ok(())
}

#[test]
fn corrupt_archive_stops_run_before_any_table_is_written() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let cfg = PipelineConfig {
        archive_count: 4,
        records_per_archive: 6,
        parallelism: Some(3),
        seed: Some(11),
        ..PipelineConfig::new(tmp.path().join("a"), tmp.path().join("t"))
    };
    fs::create_dir_all(&cfg.archive_dir)?;
    let bad_path = cfg.archive_dir.join("zzz-stale.zip");
    let bad_entry = write_corrupt_archive(
        &bad_path,
        &[sentinel_record(70, 0, 1)],
        br#"<root><var name="level" value="3"/></root>"#,
    )?;

    let err = run(&cfg).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MalformedDocument { ref archive, ref entry, .. }
            if archive == &bad_path && entry == &bad_entry
    ));
    assert!(!cfg.table_dir.join("levels.csv").exists());
    assert!(!cfg.table_dir.join("names.csv").exists());
    Ok(())
}

#[test]
fn archive_roundtrip_through_public_api() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("one.zip");
    let mut g = RecordGenerator::seeded(8);
    let records: Vec<Record> = (0..9).map(|_| g.generate()).collect();
    write_archive(&path, &records)?;
    assert_eq!(read_archive(&path)?, records);
    assert_eq!(list_archives(tmp.path())?, vec![path]);
    Ok(())
}
