// Integration tests enforcing the --json stdout contract and exit codes.
//
// stdout from --json commands must be exactly one JSON value; summaries and
// logs go to stderr.
//
// Run with: cargo test -p mushaf-cli --test json_contract_tests -- --nocapture

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn mushaf() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mushaf"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn run(args: &[&str]) -> Output {
    mushaf().args(args).output().expect("run mushaf")
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");

    serde_json::from_str(trimmed)
        .unwrap_or_else(|e| panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed))
}

fn json_ok(args: &[&str]) -> serde_json::Value {
    let output = run(args);
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    assert_single_json(&String::from_utf8_lossy(&output.stdout))
}

const QURAN_JOB: &str = "tests/fixtures/quran.mushaf.toml";
const TEFSIR_JOB: &str = "tests/fixtures/tefsir.mushaf.toml";

// ===========================================================================
// coverage
// ===========================================================================

#[test]
fn coverage_json_reports_verse_scope() {
    let val = json_ok(&["coverage", QURAN_JOB, "translation", "--json"]);
    assert_eq!(val["source"], "translation");
    assert_eq!(val["scope"], "verse");
    assert_eq!(val["report"]["total_expected"], 6236);
    assert_eq!(val["report"]["found"], 10);
    assert_eq!(val["report"]["missing"][0], "1:4");

    let partial = val["partial_surahs"].as_array().expect("partial_surahs array");
    assert_eq!(partial[0], serde_json::json!({"surah": 1, "expected": 7, "found": 3}));
}

#[test]
fn coverage_auto_detects_surah_scope() {
    let val = json_ok(&["coverage", QURAN_JOB, "tafsir", "--json"]);
    assert_eq!(val["scope"], "surah");
    assert_eq!(val["report"]["found"], 2);
    assert_eq!(val["report"]["total_expected"], 114);
}

#[test]
fn coverage_strict_fails_on_missing_verses() {
    let output = run(&["coverage", QURAN_JOB, "translation", "--strict"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(output.stdout.is_empty(), "no --json means nothing on stdout");
}

#[test]
fn coverage_orphans_are_reported() {
    let val = json_ok(&["coverage", QURAN_JOB, "bundle_translations", "--json"]);
    assert_eq!(val["report"]["orphans"], serde_json::json!(["2:287"]));
}

// ===========================================================================
// ranges / duplicates / similar
// ===========================================================================

#[test]
fn ranges_json_is_keyed_by_label() {
    let val = json_ok(&["ranges", QURAN_JOB, "translation", "--json"]);
    assert_eq!(val["metadata"]["total_ranges"], 2);
    assert_eq!(val["metadata"]["total_affected_verses"], 6);
    assert_eq!(val["ranges"]["2:1-3"]["verse_count"], 3);
    assert_eq!(val["ranges"]["37:1-3"]["start_verse"], 1);
}

#[test]
fn ranges_output_file_matches_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ranges.json");
    let val = json_ok(&["ranges", QURAN_JOB, "translation", "--json", "--output", path.to_str().unwrap()]);
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, val);
}

#[test]
fn duplicates_need_differing_originals() {
    let val = json_ok(&["duplicates", QURAN_JOB, "translation", "original", "--json"]);
    assert_eq!(val["total_groups"], 1);
    assert_eq!(val["duplicates"][0]["surah"], 37);
    assert_eq!(val["duplicates"][0]["distinct_source_count"], 3);
}

#[test]
fn similar_lists_shared_word_verses() {
    let val = json_ok(&["similar", QURAN_JOB, "translation", "37:1", "--json"]);
    assert_eq!(val["target"], "37:1");
    let keys: Vec<&str> = val["similar"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["verse_key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["37:2", "37:3"]);
}

#[test]
fn similar_rejects_bad_key() {
    let output = run(&["similar", QURAN_JOB, "translation", "2:x"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("hint:"), "stderr: {stderr}");
}

// ===========================================================================
// quality / references
// ===========================================================================

#[test]
fn quality_counts_html_leftovers() {
    let val = json_ok(&["quality", QURAN_JOB, "translation", "--json"]);
    assert_eq!(val["html"]["span_tag_issues"], 1);
    assert_eq!(val["html"]["samples"]["span"][0], "2:4");
    assert_eq!(val["encoding"]["encoding_issues"], 0);

    let strict = run(&["quality", QURAN_JOB, "translation", "--json", "--strict"]);
    assert_eq!(strict.status.code(), Some(6));
    // The report is still printed before the strict exit.
    assert_single_json(&String::from_utf8_lossy(&strict.stdout));
}

#[test]
fn references_match_commentary() {
    let val = json_ok(&["references", QURAN_JOB, "bundle_translations", "commentary", "--json"]);
    assert_eq!(val["translations_with_references"], 1);
    assert_eq!(val["translations_with_commentary"], 1);
    assert_eq!(val["match_rate"], 100.0);
    assert_eq!(val["orphan_refs_count"], 0);
}

// ===========================================================================
// merge
// ===========================================================================

#[test]
fn merge_writes_artifact_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merged.json");
    let val = json_ok(&["merge", TEFSIR_JOB, "--json", "--output", path.to_str().unwrap()]);

    assert_eq!(val["entries"], 3);
    assert_eq!(val["stats"]["from_primary"], 2);
    assert_eq!(val["stats"]["from_secondary_preferred"], 1);
    assert_eq!(val["stats"]["gap_filled"], 0);
    assert!(val["stats"]["cleaned_chars"].as_u64().unwrap() > 0);
    assert_eq!(val["check"]["scope"], "surah");
    assert_eq!(val["check"]["report"]["found"], 3);

    let artifact: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(artifact["metadata"]["source"], "Elmalılı Hamdi Yazır");
    assert_eq!(artifact["metadata"]["orphans"], serde_json::json!([]));
    assert_eq!(artifact["surahs"]["1"]["tefsir"], "Kur'an'ın özü.");
    assert_eq!(artifact["surahs"]["2"]["tefsir"], "Bakara tefsiri burada.\nDevamı.");
    assert_eq!(artifact["surahs"]["3"]["name"], "Âl-i İmrân");
}

#[test]
fn merge_strict_fails_on_missing_surahs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("merged.json");
    let output = run(&["merge", TEFSIR_JOB, "--strict", "--output", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(6));
    // The artifact is written before the check fails.
    assert!(path.exists());
}

#[test]
fn merge_without_output_path_is_usage_error() {
    let output = run(&["merge", TEFSIR_JOB]);
    assert_eq!(output.status.code(), Some(2));
}

// ===========================================================================
// clean / validate
// ===========================================================================

#[test]
fn clean_file_to_stdout() {
    let output = run(&["clean", "tests/fixtures/noisy_page.txt"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Bakara suresi tefsiri.\nDevamı burada.\n");
}

#[test]
fn clean_stdin_json() {
    let mut child = mushaf()
        .args(["clean", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn mushaf clean");
    child
        .stdin
        .take()
        .unwrap()
        .write_all("Allah Sh14 rahmandır".as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["text"], "Allah rahmandır");
    assert_eq!(val["removed_chars"], 5);
}

#[test]
fn validate_json() {
    let val = json_ok(&["validate", TEFSIR_JOB, "--json"]);
    assert_eq!(val["valid"], true);
    assert_eq!(val["name"], "elmalili");
    assert_eq!(val["sources"]["old_backup"]["shape"], "surah_dict");
    assert_eq!(val["merge"]["prefer_secondary"], serde_json::json!(["2"]));
}

// ===========================================================================
// exit codes
// ===========================================================================

#[test]
fn invalid_job_is_config_error() {
    let output = run(&["validate", "tests/fixtures/invalid.mushaf.toml"]);
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown source 'missing'"), "stderr: {stderr}");
}

#[test]
fn missing_job_is_config_error() {
    let output = run(&["validate", "tests/fixtures/nope.mushaf.toml"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn unknown_source_is_usage_error() {
    let output = run(&["coverage", QURAN_JOB, "arabic"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("hint:  sources in this job:"), "stderr: {stderr}");
}

#[test]
fn malformed_key_is_parse_error() {
    let output = run(&["coverage", QURAN_JOB, "bad", "--json"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
}
