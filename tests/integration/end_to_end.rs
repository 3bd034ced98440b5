use crate::common;
use predicates::prelude::*;

#[test]
fn writes_a_workbook_and_reports_the_job_count() {
  let td = tempfile::TempDir::new().unwrap();
  let out_dir = td.path().join("reports");
  let env = common::fixture_env(&common::two_job_fixture());

  let out = common::report_cmd(&env, &out_dir).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["jobs"], 2);

  let file = v["file"].as_str().unwrap();
  assert!(file.ends_with("jenkins-health-report.xlsx"));

  // xlsx is a zip container
  let bytes = std::fs::read(file).unwrap();
  assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn listing_failure_still_produces_an_empty_report() {
  let td = tempfile::TempDir::new().unwrap();
  let env = vec![("JHR_TEST_JOBS_JSON".to_string(), "not json".to_string())];

  let out = common::report_cmd(&env, td.path()).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("[jenkins] no jobs to report on"));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["jobs"], 0);
  assert!(std::path::Path::new(v["file"].as_str().unwrap()).exists());
}

#[test]
fn unreachable_server_fails_with_a_diagnostic() {
  let td = tempfile::TempDir::new().unwrap();

  let mut cmd = common::bin();
  cmd.args(["--url", "http://127.0.0.1:9/", "--out-dir"]).arg(td.path());

  cmd
    .assert()
    .failure()
    .stderr(predicate::str::contains("connecting to Jenkins at http://127.0.0.1:9/"));

  assert!(!td.path().join("jenkins-health-report.xlsx").exists());
}

#[test]
fn missing_url_is_rejected_up_front() {
  common::bin()
    .assert()
    .failure()
    .stderr(predicate::str::contains("Provide --url"));
}

#[test]
fn unknown_timezone_is_rejected() {
  let mut cmd = common::bin();
  cmd.args(["--url", "http://ci.invalid/", "--tz", "Mars/Olympus_Mons"]);

  cmd
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown timezone"));
}

#[test]
fn nested_output_directories_are_created() {
  let td = tempfile::TempDir::new().unwrap();
  let out_dir = td.path().join("build").join("ci").join("health");
  let env = common::fixture_env(&common::two_job_fixture());

  let out = common::report_cmd(&env, &out_dir).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  assert!(out_dir.join("jenkins-health-report.xlsx").exists());
}
