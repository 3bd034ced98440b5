use crate::common;

fn job_count(stdout: &[u8]) -> i64 {
  let v: serde_json::Value = serde_json::from_slice(stdout).unwrap();
  v["jobs"].as_i64().unwrap()
}

#[test]
fn the_reporting_job_itself_never_appears() {
  let td = tempfile::TempDir::new().unwrap();

  let mut jobs = common::two_job_fixture();
  jobs.push(common::JobFixture {
    name: "JenkinsReporting",
    last_build: 3,
    duration_ms: 900,
    start_ms: common::START_MS,
    total_tests: None,
  });

  let out = common::report_cmd(&common::fixture_env(&jobs), td.path()).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(job_count(&out.stdout), 2);
}

#[test]
fn a_custom_self_job_name_is_honored() {
  let td = tempfile::TempDir::new().unwrap();

  let jobs = vec![
    common::JobFixture {
      name: "app",
      last_build: 1,
      duration_ms: 100,
      start_ms: common::START_MS,
      total_tests: Some(3),
    },
    common::JobFixture {
      name: "watchdog",
      last_build: 9,
      duration_ms: 100,
      start_ms: common::START_MS,
      total_tests: None,
    },
  ];

  let mut cmd = common::report_cmd(&common::fixture_env(&jobs), td.path());
  cmd.args(["--self-job", "watchdog"]);

  let out = cmd.output().unwrap();
  assert!(out.status.success());
  assert_eq!(job_count(&out.stdout), 1);
}

#[test]
fn exclude_flag_removes_further_jobs() {
  let td = tempfile::TempDir::new().unwrap();

  let mut cmd = common::report_cmd(&common::fixture_env(&common::two_job_fixture()), td.path());
  cmd.args(["--exclude", "build-B"]);

  let out = cmd.output().unwrap();
  assert!(out.status.success());
  assert_eq!(job_count(&out.stdout), 1);
}

#[test]
fn comma_separated_excludes_can_empty_the_report() {
  let td = tempfile::TempDir::new().unwrap();

  let mut cmd = common::report_cmd(&common::fixture_env(&common::two_job_fixture()), td.path());
  cmd.args(["--exclude", "build-A,build-B"]);

  let out = cmd.output().unwrap();
  assert!(out.status.success());
  assert_eq!(job_count(&out.stdout), 0);
  assert!(td.path().join("jenkins-health-report.xlsx").exists());
}

#[test]
fn exclude_env_var_filters_like_the_flag() {
  let td = tempfile::TempDir::new().unwrap();

  let mut cmd = common::report_cmd(&common::fixture_env(&common::two_job_fixture()), td.path());
  cmd.env("JENKINS_EXCLUDE", "scratch,build-B");

  let out = cmd.output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(job_count(&out.stdout), 1);
}

#[test]
fn verbose_logs_one_line_per_job() {
  let td = tempfile::TempDir::new().unwrap();

  let mut cmd = common::report_cmd(&common::fixture_env(&common::two_job_fixture()), td.path());
  cmd.arg("--verbose");

  let out = cmd.output().unwrap();
  assert!(out.status.success());

  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("[report] job build-A: last build 42"));
  assert!(stderr.contains("[report] job build-B: last build 7"));
}

#[test]
fn never_run_jobs_still_get_a_row() {
  let td = tempfile::TempDir::new().unwrap();

  let env = vec![
    (
      "JHR_TEST_JOBS_JSON".to_string(),
      serde_json::json!([{ "name": "idle" }]).to_string(),
    ),
    (
      "JHR_TEST_JOB_DETAILS_JSON".to_string(),
      serde_json::json!({"idle": {"lastBuild": null, "builds": []}}).to_string(),
    ),
  ];

  let out = common::report_cmd(&env, td.path()).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  assert_eq!(job_count(&out.stdout), 1);
}

#[test]
fn partially_fetchable_jobs_degrade_instead_of_failing() {
  let td = tempfile::TempDir::new().unwrap();

  // Listing names two jobs; details exist for neither, so both rows degrade
  // to name-only entries and the run still succeeds.
  let env = vec![
    (
      "JHR_TEST_JOBS_JSON".to_string(),
      serde_json::json!([{ "name": "alpha" }, { "name": "beta" }]).to_string(),
    ),
    ("JHR_TEST_JOB_DETAILS_JSON".to_string(), "{}".to_string()),
  ];

  let out = common::report_cmd(&env, td.path()).output().unwrap();
  assert!(out.status.success());
  assert_eq!(job_count(&out.stdout), 2);

  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("[jenkins] job alpha: details unavailable"));
  assert!(stderr.contains("[jenkins] job beta: details unavailable"));
}
