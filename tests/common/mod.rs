use std::path::Path;

use assert_cmd::Command;

/// Fixture epoch: 2023-11-14T22:13:20Z.
#[allow(dead_code)]
pub const START_MS: i64 = 1_700_000_000_000;

/// One day, one hour, one minute and one second after `START_MS`.
#[allow(dead_code)]
pub const NOW_MS: i64 = START_MS + 90_061_000;

#[allow(dead_code)]
pub struct JobFixture {
  pub name: &'static str,
  pub last_build: i64,
  pub duration_ms: i64,
  pub start_ms: i64,
  pub total_tests: Option<i64>,
}

#[allow(dead_code)]
pub fn two_job_fixture() -> Vec<JobFixture> {
  vec![
    JobFixture {
      name: "build-A",
      last_build: 42,
      duration_ms: 5000,
      start_ms: START_MS,
      total_tests: None,
    },
    JobFixture {
      name: "build-B",
      last_build: 7,
      duration_ms: 61_000,
      start_ms: START_MS - 3_600_000,
      total_tests: Some(250),
    },
  ]
}

/// Env vars that point the binary's collector at in-process fixtures instead
/// of a live Jenkins server.
#[allow(dead_code)]
pub fn fixture_env(jobs: &[JobFixture]) -> Vec<(String, String)> {
  let listing: Vec<serde_json::Value> = jobs.iter().map(|j| serde_json::json!({ "name": j.name })).collect();

  let mut details = serde_json::Map::new();
  let mut builds = serde_json::Map::new();
  let mut reports = serde_json::Map::new();

  for j in jobs {
    details.insert(
      j.name.to_string(),
      serde_json::json!({
        "lastBuild": {"number": j.last_build, "url": ""},
        "builds": [{"number": j.last_build, "url": ""}]
      }),
    );

    builds.insert(
      format!("{}#{}", j.name, j.last_build),
      serde_json::json!({"duration": j.duration_ms, "timestamp": j.start_ms}),
    );

    if let Some(total) = j.total_tests {
      reports.insert(j.name.to_string(), serde_json::json!({ "totalCount": total }));
    }
  }

  vec![
    ("JHR_TEST_JOBS_JSON".to_string(), serde_json::Value::Array(listing).to_string()),
    (
      "JHR_TEST_JOB_DETAILS_JSON".to_string(),
      serde_json::Value::Object(details).to_string(),
    ),
    (
      "JHR_TEST_BUILD_DETAILS_JSON".to_string(),
      serde_json::Value::Object(builds).to_string(),
    ),
    (
      "JHR_TEST_TEST_REPORT_JSON".to_string(),
      serde_json::Value::Object(reports).to_string(),
    ),
  ]
}

/// Binary invocation with fixture env, deterministic now, and UTC labels.
#[allow(dead_code)]
pub fn report_cmd(env: &[(String, String)], out_dir: &Path) -> Command {
  let mut cmd = bin();

  cmd
    .args(["--url", "http://ci.invalid/", "--out-dir"])
    .arg(out_dir)
    .args(["--tz", "utc", "--now-override", &NOW_MS.to_string()]);

  for (key, value) in env {
    cmd.env(key, value);
  }

  cmd
}

/// Bare binary invocation with any ambient fixture vars scrubbed.
#[allow(dead_code)]
pub fn bin() -> Command {
  let mut cmd = Command::cargo_bin("jenkins-health-report").unwrap();

  cmd
    .env_remove("JENKINS_URL")
    .env_remove("JENKINS_USERNAME")
    .env_remove("JENKINS_PASSWORD")
    .env_remove("JENKINS_EXCLUDE")
    .env_remove("JHR_TEST_JOBS_JSON")
    .env_remove("JHR_TEST_JOB_DETAILS_JSON")
    .env_remove("JHR_TEST_BUILD_DETAILS_JSON")
    .env_remove("JHR_TEST_TEST_REPORT_JSON");

  cmd
}
