// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Jenkins REST client (job listing, per-job details, build timings, test totals) behind a trait seam
// role: collector/jenkins-api
// inputs: EffectiveConfig (base URL, credentials); env JHR_TEST_* fixtures select the mock backend
// outputs: JobSnapshot values for the aggregator
// side_effects: Network calls to the Jenkins server; stderr diagnostics for degraded jobs
// invariants:
// - Startup connectivity (connect/probe) is fatal on failure; per-job fetch failures degrade to partial snapshots
// - Snapshot builds are ordered most recent first
// - A missing test report is a normal shape (None), never an error
// errors: HTTP and fixture-decode errors carry URL/fixture context; per-job errors are logged, not returned
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::cli::EffectiveConfig;
use crate::model::{BuildRef, JobSnapshot};
use crate::util::with_trailing_slash;

#[derive(Debug, Default, Deserialize)]
struct JobListing {
  #[serde(default)]
  jobs: Vec<JobRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobRef {
  pub name: String,
  #[serde(default)]
  pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
  #[serde(default)]
  pub last_build: Option<BuildRef>,
  #[serde(default)]
  pub builds: Vec<BuildRef>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BuildDetails {
  #[serde(default)]
  pub duration: i64,
  #[serde(default)]
  pub timestamp: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestReport {
  total_count: Option<i64>,
}

// --- Trait seam for the Jenkins API ---
pub trait JenkinsApi {
  /// Cheap connectivity check against the server root.
  fn probe(&self) -> Result<()>;
  fn list_jobs(&self) -> Result<Vec<JobRef>>;
  fn job_details(&self, job: &JobRef) -> Result<JobDetails>;
  fn build_details(&self, job: &JobRef, build_number: i64) -> Result<BuildDetails>;
  fn test_report_total(&self, job: &JobRef, build_number: i64) -> Result<Option<i64>>;
}

pub struct JenkinsHttpApi {
  agent: ureq::Agent,
  base: String,
  auth: Option<String>,
}

impl JenkinsHttpApi {
  pub fn new(base: &str, username: &str, password: &str) -> Self {
    let agent = ureq::AgentBuilder::new().timeout(Duration::from_secs(30)).build();

    let auth = if username.is_empty() {
      None
    } else {
      Some(format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password))))
    };

    Self {
      agent,
      base: with_trailing_slash(base),
      auth,
    }
  }

  fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
    let mut req = self
      .agent
      .get(url)
      .set("Accept", "application/json")
      .set("User-Agent", "jenkins-health-report");

    if let Some(auth) = &self.auth {
      req = req.set("Authorization", auth);
    }

    let resp = req.call().with_context(|| format!("GET {}", url))?;

    resp
      .into_json::<T>()
      .with_context(|| format!("decoding response from {}", url))
  }

  /// Absolute, slash-terminated base for one job's endpoints. Jenkins hands out
  /// absolute job URLs; fall back to the conventional path when one is missing.
  fn job_base(&self, job: &JobRef) -> String {
    if job.url.is_empty() {
      format!("{}job/{}/", self.base, job.name)
    } else {
      with_trailing_slash(&job.url)
    }
  }
}

impl JenkinsApi for JenkinsHttpApi {
  fn probe(&self) -> Result<()> {
    let _: serde_json::Value = self.get_json(&format!("{}api/json?tree=mode", self.base))?;
    Ok(())
  }

  fn list_jobs(&self) -> Result<Vec<JobRef>> {
    let listing: JobListing = self.get_json(&format!("{}api/json?tree=jobs[name,url]", self.base))?;
    Ok(listing.jobs)
  }

  fn job_details(&self, job: &JobRef) -> Result<JobDetails> {
    let url = format!("{}api/json?tree=lastBuild[number,url],builds[number,url]", self.job_base(job));
    self.get_json(&url)
  }

  fn build_details(&self, job: &JobRef, build_number: i64) -> Result<BuildDetails> {
    let url = format!("{}{}/api/json?tree=duration,timestamp", self.job_base(job), build_number);
    self.get_json(&url)
  }

  fn test_report_total(&self, job: &JobRef, build_number: i64) -> Result<Option<i64>> {
    let url = format!(
      "{}{}/testReport/api/json?tree=totalCount",
      self.job_base(job),
      build_number
    );

    // Builds without test results answer 404 here; treat any miss as "no report".
    match self.get_json::<TestReport>(&url) {
      Ok(report) => Ok(report.total_count),
      Err(_) => Ok(None),
    }
  }
}

pub struct JenkinsEnvApi;

impl JenkinsEnvApi {
  fn fixture(var: &str) -> Result<Option<serde_json::Value>> {
    match std::env::var(var) {
      Ok(s) => {
        let v = serde_json::from_str(&s).with_context(|| format!("parsing {} fixture", var))?;
        Ok(Some(v))
      }
      Err(_) => Ok(None),
    }
  }
}

impl JenkinsApi for JenkinsEnvApi {
  fn probe(&self) -> Result<()> {
    Ok(())
  }

  fn list_jobs(&self) -> Result<Vec<JobRef>> {
    match Self::fixture("JHR_TEST_JOBS_JSON")? {
      Some(v) => serde_json::from_value(v).context("decoding JHR_TEST_JOBS_JSON"),
      None => Ok(Vec::new()),
    }
  }

  fn job_details(&self, job: &JobRef) -> Result<JobDetails> {
    let Some(map) = Self::fixture("JHR_TEST_JOB_DETAILS_JSON")? else {
      bail!("JHR_TEST_JOB_DETAILS_JSON is not set");
    };

    match map.get(&job.name) {
      Some(entry) => serde_json::from_value(entry.clone())
        .with_context(|| format!("decoding JHR_TEST_JOB_DETAILS_JSON entry {:?}", job.name)),
      None => bail!("no JHR_TEST_JOB_DETAILS_JSON entry for {}", job.name),
    }
  }

  fn build_details(&self, job: &JobRef, build_number: i64) -> Result<BuildDetails> {
    let key = format!("{}#{}", job.name, build_number);

    let Some(map) = Self::fixture("JHR_TEST_BUILD_DETAILS_JSON")? else {
      bail!("JHR_TEST_BUILD_DETAILS_JSON is not set");
    };

    match map.get(&key) {
      Some(entry) => {
        serde_json::from_value(entry.clone()).with_context(|| format!("decoding JHR_TEST_BUILD_DETAILS_JSON entry {:?}", key))
      }
      None => bail!("no JHR_TEST_BUILD_DETAILS_JSON entry for {}", key),
    }
  }

  fn test_report_total(&self, job: &JobRef, _build_number: i64) -> Result<Option<i64>> {
    let Some(map) = Self::fixture("JHR_TEST_TEST_REPORT_JSON")? else {
      return Ok(None);
    };

    match map.get(&job.name) {
      Some(entry) => {
        let report: TestReport = serde_json::from_value(entry.clone())
          .with_context(|| format!("decoding JHR_TEST_TEST_REPORT_JSON entry {:?}", job.name))?;
        Ok(report.total_count)
      }
      None => Ok(None),
    }
  }
}

fn env_wants_mock() -> bool {
  std::env::var("JHR_TEST_JOBS_JSON").is_ok()
    || std::env::var("JHR_TEST_JOB_DETAILS_JSON").is_ok()
    || std::env::var("JHR_TEST_BUILD_DETAILS_JSON").is_ok()
    || std::env::var("JHR_TEST_TEST_REPORT_JSON").is_ok()
}

pub fn build_api(cfg: &EffectiveConfig) -> Box<dyn JenkinsApi> {
  if env_wants_mock() {
    Box::new(JenkinsEnvApi)
  } else {
    Box::new(JenkinsHttpApi::new(&cfg.url, &cfg.username, &cfg.password))
  }
}

/// Build the API backend and verify the server answers before any job work starts.
pub fn connect(cfg: &EffectiveConfig) -> Result<Box<dyn JenkinsApi>> {
  let api = build_api(cfg);
  api
    .probe()
    .with_context(|| format!("connecting to Jenkins at {}", cfg.url))?;
  Ok(api)
}

/// One snapshot per listed job. A listing failure is the caller's problem;
/// per-job fetch failures degrade that job to whatever was retrieved.
pub fn collect_snapshots(api: &dyn JenkinsApi) -> Result<Vec<JobSnapshot>> {
  let jobs = api.list_jobs()?;
  let mut snapshots = Vec::with_capacity(jobs.len());

  for job in &jobs {
    snapshots.push(snapshot_for(api, job));
  }

  Ok(snapshots)
}

fn snapshot_for(api: &dyn JenkinsApi, job: &JobRef) -> JobSnapshot {
  let mut snap = JobSnapshot {
    name: job.name.clone(),
    ..JobSnapshot::default()
  };

  let details = match api.job_details(job) {
    Ok(details) => details,
    Err(err) => {
      eprintln!("[jenkins] job {}: details unavailable: {:#}", job.name, err);
      return snap;
    }
  };

  let mut builds = details.builds;
  builds.sort_by(|a, b| b.number.cmp(&a.number));

  let last = details.last_build.or_else(|| builds.first().cloned());
  snap.builds = builds;

  let Some(last) = last else {
    return snap; // job exists but has never run
  };

  snap.last_build_number = last.number;

  match api.build_details(job, last.number) {
    Ok(build) => {
      snap.last_run_start_ms = Some(build.timestamp);
      snap.last_run_duration_ms = Some(build.duration);
    }
    Err(err) => {
      eprintln!("[jenkins] job {}: build #{} unavailable: {:#}", job.name, last.number, err);
    }
  }

  match api.test_report_total(job, last.number) {
    Ok(total) => snap.total_tests = total,
    Err(err) => {
      eprintln!("[jenkins] job {}: test report unavailable: {:#}", job.name, err);
    }
  }

  snap
}
