use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::timefmt::{self, TzChoice};
use crate::util;

#[derive(Parser, Debug)]
#[command(
  name = "jenkins-health-report",
  version,
  about = "Render a Jenkins job-health dashboard to an Excel workbook",
  long_about = None
)]
pub struct Cli {
  /// Jenkins base URL, e.g. https://ci.example.com/
  #[arg(long, env = "JENKINS_URL")]
  pub url: Option<String>,

  /// Username for HTTP basic auth (anonymous when omitted)
  #[arg(long, env = "JENKINS_USERNAME", default_value = "")]
  pub username: String,

  /// Password or API token paired with --username
  #[arg(long, env = "JENKINS_PASSWORD", default_value = "", hide_env_values = true)]
  pub password: String,

  /// Job names to leave out of the report (repeatable or comma separated)
  #[arg(long = "exclude", env = "JENKINS_EXCLUDE", value_delimiter = ',')]
  pub exclude: Vec<String>,

  /// The reporting tool's own Jenkins job name; never reported on
  #[arg(long, default_value = "JenkinsReporting")]
  pub self_job: String,

  /// Directory the workbook is written into (created when missing)
  #[arg(long, default_value = "build/jenkins-health-report")]
  pub out_dir: PathBuf,

  /// Timezone for started/ended labels: local, utc, or an IANA name
  #[arg(long, default_value = "local")]
  pub tz: String,

  /// Print one line per job while collecting
  #[arg(long)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for elapsed labels (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub url: String, // slash-terminated for endpoint joining
  pub username: String,
  pub password: String,
  pub excluded: BTreeSet<String>, // the tool's own job plus configured names
  pub out_dir: PathBuf,
  pub tz: TzChoice,
  pub verbose: bool,
  pub now_override_ms: Option<i64>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Server coordinates
  let url = match cli.url.as_deref().map(str::trim) {
    Some(u) if !u.is_empty() => util::with_trailing_slash(u),
    _ => bail!("Provide --url (or set JENKINS_URL) pointing at the Jenkins server"),
  };

  if !url.starts_with("http://") && !url.starts_with("https://") {
    bail!("Jenkins URL must start with http:// or https://, got {:?}", url);
  }

  // Exclusions: the tool's own job plus any configured names
  let mut excluded: BTreeSet<String> = cli
    .exclude
    .iter()
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .collect();

  let self_job = cli.self_job.trim();
  if !self_job.is_empty() {
    excluded.insert(self_job.to_string());
  }

  let tz = timefmt::resolve_tz(&cli.tz)?;

  let now_override_ms = match cli.now_override.as_deref() {
    Some(s) => Some(timefmt::parse_now_override(s)?),
    None => None,
  };

  Ok(EffectiveConfig {
    url,
    username: cli.username,
    password: cli.password,
    excluded,
    out_dir: cli.out_dir,
    tz,
    verbose: cli.verbose,
    now_override_ms,
  })
}
