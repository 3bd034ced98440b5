// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Pure time-label helpers: elapsed decomposition, 12-hour clock labels, test-injectable "now"
// role: utilities/time
// inputs: Epoch milliseconds; TzChoice resolved from CLI text
// outputs: Stable label strings consumed by the aggregator
// invariants:
// - No process-wide time state; "now" is always an explicit parameter
// - elapsed_since truncates (no rounding) and clamps negative deltas to zero
// - clock labels use a 12-hour clock with hour 0 shown as 12 and two-digit minutes
// errors: resolve_tz/parse_now_override reject bad input; label functions never fail on valid epochs
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, TimeZone, Timelike, Utc};

const MS_PER_MIN: i64 = 1000 * 60;
const MS_PER_HOUR: i64 = MS_PER_MIN * 60;
const MS_PER_DAY: i64 = MS_PER_HOUR * 24;

/// Timezone the started/ended labels are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TzChoice {
  Local,
  Utc,
  Named(chrono_tz::Tz),
}

/// Resolve CLI timezone text: "local", "utc", or an IANA name.
pub fn resolve_tz(s: &str) -> Result<TzChoice> {
  if s.eq_ignore_ascii_case("local") {
    return Ok(TzChoice::Local);
  }

  if s.eq_ignore_ascii_case("utc") {
    return Ok(TzChoice::Utc);
  }

  match s.parse::<chrono_tz::Tz>() {
    Ok(zone) => Ok(TzChoice::Named(zone)),
    Err(_) => bail!("unknown timezone {:?}; use local, utc, or an IANA name like America/Chicago", s),
  }
}

/// Time since `start_ms`, decomposed into whole days, hours within the day and
/// minutes within the hour. All three components are always shown, zeros
/// included, and the label keeps its historical trailing space.
pub fn elapsed_since(now_ms: i64, start_ms: i64) -> String {
  // Future timestamps clamp to zero elapsed.
  let passed = (now_ms - start_ms).max(0);
  let minutes = (passed / MS_PER_MIN) % 60;
  let hours = (passed / MS_PER_HOUR) % 24;
  let days = passed / MS_PER_DAY;

  format!("{} days {} hr {} min ", days, hours, minutes)
}

fn format_clock<T: Datelike + Timelike>(dt: &T) -> String {
  let (is_pm, hour) = dt.hour12();
  let meridiem = if is_pm { "pm" } else { "am" };

  format!("{}/{}/{}, {}:{:02}{}", dt.month(), dt.day(), dt.year(), hour, dt.minute(), meridiem)
}

/// Render an epoch millisecond instant as `M/D/YYYY, H:MMam|pm` in the chosen zone.
pub fn clock_label(epoch_ms: i64, tz: TzChoice) -> String {
  match tz {
    TzChoice::Local => {
      let dt = Local.timestamp_millis_opt(epoch_ms).single().unwrap();
      format_clock(&dt)
    }
    TzChoice::Utc => {
      let dt = Utc.timestamp_millis_opt(epoch_ms).single().unwrap();
      format_clock(&dt)
    }
    TzChoice::Named(zone) => {
      let dt_utc = Utc.timestamp_millis_opt(epoch_ms).single().unwrap();
      format_clock(&zone.from_utc_datetime(&dt_utc.naive_utc()))
    }
  }
}

/// Clock label for the instant a run finished.
pub fn end_clock_label(start_ms: i64, duration_ms: i64, tz: TzChoice) -> String {
  clock_label(start_ms + duration_ms, tz)
}

/// Returns the effective "now" in epoch milliseconds given an optional override.
///
/// Centralizes test determinism so the wall clock is read in exactly one place.
pub fn effective_now_ms(override_ms: Option<i64>) -> i64 {
  override_ms.unwrap_or_else(|| Utc::now().timestamp_millis())
}

/// Parse the hidden `--now-override` value: epoch milliseconds or RFC3339.
pub fn parse_now_override(s: &str) -> Result<i64> {
  if let Ok(ms) = s.parse::<i64>() {
    return Ok(ms);
  }

  let dt = chrono::DateTime::parse_from_rfc3339(s)
    .with_context(|| format!("invalid --now-override {:?}; use epoch milliseconds or RFC3339", s))?;

  Ok(dt.timestamp_millis())
}
