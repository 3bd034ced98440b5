use anyhow::Result;
use clap::Parser;

mod aggregate;
mod cli;
mod jenkins;
mod model;
mod render;
mod timefmt;
mod util;
mod workbook;

use crate::cli::{normalize, Cli};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: connect, collect, aggregate
  let api = jenkins::connect(&cfg)?;
  let ctx = aggregate::AggregateContext {
    excluded: &cfg.excluded,
    tz: cfg.tz,
    now_ms: timefmt::effective_now_ms(cfg.now_override_ms),
    verbose: cfg.verbose,
  };
  let table = aggregate::collect_and_aggregate(api.as_ref(), &ctx);

  // Phase 3: render and persist
  let workbook = render::Renderer::new(&cfg.url).render(&table)?;
  util::prepare_out_dir(&cfg.out_dir)?;
  let out_path = cfg.out_dir.join(render::REPORT_FILE_NAME);
  workbook.save(&out_path)?;

  println!(
    "{}",
    serde_json::to_string_pretty(&serde_json::json!({
      "file": out_path.display().to_string(),
      "jobs": table.len(),
    }))?
  );

  Ok(())
}
