use anyhow::{bail, Result};
use std::path::PathBuf;
use vetl::VisitETL;

const USAGE: &str = "usage: vetl <input> <output> [--workers N] [--spill DIR] [--validate] [--quiet]";

fn main() -> Result<()> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut etl = VisitETL::new().progress_label("Scanning visits");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--workers" => {
                let n = args.next().unwrap_or_default();
                let n: usize = n.parse().map_err(|_| anyhow::anyhow!("--workers expects a number, got {n:?}"))?;
                etl = etl.workers(n);
            }
            "--spill" => {
                let Some(dir) = args.next() else { bail!("--spill expects a directory") };
                etl = etl.spill_dir(dir);
            }
            "--validate" => etl = etl.validate(true),
            "--quiet" => etl = etl.progress(false),
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ if output.is_none() => output = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument {arg:?}\n{USAGE}"),
        }
    }

    let (Some(input), Some(output)) = (input, output) else {
        bail!("{USAGE}");
    };

    let summary = etl.parse(&input, &output)?;
    println!(
        "{} records ({} short lines dropped) -> {} paths over {} days, {} workers",
        summary.records, summary.dropped_short, summary.paths, summary.days, summary.workers
    );
    Ok(())
}
