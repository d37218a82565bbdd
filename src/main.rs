//! Speedup Plot - regenerates the prefetching report figures
//!
//! Writes `embedding_size_speedup.png` and `prefetch_speedup.png` into the
//! working directory.

use anyhow::{Context, Result};
use rayon::prelude::*;
use speedup_plot::data::datasets;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let jobs = datasets::report_jobs().context("Invalid report dataset")?;

    // Every render owns its figure, so the charts can be drawn side by side.
    let results: Vec<_> = jobs
        .par_iter()
        .map(|job| {
            job.run()
                .with_context(|| format!("Failed to render '{}'", job.name))
        })
        .collect();

    for result in results {
        let result = result?;
        println!("{}", result.output_path.display());
    }

    Ok(())
}
