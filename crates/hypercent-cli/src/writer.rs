//! Result files.
//!
//! One file per (measure, representation):
//!
//! ```text
//! <out>/<MeasureDir>/<output_name>.<ungraph|cmty>.<measure>.txt
//!
//! <approx_memory_bytes> <elapsed_seconds>
//!
//! <external_id> <score>
//! ...
//! ```
//!
//! Rows cover real nodes only, in first-seen order. Scores and seconds are
//! written with 9 fractional digits.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use hypercent_core::{Graph, Representation};
use hypercent_metrics::{Measure, RepresentationReport, ScoreVector};
use tracing::debug;

/// Where the file for `measure` over `representation` lands.
pub fn result_path(
    out_dir: &Path,
    measure: Measure,
    output_name: &str,
    representation: Representation,
) -> PathBuf {
    out_dir.join(measure.dir_name()).join(format!(
        "{output_name}.{}.{}.txt",
        representation.file_tag(),
        measure.file_suffix()
    ))
}

/// Write one score table in the result-file layout.
pub fn write_scores(
    w: &mut impl Write,
    graph: &Graph,
    scores: &ScoreVector,
    memory_bytes: usize,
    elapsed: Duration,
) -> io::Result<()> {
    writeln!(w, "{memory_bytes} {:.9}", elapsed.as_secs_f64())?;
    writeln!(w)?;
    for (id, score) in scores.iter_real(graph) {
        writeln!(w, "{id} {score:.9}")?;
    }
    Ok(())
}

/// Write every score vector of `report`, creating directories as needed.
///
/// Returns the paths written, in [`Measure::ALL`] order.
pub fn write_report(
    out_dir: &Path,
    output_name: &str,
    graph: &Graph,
    report: &RepresentationReport,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(report.scores.len());
    for scores in &report.scores {
        let path = result_path(out_dir, scores.measure, output_name, report.representation);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        write_scores(
            &mut w,
            graph,
            scores,
            report.approx_memory_bytes,
            report.elapsed,
        )
        .and_then(|()| w.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;

        debug!(path = %path.display(), "wrote result file");
        written.push(path);
    }
    Ok(written)
}
