//! Result files and the sensitivity log
//!
//! Each integer driver can persist its verdict as
//! `<Driver>_Result_<timestamp>.txt`; the editor appends one record per
//! edit to `sensitivity_analysis_log.txt`. Write failures never abort a
//! solve that already finished in memory: they become final trace lines.
//!
//! Timestamps are epoch seconds supplied by the caller, so tests stay
//! deterministic.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use simplexlab_types::{Solution, Trace};

/// Write a driver result file; on failure, record it in the trace and
/// return `None`
pub fn write_driver_result(
    dir: &Path,
    driver: &str,
    solution: &Solution,
    trace: &mut Trace,
    timestamp: u64,
) -> Option<PathBuf> {
    let path = dir.join(format!("{}_Result_{}.txt", driver, timestamp));
    match fs::write(&path, render_result(driver, solution, trace)) {
        Ok(()) => {
            trace.step(format!("result written to {}", path.display()));
            Some(path)
        }
        Err(e) => {
            trace.step(format!("result file write failed: {}", e));
            None
        }
    }
}

/// Append one edit record to `sensitivity_analysis_log.txt`; failures
/// become trace lines
pub fn append_sensitivity_log(dir: &Path, entry: &str, trace: &mut Trace) {
    let path = dir.join("sensitivity_analysis_log.txt");
    let result = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| writeln!(f, "{}", entry));
    if let Err(e) = result {
        trace.step(format!("sensitivity log write failed: {}", e));
    }
}

fn render_result(driver: &str, solution: &Solution, trace: &Trace) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} result\n", driver));
    out.push_str(&format!("Status: {:?}\n", solution.status));
    out.push_str(&format!("Z = {:.6}\n", solution.z));
    // BTreeMap iteration is already sorted by label
    for (label, value) in &solution.x {
        out.push_str(&format!("  {} = {:.6}\n", label, value));
    }
    if let Some(note) = &solution.note {
        out.push_str(&format!("Note: {}\n", note));
    }
    out.push_str("Steps:\n");
    for (i, entry) in trace.entries().iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, entry));
    }
    out
}
