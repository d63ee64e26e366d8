//! Tiny binary that runs a full report and prints deterministic output.
//!
//! Used by the cross-process determinism tests to show that the report does
//! not depend on process-level state (cwd, locale, env vars).
//!
//! Usage: `report_fixture <compiler> <corpus-dir> <output> <legacy|standard>`
//! Output: three lines, each `key=value`:
//!   `report_digest`=sha256:...
//!   `lines`=<count>
//!   `errors`=<count>

use bytecmp_report::config::{Protocol, ReportConfig};
use bytecmp_report::runner::run;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let usage = "usage: report_fixture <compiler> <corpus-dir> <output> <legacy|standard>";
    let compiler = args.get(1).expect(usage);
    let corpus_dir = args.get(2).expect(usage);
    let output = args.get(3).expect(usage);
    let protocol = match args.get(4).map(String::as_str) {
        Some("legacy") => Protocol::Legacy,
        Some("standard") => Protocol::Standard,
        _ => panic!("{usage}"),
    };

    let config = ReportConfig::new(compiler)
        .with_protocol(protocol)
        .with_corpus_dir(corpus_dir)
        .with_output(output);
    let summary = run(&config).unwrap_or_else(|e| panic!("report run failed: {e}"));

    println!("report_digest={}", summary.report.digest);
    println!("lines={}", summary.report.line_count);
    println!("errors={}", summary.report.sentinel_count);
}
