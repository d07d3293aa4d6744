//! Trial reporting
//!
//! Gantree: L4_Benchmark → Reporter
//!
//! Markdown, JSON, CSV and plain-text renderings of trial results.

use crate::suite::{by_parameter, TrialResult, TrialStatistics};
use qest_core::{QestError, QestResult};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown table
    Markdown,
    /// JSON
    Json,
    /// CSV
    Csv,
    /// Plain text summary
    Text,
}

impl FromStr for ReportFormat {
    type Err = QestError;

    fn from_str(s: &str) -> QestResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "text" | "txt" => Ok(ReportFormat::Text),
            other => Err(QestError::ConfigError(format!(
                "unknown report format '{}'",
                other
            ))),
        }
    }
}

/// Trial reporter
/// Gantree: Reporter // 결과 리포팅
pub struct Reporter;

impl Reporter {
    // ========================================================================
    // Format Converters
    // ========================================================================

    /// Generate report in specified format
    pub fn report(results: &[TrialResult], format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => Self::to_markdown(results),
            ReportFormat::Json => Self::to_json(results),
            ReportFormat::Csv => Self::to_csv(results),
            ReportFormat::Text => Self::to_text(results),
        }
    }

    /// Convert results to Markdown tables
    pub fn to_markdown(results: &[TrialResult]) -> String {
        render(|out| {
            writeln!(out, "# QEST Trial Results\n")?;

            writeln!(out, "## Summary\n")?;
            writeln!(
                out,
                "| Parameter | Trials | Success | No unique | Mean err | Std err | Max err |"
            )?;
            writeln!(
                out,
                "|-----------|--------|---------|-----------|----------|---------|---------|"
            )?;
            for (p, s) in by_parameter(results) {
                writeln!(
                    out,
                    "| {} | {} | {:.1}% | {} | {:.2e} | {:.2e} | {:.2e} |",
                    p,
                    s.count,
                    s.success_rate * 100.0,
                    s.no_unique_count,
                    s.mean_abs_error,
                    s.std_abs_error,
                    s.max_abs_error
                )?;
            }

            writeln!(out, "\n## Detailed Results\n")?;
            writeln!(out, "| Name | Param | Truth | Estimate | Error | Samples | Time(ms) |")?;
            writeln!(out, "|------|-------|-------|----------|-------|---------|----------|")?;
            for r in results {
                let (estimate, error) = match (r.estimate, r.abs_error()) {
                    (Some(v), Some(e)) => (format!("{:.5}", v), format!("{:.2e}", e)),
                    _ if r.no_unique_solution => ("no unique".to_string(), "-".to_string()),
                    _ => ("failed".to_string(), "-".to_string()),
                };
                writeln!(
                    out,
                    "| {} | {} | {:.5} | {} | {} | {} | {} |",
                    r.name, r.parameter, r.truth, estimate, error, r.samples, r.time_ms
                )?;
            }
            Ok(())
        })
    }

    /// Convert results to JSON
    pub fn to_json(results: &[TrialResult]) -> String {
        let by_param: serde_json::Map<String, serde_json::Value> = by_parameter(results)
            .into_iter()
            .map(|(p, s)| {
                (
                    p.name().to_string(),
                    serde_json::to_value(s).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();

        let report = serde_json::json!({
            "statistics": TrialStatistics::from_results(results),
            "by_parameter": by_param,
            "results": results,
        });

        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Convert results to CSV
    pub fn to_csv(results: &[TrialResult]) -> String {
        render(|out| {
            writeln!(
                out,
                "name,parameter,omega,kappa,gamma1,gamma2,truth,estimate,abs_error,no_unique_solution,samples,seed,time_ms"
            )?;
            for r in results {
                let q = r.qubit.to_array();
                writeln!(
                    out,
                    "{},{},{},{},{},{},{},{},{},{},{},{},{}",
                    r.name,
                    r.parameter.name(),
                    q[0],
                    q[1],
                    q[2],
                    q[3],
                    r.truth,
                    r.estimate.map(|v| v.to_string()).unwrap_or_default(),
                    r.abs_error().map(|v| v.to_string()).unwrap_or_default(),
                    r.no_unique_solution,
                    r.samples,
                    r.seed,
                    r.time_ms
                )?;
            }
            Ok(())
        })
    }

    /// Convert results to plain text summary
    pub fn to_text(results: &[TrialResult]) -> String {
        render(|out| {
            let stats = TrialStatistics::from_results(results);

            writeln!(out, "QEST Trial Summary")?;
            writeln!(out, "==================")?;
            writeln!(
                out,
                "Trials: {} ({} succeeded, {} without unique answer)",
                stats.count, stats.successes, stats.no_unique_count
            )?;
            writeln!(out, "Total time: {:.2}s", stats.total_time_ms as f64 / 1000.0)?;

            for (p, s) in by_parameter(results) {
                writeln!(out)?;
                writeln!(out, "{} ({} trials)", p, s.count)?;
                writeln!(out, "  success rate : {:.1}%", s.success_rate * 100.0)?;
                writeln!(
                    out,
                    "  abs error    : {:.2e} ± {:.2e} (max {:.2e})",
                    s.mean_abs_error, s.std_abs_error, s.max_abs_error
                )?;
                writeln!(out, "  rel error    : {:.2}%", s.mean_rel_error * 100.0)?;
                writeln!(out, "  avg time     : {:.1} ms", s.avg_time_ms)?;
            }
            Ok(())
        })
    }

    // ========================================================================
    // Comparison Reports
    // ========================================================================

    /// Error against shot count, one line per trial
    pub fn sample_scaling_report(results: &[TrialResult]) -> String {
        render(|out| {
            writeln!(out, "| Samples | Truth | Estimate | Error | 1/√n |")?;
            writeln!(out, "|---------|-------|----------|-------|------|")?;
            for r in results {
                writeln!(
                    out,
                    "| {} | {:.5} | {} | {} | {:.2e} |",
                    r.samples,
                    r.truth,
                    r.estimate
                        .map(|v| format!("{:.5}", v))
                        .unwrap_or_else(|| "-".to_string()),
                    r.abs_error()
                        .map(|e| format!("{:.2e}", e))
                        .unwrap_or_else(|| "-".to_string()),
                    1.0 / (r.samples as f64).sqrt()
                )?;
            }
            Ok(())
        })
    }
}

/// Run a writer against a fresh string
fn render<F>(write: F) -> String
where
    F: FnOnce(&mut String) -> fmt::Result,
{
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write(&mut out);
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::QubitGenerator;
    use qest_core::Parameter;

    fn sample_results() -> Vec<TrialResult> {
        let qubit = QubitGenerator::reference().unwrap();
        vec![
            TrialResult {
                name: "a".to_string(),
                parameter: Parameter::Gamma1,
                qubit,
                truth: 0.3,
                estimate: Some(0.301),
                error: None,
                no_unique_solution: false,
                samples: 1_000_000,
                seed: 42,
                time_ms: 12,
            },
            TrialResult {
                name: "b".to_string(),
                parameter: Parameter::Omega,
                qubit,
                truth: 2.0,
                estimate: None,
                error: Some("Elimination ambiguous".to_string()),
                no_unique_solution: true,
                samples: 100_000,
                seed: 43,
                time_ms: 80,
            },
        ]
    }

    #[test]
    fn test_markdown() {
        let md = Reporter::to_markdown(&sample_results());
        assert!(md.contains("# QEST Trial Results"));
        assert!(md.contains("| γ₁ | 1 | 100.0% |"));
        assert!(md.contains("no unique"));
    }

    #[test]
    fn test_json() {
        let json = Reporter::to_json(&sample_results());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["statistics"]["count"], 2);
        assert_eq!(value["by_parameter"]["omega"]["no_unique_count"], 1);
        assert_eq!(value["results"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_csv() {
        let csv = Reporter::to_csv(&sample_results());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("name,parameter,omega"));
        assert!(lines[1].starts_with("a,gamma1,2,1,0.3,0.1,0.3,0.301,"));
        assert!(lines[2].contains(",,,true,"));
    }

    #[test]
    fn test_text() {
        let text = Reporter::report(&sample_results(), ReportFormat::Text);
        assert!(text.contains("Trials: 2 (1 succeeded, 1 without unique answer)"));
        assert!(text.contains("ω (1 trials)"));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
