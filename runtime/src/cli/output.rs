//! Shared CLI output formatting: colors, symbols, report tables.

use crate::prediction::Prediction;
use crate::scoring::{Report, Severity};
use std::io::IsTerminal;

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() || std::env::var("SITEGRADE_NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    pub fn fail_sym(&self) -> &str {
        if self.use_color {
            "\x1b[31m\u{2717}\x1b[0m"
        } else {
            "!!"
        }
    }

    pub fn warn_sym(&self) -> &str {
        if self.use_color {
            "\x1b[33m\u{26a0}\x1b[0m"
        } else {
            "??"
        }
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn red(&self, s: &str) -> String {
        self.paint(RED, s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    pub fn cyan(&self, s: &str) -> String {
        self.paint(CYAN, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    /// Color a severity label by urgency.
    pub fn severity(&self, severity: Severity) -> String {
        let label = severity.as_str();
        match severity {
            Severity::Critical => self.red(label),
            Severity::Serious => self.yellow(label),
            Severity::Moderate => self.cyan(label),
            Severity::Minor | Severity::NotApplicable => self.dim(label),
        }
    }
}

pub fn print_header(s: &Styled) {
    eprintln!(
        "  {} {}",
        s.bold("Sitegrade"),
        s.dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    eprintln!();
}

pub fn print_section(s: &Styled, title: &str) {
    eprintln!("  {}", s.bold(title));
}

pub fn print_check(symbol: &str, label: &str, value: &str) {
    eprintln!("    {symbol} {label:<22} {value}");
}

pub fn print_detail(msg: &str) {
    eprintln!("        {msg}");
}

/// Format milliseconds as e.g. "850ms" or "12.4s".
pub fn format_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

/// Render a score, or "n/a" for the not-applicable sentinel.
pub fn format_score(score: f64) -> String {
    if score < 0.0 {
        "n/a".to_string()
    } else {
        format!("{score:.1}")
    }
}

/// Human-readable report summary on stderr.
pub fn print_report(s: &Styled, report: &Report) {
    print_section(
        s,
        &format!(
            "{}  grade {}  overall {:.2}  ({:.0}/100, {:.0}% compliant)",
            report.taxonomy,
            report.grade,
            report.overall,
            report.normalized_score,
            report.compliance_rate
        ),
    );
    for c in &report.categories {
        let sym = if c.scored_count == 0 {
            s.warn_sym()
        } else if c.compliant_count == c.scored_count {
            s.ok_sym()
        } else {
            s.fail_sym()
        };
        print_check(
            sym,
            &c.name,
            &format!("{} ({}/{} scored)", format_score(c.mean), c.scored_count, c.item_count),
        );
    }

    let actionable: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.severity != Severity::NotApplicable)
        .collect();
    if !actionable.is_empty() {
        eprintln!();
        eprintln!("    {}", s.bold("Issues"));
        let shown = if is_verbose() { actionable.len() } else { actionable.len().min(10) };
        for issue in &actionable[..shown] {
            eprintln!(
                "      [{}] {} {}",
                s.severity(issue.severity),
                issue.item_id,
                issue.description
            );
            if is_verbose() {
                print_detail(&issue.recommendation);
                for page in &issue.affected_pages {
                    print_detail(&s.dim(page));
                }
            }
        }
        if shown < actionable.len() {
            print_detail(&s.dim(&format!("... {} more (use --verbose)", actionable.len() - shown)));
        }
    }
    if !report.calibrations.is_empty() {
        print_detail(&s.dim(&format!("{} calibration override(s) applied", report.calibrations.len())));
    }
    eprintln!();
}

pub fn print_prediction(s: &Styled, prediction: &Prediction) {
    print_section(
        s,
        &format!(
            "prediction  {:.2} \u{00b1} {:.2}",
            prediction.score, prediction.spread
        ),
    );
    for p in &prediction.principles {
        print_check(s.dim("-").as_str(), p.id, &format!("{:.2}  {}", p.score, p.name));
    }
    let neighbors: Vec<String> = prediction
        .neighbors
        .iter()
        .map(|n| format!("{} ({:.0}%)", n.name, n.similarity))
        .collect();
    print_detail(&s.dim(&format!("nearest: {}", neighbors.join(", "))));
    eprintln!();
}

pub fn is_quiet() -> bool {
    std::env::var("SITEGRADE_QUIET").is_ok()
}

pub fn is_verbose() -> bool {
    std::env::var("SITEGRADE_VERBOSE").is_ok()
}

pub fn is_json() -> bool {
    std::env::var("SITEGRADE_JSON").is_ok()
}

/// Print JSON output to stdout.
pub fn print_json(value: &serde_json::Value) {
    if let Ok(s) = serde_json::to_string_pretty(value) {
        println!("{s}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_sentinel() {
        assert_eq!(format_score(-1.0), "n/a");
        assert_eq!(format_score(4.5), "4.5");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(850), "850ms");
        assert_eq!(format_ms(12_400), "12.4s");
    }

    #[test]
    fn test_plain_styling() {
        let s = Styled::plain();
        assert_eq!(s.red("x"), "x");
        assert_eq!(s.ok_sym(), "OK");
        assert_eq!(s.severity(Severity::Critical), "critical");
    }
}
