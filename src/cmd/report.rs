//! Human-readable console output for analysis results

use console::style;

use crate::fmt::{format_currency, format_percent, CHART, INFO, MONEY, WARNING};
use crate::pipeline::AnalysisReport;
use crate::recommend::{Recommendation, Severity};

/// Skipped rows listed before the rest are summarized
const MAX_ROW_ERRORS_SHOWN: usize = 5;

/// Print the summary, breakdowns and ranked recommendations
pub fn print_report(report: &AnalysisReport, top: Option<usize>) {
    print!("{}", render_report(report, top));
}

/// Render the console report to a string
pub fn render_report(report: &AnalysisReport, top: Option<usize>) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", CHART, style("Cost Summary").bold()));
    out.push_str(&format!(
        "   Total spend:       {}\n",
        style(format_currency(report.total_cost)).bold()
    ));
    out.push_str(&format!(
        "   Potential savings: {} / month ({} of spend, {} / year)\n",
        style(format_currency(report.total_savings)).green().bold(),
        format_percent(report.savings_percentage),
        format_currency(report.total_annual_savings())
    ));
    out.push_str(&format!(
        "   Rows processed:    {} of {}\n\n",
        report.processed_rows, report.total_rows
    ));

    if !report.services.is_empty() {
        out.push_str(&format!("{}  By service:\n", INFO));
        let mut services: Vec<_> = report.services.iter().collect();
        services.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (service, cost) in services {
            out.push_str(&format!(
                "   {} {:<16} {:>14}\n",
                style("•").dim(),
                service,
                format_currency(*cost)
            ));
        }
        out.push('\n');
    }

    if !report.periods.is_empty() {
        out.push_str(&format!("{}  By month:\n", INFO));
        for (period, cost) in &report.periods {
            out.push_str(&format!(
                "   {} {:<16} {:>14}\n",
                style("•").dim(),
                period.to_string(),
                format_currency(*cost)
            ));
        }
        out.push('\n');
    }

    if !report.row_errors.is_empty() {
        out.push_str(&format!(
            "{} {} row(s) skipped:\n",
            WARNING,
            style(report.skipped_rows).yellow().bold()
        ));
        for err in report.row_errors.iter().take(MAX_ROW_ERRORS_SHOWN) {
            out.push_str(&format!("   {} {}\n", style("•").dim(), err));
        }
        if report.row_errors.len() > MAX_ROW_ERRORS_SHOWN {
            out.push_str(&format!(
                "   {} and {} more\n",
                style("•").dim(),
                report.row_errors.len() - MAX_ROW_ERRORS_SHOWN
            ));
        }
        out.push('\n');
    }

    if report.recommendations.is_empty() {
        out.push_str(&format!(
            "{} {}\n",
            MONEY,
            style("No optimization opportunities found").green()
        ));
        return out;
    }

    let shown = top
        .unwrap_or(report.recommendations.len())
        .min(report.recommendations.len());
    out.push_str(&format!(
        "{} {} ({} of {})\n",
        MONEY,
        style("Recommendations").bold(),
        shown,
        report.recommendations.len()
    ));
    for rec in report.recommendations.iter().take(shown) {
        out.push_str(&render_recommendation(rec));
    }

    out
}

fn render_recommendation(rec: &Recommendation) -> String {
    let severity = match rec.severity {
        Severity::High => style(rec.severity.as_str()).red().bold(),
        Severity::Medium => style(rec.severity.as_str()).yellow().bold(),
        Severity::Low => style(rec.severity.as_str()).dim(),
    };

    let mut out = format!(
        "\n  {} [{}] {} {}\n",
        style(format!("#{}", rec.id)).cyan().bold(),
        severity,
        style(&rec.title).bold(),
        style(format!("({})", rec.category.label())).dim()
    );
    out.push_str(&format!("     {}\n", rec.description));
    out.push_str(&format!(
        "     Save {} / month ({} / year), {} → {}\n",
        style(format_currency(rec.estimated_monthly_savings)).green(),
        format_currency(rec.estimated_annual_savings()),
        format_currency(rec.current_monthly_cost),
        format_currency(rec.projected_monthly_cost)
    ));
    out.push_str(&format!(
        "     Confidence {:.1}%, {} resource(s)\n",
        rec.confidence, rec.affected_resource_count
    ));
    out.push_str(&format!("     {} {}\n", style("Action:").dim(), rec.action));
    out
}
