use crate::infra::seed_store;
use clap::Args;
use mtsk_core::config::AppConfig;
use mtsk_core::error::AppError;
use mtsk_core::report::{DashboardOverview, DetailedReportView, ReportLayout};
use mtsk_core::service::{AccessPolicy, DashboardService, Session};
use mtsk_core::store::DashboardStore;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Backend JSON export to report on
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Collapse the difference classes into a single FARK column
    #[arg(long)]
    pub(crate) compact: bool,
    /// Emit CSV instead of the text summary
    #[arg(long)]
    pub(crate) csv: bool,
    /// Operator e-mail (defaults to the configured admin)
    #[arg(long)]
    pub(crate) operator: Option<String>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        snapshot,
        compact,
        csv,
        operator,
    } = args;

    let config = AppConfig::load()?;
    let store = Arc::new(seed_store(Some(&snapshot))?);
    let service = DashboardService::new(
        store,
        AccessPolicy::new(config.dashboard.admin_email.clone()),
    );

    let operator = operator.unwrap_or(config.dashboard.admin_email);
    let session = service.open_session(&operator)?;
    let layout = if compact {
        ReportLayout::Compact
    } else {
        ReportLayout::Full
    };

    let outcome = write_report(&service, &session, layout, csv, &mut io::stdout().lock());
    service.close_session(session);
    outcome
}

/// Everything that can fail once a session is open; the caller closes it.
fn write_report<S, W>(
    service: &DashboardService<S>,
    session: &Session,
    layout: ReportLayout,
    csv: bool,
    out: &mut W,
) -> Result<(), AppError>
where
    S: DashboardStore + 'static,
    W: Write,
{
    let report = service.detailed_report(session)?;
    if csv {
        report.write_csv(out, layout)?;
    } else {
        let overview = service.overview(session)?;
        render_report(out, &report.summary(layout), &overview)?;
    }
    Ok(())
}

pub(crate) fn render_report<W: Write>(
    out: &mut W,
    report: &DetailedReportView,
    overview: &DashboardOverview,
) -> io::Result<()> {
    writeln!(out, "MTSK candidate report")?;
    writeln!(
        out,
        "Network totals: {} candidates, {} TL expected fees",
        overview.total_candidates, overview.total_fee
    )?;

    if let Some(school) = &overview.school {
        writeln!(out, "\nYour school: {}", school.name)?;
        writeln!(
            out,
            "  Candidates: {} | Fees: {} TL",
            school.candidates, school.fee
        )?;
        writeln!(
            out,
            "  Remaining B quota: {} | Remaining difference quota: {}",
            school.quota.b_quota, school.quota.difference_quota
        )?;
        if school.quota.is_exceeded() {
            writeln!(out, "  Warning: quota exceeded")?;
        }
    }

    writeln!(out, "\nSchools")?;
    for row in &report.rows {
        let classes = row
            .classes
            .iter()
            .map(|entry| format!("{} {}", entry.column, entry.count))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            out,
            "  - {}: {} | total {} | fee {} TL",
            row.name, classes, row.total_candidates, row.total_fee
        )?;
    }
    writeln!(
        out,
        "Report totals: {} candidates, {} TL",
        report.total_candidates, report.total_fee
    )?;

    if overview.announcements.is_empty() {
        writeln!(out, "\nAnnouncements: none")?;
    } else {
        writeln!(out, "\nAnnouncements")?;
        for announcement in &overview.announcements {
            writeln!(
                out,
                "  {}. [{}] {}",
                announcement.order + 1,
                announcement.kind_label,
                announcement.content
            )?;
        }
    }

    Ok(())
}
