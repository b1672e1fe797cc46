use super::views::{
    AnnouncementView, ClassCountEntry, DashboardOverview, DetailedReportView, ReportLayout,
    SchoolReportEntry, SchoolStanding,
};
use crate::aggregation::{self, Quota};
use crate::announcements::sort_announcements;
use crate::domain::{Announcement, FeeTable, LicenseClass, School, SchoolId};
use rust_decimal::Decimal;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportColumn {
    Class(LicenseClass),
    Difference,
}

impl ReportColumn {
    pub fn for_layout(layout: ReportLayout) -> Vec<Self> {
        match layout {
            ReportLayout::Full => LicenseClass::ordered().map(Self::Class).to_vec(),
            ReportLayout::Compact => LicenseClass::ordered()
                .into_iter()
                .filter(|class| !class.is_difference())
                .map(Self::Class)
                .chain(std::iter::once(Self::Difference))
                .collect(),
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Class(class) => class.tag(),
            Self::Difference => "FARK",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Class(class) => class.label(),
            Self::Difference => "Fark",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchoolRow {
    pub school_id: SchoolId,
    pub name: String,
    pub counts: [(LicenseClass, u32); LicenseClass::COUNT],
    pub total_candidates: u64,
    pub total_fee: Decimal,
    pub quota: Quota,
}

impl SchoolRow {
    fn from_school(school: &School, fees: &FeeTable) -> Self {
        Self {
            school_id: school.id.clone(),
            name: school.name.clone(),
            counts: aggregation::class_breakdown(school),
            total_candidates: aggregation::school_candidates(school),
            total_fee: aggregation::school_fee(school, fees),
            quota: aggregation::quota(school),
        }
    }

    pub fn column_count(&self, column: ReportColumn) -> u64 {
        match column {
            ReportColumn::Class(class) => self
                .counts
                .iter()
                .find(|(candidate, _)| *candidate == class)
                .map(|(_, count)| u64::from(*count))
                .unwrap_or(0),
            ReportColumn::Difference => self
                .counts
                .iter()
                .filter(|(class, _)| class.is_difference())
                .map(|(_, count)| u64::from(*count))
                .sum(),
        }
    }

    fn to_view(&self, columns: &[ReportColumn]) -> SchoolReportEntry {
        SchoolReportEntry {
            school_id: self.school_id.clone(),
            name: self.name.clone(),
            classes: columns
                .iter()
                .map(|column| ClassCountEntry {
                    column: column.key(),
                    column_label: column.label(),
                    count: self.column_count(*column),
                })
                .collect(),
            total_candidates: self.total_candidates,
            total_fee: self.total_fee,
            quota: self.quota,
        }
    }
}

/// Per-school breakdown with grand totals; the admin account is left out.
#[derive(Debug, Clone, Default)]
pub struct DetailedReport {
    pub rows: Vec<SchoolRow>,
    pub total_candidates: u64,
    pub total_fee: Decimal,
}

impl DetailedReport {
    pub fn build(schools: &[School], fees: &FeeTable) -> Self {
        let tenants: Vec<School> = schools
            .iter()
            .filter(|school| !school.is_admin_account())
            .cloned()
            .collect();

        Self {
            rows: tenants
                .iter()
                .map(|school| SchoolRow::from_school(school, fees))
                .collect(),
            total_candidates: aggregation::total_candidates(&tenants),
            total_fee: aggregation::total_fee(&tenants, fees),
        }
    }

    pub fn summary(&self, layout: ReportLayout) -> DetailedReportView {
        let columns = ReportColumn::for_layout(layout);
        DetailedReportView {
            layout,
            rows: self.rows.iter().map(|row| row.to_view(&columns)).collect(),
            total_candidates: self.total_candidates,
            total_fee: self.total_fee,
        }
    }

    /// Writes the report as CSV: one header, one line per school, then a totals line.
    pub fn write_csv<W: io::Write>(&self, writer: W, layout: ReportLayout) -> csv::Result<()> {
        let columns = ReportColumn::for_layout(layout);
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["MTSK".to_string()];
        header.extend(columns.iter().map(|column| column.key().to_string()));
        header.push("Toplam".to_string());
        header.push("Ücret".to_string());
        csv.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.name.clone()];
            record.extend(
                columns
                    .iter()
                    .map(|column| row.column_count(*column).to_string()),
            );
            record.push(row.total_candidates.to_string());
            record.push(row.total_fee.to_string());
            csv.write_record(&record)?;
        }

        let mut totals = vec!["Toplam".to_string()];
        totals.extend(columns.iter().map(|column| {
            self.rows
                .iter()
                .map(|row| row.column_count(*column))
                .sum::<u64>()
                .to_string()
        }));
        totals.push(self.total_candidates.to_string());
        totals.push(self.total_fee.to_string());
        csv.write_record(&totals)?;

        csv.flush()?;
        Ok(())
    }
}

impl DashboardOverview {
    /// Totals span every school snapshot; `operator` adds that school's own standing.
    pub fn build(
        operator: Option<&School>,
        schools: &[School],
        fees: &FeeTable,
        announcements: &[Announcement],
    ) -> Self {
        let school = operator.map(|school| SchoolStanding {
            school_id: school.id.clone(),
            name: school.name.clone(),
            candidates: aggregation::school_candidates(school),
            fee: aggregation::school_fee(school, fees),
            quota: aggregation::quota(school),
        });

        Self {
            total_candidates: aggregation::total_candidates(schools),
            total_fee: aggregation::total_fee(schools, fees),
            school,
            announcements: sort_announcements(announcements)
                .iter()
                .map(AnnouncementView::from)
                .collect(),
        }
    }
}
