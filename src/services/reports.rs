//! Reports and dashboard metrics
//!
//! Everything here is recomputed from the store on each call.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    AuditLog, DomainError, DomainResult, Expenditure, ExpenditureStatus, Income, Organization, Staff,
};
use crate::repository::{RecordStore, Repository, ScopedRepository};

/// Audit entries shown on the dashboard
const RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Financial,
    Income,
    Expenditure,
    Staff,
}

impl ReportKind {
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "financial" => Ok(ReportKind::Financial),
            "income" => Ok(ReportKind::Income),
            "expenditure" => Ok(ReportKind::Expenditure),
            "staff" => Ok(ReportKind::Staff),
            other => Err(DomainError::InvalidInput(format!("unknown report type '{}'", other))),
        }
    }
}

/// Inclusive date range and optional organization scope
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub organization_id: Option<String>,
}

impl ReportFilter {
    pub fn new(
        start_date: Option<&str>,
        end_date: Option<&str>,
        organization_id: Option<String>,
    ) -> DomainResult<Self> {
        let filter = Self {
            start_date: parse_date(start_date, "startDate")?,
            end_date: parse_date(end_date, "endDate")?,
            organization_id: organization_id.filter(|o| !o.trim().is_empty()),
        };
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if start > end {
                return Err(DomainError::InvalidInput("startDate is after endDate".into()));
            }
        }
        Ok(filter)
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |s| date >= s) && self.end_date.map_or(true, |e| date <= e)
    }

    fn in_scope(&self, organization_id: Option<&str>) -> bool {
        match &self.organization_id {
            Some(wanted) => organization_id == Some(wanted.as_str()),
            None => true,
        }
    }

    fn income(&self, income: &Income) -> bool {
        self.in_range(income.date) && self.in_scope(income.organization_id.as_deref())
    }

    fn expenditure(&self, exp: &Expenditure) -> bool {
        self.in_range(exp.created_at.date_naive()) && self.in_scope(Some(&exp.organization_id))
    }
}

fn parse_date(value: Option<&str>, field: &str) -> DomainResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DomainError::InvalidInput(format!("{} must be YYYY-MM-DD", field))),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub filter: ReportFilter,
    pub total_income: f64,
    pub total_expenditure: f64,
    pub net_balance: f64,
    pub income_count: usize,
    pub expenditure_count: usize,
    pub income_by_type: BTreeMap<String, f64>,
    pub expenditure_by_type: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownReport {
    pub filter: ReportFilter,
    pub total: f64,
    pub count: usize,
    pub by_type: BTreeMap<String, f64>,
    pub by_status: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffReport {
    pub filter: ReportFilter,
    pub headcount: usize,
    pub active_count: usize,
    /// Sum of monthly salaries of active staff
    pub monthly_payroll: f64,
    pub payroll_by_position: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Report {
    Financial(FinancialReport),
    Income(BreakdownReport),
    Expenditure(BreakdownReport),
    Staff(StaffReport),
}

pub fn financial_report(incomes: &[Income], expenditures: &[Expenditure], filter: &ReportFilter) -> FinancialReport {
    let mut income_by_type = BTreeMap::new();
    let mut income_count = 0;
    let mut total_income = 0.0;
    for income in incomes.iter().filter(|i| filter.income(i)) {
        *income_by_type.entry(income.kind.clone()).or_insert(0.0) += income.amount;
        total_income += income.amount;
        income_count += 1;
    }

    let mut expenditure_by_type = BTreeMap::new();
    let mut expenditure_count = 0;
    let mut total_expenditure = 0.0;
    for exp in expenditures.iter().filter(|e| filter.expenditure(e)) {
        *expenditure_by_type.entry(exp.kind.clone()).or_insert(0.0) += exp.amount;
        total_expenditure += exp.amount;
        expenditure_count += 1;
    }

    FinancialReport {
        filter: filter.clone(),
        total_income,
        total_expenditure,
        net_balance: total_income - total_expenditure,
        income_count,
        expenditure_count,
        income_by_type,
        expenditure_by_type,
    }
}

pub fn income_report(incomes: &[Income], filter: &ReportFilter) -> BreakdownReport {
    breakdown(
        filter,
        incomes
            .iter()
            .filter(|i| filter.income(i))
            .map(|i| (i.amount, i.kind.clone(), status_name(&i.status))),
    )
}

pub fn expenditure_report(expenditures: &[Expenditure], filter: &ReportFilter) -> BreakdownReport {
    breakdown(
        filter,
        expenditures
            .iter()
            .filter(|e| filter.expenditure(e))
            .map(|e| (e.amount, e.kind.clone(), e.status.as_str().to_string())),
    )
}

pub fn staff_report(staff: &[Staff], filter: &ReportFilter) -> StaffReport {
    let scoped: Vec<&Staff> = staff
        .iter()
        .filter(|s| filter.in_scope(s.organization_id.as_deref()))
        .collect();

    let mut payroll_by_position = BTreeMap::new();
    let mut monthly_payroll = 0.0;
    let mut active_count = 0;
    for member in scoped.iter().filter(|s| s.is_active()) {
        *payroll_by_position.entry(member.position.clone()).or_insert(0.0) += member.salary;
        monthly_payroll += member.salary;
        active_count += 1;
    }

    StaffReport {
        filter: filter.clone(),
        headcount: scoped.len(),
        active_count,
        monthly_payroll,
        payroll_by_position,
    }
}

fn breakdown(filter: &ReportFilter, rows: impl Iterator<Item = (f64, String, String)>) -> BreakdownReport {
    let mut report = BreakdownReport {
        filter: filter.clone(),
        total: 0.0,
        count: 0,
        by_type: BTreeMap::new(),
        by_status: BTreeMap::new(),
    };
    for (amount, kind, status) in rows {
        report.total += amount;
        report.count += 1;
        *report.by_type.entry(kind).or_insert(0.0) += amount;
        *report.by_status.entry(status).or_insert(0.0) += amount;
    }
    report
}

fn status_name<S: Serialize>(status: &S) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Build the report of `kind` from current store contents.
pub async fn generate(store: &RecordStore, kind: ReportKind, filter: &ReportFilter) -> DomainResult<Report> {
    let report = match kind {
        ReportKind::Financial => {
            let incomes = store.incomes.list().await?;
            let expenditures = store.expenditures.list().await?;
            Report::Financial(financial_report(&incomes, &expenditures, filter))
        }
        ReportKind::Income => Report::Income(income_report(&store.incomes.list().await?, filter)),
        ReportKind::Expenditure => {
            Report::Expenditure(expenditure_report(&store.expenditures.list().await?, filter))
        }
        ReportKind::Staff => Report::Staff(staff_report(&store.staff.list().await?, filter)),
    };
    Ok(report)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_income: f64,
    pub total_expenditure: f64,
    pub net_balance: f64,
    pub pending_approvals: usize,
    pub staff_count: usize,
    pub organization_count: usize,
    pub recent_activity: Vec<AuditLog>,
}

/// Totals over every income and expenditure currently stored.
///
/// With `organization_id` set, money, staff and pending counts cover that
/// organization's own records. `organizationCount` covers the organization
/// and everything beneath it, and `recentActivity` only lists audit entries
/// about records in that scope.
pub async fn dashboard(store: &RecordStore, organization_id: Option<&str>) -> DomainResult<DashboardMetrics> {
    let scoped = |org: Option<&str>| organization_id.map_or(true, |wanted| org == Some(wanted));

    let incomes = store.incomes.list().await?;
    let expenditures = store.expenditures.list().await?;
    let staff = store.staff.list().await?;

    let total_income: f64 = incomes
        .iter()
        .filter(|i| scoped(i.organization_id.as_deref()))
        .map(|i| i.amount)
        .sum();
    let scoped_expenditures: Vec<&Expenditure> = expenditures
        .iter()
        .filter(|e| scoped(Some(&e.organization_id)))
        .collect();
    let total_expenditure: f64 = scoped_expenditures.iter().map(|e| e.amount).sum();
    let pending_approvals = scoped_expenditures
        .iter()
        .filter(|e| e.status == ExpenditureStatus::Pending)
        .count();
    let staff_count = staff
        .iter()
        .filter(|s| scoped(s.organization_id.as_deref()))
        .count();

    let organizations = store.organizations.list().await?;
    let mut recent_activity = store.audit_logs.list().await?;
    recent_activity.reverse();

    let organization_count = match organization_id {
        None => organizations.len(),
        Some(root) => {
            let subtree = organization_subtree(&organizations, root);

            let mut in_scope: HashSet<String> = subtree.iter().map(|id| id.to_string()).collect();
            in_scope.extend(
                incomes
                    .iter()
                    .filter(|i| scoped(i.organization_id.as_deref()))
                    .map(|i| i.id.clone()),
            );
            in_scope.extend(scoped_expenditures.iter().map(|e| e.id.clone()));
            in_scope.extend(
                staff
                    .iter()
                    .filter(|s| scoped(s.organization_id.as_deref()))
                    .map(|s| s.id.clone()),
            );
            in_scope.extend(store.users.list_by_organization(root).await?.into_iter().map(|u| u.id));
            in_scope.extend(store.accounts.list_by_organization(root).await?.into_iter().map(|a| a.id));
            recent_activity.retain(|log| in_scope.contains(&log.entity_id));

            subtree.len()
        }
    };
    recent_activity.truncate(RECENT_ACTIVITY);

    Ok(DashboardMetrics {
        total_income,
        total_expenditure,
        net_balance: total_income - total_expenditure,
        pending_approvals,
        staff_count,
        organization_count,
        recent_activity,
    })
}

/// Ids of `root` and every organization beneath it; empty when `root` is unknown.
fn organization_subtree<'a>(organizations: &'a [Organization], root: &'a str) -> Vec<&'a str> {
    if !organizations.iter().any(|o| o.id == root) {
        return Vec::new();
    }
    let mut found = vec![root];
    let mut next = 0;
    while next < found.len() {
        let parent = found[next];
        for org in organizations {
            if org.parent_id.as_deref() == Some(parent) && !found.contains(&org.id.as_str()) {
                found.push(org.id.as_str());
            }
        }
        next += 1;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IncomeStatus, OrgTier};

    fn income(amount: f64, kind: &str, date: &str, org: &str) -> Income {
        let mut i = Income::new(
            format!("income-{}", amount),
            amount,
            kind.to_string(),
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        );
        i.organization_id = Some(org.to_string());
        i
    }

    fn expenditure(amount: f64, kind: &str, org: &str) -> Expenditure {
        Expenditure::new(
            format!("expenditure-{}", amount),
            "x".into(),
            amount,
            kind.into(),
            "user-1".into(),
            org.into(),
        )
    }

    #[test]
    fn test_report_kind_parse() {
        assert_eq!(ReportKind::parse("Financial").unwrap(), ReportKind::Financial);
        assert!(ReportKind::parse("weekly").is_err());
    }

    #[test]
    fn test_filter_rejects_bad_dates() {
        assert!(ReportFilter::new(Some("2024-13-01"), None, None).is_err());
        assert!(ReportFilter::new(Some("2024-06-02"), Some("2024-06-01"), None).is_err());
        assert!(ReportFilter::new(Some(""), None, Some(" ".into())).unwrap().organization_id.is_none());
    }

    #[test]
    fn test_financial_totals_and_breakdown() {
        let incomes = vec![
            income(100.0, "tithe", "2024-01-07", "org-1"),
            income(50.0, "offering", "2024-01-07", "org-1"),
            income(25.0, "tithe", "2024-01-14", "org-2"),
        ];
        let expenditures = vec![expenditure(60.0, "operational", "org-1")];

        let report = financial_report(&incomes, &expenditures, &ReportFilter::default());
        assert_eq!(report.total_income, 175.0);
        assert_eq!(report.total_expenditure, 60.0);
        assert_eq!(report.net_balance, 115.0);
        assert_eq!(report.income_by_type["tithe"], 125.0);
        assert_eq!(report.expenditure_count, 1);
    }

    #[test]
    fn test_financial_respects_range_and_scope() {
        let incomes = vec![
            income(100.0, "tithe", "2024-01-07", "org-1"),
            income(50.0, "tithe", "2024-02-04", "org-1"),
            income(25.0, "tithe", "2024-01-14", "org-2"),
        ];
        let filter = ReportFilter::new(Some("2024-01-01"), Some("2024-01-31"), Some("org-1".into())).unwrap();
        let report = financial_report(&incomes, &[], &filter);
        assert_eq!(report.total_income, 100.0);
        assert_eq!(report.income_count, 1);
    }

    #[test]
    fn test_income_breakdown_by_status() {
        let mut confirmed = income(40.0, "donation", "2024-03-03", "org-1");
        confirmed.status = IncomeStatus::Confirmed;
        let incomes = vec![confirmed, income(10.0, "donation", "2024-03-03", "org-1")];

        let report = income_report(&incomes, &ReportFilter::default());
        assert_eq!(report.by_status["confirmed"], 40.0);
        assert_eq!(report.by_status["pending"], 10.0);
        assert_eq!(report.count, 2);
    }

    #[test]
    fn test_staff_payroll_counts_active_only() {
        let mut inactive = Staff::new("staff-2".into(), "B".into(), "Cleaner".into(), 300.0);
        inactive.status = crate::domain::StaffStatus::Inactive;
        let staff = vec![
            Staff::new("staff-1".into(), "A".into(), "Pastor".into(), 1500.0),
            inactive,
        ];
        let report = staff_report(&staff, &ReportFilter::default());
        assert_eq!(report.headcount, 2);
        assert_eq!(report.active_count, 1);
        assert_eq!(report.monthly_payroll, 1500.0);
    }

    #[test]
    fn test_report_serializes_type_tag() {
        let report = Report::Financial(financial_report(&[], &[], &ReportFilter::default()));
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["type"], "financial");
        assert_eq!(json["totalIncome"], 0.0);
    }

    #[tokio::test]
    async fn test_dashboard_sums_at_call_time() {
        let store = RecordStore::new();
        store.incomes.create(&income(100.0, "tithe", "2024-01-07", "org-1")).await.unwrap();
        store.expenditures.create(&expenditure(30.0, "operational", "org-1")).await.unwrap();

        let first = dashboard(&store, None).await.unwrap();
        assert_eq!(first.total_income, 100.0);
        assert_eq!(first.pending_approvals, 1);

        store.incomes.create(&income(20.0, "offering", "2024-01-08", "org-2")).await.unwrap();
        let second = dashboard(&store, None).await.unwrap();
        assert_eq!(second.total_income, 120.0);
        assert_eq!(second.net_balance, 90.0);

        let scoped = dashboard(&store, Some("org-2")).await.unwrap();
        assert_eq!(scoped.total_income, 20.0);
        assert_eq!(scoped.total_expenditure, 0.0);
    }

    #[tokio::test]
    async fn test_scoped_dashboard_limits_activity_and_organizations() {
        let store = RecordStore::new();
        let top = Organization::new("org-top".into(), "Council".into(), OrgTier::GCC, None);
        let child = Organization::new("org-child".into(), "District".into(), OrgTier::DCC, Some("org-top".into()));
        let other = Organization::new("org-other".into(), "Elsewhere".into(), OrgTier::GCC, None);
        for org in [&top, &child, &other] {
            store.organizations.create(org).await.unwrap();
        }

        let mine = income(10.0, "tithe", "2024-01-07", "org-child");
        let theirs = income(99.0, "tithe", "2024-01-07", "org-other");
        store.incomes.create(&mine).await.unwrap();
        store.incomes.create(&theirs).await.unwrap();
        store.record_audit("income.create", "income", &mine.id, None, None).await.unwrap();
        store.record_audit("income.create", "income", &theirs.id, None, None).await.unwrap();

        let everything = dashboard(&store, None).await.unwrap();
        assert_eq!(everything.organization_count, 3);
        assert_eq!(everything.recent_activity.len(), 2);

        let top_scope = dashboard(&store, Some("org-top")).await.unwrap();
        assert_eq!(top_scope.organization_count, 2);
        assert!(top_scope.recent_activity.is_empty());

        let child_scope = dashboard(&store, Some("org-child")).await.unwrap();
        assert_eq!(child_scope.organization_count, 1);
        assert_eq!(child_scope.total_income, 10.0);
        assert_eq!(child_scope.recent_activity.len(), 1);
        assert_eq!(child_scope.recent_activity[0].entity_id, mine.id);

        let unknown = dashboard(&store, Some("org-missing")).await.unwrap();
        assert_eq!(unknown.organization_count, 0);
        assert!(unknown.recent_activity.is_empty());
    }
}
