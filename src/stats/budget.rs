use super::{Dated, month_end, month_key, month_start, percent_of, trailing_months};
use crate::models::{BudgetCategory, BudgetEntry, EntryKind};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

/// Bucket for expenses whose category no longer exists.
pub const UNCATEGORIZED_ID: &str = "uncategorized";
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
const UNCATEGORIZED_COLOR: &str = "#9CA3AF";
const RECENT_ENTRIES: usize = 10;

/// Span of the monthly income/expense chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BudgetRange {
    #[default]
    ThisMonth,
    ThreeMonths,
    SixMonths,
    Year,
}

impl BudgetRange {
    fn months(self) -> u32 {
        match self {
            BudgetRange::ThisMonth => 1,
            BudgetRange::ThreeMonths => 3,
            BudgetRange::SixMonths => 6,
            BudgetRange::Year => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryFilter {
    #[default]
    All,
    Expenses,
    Income,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpending {
    pub category_id: String,
    pub name: String,
    pub spent: f64,
    pub limit: f64,
    pub percentage: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    /// Expense change against the previous month, in percent; 0 when the
    /// previous month had no expenses.
    pub expense_trend: f64,
    pub category_spending: Vec<CategorySpending>,
}

/// Month-to-date totals (from the 1st through `today`) and per-category
/// spending, largest first.
pub fn budget_stats(
    entries: &[BudgetEntry],
    categories: &[BudgetCategory],
    today: NaiveDate,
) -> BudgetStats {
    let this_month = month_start(today);
    let current: Vec<&BudgetEntry> = in_range(entries, this_month, today).collect();

    let total_expenses = sum_of(&current, EntryKind::Expense);
    let total_income = sum_of(&current, EntryKind::Income);

    let previous_start = month_start(this_month - Duration::days(1));
    let previous: Vec<&BudgetEntry> =
        in_range(entries, previous_start, this_month - Duration::days(1)).collect();
    let previous_expenses = sum_of(&previous, EntryKind::Expense);
    let expense_trend = if previous_expenses > 0.0 {
        (total_expenses - previous_expenses) / previous_expenses * 100.0
    } else {
        0.0
    };

    BudgetStats {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        expense_trend,
        category_spending: category_spending(&current, categories),
    }
}

pub fn budget_stats_today(
    entries: &[BudgetEntry],
    categories: &[BudgetCategory],
) -> BudgetStats {
    budget_stats(entries, categories, super::today())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBudget {
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Income and expenses per month across `range`, oldest first. Nothing
/// after `today` is counted.
pub fn monthly_totals(
    entries: &[BudgetEntry],
    range: BudgetRange,
    today: NaiveDate,
) -> Vec<MonthlyBudget> {
    if entries.is_empty() {
        return Vec::new();
    }

    trailing_months(today, range.months())
        .into_iter()
        .map(|start| {
            let in_month: Vec<&BudgetEntry> =
                in_range(entries, start, month_end(start).min(today)).collect();
            let income = sum_of(&in_month, EntryKind::Income);
            let expenses = sum_of(&in_month, EntryKind::Expense);
            MonthlyBudget {
                month: month_key(start),
                income,
                expenses,
                balance: income - expenses,
            }
        })
        .collect()
}

/// The ten newest entries matching `filter`; undated entries sort last.
pub fn recent_entries(entries: &[BudgetEntry], filter: EntryFilter) -> Vec<&BudgetEntry> {
    let mut rows: Vec<&BudgetEntry> = entries
        .iter()
        .filter(|entry| match filter {
            EntryFilter::All => true,
            EntryFilter::Expenses => entry.kind == EntryKind::Expense,
            EntryFilter::Income => entry.kind == EntryKind::Income,
        })
        .collect();
    rows.sort_by(|a, b| b.day().cmp(&a.day()));
    rows.truncate(RECENT_ENTRIES);
    rows
}

fn category_spending(entries: &[&BudgetEntry], categories: &[BudgetCategory]) -> Vec<CategorySpending> {
    let spent_in = |category_id: &str| -> f64 {
        entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Expense && entry.category_id == category_id)
            .map(|entry| entry.amount)
            .sum()
    };

    let mut rows: Vec<CategorySpending> = categories
        .iter()
        .map(|category| {
            let spent = spent_in(category.id.as_str());
            CategorySpending {
                category_id: category.id.clone(),
                name: category.name.clone(),
                spent,
                limit: category.limit,
                percentage: percent_of(spent, category.limit),
                color: category.color.clone(),
            }
        })
        .collect();

    let known: HashSet<&str> = categories.iter().map(|category| category.id.as_str()).collect();
    let orphaned: f64 = entries
        .iter()
        .filter(|entry| entry.kind == EntryKind::Expense && !known.contains(entry.category_id.as_str()))
        .map(|entry| entry.amount)
        .sum();
    if orphaned > 0.0 {
        rows.push(CategorySpending {
            category_id: UNCATEGORIZED_ID.to_string(),
            name: UNCATEGORIZED_NAME.to_string(),
            spent: orphaned,
            limit: 0.0,
            percentage: 0,
            color: UNCATEGORIZED_COLOR.to_string(),
        });
    }

    rows.sort_by(|a, b| b.spent.total_cmp(&a.spent));
    rows
}

/// Display name for an entry's category, falling back to "Uncategorized".
pub fn category_name<'a>(entry: &BudgetEntry, categories: &'a [BudgetCategory]) -> &'a str {
    categories
        .iter()
        .find(|category| category.id == entry.category_id)
        .map_or(UNCATEGORIZED_NAME, |category| category.name.as_str())
}

fn in_range(
    entries: &[BudgetEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> impl Iterator<Item = &BudgetEntry> {
    entries
        .iter()
        .filter(move |entry| entry.day().is_some_and(|day| day >= start && day <= end))
}

fn sum_of(entries: &[&BudgetEntry], kind: EntryKind) -> f64 {
    entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.amount)
        .sum()
}
