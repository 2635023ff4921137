//! Monthly cash-flow ledger: dated expense entries, recurring fixed costs,
//! and the monthly report netting them against reservation revenue.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::requires;
use crate::error::{DeskError, DeskResult};
use crate::models::{
    check_amount, new_id, DateKey, EntryKind, FinanceEntry, FixedExpense, Reservation, ReservationStatus, UserRole,
    YearMonth, MAX_AMOUNT,
};
use crate::progress::percent;
use crate::session::Session;

/// Category recorded on entries created from the daily ledger.
pub const DAILY_EXPENSE_CATEGORY: &str = "기타 비품";

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

fn signed(amount: u64) -> i64 {
    amount.min(MAX_AMOUNT) as i64
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub entries: Vec<FinanceEntry>,
    #[serde(default)]
    pub fixed: Vec<FixedExpense>,
    /// Suggested descriptions, most recently added last.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Everything the monthly finance view shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub month: YearMonth,
    /// Sum per exact description, in order of first appearance.
    pub breakdown: Vec<(String, u64)>,
    /// Entries grouped by day, most recent day first.
    pub by_date: Vec<(DateKey, Vec<FinanceEntry>)>,
    pub fixed_total: u64,
    pub variable_total: u64,
    pub grand_total: u64,
    /// Confirmed revenue per room, rooms in name order.
    pub room_revenue: Vec<(String, u64)>,
    pub total_revenue: u64,
    pub net_cash_flow: i64,
}

impl MonthlyReport {
    /// Share of the variable total spent on one breakdown bucket.
    pub fn category_percent(&self, amount: u64) -> u32 {
        percent(amount, self.variable_total)
    }

    pub fn revenue_for(&self, room: &str) -> u64 {
        self.room_revenue
            .iter()
            .find(|(r, _)| r == room)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }
}

impl Ledger {
    pub fn new(fixed: Vec<FixedExpense>, labels: Vec<String>) -> Ledger {
        Ledger { entries: Vec::new(), fixed, labels }
    }

    /// Records a dated expense and remembers its description as a
    /// suggestion for later entries.
    pub fn add_expense(&mut self, date: DateKey, description: &str, amount: u64) -> DeskResult<&FinanceEntry> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DeskError::validation("expense description must not be empty"));
        }
        if amount == 0 {
            return Err(DeskError::validation("expense amount must be greater than zero"));
        }
        check_amount(amount, "expense amount")?;
        let entry = FinanceEntry {
            id: new_id(),
            date,
            kind: EntryKind::Expense,
            category: DAILY_EXPENSE_CATEGORY.to_string(),
            description: description.to_string(),
            amount,
        };
        info!(id = %entry.id, date = %entry.date, amount, "expense recorded");
        if !self.labels.iter().any(|l| l == description) {
            self.labels.push(description.to_string());
        }
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn add_fixed(&mut self, name: &str, amount: u64, session: &Session) -> DeskResult<&FixedExpense> {
        requires(session, UserRole::Admin, "manage fixed expenses")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::validation("fixed expense name must not be empty"));
        }
        check_amount(amount, "fixed expense amount")?;
        let item = FixedExpense { id: new_id(), name: name.to_string(), amount };
        info!(id = %item.id, amount, "fixed expense added");
        self.fixed.push(item);
        Ok(&self.fixed[self.fixed.len() - 1])
    }

    pub fn delete_fixed(&mut self, id: &str, session: &Session) -> DeskResult<FixedExpense> {
        requires(session, UserRole::Admin, "manage fixed expenses")?;
        let idx = self
            .fixed
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| DeskError::not_found("Fixed expense", id))?;
        info!(id, "fixed expense removed");
        Ok(self.fixed.remove(idx))
    }

    /// Builds the report for `month`. Pure: equal inputs give equal reports.
    pub fn aggregate(&self, month: YearMonth, reservations: &[Reservation]) -> MonthlyReport {
        let in_month: Vec<&FinanceEntry> = self
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Expense && month.contains(&e.date))
            .collect();

        let mut breakdown: Vec<(String, u64)> = Vec::new();
        for e in &in_month {
            match breakdown.iter_mut().find(|(d, _)| *d == e.description) {
                Some((_, sum)) => *sum = sum.saturating_add(e.amount),
                None => breakdown.push((e.description.clone(), e.amount)),
            }
        }

        let mut grouped: BTreeMap<DateKey, Vec<FinanceEntry>> = BTreeMap::new();
        for e in &in_month {
            grouped.entry(e.date.clone()).or_default().push((*e).clone());
        }
        let by_date: Vec<(DateKey, Vec<FinanceEntry>)> = grouped.into_iter().rev().collect();

        let fixed_total = saturating_sum(self.fixed.iter().map(|f| f.amount));
        let variable_total = saturating_sum(in_month.iter().map(|e| e.amount));
        let grand_total = fixed_total.saturating_add(variable_total);

        let room_revenue = revenue_by_room(month, reservations);
        let total_revenue = saturating_sum(room_revenue.iter().map(|(_, v)| *v));

        MonthlyReport {
            month,
            breakdown,
            by_date,
            fixed_total,
            variable_total,
            grand_total,
            room_revenue,
            total_revenue,
            net_cash_flow: signed(total_revenue).saturating_sub(signed(grand_total)),
        }
    }
}

/// Confirmed revenue per room for stays checking in during `month`.
pub fn revenue_by_room(month: YearMonth, reservations: &[Reservation]) -> Vec<(String, u64)> {
    let mut rooms: BTreeMap<&str, u64> = BTreeMap::new();
    for r in reservations
        .iter()
        .filter(|r| r.status == ReservationStatus::Confirmed && month.contains(&r.check_in))
    {
        let sum = rooms.entry(r.room_name.as_str()).or_default();
        *sum = sum.saturating_add(r.total_price);
    }
    rooms.into_iter().map(|(room, v)| (room.to_string(), v)).collect()
}

/// Price of the stay checking into `room` on `date`, for the revenue grid.
pub fn revenue_on(date: &DateKey, room: &str, reservations: &[Reservation]) -> Option<u64> {
    reservations
        .iter()
        .find(|r| r.check_in == *date && r.room_name == room)
        .map(|r| r.total_price)
}

pub fn default_fixed_expenses() -> Vec<FixedExpense> {
    [("f1", "정수기", 65_800), ("f2", "인터넷&TV", 84_700), ("f3", "넷플릭스", 29_000)]
        .into_iter()
        .map(|(id, name, amount)| FixedExpense { id: id.into(), name: name.into(), amount })
        .collect()
}

pub fn default_labels() -> Vec<String> {
    ["장작&숯", "디퓨저용기", "쿠킹호일", "캡슐커피", "녹차&페퍼민트", "쓰레기봉투", "위생봉투", "청소비"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `1234567` -> `1,234,567`; negative values keep their sign.
pub fn format_won(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if amount < 0 {
        format!("-₩{}", out)
    } else {
        format!("₩{}", out)
    }
}
