use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DeskError;

/// Canonical `YYYY-MM-DD` calendar day, used as the equality and sort key
/// for checklist logs and ledger grouping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

impl DateKey {
    pub fn parse(s: &str) -> Result<DateKey, DeskError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(DateKey::from_date)
            .map_err(|_| DeskError::InvalidDate(s.to_string()))
    }

    pub fn from_date(date: NaiveDate) -> DateKey {
        DateKey(date.format("%Y-%m-%d").to_string())
    }

    pub fn today() -> DateKey {
        DateKey::from_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn date(&self) -> NaiveDate {
        // constructed only through parse/from_date, so always well-formed
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").unwrap_or_default()
    }

    pub fn month(&self) -> YearMonth {
        let d = self.date();
        YearMonth { year: d.year(), month: d.month() }
    }

    pub fn succ(&self) -> DateKey {
        DateKey::from_date(self.date().succ_opt().unwrap_or(self.date()))
    }

    pub fn pred(&self) -> DateKey {
        DateKey::from_date(self.date().pred_opt().unwrap_or(self.date()))
    }
}

impl TryFrom<String> for DateKey {
    type Error = DeskError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        DateKey::parse(&s)
    }
}

impl From<DateKey> for String {
    fn from(k: DateKey) -> String {
        k.0
    }
}

impl FromStr for DateKey {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateKey::parse(s)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<YearMonth, DeskError> {
        if (1..=12).contains(&month) {
            Ok(YearMonth { year, month })
        } else {
            Err(DeskError::InvalidDate(format!("{}-{:02}", year, month)))
        }
    }

    pub fn current() -> YearMonth {
        DateKey::today().month()
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        date.month() == *self
    }

    pub fn next(&self) -> YearMonth {
        if self.month == 12 {
            YearMonth { year: self.year + 1, month: 1 }
        } else {
            YearMonth { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> YearMonth {
        if self.month == 1 {
            YearMonth { year: self.year - 1, month: 12 }
        } else {
            YearMonth { year: self.year, month: self.month - 1 }
        }
    }
}

impl FromStr for YearMonth {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || DeskError::InvalidDate(s.to_string());
        let (y, m) = s.trim().split_once('-').ok_or_else(bad)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(bad());
        }
        let year = y.parse::<i32>().map_err(|_| bad())?;
        let month = m.parse::<u32>().map_err(|_| bad())?;
        YearMonth::new(year, month).map_err(|_| bad())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Role of the acting user.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Staff,
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "관리자",
            UserRole::Staff => "스태프",
        }
    }
}

impl FromStr for UserRole {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "staff" => Ok(UserRole::Staff),
            _ => Err(DeskError::validation(format!("unknown role '{}' (admin, staff)", s))),
        }
    }
}

/// The identity record read once at startup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub pension_name: String,
}

/// Category of a master checklist task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    Promotion,
    Room,
    InventoryCheck,
    ReservationCheck,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [
        TaskCategory::Promotion,
        TaskCategory::Room,
        TaskCategory::InventoryCheck,
        TaskCategory::ReservationCheck,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskCategory::Promotion => "홍보관리",
            TaskCategory::Room => "숙소관리",
            TaskCategory::InventoryCheck => "재고관리",
            TaskCategory::ReservationCheck => "예약관리",
        }
    }
}

impl FromStr for TaskCategory {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promotion" => Ok(TaskCategory::Promotion),
            "room" => Ok(TaskCategory::Room),
            "inventory-check" => Ok(TaskCategory::InventoryCheck),
            "reservation-check" => Ok(TaskCategory::ReservationCheck),
            _ => Err(DeskError::validation(format!(
                "unknown task category '{}' (promotion, room, inventory-check, reservation-check)",
                s
            ))),
        }
    }
}

/// A master checklist task, repeated every day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    pub id: String,
    pub category: TaskCategory,
    pub task: String,
}

/// Two-stage completion record of one task on one day.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TaskStatus {
    #[serde(default)]
    pub staff_done: bool,
    #[serde(default)]
    pub admin_verified: bool,
    #[serde(default)]
    pub last_updated_by: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InventoryCategory {
    Equipment,
    Disposable,
    Consumable,
}

impl InventoryCategory {
    pub const ALL: [InventoryCategory; 3] = [
        InventoryCategory::Equipment,
        InventoryCategory::Disposable,
        InventoryCategory::Consumable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InventoryCategory::Equipment => "비품",
            InventoryCategory::Disposable => "일회용품",
            InventoryCategory::Consumable => "소모품",
        }
    }
}

impl FromStr for InventoryCategory {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equipment" => Ok(InventoryCategory::Equipment),
            "disposable" => Ok(InventoryCategory::Disposable),
            "consumable" => Ok(InventoryCategory::Consumable),
            _ => Err(DeskError::validation(format!(
                "unknown inventory category '{}' (equipment, disposable, consumable)",
                s
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: InventoryCategory,
    pub quantity: u32,
    pub unit: String,
    pub min_threshold: u32,
}

impl InventoryItem {
    pub fn is_low(&self) -> bool {
        self.quantity <= self.min_threshold
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl FromStr for ReservationStatus {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "pending" => Ok(ReservationStatus::Pending),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err(DeskError::validation(format!(
                "unknown reservation status '{}' (confirmed, pending, cancelled)",
                s
            ))),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Pending => "pending",
            ReservationStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Paid add-ons of a stay; every count is >= 0 by construction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReservationOptions {
    #[serde(default)]
    pub jacuzzi: u32,
    #[serde(default)]
    pub charcoal: u32,
    #[serde(default)]
    pub extra_person: u32,
    #[serde(default)]
    pub pet: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub room_name: String,
    pub guest_name: String,
    pub check_in: DateKey,
    pub check_out: DateKey,
    pub status: ReservationStatus,
    pub total_price: u64,
    pub guest_count: u32,
    #[serde(default)]
    pub options: ReservationOptions,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Idea,
    Order,
}

impl PostKind {
    pub fn label(&self) -> &'static str {
        match self {
            PostKind::Idea => "아이디어",
            PostKind::Order => "업무지시",
        }
    }
}

impl FromStr for PostKind {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idea" => Ok(PostKind::Idea),
            "order" => Ok(PostKind::Order),
            _ => Err(DeskError::validation(format!("unknown post type '{}' (idea, order)", s))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StaffComment {
    pub id: String,
    pub author: String,
    pub text: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StaffPost {
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub kind: PostKind,
    #[serde(default)]
    pub likes: u32,
    /// RFC 3339 timestamp.
    pub created_at: String,
    #[serde(default)]
    pub comments: Vec<StaffComment>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

/// A single dated ledger record. Never mutated after creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FinanceEntry {
    pub id: String,
    pub date: DateKey,
    pub kind: EntryKind,
    pub category: String,
    pub description: String,
    pub amount: u64,
}

/// A recurring monthly cost, added once to every month's total.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FixedExpense {
    pub id: String,
    pub name: String,
    pub amount: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub note: String,
    pub last_visit: Option<DateKey>,
}

/// Largest amount a single expense, fixed cost or booking may carry.
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

/// Rejects amounts the monthly report cannot net as signed values.
pub fn check_amount(amount: u64, what: &str) -> Result<(), DeskError> {
    if amount > MAX_AMOUNT {
        return Err(DeskError::validation(format!("{} must not exceed {}", what, MAX_AMOUNT)));
    }
    Ok(())
}

/// Fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..9].to_string()
}
