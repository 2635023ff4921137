use pensiondesk::finance::{default_fixed_expenses, default_labels, format_won, revenue_on, Ledger};
use pensiondesk::models::{
    DateKey, EntryKind, FinanceEntry, FixedExpense, Reservation, ReservationOptions, ReservationStatus, UserInfo,
    UserRole, YearMonth, MAX_AMOUNT,
};
use pensiondesk::session::Session;

fn april() -> YearMonth {
    "2024-04".parse().unwrap()
}

fn d(s: &str) -> DateKey {
    DateKey::parse(s).unwrap()
}

fn staff() -> Session {
    Session::new(UserInfo {
        id: "s1".into(),
        name: "이알바".into(),
        role: UserRole::Staff,
        pension_name: "오션뷰".into(),
    })
}

fn reservation(room: &str, check_in: &str, price: u64, status: ReservationStatus) -> Reservation {
    Reservation {
        id: format!("{}-{}", room, check_in),
        room_name: room.into(),
        guest_name: "김지훈".into(),
        check_in: d(check_in),
        check_out: d(check_in),
        status,
        total_price: price,
        guest_count: 2,
        options: ReservationOptions::default(),
    }
}

fn ledger() -> Ledger {
    Ledger::new(default_fixed_expenses(), default_labels())
}

#[test]
fn test_grand_total_adds_fixed_and_variable() {
    let mut l = ledger();
    l.add_expense(d("2024-04-03"), "장작&숯", 30_000).unwrap();
    l.add_expense(d("2024-04-20"), "청소비", 12_000).unwrap();
    // other months do not count
    l.add_expense(d("2024-05-01"), "청소비", 99_000).unwrap();

    let r = l.aggregate(april(), &[]);
    assert_eq!(r.fixed_total, 179_500);
    assert_eq!(r.variable_total, 42_000);
    assert_eq!(r.grand_total, 221_500);
}

#[test]
fn test_net_cash_flow_positive_and_negative() {
    let mut l = ledger();
    l.add_expense(d("2024-04-03"), "장작&숯", 42_000).unwrap();

    let rich = [
        reservation("산수유", "2024-04-05", 150_000, ReservationStatus::Confirmed),
        reservation("소나무", "2024-04-10", 150_000, ReservationStatus::Confirmed),
    ];
    let r = l.aggregate(april(), &rich);
    assert_eq!(r.total_revenue, 300_000);
    assert_eq!(r.net_cash_flow, 78_500);

    let poor = [reservation("대나무", "2024-04-05", 100_000, ReservationStatus::Confirmed)];
    let r = l.aggregate(april(), &poor);
    assert_eq!(r.total_revenue, 100_000);
    assert_eq!(r.net_cash_flow, -121_500);
}

#[test]
fn test_revenue_counts_confirmed_stays_of_the_month() {
    let l = Ledger::new(Vec::new(), Vec::new());
    let list = [
        reservation("산수유", "2024-04-05", 150_000, ReservationStatus::Confirmed),
        reservation("산수유", "2024-04-15", 150_000, ReservationStatus::Confirmed),
        reservation("소나무", "2024-04-10", 180_000, ReservationStatus::Confirmed),
        reservation("소나무", "2024-04-11", 180_000, ReservationStatus::Pending),
        reservation("대나무", "2024-04-12", 320_000, ReservationStatus::Cancelled),
        reservation("대나무", "2024-03-31", 320_000, ReservationStatus::Confirmed),
    ];
    let r = l.aggregate(april(), &list);
    assert_eq!(r.revenue_for("산수유"), 300_000);
    assert_eq!(r.revenue_for("소나무"), 180_000);
    assert_eq!(r.revenue_for("대나무"), 0);
    assert_eq!(r.total_revenue, 480_000);
    assert_eq!(r.net_cash_flow, 480_000);
}

#[test]
fn test_breakdown_groups_by_exact_description() {
    let mut l = ledger();
    l.add_expense(d("2024-04-02"), "숯불", 10_000).unwrap();
    l.add_expense(d("2024-04-08"), "쿠킹호일", 5_000).unwrap();
    l.add_expense(d("2024-04-09"), "숯불", 5_000).unwrap();
    l.add_expense(d("2024-04-09"), "숯불 ", 1).unwrap(); // trimmed on entry, same bucket
    l.add_expense(d("2024-04-10"), "숯 불", 2_000).unwrap();

    let r = l.aggregate(april(), &[]);
    assert_eq!(
        r.breakdown,
        vec![
            ("숯불".to_string(), 15_001),
            ("쿠킹호일".to_string(), 5_000),
            ("숯 불".to_string(), 2_000),
        ]
    );
    assert_eq!(r.variable_total, 22_001);
    assert_eq!(r.category_percent(15_001), 68);
}

#[test]
fn test_category_percent_with_no_variable_spend() {
    let l = ledger();
    let r = l.aggregate(april(), &[]);
    assert_eq!(r.variable_total, 0);
    assert!(r.breakdown.is_empty());
    assert_eq!(r.category_percent(0), 0);
}

#[test]
fn test_by_date_is_most_recent_first() {
    let mut l = ledger();
    l.add_expense(d("2024-04-02"), "숯불", 10_000).unwrap();
    l.add_expense(d("2024-04-28"), "청소비", 30_000).unwrap();
    l.add_expense(d("2024-04-02"), "캡슐커피", 8_000).unwrap();

    let r = l.aggregate(april(), &[]);
    let days: Vec<&str> = r.by_date.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(days, vec!["2024-04-28", "2024-04-02"]);
    assert_eq!(r.by_date[1].1.len(), 2);
    assert_eq!(r.by_date[1].1[0].description, "숯불");
}

#[test]
fn test_aggregate_is_repeatable() {
    let mut l = ledger();
    l.add_expense(d("2024-04-02"), "숯불", 10_000).unwrap();
    let res = [reservation("산수유", "2024-04-05", 150_000, ReservationStatus::Confirmed)];
    assert_eq!(l.aggregate(april(), &res), l.aggregate(april(), &res));
}

#[test]
fn test_add_expense_validates_before_writing() {
    let mut l = ledger();
    assert!(l.add_expense(d("2024-04-02"), "  ", 1_000).unwrap_err().is_validation());
    assert!(l.add_expense(d("2024-04-02"), "숯불", 0).unwrap_err().is_validation());
    assert!(l.entries.is_empty());
    assert_eq!(l.labels, default_labels());
}

#[test]
fn test_new_descriptions_become_suggestions_once() {
    let mut l = ledger();
    l.add_expense(d("2024-04-02"), "숯불", 10_000).unwrap();
    l.add_expense(d("2024-04-03"), "숯불", 10_000).unwrap();
    l.add_expense(d("2024-04-03"), "청소비", 10_000).unwrap();
    assert_eq!(l.labels.len(), default_labels().len() + 1);
    assert_eq!(l.labels.last().map(String::as_str), Some("숯불"));
}

#[test]
fn test_fixed_expenses_are_admin_only() {
    let mut l = ledger();
    assert!(l.add_fixed("가스", 40_000, &staff()).unwrap_err().is_permission_denied());
    assert!(l.delete_fixed("f1", &staff()).unwrap_err().is_permission_denied());
    assert_eq!(l.fixed, default_fixed_expenses());

    let admin = Session::fallback();
    let id = l.add_fixed("가스", 40_000, &admin).unwrap().id.clone();
    assert_eq!(l.aggregate(april(), &[]).fixed_total, 219_500);
    let removed: FixedExpense = l.delete_fixed(&id, &admin).unwrap();
    assert_eq!(removed.name, "가스");
    assert!(l.delete_fixed(&id, &admin).is_err());
    assert!(l.add_fixed(" ", 1, &admin).unwrap_err().is_validation());
}

#[test]
fn test_revenue_grid_lookup() {
    let list = [reservation("산수유", "2024-04-05", 150_000, ReservationStatus::Confirmed)];
    assert_eq!(revenue_on(&d("2024-04-05"), "산수유", &list), Some(150_000));
    assert_eq!(revenue_on(&d("2024-04-05"), "소나무", &list), None);
}

#[test]
fn test_format_won() {
    assert_eq!(format_won(0), "₩0");
    assert_eq!(format_won(221_500), "₩221,500");
    assert_eq!(format_won(-121_500), "-₩121,500");
    assert_eq!(format_won(1_000_000), "₩1,000,000");
}

#[test]
fn test_month_parsing() {
    assert_eq!(april(), YearMonth::new(2024, 4).unwrap());
    assert!("2024-13".parse::<YearMonth>().is_err());
    assert!("2024-4".parse::<YearMonth>().is_err());
    assert_eq!(YearMonth::new(2024, 12).unwrap().next(), YearMonth::new(2025, 1).unwrap());
    assert_eq!(april().to_string(), "2024-04");
}

#[test]
fn test_amounts_above_cap_are_rejected() {
    let mut l = ledger();
    assert!(l.add_expense(d("2024-04-02"), "숯불", u64::MAX).unwrap_err().is_validation());
    assert!(l.add_expense(d("2024-04-02"), "숯불", MAX_AMOUNT + 1).is_err());
    assert!(l.add_fixed("가스", u64::MAX, &Session::fallback()).unwrap_err().is_validation());
    assert!(l.entries.is_empty());
    assert_eq!(l.fixed.len(), 3);

    l.add_expense(d("2024-04-02"), "숯불", MAX_AMOUNT).unwrap();
}

#[test]
fn test_aggregate_saturates_on_huge_stored_amounts() {
    // entries written by hand into the data file bypass validation
    let mut l = ledger();
    for (id, amount) in [("a", u64::MAX), ("b", 1)] {
        l.entries.push(FinanceEntry {
            id: id.into(),
            date: d("2024-04-02"),
            kind: EntryKind::Expense,
            category: "기타 비품".into(),
            description: "숯불".into(),
            amount,
        });
    }
    let res = [
        reservation("산수유", "2024-04-05", u64::MAX, ReservationStatus::Confirmed),
        reservation("산수유", "2024-04-06", 1, ReservationStatus::Confirmed),
    ];
    let r = l.aggregate(april(), &res);
    assert_eq!(r.variable_total, u64::MAX);
    assert_eq!(r.grand_total, u64::MAX);
    assert_eq!(r.breakdown, vec![("숯불".to_string(), u64::MAX)]);
    assert_eq!(r.total_revenue, u64::MAX);
    assert_eq!(r.net_cash_flow, 0);

    let r = l.aggregate(april(), &[]);
    assert_eq!(r.net_cash_flow, -i64::MAX);
}
