use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::access::requires;
use crate::checklist::{ApprovalPhase, StatusField};
use crate::error::DeskResult;
use crate::finance::{format_won, revenue_on, MonthlyReport};
use crate::models::{
    ChecklistItem, Customer, DateKey, FinanceEntry, FixedExpense, InventoryCategory, PostKind, Reservation,
    ReservationOptions, ReservationStatus, StaffPost, TaskCategory, TaskStatus, UserRole, YearMonth, MAX_AMOUNT,
};
use crate::reservations::{NewReservation, StayOption, ROOMS};
use crate::session::{self, Session};
use crate::storage::{delete_database, load_desk, save_desk, save_session, Desk};

/// Loads the desk, applies `f`, and saves only if `f` succeeded.
fn with_desk<T>(f: impl FnOnce(&mut Desk) -> DeskResult<T>) -> DeskResult<T> {
    let mut desk = load_desk()?;
    let out = f(&mut desk)?;
    save_desk(&desk)?;
    Ok(out)
}

/// Prints the outcome unless `silent`, then hands the result back.
fn finish<T>(result: DeskResult<T>, silent: bool, on_ok: impl FnOnce(&T)) -> DeskResult<T> {
    if !silent {
        match &result {
            Ok(v) => on_ok(v),
            Err(e) => eprintln!("{}", e),
        }
    }
    result
}

fn date_or_today(date: Option<&str>) -> DeskResult<DateKey> {
    date.map(DateKey::parse).unwrap_or_else(|| Ok(DateKey::today()))
}

fn month_or_current(month: Option<&str>) -> DeskResult<YearMonth> {
    month.map(str::parse).unwrap_or_else(|| Ok(YearMonth::current()))
}

fn header(cols: &[&str]) -> Vec<Cell> {
    cols.iter().map(|c| Cell::new(c).add_attribute(Attribute::Bold)).collect()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Picks an identity and stores it as the session record.
pub fn cmd_login(name: String, role: UserRole, pension: String, invite: Option<String>, silent: bool) -> DeskResult<Session> {
    let result = session::login(&name, role, &pension, invite.as_deref()).and_then(|s| {
        save_session(&s)?;
        Ok(s)
    });
    finish(result, silent, |s| {
        println!("Signed in as {} ({}) at {}.", s.name(), s.role().label(), s.user().pension_name)
    })
}

pub fn cmd_whoami(session: &Session) {
    let u = session.user();
    println!("{} • {} • {} (id = {})", u.name, u.role.label(), u.pension_name, u.id);
}

/// Dashboard figures: today's arrivals, month revenue, low stock, checklist progress.
pub fn cmd_summary(session: &Session) -> DeskResult<()> {
    let desk = finish(load_desk(), false, |_| {})?;
    let today = DateKey::today();
    let month = today.month();
    let arrivals = desk.reservations.on_day(&today);
    let guests: u32 = arrivals.iter().map(|r| r.guest_count).sum();
    let stats = desk.checklist.stats(&today);

    let mut table = new_table();
    table.set_header(header(&["Today", "Value"]));
    table.add_row(vec![Cell::new("오늘의 예약"), Cell::new(arrivals.len())]);
    table.add_row(vec![Cell::new("방문 예정객"), Cell::new(format!("{}명", guests))]);
    if session.is_admin() {
        let revenue = desk
            .reservations
            .confirmed_in(month)
            .iter()
            .fold(0u64, |sum, r| sum.saturating_add(r.total_price));
        table.add_row(vec![Cell::new("이번달 매출"), Cell::new(format_won(revenue.min(MAX_AMOUNT) as i64))]);
    }
    let low = desk.inventory.low_stock_count();
    table.add_row(vec![
        Cell::new("부족 재고"),
        Cell::new(low).fg(if low > 0 { Color::Red } else { Color::Green }),
    ]);
    table.add_row(vec![
        Cell::new("업무 진행률"),
        Cell::new(format!("{}% ({} / {} 승인)", stats.done_percent, stats.verified, stats.total)),
    ]);
    println!("{} · {}", session.user().pension_name, today);
    println!("{table}");
    Ok(())
}

pub fn cmd_check_list(date: Option<String>, category: Option<TaskCategory>) -> DeskResult<()> {
    let date = finish(date_or_today(date.as_deref()), false, |_| {})?;
    let desk = finish(load_desk(), false, |_| {})?;
    let tasks = desk.checklist.tasks_in(category);
    let stats = desk.checklist.stats(&date);

    println!(
        "{}: {}% done, {} / {} verified by admin",
        date, stats.done_percent, stats.verified, stats.total
    );
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(header(&["ID", "Category", "Task", "Staff", "Admin", "Status"]));
    for t in tasks {
        let status = desk.checklist.status(&date, &t.id);
        let phase = ApprovalPhase::of(&status);
        let color = match phase {
            ApprovalPhase::Verified => Color::Green,
            ApprovalPhase::AwaitingVerification => Color::Blue,
            ApprovalPhase::Open => Color::Grey,
        };
        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(t.category.label()),
            Cell::new(&t.task),
            Cell::new(if status.staff_done { "✔" } else { "" }),
            Cell::new(if status.admin_verified { "✔" } else { "" }),
            Cell::new(phase.label()).fg(color),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Flips the staff-done or admin-verified flag of a task for a day.
pub fn cmd_check_toggle(
    session: &Session,
    task_id: String,
    date: Option<String>,
    field: StatusField,
    silent: bool,
) -> DeskResult<TaskStatus> {
    let result = date_or_today(date.as_deref())
        .and_then(|date| with_desk(|desk| desk.checklist.toggle_status(&date, &task_id, field, session)));
    finish(result, silent, |s| {
        println!(
            "Task {}: staff done = {}, admin verified = {}",
            task_id, s.staff_done, s.admin_verified
        )
    })
}

pub fn cmd_check_add(session: &Session, category: TaskCategory, description: String, silent: bool) -> DeskResult<ChecklistItem> {
    let result = requires(session, UserRole::Admin, "add a master task")
        .and_then(|_| with_desk(|desk| desk.checklist.add_task(category, &description).cloned()));
    finish(result, silent, |t| println!("Task added (id = {})", t.id))
}

pub fn cmd_check_remove(session: &Session, task_id: String, silent: bool) -> DeskResult<ChecklistItem> {
    let result = with_desk(|desk| desk.checklist.delete_task(&task_id, session));
    finish(result, silent, |t| println!("Task {} removed.", t.id))
}

pub fn print_report(report: &MonthlyReport, pension_name: &str) {
    println!("{}월 {} 재무 리포트 ({})", report.month.month, pension_name, report.month);

    let mut revenue = new_table();
    revenue.set_header(header(&["Room", "Revenue"]));
    for room in ROOMS {
        revenue.add_row(vec![Cell::new(room), Cell::new(format_won(report.revenue_for(room) as i64))]);
    }
    for (room, v) in report.room_revenue.iter().filter(|(r, _)| !ROOMS.contains(&r.as_str())) {
        revenue.add_row(vec![Cell::new(room), Cell::new(format_won(*v as i64))]);
    }
    revenue.add_row(vec![
        Cell::new("합계").add_attribute(Attribute::Bold),
        Cell::new(format_won(report.total_revenue as i64)).add_attribute(Attribute::Bold),
    ]);
    println!("{revenue}");

    let mut breakdown = new_table();
    breakdown.set_header(header(&["Expense item", "Amount", "Share"]));
    if report.breakdown.is_empty() {
        breakdown.add_row(vec!["-", "-", "-"]);
    }
    for (name, amount) in &report.breakdown {
        breakdown.add_row(vec![
            Cell::new(name),
            Cell::new(format_won(*amount as i64)),
            Cell::new(format!("{}%", report.category_percent(*amount))),
        ]);
    }
    println!("{breakdown}");

    let net_color = if report.net_cash_flow < 0 { Color::Red } else { Color::Green };
    let mut totals = new_table();
    totals.set_header(header(&["Totals", "Amount"]));
    totals.add_row(vec![Cell::new("고정 경비"), Cell::new(format_won(report.fixed_total as i64))]);
    totals.add_row(vec![Cell::new("변동 지출"), Cell::new(format_won(report.variable_total as i64))]);
    totals.add_row(vec![Cell::new("총 지출"), Cell::new(format_won(report.grand_total as i64))]);
    totals.add_row(vec![Cell::new("총 매출"), Cell::new(format_won(report.total_revenue as i64))]);
    totals.add_row(vec![
        Cell::new("순이익").add_attribute(Attribute::Bold),
        Cell::new(format_won(report.net_cash_flow)).fg(net_color).add_attribute(Attribute::Bold),
    ]);
    println!("{totals}");

    if !report.by_date.is_empty() {
        let mut log = new_table();
        log.set_header(header(&["Date", "Item", "Amount"]));
        for (date, entries) in &report.by_date {
            for e in entries {
                log.add_row(vec![Cell::new(date), Cell::new(&e.description), Cell::new(format_won(e.amount as i64))]);
            }
        }
        println!("{log}");
    }
}

pub fn cmd_finance_report(session: &Session, month: Option<String>, silent: bool) -> DeskResult<MonthlyReport> {
    let result = requires(session, UserRole::Admin, "view finance reports")
        .and_then(|_| month_or_current(month.as_deref()))
        .and_then(|month| {
            let desk = load_desk()?;
            Ok(desk.ledger.aggregate(month, &desk.reservations.reservations))
        });
    finish(result, silent, |r| print_report(r, &session.user().pension_name))
}

pub fn cmd_expense_add(
    session: &Session,
    date: Option<String>,
    description: String,
    amount: u64,
    silent: bool,
) -> DeskResult<FinanceEntry> {
    let result = requires(session, UserRole::Admin, "record expenses")
        .and_then(|_| date_or_today(date.as_deref()))
        .and_then(|date| with_desk(|desk| desk.ledger.add_expense(date, &description, amount).cloned()));
    finish(result, silent, |e| {
        println!("Expense recorded on {}: {} {}", e.date, e.description, format_won(e.amount as i64))
    })
}

pub fn cmd_fixed_add(session: &Session, name: String, amount: u64, silent: bool) -> DeskResult<FixedExpense> {
    let result = with_desk(|desk| desk.ledger.add_fixed(&name, amount, session).cloned());
    finish(result, silent, |f| println!("Fixed expense added (id = {})", f.id))
}

pub fn cmd_fixed_remove(session: &Session, id: String, silent: bool) -> DeskResult<FixedExpense> {
    let result = with_desk(|desk| desk.ledger.delete_fixed(&id, session));
    finish(result, silent, |f| println!("Fixed expense '{}' removed.", f.name))
}

pub fn cmd_fixed_list() -> DeskResult<()> {
    let desk = finish(load_desk(), false, |_| {})?;
    let mut table = new_table();
    table.set_header(header(&["ID", "Name", "Monthly"]));
    for f in &desk.ledger.fixed {
        table.add_row(vec![Cell::new(&f.id), Cell::new(&f.name), Cell::new(format_won(f.amount as i64))]);
    }
    println!("{table}");
    Ok(())
}

pub fn cmd_labels() -> DeskResult<()> {
    let desk = finish(load_desk(), false, |_| {})?;
    if desk.ledger.labels.is_empty() {
        println!("No suggestions yet.");
    } else {
        println!("{}", desk.ledger.labels.join(" · "));
    }
    Ok(())
}

pub fn cmd_inventory_list(category: Option<InventoryCategory>, search: Option<String>) -> DeskResult<()> {
    let desk = finish(load_desk(), false, |_| {})?;
    let items = desk.inventory.filtered(category, search.as_deref().unwrap_or(""));
    println!("Low stock: {}", desk.inventory.low_stock_count());
    if items.is_empty() {
        println!("No items found.");
        return Ok(());
    }
    let mut table = new_table();
    table.set_header(header(&["ID", "Name", "Category", "Qty", "Min", "Status"]));
    for i in items {
        let (label, color) = if i.is_low() { ("부족", Color::Red) } else { ("정상", Color::Green) };
        table.add_row(vec![
            Cell::new(&i.id),
            Cell::new(&i.name),
            Cell::new(i.category.label()),
            Cell::new(format!("{} {}", i.quantity, i.unit)),
            Cell::new(i.min_threshold),
            Cell::new(label).fg(color),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn cmd_inventory_add(
    session: &Session,
    name: String,
    category: InventoryCategory,
    quantity: u32,
    unit: Option<String>,
    silent: bool,
) -> DeskResult<()> {
    let result = with_desk(|desk| {
        desk.inventory
            .add_item(&name, category, quantity, unit.as_deref(), session)
            .map(|i| i.id.clone())
    });
    finish(result, silent, |id| println!("Item added (id = {})", id)).map(|_| ())
}

pub fn cmd_inventory_adjust(id: String, delta: i64, silent: bool) -> DeskResult<u32> {
    let result = with_desk(|desk| desk.inventory.adjust_quantity(&id, delta));
    finish(result, silent, |q| println!("Item {} quantity is now {}.", id, q))
}

pub fn cmd_inventory_remove(session: &Session, id: String, silent: bool) -> DeskResult<()> {
    let result = with_desk(|desk| desk.inventory.delete_item(&id, session));
    finish(result, silent, |i| println!("Item '{}' removed.", i.name)).map(|_| ())
}

fn reservation_table(list: &[&Reservation]) -> Table {
    let mut table = new_table();
    table.set_header(header(&["ID", "Check-in", "Check-out", "Room", "Guest", "Pax", "Options", "Price", "Status"]));
    for r in list {
        let color = match r.status {
            ReservationStatus::Confirmed => Color::Green,
            ReservationStatus::Pending => Color::Yellow,
            ReservationStatus::Cancelled => Color::Grey,
        };
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.check_in),
            Cell::new(&r.check_out),
            Cell::new(&r.room_name),
            Cell::new(&r.guest_name),
            Cell::new(r.guest_count),
            Cell::new(r.options.summary()),
            Cell::new(format_won(r.total_price as i64)),
            Cell::new(r.status).fg(color),
        ]);
    }
    table
}

/// Lists the stays of one day, or of a whole month when no day is given.
pub fn cmd_reservation_list(date: Option<String>, month: Option<String>) -> DeskResult<()> {
    let desk = finish(load_desk(), false, |_| {})?;
    let by_month = date.is_none();
    let list = match date {
        Some(d) => {
            let d = finish(DateKey::parse(&d), false, |_| {})?;
            desk.reservations.on_day(&d)
        }
        None => {
            let m = finish(month_or_current(month.as_deref()), false, |_| {})?;
            desk.reservations.in_month(m)
        }
    };
    if list.is_empty() {
        println!("No reservations found.");
        return Ok(());
    }
    println!("{}", reservation_table(&list));
    if by_month {
        let mut days: Vec<DateKey> = list.iter().map(|r| r.check_in.clone()).collect();
        days.dedup();
        println!("{}", revenue_grid(&days, &desk.reservations.reservations));
    }
    Ok(())
}

/// Day-by-room price grid, one row per check-in day.
fn revenue_grid(days: &[DateKey], reservations: &[Reservation]) -> Table {
    let mut table = new_table();
    let mut cols = vec!["Day"];
    cols.extend(ROOMS);
    table.set_header(header(&cols));
    for day in days {
        let mut row = vec![Cell::new(day)];
        for room in ROOMS {
            let cell = match revenue_on(day, room, reservations) {
                Some(price) => Cell::new(format_won(price.min(MAX_AMOUNT) as i64)),
                None => Cell::new("-").fg(Color::Grey),
            };
            row.push(cell);
        }
        table.add_row(row);
    }
    table
}

pub fn cmd_reservation_add(new: NewReservation, silent: bool) -> DeskResult<Reservation> {
    let result = with_desk(|desk| desk.reservations.add_reservation(new).cloned());
    finish(result, silent, |r| println!("Reservation added (id = {})", r.id))
}

pub fn cmd_reservation_status(id: String, status: ReservationStatus, silent: bool) -> DeskResult<Reservation> {
    let result = with_desk(|desk| desk.reservations.set_status(&id, status).cloned());
    finish(result, silent, |r| println!("Reservation {} is now {}.", r.id, r.status))
}

pub fn cmd_reservation_option(id: String, option: StayOption, delta: i32, silent: bool) -> DeskResult<ReservationOptions> {
    let result = with_desk(|desk| desk.reservations.adjust_option(&id, option, delta));
    finish(result, silent, |o| println!("Reservation {} add-ons: {}", id, o.summary()))
}

/// Builds add-on counts from CLI flags.
pub fn options_from(jacuzzi: u32, charcoal: u32, extra_person: u32, pet: u32) -> ReservationOptions {
    ReservationOptions { jacuzzi, charcoal, extra_person, pet }
}

fn print_post(p: &StaffPost) {
    let color = match p.kind {
        PostKind::Idea => Color::Yellow,
        PostKind::Order => Color::Red,
    };
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(p.kind.label()).fg(color).add_attribute(Attribute::Bold),
        Cell::new(&p.title).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new(format!("{} · ♥ {}", p.author, p.likes)), Cell::new(&p.content)]);
    for c in &p.comments {
        table.add_row(vec![Cell::new(&c.author), Cell::new(&c.text)]);
    }
    println!("[{}]", p.id);
    println!("{table}");
}

pub fn cmd_board_list(kind: Option<PostKind>) -> DeskResult<()> {
    let desk = finish(load_desk(), false, |_| {})?;
    let posts = desk.board.filtered(kind);
    if posts.is_empty() {
        println!("No posts yet.");
    }
    for p in posts {
        print_post(p);
    }
    Ok(())
}

pub fn cmd_board_post(session: &Session, kind: PostKind, title: String, content: String, silent: bool) -> DeskResult<StaffPost> {
    let result = with_desk(|desk| desk.board.add_post(kind, &title, &content, session).cloned());
    finish(result, silent, |p| println!("Post published (id = {})", p.id))
}

pub fn cmd_board_like(id: String, silent: bool) -> DeskResult<u32> {
    let result = with_desk(|desk| desk.board.like(&id));
    finish(result, silent, |n| println!("Post {} now has {} likes.", id, n))
}

pub fn cmd_board_comment(session: &Session, id: String, text: String, silent: bool) -> DeskResult<()> {
    let result = with_desk(|desk| desk.board.comment(&id, &text, session).map(|_| ()));
    finish(result, silent, |_| println!("Comment added to post {}.", id))
}

pub fn cmd_customer_list(session: &Session, query: Option<String>, silent: bool) -> DeskResult<Vec<Customer>> {
    let result = requires(session, UserRole::Admin, "view customer records").and_then(|_| {
        let desk = load_desk()?;
        Ok(desk
            .customers
            .search(query.as_deref().unwrap_or(""))
            .into_iter()
            .cloned()
            .collect::<Vec<_>>())
    });
    finish(result, silent, |list| {
        if list.is_empty() {
            println!("No customers found.");
            return;
        }
        let mut table = new_table();
        table.set_header(header(&["ID", "Name", "Phone", "Email", "Last visit", "Note"]));
        for c in list {
            table.add_row(vec![
                Cell::new(&c.id),
                Cell::new(&c.name),
                Cell::new(&c.phone),
                Cell::new(&c.email),
                Cell::new(c.last_visit.as_ref().map(|d| d.to_string()).unwrap_or_else(|| "-".into())),
                Cell::new(&c.note),
            ]);
        }
        println!("{table}");
    })
}

pub fn cmd_customer_add(
    session: &Session,
    name: String,
    phone: String,
    email: String,
    note: String,
    last_visit: Option<String>,
    silent: bool,
) -> DeskResult<Customer> {
    let result = last_visit
        .as_deref()
        .map(DateKey::parse)
        .transpose()
        .and_then(|visit| {
            with_desk(|desk| desk.customers.add_customer(&name, &phone, &email, &note, visit, session).cloned())
        });
    finish(result, silent, |c| println!("Customer added (id = {})", c.id))
}

/// Resets the desk by deleting the data file and the identity record.
pub fn cmd_reset(force: bool) -> DeskResult<()> {
    if !force {
        print!("Are you sure you want to delete all desk data? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }
    let result = delete_database();
    finish(result, false, |_| println!("Desk reset successfully."))
}

/// Maps a `--verify` flag to the checklist field it toggles.
pub fn toggle_field(verify: bool) -> StatusField {
    if verify {
        StatusField::AdminVerified
    } else {
        StatusField::StaffDone
    }
}

