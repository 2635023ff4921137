use pensiondesk::board::StaffBoard;
use pensiondesk::customers::CustomerBook;
use pensiondesk::inventory::{default_items, Inventory, DEFAULT_MIN_THRESHOLD, DEFAULT_UNIT};
use pensiondesk::models::{
    DateKey, InventoryCategory, PostKind, ReservationOptions, ReservationStatus, UserInfo, UserRole, YearMonth,
};
use pensiondesk::reservations::{NewReservation, ReservationBook, StayOption};
use pensiondesk::session::{login, Session, STAFF_INVITE_CODE};
use pensiondesk::storage::Desk;

fn staff() -> Session {
    Session::new(UserInfo {
        id: "s1".into(),
        name: "이알바".into(),
        role: UserRole::Staff,
        pension_name: "오션뷰".into(),
    })
}

fn d(s: &str) -> DateKey {
    DateKey::parse(s).unwrap()
}

fn booking(room: &str, check_in: &str) -> NewReservation {
    NewReservation {
        room_name: room.into(),
        guest_name: "김지훈".into(),
        check_in: d(check_in),
        check_out: None,
        guest_count: 2,
        total_price: 150_000,
        options: ReservationOptions::default(),
    }
}

#[test]
fn test_date_key_validation() {
    assert!(DateKey::parse("2024-02-29").is_ok());
    assert!(DateKey::parse("2023-02-29").is_err());
    assert!(DateKey::parse("2024/04/05").is_err());
    assert!(DateKey::parse("").is_err());
    assert_eq!(d("2024-04-30").succ().as_str(), "2024-05-01");
    assert_eq!(d("2024-04-05").month(), YearMonth::new(2024, 4).unwrap());
}

#[test]
fn test_date_key_serializes_as_plain_string() {
    let json = serde_json::to_string(&d("2024-04-05")).unwrap();
    assert_eq!(json, "\"2024-04-05\"");
    let bad: Result<DateKey, _> = serde_json::from_str("\"2024-13-01\"");
    assert!(bad.is_err());
}

#[test]
fn test_login_rules() {
    let admin = login("김사장", UserRole::Admin, "오션뷰 펜션", None).unwrap();
    assert!(admin.is_admin());
    assert_eq!(admin.user().pension_name, "오션뷰 펜션");

    assert!(login("이알바", UserRole::Staff, "오션뷰", None).unwrap_err().is_validation());
    assert!(login("이알바", UserRole::Staff, "오션뷰", Some("000000")).is_err());
    let s = login("이알바", UserRole::Staff, "오션뷰", Some(STAFF_INVITE_CODE)).unwrap();
    assert_eq!(s.role(), UserRole::Staff);

    let anon = login("  ", UserRole::Admin, "오션뷰", None).unwrap();
    assert_eq!(anon.name(), "홍길동");
    assert!(login("김사장", UserRole::Admin, " ", None).is_err());
}

#[test]
fn test_fallback_session_is_admin() {
    let s = Session::fallback();
    assert!(s.is_admin());
    assert_eq!(s.name(), "관리자");
}

#[test]
fn test_inventory_adjust_clamps_at_zero() {
    let mut inv = Inventory::new(default_items());
    assert_eq!(inv.adjust_quantity("4", -1).unwrap(), 1);
    assert_eq!(inv.adjust_quantity("4", -10).unwrap(), 0);
    assert_eq!(inv.adjust_quantity("4", 3).unwrap(), 3);
    assert!(inv.adjust_quantity("missing", 1).is_err());
}

#[test]
fn test_inventory_low_stock() {
    let mut inv = Inventory::new(default_items());
    assert_eq!(inv.low_stock_count(), 2);
    // reaching the threshold exactly still counts as low
    inv.adjust_quantity("1", -7).unwrap();
    assert_eq!(inv.low_stock_count(), 3);
}

#[test]
fn test_inventory_add_and_delete_are_admin_only() {
    let mut inv = Inventory::new(Vec::new());
    assert!(inv
        .add_item("휴지", InventoryCategory::Disposable, 10, None, &staff())
        .unwrap_err()
        .is_permission_denied());

    let admin = Session::fallback();
    let item = inv.add_item("휴지", InventoryCategory::Disposable, 10, None, &admin).unwrap().clone();
    assert_eq!(item.unit, DEFAULT_UNIT);
    assert_eq!(item.min_threshold, DEFAULT_MIN_THRESHOLD);
    assert!(inv.add_item(" ", InventoryCategory::Disposable, 1, None, &admin).unwrap_err().is_validation());

    assert!(inv.delete_item(&item.id, &staff()).unwrap_err().is_permission_denied());
    inv.delete_item(&item.id, &admin).unwrap();
    assert!(inv.items.is_empty());
}

#[test]
fn test_inventory_filter() {
    let inv = Inventory::new(default_items());
    assert_eq!(inv.filtered(Some(InventoryCategory::Consumable), "").len(), 2);
    assert_eq!(inv.filtered(None, "샴푸").len(), 1);
    assert_eq!(inv.filtered(Some(InventoryCategory::Equipment), "샴푸").len(), 0);
}

#[test]
fn test_reservation_defaults_and_validation() {
    let mut book = ReservationBook::new(Vec::new());
    let r = book.add_reservation(booking("산수유", "2024-04-05")).unwrap().clone();
    assert_eq!(r.status, ReservationStatus::Confirmed);
    assert_eq!(r.check_out, r.check_in);

    let mut bad = booking("산수유", "2024-04-05");
    bad.guest_name = " ".into();
    assert!(book.add_reservation(bad).unwrap_err().is_validation());

    let mut bad = booking("산수유", "2024-04-05");
    bad.guest_count = 0;
    assert!(book.add_reservation(bad).is_err());

    let mut bad = booking("산수유", "2024-04-05");
    bad.check_out = Some(d("2024-04-04"));
    assert!(book.add_reservation(bad).is_err());

    assert_eq!(book.reservations.len(), 1);
}

#[test]
fn test_reservation_month_and_status() {
    let mut book = ReservationBook::new(Vec::new());
    book.add_reservation(booking("소나무", "2024-04-20")).unwrap();
    let id = book.add_reservation(booking("산수유", "2024-04-05")).unwrap().id.clone();
    book.add_reservation(booking("대나무", "2024-05-01")).unwrap();

    let april = YearMonth::new(2024, 4).unwrap();
    let rooms: Vec<&str> = book.in_month(april).iter().map(|r| r.room_name.as_str()).collect();
    assert_eq!(rooms, vec!["산수유", "소나무"]);

    book.set_status(&id, ReservationStatus::Cancelled).unwrap();
    assert_eq!(book.confirmed_in(april).len(), 1);
    assert_eq!(book.on_day(&d("2024-04-05")).len(), 1);
    assert!(book.set_status("missing", ReservationStatus::Pending).is_err());
}

#[test]
fn test_stay_options() {
    let mut opts = ReservationOptions::default();
    assert_eq!(opts.summary(), "없음");
    opts.adjust(StayOption::Jacuzzi, 1);
    opts.adjust(StayOption::Pet, 2);
    opts.adjust(StayOption::Charcoal, -1);
    assert_eq!(opts.charcoal, 0);
    assert_eq!(opts.summary(), "자쿠지, 반려견");
}

#[test]
fn test_board_posts_and_comments() {
    let mut board = StaffBoard::new(Vec::new());
    board.add_post(PostKind::Idea, "바베큐 세트", "숯불 세트 판매", &staff()).unwrap();
    let id = board
        .add_post(PostKind::Order, "청소", "소나무 객실 점검", &Session::fallback())
        .unwrap()
        .id
        .clone();
    assert_eq!(board.posts[0].id, id);
    assert_eq!(board.posts[1].author, "이알바");

    assert_eq!(board.like(&id).unwrap(), 1);
    assert_eq!(board.like(&id).unwrap(), 2);
    board.comment(&id, "확인했습니다", &staff()).unwrap();
    assert_eq!(board.posts[0].comments[0].author, "이알바");
    assert!(board.comment(&id, "  ", &staff()).unwrap_err().is_validation());
    assert!(board.like("missing").is_err());

    assert_eq!(board.filtered(Some(PostKind::Idea)).len(), 1);
    assert_eq!(board.filtered(None).len(), 2);
    assert!(board.add_post(PostKind::Idea, "", "x", &staff()).is_err());
}

#[test]
fn test_customers_admin_only_and_search() {
    let mut book = CustomerBook::default();
    assert!(book
        .add_customer("김민수", "010-1234-5678", "minsoo@example.com", "", None, &staff())
        .unwrap_err()
        .is_permission_denied());

    let admin = Session::fallback();
    book.add_customer("김민수", "010-1234-5678", "minsoo@example.com", "재방문", Some(d("2024-03-01")), &admin)
        .unwrap();
    book.add_customer("박영희", "010-9999-0000", "young@example.com", "", None, &admin).unwrap();

    assert_eq!(book.search("").len(), 2);
    assert_eq!(book.search("1234").len(), 1);
    assert_eq!(book.search("young@").len(), 1);
    assert_eq!(book.search("최").len(), 0);
}

#[test]
fn test_seeded_desk_round_trips_through_json() {
    let desk = Desk::seeded();
    assert_eq!(desk.checklist.tasks.len(), 6);
    assert_eq!(desk.ledger.fixed.len(), 3);
    assert_eq!(desk.inventory.items.len(), 5);

    let json = serde_json::to_string(&desk).unwrap();
    let back: Desk = serde_json::from_str(&json).unwrap();
    assert_eq!(back, desk);

    // missing sections fall back to empty
    let partial: Desk = serde_json::from_str("{}").unwrap();
    assert!(partial.checklist.tasks.is_empty());
}

#[test]
fn test_adjust_quantity_saturates() {
    let mut inv = Inventory::new(default_items());
    assert_eq!(inv.adjust_quantity("1", i64::MAX).unwrap(), u32::MAX);
    assert_eq!(inv.adjust_quantity("1", 1).unwrap(), u32::MAX);
    assert_eq!(inv.adjust_quantity("1", i64::MIN).unwrap(), 0);
}

#[test]
fn test_reservation_price_cap() {
    let mut book = ReservationBook::new(Vec::new());
    let mut big = booking("산수유", "2024-04-05");
    big.total_price = u64::MAX;
    assert!(book.add_reservation(big).unwrap_err().is_validation());
    assert!(book.reservations.is_empty());
}

#[test]
fn test_adjust_addons_on_booking() {
    let mut book = ReservationBook::new(Vec::new());
    let id = book.add_reservation(booking("소나무", "2024-04-05")).unwrap().id.clone();
    let opts = book.adjust_option(&id, StayOption::ExtraPerson, 2).unwrap();
    assert_eq!(opts.extra_person, 2);
    let opts = book.adjust_option(&id, StayOption::ExtraPerson, -5).unwrap();
    assert_eq!(opts.extra_person, 0);
    assert!(book.adjust_option("missing", StayOption::Pet, 1).is_err());
    assert_eq!("extra-person".parse::<StayOption>().unwrap(), StayOption::ExtraPerson);
    assert!("sauna".parse::<StayOption>().is_err());
}
