//! # PensionDesk
//!
//! A terminal desk for running a small pension: daily checklists with
//! staff/admin dual approval, room reservations, inventory, a staff
//! bulletin board, customer records and a monthly cash-flow report.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! pensiondesk
//! # or explicitly
//! pensiondesk ui
//! ```
//!
//! **Checklist View**
//! *   `←`/`→`: Previous / next day
//! *   `Space`: Toggle staff done
//! *   `v`: Toggle admin verification (admin only)
//! *   `a`: Add master task (admin only)
//! *   `d`: Delete master task (admin only)
//! *   `f`: Cycle category filter
//!
//! **Finance View** (admin only)
//! *   `←`/`→`: Previous / next month
//!
//! `Tab` switches views, `q` quits.
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Choose who you are (no password; staff need the invite code)
//! pensiondesk login "이알바" --role staff --invite 123456
//!
//! # Today's checklist, then mark task 2 done and verify it
//! pensiondesk check list
//! pensiondesk check toggle 2
//! pensiondesk check toggle 2 --verify
//!
//! # Ledger
//! pensiondesk finance expense 숯불 10000 --date 2024-04-05
//! pensiondesk finance report --month 2024-04
//! ```
//!
//! ## Data Storage
//!
//! The desk is saved as JSON in your local data directory
//! (`~/.local/share/pensiondesk/desk.json` on Linux), with the signed-in
//! identity next to it in `session.json`. Override the location with the
//! `PENSIONDESK_DB` environment variable and the log level with
//! `PENSIONDESK_LOG`.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process::ExitCode;

use pensiondesk::commands::*;
use pensiondesk::error::DeskResult;
use pensiondesk::logging::{init_logger, init_logger_with_level};
use pensiondesk::models::{DateKey, InventoryCategory, PostKind, ReservationStatus, TaskCategory, UserRole};
use pensiondesk::reservations::{NewReservation, StayOption};
use pensiondesk::storage::load_session;
use pensiondesk::tui::run_tui;

#[derive(Parser)]
#[command(name = "pensiondesk")]
#[command(about = "Pension management desk", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose the acting identity
    Login {
        /// Your name
        name: String,
        /// admin or staff
        #[arg(short, long, default_value = "admin")]
        role: UserRole,
        /// Pension name
        #[arg(short, long, default_value = "오션뷰 펜션")]
        pension: String,
        /// Invite code (required for staff)
        #[arg(short, long)]
        invite: Option<String>,
    },
    /// Show the acting identity
    Whoami,
    /// Today's dashboard
    Summary,
    /// Daily checklist
    Check {
        #[command(subcommand)]
        command: CheckCommands,
    },
    /// Monthly ledger (admin only)
    Finance {
        #[command(subcommand)]
        command: FinanceCommands,
    },
    /// Stock of equipment and supplies
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
    /// Room reservations
    Reservation {
        #[command(subcommand)]
        command: ReservationCommands,
    },
    /// Staff bulletin board
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Customer records (admin only)
    Customer {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Reset the desk (delete all data and the signed-in identity)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum CheckCommands {
    /// Show a day's checklist
    List {
        /// Day in YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// promotion, room, inventory-check or reservation-check
        #[arg(short, long)]
        category: Option<TaskCategory>,
    },
    /// Toggle staff done (or admin verification with --verify)
    Toggle {
        id: String,
        #[arg(short, long)]
        date: Option<String>,
        /// Toggle the admin verification instead
        #[arg(short, long)]
        verify: bool,
    },
    /// Add a master task (admin only)
    Add {
        /// promotion, room, inventory-check or reservation-check
        category: TaskCategory,
        /// Task description (quoted if it has spaces)
        description: String,
    },
    /// Delete a master task (admin only)
    Remove { id: String },
}

#[derive(Subcommand)]
enum FinanceCommands {
    /// Monthly report
    Report {
        /// Month in YYYY-MM (default: this month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Record a dated expense
    Expense {
        description: String,
        amount: u64,
        /// Day in YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Manage fixed monthly expenses
    Fixed {
        #[command(subcommand)]
        command: FixedCommands,
    },
    /// Show suggested expense items
    Labels,
}

#[derive(Subcommand)]
enum FixedCommands {
    /// List fixed expenses
    List,
    /// Add a fixed expense (admin only)
    Add { name: String, amount: u64 },
    /// Remove a fixed expense (admin only)
    Remove { id: String },
}

#[derive(Subcommand)]
enum InventoryCommands {
    /// List items
    List {
        /// equipment, disposable or consumable
        #[arg(short, long)]
        category: Option<InventoryCategory>,
        /// Name contains
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Register an item (admin only)
    Add {
        name: String,
        /// equipment, disposable or consumable
        category: InventoryCategory,
        #[arg(short, long, default_value_t = 0)]
        quantity: u32,
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// Count stock up or down, e.g. `adjust 2 -- -1`
    Adjust {
        id: String,
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove an item (admin only)
    Remove { id: String },
}

#[derive(Subcommand)]
enum ReservationCommands {
    /// List reservations of a day or month
    List {
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Book a stay
    Add {
        room: String,
        guest: String,
        /// Check-in day in YYYY-MM-DD
        check_in: String,
        /// Check-out day (default: check-in day)
        #[arg(long)]
        check_out: Option<String>,
        #[arg(short, long, default_value_t = 2)]
        guests: u32,
        #[arg(short, long, default_value_t = 0)]
        price: u64,
        #[arg(long, default_value_t = 0)]
        jacuzzi: u32,
        #[arg(long, default_value_t = 0)]
        charcoal: u32,
        #[arg(long, default_value_t = 0)]
        extra_person: u32,
        #[arg(long, default_value_t = 0)]
        pet: u32,
    },
    /// Change status (confirmed, pending, cancelled)
    Status { id: String, status: ReservationStatus },
    /// Book more or fewer add-ons, e.g. `addon 3f2a charcoal -- -1`
    Addon {
        id: String,
        /// jacuzzi, charcoal, extra-person or pet
        option: StayOption,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
}

#[derive(Subcommand)]
enum BoardCommands {
    /// List posts
    List {
        /// idea or order
        #[arg(short, long)]
        kind: Option<PostKind>,
    },
    /// Publish a post
    Post {
        /// idea or order
        kind: PostKind,
        title: String,
        content: String,
    },
    /// Like a post
    Like { id: String },
    /// Comment on a post
    Comment { id: String, text: String },
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// Search customers by name, phone or email
    List { query: Option<String> },
    /// Register a customer
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        phone: String,
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, default_value = "")]
        note: String,
        /// Last visit in YYYY-MM-DD
        #[arg(short, long)]
        last_visit: Option<String>,
    },
}

/// Prints failures raised outside the `cmd_*` functions.
fn reported<T>(result: DeskResult<T>) -> DeskResult<T> {
    if let Err(e) = &result {
        eprintln!("{}", e);
    }
    result
}

fn run(command: Option<Commands>) -> DeskResult<()> {
    if let Some(Commands::Login { name, role, pension, invite }) = command {
        return cmd_login(name, role, pension, invite, false).map(|_| ());
    }
    // the identity record is read once and passed down explicitly
    let session = reported(load_session())?;
    match command {
        Some(Commands::Whoami) => {
            cmd_whoami(&session);
            Ok(())
        }
        Some(Commands::Summary) => cmd_summary(&session),
        Some(Commands::Check { command }) => match command {
            CheckCommands::List { date, category } => cmd_check_list(date, category),
            CheckCommands::Toggle { id, date, verify } => {
                cmd_check_toggle(&session, id, date, toggle_field(verify), false).map(|_| ())
            }
            CheckCommands::Add { category, description } => {
                cmd_check_add(&session, category, description, false).map(|_| ())
            }
            CheckCommands::Remove { id } => cmd_check_remove(&session, id, false).map(|_| ()),
        },
        Some(Commands::Finance { command }) => match command {
            FinanceCommands::Report { month } => cmd_finance_report(&session, month, false).map(|_| ()),
            FinanceCommands::Expense { description, amount, date } => {
                cmd_expense_add(&session, date, description, amount, false).map(|_| ())
            }
            FinanceCommands::Fixed { command } => match command {
                FixedCommands::List => cmd_fixed_list(),
                FixedCommands::Add { name, amount } => cmd_fixed_add(&session, name, amount, false).map(|_| ()),
                FixedCommands::Remove { id } => cmd_fixed_remove(&session, id, false).map(|_| ()),
            },
            FinanceCommands::Labels => cmd_labels(),
        },
        Some(Commands::Inventory { command }) => match command {
            InventoryCommands::List { category, search } => cmd_inventory_list(category, search),
            InventoryCommands::Add { name, category, quantity, unit } => {
                cmd_inventory_add(&session, name, category, quantity, unit, false)
            }
            InventoryCommands::Adjust { id, delta } => cmd_inventory_adjust(id, delta, false).map(|_| ()),
            InventoryCommands::Remove { id } => cmd_inventory_remove(&session, id, false),
        },
        Some(Commands::Reservation { command }) => match command {
            ReservationCommands::List { date, month } => cmd_reservation_list(date, month),
            ReservationCommands::Add {
                room,
                guest,
                check_in,
                check_out,
                guests,
                price,
                jacuzzi,
                charcoal,
                extra_person,
                pet,
            } => {
                let new = NewReservation {
                    room_name: room,
                    guest_name: guest,
                    check_in: reported(DateKey::parse(&check_in))?,
                    check_out: reported(check_out.as_deref().map(DateKey::parse).transpose())?,
                    guest_count: guests,
                    total_price: price,
                    options: options_from(jacuzzi, charcoal, extra_person, pet),
                };
                cmd_reservation_add(new, false).map(|_| ())
            }
            ReservationCommands::Status { id, status } => cmd_reservation_status(id, status, false).map(|_| ()),
            ReservationCommands::Addon { id, option, delta } => {
                cmd_reservation_option(id, option, delta, false).map(|_| ())
            }
        },
        Some(Commands::Board { command }) => match command {
            BoardCommands::List { kind } => cmd_board_list(kind),
            BoardCommands::Post { kind, title, content } => {
                cmd_board_post(&session, kind, title, content, false).map(|_| ())
            }
            BoardCommands::Like { id } => cmd_board_like(id, false).map(|_| ()),
            BoardCommands::Comment { id, text } => cmd_board_comment(&session, id, text, false),
        },
        Some(Commands::Customer { command }) => match command {
            CustomerCommands::List { query } => cmd_customer_list(&session, query, false).map(|_| ()),
            CustomerCommands::Add { name, phone, email, note, last_visit } => {
                cmd_customer_add(&session, name, phone, email, note, last_visit, false).map(|_| ())
            }
        },
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Login { .. }) | Some(Commands::Completions { .. }) | Some(Commands::Ui) | None => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return ExitCode::FAILURE;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "pensiondesk", &mut io::stdout());
            ExitCode::SUCCESS
        }
        Some(Commands::Ui) | None => {
            init_logger_with_level("off");
            match load_session().map_err(|e| e.to_string()).and_then(|s| run_tui(s).map_err(|e| e.to_string())) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error running TUI: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        command => {
            init_logger();
            // commands print their own failures
            match run(command) {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            }
        }
    }
}
