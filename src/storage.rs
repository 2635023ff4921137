use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::StaffBoard;
use crate::checklist::{default_tasks, Checklist};
use crate::customers::CustomerBook;
use crate::error::DeskResult;
use crate::finance::{default_fixed_expenses, default_labels, Ledger};
use crate::inventory::{default_items, Inventory};
use crate::models::UserInfo;
use crate::reservations::ReservationBook;
use crate::session::Session;

/// Everything one pension keeps between runs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Desk {
    #[serde(default)]
    pub checklist: Checklist,
    #[serde(default)]
    pub ledger: Ledger,
    #[serde(default)]
    pub reservations: ReservationBook,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub board: StaffBoard,
    #[serde(default)]
    pub customers: CustomerBook,
}

impl Desk {
    /// A fresh desk with the master task list, fixed costs, expense
    /// suggestions and starter stock.
    pub fn seeded() -> Desk {
        Desk {
            checklist: Checklist::new(default_tasks()),
            ledger: Ledger::new(default_fixed_expenses(), default_labels()),
            inventory: Inventory::new(default_items()),
            ..Desk::default()
        }
    }
}

/// Returns the path to the desk data file (`desk.json`).
///
/// The path is determined in the following order:
/// 1. `PENSIONDESK_DB` environment variable.
/// 2. `~/.local/share/pensiondesk/desk.json` (on Linux).
/// 3. `./desk.json` (fallback).
pub fn db_path() -> PathBuf {
    std::env::var("PENSIONDESK_DB").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("pensiondesk");
        p.push("desk.json");
        p
    })
}

/// Returns the path to the identity record (`session.json`).
///
/// Located in the same directory as the desk data file.
pub fn session_path() -> PathBuf {
    let mut p = db_path();
    p.pop();
    p.push("session.json");
    p
}

fn read_file(path: &PathBuf) -> DeskResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(Some(s))
}

fn write_file(path: &PathBuf, contents: &str) -> DeskResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(contents.as_bytes())?;
    Ok(())
}

/// Loads the desk, seeding a fresh one when no data file exists yet.
pub fn load_desk() -> DeskResult<Desk> {
    let path = db_path();
    match read_file(&path)? {
        Some(s) => {
            debug!(path = %path.display(), "desk loaded");
            Ok(serde_json::from_str(&s)?)
        }
        None => {
            debug!(path = %path.display(), "no data file, starting from seed");
            Ok(Desk::seeded())
        }
    }
}

/// Saves the desk, overwriting the existing file.
pub fn save_desk(desk: &Desk) -> DeskResult<()> {
    let path = db_path();
    let s = serde_json::to_string_pretty(desk)?;
    write_file(&path, &s)?;
    debug!(path = %path.display(), "desk saved");
    Ok(())
}

/// Reads the identity record once; the fallback admin when none is stored.
pub fn load_session() -> DeskResult<Session> {
    match read_file(&session_path())? {
        Some(s) => {
            let user: UserInfo = serde_json::from_str(&s)?;
            Ok(Session::new(user))
        }
        None => Ok(Session::fallback()),
    }
}

pub fn save_session(session: &Session) -> DeskResult<()> {
    let s = serde_json::to_string_pretty(session.user())?;
    write_file(&session_path(), &s)
}

/// Deletes the desk data file and the identity record.
pub fn delete_database() -> DeskResult<()> {
    for path in [db_path(), session_path()] {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}
