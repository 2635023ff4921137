pub mod access;
pub mod board;
pub mod checklist;
pub mod commands;
pub mod customers;
pub mod error;
pub mod finance;
pub mod inventory;
pub mod logging;
pub mod models;
pub mod progress;
pub mod reservations;
pub mod session;
pub mod storage;
pub mod tui;
