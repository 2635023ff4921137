use ratatui::widgets::TableState;

use crate::access::requires;
use crate::checklist::StatusField;
use crate::error::DeskResult;
use crate::finance::MonthlyReport;
use crate::models::{ChecklistItem, DateKey, TaskCategory, UserRole, YearMonth};
use crate::session::Session;
use crate::storage::{load_desk, save_desk, Desk};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

#[derive(PartialEq)]
pub enum ViewMode {
    Checklist,
    Finance,
}

/// State for the two-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub category: Option<TaskCategory>,
    pub step: usize, // 0: Category, 1: Description
}

pub struct App {
    pub session: Session,
    pub desk: Desk,
    pub date: DateKey,
    pub month: YearMonth,
    pub filter: Option<TaskCategory>,
    pub state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// Last notice shown in the status line (errors, denied actions).
    pub status: Option<String>,
}

impl App {
    /// Creates a new App for the given session and loads the desk.
    pub fn new(session: Session) -> DeskResult<App> {
        let desk = load_desk()?;
        let date = DateKey::today();
        let mut app = App {
            session,
            desk,
            month: date.month(),
            date,
            filter: None,
            state: TableState::default(),
            view_mode: ViewMode::Checklist,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            status: None,
        };
        app.clamp_selection();
        Ok(app)
    }

    pub fn visible_tasks(&self) -> Vec<&ChecklistItem> {
        self.desk.checklist.tasks_in(self.filter)
    }

    pub fn report(&self) -> MonthlyReport {
        self.desk.ledger.aggregate(self.month, &self.desk.reservations.reservations)
    }

    fn selected_task_id(&self) -> Option<String> {
        let i = self.state.selected()?;
        self.visible_tasks().get(i).map(|t| t.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.state.select(None);
        } else {
            match self.state.selected() {
                Some(i) if i >= len => self.state.select(Some(len - 1)),
                None => self.state.select(Some(0)),
                _ => {}
            }
        }
    }

    /// Applies a desk mutation and saves it. On any error the desk is
    /// rolled back so the screen never shows unsaved state.
    fn apply<T>(&mut self, f: impl FnOnce(&mut Desk, &Session) -> DeskResult<T>) {
        let before = self.desk.clone();
        let result = f(&mut self.desk, &self.session).and_then(|_| save_desk(&self.desk));
        if let Err(e) = result {
            self.desk = before;
            self.status = Some(e.to_string());
        } else {
            self.status = None;
        }
        self.clamp_selection();
    }

    /// Selects the next task in the list.
    pub fn next(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task in the list.
    pub fn previous(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Moves the monitored day (checklist) or month (finance).
    pub fn shift(&mut self, forward: bool) {
        match self.view_mode {
            ViewMode::Checklist => {
                self.date = if forward { self.date.succ() } else { self.date.pred() };
            }
            ViewMode::Finance => {
                self.month = if forward { self.month.next() } else { self.month.prev() };
            }
        }
        self.status = None;
    }

    pub fn toggle_selected(&mut self, field: StatusField) {
        if self.view_mode != ViewMode::Checklist { return; }
        if let Some(id) = self.selected_task_id() {
            let date = self.date.clone();
            self.apply(|desk, session| desk.checklist.toggle_status(&date, &id, field, session));
        }
    }

    pub fn delete_selected(&mut self) {
        if self.view_mode != ViewMode::Checklist { return; }
        if let Some(id) = self.selected_task_id() {
            self.apply(|desk, session| desk.checklist.delete_task(&id, session));
        }
    }

    /// Cycles the category filter: all, then each category in turn.
    pub fn cycle_filter(&mut self) {
        let all = TaskCategory::ALL;
        self.filter = match self.filter {
            None => Some(all[0]),
            Some(c) => all.iter().position(|x| *x == c).and_then(|i| all.get(i + 1)).copied(),
        };
        self.state.select(None);
        self.clamp_selection();
    }

    /// Toggles between Checklist and Finance views. Finance is admin-only.
    pub fn toggle_view(&mut self) {
        match self.view_mode {
            ViewMode::Checklist => match requires(&self.session, UserRole::Admin, "view finance reports") {
                Ok(()) => {
                    self.view_mode = ViewMode::Finance;
                    self.status = None;
                }
                Err(e) => self.status = Some(e.to_string()),
            },
            ViewMode::Finance => self.view_mode = ViewMode::Checklist,
        }
    }

    /// Initiates the "Add Task" wizard (admin only).
    pub fn start_add(&mut self) {
        if self.view_mode != ViewMode::Checklist { return; }
        if let Err(e) = requires(&self.session, UserRole::Admin, "add a master task") {
            self.status = Some(e.to_string());
            return;
        }
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles input for the "Add Task" wizard.
    pub fn handle_input(&mut self) {
        match self.add_state.step {
            0 => { // Category, by number or name
                let picked = match self.input_buffer.trim() {
                    "1" => Some(TaskCategory::Promotion),
                    "2" => Some(TaskCategory::Room),
                    "3" => Some(TaskCategory::InventoryCheck),
                    "4" => Some(TaskCategory::ReservationCheck),
                    other => other.parse().ok(),
                };
                if let Some(c) = picked {
                    self.add_state.category = Some(c);
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => { // Description
                if let Some(category) = self.add_state.category {
                    let description = self.input_buffer.clone();
                    self.apply(|desk, _| desk.checklist.add_task(category, &description).map(|_| ()));
                    if self.status.is_none() {
                        self.state.select(Some(0));
                    }
                }
                self.cancel_input();
            }
            _ => {}
        }
    }
}
