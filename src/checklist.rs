//! Daily checklist with the dual-approval workflow: staff mark a task
//! done, an administrator verifies it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::requires;
use crate::error::{DeskError, DeskResult};
use crate::models::{new_id, ChecklistItem, DateKey, TaskCategory, TaskStatus, UserRole};
use crate::progress::percent;
use crate::session::Session;

/// Which half of the approval record a toggle flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    StaffDone,
    AdminVerified,
}

/// Where a task stands on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPhase {
    Open,
    AwaitingVerification,
    Verified,
}

impl ApprovalPhase {
    pub fn of(status: &TaskStatus) -> ApprovalPhase {
        match (status.staff_done, status.admin_verified) {
            (true, true) => ApprovalPhase::Verified,
            (true, false) => ApprovalPhase::AwaitingVerification,
            _ => ApprovalPhase::Open,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApprovalPhase::Open => "미수행",
            ApprovalPhase::AwaitingVerification => "승인 대기 중",
            ApprovalPhase::Verified => "관리자승인",
        }
    }
}

/// Progress figures for one day, recomputed on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistStats {
    pub total: usize,
    pub done: usize,
    pub verified: usize,
    pub done_percent: u32,
    pub verified_percent: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Checklist {
    pub tasks: Vec<ChecklistItem>,
    #[serde(default)]
    pub logs: BTreeMap<DateKey, BTreeMap<String, TaskStatus>>,
}

impl Checklist {
    pub fn new(tasks: Vec<ChecklistItem>) -> Checklist {
        Checklist { tasks, logs: BTreeMap::new() }
    }

    pub fn task(&self, task_id: &str) -> Option<&ChecklistItem> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Status of a task on a day; zero-valued when never toggled.
    pub fn status(&self, date: &DateKey, task_id: &str) -> TaskStatus {
        self.logs
            .get(date)
            .and_then(|day| day.get(task_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Flips one flag of the (date, task) record.
    ///
    /// Verification is admin-only. The two flags are otherwise independent:
    /// an admin may verify a task nobody marked done, and clearing
    /// `staff_done` leaves `admin_verified` as it was.
    pub fn toggle_status(
        &mut self,
        date: &DateKey,
        task_id: &str,
        field: StatusField,
        session: &Session,
    ) -> DeskResult<TaskStatus> {
        if field == StatusField::AdminVerified {
            requires(session, UserRole::Admin, "verify a task")?;
        }
        if self.task(task_id).is_none() {
            return Err(DeskError::not_found("Task", task_id));
        }

        let status = self
            .logs
            .entry(date.clone())
            .or_default()
            .entry(task_id.to_string())
            .or_default();
        match field {
            StatusField::StaffDone => status.staff_done = !status.staff_done,
            StatusField::AdminVerified => status.admin_verified = !status.admin_verified,
        }
        status.last_updated_by = Some(session.name().to_string());

        info!(
            date = %date,
            task = task_id,
            staff_done = status.staff_done,
            admin_verified = status.admin_verified,
            "checklist status toggled"
        );
        Ok(status.clone())
    }

    pub fn stats(&self, date: &DateKey) -> ChecklistStats {
        let day = self.logs.get(date);
        let flag = |id: &str, pick: fn(&TaskStatus) -> bool| {
            day.and_then(|d| d.get(id)).map(pick).unwrap_or(false)
        };
        let total = self.tasks.len();
        let done = self.tasks.iter().filter(|t| flag(&t.id, |s| s.staff_done)).count();
        let verified = self.tasks.iter().filter(|t| flag(&t.id, |s| s.admin_verified)).count();
        ChecklistStats {
            total,
            done,
            verified,
            done_percent: percent(done as u64, total as u64),
            verified_percent: percent(verified as u64, total as u64),
        }
    }

    /// Prepends a new master task. Any role may call this; the UI only
    /// offers it to administrators.
    pub fn add_task(&mut self, category: TaskCategory, description: &str) -> DeskResult<&ChecklistItem> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DeskError::validation("task description must not be empty"));
        }
        let item = ChecklistItem {
            id: new_id(),
            category,
            task: description.to_string(),
        };
        info!(id = %item.id, category = category.label(), "checklist task added");
        self.tasks.insert(0, item);
        Ok(&self.tasks[0])
    }

    pub fn delete_task(&mut self, task_id: &str, session: &Session) -> DeskResult<ChecklistItem> {
        requires(session, UserRole::Admin, "delete a master task")?;
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| DeskError::not_found("Task", task_id))?;
        info!(id = task_id, "checklist task deleted");
        Ok(self.tasks.remove(idx))
    }

    /// Tasks in one category, or all of them.
    pub fn tasks_in(&self, category: Option<TaskCategory>) -> Vec<&ChecklistItem> {
        self.tasks
            .iter()
            .filter(|t| category.map_or(true, |c| t.category == c))
            .collect()
    }

    pub fn count_in(&self, category: TaskCategory) -> usize {
        self.tasks.iter().filter(|t| t.category == category).count()
    }
}

/// Master tasks a fresh desk starts with.
pub fn default_tasks() -> Vec<ChecklistItem> {
    [
        ("1", TaskCategory::Promotion, "인스타그램 오늘의 사진 업로드"),
        ("2", TaskCategory::Room, "배정 객실(소나무, 산수유, 대나무) 청소 점검"),
        ("3", TaskCategory::InventoryCheck, "어메니티(일회용품) 재고 확인"),
        ("4", TaskCategory::ReservationCheck, "당일 예약 고객 입실 안내 연락"),
        ("5", TaskCategory::Room, "공용 바베큐장 그릴 및 테이블 세척"),
        ("6", TaskCategory::InventoryCheck, "비품 분리수거 및 쓰레기장 정리"),
    ]
    .into_iter()
    .map(|(id, category, task)| ChecklistItem {
        id: id.into(),
        category,
        task: task.into(),
    })
    .collect()
}
