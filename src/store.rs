// Task collection: validation, CRUD, derived views, persistence

use crate::error::{Error, Result};
use crate::filter::TaskFilter;
use crate::models::{Priority, Stats, Status, Task, TaskDraft, TaskPatch, now_ms};
use crate::storage::StorageBackend;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

const MAX_TITLE_CHARS: usize = 100;

/// Stable sort of a task sequence by priority rank. Tasks of equal priority
/// keep their relative order in the source (oldest first within a band).
pub fn sorted_by_priority(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|task| task.priority.rank());
    sorted
}

/// Owner of the in-memory task collection and its persisted mirror
///
/// Every successful mutation is followed by a synchronous save. A failed save
/// is reported to the tracing sink but does not roll back the in-memory
/// change; the session state stays authoritative.
pub struct TaskStore {
    tasks: Vec<Task>,
    backend: Box<dyn StorageBackend>,
    edit_cursor: Option<String>,
    pending_delete: Option<String>,
}

impl TaskStore {
    /// Open a store over the given backend, restoring any persisted tasks.
    ///
    /// Missing data means an empty list. Malformed data is reported and the
    /// store still opens empty; construction never fails.
    pub fn open<B: StorageBackend + 'static>(backend: B) -> Self {
        let tasks = match backend.load() {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Task>>(&blob) {
                Ok(tasks) => tasks,
                Err(e) => {
                    warn!(error = %e, "persisted task list is malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read persisted tasks, starting empty");
                Vec::new()
            }
        };

        info!(count = tasks.len(), "opened task store");

        Self {
            tasks,
            backend: Box::new(backend),
            edit_cursor: None,
            pending_delete: None,
        }
    }

    /// All tasks in creation order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Create a task from a draft. Fails with the first violated rule's
    /// message; the collection is unchanged on failure.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task> {
        let (title, priority, status) =
            check_fields(&draft.title, &draft.priority, &draft.status)?;

        let now = now_ms();
        let task = Task {
            id: uuid::Uuid::now_v7().to_string(),
            title,
            description: draft.description.trim().to_string(),
            priority,
            status,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %task.id, priority = %task.priority, "created task");
        self.tasks.push(task.clone());
        self.persist();
        Ok(task)
    }

    /// Merge a patch onto an existing task and re-validate the result.
    /// `id` and `created_at` are immutable; `updated_at` is refreshed.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let pos = self
            .position(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let current = &self.tasks[pos];
        let title = patch.title.as_deref().unwrap_or(&current.title);
        let priority = patch
            .priority
            .as_deref()
            .unwrap_or(current.priority.as_str());
        let status = patch.status.as_deref().unwrap_or(current.status.as_str());
        let description = patch
            .description
            .as_deref()
            .unwrap_or(&current.description)
            .trim()
            .to_string();

        let (title, priority, status) = check_fields(title, priority, status)?;

        let task = &mut self.tasks[pos];
        task.title = title;
        task.description = description;
        task.priority = priority;
        task.status = status;
        task.updated_at = now_ms();
        let updated = task.clone();

        debug!(id = %updated.id, "updated task");
        self.persist();
        Ok(updated)
    }

    /// Remove one task. Clears the edit cursor and pending-delete marker if
    /// they reference it.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let pos = self
            .position(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if self.edit_cursor.as_deref() == Some(id) {
            self.edit_cursor = None;
        }
        if self.pending_delete.as_deref() == Some(id) {
            self.pending_delete = None;
        }

        self.tasks.remove(pos);
        debug!(id, "deleted task");
        self.persist();
        Ok(true)
    }

    /// Remove every task whose id appears in `ids`; unknown ids are ignored.
    /// Persists once, and only when something was actually removed.
    pub fn delete_many(&mut self, ids: &[String]) -> usize {
        let targets: HashSet<&str> = ids.iter().map(String::as_str).collect();

        let before = self.tasks.len();
        self.tasks.retain(|task| !targets.contains(task.id.as_str()));
        let removed = before - self.tasks.len();

        if removed > 0 {
            if self
                .edit_cursor
                .as_deref()
                .is_some_and(|id| targets.contains(id))
            {
                self.edit_cursor = None;
            }
            if self
                .pending_delete
                .as_deref()
                .is_some_and(|id| targets.contains(id))
            {
                self.pending_delete = None;
            }
            debug!(removed, "deleted tasks in bulk");
            self.persist();
        }

        removed
    }

    /// Remove every task with status done, returning the count removed.
    pub fn delete_completed(&mut self) -> usize {
        let done: Vec<String> = self
            .tasks
            .iter()
            .filter(|task| task.status == Status::Done)
            .map(|task| task.id.clone())
            .collect();
        self.delete_many(&done)
    }

    /// Remove every task, returning the prior count. Skips the persistence
    /// write when the collection was already empty.
    pub fn delete_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        self.edit_cursor = None;
        self.pending_delete = None;
        if count > 0 {
            debug!(count, "deleted all tasks");
            self.persist();
        }
        count
    }

    /// Full collection, priority-sorted. Pure read.
    pub fn sorted(&self) -> Vec<Task> {
        sorted_by_priority(&self.tasks)
    }

    /// Tasks matching the filter, in creation order. Pure read.
    pub fn filtered(&self, filter: TaskFilter) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect()
    }

    /// Aggregate counts. O(n) per call, uncached; fine at to-do-list scale.
    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            total: self.tasks.len(),
            ..Stats::default()
        };
        for task in &self.tasks {
            match task.status {
                Status::Todo => stats.todo += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Done => stats.done += 1,
            }
            match task.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
        }
        stats
    }

    // ========================================================================
    // Edit cursor
    // ========================================================================

    /// Mark a task as being edited, replacing any prior cursor.
    pub fn begin_edit(&mut self, id: &str) -> Result<()> {
        if self.position(id).is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        self.edit_cursor = Some(id.to_string());
        Ok(())
    }

    pub fn end_edit(&mut self) {
        self.edit_cursor = None;
    }

    pub fn is_editing(&self) -> bool {
        self.edit_cursor.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.edit_cursor.as_deref()
    }

    // ========================================================================
    // Two-step delete
    // ========================================================================

    /// Mark a task for deletion pending confirmation, replacing any prior
    /// pending request.
    pub fn request_delete(&mut self, id: &str) -> Result<()> {
        if self.position(id).is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        self.pending_delete = Some(id.to_string());
        Ok(())
    }

    /// Delete the pending task and clear the marker.
    pub fn confirm_delete(&mut self) -> Result<bool> {
        let id = self.pending_delete.take().ok_or(Error::NoPendingDelete)?;
        self.delete(&id)
    }

    /// Clear any pending delete. Safe to call when nothing is pending.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn pending_delete_id(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Flush the collection to the backend. A write failure is reported and
    /// swallowed; in-memory state stays authoritative for the session.
    fn persist(&self) {
        let blob = match serde_json::to_string(&self.tasks) {
            Ok(blob) => blob,
            Err(e) => {
                error!(error = %e, "failed to serialize tasks, skipping save");
                return;
            }
        };
        if let Err(e) = self.backend.save(&blob) {
            error!(error = %e, "failed to persist tasks, in-memory state kept");
        }
    }
}

/// Validate raw field values, collecting every violation but surfacing only
/// the first. Order: title presence, title length, priority, status.
fn check_fields(title: &str, priority: &str, status: &str) -> Result<(String, Priority, Status)> {
    let mut errors: Vec<&str> = Vec::new();

    let title = title.trim();
    if title.is_empty() {
        errors.push("Title is required");
    } else if title.chars().count() > MAX_TITLE_CHARS {
        errors.push("Title must be 100 characters or less");
    }

    let parsed_priority = Priority::parse(priority);
    if parsed_priority.is_none() {
        errors.push("Invalid priority value");
    }

    let parsed_status = Status::parse(status);
    if parsed_status.is_none() {
        errors.push("Invalid status value");
    }

    if let Some(first) = errors.first() {
        return Err(Error::Validation((*first).to_string()));
    }
    // An empty error list implies both parses succeeded
    let (Some(priority), Some(status)) = (parsed_priority, parsed_status) else {
        return Err(Error::Validation("Invalid task".to_string()));
    };

    Ok((title.to_string(), priority, status))
}
