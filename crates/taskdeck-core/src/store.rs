use tracing::debug;

use crate::task::{Task, TaskId, TaskPatch};

/// In-memory task store. Constructed once at application start and
/// mutated only through the methods below; every mutation is synchronous
/// and total-ordered under the single-threaded event loop. Divergence
/// from the server is resolved by `replace_all` after a re-fetch, never
/// by merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    search_query: String,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Replaces the entire list with a fresh server snapshot. Previous
    /// contents are discarded wholesale, including provisional local
    /// tasks the snapshot does not know about.
    #[tracing::instrument(skip(self, tasks))]
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        debug!(
            before = self.tasks.len(),
            after = tasks.len(),
            "replacing task list"
        );
        self.tasks = tasks;
    }

    #[tracing::instrument(skip(self, task), fields(id = %task.id))]
    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Shallow-merges `patch` into the task matching `id`. Silent no-op
    /// when no task matches.
    #[tracing::instrument(skip(self, patch), fields(id = %id))]
    pub fn edit(&mut self, id: &TaskId, patch: TaskPatch) {
        match self.tasks.iter_mut().find(|task| &task.id == id) {
            Some(task) => task.apply(patch),
            None => debug!("edit target not found"),
        }
    }

    /// Removes the task matching `id`. Silent no-op when absent.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn remove(&mut self, id: &TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|task| &task.id != id);
        if self.tasks.len() == before {
            debug!("remove target not found");
        }
    }

    /// Flips completion state for the task matching `id`. Silent no-op
    /// when absent.
    #[tracing::instrument(skip(self), fields(id = %id))]
    pub fn toggle_completion(&mut self, id: &TaskId) {
        match self.tasks.iter_mut().find(|task| &task.id == id) {
            Some(task) => task.status = task.status.toggled(),
            None => debug!("toggle target not found"),
        }
    }

    /// Swaps a provisional local id for the server-assigned id after a
    /// successful create. No-op if the local id is no longer present
    /// (a re-fetch may already have replaced the list).
    #[tracing::instrument(skip(self), fields(local = %local, remote = %remote))]
    pub fn promote_id(&mut self, local: &TaskId, remote: TaskId) {
        match self.tasks.iter_mut().find(|task| &task.id == local) {
            Some(task) => task.id = remote,
            None => debug!("promotion target not found"),
        }
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Applies a caller-supplied ordering, typically the result of a
    /// drag-and-drop over the currently visible list. Tasks named in
    /// `order` come first in that order; tasks missing from it keep
    /// their relative position at the tail. Not persisted remotely, so
    /// the ordering is lost on the next refresh.
    #[tracing::instrument(skip(self, order), fields(count = order.len()))]
    pub fn reorder(&mut self, order: &[TaskId]) {
        let mut reordered = Vec::with_capacity(self.tasks.len());
        for id in order {
            if let Some(index) = self.tasks.iter().position(|task| &task.id == id) {
                reordered.push(self.tasks.remove(index));
            }
        }
        reordered.append(&mut self.tasks);
        self.tasks = reordered;
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::task::{Task, TaskId, TaskPatch, TaskStatus};

    fn local(title: &str, now_ms: i64) -> Task {
        Task::new_local(title.to_string(), String::new(), None, now_ms)
    }

    #[test]
    fn edit_merges_and_ignores_missing_ids() {
        let mut store = TaskStore::new();
        store.add(local("A", 1));
        store.add(local("B", 2));

        store.edit(
            &TaskId::Local(1),
            TaskPatch {
                description: Some("x".to_string()),
                ..TaskPatch::default()
            },
        );

        let task = store.get(&TaskId::Local(1)).expect("task A");
        assert_eq!(task.description, "x");
        assert_eq!(task.title, "A");

        let snapshot = store.tasks().to_vec();
        store.edit(
            &TaskId::Local(99),
            TaskPatch {
                title: Some("ghost".to_string()),
                ..TaskPatch::default()
            },
        );
        assert_eq!(store.tasks(), snapshot.as_slice());
    }

    #[test]
    fn remove_changes_length_by_exactly_one_when_present() {
        let mut store = TaskStore::new();
        store.add(local("A", 1));
        store.add(local("B", 2));

        store.remove(&TaskId::Local(1));
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].title, "B");

        store.remove(&TaskId::Local(42));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn replace_all_discards_local_additions() {
        let mut store = TaskStore::new();
        store.add(local("provisional", 1));

        let server = vec![Task {
            id: TaskId::Remote("a".to_string()),
            status: TaskStatus::Completed,
            ..local("from server", 0)
        }];
        store.replace_all(server);

        assert_eq!(store.len(), 1);
        assert!(store.get(&TaskId::Local(1)).is_none());
        assert_eq!(store.tasks()[0].id, TaskId::Remote("a".to_string()));
    }

    #[test]
    fn promote_id_swaps_provisional_for_remote() {
        let mut store = TaskStore::new();
        store.add(local("A", 7));

        store.promote_id(&TaskId::Local(7), TaskId::Remote("srv-1".to_string()));
        assert!(store.get(&TaskId::Local(7)).is_none());
        assert_eq!(
            store.get(&TaskId::Remote("srv-1".to_string())).map(|t| t.title.as_str()),
            Some("A")
        );

        // Promotion after a resync already dropped the local task.
        store.promote_id(&TaskId::Local(7), TaskId::Remote("srv-2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reorder_keeps_unnamed_tasks_at_the_tail() {
        let mut store = TaskStore::new();
        store.add(local("A", 1));
        store.add(local("B", 2));
        store.add(local("C", 3));
        store.add(local("D", 4));

        // Drag result over a filtered view containing only B and D.
        store.reorder(&[TaskId::Local(4), TaskId::Local(2)]);

        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["D", "B", "A", "C"]);

        // Unknown ids are skipped.
        store.reorder(&[TaskId::Local(99), TaskId::Local(1)]);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "D", "B", "C"]);
    }

    #[test]
    fn search_query_round_trip() {
        let mut store = TaskStore::new();
        assert_eq!(store.search_query(), "");
        store.set_search_query("report".to_string());
        assert_eq!(store.search_query(), "report");
    }
}
