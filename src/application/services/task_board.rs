use crate::domain::entities::{Task, TaskStatus};

const BAR_WIDTH: usize = 20;

/// Local copy of the user's tasks, in server order
#[derive(Debug, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Overwrite a known task. Unknown ids are ignored (returns false).
    pub fn apply(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub fn set_status(&mut self, id: i64, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// (completed, total)
    pub fn progress(&self) -> (usize, usize) {
        let done = self.tasks.iter().filter(|t| t.status.is_completed()).count();
        (done, self.tasks.len())
    }

    pub fn render(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks.".to_string();
        }
        let (done, total) = self.progress();
        let mut out = format!("{} {}/{} done\n", progress_bar(done, total), done, total);
        let lines: Vec<String> = self.tasks.iter().map(Task::summary).collect();
        out.push_str(&lines.join("\n"));
        out
    }
}

/// Share of `current` in `target`, in percent. Zero when `target` is zero.
pub fn progress_percentage(current: usize, target: usize) -> f64 {
    if target == 0 {
        return 0.0;
    }
    current as f64 / target as f64 * 100.0
}

pub fn progress_bar(current: usize, target: usize) -> String {
    let pct = progress_percentage(current, target).min(100.0);
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}] {:>3.0}%", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled), pct)
}
