//! Task-list scenario used by the `demo` command.
//!
//! A shared [`TaskList`] is mutated by `TaskAdded` handlers and read back
//! through `GetTaskCount` / `ListTasks` requests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{
    BoxFuture, HandlerError, HandlerResult, Notification, NotificationHandler, Request,
    RequestHandler,
};
use registry::HandlerRegistry;
use tracing::debug;

/// A task was added to the list
#[derive(Debug, Clone)]
pub struct TaskAdded {
    pub name: String,
}

impl TaskAdded {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Notification for TaskAdded {}

/// Number of recorded tasks
#[derive(Debug, Clone, Copy)]
pub struct GetTaskCount;

impl Request for GetTaskCount {
    type Response = usize;
}

/// All recorded task names, in recording order
#[derive(Debug, Clone, Copy)]
pub struct ListTasks;

impl Request for ListTasks {
    type Response = Vec<String>;
}

/// Shared, append-only task store
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    inner: Arc<Mutex<Vec<String>>>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: impl Into<String>) {
        self.lock().push(name.into());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Appends every added task to the list
pub struct TaskRecorder {
    tasks: TaskList,
}

impl TaskRecorder {
    pub fn new(tasks: TaskList) -> Self {
        Self { tasks }
    }
}

impl NotificationHandler<TaskAdded> for TaskRecorder {
    fn handle<'a>(&'a self, notification: &'a TaskAdded) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            debug!(task = %notification.name, "Recording task");
            self.tasks.push(notification.name.clone());
            Ok(())
        })
    }
}

/// Always fails; stands in for a broken subscriber
pub struct RejectingRecorder {
    slot: usize,
}

impl NotificationHandler<TaskAdded> for RejectingRecorder {
    fn handle<'a>(&'a self, notification: &'a TaskAdded) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            Err(HandlerError::new(format!(
                "recorder in slot {} rejected task '{}'",
                self.slot, notification.name
            )))
        })
    }
}

/// Answers `GetTaskCount`
pub struct TaskCounter {
    tasks: TaskList,
}

impl RequestHandler<GetTaskCount> for TaskCounter {
    fn handle<'a>(&'a self, _request: &'a GetTaskCount) -> BoxFuture<'a, HandlerResult<usize>> {
        Box::pin(async move { Ok(self.tasks.len()) })
    }
}

/// Answers `ListTasks`
pub struct TaskLister {
    tasks: TaskList,
}

impl RequestHandler<ListTasks> for TaskLister {
    fn handle<'a>(&'a self, _request: &'a ListTasks) -> BoxFuture<'a, HandlerResult<Vec<String>>> {
        Box::pin(async move { Ok(self.tasks.snapshot()) })
    }
}

/// Register the scenario's handlers.
///
/// One `TaskRecorder` instance is registered `recorders` times; the slot
/// `fail_at` (if any) gets a `RejectingRecorder` instead.
pub fn register(
    registry: &HandlerRegistry,
    tasks: &TaskList,
    recorders: usize,
    fail_at: Option<usize>,
) {
    let recorder = Arc::new(TaskRecorder::new(tasks.clone()));

    for slot in 0..recorders {
        if fail_at == Some(slot) {
            registry.register_notification::<TaskAdded, _>(RejectingRecorder { slot });
        } else {
            registry.register_notification::<TaskAdded, _>(Arc::clone(&recorder));
        }
    }

    registry
        .register_request::<GetTaskCount, _>(TaskCounter {
            tasks: tasks.clone(),
        })
        .register_request::<ListTasks, _>(TaskLister {
            tasks: tasks.clone(),
        });
}
