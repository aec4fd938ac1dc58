use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gtk4::glib;

use crate::game::{ScheduledTask, Scheduler, TaskId};

/// Runs scheduled tasks as one-shot timeouts on the GTK main loop.
pub struct GlibScheduler {
    next_id: u64,
    sources: Rc<RefCell<HashMap<TaskId, glib::SourceId>>>,
    on_fire: Rc<dyn Fn(ScheduledTask)>,
}

impl GlibScheduler {
    pub fn new(on_fire: impl Fn(ScheduledTask) + 'static) -> Self {
        GlibScheduler {
            next_id: 0,
            sources: Rc::new(RefCell::new(HashMap::new())),
            on_fire: Rc::new(on_fire),
        }
    }
}

impl Scheduler for GlibScheduler {
    fn schedule(&mut self, delay: Duration, task: ScheduledTask) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        let sources = Rc::clone(&self.sources);
        let on_fire = Rc::clone(&self.on_fire);
        let source = glib::timeout_add_local_once(delay, move || {
            // A fired once-source is already gone; forget it before running.
            sources.borrow_mut().remove(&id);
            on_fire(task);
        });
        self.sources.borrow_mut().insert(id, source);
        id
    }

    fn cancel(&mut self, id: TaskId) {
        let source = self.sources.borrow_mut().remove(&id);
        if let Some(source) = source {
            source.remove();
        }
    }
}
