use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gtk4::glib;

use crate::game::{Scheduler, TimerHandle};

#[derive(Default)]
pub struct GlibScheduler {
    next_id: Cell<u64>,
    sources: Rc<RefCell<HashMap<u64, glib::SourceId>>>,
}

impl GlibScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for GlibScheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        let sources = Rc::clone(&self.sources);
        let source = glib::timeout_add_local_once(delay, move || {
            sources.borrow_mut().remove(&id);
            callback();
        });
        self.sources.borrow_mut().insert(id, source);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let source = self.sources.borrow_mut().remove(&handle.id());
        if let Some(source) = source {
            source.remove();
        }
    }
}
