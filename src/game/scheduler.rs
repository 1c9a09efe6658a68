use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        TimerHandle(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// One-shot delayed callbacks on the thread that owns the game.
///
/// Cancelling a handle that already fired, or was never issued, does nothing.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;
    fn cancel(&self, handle: TimerHandle);
}

#[cfg(test)]
pub(crate) use manual::ManualScheduler;


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn fires_in_deadline_then_registration_order() {
        let scheduler = ManualScheduler::default();
        let fired = Rc::new(RefCell::new(Vec::new()));
        for (label, delay) in [("late", 300), ("early", 100), ("tie-a", 200), ("tie-b", 200)] {
            let fired = Rc::clone(&fired);
            scheduler.schedule(
                Duration::from_millis(delay),
                Box::new(move || fired.borrow_mut().push((label, delay))),
            );
        }

        scheduler.advance(Duration::from_millis(250));
        assert_eq!(
            *fired.borrow(),
            vec![("early", 100), ("tie-a", 200), ("tie-b", 200)]
        );
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(fired.borrow().len(), 4);
        assert_eq!(scheduler.now(), Duration::from_millis(300));
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let scheduler = ManualScheduler::default();
        let fired = Rc::new(RefCell::new(0));
        let handle = {
            let fired = Rc::clone(&fired);
            scheduler.schedule(
                Duration::from_millis(10),
                Box::new(move || *fired.borrow_mut() += 1),
            )
        };
        scheduler.cancel(handle);
        scheduler.cancel(handle);
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(*fired.borrow(), 0);
    }
}
