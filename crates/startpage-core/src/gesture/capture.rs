use std::cell::RefCell;
use std::rc::Rc;

use super::{GestureError, GestureResult};

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    active: Option<u64>,
}

/// The pointer move/up event source. At most one capture is live at a time.
///
/// Cloning shares the same hub; the event loop is single-threaded so plain
/// `Rc<RefCell<_>>` is enough.
#[derive(Debug, Clone, Default)]
pub struct PointerHub {
    state: Rc<RefCell<HubState>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to pointer move/up for the duration of a gesture.
    pub fn capture(&self) -> GestureResult<PointerCapture> {
        let mut state = self.state.borrow_mut();
        if state.active.is_some() {
            return Err(GestureError::Busy);
        }
        state.next_id += 1;
        let id = state.next_id;
        state.active = Some(id);
        Ok(PointerCapture {
            id,
            state: Rc::clone(&self.state),
        })
    }

    pub fn is_captured(&self) -> bool {
        self.state.borrow().active.is_some()
    }

    /// Number of live subscriptions: 0 or 1.
    pub fn listener_count(&self) -> usize {
        usize::from(self.is_captured())
    }
}

/// A live pointer subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct PointerCapture {
    id: u64,
    state: Rc<RefCell<HubState>>,
}

impl PointerCapture {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            if state.active == Some(self.id) {
                state.active = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_released_on_drop() {
        let hub = PointerHub::new();
        {
            let _capture = hub.capture().unwrap();
            assert_eq!(hub.listener_count(), 1);
        }
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_second_capture_is_busy() {
        let hub = PointerHub::new();
        let first = hub.capture().unwrap();
        assert_eq!(hub.clone().capture().unwrap_err(), GestureError::Busy);
        drop(first);
        let second = hub.capture().unwrap();
        assert_eq!(second.id(), 2);
    }
}
