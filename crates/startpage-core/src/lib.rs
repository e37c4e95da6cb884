//! Start page core library
//!
//! Platform-agnostic layout engine and persisted state for the start page:
//! widget positions and sizes, the drag/resize gesture machines, the
//! write-through store with import/export, and the pomodoro timer.

pub mod bookmarks;
pub mod clock;
pub mod countdown;
pub mod gesture;
pub mod input;
pub mod pomodoro;
pub mod position;
pub mod quotes;
pub mod remote;
pub mod settings;
pub mod storage;
pub mod store;
pub mod todos;
pub mod weather;
pub mod widgets;

use std::future::Future;
use std::pin::Pin;

/// Boxed future for collaborator calls (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub use bookmarks::{Bookmark, BookmarkNode, BookmarkPatch, NewBookmark};
pub use gesture::{
    DragController, GestureError, HandleTarget, LayoutSession, LayoutSink, PointerHub,
    ResizeController,
};
pub use input::{MouseButton, PointerEvent};
pub use pomodoro::{PomodoroDurations, PomodoroMode, PomodoroState, TickOutcome, TickSchedule};
pub use position::{
    AnchorPreset, ComponentPosition, Placement, change_anchor_preserve_side, resolve,
};
pub use remote::{CloudSync, RemoteSync, SyncError, SyncSnapshot, SyncStatus};
pub use settings::AppSettings;
pub use storage::{MemoryStorage, PlatformStorage, SlotStorage, StorageError, StorageResult};
pub use store::{AppStore, ExportConfig, ImportError, PersistedState, STORAGE_KEY};
pub use todos::Todo;
pub use widgets::{ResizeAxis, SizeBounds, SizeSpec, SizeUnit, WidgetKind};

#[cfg(test)]
pub(crate) mod test_util {
    /// Drive a future to completion without a runtime.
    pub fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
                return result;
            }
        }
    }
}
