use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Owns the `requestAnimationFrame` registration for the visualizer.
///
/// Invariant: at most one registration is live at a time. The per-frame
/// closure is built once, here, and re-registers itself every frame; only
/// `stop()` cancels the pending callback through the stored handle, and a
/// later `start()` re-registers the same closure.
pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
    /// Wrap `frame` in a self-rescheduling callback. The closure holds a
    /// clone of its own slot so it can hand itself back to
    /// requestAnimationFrame; the cycle keeps it alive for the page
    /// lifetime, same as the teacher-style `Closure::forget`, but there is
    /// exactly one closure no matter how often the loop restarts.
    pub fn new(mut frame: impl FnMut() + 'static) -> Self {
        let handle = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

        let loop_handle = Rc::clone(&handle);
        let inner = Rc::clone(&callback);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            // A cancelled chain must not revive itself.
            if loop_handle.get().is_none() {
                return;
            }
            frame();
            let next = inner.borrow().as_ref().and_then(schedule);
            loop_handle.set(next);
        }) as Box<dyn FnMut()>));

        Self { handle, callback }
    }

    pub fn is_running(&self) -> bool {
        self.handle.get().is_some()
    }

    /// Register the callback for the next display refresh. No-op while
    /// already running, so repeated `playing` events cannot stack loops.
    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        let guard = self.callback.borrow();
        if let Some(callback) = guard.as_ref() {
            self.handle.set(schedule(callback));
        }
    }

    /// Cancel the pending frame, if any. In-flight frame work is synchronous
    /// and short, so there is nothing to interrupt.
    pub fn stop(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

fn schedule(callback: &Closure<dyn FnMut()>) -> Option<i32> {
    web_sys::window()
        .and_then(|window| window.request_animation_frame(callback.as_ref().unchecked_ref()).ok())
}
