//! Browser frame scheduling via requestAnimationFrame

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use super::frame::FrameScheduler;

/// `requestAnimationFrame` / `cancelAnimationFrame` around one reusable callback
#[derive(Default)]
pub struct AnimationFrames {
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl AnimationFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the frame callback. Requests before this are refused.
    pub fn set_callback(&mut self, callback: Closure<dyn FnMut(f64)>) {
        self.callback = Some(callback);
    }
}

impl FrameScheduler for AnimationFrames {
    type Handle = i32;

    fn request(&mut self) -> Option<i32> {
        let callback = self.callback.as_ref()?;
        let window = web_sys::window()?;
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel(&mut self, handle: i32) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.cancel_animation_frame(handle) {
                log::warn!("cancelAnimationFrame({}) failed: {:?}", handle, e);
            }
        }
    }
}
