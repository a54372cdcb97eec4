//! Frame-by-frame driver: animate, flatten, hand off to the renderer

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::camera::Camera;
use crate::core::time::FrameTime;
use crate::core::types::Result;
use crate::scene::DrawItem;

use super::animate::Animator;
use super::populate::Garden;

/// Something that can present one frame of draw items.
pub trait FrameSink {
    fn draw(&mut self, items: &[DrawItem], camera: &Camera) -> Result<()>;
}

/// Shared flag that asks the run loop to stop at its next tick.
///
/// Clones share the same flag, so one can live in the host's close handler
/// while the loop holds another.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was drawn; schedule the next one
    Continue,
    /// Stop was requested; nothing was drawn
    Stopped,
}

/// Drives the garden one frame at a time.
///
/// The host calls [`RunLoop::tick`] once per display refresh. There is no
/// other exit path than the stop flag.
pub struct RunLoop {
    animator: Animator,
    stop: StopHandle,
    ticks: u64,
}

impl RunLoop {
    pub fn new(animator: Animator) -> Self {
        Self {
            animator,
            stop: StopHandle::new(),
            ticks: 0,
        }
    }

    /// A handle that stops this loop when triggered.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Number of frames drawn so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one frame: animate, flatten the scene and present it.
    pub fn tick<S: FrameSink + ?Sized>(
        &mut self,
        garden: &mut Garden,
        camera: &mut Camera,
        time: FrameTime,
        sink: &mut S,
    ) -> Result<TickOutcome> {
        if self.stop.is_stop_requested() {
            return Ok(TickOutcome::Stopped);
        }

        self.animator.update(garden, camera, time);
        let items = garden.graph.flatten();
        sink.draw(&items, camera)?;

        self.ticks += 1;
        Ok(TickOutcome::Continue)
    }
}
