use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::camera::Camera;
use crate::museum::Museum;

/// Shared cancellation flag for a [`FrameDriver`].
///
/// Clones observe the same flag, so a key handler or signal hook can stop a
/// loop it does not own.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Host-provided frame pacing.
pub trait FrameClock {
    /// Wait until the next frame is due. `false` means the host has no more
    /// frames to give.
    fn next_frame(&mut self) -> bool;
}

/// Clock that yields a fixed number of frames immediately. Used for headless
/// runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedFrames {
    remaining: u64,
}

impl FixedFrames {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }
}

impl FrameClock for FixedFrames {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// The collaborators a frame hands off to once the animation has advanced.
pub trait FrameHost {
    /// Apply the look control's pending state to the camera.
    fn update_controls(&mut self, camera: &mut Camera);
    /// Draw the current scene from the current camera.
    fn render(&mut self, museum: &Museum);
}

/// Runs frames until its [`StopHandle`] is triggered.
#[derive(Debug, Default)]
pub struct FrameDriver {
    stop: StopHandle,
    frames: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stop_handle(stop: StopHandle) -> Self {
        Self { stop, frames: 0 }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Frames this driver has completed.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame: animate, update controls, render.
    ///
    /// Returns `false` without touching anything once stopped.
    pub fn frame<H: FrameHost>(&mut self, museum: &mut Museum, host: &mut H) -> bool {
        if self.stop.is_stopped() {
            return false;
        }
        museum.animate();
        host.update_controls(&mut museum.camera);
        host.render(museum);
        self.frames += 1;
        true
    }

    /// Run frames as the clock delivers them until either side stops.
    /// Returns the number of frames run by this call.
    pub fn run<C: FrameClock, H: FrameHost>(
        &mut self,
        museum: &mut Museum,
        host: &mut H,
        clock: &mut C,
    ) -> u64 {
        let start = self.frames;
        while !self.stop.is_stopped() && clock.next_frame() {
            self.frame(museum, host);
        }
        let ran = self.frames - start;
        tracing::debug!(frames = ran, stopped = self.stop.is_stopped(), "frame loop finished");
        ran
    }
}
