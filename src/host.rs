//! The host display the wave renderer runs inside: viewport size, resize
//! notifications, and frame scheduling.

use log::trace;

/// Identifies one registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Identifies one requested (not yet delivered) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Viewport size in surface (logical) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

/// Services a renderer needs from the display it is mounted on.
pub trait Host {
    fn viewport(&self) -> Viewport;
    /// Whether a drawing context can be obtained right now.
    fn raster_available(&self) -> bool;
    fn add_resize_listener(&mut self) -> ListenerId;
    fn remove_resize_listener(&mut self, id: ListenerId);
    /// Ask for one frame callback. The handle is delivered once, then forgotten.
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Host backed by the terminal run loop.
///
/// The run loop owns the clock: it calls [`TerminalHost::take_frames`] once per
/// iteration and hands each handle to the renderer that requested it, and it
/// forwards terminal resizes through [`TerminalHost::resize`].
#[derive(Debug)]
pub struct TerminalHost {
    viewport: Viewport,
    available: bool,
    next_id: u64,
    listeners: Vec<ListenerId>,
    pending: Vec<FrameHandle>,
}

impl TerminalHost {
    pub fn new(viewport: Viewport, available: bool) -> Self {
        TerminalHost {
            viewport,
            available,
            next_id: 0,
            listeners: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Record a new viewport and return the listeners that must be notified.
    pub fn resize(&mut self, viewport: Viewport) -> Vec<ListenerId> {
        self.viewport = viewport;
        self.listeners.clone()
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Remove and return every frame requested since the last call.
    pub fn take_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[cfg(test)]
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for TerminalHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn raster_available(&self) -> bool {
        self.available && self.viewport.width > 0.0 && self.viewport.height > 0.0
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.push(id);
        trace!("resize listener {:?} added", id);
        id
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|&l| l != id);
        trace!("resize listener {:?} removed", id);
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|&h| h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> TerminalHost {
        TerminalHost::new(Viewport::new(800.0, 600.0), true)
    }

    #[test]
    fn test_listener_add_remove() {
        let mut h = host();
        let a = h.add_resize_listener();
        let b = h.add_resize_listener();
        assert_ne!(a, b);
        assert_eq!(h.listener_count(), 2);
        h.remove_resize_listener(a);
        assert_eq!(h.resize(Viewport::new(10.0, 10.0)), vec![b]);
    }

    #[test]
    fn test_frames_are_delivered_once() {
        let mut h = host();
        let f = h.request_frame();
        assert_eq!(h.take_frames(), vec![f]);
        assert!(h.take_frames().is_empty());
    }

    #[test]
    fn test_cancel_frame_removes_pending() {
        let mut h = host();
        let f = h.request_frame();
        h.cancel_frame(f);
        assert_eq!(h.pending_frames(), 0);
    }

    #[test]
    fn test_raster_requires_nonzero_viewport() {
        let h = TerminalHost::new(Viewport::new(0.0, 600.0), true);
        assert!(!h.raster_available());
        let h = TerminalHost::new(Viewport::new(800.0, 600.0), false);
        assert!(!h.raster_available());
        assert!(host().raster_available());
    }
}
