//! The animated water scene and its mount/unmount lifecycle.

pub mod backdrop;
pub mod compositor;
pub mod surface;
pub mod vessel;
pub mod wave;

#[cfg(test)]
pub mod testing;

use log::{debug, info};

use crate::host::{FrameHandle, Host, ListenerId, Viewport};
use crate::render::DrawTarget;

use backdrop::Backdrop;
use surface::Surface;
use wave::{TimeCounter, WaveField, WaveProfile};

/// Construction options for a [`WaveRenderer`].
#[derive(Debug, Clone)]
pub struct RendererOptions {
    /// Opaque style tag carried on the surface
    pub class: Option<String>,
    /// Wave layers, back to front
    pub waves: Vec<WaveProfile>,
    /// Paint the floating markers and binary stream
    pub backdrop: bool,
    /// Nominal frame rate, used to convert ticks to seconds for the backdrop
    pub fps: u32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        RendererOptions {
            class: None,
            waves: WaveProfile::STANDARD.to_vec(),
            backdrop: false,
            fps: 30,
        }
    }
}

/// State held only while mounted.
struct Running {
    listener: ListenerId,
    /// The frame this renderer is waiting for
    frame: FrameHandle,
    field: WaveField,
    clock: TimeCounter,
    backdrop: Option<Backdrop>,
}

enum Lifecycle {
    Unmounted,
    Running(Running),
}

/// Animated water surface with a sailboat riding the front wave.
///
/// The renderer owns all of its animation state. Several can share one host;
/// each only reacts to its own listener id and frame handle.
pub struct WaveRenderer {
    options: RendererOptions,
    surface: Surface,
    state: Lifecycle,
}

impl WaveRenderer {
    pub fn new(options: RendererOptions) -> Self {
        let surface = Surface::new(options.class.clone());
        WaveRenderer {
            options,
            surface,
            state: Lifecycle::Unmounted,
        }
    }

    /// Size the surface, anchor the waves, listen for resizes and ask for
    /// the first frame. Does nothing when no raster is available. Returns
    /// whether the renderer is running afterward.
    pub fn mount<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.is_running() {
            return true;
        }
        if !host.raster_available() {
            debug!("no raster available, wave renderer not started");
            return false;
        }

        self.surface.fit(host.viewport());
        let field = WaveField::anchored(&self.options.waves, self.surface.height());
        let backdrop = self.options.backdrop.then(|| Backdrop::new(self.options.fps));
        let listener = host.add_resize_listener();
        let frame = host.request_frame();

        info!(
            "wave renderer mounted at {:.0}x{:.0} with {} waves",
            self.surface.width(),
            self.surface.height(),
            field.len()
        );
        self.state = Lifecycle::Running(Running {
            listener,
            frame,
            field,
            clock: TimeCounter::new(),
            backdrop,
        });
        true
    }

    /// Remove the resize listener and cancel the pending frame.
    pub fn unmount<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Lifecycle::Running(run) = std::mem::replace(&mut self.state, Lifecycle::Unmounted) else {
            return;
        };
        host.remove_resize_listener(run.listener);
        host.cancel_frame(run.frame);
        info!("wave renderer unmounted after {} frames", run.clock.ticks());
    }

    /// Resize notification from the host. Ignored unless it is for this
    /// renderer's listener. Wave baselines keep their mount-time pixels.
    pub fn on_resize(&mut self, listener: ListenerId, viewport: Viewport) -> bool {
        match &self.state {
            Lifecycle::Running(run) if run.listener == listener => {
                self.surface.fit(viewport);
                debug!("surface resized to {:.0}x{:.0}", viewport.width, viewport.height);
                true
            }
            _ => false,
        }
    }

    /// Frame delivery from the host. Draws, advances time and re-arms.
    /// Returns false without drawing for any handle this renderer is not waiting on.
    pub fn on_frame<H, T>(&mut self, handle: FrameHandle, host: &mut H, target: &mut T) -> bool
    where
        H: Host + ?Sized,
        T: DrawTarget + ?Sized,
    {
        let Lifecycle::Running(run) = &mut self.state else {
            return false;
        };
        if run.frame != handle {
            return false;
        }
        compositor::compose(target, &self.surface, &run.field, run.clock.time(), run.backdrop.as_ref());
        run.clock.advance();
        run.frame = host.request_frame();
        true
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, Lifecycle::Running(_))
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Ticks drawn so far, while mounted.
    pub fn ticks(&self) -> Option<u64> {
        match &self.state {
            Lifecycle::Running(run) => Some(run.clock.ticks()),
            Lifecycle::Unmounted => None,
        }
    }

    #[cfg(test)]
    pub fn field(&self) -> Option<&WaveField> {
        match &self.state {
            Lifecycle::Running(run) => Some(&run.field),
            Lifecycle::Unmounted => None,
        }
    }
}
