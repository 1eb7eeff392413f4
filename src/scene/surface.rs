use crate::host::Viewport;

/// The raster area the scene draws into, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: f64,
    height: f64,
    /// Opaque style tag passed through from construction. Never interpreted.
    class: Option<String>,
}

impl Surface {
    pub fn new(class: Option<String>) -> Self {
        Surface {
            width: 0.0,
            height: 0.0,
            class,
        }
    }

    /// Match the viewport. Only the raw dimensions change.
    pub fn fit(&mut self, viewport: Viewport) {
        self.width = viewport.width;
        self.height = viewport.height;
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }
}
