use serde::{Deserialize, Serialize};

/// Host viewport size in CSS pixels, sampled when a scene starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; a zero-height viewport reports 1.0.
    pub fn aspect(self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            (self.width as f32 / self.height as f32).max(1e-6)
        }
    }
}

/// A drawing surface (a canvas) whose backing store can be resized.
pub trait Surface {
    fn size(&self) -> Viewport;
    fn resize(&self, size: Viewport);
}

#[cfg(test)]
mod tests {
    use super::Viewport;

    #[test]
    fn aspect_ratio() {
        assert_eq!(Viewport::new(1600, 800).aspect(), 2.0);
        assert_eq!(Viewport::new(1600, 0).aspect(), 1.0);
        assert!(Viewport::new(0, 800).aspect() > 0.0);
    }
}
