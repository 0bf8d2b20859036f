/// Surface dimensions in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (minimized window, hidden canvas)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, 1.0 for an empty surface
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_size_new() {
        let size = SurfaceSize::new(1920, 1080);
        assert_eq!(size.width, 1920);
        assert_eq!(size.height, 1080);
        assert!(!size.is_empty());
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(SurfaceSize::new(800, 400).aspect_ratio(), 2.0);
        assert_eq!(SurfaceSize::new(100, 100).aspect_ratio(), 1.0);
    }

    #[test]
    fn test_empty_surface() {
        assert!(SurfaceSize::new(0, 600).is_empty());
        assert!(SurfaceSize::new(800, 0).is_empty());
        assert_eq!(SurfaceSize::new(0, 0).aspect_ratio(), 1.0);
    }

    #[test]
    fn test_equality_drives_depth_reuse() {
        assert_eq!(SurfaceSize::new(640, 480), SurfaceSize::new(640, 480));
        assert_ne!(SurfaceSize::new(640, 480), SurfaceSize::new(480, 640));
    }

    #[test]
    fn test_from_physical_size() {
        let size: SurfaceSize = winit::dpi::PhysicalSize::new(1024u32, 768u32).into();
        assert_eq!(size, SurfaceSize::new(1024, 768));
    }
}
