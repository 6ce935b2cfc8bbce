use serde::{Deserialize, Serialize};

/// Vertical extent of an element in document coordinates (CSS pixels).
///
/// Horizontal geometry never influences scroll activation, so only the
/// vertical axis is carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// `window.scrollY`.
    pub scroll_y: f64,
    /// `window.innerHeight`.
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, height: f64) -> Self {
        Self { scroll_y, height }
    }

    /// Fraction of `bounds` that lies inside the viewport once the bottom
    /// edge is pulled in by `bottom_margin` pixels.
    ///
    /// Zero-height elements report `1.0` when their top lies inside the
    /// shrunken root and `0.0` otherwise.
    pub fn visible_fraction(&self, bounds: &Bounds, bottom_margin: f64) -> f64 {
        let root_top = self.scroll_y;
        let root_bottom = self.scroll_y + (self.height - bottom_margin).max(0.0);

        if bounds.height <= 0.0 {
            return if bounds.top >= root_top && bounds.top < root_bottom {
                1.0
            } else {
                0.0
            };
        }

        let overlap = bounds.bottom().min(root_bottom) - bounds.top.max(root_top);
        (overlap / bounds.height).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_visible_element() {
        let vp = Viewport::new(0.0, 800.0);
        let b = Bounds::new(100.0, 200.0);
        assert!((vp.visible_fraction(&b, 0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partially_visible_element_respects_bottom_margin() {
        // Root is [0, 750); element [700, 800) has 50 of 100 px inside.
        let vp = Viewport::new(0.0, 800.0);
        let b = Bounds::new(700.0, 100.0);
        assert!((vp.visible_fraction(&b, 50.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn element_below_fold_is_invisible() {
        let vp = Viewport::new(0.0, 800.0);
        let b = Bounds::new(2000.0, 100.0);
        assert_eq!(vp.visible_fraction(&b, 0.0), 0.0);
    }

    #[test]
    fn zero_height_element() {
        let vp = Viewport::new(100.0, 500.0);
        assert_eq!(vp.visible_fraction(&Bounds::new(200.0, 0.0), 0.0), 1.0);
        assert_eq!(vp.visible_fraction(&Bounds::new(50.0, 0.0), 0.0), 0.0);
    }
}
