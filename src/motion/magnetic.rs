use serde::Serialize;

use super::PathPoint;

// Element bounding box in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> PathPoint {
        PathPoint::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticConfig {
    pub strength: f64, // 0-1, share of the pointer delta the element follows
    pub radius: f64,   // px
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            strength: 0.3,
            radius: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Displacement that pulls an element toward the pointer.
///
/// Inside the capture radius the element follows `(1 - d / radius) *
/// strength` of the pointer's offset from its centre, so the pull fades to
/// nothing at the edge. Outside (or with a non-positive radius) it stays put.
pub fn magnetic_offset(pointer: PathPoint, rect: &Rect, config: &MagneticConfig) -> Offset {
    let center = rect.center();
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    let distance = dx.hypot(dy);

    if config.radius <= 0.0 || distance >= config.radius {
        return Offset::default();
    }

    let factor = (1.0 - distance / config.radius) * config.strength;
    Offset {
        x: dx * factor,
        y: dy * factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: Rect = Rect { left: 100.0, top: 100.0, width: 50.0, height: 50.0 };

    #[test]
    fn pulls_toward_pointer_inside_radius() {
        // centre (125, 125), pointer 30px right
        let off = magnetic_offset(PathPoint::new(155.0, 125.0), &BOX, &MagneticConfig::default());
        // (1 - 30/100) * 0.3 * 30
        assert!((off.x - 6.3).abs() < 1e-9);
        assert_eq!(off.y, 0.0);
    }

    #[test]
    fn zero_at_centre_and_outside() {
        let cfg = MagneticConfig::default();
        assert_eq!(magnetic_offset(PathPoint::new(125.0, 125.0), &BOX, &cfg), Offset::default());
        assert_eq!(magnetic_offset(PathPoint::new(225.0, 125.0), &BOX, &cfg), Offset::default());
        assert_eq!(magnetic_offset(PathPoint::new(400.0, 400.0), &BOX, &cfg), Offset::default());
    }

    #[test]
    fn degenerate_radius_is_inert() {
        let cfg = MagneticConfig { strength: 1.0, radius: 0.0 };
        assert_eq!(magnetic_offset(PathPoint::new(126.0, 125.0), &BOX, &cfg), Offset::default());
    }
}
