use tilepath_core::Vec3;

/// Octile distance on the X/Y plane with unit straight cost:
/// `D*(dx+dy) + (√2 - 2D)*min(dx, dy)`.
pub fn octile(a: Vec3, b: Vec3) -> f32 {
    const D: f32 = 1.0;
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    D * (dx + dy) + (std::f32::consts::SQRT_2 - 2.0 * D) * dx.min(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_and_diagonal() {
        let o = Vec3::ZERO;
        assert_eq!(octile(o, Vec3::new(5.0, 0.0, 0.0)), 5.0);
        assert_eq!(octile(o, Vec3::new(0.0, -3.0, 9.0)), 3.0);
        let d = octile(o, Vec3::new(2.0, 2.0, 0.0));
        assert!((d - 2.0 * std::f32::consts::SQRT_2).abs() < 1e-5);
        assert_eq!(octile(Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = Vec3::new(3.0, -7.0, 0.0);
        let b = Vec3::new(-2.0, 4.0, 0.0);
        assert_eq!(octile(a, b), octile(b, a));
    }
}
