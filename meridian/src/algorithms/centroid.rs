use meridian_types::Coordinate;

use super::segments;

/// Arithmetic mean of the coordinates, or [`Coordinate::UNDEFINED`] for an empty sequence.
pub fn mean_coordinate(coordinates: &[Coordinate]) -> Coordinate {
    if coordinates.is_empty() {
        return Coordinate::UNDEFINED;
    }

    let n = coordinates.len() as f64;
    let (x, y, z) = coordinates.iter().fold((0.0, 0.0, 0.0), |(x, y, z), c| {
        (x + c.x(), y + c.y(), z + c.z())
    });
    Coordinate::new(x / n, y / n, z / n)
}

/// Centroid of a curve: midpoints of its segments weighted by segment length.
///
/// Curves of zero length fall back to the mean of their coordinates.
pub fn curve_centroid(coordinates: &[Coordinate], closed: bool) -> Coordinate {
    let mut total = 0.0;
    let (mut x, mut y, mut z) = (0.0, 0.0, 0.0);
    for (a, b) in segments(coordinates, closed) {
        let length = a.distance(&b);
        let mid = a.midpoint(&b);
        total += length;
        x += mid.x() * length;
        y += mid.y() * length;
        z += mid.z() * length;
    }

    if total > 0.0 {
        Coordinate::new(x / total, y / total, z / total)
    } else {
        mean_coordinate(coordinates)
    }
}

/// Area moments of a ring relative to `origin`: doubled signed area and the first moments scaled by 6.
fn ring_moments(ring: &[Coordinate], origin: &Coordinate) -> (f64, f64, f64) {
    segments(ring, true).fold((0.0, 0.0, 0.0), |(area, mx, my), (a, b)| {
        let (ax, ay) = (a.x() - origin.x(), a.y() - origin.y());
        let (bx, by) = (b.x() - origin.x(), b.y() - origin.y());
        let cross = ax * by - bx * ay;
        (area + cross, mx + (ax + bx) * cross, my + (ay + by) * cross)
    })
}

/// Centroid of a surface bounded by the shell and holes.
///
/// Contributions of the rings are weighted by their signed areas, independent of ring orientation: the shell always
/// adds area, holes always subtract it. The Z component is the mean Z of the shell. Surfaces of zero area fall back to
/// the centroid of the shell curve.
pub fn surface_centroid(shell: &[Coordinate], holes: &[&[Coordinate]]) -> Coordinate {
    let Some(origin) = shell.first() else {
        return Coordinate::UNDEFINED;
    };

    let oriented = |ring: &[Coordinate]| {
        let (area, mx, my) = ring_moments(ring, origin);
        let sign = if area < 0.0 { -1.0 } else { 1.0 };
        (area * sign, mx * sign, my * sign)
    };

    let (mut area, mut mx, mut my) = oriented(shell);
    for hole in holes {
        let (hole_area, hole_mx, hole_my) = oriented(hole);
        area -= hole_area;
        mx -= hole_mx;
        my -= hole_my;
    }

    if area == 0.0 || !area.is_finite() {
        return curve_centroid(shell, true);
    }

    let z = mean_coordinate(shell).z();
    Coordinate::new(
        origin.x() + mx / (3.0 * area),
        origin.y() + my / (3.0 * area),
        z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(min: f64, max: f64) -> Vec<Coordinate> {
        vec![
            Coordinate::new_2d(min, min),
            Coordinate::new_2d(max, min),
            Coordinate::new_2d(max, max),
            Coordinate::new_2d(min, max),
        ]
    }

    #[test]
    fn mean() {
        assert!(mean_coordinate(&[]).is_undefined());
        assert_eq!(
            mean_coordinate(&[Coordinate::new(0.0, 0.0, 0.0), Coordinate::new(2.0, 4.0, 6.0)]),
            Coordinate::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn curve() {
        let line = [
            Coordinate::new_2d(0.0, 0.0),
            Coordinate::new_2d(2.0, 0.0),
            Coordinate::new_2d(2.0, 1.0),
        ];
        assert_relative_eq!(
            curve_centroid(&line, false),
            Coordinate::new_2d(4.0 / 3.0, 1.0 / 6.0),
            epsilon = 1e-12
        );

        let point = [Coordinate::new_2d(1.0, 1.0), Coordinate::new_2d(1.0, 1.0)];
        assert_eq!(curve_centroid(&point, false), Coordinate::new_2d(1.0, 1.0));
    }

    #[test]
    fn square_with_hole() {
        let shell = square(0.0, 4.0);
        let hole = square(0.0, 2.0);
        let centroid = surface_centroid(&shell, &[&hole]);

        // Three unit-weight quadrants centered at (1,3), (3,1) and (3,3).
        assert_relative_eq!(
            centroid,
            Coordinate::new_2d(7.0 / 3.0, 7.0 / 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn orientation_does_not_matter() {
        let mut shell = square(0.0, 4.0);
        shell.reverse();
        let hole = square(1.0, 3.0);
        assert_relative_eq!(
            surface_centroid(&shell, &[&hole]),
            Coordinate::new_2d(2.0, 2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn non_convex_shell() {
        // L-shape made of a 2x1 bar and a 1x1 block on top of its left end.
        let shell = [
            Coordinate::new_2d(0.0, 0.0),
            Coordinate::new_2d(2.0, 0.0),
            Coordinate::new_2d(2.0, 1.0),
            Coordinate::new_2d(1.0, 1.0),
            Coordinate::new_2d(1.0, 2.0),
            Coordinate::new_2d(0.0, 2.0),
        ];
        assert_relative_eq!(
            surface_centroid(&shell, &[]),
            Coordinate::new_2d(5.0 / 6.0, 5.0 / 6.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn degenerate_surface() {
        assert!(surface_centroid(&[], &[]).is_undefined());
        let flat = [
            Coordinate::new_2d(0.0, 0.0),
            Coordinate::new_2d(1.0, 0.0),
            Coordinate::new_2d(2.0, 0.0),
        ];
        assert_relative_eq!(
            surface_centroid(&flat, &[]),
            Coordinate::new_2d(1.0, 0.0),
            epsilon = 1e-12
        );
    }
}
