use meridian_types::Coordinate;

use super::segments;

/// Signed area of a ring given without its closing coordinate.
///
/// The area is positive for counterclockwise rings and negative for clockwise ones.
pub fn signed_area(ring: &[Coordinate]) -> f64 {
    let Some(origin) = ring.first() else {
        return 0.0;
    };

    segments(ring, true)
        .map(|(a, b)| {
            let (ax, ay) = (a.x() - origin.x(), a.y() - origin.y());
            let (bx, by) = (b.x() - origin.x(), b.y() - origin.y());
            ax * by - bx * ay
        })
        .sum::<f64>()
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square() {
        let ccw = [
            Coordinate::new_2d(0.0, 0.0),
            Coordinate::new_2d(1.0, 0.0),
            Coordinate::new_2d(1.0, 1.0),
            Coordinate::new_2d(0.0, 1.0),
        ];
        assert_eq!(signed_area(&ccw), 1.0);

        let mut cw = ccw;
        cw.reverse();
        assert_eq!(signed_area(&cw), -1.0);
    }

    #[test]
    fn offset_triangle() {
        let triangle = [
            Coordinate::new_2d(1000.0, 1000.0),
            Coordinate::new_2d(1004.0, 1000.0),
            Coordinate::new_2d(1000.0, 1003.0),
        ];
        assert_eq!(signed_area(&triangle), 6.0);
    }

    #[test]
    fn degenerate() {
        assert_eq!(signed_area(&[]), 0.0);
        assert_eq!(signed_area(&[Coordinate::new_2d(1.0, 1.0)]), 0.0);
        assert_eq!(
            signed_area(&[Coordinate::new_2d(0.0, 0.0), Coordinate::new_2d(2.0, 2.0)]),
            0.0
        );
    }
}
