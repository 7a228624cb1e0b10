use meridian_types::{Coordinate, PrecisionModel};

use super::Orientation;

/// Removes consecutive coordinates that are equal within the tolerance of `precision`. For closed sequences the last
/// coordinate is removed too if it equals the first one.
pub(crate) fn distinct_consecutive(
    coordinates: &[Coordinate],
    closed: bool,
    precision: &PrecisionModel,
) -> Vec<Coordinate> {
    let mut result: Vec<Coordinate> = Vec::with_capacity(coordinates.len());
    for c in coordinates {
        if result.last().map_or(true, |last| !precision.are_equal(*last, *c)) {
            result.push(*c);
        }
    }

    if closed && result.len() > 1 {
        if let (Some(first), Some(last)) = (result.first(), result.last()) {
            if precision.are_equal(*first, *last) {
                result.pop();
            }
        }
    }

    result
}

fn on_segment(p: &Coordinate, q: &Coordinate, r: &Coordinate) -> bool {
    q.x() <= p.x().max(r.x())
        && q.x() >= p.x().min(r.x())
        && q.y() <= p.y().max(r.y())
        && q.y() >= p.y().min(r.y())
}

/// Returns true if segments `p1-p2` and `q1-q2` have at least one common point.
pub fn segments_intersect(
    p1: &Coordinate,
    p2: &Coordinate,
    q1: &Coordinate,
    q2: &Coordinate,
    precision: &PrecisionModel,
) -> bool {
    let o1 = Orientation::triplet(p1, q1, p2, precision);
    let o2 = Orientation::triplet(p1, q2, p2, precision);
    let o3 = Orientation::triplet(q1, p1, q2, precision);
    let o4 = Orientation::triplet(q1, p2, q2, precision);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, q1, p2))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, p2))
        || (o3 == Orientation::Collinear && on_segment(q1, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(q1, p2, q2))
}

/// Returns true if the curve does not intersect itself.
///
/// Adjacent segments may only share their common vertex. An open curve whose end meets its start is still simple.
/// Repeated consecutive coordinates are ignored.
pub fn is_simple(coordinates: &[Coordinate], closed: bool, precision: &PrecisionModel) -> bool {
    let mut points = distinct_consecutive(coordinates, false, precision);
    let ends_meet = points.len() > 2
        && points
            .first()
            .zip(points.last())
            .is_some_and(|(first, last)| precision.are_equal(*first, *last));
    if ends_meet {
        points.pop();
    }
    let closed = closed || ends_meet;

    let segments: Vec<_> = super::segments(&points, closed).collect();
    let count = segments.len();
    for i in 0..count {
        for j in i + 1..count {
            let (a1, a2) = segments[i];
            let (b1, b2) = segments[j];
            let adjacent = j == i + 1 || (closed && i == 0 && j == count - 1);

            if adjacent {
                // Adjacent segments share a vertex, they must not fold back onto each other.
                let (shared, other_a, other_b) = if j == i + 1 {
                    (a2, a1, b2)
                } else {
                    (a1, a2, b1)
                };
                let folds = Orientation::triplet(&other_a, &shared, &other_b, precision)
                    == Orientation::Collinear
                    && (other_a - shared).dot_product(&(other_b - shared)) > 0.0;
                if folds {
                    return false;
                }
            } else if segments_intersect(&a1, &a2, &b1, &b2, precision) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new_2d(x, y)
    }

    fn crosses(segment: [(f64, f64); 2], other: [(f64, f64); 2]) -> bool {
        let [p1, p2] = segment.map(|(x, y)| c(x, y));
        let [q1, q2] = other.map(|(x, y)| c(x, y));
        segments_intersect(&p1, &p2, &q1, &q2, &PrecisionModel::floating())
    }

    #[test]
    fn intersection() {
        assert!(crosses([(0.0, 0.0), (2.0, 2.0)], [(0.0, 2.0), (2.0, 0.0)]));
        assert!(crosses([(0.0, 0.0), (2.0, 0.0)], [(1.0, 0.0), (3.0, 0.0)]));
        assert!(crosses([(0.0, 0.0), (2.0, 0.0)], [(2.0, 0.0), (2.0, 5.0)]));
        assert!(!crosses([(0.0, 0.0), (1.0, 0.0)], [(2.0, 0.0), (3.0, 0.0)]));
        assert!(!crosses([(0.0, 0.0), (1.0, 1.0)], [(0.0, 1.0), (0.4, 0.6)]));
    }

    #[test]
    fn collinear_disjoint_in_y() {
        assert!(!crosses([(0.0, 0.0), (0.0, 1.0)], [(0.0, 2.0), (0.0, 3.0)]));
    }

    #[test]
    fn simplicity() {
        let precision = PrecisionModel::floating();
        let zigzag = [c(0.0, 0.0), c(1.0, 1.0), c(2.0, 0.0), c(3.0, 1.0)];
        assert!(is_simple(&zigzag, false, &precision));

        let bow_tie = [c(0.0, 0.0), c(2.0, 2.0), c(2.0, 0.0), c(0.0, 2.0)];
        assert!(!is_simple(&bow_tie, true, &precision));
        assert!(!is_simple(&bow_tie, false, &precision));

        let open_square = [c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0)];
        assert!(is_simple(&open_square, false, &precision));

        let square = [c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0), c(0.0, 0.0)];
        assert!(is_simple(&square, false, &precision));

        let back_track = [c(0.0, 0.0), c(2.0, 0.0), c(1.0, 0.0)];
        assert!(!is_simple(&back_track, false, &precision));

        let repeated = [c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(1.0, 1.0)];
        assert!(is_simple(&repeated, false, &precision));
    }

    #[test]
    fn distinct() {
        let precision = PrecisionModel::fixed(10.0).unwrap();
        let result = distinct_consecutive(
            &[c(0.0, 0.0), c(0.01, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 0.0)],
            true,
            &precision,
        );
        assert_eq!(result, vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0)]);
    }
}
