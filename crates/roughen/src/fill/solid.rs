//! Solid fill: each ring retraced once as a closed rough sub-path.

use crate::geometry::Point;
use crate::ops::Op;
use crate::options::ResolvedOptions;
use crate::rng::RandomSource;
use crate::sketch::continuous_path;

pub(super) fn fill(polygons: &[Vec<Point>], o: &ResolvedOptions, rng: &mut RandomSource) -> Vec<Op> {
    polygons.iter().flat_map(|ring| continuous_path(ring, true, o, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    #[test]
    fn one_closed_subpath_per_ring() {
        let o = Options::new().with_fill("red").resolve().unwrap().for_fill();
        let ring = |x: f64| vec![Point::new(x, 0.0), Point::new(x + 10.0, 0.0), Point::new(x, 10.0)];
        let ops = fill(&[ring(0.0), ring(20.0)], &o, &mut RandomSource::new(3).unwrap());

        let moves: Vec<usize> = ops
            .iter()
            .enumerate()
            .filter(|(_, op)| matches!(op, Op::Move(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(moves.len(), 2);

        // move, two cubics, closing line
        assert_eq!(moves[1], 4);
        let Op::Move(start) = ops[0] else { unreachable!() };
        assert_eq!(ops[3], Op::LineTo(start));
    }
}
