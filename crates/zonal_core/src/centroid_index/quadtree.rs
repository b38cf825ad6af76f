//! Point quadtree over a fixed rectangular region.
//!
//! Points outside the region are refused at insertion. Nearest-neighbour
//! queries may come from anywhere; among equidistant entries the one inserted
//! first is returned.

use geo::{Coord, Rect};

const LEAF_CAPACITY: usize = 8;
/// Stops subdivision when many entries share (nearly) the same point.
const MAX_DEPTH: u8 = 24;

#[derive(Debug, Clone)]
struct Entry<T> {
    point: Coord<f64>,
    seq: u64,
    value: T,
}

#[derive(Debug, Clone)]
enum NodeKind<T> {
    Leaf(Vec<Entry<T>>),
    Branch(Box<[Node<T>; 4]>),
}

#[derive(Debug, Clone)]
struct Node<T> {
    bounds: Rect<f64>,
    depth: u8,
    kind: NodeKind<T>,
}

struct Candidate<'a, T> {
    dist2: f64,
    seq: u64,
    value: &'a T,
}

#[derive(Debug, Clone)]
pub(crate) struct QuadTree<T> {
    root: Node<T>,
    len: usize,
    next_seq: u64,
}

impl<T> QuadTree<T> {
    pub(crate) fn new(bounds: Rect<f64>) -> Self {
        Self {
            root: Node::leaf(bounds, 0),
            len: 0,
            next_seq: 0,
        }
    }

    pub(crate) fn bounds(&self) -> Rect<f64> {
        self.root.bounds
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Insert `value` at `point`. Returns `false` (and drops the value) when the
    /// point lies outside the tree's bounds; the boundary itself is inside.
    pub(crate) fn insert(&mut self, point: Coord<f64>, value: T) -> bool {
        if !covers(&self.root.bounds, point) {
            return false;
        }
        let entry = Entry {
            point,
            seq: self.next_seq,
            value,
        };
        self.next_seq += 1;
        self.len += 1;
        self.root.insert(entry);
        true
    }

    pub(crate) fn nearest(&self, point: Coord<f64>) -> Option<&T> {
        let mut best = None;
        self.root.nearest(point, &mut best);
        best.map(|candidate| candidate.value)
    }
}

impl<T> Node<T> {
    fn leaf(bounds: Rect<f64>, depth: u8) -> Self {
        Self {
            bounds,
            depth,
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    fn insert(&mut self, entry: Entry<T>) {
        let needs_split = match &mut self.kind {
            NodeKind::Branch(children) => {
                children[quadrant_of(&self.bounds, entry.point)].insert(entry);
                false
            }
            NodeKind::Leaf(entries) => {
                entries.push(entry);
                entries.len() > LEAF_CAPACITY && self.depth < MAX_DEPTH
            }
        };
        if needs_split {
            self.split();
        }
    }

    fn split(&mut self) {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        let mid = self.bounds.center();
        let depth = self.depth + 1;
        let children = Box::new([
            Node::leaf(Rect::new(min, mid), depth),
            Node::leaf(Rect::new(Coord { x: mid.x, y: min.y }, Coord { x: max.x, y: mid.y }), depth),
            Node::leaf(Rect::new(Coord { x: min.x, y: mid.y }, Coord { x: mid.x, y: max.y }), depth),
            Node::leaf(Rect::new(mid, max), depth),
        ]);
        if let NodeKind::Leaf(entries) = std::mem::replace(&mut self.kind, NodeKind::Branch(children)) {
            for entry in entries {
                self.insert(entry);
            }
        }
    }

    fn nearest<'a>(&'a self, point: Coord<f64>, best: &mut Option<Candidate<'a, T>>) {
        if let Some(current) = best.as_ref() {
            // Equal distance must still be visited: an older entry may tie.
            if min_dist2(&self.bounds, point) > current.dist2 {
                return;
            }
        }
        match &self.kind {
            NodeKind::Leaf(entries) => {
                for entry in entries {
                    let dist2 = dist2(entry.point, point);
                    let improves = match best.as_ref() {
                        None => true,
                        Some(current) => {
                            dist2 < current.dist2 || (dist2 == current.dist2 && entry.seq < current.seq)
                        }
                    };
                    if improves {
                        *best = Some(Candidate {
                            dist2,
                            seq: entry.seq,
                            value: &entry.value,
                        });
                    }
                }
            }
            NodeKind::Branch(children) => {
                let mut order = [0usize, 1, 2, 3];
                order.sort_by(|a, b| {
                    min_dist2(&children[*a].bounds, point)
                        .total_cmp(&min_dist2(&children[*b].bounds, point))
                });
                for child in order {
                    children[child].nearest(point, best);
                }
            }
        }
    }
}

fn covers(bounds: &Rect<f64>, point: Coord<f64>) -> bool {
    let (min, max) = (bounds.min(), bounds.max());
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// Index into the children array: bit 0 for the east half, bit 1 for the north half.
fn quadrant_of(bounds: &Rect<f64>, point: Coord<f64>) -> usize {
    let mid = bounds.center();
    usize::from(point.x >= mid.x) + 2 * usize::from(point.y >= mid.y)
}

fn dist2(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Squared distance from `point` to the closest point of `bounds` (0 inside).
fn min_dist2(bounds: &Rect<f64>, point: Coord<f64>) -> f64 {
    let (min, max) = (bounds.min(), bounds.max());
    let dx = (min.x - point.x).max(0.0).max(point.x - max.x);
    let dy = (min.y - point.y).max(0.0).max(point.y - max.y);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn unit_square(size: f64) -> Rect<f64> {
        Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: size, y: size })
    }

    #[test]
    fn empty_tree_has_no_nearest() {
        let tree: QuadTree<u32> = QuadTree::new(unit_square(10.0));
        assert_eq!(tree.nearest(Coord { x: 1.0, y: 1.0 }), None);
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn refuses_points_outside_bounds_but_accepts_boundary() {
        let mut tree = QuadTree::new(unit_square(10.0));
        assert!(tree.insert(Coord { x: 10.0, y: 0.0 }, "edge"));
        assert!(!tree.insert(Coord { x: 10.000_001, y: 5.0 }, "outside"));
        assert!(!tree.insert(Coord { x: 5.0, y: -0.5 }, "below"));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nearest(Coord { x: 11.0, y: 5.0 }), Some(&"edge"));
    }

    #[test]
    fn equidistant_entries_resolve_to_first_inserted() {
        let mut tree = QuadTree::new(unit_square(10.0));
        tree.insert(Coord { x: 8.0, y: 5.0 }, "east");
        tree.insert(Coord { x: 2.0, y: 5.0 }, "west");
        assert_eq!(tree.nearest(Coord { x: 5.0, y: 5.0 }), Some(&"east"));

        let mut reversed = QuadTree::new(unit_square(10.0));
        reversed.insert(Coord { x: 2.0, y: 5.0 }, "west");
        reversed.insert(Coord { x: 8.0, y: 5.0 }, "east");
        assert_eq!(reversed.nearest(Coord { x: 5.0, y: 5.0 }), Some(&"west"));
    }

    #[test]
    fn ties_across_subdivided_nodes_still_prefer_first_inserted() {
        let mut tree = QuadTree::new(unit_square(100.0));
        // Fill the south-west quadrant enough to force splits, then add a tie
        // partner in the north-east that was inserted before them.
        tree.insert(Coord { x: 60.0, y: 60.0 }, 0usize);
        for i in 1..=40 {
            tree.insert(Coord { x: i as f64, y: 1.0 }, i);
        }
        tree.insert(Coord { x: 40.0, y: 40.0 }, 99);
        // (50, 50) is equidistant from (40, 40) and (60, 60).
        assert_eq!(tree.nearest(Coord { x: 50.0, y: 50.0 }), Some(&0));
    }

    #[test]
    fn many_identical_points_do_not_split_forever() {
        let mut tree = QuadTree::new(unit_square(1.0));
        for i in 0..100 {
            assert!(tree.insert(Coord { x: 0.5, y: 0.5 }, i));
        }
        assert_eq!(tree.len(), 100);
        assert_eq!(tree.nearest(Coord { x: 0.0, y: 0.0 }), Some(&0));
    }

    #[test]
    fn degenerate_bounds_hold_only_that_point() {
        let point = Coord { x: 3.0, y: 4.0 };
        let mut tree = QuadTree::new(Rect::new(point, point));
        assert!(tree.insert(point, 'a'));
        assert!(!tree.insert(Coord { x: 3.0, y: 4.5 }, 'b'));
        assert_eq!(tree.nearest(Coord { x: -100.0, y: 0.0 }), Some(&'a'));
    }

    #[test]
    fn nearest_matches_brute_force_on_random_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = QuadTree::new(unit_square(1_000.0));
        let mut points = Vec::new();
        for i in 0..500 {
            let point = Coord {
                x: rng.gen_range(0.0..=1_000.0),
                y: rng.gen_range(0.0..=1_000.0),
            };
            tree.insert(point, i);
            points.push(point);
        }

        for _ in 0..200 {
            let query = Coord {
                x: rng.gen_range(-200.0..1_200.0),
                y: rng.gen_range(-200.0..1_200.0),
            };
            let expected = points
                .iter()
                .enumerate()
                .min_by(|(ia, a), (ib, b)| {
                    dist2(**a, query)
                        .total_cmp(&dist2(**b, query))
                        .then(ia.cmp(ib))
                })
                .map(|(i, _)| i);
            assert_eq!(tree.nearest(query).copied(), expected);
        }
    }
}
