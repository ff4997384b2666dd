//! Three-dimensional k-d tree for exact nearest-color lookup.
//!
//! The tree answers exact Euclidean nearest-neighbor queries. When several
//! points are at the same minimum distance, the one with the lowest input index
//! wins, so lookups are reproducible regardless of how the tree was split.

/// A static k-d tree over points in RGB space.
#[derive(Debug, Clone)]
pub struct KdTree {
    points: Vec<[f64; 3]>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

#[derive(Debug, Clone)]
struct Node {
    /// Index into `points` (and the caller's original slice).
    index: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

impl KdTree {
    /// Build a tree over `points`. Indices returned by queries refer to this slice.
    pub fn build(points: &[[f64; 3]]) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        let root = build_node(points, &mut order, 0, &mut nodes);

        Self {
            points: points.to_vec(),
            nodes,
            root,
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the point nearest to `target`, or `None` for an empty tree.
    pub fn nearest(&self, target: [f64; 3]) -> Option<usize> {
        let root = self.root?;
        let mut best = Best {
            index: usize::MAX,
            distance: f64::INFINITY,
        };
        self.search(root, target, &mut best);
        Some(best.index)
    }

    fn search(&self, node_id: usize, target: [f64; 3], best: &mut Best) {
        let node = &self.nodes[node_id];
        let point = self.points[node.index];

        let distance = squared_distance(point, target);
        if distance < best.distance || (distance == best.distance && node.index < best.index) {
            best.index = node.index;
            best.distance = distance;
        }

        let delta = target[node.axis] - point[node.axis];
        let (near, far) = if delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.search(near, target, best);
        }

        // `<=` so equidistant points on the far side still get a chance at the tie-break.
        if let Some(far) = far
            && delta * delta <= best.distance
        {
            self.search(far, target, best);
        }
    }
}

struct Best {
    index: usize,
    distance: f64,
}

fn build_node(
    points: &[[f64; 3]],
    order: &mut [usize],
    depth: usize,
    nodes: &mut Vec<Node>,
) -> Option<usize> {
    if order.is_empty() {
        return None;
    }

    let axis = depth % 3;
    order.sort_by(|&a, &b| points[a][axis].total_cmp(&points[b][axis]).then(a.cmp(&b)));

    let mid = order.len() / 2;
    let id = nodes.len();
    nodes.push(Node {
        index: order[mid],
        axis,
        left: None,
        right: None,
    });

    let (left, rest) = order.split_at_mut(mid);
    let left = build_node(points, left, depth + 1, nodes);
    let right = build_node(points, &mut rest[1..], depth + 1, nodes);
    nodes[id].left = left;
    nodes[id].right = right;

    Some(id)
}

fn squared_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}
