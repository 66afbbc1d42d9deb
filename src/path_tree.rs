//! Boolean combination trees of paths and their binary encoding
//!
//! Encoding uses native endian 32-bit words:
//! ```text
//! Leaf:    [1][point_count][fill_mode][point_count x u8 type][point_count x 2 x f32]
//! Combine: [2][combine_mode][branch1_size][branch1...][branch2_size][branch2...]
//! ```
//! Every walk over a tree uses an explicit stack, so arbitrarily deep trees coming
//! from untrusted blobs can not exhaust the call stack.
use crate::{
    utils::{ByteReader, ByteWriter},
    CombineMode, FillMode, Matrix, Path, Point, Scalar, Status,
};
use std::mem;

/// Tag of a path leaf
pub const REGION_TAG_PATH: u32 = 1;
/// Tag of a combine node
pub const REGION_TAG_TREE: u32 = 2;

/// Size of the leaf header: tag, point count and fill mode
const LEAF_HEADER_SIZE: usize = 12;
/// Size of the node header: tag, combine mode and two branch sizes
const NODE_HEADER_SIZE: usize = 16;
/// Encoded size of a single point: type byte and two reals
const POINT_SIZE: usize = 1 + mem::size_of::<Point>();

/// Either a path or a boolean combination of two subtrees
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathTree {
    Path(Path),
    Combine {
        mode: CombineMode,
        branch1: Box<PathTree>,
        branch2: Box<PathTree>,
    },
}

impl Default for PathTree {
    /// Leaf with an empty path
    fn default() -> Self {
        PathTree::Path(Path::default())
    }
}

impl Drop for PathTree {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_branches(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.detach_branches(&mut stack);
        }
    }
}

impl Clone for PathTree {
    fn clone(&self) -> Self {
        enum Step<'a> {
            Visit(&'a PathTree),
            Build(CombineMode),
        }
        let mut steps = vec![Step::Visit(self)];
        let mut built: Vec<PathTree> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(PathTree::Path(path)) => built.push(PathTree::Path(path.clone())),
                Step::Visit(PathTree::Combine {
                    mode,
                    branch1,
                    branch2,
                }) => {
                    steps.push(Step::Build(*mode));
                    steps.push(Step::Visit(branch2));
                    steps.push(Step::Visit(branch1));
                }
                Step::Build(mode) => {
                    let (Some(branch2), Some(branch1)) = (built.pop(), built.pop()) else {
                        break;
                    };
                    built.push(PathTree::combine(mode, branch1, branch2));
                }
            }
        }
        built.pop().unwrap_or_default()
    }
}

impl PathTree {
    /// Leaf holding the path
    pub fn new(path: Path) -> Self {
        PathTree::Path(path)
    }

    /// Node combining two subtrees
    pub fn combine(mode: CombineMode, branch1: PathTree, branch2: PathTree) -> Self {
        PathTree::Combine {
            mode,
            branch1: Box::new(branch1),
            branch2: Box::new(branch2),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PathTree::Path(_))
    }

    /// Path of a leaf, `None` for combine nodes
    pub fn path(&self) -> Option<&Path> {
        match self {
            PathTree::Path(path) => Some(path),
            PathTree::Combine { .. } => None,
        }
    }

    /// Leaf paths in depth first order
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// Move branches of a combine node to the stack, replacing them with empty leaves
    fn detach_branches(&mut self, stack: &mut Vec<PathTree>) {
        if let PathTree::Combine {
            branch1, branch2, ..
        } = self
        {
            stack.push(mem::take(branch1.as_mut()));
            stack.push(mem::take(branch2.as_mut()));
        }
    }

    /// Release all paths and nodes, the tree becomes a leaf with an empty path
    pub fn clear(&mut self) {
        let mut stack = Vec::new();
        self.detach_branches(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.detach_branches(&mut stack);
        }
        *self = PathTree::default();
    }

    /// Replace `dest` with a deep copy of this tree
    pub fn copy_into(&self, dest: &mut PathTree) {
        *dest = self.clone();
    }

    /// Apply `f` to every leaf path
    fn for_each_path_mut(&mut self, mut f: impl FnMut(&mut Path)) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                PathTree::Path(path) => f(path),
                PathTree::Combine {
                    branch1, branch2, ..
                } => {
                    stack.push(branch2.as_mut());
                    stack.push(branch1.as_mut());
                }
            }
        }
    }

    /// Transform points of every leaf.
    ///
    /// Matrices with non finite elements are rejected before any point is touched.
    pub fn transform(&mut self, matrix: &Matrix) -> Result<(), Status> {
        if !matrix.elements().iter().all(|value| value.is_finite()) {
            return Err(Status::InvalidParameter);
        }
        self.for_each_path_mut(|path| path.transform(matrix));
        Ok(())
    }

    /// Offset points of every leaf
    pub fn translate(&mut self, dx: Scalar, dy: Scalar) {
        self.for_each_path_mut(|path| path.translate(dx, dy));
    }

    /// Exact number of bytes [`PathTree::serialize`] writes for this tree
    pub fn tree_size(&self) -> usize {
        let mut size = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                PathTree::Path(path) => size += LEAF_HEADER_SIZE + path.len() * POINT_SIZE,
                PathTree::Combine {
                    branch1, branch2, ..
                } => {
                    size += NODE_HEADER_SIZE;
                    stack.push(branch2);
                    stack.push(branch1);
                }
            }
        }
        size
    }

    /// Write tree into `buffer` starting at `*written`, advancing `*written`.
    ///
    /// Returns `false` and leaves `written` untouched if the buffer is too small.
    pub fn serialize(&self, buffer: &mut [u8], written: &mut usize) -> bool {
        let size = self.tree_size();
        let _span = tracing::debug_span!("path_tree_serialize", size).entered();
        if buffer.len().saturating_sub(*written) < size {
            tracing::debug!(size, available = buffer.len().saturating_sub(*written), "buffer too small");
            return false;
        }

        enum Frame<'a> {
            Node(&'a PathTree),
            Branch(&'a PathTree),
            PatchSize(usize),
        }
        let mut writer = ByteWriter::new(buffer, written);
        let mut frames = vec![Frame::Node(self)];
        while let Some(frame) = frames.pop() {
            let ok = match frame {
                Frame::Node(PathTree::Path(path)) => {
                    let mut ok = writer.write_u32(REGION_TAG_PATH)
                        && writer.write_u32(path.len() as u32)
                        && writer.write_u32(path.fill_mode().0 as u32)
                        && writer.write_bytes(path.types());
                    for point in path.points() {
                        ok = ok && writer.write_bytes(bytemuck::bytes_of(point));
                    }
                    ok
                }
                Frame::Node(PathTree::Combine {
                    mode,
                    branch1,
                    branch2,
                }) => {
                    frames.push(Frame::Branch(branch2));
                    frames.push(Frame::Branch(branch1));
                    writer.write_u32(REGION_TAG_TREE) && writer.write_u32(mode.0 as u32)
                }
                Frame::Branch(node) => {
                    // size placeholder is patched once the branch is written
                    frames.push(Frame::PatchSize(writer.position()));
                    frames.push(Frame::Node(node));
                    writer.write_u32(0)
                }
                Frame::PatchSize(position) => {
                    let size = writer.position() - position - 4;
                    writer.patch_u32(position, size as u32)
                }
            };
            if !ok {
                return false;
            }
        }
        true
    }

    /// Decode tree from `data`, on success `tree` is replaced with the decoded tree.
    ///
    /// Leaf data must be sized exactly for its points, combine nodes may be followed
    /// by unused bytes. On failure `tree` is left untouched and everything decoded
    /// so far is released.
    pub fn deserialize(data: &[u8], tree: &mut PathTree) -> bool {
        enum Frame<'a> {
            Parse(&'a [u8]),
            Build(CombineMode),
        }
        let mut frames = vec![Frame::Parse(data)];
        let mut built: Vec<PathTree> = Vec::new();
        while let Some(frame) = frames.pop() {
            match frame {
                Frame::Parse(data) => {
                    let mut reader = ByteReader::new(data);
                    match reader.read_u32() {
                        Some(REGION_TAG_PATH) => match read_leaf(&mut reader) {
                            Some(path) => built.push(PathTree::Path(path)),
                            None => return false,
                        },
                        Some(REGION_TAG_TREE) => {
                            let Some((mode, branch1, branch2)) = read_node(&mut reader) else {
                                tracing::warn!("truncated region tree node");
                                return false;
                            };
                            frames.push(Frame::Build(mode));
                            frames.push(Frame::Parse(branch2));
                            frames.push(Frame::Parse(branch1));
                        }
                        Some(tag) => {
                            tracing::warn!(tag, "unknown region tree tag");
                            return false;
                        }
                        None => return false,
                    }
                }
                Frame::Build(mode) => {
                    let (Some(branch2), Some(branch1)) = (built.pop(), built.pop()) else {
                        return false;
                    };
                    built.push(PathTree::combine(mode, branch1, branch2));
                }
            }
        }
        match built.pop() {
            Some(result) if built.is_empty() => {
                *tree = result;
                true
            }
            _ => false,
        }
    }
}

/// Read leaf body, the reader must hold exactly the types and points
fn read_leaf(reader: &mut ByteReader<'_>) -> Option<Path> {
    let count = reader.read_u32()? as usize;
    let fill_mode = FillMode(reader.read_u32()? as i32);
    if Some(reader.remaining()) != count.checked_mul(POINT_SIZE) {
        tracing::warn!(
            count,
            remaining = reader.remaining(),
            "region path size does not match point count"
        );
        return None;
    }
    let types = reader.take(count)?;
    let points = reader
        .take(count * mem::size_of::<Point>())?
        .chunks_exact(mem::size_of::<Point>())
        .map(|chunk| bytemuck::try_pod_read_unaligned::<Point>(chunk).ok())
        .collect::<Option<Vec<_>>>()?;
    Path::from_points_and_types(&points, types, fill_mode).ok()
}

/// Read combine node body returning mode and both branch slices
fn read_node<'a>(reader: &mut ByteReader<'a>) -> Option<(CombineMode, &'a [u8], &'a [u8])> {
    let mode = CombineMode(reader.read_u32()? as i32);
    let size1 = reader.read_u32()? as usize;
    let branch1 = reader.take(size1)?;
    let size2 = reader.read_u32()? as usize;
    let branch2 = reader.take(size2)?;
    Some((mode, branch1, branch2))
}

/// Iterator over leaf paths of a [`PathTree`]
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    stack: Vec<&'a PathTree>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Path;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                PathTree::Path(path) => return Some(path),
                PathTree::Combine {
                    branch1, branch2, ..
                } => {
                    self.stack.push(branch2);
                    self.stack.push(branch1);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx_eq, point_type, MatrixOrder, RectF};

    fn triangle() -> Path {
        let mut path = Path::new(FillMode::Winding);
        path.move_to((0.0, 0.0))
            .line_to((10.0, 0.0))
            .line_to((5.0, 7.5))
            .close();
        path
    }

    fn sample_tree() -> PathTree {
        let rect = Path::rectangle(RectF::new(1.0, 2.0, 3.0, 4.0), FillMode::Alternate);
        let mut curve = Path::default();
        curve
            .move_to((0.0, 0.0))
            .cubic_to((1.0, 2.0), (3.0, 2.0), (4.0, 0.0));
        PathTree::combine(
            CombineMode::Xor,
            PathTree::combine(CombineMode::Union, PathTree::new(triangle()), PathTree::new(rect)),
            PathTree::new(curve),
        )
    }

    fn serialize(tree: &PathTree) -> Vec<u8> {
        let mut buffer = vec![0u8; tree.tree_size()];
        let mut written = 0;
        assert!(tree.serialize(&mut buffer, &mut written));
        assert_eq!(written, buffer.len());
        buffer
    }

    fn assert_points_close(left: &PathTree, right: &PathTree) {
        let left: Vec<_> = left.leaves().flat_map(|p| p.points().to_vec()).collect();
        let right: Vec<_> = right.leaves().flat_map(|p| p.points().to_vec()).collect();
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(&right) {
            assert!(l.is_close_to(*r, 1e-3), "{:?} != {:?}", l, r);
        }
    }

    #[test]
    fn test_tree_size() {
        let leaf = PathTree::new(triangle());
        assert_eq!(leaf.tree_size(), 12 + 3 * 9);
        let tree = sample_tree();
        assert_eq!(tree.tree_size(), 16 + 16 + (12 + 27) + (12 + 36) + (12 + 36));
    }

    #[test]
    fn test_round_trip() {
        let tree = sample_tree();
        let data = serialize(&tree);
        let mut decoded = PathTree::default();
        assert!(PathTree::deserialize(&data, &mut decoded));
        assert_eq!(decoded, tree);
        let modes: Vec<_> = decoded.leaves().map(|p| p.fill_mode()).collect();
        assert_eq!(
            modes,
            vec![FillMode::Winding, FillMode::Alternate, FillMode::Alternate]
        );
    }

    #[test]
    fn test_layout() {
        let mut path = Path::default();
        path.move_to((1.0, 2.0));
        let tree = PathTree::combine(
            CombineMode::Exclude,
            PathTree::new(path),
            PathTree::new(Path::new(FillMode::Winding)),
        );
        let data = serialize(&tree);
        let words = |range: std::ops::Range<usize>| -> Vec<u32> {
            data[range]
                .chunks_exact(4)
                .map(|c| u32::from_ne_bytes(c.try_into().unwrap()))
                .collect()
        };
        assert_eq!(words(0..12), vec![REGION_TAG_TREE, 4, 21]);
        assert_eq!(words(12..24), vec![REGION_TAG_PATH, 1, 0]);
        assert_eq!(data[24], point_type::START);
        assert_eq!(&data[25..29], &1.0f32.to_ne_bytes());
        assert_eq!(words(33..49), vec![12, REGION_TAG_PATH, 0, 1]);
        assert_eq!(data.len(), 49);
    }

    #[test]
    fn test_serialize_offset_and_capacity() {
        let tree = sample_tree();
        let size = tree.tree_size();

        // written counter is an accumulator
        let mut buffer = vec![0u8; size + 8];
        let mut written = 8;
        assert!(tree.serialize(&mut buffer, &mut written));
        assert_eq!(written, size + 8);
        let mut decoded = PathTree::default();
        assert!(PathTree::deserialize(&buffer[8..], &mut decoded));
        assert_eq!(decoded, tree);

        let mut small = vec![0u8; size - 1];
        let mut written = 0;
        assert!(!tree.serialize(&mut small, &mut written));
        assert_eq!(written, 0);
    }

    #[test]
    fn test_deserialize_malformed() {
        let leaf = PathTree::new(triangle());
        let mut data = serialize(&leaf);
        let mut tree = PathTree::new(Path::rectangle(
            RectF::new(0.0, 0.0, 1.0, 1.0),
            FillMode::Alternate,
        ));
        let original = tree.clone();

        // leaf sizes must match exactly
        assert!(!PathTree::deserialize(&data[..data.len() - 1], &mut tree));
        data.push(0);
        assert!(!PathTree::deserialize(&data, &mut tree));

        // unknown tag
        let mut bad_tag = serialize(&leaf);
        bad_tag[..4].copy_from_slice(&7u32.to_ne_bytes());
        assert!(!PathTree::deserialize(&bad_tag, &mut tree));

        // branch larger than the data
        let mut node = serialize(&sample_tree());
        node[8..12].copy_from_slice(&10_000u32.to_ne_bytes());
        assert!(!PathTree::deserialize(&node, &mut tree));

        assert!(!PathTree::deserialize(&[], &mut tree));
        assert!(!PathTree::deserialize(&[1, 0], &mut tree));
        assert_eq!(tree, original);
    }

    #[test]
    fn test_deserialize_trailing_node_bytes() {
        let tree = sample_tree();
        let mut data = serialize(&tree);
        data.extend_from_slice(&[0xff; 5]);
        let mut decoded = PathTree::default();
        assert!(PathTree::deserialize(&data, &mut decoded));
        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_translate_idempotence() {
        let mut tree = sample_tree();
        tree.translate(3.25, -7.5);
        assert_ne!(tree, sample_tree());
        tree.translate(-3.25, 7.5);
        assert_points_close(&tree, &sample_tree());
    }

    #[test]
    fn test_transform_composition() -> Result<(), Status> {
        let a = Matrix::new_rotate(30.0).translate(2.0, 1.0, MatrixOrder::Append);
        let b = Matrix::new_scale(2.0, 0.5);
        let mut stepwise = sample_tree();
        stepwise.transform(&a)?;
        stepwise.transform(&b)?;
        let mut combined = sample_tree();
        combined.transform(&a.multiply(b, MatrixOrder::Append))?;
        assert_points_close(&stepwise, &combined);

        let p = stepwise.leaves().next().unwrap().points()[1];
        let expected = b.apply(a.apply(Point::new(10.0, 0.0)));
        assert_approx_eq!(p.x(), expected.x(), 1e-4);
        assert_approx_eq!(p.y(), expected.y(), 1e-4);

        let invalid = Matrix::new(Scalar::NAN, 0.0, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(stepwise.transform(&invalid), Err(Status::InvalidParameter));
        Ok(())
    }

    #[test]
    fn test_clear_and_copy() {
        let tree = sample_tree();
        let mut copy = PathTree::default();
        tree.copy_into(&mut copy);
        assert_eq!(copy, tree);
        copy.clear();
        assert!(copy.is_leaf());
        assert_eq!(copy.path().map(|p| p.len()), Some(0));
        // original is unaffected
        assert_eq!(tree.leaves().count(), 3);
    }

    #[test]
    fn test_deep_tree() {
        let mut tree = PathTree::new(triangle());
        for _ in 0..100_000 {
            tree = PathTree::combine(CombineMode::Union, tree, PathTree::new(Path::default()));
        }
        let copy = tree.clone();
        let data = serialize(&copy);
        let mut decoded = PathTree::default();
        assert!(PathTree::deserialize(&data, &mut decoded));
        assert_eq!(decoded.tree_size(), tree.tree_size());
        assert_eq!(decoded.leaves().count(), 100_001);
        tree.clear();
        assert!(tree.is_leaf());
    }
}
