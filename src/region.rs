//! Regions: areas built from rectangles and paths with boolean operations
//!
//! Region blob starts with a kind word followed by kind specific data:
//! ```text
//! Rect:     [0][count][count x (x, y, width, height)]   count 0 is the empty region
//! Path:     [1][path tree encoding]
//! Infinite: [2]
//! ```
use crate::{
    utils::{ByteReader, ByteWriter},
    CombineMode, FillMode, Matrix, Path, PathTree, RectF, Scalar, Status,
};
use std::mem;

pub const REGION_KIND_RECT: u32 = 0;
pub const REGION_KIND_PATH: u32 = 1;
pub const REGION_KIND_INFINITE: u32 = 2;

/// Rectangle standing in for the infinite region when it has to become a path
pub const INFINITE_RECT: RectF = RectF::new(-4_194_304.0, -4_194_304.0, 8_388_608.0, 8_388_608.0);

const RECT_SIZE: usize = 16;

/// Region (`GpRegion`)
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Whole plane, newly created regions are infinite
    #[default]
    Infinite,
    Empty,
    Rect(RectF),
    /// Arbitrary combination of paths
    Path(PathTree),
}

impl Region {
    pub fn new() -> Self {
        Region::Infinite
    }

    /// Region covering the rectangle, rectangles without area produce the empty region
    pub fn from_rect(rect: RectF) -> Self {
        if rect.is_empty() {
            Region::Empty
        } else {
            Region::Rect(rect)
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Region::Path(PathTree::new(path.clone()))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Region::Empty)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Region::Infinite)
    }

    pub fn make_empty(&mut self) {
        *self = Region::Empty;
    }

    pub fn make_infinite(&mut self) {
        *self = Region::Infinite;
    }

    /// Path tree of the region, `None` unless the region is path based
    pub fn tree(&self) -> Option<&PathTree> {
        match self {
            Region::Path(tree) => Some(tree),
            _ => None,
        }
    }

    /// Bounding rectangle, path regions report bounds of all their leaves
    pub fn bounds(&self) -> RectF {
        match self {
            Region::Infinite => INFINITE_RECT,
            Region::Empty => RectF::default(),
            Region::Rect(rect) => *rect,
            Region::Path(tree) => {
                let points: Vec<_> = tree
                    .leaves()
                    .flat_map(|path| path.points().iter().copied())
                    .collect();
                RectF::from_points(&points).unwrap_or_default()
            }
        }
    }

    pub fn combine_rect(&mut self, rect: RectF, mode: CombineMode) -> Result<(), Status> {
        self.combine(Region::from_rect(rect), mode)
    }

    pub fn combine_path(&mut self, path: &Path, mode: CombineMode) -> Result<(), Status> {
        self.combine(Region::from_path(path), mode)
    }

    pub fn combine_region(&mut self, other: &Region, mode: CombineMode) -> Result<(), Status> {
        self.combine(other.clone(), mode)
    }

    /// Combine with `other`, the result replaces this region.
    ///
    /// Operations with a trivial outcome for empty or infinite operands are folded,
    /// everything else wraps both operands into a new combine node.
    pub fn combine(&mut self, other: Region, mode: CombineMode) -> Result<(), Status> {
        use Region::{Empty, Infinite};
        if !mode.is_known() {
            return Err(Status::InvalidParameter);
        }
        let current = mem::take(self);
        *self = match (mode, current, other) {
            (CombineMode::Replace, _, other) => other,
            (CombineMode::Union, Infinite, _) | (CombineMode::Union, _, Infinite) => Infinite,
            (CombineMode::Union, Empty, other) => other,
            (CombineMode::Union, current, Empty) => current,
            (CombineMode::Intersect, Empty, _) | (CombineMode::Intersect, _, Empty) => Empty,
            (CombineMode::Intersect, Infinite, other) => other,
            (CombineMode::Intersect, current, Infinite) => current,
            (CombineMode::Intersect, Region::Rect(a), Region::Rect(b)) => intersect_rects(a, b),
            (CombineMode::Xor, Empty, other) => other,
            (CombineMode::Xor, current, Empty) => current,
            (CombineMode::Exclude, Empty, _) | (CombineMode::Exclude, _, Infinite) => Empty,
            (CombineMode::Exclude, current, Empty) => current,
            (CombineMode::Complement, Infinite, _) | (CombineMode::Complement, _, Empty) => Empty,
            (CombineMode::Complement, Empty, other) => other,
            (mode, current, other) => Region::Path(PathTree::combine(
                mode,
                current.into_tree(),
                other.into_tree(),
            )),
        };
        Ok(())
    }

    /// Convert region into an equivalent path tree
    fn into_tree(self) -> PathTree {
        match self {
            Region::Infinite => PathTree::new(Path::rectangle(INFINITE_RECT, FillMode::Alternate)),
            Region::Empty => PathTree::default(),
            Region::Rect(rect) => PathTree::new(Path::rectangle(rect, FillMode::Alternate)),
            Region::Path(tree) => tree,
        }
    }

    pub fn translate(&mut self, dx: Scalar, dy: Scalar) {
        match self {
            Region::Rect(rect) => {
                rect.x += dx;
                rect.y += dy;
            }
            Region::Path(tree) => tree.translate(dx, dy),
            Region::Infinite | Region::Empty => {}
        }
    }

    /// Transform region, rectangles stay rectangles unless the matrix rotates or skews
    pub fn transform(&mut self, matrix: &Matrix) -> Result<(), Status> {
        match self {
            Region::Rect(rect) => {
                let [m11, m12, m21, m22, _, _] = matrix.elements();
                if m12 == 0.0 && m21 == 0.0 && m11 != 0.0 && m22 != 0.0 {
                    let mut corners = rect.corners();
                    matrix.transform_points(&mut corners);
                    *rect = RectF::from_points(&corners).unwrap_or(*rect);
                    Ok(())
                } else {
                    let mut tree = PathTree::new(Path::rectangle(*rect, FillMode::Alternate));
                    tree.transform(matrix)?;
                    *self = Region::Path(tree);
                    Ok(())
                }
            }
            Region::Path(tree) => tree.transform(matrix),
            Region::Infinite | Region::Empty => Ok(()),
        }
    }

    /// Size of the blob produced by [`Region::get_data`]
    pub fn data_size(&self) -> usize {
        4 + match self {
            Region::Infinite => 0,
            Region::Empty => 4,
            Region::Rect(_) => 4 + RECT_SIZE,
            Region::Path(tree) => tree.tree_size(),
        }
    }

    /// Write region blob into `buffer` returning number of bytes written
    pub fn get_data(&self, buffer: &mut [u8]) -> Result<usize, Status> {
        let size = self.data_size();
        if buffer.len() < size {
            return Err(Status::InsufficientBuffer);
        }
        let mut written = 0;
        let ok = match self {
            Region::Path(tree) => {
                let kind_written = ByteWriter::new(buffer, &mut written).write_u32(REGION_KIND_PATH);
                kind_written && tree.serialize(buffer, &mut written)
            }
            Region::Infinite => {
                ByteWriter::new(buffer, &mut written).write_u32(REGION_KIND_INFINITE)
            }
            Region::Empty => {
                let mut writer = ByteWriter::new(buffer, &mut written);
                writer.write_u32(REGION_KIND_RECT) && writer.write_u32(0)
            }
            Region::Rect(rect) => {
                let mut writer = ByteWriter::new(buffer, &mut written);
                writer.write_u32(REGION_KIND_RECT)
                    && writer.write_u32(1)
                    && [rect.x, rect.y, rect.width, rect.height]
                        .into_iter()
                        .all(|value| writer.write_f32(value))
            }
        };
        if ok {
            Ok(written)
        } else {
            Err(Status::GenericError)
        }
    }

    /// Restore region from blob produced by [`Region::get_data`]
    pub fn from_data(data: &[u8]) -> Result<Region, Status> {
        let mut reader = ByteReader::new(data);
        match reader.read_u32() {
            Some(REGION_KIND_RECT) => read_rects(&mut reader).ok_or(Status::InvalidParameter),
            Some(REGION_KIND_PATH) => {
                let mut tree = PathTree::default();
                if PathTree::deserialize(&data[4..], &mut tree) {
                    Ok(Region::Path(tree))
                } else {
                    Err(Status::InvalidParameter)
                }
            }
            Some(REGION_KIND_INFINITE) => Ok(Region::Infinite),
            Some(kind) => {
                tracing::warn!(kind, "unknown region kind");
                Err(Status::InvalidParameter)
            }
            None => Err(Status::InvalidParameter),
        }
    }
}

/// Read rectangle list, several rectangles become figures of a single path
fn read_rects(reader: &mut ByteReader<'_>) -> Option<Region> {
    let count = reader.read_u32()? as usize;
    if Some(reader.remaining()) != count.checked_mul(RECT_SIZE) {
        return None;
    }
    let mut rects = Vec::with_capacity(count);
    for _ in 0..count {
        let x = reader.read_f32()?;
        let y = reader.read_f32()?;
        let width = reader.read_f32()?;
        let height = reader.read_f32()?;
        rects.push(RectF::new(x, y, width, height));
    }
    match rects.as_slice() {
        [] => Some(Region::Empty),
        [rect] => Some(Region::from_rect(*rect)),
        _ => {
            let mut path = Path::new(FillMode::Alternate);
            for rect in rects {
                path.add_rectangle(rect);
            }
            Some(Region::Path(PathTree::new(path)))
        }
    }
}

fn intersect_rects(a: RectF, b: RectF) -> Region {
    let x0 = a.x.max(b.x);
    let y0 = a.y.max(b.y);
    let x1 = (a.x + a.width).min(b.x + b.width);
    let y1 = (a.y + a.height).min(b.y + b.height);
    Region::from_rect(RectF::new(x0, y0, x1 - x0, y1 - y0))
}
