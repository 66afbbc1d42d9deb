use crate::{point_type, FillMode, Matrix, Point, RectF, Scalar, Status};
use std::fmt;

/// Geometric path: parallel arrays of points and point types plus a fill mode.
///
/// Point types use GDI+ encoding (see [`point_type`]), a figure starts with
/// `START`, continues with `LINE` or groups of three `BEZIER` points, and the last
/// point of a closed figure carries `CLOSE_SUBPATH` flag.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    fill_mode: FillMode,
    points: Vec<Point>,
    types: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_start_new_fig"))]
    start_new_fig: bool,
}

#[cfg(feature = "serde")]
fn default_start_new_fig() -> bool {
    true
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:?}", self.fill_mode)?;
        for (point, kind) in self.points.iter().zip(&self.types) {
            match kind & point_type::TYPE_MASK {
                point_type::START => write!(f, " M{:?}", point)?,
                point_type::BEZIER => write!(f, " C{:?}", point)?,
                _ => write!(f, " L{:?}", point)?,
            }
            if kind & point_type::CLOSE_SUBPATH != 0 {
                write!(f, " Z")?;
            }
        }
        write!(f, ")")
    }
}

/// Paths are equal when fill mode, points and types are equal, pending figure state is ignored
impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.fill_mode == other.fill_mode
            && self.points == other.points
            && self.types == other.types
    }
}

impl Default for Path {
    fn default() -> Self {
        Self::new(FillMode::Alternate)
    }
}

impl Path {
    /// Create empty path
    pub fn new(fill_mode: FillMode) -> Self {
        Self {
            fill_mode,
            points: Vec::new(),
            types: Vec::new(),
            start_new_fig: true,
        }
    }

    /// Create path from parallel points and types arrays (`GdipCreatePath2`)
    pub fn from_points_and_types(
        points: &[Point],
        types: &[u8],
        fill_mode: FillMode,
    ) -> Result<Self, Status> {
        if points.len() != types.len() {
            return Err(Status::InvalidParameter);
        }
        Ok(Self {
            fill_mode,
            points: points.to_vec(),
            types: types.to_vec(),
            start_new_fig: true,
        })
    }

    /// Closed rectangle path
    pub fn rectangle(rect: RectF, fill_mode: FillMode) -> Self {
        let mut path = Self::new(fill_mode);
        path.add_rectangle(rect);
        path
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn set_fill_mode(&mut self, fill_mode: FillMode) {
        self.fill_mode = fill_mode;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn types(&self) -> &[u8] {
        &self.types
    }

    /// Number of points in the path
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last point of the path
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    fn push(&mut self, point: Point, kind: u8) {
        let kind = if std::mem::replace(&mut self.start_new_fig, false) {
            point_type::START
        } else {
            kind
        };
        self.points.push(point);
        self.types.push(kind);
    }

    /// Start a new figure, next point added becomes its start point
    pub fn start_figure(&mut self) -> &mut Self {
        self.start_new_fig = true;
        self
    }

    /// Start new figure at the point
    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.start_new_fig = true;
        self.push(p.into(), point_type::START);
        self
    }

    /// Add line from the last point to the specified point
    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.push(p.into(), point_type::LINE);
        self
    }

    /// Add cubic bezier curve from the last point
    pub fn cubic_to(
        &mut self,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> &mut Self {
        self.push(p1.into(), point_type::BEZIER);
        self.push(p2.into(), point_type::BEZIER);
        self.push(p3.into(), point_type::BEZIER);
        self
    }

    /// Add connected lines (`GdipAddPathLine2`)
    pub fn add_lines(&mut self, points: &[Point]) -> &mut Self {
        for point in points {
            self.push(*point, point_type::LINE);
        }
        self
    }

    /// Add closed rectangle figure
    pub fn add_rectangle(&mut self, rect: RectF) -> &mut Self {
        let [p0, p1, p2, p3] = rect.corners();
        self.move_to(p0).line_to(p1).line_to(p2).line_to(p3).close()
    }

    /// Close current figure
    pub fn close(&mut self) -> &mut Self {
        if let Some(kind) = self.types.last_mut() {
            *kind |= point_type::CLOSE_SUBPATH;
        }
        self.start_new_fig = true;
        self
    }

    /// Apply transformation to the path in place
    pub fn transform(&mut self, tr: &Matrix) {
        tr.transform_points(&mut self.points);
    }

    /// Offset every point of the path
    pub fn translate(&mut self, dx: Scalar, dy: Scalar) {
        for point in self.points.iter_mut() {
            *point = *point + Point::new(dx, dy);
        }
    }

    /// Bounding rectangle of the points, `None` for empty path
    pub fn bounds(&self) -> Option<RectF> {
        RectF::from_points(&self.points)
    }

    /// Iterate over figures as `(points, types, closed)` triples
    pub fn figures(&self) -> impl Iterator<Item = (&[Point], &[u8], bool)> + '_ {
        let mut start = 0;
        std::iter::from_fn(move || {
            if start >= self.types.len() {
                return None;
            }
            let mut end = start + 1;
            while end < self.types.len() && self.types[end] & point_type::TYPE_MASK != 0 {
                end += 1;
            }
            let figure = start..end;
            start = end;
            let closed = self.types[figure.end - 1] & point_type::CLOSE_SUBPATH != 0;
            Some((&self.points[figure.clone()], &self.types[figure], closed))
        })
    }
}
