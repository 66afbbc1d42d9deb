//! Custom line caps
//!
//! A custom cap decorates a line end with two small paths expressed in pen width
//! units: the fill path is filled and the stroke path is stroked after being
//! scaled, rotated along the line and moved to the line end. Concrete behaviour is
//! provided by a [`CapDecoration`] implementation.
use crate::{
    Canvas, CustomLineCapType, FillMode, LineCap, LineJoin, Matrix, MatrixOrder,
    Path, Pen, Point, Scalar, Status, StrokeCap, StrokeJoin,
};
use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::Arc,
};

/// Smallest pen width used to scale cap geometry
const MIN_CAP_SCALE: Scalar = 2.0;

/// Behaviour of a custom cap kind
pub trait CapDecoration: fmt::Debug {
    fn cap_type(&self) -> CustomLineCapType;

    fn clone_decoration(&self) -> Box<dyn CapDecoration>;

    /// Prepare canvas stroke state for drawing the cap outline
    fn setup(&self, cap: &CustomLineCap, canvas: &mut dyn Canvas, pen: &Pen) -> Result<(), Status> {
        canvas.set_line_width(pen.width().max(1.0));
        canvas.set_line_join(map_line_join(cap.stroke_join));
        canvas.set_line_cap(map_line_cap(cap.start_cap));
        canvas.set_dash(&[], 0.0);
        canvas.status()
    }

    /// Draw cap at `end`, oriented along the line coming from `other_end`
    fn draw(
        &self,
        cap: &CustomLineCap,
        canvas: &mut dyn Canvas,
        pen: &Pen,
        end: Point,
        other_end: Point,
    ) -> Result<(), Status> {
        let tr = cap.placement(pen, end, other_end);
        if let Some(fill_path) = &cap.fill_path {
            let mut path = Path::clone(fill_path);
            path.transform(&tr);
            canvas.fill_path(&path, path.fill_mode());
        }
        if let Some(stroke_path) = &cap.stroke_path {
            self.setup(cap, canvas, pen)?;
            let mut path = Path::clone(stroke_path);
            path.transform(&tr);
            canvas.stroke_path(&path);
        }
        canvas.status()
    }

    /// Shape parameters if this is an adjustable arrow cap
    fn arrow_shape(&self) -> Option<ArrowShape> {
        None
    }
}

/// Cap drawn from user supplied paths
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCap;

impl CapDecoration for PathCap {
    fn cap_type(&self) -> CustomLineCapType {
        CustomLineCapType::Default
    }

    fn clone_decoration(&self) -> Box<dyn CapDecoration> {
        Box::new(*self)
    }
}

/// Custom line cap (`GpCustomLineCap`)
///
/// Paths are shared with the creator and with every clone, they are never copied.
pub struct CustomLineCap {
    decoration: Box<dyn CapDecoration>,
    kind: CustomLineCapType,
    fill_path: Option<Arc<Path>>,
    stroke_path: Option<Arc<Path>>,
    base_cap: LineCap,
    start_cap: LineCap,
    end_cap: LineCap,
    stroke_join: LineJoin,
    base_inset: Scalar,
    width_scale: Scalar,
}

impl fmt::Debug for CustomLineCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomLineCap")
            .field("kind", &self.kind)
            .field("base_cap", &self.base_cap)
            .field("start_cap", &self.start_cap)
            .field("end_cap", &self.end_cap)
            .field("stroke_join", &self.stroke_join)
            .field("base_inset", &self.base_inset)
            .field("width_scale", &self.width_scale)
            .finish()
    }
}

impl Clone for CustomLineCap {
    fn clone(&self) -> Self {
        Self {
            decoration: self.decoration.clone_decoration(),
            kind: self.kind,
            fill_path: self.fill_path.clone(),
            stroke_path: self.stroke_path.clone(),
            base_cap: self.base_cap,
            start_cap: self.start_cap,
            end_cap: self.end_cap,
            stroke_join: self.stroke_join,
            base_inset: self.base_inset,
            width_scale: self.width_scale,
        }
    }
}

impl CustomLineCap {
    /// Create custom cap from fill and stroke paths (`GdipCreateCustomLineCap`)
    pub fn new(
        fill_path: Arc<Path>,
        stroke_path: Arc<Path>,
        base_cap: LineCap,
        base_inset: Scalar,
    ) -> Self {
        Self::with_decoration(
            Box::new(PathCap),
            Some(fill_path),
            Some(stroke_path),
            base_cap,
            base_inset,
        )
    }

    /// Initialize common state, stroke caps are flat and join is miter.
    ///
    /// LAMESPEC: `width_scale` is documented to default to 1.0 but GDI+ reports 0.0.
    pub fn with_decoration(
        decoration: Box<dyn CapDecoration>,
        fill_path: Option<Arc<Path>>,
        stroke_path: Option<Arc<Path>>,
        base_cap: LineCap,
        base_inset: Scalar,
    ) -> Self {
        Self {
            kind: decoration.cap_type(),
            decoration,
            fill_path,
            stroke_path,
            base_cap,
            start_cap: LineCap::Flat,
            end_cap: LineCap::Flat,
            stroke_join: LineJoin::Miter,
            base_inset,
            width_scale: 0.0,
        }
    }

    /// Kind of the cap, available without dispatching to the decoration
    pub fn cap_type(&self) -> CustomLineCapType {
        self.kind
    }

    pub fn decoration(&self) -> &dyn CapDecoration {
        self.decoration.as_ref()
    }

    pub fn fill_path(&self) -> Option<&Arc<Path>> {
        self.fill_path.as_ref()
    }

    pub fn stroke_path(&self) -> Option<&Arc<Path>> {
        self.stroke_path.as_ref()
    }

    pub fn set_stroke_caps(&mut self, start_cap: LineCap, end_cap: LineCap) {
        self.start_cap = start_cap;
        self.end_cap = end_cap;
    }

    /// Caps used for the cap outline as `(start, end)`
    pub fn stroke_caps(&self) -> (LineCap, LineCap) {
        (self.start_cap, self.end_cap)
    }

    pub fn set_stroke_join(&mut self, join: LineJoin) {
        self.stroke_join = join;
    }

    pub fn stroke_join(&self) -> LineJoin {
        self.stroke_join
    }

    pub fn set_base_cap(&mut self, base_cap: LineCap) {
        self.base_cap = base_cap;
    }

    pub fn base_cap(&self) -> LineCap {
        self.base_cap
    }

    pub fn set_base_inset(&mut self, inset: Scalar) {
        self.base_inset = inset;
    }

    pub fn base_inset(&self) -> Scalar {
        self.base_inset
    }

    pub fn set_width_scale(&mut self, width_scale: Scalar) {
        self.width_scale = width_scale;
    }

    pub fn width_scale(&self) -> Scalar {
        self.width_scale
    }

    pub fn setup(&self, canvas: &mut dyn Canvas, pen: &Pen) -> Result<(), Status> {
        self.decoration.setup(self, canvas, pen)
    }

    /// Draw cap at `end` of the line which continues to `other_end`
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        pen: &Pen,
        end: Point,
        other_end: Point,
    ) -> Result<(), Status> {
        self.decoration.draw(self, canvas, pen, end, other_end)
    }

    /// Transformation from cap space into user space.
    ///
    /// In cap space the line end is at the origin and the line runs along positive
    /// `y`, units are pen widths.
    pub fn placement(&self, pen: &Pen, end: Point, other_end: Point) -> Matrix {
        let scale = pen.width().max(MIN_CAP_SCALE);
        let angle = cap_angle(end, other_end);
        Matrix::new_translate(end.x(), end.y())
            .rotate(angle - 90.0, MatrixOrder::Prepend)
            .scale(scale, scale, MatrixOrder::Prepend)
            .translate(0.0, self.base_inset, MatrixOrder::Prepend)
    }
}

/// Direction of the line from `end` to `other_end` in degrees
pub fn cap_angle(end: Point, other_end: Point) -> Scalar {
    (other_end.y() - end.y())
        .atan2(other_end.x() - end.x())
        .to_degrees()
}

/// Map GDI+ join onto the backend join
pub(crate) fn map_line_join(join: LineJoin) -> StrokeJoin {
    match join {
        LineJoin::Bevel => StrokeJoin::Bevel,
        LineJoin::Round => StrokeJoin::Round,
        _ => StrokeJoin::Miter,
    }
}

/// Map GDI+ cap onto the backend cap, anchors and unsupported caps become butt
pub(crate) fn map_line_cap(cap: LineCap) -> StrokeCap {
    match cap {
        LineCap::Square | LineCap::SquareAnchor => StrokeCap::Square,
        LineCap::Round | LineCap::RoundAnchor => StrokeCap::Round,
        _ => StrokeCap::Butt,
    }
}

/// Parameters of an adjustable arrow cap, in pen width units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowShape {
    pub height: Scalar,
    pub width: Scalar,
    pub middle_inset: Scalar,
    pub fill_state: bool,
}

impl ArrowShape {
    /// Arrow outline, tip at the origin and barbs towards positive `y`
    fn path(&self) -> Path {
        let half = self.width / 2.0;
        let mut path = Path::new(FillMode::Winding);
        path.move_to((-half, self.height)).line_to((0.0, 0.0)).line_to((half, self.height));
        if self.fill_state {
            path.line_to((0.0, self.height - self.middle_inset)).close();
        }
        path
    }
}

#[derive(Debug, Clone, Copy)]
struct ArrowCap(ArrowShape);

impl CapDecoration for ArrowCap {
    fn cap_type(&self) -> CustomLineCapType {
        CustomLineCapType::AdjustableArrow
    }

    fn clone_decoration(&self) -> Box<dyn CapDecoration> {
        Box::new(*self)
    }

    fn arrow_shape(&self) -> Option<ArrowShape> {
        Some(self.0)
    }
}

/// Arrow shaped custom cap (`GpAdjustableArrowCap`)
///
/// Dereferences to the underlying [`CustomLineCap`], which is what pens accept.
#[derive(Debug, Clone)]
pub struct AdjustableArrowCap {
    cap: CustomLineCap,
    shape: ArrowShape,
}

impl AdjustableArrowCap {
    pub fn new(height: Scalar, width: Scalar, is_filled: bool) -> Self {
        let shape = ArrowShape {
            height,
            width,
            middle_inset: 0.0,
            fill_state: is_filled,
        };
        let cap = CustomLineCap::with_decoration(
            Box::new(ArrowCap(shape)),
            None,
            None,
            LineCap::Triangle,
            0.0,
        );
        let mut arrow = Self { cap, shape };
        arrow.update();
        arrow
    }

    /// Regenerate cap geometry from the shape parameters
    fn update(&mut self) {
        let path = Arc::new(self.shape.path());
        self.cap.decoration = Box::new(ArrowCap(self.shape));
        if self.shape.fill_state {
            self.cap.fill_path = Some(path);
            self.cap.stroke_path = None;
        } else {
            self.cap.fill_path = None;
            self.cap.stroke_path = Some(path);
        }
    }

    pub fn shape(&self) -> ArrowShape {
        self.shape
    }

    pub fn height(&self) -> Scalar {
        self.shape.height
    }

    pub fn set_height(&mut self, height: Scalar) {
        self.shape.height = height;
        self.update();
    }

    pub fn width(&self) -> Scalar {
        self.shape.width
    }

    pub fn set_width(&mut self, width: Scalar) {
        self.shape.width = width;
        self.update();
    }

    pub fn middle_inset(&self) -> Scalar {
        self.shape.middle_inset
    }

    pub fn set_middle_inset(&mut self, middle_inset: Scalar) {
        self.shape.middle_inset = middle_inset;
        self.update();
    }

    pub fn fill_state(&self) -> bool {
        self.shape.fill_state
    }

    pub fn set_fill_state(&mut self, fill_state: bool) {
        self.shape.fill_state = fill_state;
        self.update();
    }

    pub fn into_cap(self) -> CustomLineCap {
        self.cap
    }
}

impl Deref for AdjustableArrowCap {
    type Target = CustomLineCap;

    fn deref(&self) -> &Self::Target {
        &self.cap
    }
}

impl DerefMut for AdjustableArrowCap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cap
    }
}

impl AsRef<CustomLineCap> for AdjustableArrowCap {
    fn as_ref(&self) -> &CustomLineCap {
        &self.cap
    }
}

impl From<AdjustableArrowCap> for CustomLineCap {
    fn from(arrow: AdjustableArrowCap) -> Self {
        arrow.cap
    }
}

impl TryFrom<CustomLineCap> for AdjustableArrowCap {
    type Error = Status;

    fn try_from(cap: CustomLineCap) -> Result<Self, Self::Error> {
        match cap.decoration.arrow_shape() {
            Some(shape) => Ok(Self { cap, shape }),
            None => Err(Status::InvalidParameter),
        }
    }
}
