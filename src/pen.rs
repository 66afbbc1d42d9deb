//! Pen: complete stroke description and its translation into backend stroke state
use crate::{
    linecap::{map_line_cap, map_line_join},
    Argb, Brush, Canvas, CustomLineCap, DashCap, DashStyle, Graphics, LineCap, LineJoin, Matrix,
    MatrixOrder, PenAlignment, PenType, Point, Scalar, SolidFill, Status, StrokeCap, Unit,
    near_zero,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Scale used in place of a collapsed pen transform scale
const DEGENERATE_SCALE: Scalar = 0.0001;

static DOT_PATTERN: [Scalar; 2] = [1.0, 1.0];
static DASH_PATTERN: [Scalar; 2] = [3.0, 1.0];
static DASH_DOT_PATTERN: [Scalar; 4] = [3.0, 1.0, 1.0, 1.0];
static DASH_DOT_DOT_PATTERN: [Scalar; 6] = [3.0, 1.0, 1.0, 1.0, 1.0, 1.0];

static PEN_STAMP: AtomicU64 = AtomicU64::new(1);

/// Allocate process unique pen stamp
fn next_stamp() -> u64 {
    PEN_STAMP.fetch_add(1, Ordering::Relaxed)
}

/// Canonical pattern of a named dash style, lengths are in pen widths
pub fn dash_pattern(style: DashStyle) -> Option<&'static [Scalar]> {
    match style {
        DashStyle::Dot => Some(&DOT_PATTERN),
        DashStyle::Dash => Some(&DASH_PATTERN),
        DashStyle::DashDot => Some(&DASH_DOT_PATTERN),
        DashStyle::DashDotDot => Some(&DASH_DOT_DOT_PATTERN),
        _ => None,
    }
}

/// Dash pattern storage of a pen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Dashes {
    /// Solid line
    #[default]
    None,
    /// One of the canonical patterns shared by all pens
    Shared(&'static [Scalar]),
    /// Pattern owned by the pen
    Owned(Box<[Scalar]>),
}

impl Dashes {
    pub fn as_slice(&self) -> &[Scalar] {
        match self {
            Dashes::None => &[],
            Dashes::Shared(dashes) => dashes,
            Dashes::Owned(dashes) => dashes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Dashes::Owned(_))
    }
}

/// Identity and version of a pen as remembered by [`Graphics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PenKey {
    pub stamp: u64,
    pub version: u64,
}

/// Stroke description (`GpPen`)
///
/// Every mutation bumps the pen version. A [`Graphics`] remembers the stamp and
/// version of the pen it configured last, so [`Pen::setup`] pushes the full stroke
/// state whenever either differs.
#[derive(Debug)]
pub struct Pen {
    stamp: u64,
    version: u64,
    color: Argb,
    brush: Box<dyn Brush>,
    width: Scalar,
    miter_limit: Scalar,
    line_join: LineJoin,
    dash_style: DashStyle,
    line_cap: LineCap,
    end_cap: LineCap,
    dash_cap: DashCap,
    compound: Vec<Scalar>,
    mode: PenAlignment,
    dash_offset: Scalar,
    dashes: Dashes,
    unit: Unit,
    matrix: Matrix,
    custom_start_cap: Option<CustomLineCap>,
    custom_end_cap: Option<CustomLineCap>,
}

impl Clone for Pen {
    /// Deep copy, the copy gets its own stamp so it never hits the canvas cache of the original
    fn clone(&self) -> Self {
        Self {
            stamp: next_stamp(),
            version: 0,
            color: self.color,
            brush: self.brush.clone(),
            width: self.width,
            miter_limit: self.miter_limit,
            line_join: self.line_join,
            dash_style: self.dash_style,
            line_cap: self.line_cap,
            end_cap: self.end_cap,
            dash_cap: self.dash_cap,
            compound: self.compound.clone(),
            mode: self.mode,
            dash_offset: self.dash_offset,
            dashes: self.dashes.clone(),
            unit: self.unit,
            matrix: self.matrix,
            custom_start_cap: self.custom_start_cap.clone(),
            custom_end_cap: self.custom_end_cap.clone(),
        }
    }
}

impl Pen {
    /// Create pen with a solid color brush (`GdipCreatePen1`)
    pub fn new(color: Argb, width: Scalar, unit: Unit) -> Self {
        Self::with_brush(&SolidFill::new(color), width, unit)
    }

    /// Create pen filled with a copy of the brush (`GdipCreatePen2`)
    pub fn with_brush(brush: &dyn Brush, width: Scalar, unit: Unit) -> Self {
        Self {
            stamp: next_stamp(),
            version: 0,
            color: brush.solid_color().unwrap_or(Argb::TRANSPARENT),
            brush: brush.clone_brush(),
            width,
            miter_limit: 10.0,
            line_join: LineJoin::Miter,
            dash_style: DashStyle::Solid,
            line_cap: LineCap::Flat,
            end_cap: LineCap::Flat,
            dash_cap: DashCap::Flat,
            compound: Vec::new(),
            mode: PenAlignment::Center,
            dash_offset: 0.0,
            dashes: Dashes::None,
            unit,
            matrix: Matrix::identity(),
            custom_start_cap: None,
            custom_end_cap: None,
        }
    }

    /// Identity used by the last pen cache of [`Graphics`]
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Number of modifications since creation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Key of the stroke state this pen pushes to a canvas
    pub fn cache_key(&self) -> PenKey {
        PenKey {
            stamp: self.stamp,
            version: self.version,
        }
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn width(&self) -> Scalar {
        self.width
    }

    pub fn set_width(&mut self, width: Scalar) {
        self.width = width;
        self.touch();
    }

    pub fn color(&self) -> Argb {
        self.color
    }

    /// Set color, solid brushes follow it, other brushes only update the cached value
    pub fn set_color(&mut self, color: Argb) {
        self.brush.set_solid_color(color);
        self.color = color;
        self.touch();
    }

    pub fn brush(&self) -> &dyn Brush {
        self.brush.as_ref()
    }

    /// Independent copy of the fill brush
    pub fn brush_fill(&self) -> Box<dyn Brush> {
        self.brush.clone_brush()
    }

    /// Replace fill with a copy of the brush, cached color is reset for non solid fills
    pub fn set_brush_fill(&mut self, brush: &dyn Brush) {
        self.color = brush.solid_color().unwrap_or(Argb::TRANSPARENT);
        self.brush = brush.clone_brush();
        self.touch();
    }

    pub fn fill_type(&self) -> PenType {
        PenType::from(self.brush.brush_type())
    }

    pub fn miter_limit(&self) -> Scalar {
        self.miter_limit
    }

    /// Set miter limit, values below 1.0 are raised to 1.0
    pub fn set_miter_limit(&mut self, limit: Scalar) {
        self.miter_limit = limit.max(1.0);
        self.touch();
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
        self.touch();
    }

    pub fn start_cap(&self) -> LineCap {
        self.line_cap
    }

    /// Set start cap, the backend renders it for both ends
    pub fn set_start_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
        self.touch();
    }

    pub fn end_cap(&self) -> LineCap {
        self.end_cap
    }

    pub fn set_end_cap(&mut self, cap: LineCap) {
        self.end_cap = cap;
        self.touch();
    }

    pub fn dash_cap(&self) -> DashCap {
        self.dash_cap
    }

    /// Set dash cap, anything but round and triangle becomes flat
    pub fn set_dash_cap(&mut self, cap: DashCap) {
        self.dash_cap = match cap {
            DashCap::Round | DashCap::Triangle => cap,
            _ => DashCap::Flat,
        };
        self.touch();
    }

    /// Set all caps at once (`GdipSetPenLineCap197819`)
    pub fn set_line_cap(&mut self, start: LineCap, end: LineCap, dash: DashCap) {
        self.set_start_cap(start);
        self.set_end_cap(end);
        self.set_dash_cap(dash);
    }

    pub fn mode(&self) -> PenAlignment {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PenAlignment) {
        self.mode = mode;
        self.touch();
    }

    /// Unit of the width, stored but never converted
    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
        self.touch();
    }

    pub fn transform(&self) -> Matrix {
        self.matrix
    }

    pub fn set_transform(&mut self, matrix: Matrix) -> Result<(), Status> {
        if !matrix.is_invertible() {
            return Err(Status::InvalidParameter);
        }
        self.matrix = matrix;
        self.touch();
        Ok(())
    }

    pub fn reset_transform(&mut self) {
        self.matrix = Matrix::identity();
        self.touch();
    }

    pub fn multiply_transform(&mut self, matrix: Matrix, order: MatrixOrder) -> Result<(), Status> {
        if !matrix.is_invertible() {
            return Err(Status::InvalidParameter);
        }
        self.matrix = self.matrix.multiply(matrix, order);
        self.touch();
        Ok(())
    }

    pub fn translate_transform(&mut self, dx: Scalar, dy: Scalar, order: MatrixOrder) {
        self.matrix = self.matrix.translate(dx, dy, order);
        self.touch();
    }

    pub fn scale_transform(&mut self, sx: Scalar, sy: Scalar, order: MatrixOrder) {
        self.matrix = self.matrix.scale(sx, sy, order);
        self.touch();
    }

    /// Rotate pen transform, angle is in degrees
    pub fn rotate_transform(&mut self, degrees: Scalar, order: MatrixOrder) {
        self.matrix = self.matrix.rotate(degrees, order);
        self.touch();
    }

    pub fn dash_style(&self) -> DashStyle {
        self.dash_style
    }

    /// Select named dash style.
    ///
    /// Canonical styles share static patterns, `Solid` drops the pattern and
    /// `Custom` keeps whatever pattern is assigned. Unknown styles are rejected
    /// with `GenericError` and the pen is left untouched.
    pub fn set_dash_style(&mut self, style: DashStyle) -> Result<(), Status> {
        match style {
            DashStyle::Solid => self.dashes = Dashes::None,
            DashStyle::Custom => {}
            _ => match dash_pattern(style) {
                Some(pattern) => self.dashes = Dashes::Shared(pattern),
                None => return Err(Status::GenericError),
            },
        }
        self.dash_style = style;
        self.touch();
        Ok(())
    }

    pub fn dash_offset(&self) -> Scalar {
        self.dash_offset
    }

    pub fn set_dash_offset(&mut self, offset: Scalar) {
        self.dash_offset = offset;
        self.touch();
    }

    pub fn dashes(&self) -> &Dashes {
        &self.dashes
    }

    pub fn dash_count(&self) -> usize {
        self.dashes.len()
    }

    pub fn dash_array(&self) -> &[Scalar] {
        self.dashes.as_slice()
    }

    /// Take a private copy of the pattern and switch to `Custom` style
    pub fn set_dash_array(&mut self, dashes: &[Scalar]) -> Result<(), Status> {
        if dashes.is_empty() {
            return Err(Status::InvalidParameter);
        }
        self.dashes = Dashes::Owned(dashes.into());
        self.dash_style = DashStyle::Custom;
        self.touch();
        Ok(())
    }

    /// Copy pattern into `out` which must have exactly `dash_count` elements.
    ///
    /// An empty output buffer reports `OutOfMemory` as GDI+ does.
    pub fn get_dash_array(&self, out: &mut [Scalar]) -> Result<(), Status> {
        if out.is_empty() {
            return Err(Status::OutOfMemory);
        }
        let dashes = self.dashes.as_slice();
        if out.len() != dashes.len() {
            return Err(Status::InvalidParameter);
        }
        out.copy_from_slice(dashes);
        Ok(())
    }

    pub fn compound_count(&self) -> usize {
        self.compound.len()
    }

    pub fn compound_array(&self) -> &[Scalar] {
        &self.compound
    }

    /// Set stripe positions, values are copied as is without range or order checks
    pub fn set_compound_array(&mut self, compound: &[Scalar]) -> Result<(), Status> {
        if compound.is_empty() {
            return Err(Status::InvalidParameter);
        }
        self.compound = compound.to_vec();
        self.touch();
        Ok(())
    }

    /// Copy first `out.len()` stripe positions
    pub fn get_compound_array(&self, out: &mut [Scalar]) -> Result<(), Status> {
        if out.len() > self.compound.len() {
            return Err(Status::InvalidParameter);
        }
        out.copy_from_slice(&self.compound[..out.len()]);
        Ok(())
    }

    /// Copy of the custom start cap
    pub fn custom_start_cap(&self) -> Option<CustomLineCap> {
        self.custom_start_cap.clone()
    }

    /// Store a copy of the cap
    pub fn set_custom_start_cap(&mut self, cap: &CustomLineCap) {
        self.custom_start_cap = Some(cap.clone());
        self.touch();
    }

    pub fn custom_end_cap(&self) -> Option<CustomLineCap> {
        self.custom_end_cap.clone()
    }

    pub fn set_custom_end_cap(&mut self, cap: &CustomLineCap) {
        self.custom_end_cap = Some(cap.clone());
        self.touch();
    }

    pub fn has_custom_caps(&self) -> bool {
        self.custom_start_cap.is_some() || self.custom_end_cap.is_some()
    }

    /// Draw custom start cap at `end`, no-op when the pen has none
    pub fn draw_custom_start_cap(
        &self,
        canvas: &mut dyn Canvas,
        end: Point,
        other_end: Point,
    ) -> Result<(), Status> {
        match &self.custom_start_cap {
            Some(cap) => cap.draw(canvas, self, end, other_end),
            None => Ok(()),
        }
    }

    /// Draw custom end cap at `end`, no-op when the pen has none
    pub fn draw_custom_end_cap(
        &self,
        canvas: &mut dyn Canvas,
        end: Point,
        other_end: Point,
    ) -> Result<(), Status> {
        match &self.custom_end_cap {
            Some(cap) => cap.draw(canvas, self, end, other_end),
            None => Ok(()),
        }
    }

    /// Configure canvas of the graphics to stroke with this pen.
    ///
    /// Brush and matrix are always pushed, the rest of the stroke state is skipped
    /// when this pen was the last one set up on the graphics and has not changed since.
    pub fn setup<C: Canvas>(&self, graphics: &mut Graphics<C>) -> Result<(), Status> {
        self.brush.setup(graphics.canvas_mut())?;

        let mut product = graphics.transform().matmul(self.matrix);
        let (sx, sy) = product.scale_factors();
        if near_zero(sx) || near_zero(sy) {
            // LAMESPEC: GDI+ accepts zero pen scale, the backend does not
            product.set_scale_factors(DEGENERATE_SCALE, DEGENERATE_SCALE);
        }
        graphics.canvas_mut().set_matrix(product);

        let key = self.cache_key();
        if graphics.last_pen() == Some(key) {
            tracing::trace!(stamp = key.stamp, version = key.version, "[pen] cache hit");
            return graphics.canvas().status();
        }
        let canvas = graphics.canvas_mut();

        // thin pens are drawn one device unit wide
        let width = if self.width < 1.0 {
            canvas.device_to_user_distance(Point::new(1.0, 0.0)).length()
        } else {
            self.width
        };
        canvas.set_line_width(width);
        canvas.set_miter_limit(self.miter_limit);
        canvas.set_line_join(map_line_join(self.line_join));

        let dash_count = self.dashes.len();
        let cap = if self.line_cap == LineCap::Flat {
            if dash_count > 0 || self.width > 1.0 {
                StrokeCap::Butt
            } else {
                StrokeCap::Square
            }
        } else {
            map_line_cap(self.line_cap)
        };
        canvas.set_line_cap(cap);

        if dash_count > 0 {
            let dashes: Vec<Scalar> = self.dashes.as_slice().iter().map(|d| d * width).collect();
            canvas.set_dash(&dashes, self.dash_offset);
        } else {
            canvas.set_dash(&[], 0.0);
        }
        tracing::debug!(
            stamp = key.stamp,
            version = key.version,
            width,
            ?cap,
            dash_count,
            "[pen] backend resync"
        );

        graphics.set_last_pen(Some(key));
        graphics.canvas().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_approx_eq, AdjustableArrowCap, BrushType, CanvasOp, HatchFill, RecordingCanvas,
        StrokeJoin,
    };
    use std::ptr;

    fn count_widths(graphics: &Graphics<RecordingCanvas>) -> usize {
        graphics
            .canvas()
            .count_ops(|op| matches!(op, CanvasOp::SetLineWidth(_)))
    }

    #[test]
    fn test_defaults() {
        let pen = Pen::new(Argb(0xff112233), 10.0, Unit::World);
        assert_eq!(pen.color(), Argb(0xff112233));
        assert_eq!(pen.fill_type(), PenType::SolidColor);
        assert_eq!(pen.width(), 10.0);
        assert_eq!(pen.miter_limit(), 10.0);
        assert_eq!(pen.line_join(), LineJoin::Miter);
        assert_eq!(pen.start_cap(), LineCap::Flat);
        assert_eq!(pen.end_cap(), LineCap::Flat);
        assert_eq!(pen.dash_cap(), DashCap::Flat);
        assert_eq!(pen.dash_style(), DashStyle::Solid);
        assert_eq!(pen.dash_count(), 0);
        assert_eq!(pen.mode(), PenAlignment::Center);
        assert_eq!(pen.unit(), Unit::World);
        assert!(pen.transform().is_identity());
        assert_eq!(pen.version(), 0);
        assert!(!pen.has_custom_caps());
    }

    #[test]
    fn test_brush() {
        let hatch = HatchFill::new(3, Argb(0xffff0000), Argb(0xff00ff00));
        let mut pen = Pen::with_brush(&hatch, 2.0, Unit::Pixel);
        assert_eq!(pen.fill_type(), PenType::HatchFill);
        assert_eq!(pen.color(), Argb(0));

        // non solid brush keeps its colors, only the cached value changes
        pen.set_color(Argb(0xff0000ff));
        assert_eq!(pen.color(), Argb(0xff0000ff));
        assert_eq!(pen.brush().solid_color(), None);

        pen.set_brush_fill(&SolidFill::new(Argb(0xff445566)));
        assert_eq!(pen.color(), Argb(0xff445566));
        assert_eq!(pen.brush_fill().brush_type(), BrushType::SolidColor);

        // solid brush follows pen color
        pen.set_color(Argb(0x80101010));
        assert_eq!(pen.brush().solid_color(), Some(Argb(0x80101010)));

        pen.set_brush_fill(&hatch);
        assert_eq!(pen.color(), Argb(0));
        assert_eq!(pen.unit(), Unit::Pixel);
    }

    #[test]
    fn test_field_policies() {
        let mut pen = Pen::new(Argb::BLACK, 1.0, Unit::World);
        pen.set_miter_limit(0.25);
        assert_eq!(pen.miter_limit(), 1.0);
        pen.set_miter_limit(4.0);
        assert_eq!(pen.miter_limit(), 4.0);

        pen.set_dash_cap(DashCap::Round);
        assert_eq!(pen.dash_cap(), DashCap::Round);
        pen.set_dash_cap(DashCap(1));
        assert_eq!(pen.dash_cap(), DashCap::Flat);
        pen.set_dash_cap(DashCap(4));
        assert_eq!(pen.dash_cap(), DashCap::Flat);

        // joins, caps and modes are stored as is
        pen.set_line_join(LineJoin(42));
        assert_eq!(pen.line_join(), LineJoin(42));
        pen.set_mode(PenAlignment(7));
        assert_eq!(pen.mode(), PenAlignment(7));
        pen.set_line_cap(LineCap::Round, LineCap(99), DashCap::Triangle);
        assert_eq!(pen.start_cap(), LineCap::Round);
        assert_eq!(pen.end_cap(), LineCap(99));
        assert_eq!(pen.dash_cap(), DashCap::Triangle);
        pen.set_unit(Unit::Millimeter);
        assert_eq!(pen.unit(), Unit::Millimeter);
    }

    #[test]
    fn test_dash_style() {
        let mut pen = Pen::new(Argb::BLACK, 1.0, Unit::World);
        pen.set_dash_style(DashStyle::DashDotDot).unwrap();
        assert_eq!(pen.dash_count(), 6);
        let mut out = [0.0; 6];
        pen.get_dash_array(&mut out).unwrap();
        assert_eq!(out, [3.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(!pen.dashes().is_owned());

        pen.set_dash_style(DashStyle::Solid).unwrap();
        assert_eq!(pen.dash_count(), 0);
        assert_eq!(pen.dashes(), &Dashes::None);

        pen.set_dash_style(DashStyle::Dot).unwrap();
        assert_eq!(pen.dash_array(), &[1.0, 1.0]);
        pen.set_dash_style(DashStyle::Dash).unwrap();
        assert_eq!(pen.dash_array(), &[3.0, 1.0]);
        pen.set_dash_style(DashStyle::DashDot).unwrap();
        assert_eq!(pen.dash_count(), 4);

        // custom keeps current pattern
        pen.set_dash_style(DashStyle::Custom).unwrap();
        assert_eq!(pen.dash_count(), 4);
        assert_eq!(pen.dash_style(), DashStyle::Custom);

        assert_eq!(pen.set_dash_style(DashStyle(6)), Err(Status::GenericError));
        assert_eq!(pen.set_dash_style(DashStyle(-1)), Err(Status::GenericError));
        assert_eq!(pen.dash_style(), DashStyle::Custom);
        assert_eq!(pen.dash_count(), 4);
    }

    #[test]
    fn test_dash_array() {
        let mut pen = Pen::new(Argb::BLACK, 1.0, Unit::World);
        assert_eq!(pen.set_dash_array(&[]), Err(Status::InvalidParameter));

        let mut source = vec![2.0, 0.5, 1.0];
        pen.set_dash_array(&source).unwrap();
        source[0] = 100.0;
        assert_eq!(pen.dash_array(), &[2.0, 0.5, 1.0]);
        assert_eq!(pen.dash_style(), DashStyle::Custom);
        assert!(pen.dashes().is_owned());

        assert_eq!(pen.get_dash_array(&mut [0.0; 0]), Err(Status::OutOfMemory));
        assert_eq!(
            pen.get_dash_array(&mut [0.0; 2]),
            Err(Status::InvalidParameter)
        );
        let mut out = [0.0; 3];
        pen.get_dash_array(&mut out).unwrap();
        assert_eq!(out, [2.0, 0.5, 1.0]);
    }

    #[test]
    fn test_compound_array() {
        let mut pen = Pen::new(Argb::BLACK, 1.0, Unit::World);
        assert_eq!(pen.set_compound_array(&[]), Err(Status::InvalidParameter));
        // order and range are not validated
        pen.set_compound_array(&[0.0, 0.75, 0.25, 2.0]).unwrap();
        assert_eq!(pen.compound_count(), 4);
        let mut out = [0.0; 2];
        pen.get_compound_array(&mut out).unwrap();
        assert_eq!(out, [0.0, 0.75]);
        assert_eq!(
            pen.get_compound_array(&mut [0.0; 5]),
            Err(Status::InvalidParameter)
        );
    }

    #[test]
    fn test_transform() {
        let mut pen = Pen::new(Argb::BLACK, 1.0, Unit::World);
        assert_eq!(
            pen.set_transform(Matrix::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0)),
            Err(Status::InvalidParameter)
        );
        assert_eq!(
            pen.multiply_transform(Matrix::new_scale(0.0, 0.0), MatrixOrder::Append),
            Err(Status::InvalidParameter)
        );
        assert!(pen.transform().is_identity());

        pen.scale_transform(2.0, 3.0, MatrixOrder::Prepend);
        pen.translate_transform(1.0, 1.0, MatrixOrder::Append);
        let p = pen.transform().apply(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(3.0, 4.0));

        pen.rotate_transform(90.0, MatrixOrder::Prepend);
        pen.reset_transform();
        assert!(pen.transform().is_identity());
        pen.multiply_transform(Matrix::new_translate(5.0, 0.0), MatrixOrder::Prepend)
            .unwrap();
        assert_eq!(pen.transform().offset(), Point::new(5.0, 0.0));
    }

    #[test]
    fn test_clone_independence() {
        let mut pen = Pen::new(Argb::BLACK, 3.0, Unit::World);
        pen.set_dash_style(DashStyle::Dash).unwrap();
        pen.set_compound_array(&[0.0, 1.0]).unwrap();
        let cap = AdjustableArrowCap::new(2.0, 2.0, true);
        pen.set_custom_start_cap(&cap);

        let mut copy = pen.clone();
        assert_ne!(copy.stamp(), pen.stamp());
        match (pen.dashes(), copy.dashes()) {
            (Dashes::Shared(a), Dashes::Shared(b)) => assert!(ptr::eq(*a, *b)),
            dashes => panic!("canonical pattern is not shared: {:?}", dashes),
        }

        copy.set_dash_array(&[5.0, 5.0]).unwrap();
        copy.set_compound_array(&[0.5]).unwrap();
        copy.set_width(8.0);
        copy.scale_transform(2.0, 2.0, MatrixOrder::Prepend);
        copy.set_custom_start_cap(&AdjustableArrowCap::new(1.0, 1.0, false));

        assert_eq!(pen.dash_array(), &[3.0, 1.0]);
        assert_eq!(dash_pattern(DashStyle::Dash), Some(&[3.0, 1.0][..]));
        assert_eq!(pen.compound_array(), &[0.0, 1.0]);
        assert_eq!(pen.width(), 3.0);
        assert!(pen.transform().is_identity());
        let start = pen.custom_start_cap().unwrap();
        assert!(start.fill_path().is_some());

        drop(pen);
        assert_eq!(copy.dash_array(), &[5.0, 5.0]);
    }

    #[test]
    fn test_setup() -> Result<(), Status> {
        let mut graphics = Graphics::new(RecordingCanvas::new());
        let mut pen = Pen::new(Argb(0xff112233), 10.0, Unit::World);
        pen.set_line_join(LineJoin::Round);
        pen.set_miter_limit(3.0);
        pen.setup(&mut graphics)?;

        let canvas = graphics.canvas();
        let style = canvas.style();
        assert_eq!(style.width, 10.0);
        assert_eq!(style.miter_limit, 3.0);
        assert_eq!(style.line_join, StrokeJoin::Round);
        // wide flat pen is butt
        assert_eq!(style.line_cap, StrokeCap::Butt);
        assert!(style.dash.is_empty());
        assert_eq!(canvas.color(), Argb(0xff112233));
        assert_eq!(graphics.last_pen(), Some(pen.cache_key()));
        assert_eq!(pen.cache_key().stamp, pen.stamp());
        Ok(())
    }

    #[test]
    fn test_setup_cache() -> Result<(), Status> {
        let mut graphics = Graphics::new(RecordingCanvas::new());
        let mut pen = Pen::new(Argb::BLACK, 2.0, Unit::World);
        pen.setup(&mut graphics)?;
        pen.setup(&mut graphics)?;
        assert_eq!(count_widths(&graphics), 1);

        pen.set_width(4.0);
        pen.setup(&mut graphics)?;
        assert_eq!(count_widths(&graphics), 2);

        // structurally equal copy still resyncs
        let copy = pen.clone();
        copy.setup(&mut graphics)?;
        assert_eq!(count_widths(&graphics), 3);

        // switching back to the first pen resyncs too
        pen.setup(&mut graphics)?;
        assert_eq!(count_widths(&graphics), 4);
        Ok(())
    }

    #[test]
    fn test_setup_cache_per_graphics() -> Result<(), Status> {
        let mut first = Graphics::new(RecordingCanvas::new());
        let mut second = Graphics::new(RecordingCanvas::new());
        let mut pen = Pen::new(Argb::BLACK, 2.0, Unit::World);
        pen.setup(&mut first)?;
        pen.set_width(7.0);
        pen.setup(&mut second)?;
        assert_eq!(second.canvas().style().width, 7.0);

        // setup on another graphics must not hide the change from the first one
        pen.setup(&mut first)?;
        assert_eq!(first.canvas().style().width, 7.0);
        assert_eq!(count_widths(&first), 2);
        assert_eq!(first.last_pen(), second.last_pen());

        pen.setup(&mut first)?;
        pen.setup(&mut second)?;
        assert_eq!(count_widths(&first), 2);
        assert_eq!(count_widths(&second), 1);
        Ok(())
    }

    #[test]
    fn test_setup_backend_error() {
        let mut graphics = Graphics::new(RecordingCanvas::new());
        let mut pen = Pen::new(Argb::BLACK, 2.0, Unit::World);
        pen.set_dash_array(&[-1.0, 2.0]).unwrap();
        assert_eq!(pen.setup(&mut graphics), Err(Status::InvalidParameter));

        let mut graphics = Graphics::new(RecordingCanvas::new());
        assert_eq!(
            graphics.draw_line(&pen, Point::new(0.0, 0.0), Point::new(5.0, 0.0)),
            Err(Status::InvalidParameter)
        );
    }

    #[test]
    fn test_setup_caps() -> Result<(), Status> {
        let cases = [
            (LineCap::Flat, 1.0, false, StrokeCap::Square),
            (LineCap::Flat, 1.0, true, StrokeCap::Butt),
            (LineCap::Flat, 1.5, false, StrokeCap::Butt),
            (LineCap::Square, 1.0, false, StrokeCap::Square),
            (LineCap::SquareAnchor, 1.0, false, StrokeCap::Square),
            (LineCap::Round, 1.0, false, StrokeCap::Round),
            (LineCap::RoundAnchor, 5.0, true, StrokeCap::Round),
            (LineCap::Triangle, 1.0, false, StrokeCap::Butt),
            (LineCap::ArrowAnchor, 1.0, false, StrokeCap::Butt),
            (LineCap(1234), 1.0, false, StrokeCap::Butt),
        ];
        for (line_cap, width, dashed, expected) in cases {
            let mut graphics = Graphics::new(RecordingCanvas::new());
            let mut pen = Pen::new(Argb::BLACK, width, Unit::World);
            pen.set_start_cap(line_cap);
            if dashed {
                pen.set_dash_style(DashStyle::Dot)?;
            }
            pen.setup(&mut graphics)?;
            assert_eq!(
                graphics.canvas().style().line_cap,
                expected,
                "cap {:?} width {} dashed {}",
                line_cap,
                width,
                dashed
            );
        }
        Ok(())
    }

    #[test]
    fn test_setup_flat_cap_uses_pen_width() -> Result<(), Status> {
        let mut graphics = Graphics::new(RecordingCanvas::new());
        graphics.set_transform(Matrix::new_scale(0.25, 0.25))?;
        let pen = Pen::new(Argb::BLACK, 0.5, Unit::World);
        pen.setup(&mut graphics)?;
        let style = graphics.canvas().style();
        // thin pen is widened to one device unit, its cap follows the pen width
        assert_approx_eq!(style.width, 4.0);
        assert_eq!(style.line_cap, StrokeCap::Square);
        Ok(())
    }

    #[test]
    fn test_setup_thin_pen() -> Result<(), Status> {
        let mut graphics = Graphics::new(RecordingCanvas::new());
        graphics.set_transform(Matrix::new_scale(4.0, 4.0))?;
        let mut pen = Pen::new(Argb::BLACK, 0.0, Unit::World);
        pen.set_dash_style(DashStyle::DashDot)?;
        pen.set_dash_offset(0.5);
        pen.setup(&mut graphics)?;
        let style = graphics.canvas().style();
        // one device unit in user space
        assert_approx_eq!(style.width, 0.25);
        assert_eq!(style.dash, vec![0.75, 0.25, 0.25, 0.25]);
        assert_eq!(style.dash_offset, 0.5);
        assert_eq!(style.line_cap, StrokeCap::Butt);
        Ok(())
    }

    #[test]
    fn test_setup_matrix() -> Result<(), Status> {
        let mut graphics = Graphics::new(RecordingCanvas::new());
        graphics.set_transform(Matrix::new_translate(10.0, 0.0))?;
        let mut pen = Pen::new(Argb::BLACK, 1.0, Unit::World);
        pen.scale_transform(2.0, 1.0, MatrixOrder::Prepend);
        pen.setup(&mut graphics)?;
        // pen transform is applied first
        let p = graphics.canvas().matrix().apply(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(12.0, 1.0));
        Ok(())
    }

    #[test]
    fn test_setup_degenerate_scale() -> Result<(), Status> {
        let mut graphics = Graphics::new(RecordingCanvas::new());
        let mut pen = Pen::new(Argb::BLACK, 1.0, Unit::World);
        // invertible but both scale coefficients are zero
        pen.set_transform(Matrix::new_rotate(90.0))?;
        pen.setup(&mut graphics)?;
        let (sx, sy) = graphics.canvas().matrix().scale_factors();
        assert_eq!(sx, DEGENERATE_SCALE);
        assert_eq!(sy, DEGENERATE_SCALE);

        // only one axis collapsed, both are replaced
        pen.set_transform(Matrix::new(0.0, 1.0, 1.0, 1.0, 0.0, 0.0))?;
        pen.setup(&mut graphics)?;
        let (sx, sy) = graphics.canvas().matrix().scale_factors();
        assert_eq!((sx, sy), (DEGENERATE_SCALE, DEGENERATE_SCALE));
        assert_eq!(graphics.canvas().status(), Ok(()));
        Ok(())
    }

    #[test]
    fn test_custom_caps_drawing() -> Result<(), Status> {
        let mut pen = Pen::new(Argb::BLACK, 4.0, Unit::World);
        let mut canvas = RecordingCanvas::new();
        // missing caps are a no-op
        pen.draw_custom_start_cap(&mut canvas, Point::new(0.0, 0.0), Point::new(1.0, 0.0))?;
        assert!(canvas.ops().is_empty());

        let arrow = AdjustableArrowCap::new(2.0, 2.0, true);
        pen.set_custom_end_cap(&arrow);
        assert!(pen.has_custom_caps());
        pen.draw_custom_start_cap(&mut canvas, Point::new(0.0, 0.0), Point::new(1.0, 0.0))?;
        assert!(canvas.ops().is_empty());
        pen.draw_custom_end_cap(&mut canvas, Point::new(10.0, 0.0), Point::new(0.0, 0.0))?;
        assert_eq!(
            canvas.count_ops(|op| matches!(op, CanvasOp::Fill { .. })),
            1
        );

        let mut graphics = Graphics::new(RecordingCanvas::new());
        graphics.draw_line(&pen, Point::new(0.0, 0.0), Point::new(10.0, 0.0))?;
        assert_eq!(graphics.last_pen(), None);
        Ok(())
    }
}
