use crate::{
    metafile, Canvas, FillMode, Matrix, MatrixOrder, MetafileRecorder, Path, Pen, PenKey, Point,
    RectF, Status,
};

/// Drawing context: a canvas plus the state GDI+ keeps on top of it.
///
/// Besides the world transform it remembers which pen, at which version, was
/// configured on the canvas last, so drawing repeatedly with an unchanged pen
/// skips backend setup.
#[derive(Debug)]
pub struct Graphics<C> {
    canvas: C,
    transform: Matrix,
    last_pen: Option<PenKey>,
    metafile: Option<Box<dyn MetafileRecorder>>,
}

impl<C: Canvas> Graphics<C> {
    pub fn new(canvas: C) -> Self {
        let transform = canvas.matrix();
        Self {
            canvas,
            transform,
            last_pen: None,
            metafile: None,
        }
    }

    /// Graphics that forwards draw calls to the metafile recorder instead of the canvas
    pub fn with_metafile(canvas: C, recorder: Box<dyn MetafileRecorder>) -> Self {
        let mut graphics = Self::new(canvas);
        graphics.metafile = Some(recorder);
        graphics
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    pub fn metafile(&self) -> Option<&dyn MetafileRecorder> {
        self.metafile.as_deref()
    }

    /// World transform
    pub fn transform(&self) -> Matrix {
        self.transform
    }

    pub fn set_transform(&mut self, matrix: Matrix) -> Result<(), Status> {
        if !matrix.is_invertible() {
            return Err(Status::InvalidParameter);
        }
        self.transform = matrix;
        self.canvas.set_matrix(matrix);
        Ok(())
    }

    pub fn reset_transform(&mut self) {
        self.transform = Matrix::identity();
        self.canvas.set_matrix(self.transform);
    }

    pub fn multiply_transform(&mut self, matrix: Matrix, order: MatrixOrder) -> Result<(), Status> {
        if !matrix.is_invertible() {
            return Err(Status::InvalidParameter);
        }
        self.set_transform(self.transform.multiply(matrix, order))
    }

    /// Key of the pen which was configured on the canvas last
    pub fn last_pen(&self) -> Option<PenKey> {
        self.last_pen
    }

    pub(crate) fn set_last_pen(&mut self, key: Option<PenKey>) {
        self.last_pen = key;
    }

    pub fn draw_line(&mut self, pen: &Pen, p1: Point, p2: Point) -> Result<(), Status> {
        if let Some(recorder) = self.metafile.as_deref_mut() {
            return metafile::record_draw_line(recorder, pen, p1, p2);
        }
        let mut path = Path::default();
        path.move_to(p1).line_to(p2);
        self.stroke_with_caps(pen, &path, Some((p1, p2, p2, p1)))
    }

    /// Draw connected lines, custom caps are placed at both ends of the polyline
    pub fn draw_lines(&mut self, pen: &Pen, points: &[Point]) -> Result<(), Status> {
        if points.len() < 2 {
            return Err(Status::InvalidParameter);
        }
        if let Some(recorder) = self.metafile.as_deref_mut() {
            return metafile::record_draw_lines(recorder, pen, points);
        }
        let mut path = Path::default();
        path.move_to(points[0]).add_lines(&points[1..]);
        let count = points.len();
        let ends = (points[0], points[1], points[count - 1], points[count - 2]);
        self.stroke_with_caps(pen, &path, Some(ends))
    }

    pub fn draw_rectangle(&mut self, pen: &Pen, rect: RectF) -> Result<(), Status> {
        if let Some(recorder) = self.metafile.as_deref_mut() {
            return metafile::record_draw_rectangles(recorder, pen, &[rect]);
        }
        self.stroke_with_caps(pen, &Path::rectangle(rect, FillMode::Alternate), None)
    }

    pub fn draw_path(&mut self, pen: &Pen, path: &Path) -> Result<(), Status> {
        if let Some(recorder) = self.metafile.as_deref_mut() {
            return metafile::record_draw_path(recorder, pen, path);
        }
        self.stroke_with_caps(pen, path, None)
    }

    /// Stroke path and draw custom caps at `(start, start_next, end, end_prev)`
    fn stroke_with_caps(
        &mut self,
        pen: &Pen,
        path: &Path,
        ends: Option<(Point, Point, Point, Point)>,
    ) -> Result<(), Status> {
        pen.setup(self)?;
        self.canvas.stroke_path(path);
        self.canvas.set_matrix(self.transform);
        if let Some((start, start_next, end, end_prev)) = ends {
            if pen.has_custom_caps() {
                pen.draw_custom_start_cap(&mut self.canvas, start, start_next)?;
                pen.draw_custom_end_cap(&mut self.canvas, end, end_prev)?;
                // caps reconfigure stroke state behind the pen's back
                self.last_pen = None;
            }
        }
        self.canvas.status()
    }
}
