//! Interface of the 2D rendering backend and a recording implementation of it
use crate::{Argb, FillMode, Matrix, Path, Point, Scalar, Status};
use std::fmt;

/// Join kinds supported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

/// Cap kinds supported by the backend, a single kind is used for both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StrokeCap {
    #[default]
    Butt,
    Square,
    Round,
}

/// Complete stroke state of the backend
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: Scalar,
    pub miter_limit: Scalar,
    pub line_join: StrokeJoin,
    pub line_cap: StrokeCap,
    pub dash: Vec<Scalar>,
    pub dash_offset: Scalar,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            miter_limit: 10.0,
            line_join: StrokeJoin::Miter,
            line_cap: StrokeCap::Butt,
            dash: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

/// Low level 2D drawing context the GDI+ objects are mapped onto.
///
/// All coordinates passed to `stroke_path` and `fill_path` are in user space,
/// the current matrix maps them to device space. Stroke parameters are in user
/// space too. Errors are sticky and reported by `status`.
pub trait Canvas: fmt::Debug {
    /// Current user to device transformation
    fn matrix(&self) -> Matrix;

    fn set_matrix(&mut self, matrix: Matrix);

    fn set_line_width(&mut self, width: Scalar);

    fn set_miter_limit(&mut self, limit: Scalar);

    fn set_line_join(&mut self, join: StrokeJoin);

    fn set_line_cap(&mut self, cap: StrokeCap);

    /// Set dash pattern, empty pattern disables dashing
    fn set_dash(&mut self, dash: &[Scalar], offset: Scalar);

    fn set_source_color(&mut self, color: Argb);

    /// Stroke path with the current stroke state
    fn stroke_path(&mut self, path: &Path);

    /// Fill path with the current source
    fn fill_path(&mut self, path: &Path, fill_mode: FillMode);

    /// Current error state of the canvas
    fn status(&self) -> Result<(), Status>;

    /// Convert a distance in device space into user space
    fn device_to_user_distance(&self, distance: Point) -> Point {
        self.matrix()
            .device_to_user_distance(distance)
            .unwrap_or(distance)
    }
}

/// Operation executed on a [`RecordingCanvas`]
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    SetMatrix(Matrix),
    SetLineWidth(Scalar),
    SetMiterLimit(Scalar),
    SetLineJoin(StrokeJoin),
    SetLineCap(StrokeCap),
    SetDash(Vec<Scalar>, Scalar),
    SetSourceColor(Argb),
    Stroke {
        path: Path,
        matrix: Matrix,
        style: StrokeStyle,
        color: Argb,
    },
    Fill {
        path: Path,
        matrix: Matrix,
        fill_mode: FillMode,
        color: Argb,
    },
}

/// Canvas which does not produce pixels but records every operation.
///
/// It also validates its state the way a real rasterizer would: a singular matrix
/// or a negative line width put it into an error state.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    matrix: Matrix,
    style: StrokeStyle,
    color: Argb,
    ops: Vec<CanvasOp>,
    error: Option<Status>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Forget recorded operations, state is preserved
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Current stroke state
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn color(&self) -> Argb {
        self.color
    }

    /// Count recorded operations matching predicate
    pub fn count_ops(&self, pred: impl Fn(&CanvasOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    fn fail(&mut self, status: Status) {
        self.error.get_or_insert(status);
    }
}

impl Canvas for RecordingCanvas {
    fn matrix(&self) -> Matrix {
        self.matrix
    }

    fn set_matrix(&mut self, matrix: Matrix) {
        if !matrix.is_invertible() {
            self.fail(Status::InvalidParameter);
        }
        self.matrix = matrix;
        self.ops.push(CanvasOp::SetMatrix(matrix));
    }

    fn set_line_width(&mut self, width: Scalar) {
        if width < 0.0 {
            self.fail(Status::InvalidParameter);
        }
        self.style.width = width;
        self.ops.push(CanvasOp::SetLineWidth(width));
    }

    fn set_miter_limit(&mut self, limit: Scalar) {
        self.style.miter_limit = limit;
        self.ops.push(CanvasOp::SetMiterLimit(limit));
    }

    fn set_line_join(&mut self, join: StrokeJoin) {
        self.style.line_join = join;
        self.ops.push(CanvasOp::SetLineJoin(join));
    }

    fn set_line_cap(&mut self, cap: StrokeCap) {
        self.style.line_cap = cap;
        self.ops.push(CanvasOp::SetLineCap(cap));
    }

    fn set_dash(&mut self, dash: &[Scalar], offset: Scalar) {
        if dash.iter().any(|d| *d < 0.0) {
            self.fail(Status::InvalidParameter);
        }
        self.style.dash = dash.to_vec();
        self.style.dash_offset = offset;
        self.ops.push(CanvasOp::SetDash(dash.to_vec(), offset));
    }

    fn set_source_color(&mut self, color: Argb) {
        self.color = color;
        self.ops.push(CanvasOp::SetSourceColor(color));
    }

    fn stroke_path(&mut self, path: &Path) {
        self.ops.push(CanvasOp::Stroke {
            path: path.clone(),
            matrix: self.matrix,
            style: self.style.clone(),
            color: self.color,
        });
    }

    fn fill_path(&mut self, path: &Path, fill_mode: FillMode) {
        self.ops.push(CanvasOp::Fill {
            path: path.clone(),
            matrix: self.matrix,
            fill_mode,
            color: self.color,
        });
    }

    fn status(&self) -> Result<(), Status> {
        match self.error {
            None => Ok(()),
            Some(status) => Err(status),
        }
    }
}
