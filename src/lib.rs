//! GDI+ compatible pens, custom line caps and regions on top of a 2D canvas.
//!
//! Main features:
//!  - Pens with lazy backend synchronisation of width, joins, caps and dashes
//!  - Custom and adjustable arrow line caps
//!  - Region path trees with the GDI+ binary blob format
//!  - Flat API mirroring `Gdip*` entry points with status codes
//!
#![deny(warnings)]

mod brush;
mod canvas;
mod color;
mod enums;
pub mod flat;
mod geometry;
mod graphics;
mod linecap;
pub mod metafile;
mod path;
mod path_tree;
mod pen;
mod region;
mod status;
mod utils;

pub use brush::{Brush, HatchFill, SolidFill};
pub use canvas::{Canvas, CanvasOp, RecordingCanvas, StrokeCap, StrokeJoin, StrokeStyle};
pub use color::Argb;
pub use enums::{
    point_type, BrushType, CombineMode, CustomLineCapType, DashCap, DashStyle, FillMode, LineCap,
    LineJoin, MatrixOrder, PenAlignment, PenType, Unit,
};
pub use geometry::{near_zero, scalar_fmt, Matrix, Point, RectF, Scalar, EPSILON, NEAR_ZERO};
pub use graphics::Graphics;
pub use linecap::{
    cap_angle, AdjustableArrowCap, ArrowShape, CapDecoration, CustomLineCap, PathCap,
};
pub use metafile::{MetafileRecord, MetafileRecorder, PenInfo, RecordedMetafile};
pub use path::Path;
pub use path_tree::{Leaves, PathTree, REGION_TAG_PATH, REGION_TAG_TREE};
pub use pen::{dash_pattern, Dashes, Pen, PenKey};
pub use region::{Region, INFINITE_RECT, REGION_KIND_INFINITE, REGION_KIND_PATH, REGION_KIND_RECT};
pub use status::Status;
