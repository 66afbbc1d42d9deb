use crate::{Argb, BrushType, Canvas, Status};
use std::fmt;

/// Fill used by pens and fill operations.
///
/// Only the parts pens rely on are modelled: type, cloning, backend setup and
/// access to the color of solid brushes.
pub trait Brush: fmt::Debug {
    fn brush_type(&self) -> BrushType;

    /// Create an independent copy of the brush
    fn clone_brush(&self) -> Box<dyn Brush>;

    /// Configure canvas source so subsequent operations use this brush
    fn setup(&self, canvas: &mut dyn Canvas) -> Result<(), Status>;

    /// Color of the brush if it is a solid color brush
    fn solid_color(&self) -> Option<Argb> {
        None
    }

    /// Update color of a solid color brush, other brushes ignore it and return `false`
    fn set_solid_color(&mut self, _color: Argb) -> bool {
        false
    }
}

impl Clone for Box<dyn Brush> {
    fn clone(&self) -> Self {
        self.clone_brush()
    }
}

/// Single color brush (`GpSolidFill`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidFill {
    color: Argb,
}

impl SolidFill {
    pub fn new(color: Argb) -> Self {
        Self { color }
    }

    pub fn color(&self) -> Argb {
        self.color
    }

    pub fn set_color(&mut self, color: Argb) {
        self.color = color;
    }
}

impl Brush for SolidFill {
    fn brush_type(&self) -> BrushType {
        BrushType::SolidColor
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(*self)
    }

    fn setup(&self, canvas: &mut dyn Canvas) -> Result<(), Status> {
        canvas.set_source_color(self.color);
        canvas.status()
    }

    fn solid_color(&self) -> Option<Argb> {
        Some(self.color)
    }

    fn set_solid_color(&mut self, color: Argb) -> bool {
        self.color = color;
        true
    }
}

/// Two color pattern brush (`GpHatch`)
///
/// Pattern rasterization belongs to the backend, at setup the foreground color is
/// used as the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HatchFill {
    pub style: i32,
    pub fore: Argb,
    pub back: Argb,
}

impl HatchFill {
    pub fn new(style: i32, fore: Argb, back: Argb) -> Self {
        Self { style, fore, back }
    }
}

impl Brush for HatchFill {
    fn brush_type(&self) -> BrushType {
        BrushType::HatchFill
    }

    fn clone_brush(&self) -> Box<dyn Brush> {
        Box::new(*self)
    }

    fn setup(&self, canvas: &mut dyn Canvas) -> Result<(), Status> {
        canvas.set_source_color(self.fore);
        canvas.status()
    }
}
