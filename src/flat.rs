//! Flat GDI+ style entry points
//!
//! Every pointer argument of the GDI+ flat API is modelled as an `Option`, a missing
//! argument is reported as `InvalidParameter` before anything is modified. Out
//! parameters are only written on success.
use crate::{
    AdjustableArrowCap, Argb, Brush, CombineMode, CustomLineCap, CustomLineCapType, DashCap,
    DashStyle, LineCap, LineJoin, Matrix, MatrixOrder, Path, Pen, PenAlignment, PenType, RectF,
    Region, Scalar, Status, Unit,
};
use std::sync::Arc;

/// Unwrap required arguments or return `InvalidParameter`
macro_rules! required {
    ($($arg:ident),+ $(,)?) => {
        $(
            let Some($arg) = $arg else {
                return Status::InvalidParameter;
            };
        )+
    };
}

/// Store result of a fallible constructor in an out parameter
fn store<T>(out: &mut Option<T>, result: Result<T, Status>) -> Status {
    match result {
        Ok(value) => {
            *out = Some(value);
            Status::Ok
        }
        Err(status) => status,
    }
}

// Pen

pub fn gdip_create_pen1(
    color: Argb,
    width: Scalar,
    unit: Unit,
    pen: Option<&mut Option<Pen>>,
) -> Status {
    required!(pen);
    *pen = Some(Pen::new(color, width, unit));
    Status::Ok
}

pub fn gdip_create_pen2(
    brush: Option<&dyn Brush>,
    width: Scalar,
    unit: Unit,
    pen: Option<&mut Option<Pen>>,
) -> Status {
    required!(brush, pen);
    *pen = Some(Pen::with_brush(brush, width, unit));
    Status::Ok
}

pub fn gdip_clone_pen(pen: Option<&Pen>, cloned: Option<&mut Option<Pen>>) -> Status {
    required!(pen, cloned);
    *cloned = Some(pen.clone());
    Status::Ok
}

pub fn gdip_delete_pen(pen: Option<Pen>) -> Status {
    required!(pen);
    drop(pen);
    Status::Ok
}

pub fn gdip_set_pen_width(pen: Option<&mut Pen>, width: Scalar) -> Status {
    required!(pen);
    pen.set_width(width);
    Status::Ok
}

pub fn gdip_get_pen_width(pen: Option<&Pen>, width: Option<&mut Scalar>) -> Status {
    required!(pen, width);
    *width = pen.width();
    Status::Ok
}

pub fn gdip_set_pen_color(pen: Option<&mut Pen>, color: Argb) -> Status {
    required!(pen);
    pen.set_color(color);
    Status::Ok
}

pub fn gdip_get_pen_color(pen: Option<&Pen>, color: Option<&mut Argb>) -> Status {
    required!(pen, color);
    *color = pen.color();
    Status::Ok
}

pub fn gdip_set_pen_brush_fill(pen: Option<&mut Pen>, brush: Option<&dyn Brush>) -> Status {
    required!(pen, brush);
    pen.set_brush_fill(brush);
    Status::Ok
}

pub fn gdip_get_pen_brush_fill(
    pen: Option<&Pen>,
    brush: Option<&mut Option<Box<dyn Brush>>>,
) -> Status {
    required!(pen, brush);
    *brush = Some(pen.brush_fill());
    Status::Ok
}

pub fn gdip_get_pen_fill_type(pen: Option<&Pen>, kind: Option<&mut PenType>) -> Status {
    required!(pen, kind);
    *kind = pen.fill_type();
    Status::Ok
}

pub fn gdip_set_pen_miter_limit(pen: Option<&mut Pen>, limit: Scalar) -> Status {
    required!(pen);
    pen.set_miter_limit(limit);
    Status::Ok
}

pub fn gdip_get_pen_miter_limit(pen: Option<&Pen>, limit: Option<&mut Scalar>) -> Status {
    required!(pen, limit);
    *limit = pen.miter_limit();
    Status::Ok
}

pub fn gdip_set_pen_line_join(pen: Option<&mut Pen>, join: LineJoin) -> Status {
    required!(pen);
    pen.set_line_join(join);
    Status::Ok
}

pub fn gdip_get_pen_line_join(pen: Option<&Pen>, join: Option<&mut LineJoin>) -> Status {
    required!(pen, join);
    *join = pen.line_join();
    Status::Ok
}

pub fn gdip_set_pen_line_cap197819(
    pen: Option<&mut Pen>,
    start: LineCap,
    end: LineCap,
    dash: DashCap,
) -> Status {
    required!(pen);
    pen.set_line_cap(start, end, dash);
    Status::Ok
}

pub fn gdip_set_pen_start_cap(pen: Option<&mut Pen>, cap: LineCap) -> Status {
    required!(pen);
    pen.set_start_cap(cap);
    Status::Ok
}

pub fn gdip_get_pen_start_cap(pen: Option<&Pen>, cap: Option<&mut LineCap>) -> Status {
    required!(pen, cap);
    *cap = pen.start_cap();
    Status::Ok
}

pub fn gdip_set_pen_end_cap(pen: Option<&mut Pen>, cap: LineCap) -> Status {
    required!(pen);
    pen.set_end_cap(cap);
    Status::Ok
}

pub fn gdip_get_pen_end_cap(pen: Option<&Pen>, cap: Option<&mut LineCap>) -> Status {
    required!(pen, cap);
    *cap = pen.end_cap();
    Status::Ok
}

pub fn gdip_set_pen_dash_cap197819(pen: Option<&mut Pen>, cap: DashCap) -> Status {
    required!(pen);
    pen.set_dash_cap(cap);
    Status::Ok
}

pub fn gdip_get_pen_dash_cap197819(pen: Option<&Pen>, cap: Option<&mut DashCap>) -> Status {
    required!(pen, cap);
    *cap = pen.dash_cap();
    Status::Ok
}

pub fn gdip_set_pen_mode(pen: Option<&mut Pen>, mode: PenAlignment) -> Status {
    required!(pen);
    pen.set_mode(mode);
    Status::Ok
}

pub fn gdip_get_pen_mode(pen: Option<&Pen>, mode: Option<&mut PenAlignment>) -> Status {
    required!(pen, mode);
    *mode = pen.mode();
    Status::Ok
}

pub fn gdip_set_pen_unit(pen: Option<&mut Pen>, unit: Unit) -> Status {
    required!(pen);
    pen.set_unit(unit);
    Status::Ok
}

pub fn gdip_get_pen_unit(pen: Option<&Pen>, unit: Option<&mut Unit>) -> Status {
    required!(pen, unit);
    *unit = pen.unit();
    Status::Ok
}

pub fn gdip_set_pen_transform(pen: Option<&mut Pen>, matrix: Option<&Matrix>) -> Status {
    required!(pen, matrix);
    pen.set_transform(*matrix).into()
}

pub fn gdip_get_pen_transform(pen: Option<&Pen>, matrix: Option<&mut Matrix>) -> Status {
    required!(pen, matrix);
    *matrix = pen.transform();
    Status::Ok
}

pub fn gdip_reset_pen_transform(pen: Option<&mut Pen>) -> Status {
    required!(pen);
    pen.reset_transform();
    Status::Ok
}

pub fn gdip_multiply_pen_transform(
    pen: Option<&mut Pen>,
    matrix: Option<&Matrix>,
    order: MatrixOrder,
) -> Status {
    required!(pen, matrix);
    pen.multiply_transform(*matrix, order).into()
}

pub fn gdip_translate_pen_transform(
    pen: Option<&mut Pen>,
    dx: Scalar,
    dy: Scalar,
    order: MatrixOrder,
) -> Status {
    required!(pen);
    pen.translate_transform(dx, dy, order);
    Status::Ok
}

pub fn gdip_scale_pen_transform(
    pen: Option<&mut Pen>,
    sx: Scalar,
    sy: Scalar,
    order: MatrixOrder,
) -> Status {
    required!(pen);
    pen.scale_transform(sx, sy, order);
    Status::Ok
}

pub fn gdip_rotate_pen_transform(pen: Option<&mut Pen>, angle: Scalar, order: MatrixOrder) -> Status {
    required!(pen);
    pen.rotate_transform(angle, order);
    Status::Ok
}

pub fn gdip_set_pen_dash_style(pen: Option<&mut Pen>, style: DashStyle) -> Status {
    required!(pen);
    pen.set_dash_style(style).into()
}

pub fn gdip_get_pen_dash_style(pen: Option<&Pen>, style: Option<&mut DashStyle>) -> Status {
    required!(pen, style);
    *style = pen.dash_style();
    Status::Ok
}

pub fn gdip_set_pen_dash_offset(pen: Option<&mut Pen>, offset: Scalar) -> Status {
    required!(pen);
    pen.set_dash_offset(offset);
    Status::Ok
}

pub fn gdip_get_pen_dash_offset(pen: Option<&Pen>, offset: Option<&mut Scalar>) -> Status {
    required!(pen, offset);
    *offset = pen.dash_offset();
    Status::Ok
}

pub fn gdip_get_pen_dash_count(pen: Option<&Pen>, count: Option<&mut usize>) -> Status {
    required!(pen, count);
    *count = pen.dash_count();
    Status::Ok
}

pub fn gdip_set_pen_dash_array(pen: Option<&mut Pen>, dashes: Option<&[Scalar]>) -> Status {
    required!(pen, dashes);
    pen.set_dash_array(dashes).into()
}

pub fn gdip_get_pen_dash_array(pen: Option<&Pen>, dashes: Option<&mut [Scalar]>) -> Status {
    required!(pen, dashes);
    pen.get_dash_array(dashes).into()
}

pub fn gdip_get_pen_compound_count(pen: Option<&Pen>, count: Option<&mut usize>) -> Status {
    required!(pen, count);
    *count = pen.compound_count();
    Status::Ok
}

pub fn gdip_set_pen_compound_array(pen: Option<&mut Pen>, compound: Option<&[Scalar]>) -> Status {
    required!(pen, compound);
    pen.set_compound_array(compound).into()
}

pub fn gdip_get_pen_compound_array(pen: Option<&Pen>, compound: Option<&mut [Scalar]>) -> Status {
    required!(pen, compound);
    pen.get_compound_array(compound).into()
}

pub fn gdip_set_pen_custom_start_cap(pen: Option<&mut Pen>, cap: Option<&CustomLineCap>) -> Status {
    required!(pen, cap);
    pen.set_custom_start_cap(cap);
    Status::Ok
}

/// Copy of the custom start cap, `None` is stored when the pen has no custom cap
pub fn gdip_get_pen_custom_start_cap(
    pen: Option<&Pen>,
    cap: Option<&mut Option<CustomLineCap>>,
) -> Status {
    required!(pen, cap);
    *cap = pen.custom_start_cap();
    Status::Ok
}

pub fn gdip_set_pen_custom_end_cap(pen: Option<&mut Pen>, cap: Option<&CustomLineCap>) -> Status {
    required!(pen, cap);
    pen.set_custom_end_cap(cap);
    Status::Ok
}

pub fn gdip_get_pen_custom_end_cap(
    pen: Option<&Pen>,
    cap: Option<&mut Option<CustomLineCap>>,
) -> Status {
    required!(pen, cap);
    *cap = pen.custom_end_cap();
    Status::Ok
}

// Custom line cap

pub fn gdip_create_custom_line_cap(
    fill_path: Option<&Arc<Path>>,
    stroke_path: Option<&Arc<Path>>,
    base_cap: LineCap,
    base_inset: Scalar,
    cap: Option<&mut Option<CustomLineCap>>,
) -> Status {
    required!(fill_path, stroke_path, cap);
    *cap = Some(CustomLineCap::new(
        fill_path.clone(),
        stroke_path.clone(),
        base_cap,
        base_inset,
    ));
    Status::Ok
}

pub fn gdip_delete_custom_line_cap(cap: Option<CustomLineCap>) -> Status {
    required!(cap);
    drop(cap);
    Status::Ok
}

pub fn gdip_clone_custom_line_cap(
    cap: Option<&CustomLineCap>,
    cloned: Option<&mut Option<CustomLineCap>>,
) -> Status {
    required!(cap, cloned);
    *cloned = Some(cap.clone());
    Status::Ok
}

pub fn gdip_get_custom_line_cap_type(
    cap: Option<&CustomLineCap>,
    kind: Option<&mut CustomLineCapType>,
) -> Status {
    required!(cap, kind);
    *kind = cap.cap_type();
    Status::Ok
}

pub fn gdip_set_custom_line_cap_stroke_caps(
    cap: Option<&mut CustomLineCap>,
    start: LineCap,
    end: LineCap,
) -> Status {
    required!(cap);
    cap.set_stroke_caps(start, end);
    Status::Ok
}

pub fn gdip_get_custom_line_cap_stroke_caps(
    cap: Option<&CustomLineCap>,
    start: Option<&mut LineCap>,
    end: Option<&mut LineCap>,
) -> Status {
    required!(cap, start, end);
    (*start, *end) = cap.stroke_caps();
    Status::Ok
}

pub fn gdip_set_custom_line_cap_stroke_join(
    cap: Option<&mut CustomLineCap>,
    join: LineJoin,
) -> Status {
    required!(cap);
    cap.set_stroke_join(join);
    Status::Ok
}

pub fn gdip_get_custom_line_cap_stroke_join(
    cap: Option<&CustomLineCap>,
    join: Option<&mut LineJoin>,
) -> Status {
    required!(cap, join);
    *join = cap.stroke_join();
    Status::Ok
}

pub fn gdip_set_custom_line_cap_base_cap(cap: Option<&mut CustomLineCap>, base: LineCap) -> Status {
    required!(cap);
    cap.set_base_cap(base);
    Status::Ok
}

pub fn gdip_get_custom_line_cap_base_cap(
    cap: Option<&CustomLineCap>,
    base: Option<&mut LineCap>,
) -> Status {
    required!(cap, base);
    *base = cap.base_cap();
    Status::Ok
}

pub fn gdip_set_custom_line_cap_base_inset(cap: Option<&mut CustomLineCap>, inset: Scalar) -> Status {
    required!(cap);
    cap.set_base_inset(inset);
    Status::Ok
}

pub fn gdip_get_custom_line_cap_base_inset(
    cap: Option<&CustomLineCap>,
    inset: Option<&mut Scalar>,
) -> Status {
    required!(cap, inset);
    *inset = cap.base_inset();
    Status::Ok
}

pub fn gdip_set_custom_line_cap_width_scale(
    cap: Option<&mut CustomLineCap>,
    width_scale: Scalar,
) -> Status {
    required!(cap);
    cap.set_width_scale(width_scale);
    Status::Ok
}

pub fn gdip_get_custom_line_cap_width_scale(
    cap: Option<&CustomLineCap>,
    width_scale: Option<&mut Scalar>,
) -> Status {
    required!(cap, width_scale);
    *width_scale = cap.width_scale();
    Status::Ok
}

// Adjustable arrow cap

pub fn gdip_create_adjustable_arrow_cap(
    height: Scalar,
    width: Scalar,
    is_filled: bool,
    cap: Option<&mut Option<AdjustableArrowCap>>,
) -> Status {
    required!(cap);
    *cap = Some(AdjustableArrowCap::new(height, width, is_filled));
    Status::Ok
}

pub fn gdip_set_adjustable_arrow_cap_height(
    cap: Option<&mut AdjustableArrowCap>,
    height: Scalar,
) -> Status {
    required!(cap);
    cap.set_height(height);
    Status::Ok
}

pub fn gdip_get_adjustable_arrow_cap_height(
    cap: Option<&AdjustableArrowCap>,
    height: Option<&mut Scalar>,
) -> Status {
    required!(cap, height);
    *height = cap.height();
    Status::Ok
}

pub fn gdip_set_adjustable_arrow_cap_width(
    cap: Option<&mut AdjustableArrowCap>,
    width: Scalar,
) -> Status {
    required!(cap);
    cap.set_width(width);
    Status::Ok
}

pub fn gdip_get_adjustable_arrow_cap_width(
    cap: Option<&AdjustableArrowCap>,
    width: Option<&mut Scalar>,
) -> Status {
    required!(cap, width);
    *width = cap.width();
    Status::Ok
}

pub fn gdip_set_adjustable_arrow_cap_middle_inset(
    cap: Option<&mut AdjustableArrowCap>,
    middle_inset: Scalar,
) -> Status {
    required!(cap);
    cap.set_middle_inset(middle_inset);
    Status::Ok
}

pub fn gdip_get_adjustable_arrow_cap_middle_inset(
    cap: Option<&AdjustableArrowCap>,
    middle_inset: Option<&mut Scalar>,
) -> Status {
    required!(cap, middle_inset);
    *middle_inset = cap.middle_inset();
    Status::Ok
}

pub fn gdip_set_adjustable_arrow_cap_fill_state(
    cap: Option<&mut AdjustableArrowCap>,
    is_filled: bool,
) -> Status {
    required!(cap);
    cap.set_fill_state(is_filled);
    Status::Ok
}

pub fn gdip_get_adjustable_arrow_cap_fill_state(
    cap: Option<&AdjustableArrowCap>,
    is_filled: Option<&mut bool>,
) -> Status {
    required!(cap, is_filled);
    *is_filled = cap.fill_state();
    Status::Ok
}

// Region

pub fn gdip_create_region(region: Option<&mut Option<Region>>) -> Status {
    required!(region);
    *region = Some(Region::new());
    Status::Ok
}

pub fn gdip_create_region_rect(rect: Option<&RectF>, region: Option<&mut Option<Region>>) -> Status {
    required!(rect, region);
    *region = Some(Region::from_rect(*rect));
    Status::Ok
}

pub fn gdip_create_region_path(path: Option<&Path>, region: Option<&mut Option<Region>>) -> Status {
    required!(path, region);
    *region = Some(Region::from_path(path));
    Status::Ok
}

pub fn gdip_create_region_rgn_data(
    data: Option<&[u8]>,
    region: Option<&mut Option<Region>>,
) -> Status {
    required!(data, region);
    store(region, Region::from_data(data))
}

pub fn gdip_clone_region(region: Option<&Region>, cloned: Option<&mut Option<Region>>) -> Status {
    required!(region, cloned);
    *cloned = Some(region.clone());
    Status::Ok
}

pub fn gdip_delete_region(region: Option<Region>) -> Status {
    required!(region);
    drop(region);
    Status::Ok
}

pub fn gdip_set_empty(region: Option<&mut Region>) -> Status {
    required!(region);
    region.make_empty();
    Status::Ok
}

pub fn gdip_set_infinite(region: Option<&mut Region>) -> Status {
    required!(region);
    region.make_infinite();
    Status::Ok
}

pub fn gdip_is_empty_region(region: Option<&Region>, result: Option<&mut bool>) -> Status {
    required!(region, result);
    *result = region.is_empty();
    Status::Ok
}

pub fn gdip_is_infinite_region(region: Option<&Region>, result: Option<&mut bool>) -> Status {
    required!(region, result);
    *result = region.is_infinite();
    Status::Ok
}

pub fn gdip_get_region_bounds(region: Option<&Region>, rect: Option<&mut RectF>) -> Status {
    required!(region, rect);
    *rect = region.bounds();
    Status::Ok
}

pub fn gdip_combine_region_rect(
    region: Option<&mut Region>,
    rect: Option<&RectF>,
    mode: CombineMode,
) -> Status {
    required!(region, rect);
    region.combine_rect(*rect, mode).into()
}

pub fn gdip_combine_region_path(
    region: Option<&mut Region>,
    path: Option<&Path>,
    mode: CombineMode,
) -> Status {
    required!(region, path);
    region.combine_path(path, mode).into()
}

pub fn gdip_combine_region_region(
    region: Option<&mut Region>,
    other: Option<&Region>,
    mode: CombineMode,
) -> Status {
    required!(region, other);
    region.combine_region(other, mode).into()
}

pub fn gdip_translate_region(region: Option<&mut Region>, dx: Scalar, dy: Scalar) -> Status {
    required!(region);
    region.translate(dx, dy);
    Status::Ok
}

pub fn gdip_transform_region(region: Option<&mut Region>, matrix: Option<&Matrix>) -> Status {
    required!(region, matrix);
    region.transform(matrix).into()
}

pub fn gdip_get_region_data_size(region: Option<&Region>, size: Option<&mut usize>) -> Status {
    required!(region, size);
    *size = region.data_size();
    Status::Ok
}

/// Write region blob, `size_filled` receives number of bytes written when present
pub fn gdip_get_region_data(
    region: Option<&Region>,
    buffer: Option<&mut [u8]>,
    size_filled: Option<&mut usize>,
) -> Status {
    required!(region, buffer);
    match region.get_data(buffer) {
        Ok(written) => {
            if let Some(size_filled) = size_filled {
                *size_filled = written;
            }
            Status::Ok
        }
        Err(status) => status,
    }
}
