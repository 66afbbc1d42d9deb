use crate::MatrixOrder;
use bytemuck::{Pod, Zeroable};
use std::{
    fmt,
    ops::{Add, Mul, Sub},
};

pub type Scalar = f32;
pub const EPSILON: Scalar = Scalar::EPSILON;

/// Tolerance used to decide that a transform coefficient collapsed to zero
pub const NEAR_ZERO: Scalar = 0.000_596_046_45;

/// Check whether value is indistinguishable from zero for rendering purposes
#[inline]
pub fn near_zero(value: Scalar) -> bool {
    (-NEAR_ZERO..=NEAR_ZERO).contains(&value)
}

/// Format floats in a compact way
pub fn scalar_fmt(f: &mut fmt::Formatter<'_>, value: Scalar) -> fmt::Result {
    let value_abs = value.abs();
    if value_abs.fract() < EPSILON {
        write!(f, "{}", value.trunc() as i64)
    } else if value_abs > 9999.0 || value_abs <= 0.0001 {
        write!(f, "{:.3e}", value)
    } else {
        let ten: Scalar = 10.0;
        let round = ten.powi(6 - (value_abs.trunc() + 1.0).log10().ceil() as i32);
        write!(f, "{}", (value * round).round() / round)
    }
}

/// Value representing a 2D point or vector (`PointF` in GDI+ terms).
///
/// Layout matches two consecutive reals, which is how points are serialized.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point(pub [Scalar; 2]);

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point([x, y]) = self;
        scalar_fmt(f, *x)?;
        write!(f, ",")?;
        scalar_fmt(f, *y)?;
        Ok(())
    }
}

impl Point {
    #[inline]
    pub const fn new(x: Scalar, y: Scalar) -> Self {
        Self([x, y])
    }

    /// Get `x` component of the point
    #[inline]
    pub fn x(self) -> Scalar {
        self.0[0]
    }

    /// Get `y` component of the point
    #[inline]
    pub fn y(self) -> Scalar {
        self.0[1]
    }

    /// Get length of the vector (distance from the origin)
    pub fn length(self) -> Scalar {
        let Self([x, y]) = self;
        x.hypot(y)
    }

    /// Distance between two points
    pub fn dist(self, other: Self) -> Scalar {
        (self - other).length()
    }

    /// Determine if self is close to the other within the margin of error
    pub fn is_close_to(self, other: Point, eps: Scalar) -> bool {
        let Self([x0, y0]) = self;
        let Self([x1, y1]) = other;
        (x0 - x1).abs() <= eps && (y0 - y1).abs() <= eps
    }
}

impl From<(Scalar, Scalar)> for Point {
    #[inline]
    fn from(xy: (Scalar, Scalar)) -> Self {
        Self([xy.0, xy.1])
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 + x1, y0 + y1])
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Self::Output {
        let Point([x0, y0]) = self;
        let Point([x1, y1]) = other;
        Point([x0 - x1, y0 - y1])
    }
}

impl Mul<Point> for Scalar {
    type Output = Point;

    #[inline]
    fn mul(self, other: Point) -> Self::Output {
        let Point([x, y]) = other;
        Point([self * x, self * y])
    }
}

/// Axis aligned rectangle given by its origin and size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RectF {
    pub x: Scalar,
    pub y: Scalar,
    pub width: Scalar,
    pub height: Scalar,
}

impl RectF {
    pub const fn new(x: Scalar, y: Scalar, width: Scalar, height: Scalar) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle without area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rectangle containing all points, `None` for no points
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (mut x0, mut y0) = (first.x(), first.y());
        let (mut x1, mut y1) = (x0, y0);
        for point in rest {
            x0 = x0.min(point.x());
            y0 = y0.min(point.y());
            x1 = x1.max(point.x());
            y1 = y1.max(point.y());
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Corners in clockwise order starting from the origin
    pub fn corners(&self) -> [Point; 4] {
        let Self {
            x,
            y,
            width,
            height,
        } = *self;
        [
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ]
    }
}

/// 2D affine transformation
///
/// Stored as an array [m00, m01, m02, m10, m11, m12] but semantically corresponds to
/// a matrix:
/// ┌             ┐
/// │ m00 m01 m02 │
/// │ m10 m11 m12 │
/// │   0   0   1 │
/// └             ┘
/// GDI+ names the same coefficients `m11 = m00`, `m12 = m10`, `m21 = m01`,
/// `m22 = m11`, `dx = m02`, `dy = m12` (row vector convention).
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix([Scalar; 6]);

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matrix(")?;
        for (index, value) in self.elements().iter().enumerate() {
            if index != 0 {
                write!(f, " ")?;
            }
            scalar_fmt(f, *value)?;
        }
        write!(f, ")")
    }
}

impl Matrix {
    /// Construct matrix from GDI+ elements `m11, m12, m21, m22, dx, dy`
    pub fn new(m11: Scalar, m12: Scalar, m21: Scalar, m22: Scalar, dx: Scalar, dy: Scalar) -> Self {
        Self([m11, m21, dx, m12, m22, dy])
    }

    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    pub fn new_translate(tx: Scalar, ty: Scalar) -> Self {
        Self([1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    pub fn new_scale(sx: Scalar, sy: Scalar) -> Self {
        Self([sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Rotation around the origin, angle is in degrees
    pub fn new_rotate(degrees: Scalar) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self([cos, -sin, 0.0, sin, cos, 0.0])
    }

    /// GDI+ elements `m11, m12, m21, m22, dx, dy`
    pub fn elements(&self) -> [Scalar; 6] {
        let Self([m00, m01, m02, m10, m11, m12]) = *self;
        [m00, m10, m01, m11, m02, m12]
    }

    /// Horizontal and vertical scale coefficients (`m11` and `m22`)
    pub fn scale_factors(&self) -> (Scalar, Scalar) {
        (self.0[0], self.0[4])
    }

    /// Replace horizontal and vertical scale coefficients
    pub fn set_scale_factors(&mut self, sx: Scalar, sy: Scalar) {
        self.0[0] = sx;
        self.0[4] = sy;
    }

    /// Translation component
    pub fn offset(&self) -> Point {
        Point::new(self.0[2], self.0[5])
    }

    /// Apply this transformation to a point
    pub fn apply(&self, point: Point) -> Point {
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        let Point([x, y]) = point;
        Point([x * m00 + y * m01 + m02, x * m10 + y * m11 + m12])
    }

    /// Apply this transformation to a vector (translation is ignored)
    pub fn apply_vector(&self, vector: Point) -> Point {
        let Self([m00, m01, _, m10, m11, _]) = self;
        let Point([x, y]) = vector;
        Point([x * m00 + y * m01, x * m10 + y * m11])
    }

    /// Transform points in place
    pub fn transform_points(&self, points: &mut [Point]) {
        for point in points.iter_mut() {
            *point = self.apply(*point);
        }
    }

    pub fn determinant(&self) -> Scalar {
        let Self([m00, m01, _, m10, m11, _]) = self;
        m00 * m11 - m10 * m01
    }

    /// Find the inverse transformation
    pub fn invert(&self) -> Option<Self> {
        // inv([[M, v], [0, 1]]) = [[inv(M), - inv(M) * v], [0, 1]]
        let Self([m00, m01, m02, m10, m11, m12]) = self;
        let det = self.determinant();
        // only exactly singular matrices are rejected, tiny scales stay usable
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let o00 = m11 / det;
        let o01 = -m01 / det;
        let o10 = -m10 / det;
        let o11 = m00 / det;
        let o02 = -o00 * m02 - o01 * m12;
        let o12 = -o10 * m02 - o11 * m12;
        Some(Self([o00, o01, o02, o10, o11, o12]))
    }

    pub fn is_invertible(&self) -> bool {
        self.invert().is_some()
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Multiply transformations in matrix form, `other` is applied first
    pub fn matmul(&self, other: Matrix) -> Self {
        let Self([s00, s01, s02, s10, s11, s12]) = self;
        let Self([o00, o01, o02, o10, o11, o12]) = other;

        // s00, s01, s02 | o00, o01, o02
        // s10, s11, s12 | o10, o11, o12
        // 0  , 0  , 1   | 0  , 0  , 1
        Self([
            s00 * o00 + s01 * o10,
            s00 * o01 + s01 * o11,
            s00 * o02 + s01 * o12 + s02,
            s10 * o00 + s11 * o10,
            s10 * o01 + s11 * o11,
            s10 * o02 + s11 * o12 + s12,
        ])
    }

    /// Compose with `other` in GDI+ order.
    ///
    /// `Prepend` applies `other` before self, `Append` applies it after self. Any
    /// value other than `Append` is treated as `Prepend`.
    pub fn multiply(&self, other: Matrix, order: MatrixOrder) -> Self {
        if order == MatrixOrder::Append {
            other.matmul(*self)
        } else {
            self.matmul(other)
        }
    }

    pub fn translate(&self, tx: Scalar, ty: Scalar, order: MatrixOrder) -> Self {
        self.multiply(Self::new_translate(tx, ty), order)
    }

    pub fn scale(&self, sx: Scalar, sy: Scalar, order: MatrixOrder) -> Self {
        self.multiply(Self::new_scale(sx, sy), order)
    }

    /// Rotate by an angle in degrees
    pub fn rotate(&self, degrees: Scalar, order: MatrixOrder) -> Self {
        self.multiply(Self::new_rotate(degrees), order)
    }

    /// Convert a device space distance into user space distance
    pub fn device_to_user_distance(&self, distance: Point) -> Option<Point> {
        Some(self.invert()?.apply_vector(distance))
    }
}

impl Mul<Matrix> for Matrix {
    type Output = Matrix;

    fn mul(self, other: Matrix) -> Self::Output {
        self.matmul(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_matrix() {
        let tr = Matrix::identity()
            .translate(1.0, 2.0, MatrixOrder::Prepend)
            .rotate(60.0, MatrixOrder::Prepend)
            .scale(3.0, 2.0, MatrixOrder::Prepend);
        let inv = tr.invert().unwrap();
        let p0 = Point::new(1.0, 1.0);

        let p1 = tr.apply(p0);
        assert_approx_eq!(p1.x(), 2.5 - 3.0_f32.sqrt(), 1e-5);
        assert_approx_eq!(p1.y(), 2.0 + 1.5 * 3.0_f32.sqrt() + 1.0, 1e-5);

        let p2 = inv.apply(p1);
        assert_approx_eq!(p2.x(), 1.0, 1e-5);
        assert_approx_eq!(p2.y(), 1.0, 1e-5);
    }

    #[test]
    fn test_matrix_order() {
        let base = Matrix::new_scale(2.0, 2.0);
        let prepend = base.translate(10.0, 0.0, MatrixOrder::Prepend);
        let append = base.translate(10.0, 0.0, MatrixOrder::Append);
        // translation is scaled when it is applied first
        assert_eq!(prepend.apply(Point::new(0.0, 0.0)), Point::new(20.0, 0.0));
        assert_eq!(append.apply(Point::new(0.0, 0.0)), Point::new(10.0, 0.0));
        // unknown order behaves like prepend
        assert_eq!(base.translate(10.0, 0.0, MatrixOrder(7)), prepend);
    }

    #[test]
    fn test_matrix_elements() {
        let m = Matrix::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(m.elements(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        // row vector convention: x' = m11 * x + m21 * y + dx
        assert_eq!(m.apply(Point::new(1.0, 1.0)), Point::new(9.0, 12.0));
        assert_eq!(m.scale_factors(), (1.0, 4.0));
        assert_eq!(format!("{:?}", m), "matrix(1 2 3 4 5 6)");
    }

    #[test]
    fn test_matrix_invertible() {
        assert!(Matrix::identity().is_invertible());
        assert!(!Matrix::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0).is_invertible());
        assert!(!Matrix::new_scale(0.0, 1.0).is_invertible());
        assert!(Matrix::new_rotate(33.0).is_invertible());
        assert!(Matrix::new_scale(0.0001, 0.0001).is_invertible());
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(0.0));
        assert!(near_zero(-0.0005));
        assert!(!near_zero(0.001));
    }

    #[test]
    fn test_rect() {
        let rect = RectF::from_points(&[
            Point::new(3.0, 1.0),
            Point::new(-1.0, 4.0),
            Point::new(2.0, 2.0),
        ])
        .unwrap();
        assert_eq!(rect, RectF::new(-1.0, 1.0, 4.0, 3.0));
        assert!(RectF::from_points(&[]).is_none());
        assert!(RectF::new(0.0, 0.0, 0.0, 5.0).is_empty());
        assert_eq!(rect.corners()[2], Point::new(3.0, 4.0));
    }
}
