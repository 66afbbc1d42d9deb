//! GDI+ enumerations
//!
//! Enumerations are kept as raw values since the flat API accepts any integer and
//! some setters store unknown values as-is, while others normalize or reject them.
use std::fmt;

macro_rules! gdip_enum(
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub i32);

        #[allow(non_upper_case_globals)]
        impl $name {
            $(pub const $variant: Self = Self($value);)+

            /// Symbolic name of the value, `None` if the value is not recognized
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some(stringify!($variant)),)+
                    _ => None,
                }
            }

            /// Whether the value is one of the named constants
            pub fn is_known(self) -> bool {
                self.name().is_some()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{}::{}", stringify!($name), name),
                    None => write!(f, "{}({})", stringify!($name), self.0),
                }
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    }
);

gdip_enum!(
    /// Decoration used at the ends of a line
    LineCap {
        Flat = 0,
        Square = 1,
        Round = 2,
        Triangle = 3,
        NoAnchor = 0x10,
        SquareAnchor = 0x11,
        RoundAnchor = 0x12,
        DiamondAnchor = 0x13,
        ArrowAnchor = 0x14,
        AnchorMask = 0xf0,
        Custom = 0xff,
    }
);

gdip_enum!(
    /// How consecutive segments of a stroke are joined
    LineJoin {
        Miter = 0,
        Bevel = 1,
        Round = 2,
        MiterClipped = 3,
    }
);

gdip_enum!(
    /// Decoration of the ends of every dash
    DashCap {
        Flat = 0,
        Round = 2,
        Triangle = 3,
    }
);

gdip_enum!(
    /// Named dash patterns
    DashStyle {
        Solid = 0,
        Dash = 1,
        Dot = 2,
        DashDot = 3,
        DashDotDot = 4,
        Custom = 5,
    }
);

gdip_enum!(
    /// Stroke placement relative to the path
    PenAlignment {
        Center = 0,
        Inset = 1,
    }
);

gdip_enum!(
    /// Measurement unit
    Unit {
        World = 0,
        Display = 1,
        Pixel = 2,
        Point = 3,
        Inch = 4,
        Document = 5,
        Millimeter = 6,
    }
);

gdip_enum!(
    /// Interior membership rule of a path
    FillMode {
        Alternate = 0,
        Winding = 1,
    }
);

gdip_enum!(
    /// Boolean operation joining two region subtrees
    CombineMode {
        Replace = 0,
        Intersect = 1,
        Union = 2,
        Xor = 3,
        Exclude = 4,
        Complement = 5,
    }
);

gdip_enum!(
    /// Side on which the matrix operand of a composition is applied
    MatrixOrder {
        Prepend = 0,
        Append = 1,
    }
);

gdip_enum!(
    BrushType {
        SolidColor = 0,
        HatchFill = 1,
        TextureFill = 2,
        PathGradient = 3,
        LinearGradient = 4,
    }
);

gdip_enum!(
    /// Fill type of a pen as reported by `GdipGetPenFillType`
    PenType {
        SolidColor = 0,
        HatchFill = 1,
        TextureFill = 2,
        PathGradient = 3,
        LinearGradient = 4,
        Unknown = -1,
    }
);

gdip_enum!(
    CustomLineCapType {
        Default = 0,
        AdjustableArrow = 1,
    }
);

impl From<BrushType> for PenType {
    fn from(brush_type: BrushType) -> Self {
        if brush_type.is_known() {
            PenType(brush_type.0)
        } else {
            PenType::Unknown
        }
    }
}

/// Path point type flags as stored in path type arrays
pub mod point_type {
    pub const START: u8 = 0x00;
    pub const LINE: u8 = 0x01;
    pub const BEZIER: u8 = 0x03;
    pub const TYPE_MASK: u8 = 0x07;
    pub const DASH_MODE: u8 = 0x10;
    pub const MARKER: u8 = 0x20;
    pub const CLOSE_SUBPATH: u8 = 0x80;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_raw_values() {
        assert_eq!(LineCap::ArrowAnchor.0, 0x14);
        assert_eq!(LineCap::Custom.0, 0xff);
        assert_eq!(DashStyle::DashDotDot.0, 4);
        assert_eq!(CombineMode::Complement.0, 5);
        assert_eq!(i32::from(FillMode::Winding), 1);
        assert_eq!(LineJoin::from(3), LineJoin::MiterClipped);
    }

    #[test]
    fn test_enum_debug() {
        assert_eq!(format!("{:?}", LineJoin::Bevel), "LineJoin::Bevel");
        assert_eq!(format!("{:?}", LineJoin(42)), "LineJoin(42)");
        assert!(DashCap::Triangle.is_known());
        assert!(!DashCap(1).is_known());
    }

    #[test]
    fn test_pen_type_from_brush() {
        assert_eq!(PenType::from(BrushType::HatchFill), PenType::HatchFill);
        assert_eq!(PenType::from(BrushType(17)), PenType::Unknown);
    }
}
