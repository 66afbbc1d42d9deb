//! Metafile draw-call shim
//!
//! Draw calls issued on a recording [`Graphics`](crate::Graphics) are turned into
//! records. Coordinates that are integers fitting into 16 bits produce compressed
//! records, anything else falls back to the float variant of the record.
use crate::{Argb, Pen, Point, RectF, Scalar, Status};
use std::fmt;

/// Pen attributes stored alongside a draw record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenInfo {
    pub color: Argb,
    pub width: Scalar,
}

impl From<&Pen> for PenInfo {
    fn from(pen: &Pen) -> Self {
        Self {
            color: pen.color(),
            width: pen.width(),
        }
    }
}

/// Single metafile record
#[derive(Debug, Clone, PartialEq)]
pub enum MetafileRecord {
    /// Polyline with 16-bit integer coordinates
    DrawLines { pen: PenInfo, points: Vec<[i16; 2]> },
    /// Polyline with float coordinates
    DrawLinesF { pen: PenInfo, points: Vec<Point> },
    /// Rectangles as `[x, y, width, height]` with 16-bit integer values
    DrawRects { pen: PenInfo, rects: Vec<[i16; 4]> },
    /// Rectangles with float values
    DrawRectsF { pen: PenInfo, rects: Vec<RectF> },
}

/// Receiver of draw-call notifications
pub trait MetafileRecorder: fmt::Debug {
    fn record(&mut self, record: MetafileRecord) -> Result<(), Status>;
}

/// In memory metafile, keeps records in the order they were issued
#[derive(Debug, Clone, Default)]
pub struct RecordedMetafile {
    records: Vec<MetafileRecord>,
}

impl RecordedMetafile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[MetafileRecord] {
        &self.records
    }
}

impl MetafileRecorder for RecordedMetafile {
    fn record(&mut self, record: MetafileRecord) -> Result<(), Status> {
        self.records.push(record);
        Ok(())
    }
}

/// Convert value to `i16` if it is an integer in the 16-bit range
fn to_i16(value: Scalar) -> Option<i16> {
    if value.fract() != 0.0 || value < i16::MIN as Scalar || value > i16::MAX as Scalar {
        None
    } else {
        Some(value as i16)
    }
}

/// Convert all values to `i16`, `None` if any of them does not fit
fn compress<const N: usize>(values: [Scalar; N]) -> Option<[i16; N]> {
    let mut result = [0i16; N];
    for (dst, src) in result.iter_mut().zip(values) {
        *dst = to_i16(src)?;
    }
    Some(result)
}

pub fn record_draw_line(
    recorder: &mut dyn MetafileRecorder,
    pen: &Pen,
    p1: Point,
    p2: Point,
) -> Result<(), Status> {
    record_draw_lines(recorder, pen, &[p1, p2])
}

pub fn record_draw_lines(
    recorder: &mut dyn MetafileRecorder,
    pen: &Pen,
    points: &[Point],
) -> Result<(), Status> {
    if points.len() < 2 {
        return Err(Status::InvalidParameter);
    }
    let pen = PenInfo::from(pen);
    let compressed: Option<Vec<[i16; 2]>> = points.iter().map(|p| compress(p.0)).collect();
    let record = match compressed {
        Some(points) => MetafileRecord::DrawLines { pen, points },
        None => {
            tracing::debug!("[metafile] lines do not fit 16-bit, using float record");
            MetafileRecord::DrawLinesF {
                pen,
                points: points.to_vec(),
            }
        }
    };
    recorder.record(record)
}

pub fn record_draw_rectangles(
    recorder: &mut dyn MetafileRecorder,
    pen: &Pen,
    rects: &[RectF],
) -> Result<(), Status> {
    if rects.is_empty() {
        return Err(Status::InvalidParameter);
    }
    let pen = PenInfo::from(pen);
    let compressed: Option<Vec<[i16; 4]>> = rects
        .iter()
        .map(|r| compress([r.x, r.y, r.width, r.height]))
        .collect();
    let record = match compressed {
        Some(rects) => MetafileRecord::DrawRects { pen, rects },
        None => {
            tracing::debug!("[metafile] rectangles do not fit 16-bit, using float record");
            MetafileRecord::DrawRectsF {
                pen,
                rects: rects.to_vec(),
            }
        }
    };
    recorder.record(record)
}

/// Path records require the path object table which is not recorded yet
pub fn record_draw_path(
    _recorder: &mut dyn MetafileRecorder,
    _pen: &Pen,
    _path: &crate::Path,
) -> Result<(), Status> {
    Err(Status::NotImplemented)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_compressed_and_float() -> Result<(), Status> {
        let pen = Pen::new(Argb(0xff000000), 2.0, crate::Unit::World);
        let mut metafile = RecordedMetafile::new();
        record_draw_line(
            &mut metafile,
            &pen,
            Point::new(1.0, 2.0),
            Point::new(-3.0, 32767.0),
        )?;
        record_draw_line(
            &mut metafile,
            &pen,
            Point::new(1.5, 2.0),
            Point::new(3.0, 4.0),
        )?;
        record_draw_line(
            &mut metafile,
            &pen,
            Point::new(0.0, 0.0),
            Point::new(40000.0, 4.0),
        )?;
        let records = metafile.records();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            MetafileRecord::DrawLines {
                pen: PenInfo {
                    color: Argb(0xff000000),
                    width: 2.0
                },
                points: vec![[1, 2], [-3, 32767]],
            }
        );
        assert!(matches!(records[1], MetafileRecord::DrawLinesF { .. }));
        assert!(matches!(records[2], MetafileRecord::DrawLinesF { .. }));
        Ok(())
    }

    #[test]
    fn test_rects_and_stubs() {
        let pen = Pen::new(Argb(0xff000000), 1.0, crate::Unit::World);
        let mut metafile = RecordedMetafile::new();
        assert_eq!(
            record_draw_rectangles(&mut metafile, &pen, &[RectF::new(0.0, 0.0, 10.0, 5.0)]),
            Ok(())
        );
        assert_eq!(
            record_draw_rectangles(&mut metafile, &pen, &[RectF::new(0.0, 0.0, 0.5, 5.0)]),
            Ok(())
        );
        assert!(matches!(
            metafile.records()[0],
            MetafileRecord::DrawRects { .. }
        ));
        assert!(matches!(
            metafile.records()[1],
            MetafileRecord::DrawRectsF { .. }
        ));
        assert_eq!(
            record_draw_rectangles(&mut metafile, &pen, &[]),
            Err(Status::InvalidParameter)
        );
        assert_eq!(
            record_draw_lines(&mut metafile, &pen, &[Point::new(0.0, 0.0)]),
            Err(Status::InvalidParameter)
        );
        assert_eq!(
            record_draw_path(&mut metafile, &pen, &crate::Path::default()),
            Err(Status::NotImplemented)
        );
    }
}
