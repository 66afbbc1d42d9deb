//! Draws a few lines with a dashed pen and an arrow cap, prints canvas operations
//!
//! Run with `RUST_LOG=debug` to see when the pen is synchronised with the canvas.
#![deny(warnings)]

use gdicompat::*;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

type Error = Box<dyn std::error::Error>;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut graphics = Graphics::new(RecordingCanvas::new());
    graphics.set_transform(Matrix::new_scale(2.0, 2.0))?;

    let mut pen = Pen::new(Argb::new(255, 32, 64, 128), 1.5, Unit::World);
    pen.set_dash_style(DashStyle::DashDot)?;
    pen.set_line_cap(LineCap::Round, LineCap::Flat, DashCap::Round);
    let arrow = AdjustableArrowCap::new(3.0, 2.0, true);
    pen.set_custom_end_cap(&arrow);

    // second and third lines reuse backend state of the first one
    graphics.draw_line(&pen, Point::new(0.0, 0.0), Point::new(40.0, 0.0))?;
    graphics.draw_line(&pen, Point::new(0.0, 10.0), Point::new(40.0, 30.0))?;
    graphics.draw_lines(
        &pen,
        &[(0.0, 50.0).into(), (20.0, 60.0).into(), (40.0, 50.0).into()],
    )?;

    pen.set_width(0.25);
    graphics.draw_rectangle(&pen, RectF::new(5.0, 5.0, 30.0, 20.0))?;

    for op in graphics.canvas().ops() {
        println!("{:?}", op);
    }
    Ok(())
}
