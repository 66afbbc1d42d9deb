//! Builds a region, writes its GDI+ blob and reads it back
//!
//! With a file argument the blob is loaded from the file instead.
#![deny(warnings)]

use gdicompat::*;
use std::{env, fs};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

type Error = Box<dyn std::error::Error>;

fn sample_region() -> Result<Region, Status> {
    let mut triangle = Path::new(FillMode::Winding);
    triangle
        .move_to((0.0, 0.0))
        .line_to((10.0, 0.0))
        .line_to((5.0, 8.0))
        .close();
    let mut region = Region::from_rect(RectF::new(2.0, 2.0, 6.0, 6.0));
    region.combine_path(&triangle, CombineMode::Xor)?;
    region.combine_rect(RectF::new(0.0, 0.0, 4.0, 4.0), CombineMode::Exclude)?;
    region.transform(&Matrix::new_rotate(30.0))?;
    Ok(region)
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let data = match env::args().nth(1) {
        Some(file) => fs::read(file)?,
        None => {
            let region = sample_region()?;
            let mut data = vec![0u8; region.data_size()];
            let written = region.get_data(&mut data)?;
            data.truncate(written);
            data
        }
    };
    for chunk in data.chunks(16) {
        let line: Vec<_> = chunk.iter().map(|byte| format!("{:02x}", byte)).collect();
        println!("{}", line.join(" "));
    }

    let region = Region::from_data(&data)?;
    println!("bounds: {:?}", region.bounds());
    if let Some(tree) = region.tree() {
        println!("tree size: {}", tree.tree_size());
        for path in tree.leaves() {
            println!("{:?}", path);
        }
    }
    Ok(())
}
