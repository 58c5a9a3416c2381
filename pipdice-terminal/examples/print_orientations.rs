/// Example: print the settle orientation of every face of a die
///
/// Usage: cargo run --example print_orientations -- 12

use std::env;
use std::io;
use pipdice_core::{build_die, LabelCache, LabelStyle, RasterLabelGenerator, Rgb, VIEW_AXIS};

fn main() -> io::Result<()> {
    let sides = env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u32>().ok())
        .unwrap_or(20);

    let mut images = LabelCache::new(RasterLabelGenerator::default());
    let die = build_die(sides, Rgb::WHITE, LabelStyle::Number, &mut images)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    if !die.is_labeled() {
        eprintln!("d{sides} has no face data; rolls use a random orientation");
        return Ok(());
    }

    println!("d{sides}: {} faces, {} label images", die.faces().len(), images.len());
    for value in 1..=sides {
        let Some(rotation) = die.resolve_orientation(value) else {
            continue;
        };
        let face = &die.faces()[die.face_for_value(value).unwrap_or_default()];
        let q = rotation.quaternion();
        println!(
            "{value:>3}: q = [{:+.4}, {:+.4}, {:+.4}, {:+.4}]  facing = {:.4}",
            q.i,
            q.j,
            q.k,
            q.w,
            (rotation * face.normal).dot(&VIEW_AXIS)
        );
    }
    Ok(())
}
