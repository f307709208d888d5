use std::path::PathBuf;
use std::time::{Duration, Instant};

pub use cli::CLIParser;
pub use error::Error;
use crate::image::io;
use crate::image::saturating_add::{add_channels_saturating_with, AddMethod};

mod cli;
pub mod color;
mod error;
pub mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

const RGBA_COMPONENTS: usize = 4;

pub struct Arguments {
    input_file: PathBuf,
    output_file: PathBuf,
    increment: u8,
    alpha_increment: u8,
    add_method: AddMethod,
    flip_vertically: bool,
}

impl Arguments {
    fn increments(&self) -> [u8; RGBA_COMPONENTS] {
        [
            self.increment,
            self.increment,
            self.increment,
            self.alpha_increment,
        ]
    }
}

/// Brighten an RGBA image and report how long the addition took.
pub fn brighten_image(arguments: &Arguments) -> Result<Duration> {
    let original = io::load(&arguments.input_file, arguments.flip_vertically)?;
    if original.components() != RGBA_COMPONENTS {
        return Err(Error::RgbaRequired(original.components()));
    }
    let mut brightened = original.clone();

    let start = Instant::now();
    add_channels_saturating_with(
        arguments.add_method,
        &mut brightened,
        &arguments.increments(),
    )?;
    let duration = start.elapsed();
    println!("Pixel conversion: {}us", duration.as_micros());
    log::info!(
        "Added {:?} to {} pixels",
        arguments.increments(),
        brightened.pixel_count()
    );

    io::save(Some(&brightened), &arguments.output_file)?;
    Ok(duration)
}
