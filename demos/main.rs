use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use colored::Colorize;
use png_reader::{decode, RescalePolicy};

fn main() -> ExitCode {
    env_logger::init();

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: png_reader_demo <path-to-png>");
            return ExitCode::FAILURE;
        }
    };

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("could not open {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let raster = match decode(BufReader::new(file), RescalePolicy::Scaled) {
        Ok(raster) => raster,
        Err(err) => {
            eprintln!("could not decode {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("decoded {}x{} image", raster.width(), raster.height());
    print_raster(&raster);

    ExitCode::SUCCESS
}

fn print_raster(raster: &png_reader::Raster) {
    for row in 0..raster.height() {
        for col in 0..raster.width() {
            let pixel = raster.get(row, col);
            print!("{}", " ".on_truecolor(pixel.r, pixel.g, pixel.b));
        }
        println!();
    }
}
