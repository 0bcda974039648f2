extern crate clap;
extern crate env_logger;
extern crate escapetime;
extern crate image;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use escapetime::{ColorCoder, Engine, EngineConfig, FractalKind, Viewport};
use num::Complex;
use std::str::FromStr;

/// Given a string and a separator, returns the two values separated by
/// the separator.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v > 0.0 => Ok(()),
        _ => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const PIXEL_SIZE: &str = "pixel-size";
const ITERATIONS: &str = "iterations";
const ESCAPE_RADIUS: &str = "escape-radius";
const SAMPLES: &str = "samples";
const THREADS: &str = "threads";
const BANDS: &str = "bands";
const JULIA: &str = "julia";
const CODER: &str = "coder";
const BLENDING: &str = "blending";
const ZOOM: &str = "zoom";

const CODER_NAMES: [&str; 5] = [
    "smooth-rgb",
    "smooth-gray",
    "relief",
    "banded-gray",
    "banded-rgb",
];

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("escapetime")
        .version("0.1.0")
        .about("Renders Mandelbrot and Julia set escape-time images")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output image file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1920x1080")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .default_value("-0.75,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse the center point"))
                .help("Plane point under the center of the image"),
        )
        .arg(
            Arg::with_name(PIXEL_SIZE)
                .required(false)
                .long(PIXEL_SIZE)
                .short("p")
                .takes_value(true)
                .default_value("auto")
                .validator(|s| {
                    if s == "auto" {
                        Ok(())
                    } else {
                        validate_positive(&s, "Pixel size must be a positive number or 'auto'")
                    }
                })
                .help("Plane size of one pixel, or 'auto' to frame the whole set"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per sample"),
        )
        .arg(
            Arg::with_name(ESCAPE_RADIUS)
                .required(false)
                .long(ESCAPE_RADIUS)
                .short("e")
                .takes_value(true)
                .default_value("10.0")
                .validator(|s| validate_positive(&s, "Escape radius must be a positive number"))
                .help("Radius beyond which an orbit counts as escaped"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .required(false)
                .long(SAMPLES)
                .short("a")
                .takes_value(true)
                .default_value("3")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        16,
                        "Could not parse sub-sample count",
                        "Sub-samples per axis must be between 1 and 16",
                    )
                })
                .help("Anti-aliasing sub-samples per pixel axis"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("0")
                .validator(move |s| {
                    validate_range(
                        &s,
                        0,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 0 (auto) and {}", max_threads),
                    )
                })
                .help("Number of worker threads, 0 for one per CPU"),
        )
        .arg(
            Arg::with_name(BANDS)
                .required(false)
                .long(BANDS)
                .short("b")
                .takes_value(true)
                .default_value("0")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        1_000_000,
                        "Could not parse band count",
                        "Band count must be between 0 (auto) and 1000000",
                    )
                })
                .help("Number of row bands to split the frame into, 0 for auto"),
        )
        .arg(
            Arg::with_name(JULIA)
                .required(false)
                .long(JULIA)
                .short("j")
                .takes_value(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse the Julia parameter"))
                .help("Render the Julia set for this fixed c instead of the Mandelbrot set"),
        )
        .arg(
            Arg::with_name(CODER)
                .required(false)
                .long(CODER)
                .short("k")
                .takes_value(true)
                .default_value("smooth-rgb")
                .possible_values(&CODER_NAMES)
                .help("Color coder to paint the frame with"),
        )
        .arg(
            Arg::with_name(BLENDING)
                .required(false)
                .long(BLENDING)
                .takes_value(true)
                .default_value("5.45656")
                .validator(|s| validate_positive(&s, "Blending factor must be a positive number"))
                .help("Band-stretching factor for the smooth coders"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|s| validate_pair::<usize>(&s, ',', "Could not parse zoom pixel"))
                .help("Zoom 4x onto this pixel before writing; may be repeated"),
        )
        .get_matches()
}

fn write_image(outfile: &str, rgb: &[u32], bounds: (usize, usize)) -> Result<(), std::io::Error> {
    let mut bytes = Vec::with_capacity(rgb.len() * 3);
    for &pixel in rgb {
        let (r, g, b) = escapetime::decode_color(pixel);
        bytes.push(r);
        bytes.push(g);
        bytes.push(b);
    }
    image::save_buffer(
        outfile,
        &bytes,
        bounds.0 as u32,
        bounds.1 as u32,
        image::ColorType::RGB(8),
    )?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();

    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap(), 'x')
        .expect("Error parsing image dimensions");
    let center =
        parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing center point");
    let pixel_size = match matches.value_of(PIXEL_SIZE).unwrap() {
        // Frame the classic -2..1 x -1.35..1.35 region whatever the
        // aspect ratio.
        "auto" => f64::max(2.7 / (height as f64), 4.7 / (width as f64)),
        s => f64::from_str(s).expect("Error parsing pixel size"),
    };
    let max_iterations =
        u32::from_str(matches.value_of(ITERATIONS).unwrap()).expect("Could not parse iterations");
    let escape_radius = f64::from_str(matches.value_of(ESCAPE_RADIUS).unwrap())
        .expect("Could not parse escape radius");
    let sub_samples =
        u32::from_str(matches.value_of(SAMPLES).unwrap()).expect("Could not parse sub-samples");
    let workers =
        usize::from_str(matches.value_of(THREADS).unwrap()).expect("Could not parse thread count");
    let bands =
        usize::from_str(matches.value_of(BANDS).unwrap()).expect("Could not parse band count");
    let blending = f64::from_str(matches.value_of(BLENDING).unwrap())
        .expect("Could not parse blending factor");

    let fractal = match matches.value_of(JULIA) {
        Some(s) => FractalKind::Julia(parse_complex(s).expect("Error parsing Julia parameter")),
        None => FractalKind::Mandelbrot,
    };

    // All five coders stay available so recolor requests can cycle;
    // the chosen one goes first.
    let mut coders = vec![
        ColorCoder::smooth_rgb(max_iterations, blending),
        ColorCoder::smooth_gray(max_iterations, blending),
        ColorCoder::relief(max_iterations, 120.0, 1.4, None),
        ColorCoder::banded_gray(max_iterations),
        ColorCoder::banded_rgb(max_iterations),
    ];
    let chosen = matches.value_of(CODER).unwrap();
    let index = coders
        .iter()
        .position(|coder| coder.name() == chosen)
        .unwrap_or(0);
    coders.rotate_left(index);

    let config = EngineConfig {
        max_iterations,
        escape_radius,
        sub_samples,
        bands,
        workers,
        fractal,
        coders,
    };
    let viewport = Viewport::new(width, height, center, pixel_size);

    let mut engine = match Engine::new(config, viewport) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    engine.render_frame();

    if let Some(zooms) = matches.values_of(ZOOM) {
        for zoom in zooms {
            let (px, py) =
                parse_pair::<usize>(zoom, ',').expect("Error parsing zoom pixel");
            engine.on_zoom_request(px, py, width / 4, height / 4);
        }
    }

    if let Err(e) = write_image(
        matches.value_of(OUTPUT).unwrap(),
        engine.rgb_buffer(),
        (width, height),
    ) {
        eprintln!("Could not write image: {}", e);
        std::process::exit(1);
    }
}
