// RustPixel
// copyright zipxing@hotmail.com 2022～2025

//! Glyph distance-field atlas generator
//!
//! Usage:
//! sdf-atlas
//! sdf-atlas --font bedstead.ttf --sprite ship.png --output font.png
//! sdf-atlas -c atlas.toml --map symbol_map.json
//! sdf-atlas --log-level debug --log-file atlas.log
//!
//! Options given on the command line override the TOML file, which
//! overrides the built-in defaults.

use clap::{Arg, ArgMatches, Command};
use log::{error, LevelFilter};
use pixel_sdf_atlas::log::{init_log, parse_level};
use pixel_sdf_atlas::{generate, AtlasConfig, AtlasResult};
use std::path::{Path, PathBuf};
use std::process::exit;

fn make_parser() -> Command {
    Command::new("sdf-atlas")
        .author("zipxing@hotmail.com")
        .about("Generate a glyph distance-field atlas composited with a tinted sprite")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("TOML")
                .help("Atlas configuration file"),
        )
        .arg(
            Arg::new("font")
                .short('f')
                .long("font")
                .value_name("TTF")
                .help("Monospace font"),
        )
        .arg(
            Arg::new("sprite")
                .short('s')
                .long("sprite")
                .value_name("IMAGE")
                .help("Sprite composited into the red channel"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("IMAGE")
                .help("Atlas output file"),
        )
        .arg(
            Arg::new("map")
                .short('m')
                .long("map")
                .value_name("JSON")
                .help("Also write the character to cell table"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .default_value("info"),
        )
        .arg(Arg::new("log-file").long("log-file").value_name("FILE"))
}

fn load_config(matches: &ArgMatches) -> AtlasResult<AtlasConfig> {
    let mut cfg = match matches.get_one::<String>("config") {
        Some(path) => AtlasConfig::from_toml_file(Path::new(path))?,
        None => AtlasConfig::default(),
    };

    if let Some(p) = matches.get_one::<String>("font") {
        cfg.font_path = PathBuf::from(p);
    }
    if let Some(p) = matches.get_one::<String>("sprite") {
        cfg.sprite_path = PathBuf::from(p);
    }
    if let Some(p) = matches.get_one::<String>("output") {
        cfg.output_path = PathBuf::from(p);
    }
    if let Some(p) = matches.get_one::<String>("map") {
        cfg.symbol_map_path = Some(PathBuf::from(p));
    }
    Ok(cfg)
}

fn main() {
    let matches = make_parser().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .and_then(|s| parse_level(s))
        .unwrap_or(LevelFilter::Info);
    let log_file = matches.get_one::<String>("log-file").map(|s| s.as_str());
    if let Err(e) = init_log(level, log_file) {
        eprintln!("Error: {}", e);
        exit(1);
    }

    let cfg = match load_config(&matches) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    println!("\n{}", "=".repeat(70));
    println!(
        "Generating {}x{} {}",
        cfg.image_size,
        cfg.image_size,
        cfg.output_path.display()
    );
    println!("{}", "=".repeat(70));

    let atlas = match generate(&cfg) {
        Ok(a) => a,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    println!("\n{}", "=".repeat(70));
    println!("Complete!");
    println!("{}", "=".repeat(70));
    println!(
        "Grid: {}x{} cells, {} distinct chars, font size {}",
        atlas.layout.columns,
        atlas.layout.rows,
        atlas.cells().len(),
        atlas.layout.font_size
    );
    println!("\nOutput files:");
    println!("  {}", cfg.output_path.display());
    if let Some(map) = &cfg.symbol_map_path {
        println!("  {}", map.display());
    }
}
