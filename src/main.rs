//! Posy - flower garden viewer

use std::path::PathBuf;

use posy::core::logging;
use posy::render::{WindowConfig, run};
use posy::scene::GardenConfig;

fn main() {
    logging::init();
    log::info!("Posy starting...");

    let args: Vec<String> = std::env::args().collect();

    let mut garden_config = match parse_config_arg(&args) {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            match GardenConfig::from_json_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Failed to load {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => GardenConfig::default(),
    };

    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        garden_config.seed = Some(seed);
    }

    let mut window_config = WindowConfig::default();
    if let Some(width) = parse_u64_arg(&args, "--width") {
        window_config.width = width.clamp(1, u32::MAX as u64) as u32;
    }
    if let Some(height) = parse_u64_arg(&args, "--height") {
        window_config.height = height.clamp(1, u32::MAX as u64) as u32;
    }

    if let Err(e) = run(window_config, garden_config) {
        log::error!("Posy exited with error: {}", e);
        std::process::exit(1);
    }
}

/// Parse --config argument from command line
fn parse_config_arg(args: &[String]) -> Option<PathBuf> {
    args.windows(2)
        .find(|pair| pair[0] == "--config" || pair[0] == "-c")
        .map(|pair| PathBuf::from(&pair[1]))
}

/// Parse a numeric `flag <value>` pair from command line
fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.windows(2)
        .filter(|pair| pair[0] == flag)
        .find_map(|pair| match pair[1].parse() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("Ignoring {} {}: not a number", flag, pair[1]);
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_config_arg() {
        let a = args(&["posy", "--seed", "3", "-c", "garden.json"]);
        assert_eq!(parse_config_arg(&a), Some(PathBuf::from("garden.json")));
        assert_eq!(parse_config_arg(&args(&["posy", "--config"])), None);
        assert_eq!(parse_config_arg(&args(&["posy"])), None);
    }

    #[test]
    fn test_parse_u64_arg() {
        let a = args(&["posy", "--width", "800", "--height", "600"]);
        assert_eq!(parse_u64_arg(&a, "--width"), Some(800));
        assert_eq!(parse_u64_arg(&a, "--height"), Some(600));
        assert_eq!(parse_u64_arg(&a, "--seed"), None);
    }

    #[test]
    fn test_parse_u64_arg_skips_bad_values() {
        let a = args(&["posy", "--seed", "many", "--seed", "42"]);
        assert_eq!(parse_u64_arg(&a, "--seed"), Some(42));
        assert_eq!(parse_u64_arg(&args(&["posy", "--seed"]), "--seed"), None);
    }
}
