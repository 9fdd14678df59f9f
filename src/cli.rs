// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "bird-watch")]
#[command(about = "Spot the birds from the city's cameras", long_about = None)]
pub struct Cli {
    /// glTF scene to observe instead of the built-in city
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// JSON file overriding the default settings
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Mix audio into a silent sink instead of the level meter
    #[arg(long, default_value = "false")]
    pub mute: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["bird-watch"]);
        assert!(cli.scene.is_none());
        assert!(cli.settings.is_none());
        assert!(!cli.mute);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "bird-watch",
            "--scene",
            "city.glb",
            "--settings",
            "tuning.json",
            "--mute",
        ]);
        assert_eq!(cli.scene, Some(PathBuf::from("city.glb")));
        assert_eq!(cli.settings, Some(PathBuf::from("tuning.json")));
        assert!(cli.mute);
    }
}
