// cli.rs - Command-line interface configuration
use clap::{Parser, ValueEnum};

use crate::math::Rgba;

/// Which scene set to register with the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sample {
    /// Hard-coded red triangle
    Triangle,
    /// Spinning vertex-colored cube
    Cube,
    /// Globe with a surface marker, orbit camera
    Globe,
}

impl Sample {
    /// Whether the sample redraws every refresh rather than on input
    pub fn is_animated(self) -> bool {
        matches!(self, Sample::Cube)
    }

    pub fn title(self) -> &'static str {
        match self {
            Sample::Triangle => "Triangle",
            Sample::Cube => "Rotating Cube",
            Sample::Globe => "Globe",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "orbit-render")]
#[command(about = "On-demand WebGPU renderer with an orbit camera", long_about = None)]
pub struct Cli {
    /// Scene to show
    #[arg(long, value_enum, default_value_t = Sample::Globe)]
    pub sample: Sample,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Clear color as #rgb, #rgba, #rrggbb or #rrggbbaa
    #[arg(long, default_value = "#ffffff")]
    pub background: Rgba,

    /// Starting orbit radius
    #[arg(long, default_value_t = 5.0)]
    pub radius: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["orbit-render"]).unwrap();
        assert_eq!(cli.sample, Sample::Globe);
        assert_eq!((cli.width, cli.height), (800, 600));
        assert_eq!(cli.background, Rgba::WHITE);
        assert_eq!(cli.radius, 5.0);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "orbit-render",
            "--sample",
            "cube",
            "--width",
            "1024",
            "--height",
            "768",
            "--background",
            "#000",
            "--radius",
            "12.5",
        ])
        .unwrap();

        assert_eq!(cli.sample, Sample::Cube);
        assert_eq!(cli.width, 1024);
        assert_eq!(cli.height, 768);
        assert_eq!(cli.background, Rgba::BLACK);
        assert_eq!(cli.radius, 12.5);
    }

    #[test]
    fn test_bad_background_rejected() {
        assert!(Cli::try_parse_from(["orbit-render", "--background", "white"]).is_err());
    }

    #[test]
    fn test_unknown_sample_rejected() {
        assert!(Cli::try_parse_from(["orbit-render", "--sample", "teapot"]).is_err());
    }

    #[test]
    fn test_only_cube_is_animated() {
        assert!(Sample::Cube.is_animated());
        assert!(!Sample::Globe.is_animated());
        assert!(!Sample::Triangle.is_animated());
    }
}
