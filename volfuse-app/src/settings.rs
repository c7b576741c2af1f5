//! Command-line arguments and their merge with an optional config file.

use crate::errors::AppError;
use clap::Parser;
use std::path::{Path, PathBuf};
use volfuse_data::OutputFormat;
use volfuse_fuse::FusionConfig;

/// Volfuse - fuse six axis-aligned depth renders into sparse volumes
#[derive(Parser, Debug, Default)]
#[command(name = "volfuse")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// First frame to process [default: 1]
    #[arg(short, long)]
    pub start: Option<i64>,

    /// Last frame to process, inclusive [default: 25]
    #[arg(short, long)]
    pub end: Option<i64>,

    /// Directory holding `<frame><nx|ny|nz|px|py|pz>.png` view renders
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory the volumes are written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output filename prefix [default: volume]
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Cubic volume resolution N [default: 128]
    #[arg(short = 'n', long, visible_alias = "texture-size")]
    pub resolution: Option<u32>,

    /// Fraction of the depth range rejected at each end [default: 0.05]
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Output format (json, ply) [default: json]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Frames processed in parallel [default: 1]
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Extra attempts for a failed frame write [default: 0]
    #[arg(long)]
    pub retries: Option<u32>,

    /// JSON file with any FusionConfig fields; flags given here override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log per-frame counters
    #[arg(short, long)]
    pub verbose: bool,
}

fn load_config_file(path: &Path) -> Result<FusionConfig, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

impl Args {
    /// Resolve the batch configuration: defaults, then the config file, then flags.
    pub fn to_config(&self) -> Result<FusionConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => FusionConfig::default(),
        };

        if let Some(start) = self.start {
            config.start_frame = start;
        }
        if let Some(end) = self.end {
            config.end_frame = end;
        }
        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(threshold) = self.threshold {
            config.depth_threshold = threshold;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(retries) = self.retries {
            config.write_retries = retries;
        }
        config.verbose |= self.verbose;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_flags() {
        let args = Args::try_parse_from(["volfuse"]).unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config, FusionConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::try_parse_from([
            "volfuse", "-s", "3", "-e", "9", "-i", "renders", "-o", "out", "-p", "smoke",
            "--texture-size", "64", "-t", "0.1", "-f", "ply", "-j", "4", "--retries", "2", "-v",
        ])
        .unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.frames(), 3..=9);
        assert_eq!(config.input_dir, PathBuf::from("renders"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.prefix, "smoke");
        assert_eq!(config.resolution, 64);
        assert_eq!(config.depth_threshold, 0.1);
        assert_eq!(config.format, OutputFormat::Ply);
        assert_eq!(config.jobs, 4);
        assert_eq!(config.write_retries, 2);
        assert!(config.verbose);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Args::try_parse_from(["volfuse", "--format", "vdb"]).is_err());
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = std::env::temp_dir().join(format!("volfuse-app-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "resolution": 32, "prefix": "fromfile", "end_frame": 4 }"#)
            .unwrap();
        let args = Args {
            config: Some(path.clone()),
            prefix: Some("fromflag".into()),
            ..Args::default()
        };
        let config = args.to_config().unwrap();
        assert_eq!(config.resolution, 32);
        assert_eq!(config.end_frame, 4);
        assert_eq!(config.prefix, "fromflag");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_config_file() {
        let args = Args {
            config: Some(PathBuf::from("/no/such/volfuse.json")),
            ..Args::default()
        };
        assert!(matches!(args.to_config(), Err(AppError::ConfigRead { .. })));
    }
}
