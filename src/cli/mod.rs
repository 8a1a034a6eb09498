// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::{ConvertError, Result};
use crate::ConvertOptions;
use clap::{Arg, ArgAction, Command, ValueEnum};
use glam::Vec2;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct EnhancedCli {
    config: config::ConfigFile,
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let matches = self.build_cli().get_matches();

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        self.setup_logging(matches.get_count("verbose"))?;

        match matches.subcommand() {
            Some(("generate", sub_matches)) => handlers::handle_generate_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(self, sub_matches),
            Some(("tree", sub_matches)) => handlers::handle_tree_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        }
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("PSDUI Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("generate")
                    .about("Generate a widget plan from a layer manifest")
                    .arg(Arg::new("input").help("Layer manifest (.json or .toml)").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output plan file"))
                    .arg(Arg::new("canvas").long("canvas").value_name("WxH").help("Reference canvas size, e.g. 1100x682"))
                    .arg(Arg::new("root").short('r').long("root").value_name("N").value_parser(clap::value_parser!(usize)).help("Index of the document root to plan"))
                    .arg(Arg::new("debug").short('d').long("debug").help("Enable debug mode with per-phase logging").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show detailed generation statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch the manifest and regenerate on change").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Check layer manifests for structural errors and unparsed names")
                    .arg(Arg::new("input").help("Manifest file or directory").required(true).index(1))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Check all manifests in directory recursively").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("tree")
                    .about("Print the reconstructed layer hierarchy with resolved placement")
                    .arg(Arg::new("input").help("Layer manifest (.json or .toml)").required(true).index(1))
                    .arg(Arg::new("canvas").long("canvas").value_name("WxH").help("Reference canvas size, e.g. 1100x682"))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(OutputFormat)).default_value("text").help("Output format")),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
        Ok(())
    }

    pub fn build_convert_options(&self, matches: &clap::ArgMatches) -> Result<ConvertOptions> {
        let mut options = ConvertOptions::default();

        if let (Some(width), Some(height)) = (self.config.canvas_width, self.config.canvas_height) {
            options.canvas = Vec2::new(width, height);
        }
        if let Some(canvas) = matches.try_get_one::<String>("canvas").ok().flatten() {
            options.canvas_override = Some(parse_canvas(canvas)?);
        }

        options.root_index = matches
            .try_get_one::<usize>("root")
            .ok()
            .flatten()
            .copied()
            .or(self.config.root_index)
            .unwrap_or(0);

        options.debug_mode = matches.try_get_one::<bool>("debug").ok().flatten().copied().unwrap_or(false);

        if let Some(suffix) = &self.config.texture_suffix {
            options.texture_suffix = suffix.clone();
        }
        if let Some(classes) = &self.config.widget_classes {
            options.widget_classes.extend(classes.clone());
        }

        Ok(options)
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.config.output_directory.as_deref()
    }
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `WIDTHxHEIGHT`, e.g. `1100x682`
pub fn parse_canvas(value: &str) -> Result<Vec2> {
    let invalid = || ConvertError::InvalidFormat {
        message: format!("Invalid canvas size: {}. Use WIDTHxHEIGHT format.", value),
    };
    let (width, height) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f32 = width.trim().parse().map_err(|_| invalid())?;
    let height: f32 = height.trim().parse().map_err(|_| invalid())?;
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(invalid());
    }
    Ok(Vec2::new(width, height))
}
