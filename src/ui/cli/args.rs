// Mon Oct 19 2026 - Alex

use crate::config::{GenerateFlags, GeneratorConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "schema-cpp-generator")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Generates C++ definitions out of dumped Source 2 schema data", long_about = None)]
pub struct Args {
    /// Schema JSON file, or a directory whose newest .json file is used.
    #[arg(short, long, default_value = "./dumps/")]
    pub input: PathBuf,

    /// Output header file, or a directory to place it in.
    #[arg(short, long, default_value = "./generated/")]
    pub output: PathBuf,

    /// Class/enum definitions (or pulse domains) to generate, "all" for every one.
    #[arg(short, long = "generate-classes", num_args = 1.., default_value = "all")]
    pub generate_classes: Vec<String>,

    #[arg(short = 'c', long)]
    pub comments: bool,

    #[arg(short = 'a', long)]
    pub static_assert: bool,

    /// Takes SDK container and entity types as already defined.
    #[arg(short = 'd', long)]
    pub supply_sdk: bool,

    #[arg(short, long)]
    pub silent: bool,

    /// Drops the documentation comments pulse bindings carry by default.
    #[arg(short = 'n', long)]
    pub no_comments: bool,

    #[arg(short, long, value_enum, default_value_t = OutputMode::Cpp)]
    pub mode: OutputMode,

    /// Also writes the recorded emission plan as JSON.
    #[arg(long)]
    pub plan: Option<PathBuf>,

    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain C++ classes reproducing the dumped layouts.
    Cpp,
    /// Schema accessor macros.
    Defs,
    /// Pulse domain bindings.
    Pulse,
}

impl OutputMode {
    pub fn file_name(self, stem: &str) -> String {
        match self {
            Self::Cpp => format!("{}.h", stem),
            Self::Defs => format!("defs_{}.h", stem),
            Self::Pulse => format!("pulse_bindings_{}.txt", stem),
        }
    }
}

impl Args {
    pub fn flags(&self) -> GenerateFlags {
        let mut flags = GenerateFlags::empty();
        if self.comments || (self.mode == OutputMode::Pulse && !self.no_comments) {
            flags |= GenerateFlags::ADD_COMMENTS;
        }
        if self.static_assert && self.mode == OutputMode::Cpp {
            flags |= GenerateFlags::STATIC_ASSERTS;
        }
        // Macro definitions always sit on top of the SDK
        if self.supply_sdk || self.mode == OutputMode::Defs {
            flags |= GenerateFlags::SUPPLY_SDK;
        }
        if self.silent {
            flags |= GenerateFlags::SILENT;
        }
        flags
    }

    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_flags(self.flags())
            .with_roots(self.generate_classes.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.mode == OutputMode::Defs && self.generate_classes.iter().any(|c| c == "all") {
            return Err("Macro definitions need an explicit list of classes (-g)".to_string());
        }
        if self.mode == OutputMode::Pulse && self.plan.is_some() {
            return Err("Pulse bindings have no emission plan to record (--plan)".to_string());
        }
        if self.generate_classes.iter().any(|c| c.trim().is_empty()) {
            return Err("Class names must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RootSelection;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["schema-cpp-generator"]);
        assert_eq!(args.input, PathBuf::from("./dumps/"));
        assert_eq!(args.mode, OutputMode::Cpp);
        assert_eq!(args.flags(), GenerateFlags::empty());
        assert_eq!(args.config().roots, RootSelection::All);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_defs_mode_flags() {
        let args = Args::parse_from(["schema-cpp-generator", "-m", "defs", "-a", "-c", "-g", "CBaseEntity", "CPlayer"]);
        let flags = args.flags();
        assert!(flags.contains(GenerateFlags::SUPPLY_SDK | GenerateFlags::ADD_COMMENTS));
        assert!(!flags.contains(GenerateFlags::STATIC_ASSERTS));
        assert_eq!(
            args.config().roots,
            RootSelection::Named(vec!["CBaseEntity".to_string(), "CPlayer".to_string()])
        );
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_pulse_mode() {
        let args = Args::parse_from(["schema-cpp-generator", "-m", "pulse"]);
        assert!(args.flags().contains(GenerateFlags::ADD_COMMENTS));
        assert_eq!(args.mode.file_name("server"), "pulse_bindings_server.txt");
        assert!(args.validate().is_ok());

        let quiet = Args::parse_from(["schema-cpp-generator", "-m", "pulse", "-n"]);
        assert!(!quiet.flags().contains(GenerateFlags::ADD_COMMENTS));

        let planned = Args::parse_from(["schema-cpp-generator", "-m", "pulse", "--plan", "plan.json"]);
        assert!(planned.validate().is_err());
    }

    #[test]
    fn test_defs_mode_requires_names() {
        let args = Args::parse_from(["schema-cpp-generator", "--mode", "defs"]);
        assert!(args.validate().is_err());
    }
}
