// Mon Oct 19 2026 - Alex

use super::args::{Args, OutputMode};
use crate::config::{GenerateFlags, GeneratorConfig, RootSelection};
use crate::emit::{CppDefsWriter, CppWriter, EmissionPlan, PlanRecorder, PulseBindingWriter};
use crate::resolve::{ResolutionSession, ResolutionStatus};
use crate::schema::file::FLAG_NO_PARENT_SCOPE;
use crate::schema::{locate_input, DefId, Domain, SchemaFile, TypeGraph};
use crate::utils::logging;
use anyhow::Context;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// What a finished batch produced.
pub struct GenerationSummary {
    pub processed: usize,
    pub missing: Vec<String>,
    pub diagnostics: usize,
}

pub struct CommandHandler {
    silent: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { silent: false }
    }

    pub fn execute(&mut self, args: Args) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;
        self.silent = args.silent;
        self.setup_logging(&args);

        let config = args.config();
        config.validate().map_err(|e| anyhow::anyhow!(e))?;

        let input = locate_input(&args.input).with_context(|| format!("Locating schema input {}", args.input.display()))?;
        let schema = SchemaFile::open(&input).with_context(|| format!("Loading schema file {}", input.display()))?;

        let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("schema");
        let out_path = prepare_out_path(&args.output, &args.mode.file_name(stem))
            .with_context(|| format!("Preparing output path {}", args.output.display()))?;

        if args.mode == OutputMode::Pulse {
            return self.generate_pulse(&schema, &config, &out_path);
        }

        if !schema.has_flag(FLAG_NO_PARENT_SCOPE) && !config.has_flag(GenerateFlags::SUPPLY_SDK) {
            self.print(format!(
                "{}\n{}",
                "!!! Schema dump was dumped with parent scope, which might not generate correct code without supplying SDK definitions.",
                "!!! Please either generate with SDK defs (--supply-sdk) or dump schema without parent scope."
            )
            .yellow());
        }

        match &config.roots {
            RootSelection::All => self.print("Generating all class definitions...".cyan()),
            RootSelection::Named(names) => {
                self.print(format!("Generating ({}) class definitions...", names.join(", ")).cyan())
            }
        }

        let mut graph = schema.into_graph();
        let recorded_graph = args.plan.as_ref().map(|_| graph.clone());

        let summary = if args.mode == OutputMode::Cpp {
            let mut writer = CppWriter::new(config.flags);
            writer.write_preamble();
            let (writer, summary) = self.generate(&mut graph, &config, writer)?;
            let mut out = BufWriter::new(File::create(&out_path).with_context(|| format!("Creating {}", out_path.display()))?);
            writer.write_to(&mut out)?;
            summary
        } else {
            let (writer, summary) = self.generate(&mut graph, &config, CppDefsWriter::new(config.flags))?;
            let mut out = BufWriter::new(File::create(&out_path).with_context(|| format!("Creating {}", out_path.display()))?);
            writer.write_to(&mut out)?;
            summary
        };

        if let (Some(plan_path), Some(mut plan_graph)) = (&args.plan, recorded_graph) {
            let (recorder, _) = self.generate(&mut plan_graph, &config, PlanRecorder::new())?;
            fs::write(plan_path, recorder.to_json()?).with_context(|| format!("Writing plan {}", plan_path.display()))?;
            self.print(format!("Emission plan written to {}", plan_path.display()).green());
        }

        for name in &summary.missing {
            self.print(format!("Class definition ({}) not found in schema file, failed to generate!", name).red());
        }
        if summary.diagnostics > 0 {
            log::warn!("{} non-fatal diagnostics were reported, check the generated output", summary.diagnostics);
        }

        let absolute = fs::canonicalize(&out_path).unwrap_or(out_path);
        self.print(
            format!(
                "Successfully generated C++ file at {} (Total objects processed: {})",
                absolute.display(),
                summary.processed
            )
            .green(),
        );
        Ok(())
    }

    fn generate_pulse(&self, schema: &SchemaFile, config: &GeneratorConfig, out_path: &Path) -> anyhow::Result<()> {
        if !schema.has_pulse_bindings() {
            anyhow::bail!("Schema file is missing pulse bindings!");
        }

        match &config.roots {
            RootSelection::All => self.print("Generating all domain definitions...".cyan()),
            RootSelection::Named(names) => {
                self.print(format!("Generating ({}) domain definitions...", names.join(", ")).cyan())
            }
        }

        let (domains, missing) = select_domains(schema.pulse_bindings(), &config.roots);
        let mut writer = PulseBindingWriter::new(config.flags);
        for domain in &domains {
            writer.write_domain(domain)?;
        }
        let mut out = BufWriter::new(File::create(out_path).with_context(|| format!("Creating {}", out_path.display()))?);
        writer.write_to(&mut out)?;

        for name in &missing {
            self.print(format!("Domain definition ({}) not found in schema file, failed to generate!", name).red());
        }
        let absolute = fs::canonicalize(out_path).unwrap_or_else(|_| out_path.to_path_buf());
        self.print(
            format!(
                "Successfully generated pulse domains file at {} (Total domains processed: {})",
                absolute.display(),
                domains.len()
            )
            .green(),
        );
        Ok(())
    }

    fn setup_logging(&self, args: &Args) {
        let level = if args.silent {
            log::LevelFilter::Error
        } else {
            logging::level_from_str(&args.log_level)
        };

        logging::init_logger(level);
    }

    /// Runs one resolution session over the requested roots and hands the
    /// plan back.
    pub fn generate<P: EmissionPlan>(
        &self,
        graph: &mut TypeGraph,
        config: &GeneratorConfig,
        plan: P,
    ) -> anyhow::Result<(P, GenerationSummary)> {
        let mut missing = Vec::new();
        let roots: Vec<DefId> = match &config.roots {
            RootSelection::All => graph.ids().collect(),
            RootSelection::Named(names) => names
                .iter()
                .filter_map(|name| {
                    let id = graph.find(name);
                    if id.is_none() {
                        missing.push(name.clone());
                    }
                    id
                })
                .collect(),
        };
        let names: Vec<String> = roots.iter().map(|id| graph.def(*id).name.clone()).collect();

        let _timer = logging::scoped_timer("generation");
        let progress = self.progress_bar(roots.len() as u64)?;
        let mut session = ResolutionSession::new(graph, config, plan);
        for (id, name) in roots.iter().zip(&names) {
            progress.set_message(name.clone());
            session
                .process(*id)
                .with_context(|| format!("Failed to generate {}", name))?;
            progress.inc(1);
        }
        progress.finish_and_clear();

        let status = session.status();
        log::info!(
            "Defined {} and declared {} types",
            status.count(ResolutionStatus::Defined),
            status.count(ResolutionStatus::Declared)
        );
        let summary = GenerationSummary {
            processed: roots.len(),
            missing,
            diagnostics: session.diagnostics().len(),
        };
        Ok((session.finish(), summary))
    }

    fn progress_bar(&self, total: u64) -> anyhow::Result<ProgressBar> {
        if self.silent {
            return Ok(ProgressBar::hidden());
        }

        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-");
        let pb = ProgressBar::new(total);
        pb.set_style(style);
        Ok(pb)
    }

    fn print<S: std::fmt::Display>(&self, text: S) {
        if !self.silent {
            println!("{}", text);
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Requested domains in request order, plus the names the dump lacks.
pub fn select_domains<'a>(domains: &'a [Domain], roots: &RootSelection) -> (Vec<&'a Domain>, Vec<String>) {
    match roots {
        RootSelection::All => (domains.iter().collect(), Vec::new()),
        RootSelection::Named(names) => {
            let mut selected = Vec::new();
            let mut missing = Vec::new();
            for name in names {
                match domains.iter().find(|d| &d.name == name) {
                    Some(domain) => selected.push(domain),
                    None => missing.push(name.clone()),
                }
            }
            (selected, missing)
        }
    }
}

/// A path without an extension is a directory that receives `file_name`.
/// Missing directories are created.
pub fn prepare_out_path(out_path: &Path, file_name: &str) -> std::io::Result<PathBuf> {
    if out_path.is_dir() || (!out_path.exists() && out_path.extension().is_none()) {
        fs::create_dir_all(out_path)?;
        return Ok(out_path.join(file_name));
    }

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(out_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::graph::tests::graph_from;
    use serde_json::json;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("schema-cpp-generator-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_prepare_out_path() {
        let dir = temp_dir("out");
        let joined = prepare_out_path(&dir, "dump.h").unwrap();
        assert_eq!(joined, dir.join("dump.h"));
        assert!(dir.is_dir());

        let explicit = dir.join("nested").join("server.h");
        assert_eq!(prepare_out_path(&explicit, "dump.h").unwrap(), explicit);
        assert!(dir.join("nested").is_dir());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_select_domains() {
        let schema = SchemaFile::parse(
            r#"{ "dump_flags": ["has_pulse_bindings"], "defs": [], "pulse_bindings": [
                { "name": "ServerWorld", "cpp_scopes": [] },
                { "name": "ServerEntity", "cpp_scopes": [] }
            ] }"#,
        )
        .unwrap();

        let (all, missing) = select_domains(schema.pulse_bindings(), &RootSelection::All);
        assert_eq!(all.len(), 2);
        assert!(missing.is_empty());

        let roots = RootSelection::Named(vec!["ServerEntity".to_string(), "ClientHud".to_string()]);
        let (named, missing) = select_domains(schema.pulse_bindings(), &roots);
        assert_eq!(named.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), vec!["ServerEntity"]);
        assert_eq!(missing, vec!["ClientHud".to_string()]);
    }

    #[test]
    fn test_pulse_requires_bindings() {
        let dir = temp_dir("pulse");
        fs::create_dir_all(&dir).unwrap();
        let schema = SchemaFile::parse(r#"{ "defs": [] }"#).unwrap();

        let handler = CommandHandler { silent: true };
        let result = handler.generate_pulse(&schema, &GeneratorConfig::new(), &dir.join("out.txt"));
        assert!(result.unwrap_err().to_string().contains("missing pulse bindings"));
        assert!(!dir.join("out.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_generate_reports_missing_roots() {
        let mut graph = graph_from(json!({ "defs": [
            { "name": "CBase", "type": "class", "size": 4, "alignment": 4, "traits": { "members": [
                { "name": "m_n", "offset": 0, "traits": { "subtype": { "type": "atomic", "name": "int32", "size": 4, "alignment": 4 } } }
            ]}}
        ]}));
        let config = GeneratorConfig::new()
            .with_flags(GenerateFlags::SILENT)
            .with_roots(vec!["CBase".to_string(), "CMissing".to_string()]);

        let handler = CommandHandler { silent: true };
        let (recorder, summary) = handler.generate(&mut graph, &config, PlanRecorder::new()).unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.missing, vec!["CMissing".to_string()]);
        assert_eq!(recorder.defined_names(), vec!["CBase"]);
    }
}
