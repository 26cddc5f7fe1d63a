use std::fs;
use std::path::PathBuf;

use crate::calendar::CalendarBuilder;
use crate::compiler::DocumentCompiler;
use crate::config::Config;
use crate::error::Result;
use crate::events::{self, EventMapping};
use crate::render::Renderer;

/// Files produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub document: PathBuf,
    pub pdf: Option<PathBuf>,
}

fn builder<'a>(config: &Config, events: &'a EventMapping) -> CalendarBuilder<'a> {
    CalendarBuilder::new(config.year(), config.num_months, events)
        .start_month(config.start_month)
        .week_start(config.week_start)
        .show_day_number(config.show_day_number)
}

/// Loads events, builds the month grids, renders and writes the document and,
/// if configured, compiles it. Configuration errors abort before anything is
/// written; a failing compilation leaves the written document in place.
pub fn run(config: &Config) -> Result<Artifacts> {
    builder(config, &EventMapping::new()).validate()?;

    let events = match &config.events {
        Some(path) => events::load(path)?,
        None => {
            log::info!("No event source configured, days stay empty");
            EventMapping::new()
        }
    };

    let months = builder(config, &events).generate()?;

    let renderer = match &config.template_dir {
        Some(dir) => Renderer::new(dir)?,
        None => Renderer::builtin()?,
    }
    .week_start(config.week_start);
    let document = renderer.render(&config.template, &months)?;

    if let Some(parent) = config.output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config.output, document)?;
    log::info!("Wrote {} month(s) to '{}'", months.len(), config.output.display());

    let pdf = if config.compile {
        let compiler = DocumentCompiler::new().program(&config.compiler.program);
        compiler.check_packages(&config.compiler.packages);
        Some(compiler.compile(&config.output, &config.compiler.args)?)
    } else {
        None
    };

    Ok(Artifacts {
        document: config.output.clone(),
        pdf,
    })
}
