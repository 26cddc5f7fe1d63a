use minijinja::{context, path_loader, Environment};
use std::path::Path;

use crate::calendar::Month;
use crate::datetime::{self, WeekStart};
use crate::error::Result;

pub const BUILTIN_TEMPLATE: &str = "calendar.tex.jinja";

const BUILTIN_SOURCE: &str = include_str!("../templates/calendar.tex.jinja");

/// Renders month grids through Jinja templates.
///
/// Templates see `months`, `week_start`, `weekdays` (names in column order)
/// and `starting_day_number` (the LaTeX `calendar` package's numbering).
pub struct Renderer {
    env: Environment<'static>,
    week_start: WeekStart,
}

impl Renderer {
    /// Looks templates up in `template_dir`, falling back to the built-in one.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let mut renderer = Self::builtin()?;
        renderer.env.set_loader(path_loader(template_dir));
        Ok(renderer)
    }

    pub fn builtin() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_template(BUILTIN_TEMPLATE, BUILTIN_SOURCE)?;

        Ok(Renderer {
            env,
            week_start: WeekStart::default(),
        })
    }

    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn render(&self, template: &str, months: &[Month]) -> Result<String> {
        let tmpl = self.env.get_template(template)?;

        let weekdays: Vec<&str> = self
            .week_start
            .weekdays()
            .iter()
            .map(|&day| datetime::weekday_name(day))
            .collect();

        let document = tmpl.render(context! {
            months => months,
            week_start => self.week_start,
            weekdays => weekdays,
            starting_day_number => self.week_start.starting_day_number(),
        })?;

        log::debug!(
            "Rendered {} month(s) with template '{}'",
            months.len(),
            template
        );

        Ok(document)
    }
}
