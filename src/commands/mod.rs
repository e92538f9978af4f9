use opkit::paths::ProjectLayout;

pub type CmdResult<T> = opkit::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub project_dir: Option<String>,
}

impl GlobalArgs {
    /// Project layout from --project-dir, or the current directory.
    pub fn layout(&self) -> opkit::Result<ProjectLayout> {
        match self.project_dir.as_deref() {
            Some(dir) => ProjectLayout::from_arg(dir),
            None => ProjectLayout::current(),
        }
    }
}

pub mod build;

pub(crate) fn run_text(
    command: crate::Commands,
    global: &GlobalArgs,
) -> opkit::Result<(String, i32)> {
    match command {
        crate::Commands::Build(args) => build::run_text(args, global),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (opkit::Result<serde_json::Value>, i32) {
    crate::tty::status("opkit is working...");

    match command {
        crate::Commands::Build(args) => dispatch!(args, global, build),
    }
}
