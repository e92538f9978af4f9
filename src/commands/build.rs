use clap::Args;
use opkit::build::{self, BuildOutput};

use crate::commands::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct BuildArgs {
    /// Container image to build and set in the deployment manifests,
    /// e.g. "quay.io/example/operator:v0.0.1"
    #[arg(value_name = "IMAGE", num_args = 0..)]
    pub image: Vec<String>,
}

pub fn run(args: BuildArgs, global: &GlobalArgs) -> CmdResult<BuildOutput> {
    let layout = global.layout()?;
    build::run(&args.image, &layout)
}

pub fn run_text(args: BuildArgs, global: &GlobalArgs) -> opkit::Result<(String, i32)> {
    let (output, exit_code) = run(args, global)?;
    Ok((render_text(&output), exit_code))
}

/// Script output as the scripts printed it, then the written manifests.
fn render_text(output: &BuildOutput) -> String {
    let mut text = String::new();

    text.push_str(&output.build.combined());
    text.push('\n');
    text.push_str(&output.image_build.combined());
    text.push('\n');

    for path in &output.manifests {
        text.push_str(&format!("Generated {}\n", path.display()));
    }

    text
}
