use serde::Serialize;
use std::path::PathBuf;

use crate::config;
use crate::error::{Error, Result, ScriptFailedDetails};
use crate::generator;
use crate::paths::ProjectLayout;
use crate::utils::command::{run_script, ScriptOutput};
use crate::utils::validation;

/// Environment variable carrying the image reference to the image-build script.
pub const IMAGE_ENV: &str = "IMAGE";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    pub image: String,
    pub build: ScriptOutput,
    pub image_build: ScriptOutput,
    pub manifests: Vec<PathBuf>,
}

/// Run the full build pipeline for the single image reference in `args`.
///
/// Steps run in order and the first failure aborts the rest:
/// compile, build the image, load the config, render the manifests.
pub fn run(args: &[String], layout: &ProjectLayout) -> Result<(BuildOutput, i32)> {
    let image = validate_args(args)?;

    crate::log_status!("build", "Compiling ({})", layout.build_script().display());
    let build = run_build_script(layout)?;

    crate::log_status!("build", "Building image {}", image);
    let image_build = run_image_build(layout, image)?;

    crate::log_status!("build", "Generating manifests from {}", layout.config_yaml().display());
    let cfg = config::load(&layout.config_yaml())?;
    let manifests = generator::render_deploy_files(&cfg, image, layout)?;

    Ok((
        BuildOutput {
            image: image.to_string(),
            build,
            image_build,
            manifests,
        },
        0,
    ))
}

/// Require exactly one non-empty image reference.
pub fn validate_args(args: &[String]) -> Result<&str> {
    let image = validation::require_exactly_one(
        args,
        "image",
        &format!("build command needs 1 argument, got {}", args.len()),
        vec![
            "Usage: opkit build <image>".to_string(),
            "Example: opkit build quay.io/example/operator:v0.0.1".to_string(),
        ],
    )?;

    validation::require_non_empty(image, "image", "Image reference cannot be empty")?;
    Ok(image.as_str())
}

/// Run the compile script. Non-zero exit is `build.compile_failed`.
pub fn run_build_script(layout: &ProjectLayout) -> Result<ScriptOutput> {
    let output = run_script(&layout.build_script(), layout.root(), &[]);

    if !output.success {
        return Err(Error::build_compile_failed(failure_details(&output, None)));
    }

    Ok(output)
}

/// Run the image-build script with `IMAGE=<image>` added to the environment.
pub fn run_image_build(layout: &ProjectLayout, image: &str) -> Result<ScriptOutput> {
    let output = run_script(
        &layout.image_build_script(),
        layout.root(),
        &[(IMAGE_ENV, image)],
    );

    if !output.success {
        return Err(Error::build_image_failed(failure_details(
            &output,
            Some(image.to_string()),
        )));
    }

    Ok(output)
}

fn failure_details(output: &ScriptOutput, image: Option<String>) -> ScriptFailedDetails {
    ScriptFailedDetails {
        script: output.script.clone(),
        exit_code: output.exit_code,
        stdout: output.output.stdout.clone(),
        stderr: output.output.stderr.clone(),
        image,
    }
}
