use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Text,
}

mod commands;
mod output;
mod tty;

use commands::build;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "opkit")]
#[command(version = VERSION)]
#[command(about = "CLI tool for building operator projects")]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    project_dir: Option<String>,

    /// Print a JSON envelope instead of raw script output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compiles code and builds artifacts
    ///
    /// Compiles the code, builds the container image, and generates the
    /// deployment manifests. <IMAGE> is set in deploy/operator.yaml.
    /// Push the image to a registry afterwards, e.g.
    ///
    ///     opkit build quay.io/example/operator:v0.0.1
    ///     docker push quay.io/example/operator:v0.0.1
    Build(build::BuildArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        project_dir: cli.project_dir,
    };
    let mode = if cli.json {
        ResponseMode::Json
    } else {
        ResponseMode::Text
    };

    let exit_code = match mode {
        ResponseMode::Json => {
            let (json_result, exit_code) = commands::run_json(cli.command, &global);
            if output::print_json_result(json_result).is_err() {
                return std::process::ExitCode::from(1);
            }
            exit_code
        }
        ResponseMode::Text => match commands::run_text(cli.command, &global) {
            Ok((content, exit_code)) => {
                if output::print_text(&content).is_err() {
                    return std::process::ExitCode::from(1);
                }
                exit_code
            }
            Err(err) => {
                // stderr is gone; the exit code still reports the failure.
                let _ = output::print_error_text(&err);
                output::exit_code_for_error(err.code)
            }
        },
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
