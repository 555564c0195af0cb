use clap::Parser;

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Text,
}

mod commands;
mod output;

use commands::fix;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "stylefix")]
#[command(version = VERSION)]
#[command(about = "Rename duplicated style keys so each object-literal key is unique")]
struct Cli {
    #[command(flatten)]
    fix: fix::FixArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let mode = if cli.fix.json {
        ResponseMode::Json
    } else {
        ResponseMode::Text
    };

    let result = fix::run(cli.fix, &global);

    let exit_code = match mode {
        ResponseMode::Json => {
            let (json_result, exit_code) = output::map_cmd_result_to_json(result);
            if let Err(err) = output::print_json_result(json_result) {
                output::print_error_text(&err);
                return std::process::ExitCode::from(1);
            }
            exit_code
        }
        ResponseMode::Text => match result {
            Ok((fix_output, exit_code)) => {
                for warning in fix::render_warnings(&fix_output) {
                    eprintln!("{}", warning);
                }
                print!("{}", fix::render_outcome(&fix_output));
                exit_code
            }
            Err(err) => {
                output::print_error_text(&err);
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
