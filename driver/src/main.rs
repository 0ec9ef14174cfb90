use clap::Parser;
use clap_stdin::FileOrStdin;
use std::path::PathBuf;
use std::process::ExitCode;

/// Compile toy imperative source to accumulator pseudo-assembly.
#[derive(Parser)]
#[command(name = "toyc", version, about)]
struct Args {
    /// Source file, or `-` to read from standard input
    source: FileOrStdin,

    /// Write the generated assembly here instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let source = match args.source.contents() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: cannot read source: {err}");
            return ExitCode::FAILURE;
        }
    };
    match compiler::compile(&source) {
        Ok(output) => {
            for warning in &output.warnings {
                eprintln!("{warning}");
            }
            if let Some(path) = &args.output {
                if let Err(err) = std::fs::write(path, &output.code) {
                    eprintln!(
                        "Error: cannot write {}: {err}",
                        path.display()
                    );
                    return ExitCode::FAILURE;
                }
            } else {
                print!("{}", output.code);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprint!("{err}");
            ExitCode::FAILURE
        }
    }
}
