use std::{
    env,
    fs::{read_to_string, write},
    process::ExitCode,
    time::Instant,
};

use inkwell::context::Context;
use loopc::{
    compiler::compiler::compile,
    config::{Emit, Options, USAGE},
    display_error,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let options = match Options::from_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("loopc: {}", error);
            eprintln!("{}", USAGE);
            return ExitCode::from(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source = match read_to_string(&options.input) {
        Ok(source) => source,
        Err(err) => {
            error!(path = %options.input.display(), "failed to read input: {}", err);
            return ExitCode::from(1);
        }
    };

    let output = match run(&options, source.clone()) {
        Ok(output) => output,
        Err(err) => {
            display_error(&err, &options.input, &source);
            return ExitCode::from(err.get_stage().exit_code());
        }
    };

    match &options.output {
        Some(path) => {
            if let Err(err) = write(path, output) {
                error!(path = %path.display(), "failed to write output: {}", err);
                return ExitCode::from(1);
            }
        }
        None => print!("{}", output),
    }

    ExitCode::SUCCESS
}

/// Runs the pipeline as far as the selected artifact needs and renders it.
fn run(options: &Options, source: String) -> Result<String, Error> {
    let file_name = options.file_name();
    let start = Instant::now();

    if options.emit == Emit::Tokens {
        let tokens = tokenize(source, Some(file_name))?;
        info!("Tokenized in {:?}", start.elapsed());

        return Ok(tokens
            .iter()
            .map(|token| format!("{}\n", token))
            .collect());
    }

    let ast = parse(source, Some(file_name.clone()))?;
    info!("Parsed in {:?}", start.elapsed());

    if options.emit == Emit::Ast {
        return Ok(format!("{}\n", ast));
    }

    let compile_start = Instant::now();
    let context = Context::create();
    let compiler = compile(&ast, &file_name, &context)?;

    info!("Compiled in {:?}", compile_start.elapsed());
    info!("Total time for IR generation: {:?}", start.elapsed());

    match options.emit {
        Emit::Dot => Ok(compiler.control_flow_graph()?.to_dot()),
        _ => Ok(compiler.print_to_string()),
    }
}
