use clicache::args::{self, Cli, Invocation};
use clicache::execute;
use clicache_core::INTERNAL_ERROR_EXIT_CODE;
use clicache_task::SystemCommandExecutor;
use tracing::{debug, error};

fn main() {
    let exit_code = match args::parse(std::env::args_os()) {
        Invocation::Usage { error } => {
            if let Some(error) = error {
                eprintln!("{error}");
            }
            eprint!("{}", args::usage());
            INTERNAL_ERROR_EXIT_CODE
        }
        Invocation::Run(cli) => run(&cli),
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(false);
            error!("{e}");
            return e.exit_code();
        }
    };
    init_tracing(settings.verbose);

    match execute::run(&settings, &cli.command_line(), &SystemCommandExecutor::new()) {
        Ok(outcome) => {
            debug!(?outcome, "finished");
            outcome.exit_code()
        }
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    }
}

fn init_tracing(verbose: bool) {
    if let Err(e) = clicache_utils::tracing::init(verbose) {
        eprintln!("failed to initialize logging: {e}");
    }
}
