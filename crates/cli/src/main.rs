use std::process::ExitCode;

fn main() -> ExitCode {
    clientes_cli::run()
}
