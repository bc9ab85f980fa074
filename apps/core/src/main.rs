use vesslo_core::core_service::ServiceError;
use vesslo_core::runtime::RuntimeError;

fn main() {
    let options = match vesslo_core::runtime::parse_cli_args(std::env::args_os()) {
        Ok(options) => options,
        Err(error) => error.exit(),
    };

    if let Err(error) = vesslo_core::logging::init() {
        eprintln!("[vesslo-core] logging disabled: {error}");
    }

    if let Err(error) = vesslo_core::runtime::run_with_options(options) {
        tracing::error!("runtime failed: {error}");
        eprintln!("[vesslo-core] {error}");
        let code = match error {
            RuntimeError::Config(_) | RuntimeError::Service(ServiceError::Config(_)) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
