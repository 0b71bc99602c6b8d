fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = libcli::run() {
        eprintln!("{err}");
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(pe) = cause.downcast_ref::<libprotocol::ProtocolError>() {
            return match pe {
                libprotocol::ProtocolError::Json(_) => 3,
                libprotocol::ProtocolError::Validation(_) => 3,
            };
        }
    }
    2
}
