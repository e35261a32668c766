pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hls_relay=info".into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
