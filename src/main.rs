use church_finance::AppConfig;

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    if let Err(e) = rolling_logger::init_logger(config.log_dir.clone(), "ChurchFinance") {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = church_finance::serve(config).await {
        if rolling_logger::error(&e).is_err() {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
