use address_collector::{output, AddressCollector, Settings, APP_NAME, VERSION};
use env_logger::Env;
use log::info;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run().await {
        Err(e) => {
            log::error!("Error: {:?}", e);
            std::process::exit(1);
        }
        _ => {}
    }
}

async fn run() -> anyhow::Result<()> {
    info!("program {} version {}", APP_NAME, VERSION);

    let settings = Settings::load()?;
    info!(
        "collecting [{}] addresses from [{}]",
        settings.generator_count, settings.api.url
    );

    let collector = AddressCollector::new(&settings)?;
    let records = collector.collect().await?;
    info!("finished collecting, got [{}] records in total", records.len());

    output::write_workbook(&records, &settings.output)?;
    Ok(())
}
