use std::{env, error::Error, sync::Arc};

use geocoding::{NominatimClient, NominatimConfig};
use media_store::{BucketClient, BucketConfig, MediaStore, MemoryMediaStore};
use record_store::{BaseClient, BaseCredentials, MemoryRecordStore, RecordStore};
use session::Logbook;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = WebConfig::from_env().ok_or("WEB_BIND_ADDRESS is not a socket address.")?;

    // geocoder
    let geocoder = Arc::new(NominatimClient::new(NominatimConfig::from_env())?);

    // stores
    let (records, media): (Arc<dyn RecordStore>, Arc<dyn MediaStore>) =
        if env::var("LOG_BACKEND").is_ok_and(|backend| backend == "memory") {
            log::warn!("Using in-memory stores, nothing will be persisted.");
            (
                Arc::new(MemoryRecordStore::new()),
                Arc::new(MemoryMediaStore::new("travel-log")),
            )
        } else {
            let credentials = BaseCredentials::from_env()
                .ok_or("expected RECORD_STORE_KEY in env.")?;
            let bucket = BucketConfig::from_env()
                .ok_or("expected MEDIA_BUCKET and MEDIA_ACCESS_TOKEN in env.")?;
            (
                Arc::new(BaseClient::new(credentials)?),
                Arc::new(BucketClient::new(bucket)?),
            )
        };

    // web server
    let logbook = Logbook::new(records, media, geocoder);
    start_web_server(WebState { logbook }, config).await?;

    Ok(())
}
