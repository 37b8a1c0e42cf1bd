//! `ccl show`: print the current cloud config.

use super::open_store;
use crate::cli::ShowArgs;
use crate::config::Config;
use crate::document::LockKey;
use crate::error::{LockError, Result};
use crate::store::DocumentStore;

/// Fetch and print the document. Reads do not take the lock.
pub async fn cmd_show(args: ShowArgs, config: &Config) -> Result<()> {
    let key = LockKey::new(&args.target.director, &args.target.name)?;
    let store = open_store(config);

    let Some(document) = store.fetch(&key).await? else {
        println!("No cloud config '{}' on director '{}'.", key.config_name(), key.director());
        return Ok(());
    };

    if args.json {
        let json = serde_json::to_string_pretty(document.value()).map_err(|e| {
            LockError::InvalidArgument(format!("cloud config is not representable as JSON: {}", e))
        })?;
        println!("{}", json);
    } else {
        print!("{}", document.to_yaml()?);
    }

    Ok(())
}
