//! `ccl merge` and `ccl put`: locked updates of a cloud config.

use super::{open_lock, read_document};
use crate::cli::{MergeArgs, PutArgs};
use crate::config::Config;
use crate::document::LockKey;
use crate::error::{LockError, Result};
use futures::future::try_join_all;
use tracing::info;

/// Merge every fragment into the document, one locked update per fragment.
///
/// All updates are started together; the first one takes the lock and the
/// rest queue behind it in the order given. A failed update aborts the
/// remaining ones, since a failure does not advance the queue.
pub async fn cmd_merge(args: MergeArgs, config: &Config) -> Result<()> {
    let key = LockKey::new(&args.target.director, &args.target.name)?;
    let fragments = args
        .fragments
        .iter()
        .map(|path| read_document(path).map(|fragment| (path, fragment)))
        .collect::<Result<Vec<_>>>()?;

    let lock = open_lock(config);
    info!(key = %key, fragments = fragments.len(), "merging fragments");

    let updates = fragments.into_iter().map(|(path, fragment)| {
        let lock = &lock;
        let key = &key;
        async move {
            let merged = lock
                .with_lock(key, move |current| async move {
                    let mut document = current.unwrap_or_default();
                    document.merge(fragment);
                    Ok(document)
                })
                .await?;
            println!("Merged {} into {}", path.display(), key);
            Ok::<_, LockError>(merged)
        }
    });

    let merged = try_join_all(updates).await?;

    if let Some(document) = merged.last() {
        println!();
        print!("{}", document.to_yaml()?);
    }

    Ok(())
}

/// Replace the document with the contents of a file.
pub async fn cmd_put(args: PutArgs, config: &Config) -> Result<()> {
    let key = LockKey::new(&args.target.director, &args.target.name)?;
    let document = read_document(&args.file)?;

    let lock = open_lock(config);
    lock.with_lock(&key, move |_| async move { Ok(document) })
        .await?;

    println!("Replaced {} with {}", key, args.file.display());
    Ok(())
}
