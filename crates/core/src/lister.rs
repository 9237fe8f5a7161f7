//! Remote lister
//!
//! Paginated, delimiter-aware enumeration of an object-store prefix. A
//! flat keyspace has no real directories: non-recursive listings lean on
//! the store's delimiter support to group children into common prefixes,
//! while recursive listings take the flat result and additionally descend
//! into any pseudo-directory markers the store still reports.

use std::collections::{HashSet, VecDeque};

use crate::error::Result;
use crate::path::ensure_trailing_slash;
use crate::traits::{Item, ListRequest, ObjectStore};

/// List every item under `prefix`.
///
/// The prefix is slash-terminated before the first request so the listing
/// scopes to children of that logical directory. Pages are fetched one at
/// a time until the store reports no more.
///
/// Recursive mode requests no delimiter, then walks an explicit queue of
/// pseudo-directory prefixes discovered along the way. A seen-key set
/// keeps the aggregate result free of duplicates for stores that report
/// trailing-slash markers in flat listings.
pub async fn list(store: &dyn ObjectStore, prefix: &str, recursive: bool) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut pending: VecDeque<String> = VecDeque::new();
    pending.push_back(ensure_trailing_slash(prefix));

    while let Some(prefix) = pending.pop_front() {
        let discovered = list_one_prefix(store, &prefix, recursive, &mut items, &mut seen).await?;
        if recursive {
            pending.extend(discovered);
        }
    }

    Ok(items)
}

/// Drain every page for one prefix, returning pseudo-directory keys that
/// still need their own pass.
async fn list_one_prefix(
    store: &dyn ObjectStore,
    prefix: &str,
    recursive: bool,
    items: &mut Vec<Item>,
    seen: &mut HashSet<String>,
) -> Result<Vec<String>> {
    let mut discovered_dirs = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let page = store
            .list_page(ListRequest {
                prefix: prefix.to_string(),
                // The delimiter limits the store to immediate children;
                // recursive listings want the whole subtree flat.
                delimiter: (!recursive).then(|| "/".to_string()),
                continuation_token: continuation_token.take(),
            })
            .await?;

        for entry in page.entries {
            // Some uploaders create a marker object for the directory
            // itself; it is not content. Always compared against the
            // slash-terminated prefix.
            if entry.key == prefix {
                continue;
            }
            if !seen.insert(entry.key.clone()) {
                continue;
            }

            let is_dir = entry.size == 0 && entry.key.ends_with('/');
            if is_dir {
                discovered_dirs.push(entry.key.clone());
            }
            items.push(Item {
                key: entry.key,
                last_modified: entry.last_modified,
                is_dir,
            });
        }

        for common_prefix in page.common_prefixes {
            if seen.insert(common_prefix.clone()) {
                items.push(Item::dir(common_prefix));
            }
        }

        if !page.is_truncated {
            break;
        }
        continuation_token = page.next_token;
    }

    Ok(discovered_dirs)
}
