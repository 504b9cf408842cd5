use anyhow::{Context, Result};
use log::{debug, info};

use crate::common::Catalog;
use crate::entry::parse_entry;
use crate::source::base::FeedSource;

/// Largest page the uploads feed will serve
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Fetch every upload of `username`, page by page.
///
/// A page holding exactly `page_size` entries means there may be more, so
/// the next page is requested. Anything shorter (including an empty page)
/// is taken as the last one. A provider that returns a short page before
/// the end will therefore cut the listing short.
///
/// Any fetch or parse failure aborts the whole build, discarding what was
/// collected so far.
pub fn build_catalog(source: &dyn FeedSource, username: &str, page_size: usize) -> Result<Catalog> {
    if page_size == 0 {
        anyhow::bail!("Page size must be at least 1");
    }

    let mut catalog = Catalog::new();
    let mut start_index = 1;
    loop {
        let page = source
            .fetch_page(username, start_index, page_size)
            .with_context(|| {
                format!(
                    "Failed to fetch uploads of {:?} starting at index {}",
                    username, start_index
                )
            })?;

        let count = page.entries.len();
        debug!("Got {} entries starting at index {}", count, start_index);

        for raw in &page.entries {
            catalog.insert(parse_entry(raw)?);
        }

        if count == 0 || count < page_size {
            break;
        }
        start_index += page_size;
    }

    info!("Found {} videos uploaded by {}", catalog.len(), username);
    Ok(catalog)
}
