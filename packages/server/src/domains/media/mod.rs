//! Media domain - streams externally hosted assets to the browser.

pub mod relay;

pub use relay::{stream_asset, validate_asset_id, RelayedMedia, FORWARDED_HEADERS};
