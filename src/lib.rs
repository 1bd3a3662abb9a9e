//! ipgeo - In-memory IP range table for location and ISP lookups.
//!
//! This crate resolves IP addresses to location and ISP metadata using a
//! table built from flat, tab-separated range files.
//!
//! # Features
//!
//! - **Floor search**: Each address maps to the range with the greatest start
//!   address not above it, via binary search over sorted start keys
//! - **IPv4 and IPv6**: Separate index lists per protocol; IPv4-mapped IPv6
//!   addresses are searched as IPv4
//! - **Metadata deduplication**: Identical location/ISP/AS columns share one
//!   metadata value across the whole load
//! - **Enrichment**: An optional callback attaches a custom value to each
//!   distinct metadata
//! - **All-or-nothing reload**: A failed load never disturbs the live table
//! - **Thread-safe hot reload**: [`SharedStore`] serves lookups while reloading
//!
//! # Quick Start
//!
//! ```ignore
//! use ipgeo::{Store, StoreConfig};
//!
//! let mut store = Store::new();
//! store.load_data(StoreConfig::new(["ipv6.txt", "ipv4.txt"]))?;
//!
//! match store.search_str("1.30.13.90") {
//!     Some(meta) => println!("{} {} {}", meta.country, meta.province, meta.city),
//!     None => println!("not found"),
//! }
//! ```
//!
//! # Range File Format
//!
//! One range per line, twelve tab-separated columns:
//!
//! ```text
//! start_ip  end_ip  netmask  country  province  city  region  front_isp  backbone_isp  as_id  comment  type
//! ```
//!
//! `NULL` marks an absent comment or type. Ranges must be sorted by start
//! address within each protocol and must not overlap; the store does not
//! sort or merge them. Gzip-compressed files are accepted.
//!
//! # Enrichment
//!
//! ```ignore
//! use ipgeo::{SharedStore, StoreConfig};
//!
//! let store = SharedStore::new();
//! store.load(
//!     StoreConfig::new(["ipv4.txt"])
//!         .with_enricher(|meta| format!("{}-{}", meta.province, meta.city)),
//! )?;
//!
//! let label = store.search("1.30.13.90").and_then(|m| m.extension().cloned());
//! ```

mod builder;
mod config;
mod entity;
mod error;
mod meta;
mod protocol;
mod record;
mod shared;
mod stats;
mod store;
mod table;

// Re-export core types
pub use error::{Error, RecordError, Result};
pub use meta::{Meta, NULL_FIELD};
pub use record::{Fingerprint, RangeRecord};

// Re-export classification
pub use protocol::{classify, classify_str, IpKey, Protocol};

// Re-export index types
pub use entity::{floor_search, Entity, V4Entity, V6Entity};

// Re-export store types
pub use builder::TableBuilder;
pub use config::{Enricher, StoreConfig, StoreOptions};
pub use shared::{CacheStats, SharedStore, DEFAULT_CACHE_CAPACITY};
pub use stats::LoadStats;
pub use store::Store;
pub use table::Table;
