//! Table construction: metadata deduplication and per-protocol indexing.

use ahash::AHashMap;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use crate::config::Enricher;
use crate::entity::{Entity, V4Entity, V6Entity};
use crate::error::{Error, RecordError, Result};
use crate::meta::Meta;
use crate::protocol::{IpKey, Protocol};
use crate::record::{Fingerprint, RangeRecord};
use crate::stats::LoadStats;
use crate::table::Table;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Accumulates range records into working lists for one load.
///
/// Deduplication spans everything pushed into the same builder, so a batch
/// of files shares one metadata list. Entities are appended in the order
/// they are pushed; nothing is sorted.
pub struct TableBuilder<E = ()> {
    v4: Vec<V4Entity>,
    v6: Vec<V6Entity>,
    metas: Vec<Arc<Meta<E>>>,
    fingerprints: AHashMap<Fingerprint, u32>,
    enricher: Option<Enricher<E>>,
    stats: LoadStats,
}

impl<E> TableBuilder<E> {
    /// Create an empty builder.
    pub fn new(enricher: Option<Enricher<E>>) -> Self {
        Self {
            v4: Vec::new(),
            v6: Vec::new(),
            metas: Vec::new(),
            fingerprints: AHashMap::new(),
            enricher,
            stats: LoadStats::default(),
        }
    }

    /// Parse one line and add it to the table.
    pub fn push_line(&mut self, line: &str) -> std::result::Result<Protocol, RecordError> {
        let record = RangeRecord::parse(line)?;
        self.push_record(&record)
    }

    /// Add a parsed record to the table.
    ///
    /// Records whose start address cannot be classified or whose metadata
    /// columns are all empty are rejected without touching the table.
    pub fn push_record(&mut self, record: &RangeRecord) -> std::result::Result<Protocol, RecordError> {
        let key = record.key()?;
        let fingerprint = record.fingerprint()?;
        let meta_index = self.intern(record, fingerprint);

        match key {
            IpKey::V4(key) => {
                if self.v4.last().is_some_and(|last| last.key() > key) {
                    self.note_out_of_order(&record.start_ip);
                }
                self.v4.push(Entity::new(key, meta_index));
            }
            IpKey::V6(key) => {
                if self.v6.last().is_some_and(|last| last.key() > key) {
                    self.note_out_of_order(&record.start_ip);
                }
                self.v6.push(Entity::new(key, meta_index));
            }
        }

        Ok(key.protocol())
    }

    /// Stream every line of `reader` into the table.
    ///
    /// Line errors are logged against `source` and skipped. Only a failed
    /// read aborts.
    pub fn read_from<R: BufRead>(&mut self, mut reader: R, source: &str) -> Result<()> {
        let mut buf = Vec::new();
        let mut line_no = 0u64;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = String::from_utf8_lossy(&buf);
            if line.trim_end_matches(|c| c == '\r' || c == '\n').is_empty() {
                continue;
            }

            self.stats.lines += 1;
            if let Err(e) = self.push_line(&line) {
                self.stats.skipped += 1;
                log::warn!("{}:{}: skipping line: {}", source, line_no, e);
            }
        }

        self.stats.files += 1;
        Ok(())
    }

    /// Open a data file and stream it into the table.
    ///
    /// Gzip-compressed files are detected by their magic bytes and
    /// decompressed on the fly. Every member of a multi-member gzip file
    /// is read.
    pub fn read_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);
        let source = path.display().to_string();

        if is_gzip(reader.fill_buf()?) {
            log::debug!("Reading gzip data file {}", source);
            self.read_from(BufReader::new(MultiGzDecoder::new(reader)), &source)
        } else {
            log::debug!("Reading data file {}", source);
            self.read_from(reader, &source)
        }
    }

    /// Read a whole batch of files in order.
    pub fn read_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        for path in paths {
            self.read_file(path.as_ref())?;
        }
        Ok(())
    }

    /// Number of distinct metadata values interned so far.
    pub fn meta_count(&self) -> usize {
        self.metas.len()
    }

    /// Freeze the working lists into a table.
    pub fn finish(self) -> Table<E> {
        let mut stats = self.stats;
        stats.v4_entities = self.v4.len();
        stats.v6_entities = self.v6.len();
        stats.metas = self.metas.len();
        stats.loaded_at = Some(SystemTime::now());

        if stats.out_of_order > 0 {
            log::warn!(
                "{} range starts are out of order; lookups near them may be wrong",
                stats.out_of_order
            );
        }

        Table::new(self.v4, self.v6, self.metas, stats)
    }

    fn intern(&mut self, record: &RangeRecord, fingerprint: Fingerprint) -> u32 {
        if let Some(&index) = self.fingerprints.get(&fingerprint) {
            return index;
        }

        let mut meta = record.to_meta();
        if let Some(ref enricher) = self.enricher {
            meta.extension = Some(enricher(&meta));
        }

        let index = self.metas.len() as u32;
        self.metas.push(Arc::new(meta));
        self.fingerprints.insert(fingerprint, index);
        index
    }

    fn note_out_of_order(&mut self, start_ip: &str) {
        self.stats.out_of_order += 1;
        log::debug!("Range start {} is lower than its predecessor", start_ip);
    }
}

impl<E> Default for TableBuilder<E> {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Check if data is gzip compressed.
fn is_gzip(data: &[u8]) -> bool {
    data.len() >= GZIP_MAGIC.len() && data[..GZIP_MAGIC.len()] == GZIP_MAGIC
}
