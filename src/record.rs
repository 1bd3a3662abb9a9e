//! Range record parsing.
//!
//! One line of a range file is twelve tab-separated columns:
//!
//! ```text
//! start_ip  end_ip  netmask  country  province  city  region  front_isp  backbone_isp  as_id  comment  type
//! ```
//!
//! Columns past the twelfth are ignored and missing trailing columns keep
//! their empty value. `NULL` in the comment or type column means absent.

use sha2::{Digest, Sha256};
use std::net::IpAddr;

use crate::error::RecordError;
use crate::meta::{Meta, NULL_FIELD};
use crate::protocol::{classify, IpKey};

/// Content fingerprint of a record's location, ISP and AS id columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// A parsed line of a range file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeRecord {
    pub start_ip: String,
    pub end_ip: String,
    pub netmask: String,
    pub country: String,
    pub province: String,
    pub city: String,
    pub region: String,
    pub front_isp: String,
    pub backbone_isp: String,
    pub as_id: i64,
    pub comment: Option<String>,
    pub net_type: Option<String>,
    start_addr: Option<IpAddr>,
}

impl RangeRecord {
    /// Parse one line. A trailing `\n` or `\r\n` is stripped first.
    ///
    /// Only a malformed AS id fails here; an unparseable start address is
    /// reported later by [`RangeRecord::key`].
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let mut fields = line.split('\t');
        let mut next = || fields.next().unwrap_or_default();

        let start_ip = next().to_string();
        let start_addr = start_ip.parse().ok();

        Ok(Self {
            end_ip: next().to_string(),
            netmask: next().to_string(),
            country: next().to_string(),
            province: next().to_string(),
            city: next().to_string(),
            region: next().to_string(),
            front_isp: next().to_string(),
            backbone_isp: next().to_string(),
            as_id: parse_as_id(next())?,
            comment: optional(next()),
            net_type: optional(next()),
            start_ip,
            start_addr,
        })
    }

    /// Parsed start address, if the start column held one.
    pub fn start_addr(&self) -> Option<IpAddr> {
        self.start_addr
    }

    /// Search key of the range start.
    pub fn key(&self) -> Result<IpKey, RecordError> {
        self.start_addr
            .map(classify)
            .ok_or_else(|| RecordError::InvalidAddress(self.start_ip.clone()))
    }

    /// Returns `true` if every location, ISP and AS id column is empty.
    pub fn is_empty(&self) -> bool {
        self.country.is_empty()
            && self.province.is_empty()
            && self.city.is_empty()
            && self.region.is_empty()
            && self.front_isp.is_empty()
            && self.backbone_isp.is_empty()
            && self.as_id == 0
    }

    /// Fingerprint of the columns that identify a distinct [`Meta`].
    ///
    /// Comment and type are not part of it.
    pub fn fingerprint(&self) -> Result<Fingerprint, RecordError> {
        if self.is_empty() {
            return Err(RecordError::EmptyMetadata);
        }

        let mut hasher = Sha256::new();
        for field in [
            &self.country,
            &self.province,
            &self.city,
            &self.region,
            &self.front_isp,
            &self.backbone_isp,
        ] {
            hasher.update(field.as_bytes());
            // Columns never contain tabs, so this keeps "ab"+"c" apart from "a"+"bc".
            hasher.update(b"\t");
        }
        hasher.update(self.as_id.to_string().as_bytes());

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Ok(Fingerprint(digest))
    }

    /// Build the metadata this record describes, without an extension.
    pub fn to_meta<E>(&self) -> Meta<E> {
        Meta {
            country: self.country.clone(),
            province: self.province.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
            front_isp: self.front_isp.clone(),
            backbone_isp: self.backbone_isp.clone(),
            as_id: self.as_id,
            comment: self.comment.clone(),
            net_type: self.net_type.clone(),
            extension: None,
        }
    }
}

fn parse_as_id(field: &str) -> Result<i64, RecordError> {
    if field.is_empty() {
        return Ok(0);
    }
    field
        .parse()
        .map_err(|_| RecordError::InvalidAsId(field.to_string()))
}

fn optional(field: &str) -> Option<String> {
    if field == NULL_FIELD {
        None
    } else {
        Some(field.to_string())
    }
}
