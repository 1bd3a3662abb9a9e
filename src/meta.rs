//! Location and ISP metadata shared by one or more address ranges.

use serde::Serialize;
use std::fmt;

/// Token marking an absent optional column in range files.
pub const NULL_FIELD: &str = "NULL";

/// Location and ISP information for a range.
///
/// Distinct values are interned once per load; entities refer to them by
/// index. `extension` holds whatever the configured enricher returned and
/// is never changed after the load that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meta<E = ()> {
    pub country: String,
    pub province: String,
    pub city: String,
    pub region: String,
    pub front_isp: String,
    pub backbone_isp: String,
    pub as_id: i64,
    pub comment: Option<String>,
    #[serde(rename = "type")]
    pub net_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<E>,
}

impl<E> Meta<E> {
    /// Returns `true` if every location, ISP and AS id field is empty.
    pub fn is_empty(&self) -> bool {
        self.country.is_empty()
            && self.province.is_empty()
            && self.city.is_empty()
            && self.region.is_empty()
            && self.front_isp.is_empty()
            && self.backbone_isp.is_empty()
            && self.as_id == 0
    }

    /// Serialize to the tab-separated column layout of range files,
    /// starting at the country column.
    ///
    /// Absent comment and type are written as `NULL`.
    pub fn to_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.country,
            self.province,
            self.city,
            self.region,
            self.front_isp,
            self.backbone_isp,
            self.as_id,
            self.comment.as_deref().unwrap_or(NULL_FIELD),
            self.net_type.as_deref().unwrap_or(NULL_FIELD),
        )
    }

    /// Get the enricher output, if any.
    pub fn extension(&self) -> Option<&E> {
        self.extension.as_ref()
    }
}

impl<E> fmt::Display for Meta<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "country:{:?} province:{:?} city:{:?} region:{:?} ISP:{:?} backboneISP:{:?} asid:{}",
            self.country,
            self.province,
            self.city,
            self.region,
            self.front_isp,
            self.backbone_isp,
            self.as_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Meta {
        Meta {
            country: "China".to_string(),
            province: "Guangdong".to_string(),
            city: "Shenzhen".to_string(),
            region: "South".to_string(),
            front_isp: "Telecom".to_string(),
            backbone_isp: "ChinaNet".to_string(),
            as_id: 4134,
            comment: None,
            net_type: Some("idc".to_string()),
            extension: None,
        }
    }

    #[test]
    fn test_to_line_uses_null_sentinel() {
        assert_eq!(
            sample().to_line(),
            "China\tGuangdong\tShenzhen\tSouth\tTelecom\tChinaNet\t4134\tNULL\tidc"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample().to_string(),
            "country:\"China\" province:\"Guangdong\" city:\"Shenzhen\" region:\"South\" \
             ISP:\"Telecom\" backboneISP:\"ChinaNet\" asid:4134"
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(!sample().is_empty());

        let mut meta = sample();
        meta.country.clear();
        meta.province.clear();
        meta.city.clear();
        meta.region.clear();
        meta.front_isp.clear();
        meta.backbone_isp.clear();
        assert!(!meta.is_empty());

        meta.as_id = 0;
        assert!(meta.is_empty());
    }

    #[test]
    fn test_serialize_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["city"], "Shenzhen");
        assert_eq!(json["type"], "idc");
        assert!(json["comment"].is_null());
        assert!(json.get("extension").is_none());
    }
}
