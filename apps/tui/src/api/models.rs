use serde::{Deserialize, Serialize};

use crate::domain::AlertLevel;

/// One alert record from the analysis service. Every field is
/// tolerant of absence; the service has shipped several shapes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Alert {
    #[serde(rename = "AlertId", default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    #[serde(default)]
    pub alert_level: AlertLevel,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rekognition: Option<Rekognition>,
}

impl Alert {
    /// Stable-ish identity for list rendering; falls back to the
    /// positional index when the service omitted the id.
    pub fn display_id(&self, index: usize) -> String {
        self.alert_id
            .clone()
            .unwrap_or_else(|| index.to_string())
    }

    pub fn suspicious(&self) -> &[String] {
        self.rekognition
            .as_ref()
            .map_or(&[], |r| r.suspicious.as_slice())
    }

    pub fn labels(&self) -> &[LabelEntry] {
        self.rekognition
            .as_ref()
            .map_or(&[], |r| r.labels.as_slice())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Rekognition {
    #[serde(default)]
    pub suspicious: Vec<String>,
    #[serde(default)]
    pub labels: Vec<LabelEntry>,
}

/// A detected object label with its confidence, already normalized.
///
/// The service emits labels in two shapes: a `["gun", 97.2]` pair or
/// an object with `name`/`Name` and `confidence`/`Confidence` fields.
/// Both collapse into this one struct at ingestion so nothing
/// downstream branches on the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelEntry {
    pub name: String,
    pub confidence: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelShape {
    Pair(String, f64),
    Fields {
        #[serde(alias = "Name")]
        name: String,
        #[serde(alias = "Confidence")]
        confidence: f64,
    },
}

impl<'de> Deserialize<'de> for LabelEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match LabelShape::deserialize(deserializer)? {
            LabelShape::Pair(name, confidence)
            | LabelShape::Fields { name, confidence } => Ok(Self { name, confidence }),
        }
    }
}

/// Pre-signed target issued by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadGrant {
    #[serde(rename = "uploadUrl")]
    pub upload_url: String,
}

/// Headline numbers for the stat cards and headless summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertStats {
    pub total: usize,
    pub high: usize,
    pub normal: usize,
}

impl AlertStats {
    pub fn collect(alerts: &[Alert]) -> Self {
        let high = alerts
            .iter()
            .filter(|alert| alert.alert_level.is_high())
            .count();
        let normal = alerts
            .iter()
            .filter(|alert| alert.alert_level == AlertLevel::Normal)
            .count();

        Self {
            total: alerts.len(),
            high,
            normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Alert, AlertStats, LabelEntry};
    use crate::domain::AlertLevel;

    #[test]
    fn label_pair_and_object_shapes_normalize_identically() {
        let from_pair: LabelEntry = serde_json::from_str(r#"["gun", 97.2]"#).unwrap();
        let from_object: LabelEntry =
            serde_json::from_str(r#"{"name": "gun", "confidence": 97.2}"#).unwrap();
        let from_rekognition_casing: LabelEntry =
            serde_json::from_str(r#"{"Name": "gun", "Confidence": 97.2}"#).unwrap();

        assert_eq!(from_pair, from_object);
        assert_eq!(from_pair, from_rekognition_casing);
        assert_eq!(from_pair.name, "gun");
        assert!((from_pair.confidence - 97.2).abs() < f64::EPSILON);
    }

    #[test]
    fn alert_tolerates_missing_fields() {
        let alert: Alert = serde_json::from_str(r#"{"key": "gun_01.jpg"}"#).unwrap();
        assert_eq!(alert.alert_id, None);
        assert_eq!(alert.alert_level, AlertLevel::Normal);
        assert_eq!(alert.display_id(7), "7");
        assert!(alert.suspicious().is_empty());
        assert!(alert.labels().is_empty());
    }

    #[test]
    fn stats_count_levels() {
        let alerts: Vec<Alert> = serde_json::from_str(
            r#"[
                {"AlertId": "1", "alert_level": "HIGH", "key": "gun_01.jpg"},
                {"AlertId": "2", "alert_level": "NORMAL", "key": "street_02.jpg"},
                {"AlertId": "3", "alert_level": "HIGH", "key": "knife_03.jpg"}
            ]"#,
        )
        .unwrap();

        let stats = AlertStats::collect(&alerts);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.normal, 1);
    }
}
