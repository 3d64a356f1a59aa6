use crate::error::Diagnostic;
use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    Display,
    EnumString,
};

/// A class of monitored vSAN objects sharing one metric schema.
#[derive(Debug, Clone, Copy, Display, EnumString, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntityGroup {
    ClusterDomclient,
    HostDomclient,
    CacheDisk,
    VsanVnicNet,
    VsanPnicNet,
}

/// Groups queried when nothing else is configured, in query order.
pub const DEFAULT_ENTITY_GROUPS: [EntityGroup; 5] = [
    EntityGroup::ClusterDomclient,
    EntityGroup::HostDomclient,
    EntityGroup::CacheDisk,
    EntityGroup::VsanVnicNet,
    EntityGroup::VsanPnicNet,
];

impl EntityGroup {
    /// Entity filter matching every instance of this group, e.g. `cache-disk:*`.
    pub fn wildcard(&self) -> String {
        format!("{self}:*")
    }
}

/// `<entityKind>:<instanceUUID>` as returned for every concrete instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeId {
    entity_kind: String,
    uuid: String,
}

impl CompositeId {
    /// Splits on the first `:`. Both halves must be non-empty.
    pub fn parse(raw: &str) -> Result<Self, Diagnostic> {
        match raw.split_once(':') {
            Some((kind, uuid)) if !kind.is_empty() && !uuid.is_empty() => Ok(Self {
                entity_kind: kind.to_string(),
                uuid: uuid.to_string(),
            }),
            _ => Err(Diagnostic::MalformedCompositeId { raw: raw.to_string() }),
        }
    }

    pub fn entity_kind(&self) -> &str {
        &self.entity_kind
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// `<entityKind>_<metricLabel>`
    pub fn field_name(&self, metric_label: &str) -> String {
        format!("{}_{}", self.entity_kind, metric_label)
    }
}

/// One item of a performance query response.
///
/// The JSON shape mirrors the management endpoint:
///
/// ```json
/// {
///   "entityRefId": "cluster-domclient:5270dc4d-3594-cc26-b33d-f6be33ddb353",
///   "sampleInfo": "2017-06-14 23:10:00,2017-06-14 23:15:00",
///   "value": [
///     { "metricId": { "label": "iopsRead", "metricsCollectInterval": 300 }, "values": "1,1" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub entity_ref_id: String,
    /// Comma-joined sample axis shared by every series of the record.
    #[serde(default)]
    pub sample_info: String,
    #[serde(rename = "value", default)]
    pub series: Vec<MetricSeries>,
}

impl EntityRecord {
    pub fn new(entity_ref_id: impl Into<String>, sample_info: impl Into<String>, series: Vec<MetricSeries>) -> Self {
        Self {
            entity_ref_id: entity_ref_id.into(),
            sample_info: sample_info.into(),
            series,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    pub metric_id: MetricId,
    /// Comma-joined decimal strings, one per sample.
    #[serde(default)]
    pub values: String,
}

impl MetricSeries {
    pub fn new(label: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            metric_id: MetricId {
                label: label.into(),
                metrics_collect_interval: None,
            },
            values: values.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.metric_id.label
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetricId {
    pub label: String,
    /// Sampling interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_collect_interval: Option<u32>,
}
