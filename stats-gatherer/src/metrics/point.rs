use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;

/// Measurement every vSAN point is written under.
pub const VSAN_MEASUREMENT: &str = "vsphere_cluster_vsan";

/// Tag key carrying the instance part of the composite id.
pub const UUID_TAG: &str = "uuid";

pub type Tags = BTreeMap<String, String>;

/// Identity of one cluster as supplied by the inventory walker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterIdentity {
    pub vcenter: String,
    pub datacenter: String,
    pub name: String,
    /// Managed object reference value.
    pub moid: String,
}

impl ClusterIdentity {
    /// Tag set shared by every point of one collection invocation.
    pub fn tags(&self) -> Tags {
        Tags::from([
            ("vcenter".to_string(), self.vcenter.clone()),
            ("dcname".to_string(), self.datacenter.clone()),
            ("clustername".to_string(), self.name.clone()),
            ("moid".to_string(), self.moid.clone()),
            ("source".to_string(), self.name.clone()),
        ])
    }
}

/// One metric value at one instant with its full tag context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedPoint {
    pub measurement: String,
    pub field: String,
    pub tags: Tags,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl NormalizedPoint {
    pub fn new(field: String, tags: Tags, timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            measurement: VSAN_MEASUREMENT.to_string(),
            field,
            tags,
            timestamp,
            value,
        }
    }

    /// Single-entry field mapping as handed to the sink.
    pub fn fields(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([(self.field.clone(), self.value)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cluster_tags() {
        let cluster = ClusterIdentity {
            vcenter: "vc01".to_string(),
            datacenter: "dc1".to_string(),
            name: "prod".to_string(),
            moid: "domain-c7".to_string(),
        };
        let tags = cluster.tags();
        assert_eq!(
            tags.into_iter().collect::<Vec<_>>(),
            vec![
                ("clustername".to_string(), "prod".to_string()),
                ("dcname".to_string(), "dc1".to_string()),
                ("moid".to_string(), "domain-c7".to_string()),
                ("source".to_string(), "prod".to_string()),
                ("vcenter".to_string(), "vc01".to_string()),
            ]
        );
    }
}
