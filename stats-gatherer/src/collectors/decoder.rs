use crate::{
    error::CollectError,
    metrics::{
        ClusterIdentity,
        EntityGroup,
        EntityRecord,
        TimeWindow,
    },
    session::{
        PerfQueryClient,
        PerfQuerySpec,
    },
};
use tracing::{
    debug,
    info,
};

/// Issues one wildcard performance query per entity group.
pub struct ResponseDecoder<'a, C: PerfQueryClient + ?Sized> {
    client: &'a C,
    groups: &'a [EntityGroup],
}

impl<'a, C: PerfQueryClient + ?Sized> ResponseDecoder<'a, C> {
    pub fn new(client: &'a C, groups: &'a [EntityGroup]) -> Self {
        Self { client, groups }
    }

    /// Concatenates the records of all groups in group order, keeping the
    /// order the endpoint returned within each group.
    ///
    /// The first failing query aborts the whole fetch and nothing is
    /// returned: a failed query means the session is unusable.
    pub async fn fetch_all(
        &self,
        cluster: &ClusterIdentity,
        window: &TimeWindow,
    ) -> Result<Vec<EntityRecord>, CollectError> {
        debug!(cluster = %cluster.name, %window, "Querying vSAN performance data");

        let mut records = Vec::new();
        for &group in self.groups {
            let spec = PerfQuerySpec::wildcard(group, window);
            let returned = self
                .client
                .query_perf(cluster, &spec)
                .await
                .map_err(|cause| CollectError::Query { group, cause })?;

            let series: usize = returned.iter().map(|record| record.series.len()).sum();
            info!(cluster = %cluster.name, %group, records = returned.len(), series, "Fetched performance data");
            for record in &returned {
                debug!(entity = %record.entity_ref_id, series = record.series.len(), "Fetched entity");
            }

            records.extend(returned);
        }

        Ok(records)
    }
}
