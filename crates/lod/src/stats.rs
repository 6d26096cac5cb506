use std::time::Duration;

/// Per-rebuild statistics for instrumentation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStats {
    /// Nodes stored in the flattened list.
    pub node_count: usize,
    pub leaf_count: usize,
    /// Candidates rejected by the frustum test.
    pub culled_count: usize,
    /// Candidates that were split but lost every child to culling.
    pub discarded_count: usize,
    /// Deepest stored level below the root.
    pub max_depth: usize,
    /// Number of leaves at each LOD level.
    pub lod_histogram: Vec<usize>,
    pub build_time: Duration,
}

impl BuildStats {
    pub(crate) fn new(lod_count: u32) -> Self {
        Self {
            lod_histogram: vec![0; lod_count as usize],
            ..Self::default()
        }
    }

    pub(crate) fn record_leaf(&mut self, lod: u32) {
        self.leaf_count += 1;
        if let Some(slot) = self.lod_histogram.get_mut(lod as usize) {
            *slot += 1;
        }
    }
}

impl std::fmt::Display for BuildStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nodes={} leaves={} culled={} discarded={} depth={} lods={:?} time={:?}",
            self.node_count,
            self.leaf_count,
            self.culled_count,
            self.discarded_count,
            self.max_depth,
            self.lod_histogram,
            self.build_time
        )
    }
}
