use crate::model::{Connection, Delivery, Segment};

/// The owner of the funnel record. The timeline hands it every committed
/// state; persisting and timestamping are its job. Calls are fire-and-forget:
/// an error is logged by the caller and the local state is kept.
pub trait FunnelStore {
    fn update(&mut self, deliveries: &[Delivery], connections: &[Connection]) -> anyhow::Result<()>;

    fn update_segments(&mut self, _segments: &[Segment]) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Keeps the last committed state in memory and counts commits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub deliveries: Vec<Delivery>,
    pub connections: Vec<Connection>,
    pub segments: Vec<Segment>,
    pub updates: usize,
}

impl FunnelStore for MemoryStore {
    fn update(&mut self, deliveries: &[Delivery], connections: &[Connection]) -> anyhow::Result<()> {
        self.deliveries = deliveries.to_vec();
        self.connections = connections.to_vec();
        self.updates += 1;
        Ok(())
    }

    fn update_segments(&mut self, segments: &[Segment]) -> anyhow::Result<()> {
        self.segments = segments.to_vec();
        Ok(())
    }
}
