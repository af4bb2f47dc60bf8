//! Lifecycle counters exposed in Prometheus text format.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

use domains::ComplaintStatus;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct StatusLabels {
    pub status: String,
}

#[derive(Debug)]
pub struct Metrics {
    registry: Registry,
    complaints_submitted: Counter,
    status_changes: Family<StatusLabels, Counter>,
    replies_added: Counter,
    complaints_deleted: Counter,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("complaint_desk");

        let complaints_submitted = Counter::default();
        registry.register(
            "complaints_submitted",
            "Complaints submitted by students",
            complaints_submitted.clone(),
        );

        let status_changes = Family::<StatusLabels, Counter>::default();
        registry.register(
            "status_changes",
            "Status changes applied by administrators, by target status",
            status_changes.clone(),
        );

        let replies_added = Counter::default();
        registry.register(
            "replies_added",
            "Administrator replies attached to complaints",
            replies_added.clone(),
        );

        let complaints_deleted = Counter::default();
        registry.register(
            "complaints_deleted",
            "Complaints deleted together with their replies",
            complaints_deleted.clone(),
        );

        Self {
            registry,
            complaints_submitted,
            status_changes,
            replies_added,
            complaints_deleted,
        }
    }

    pub fn complaint_submitted(&self) {
        self.complaints_submitted.inc();
    }

    pub fn status_changed(&self, to: ComplaintStatus) {
        self.status_changes
            .get_or_create(&StatusLabels {
                status: to.as_str().to_string(),
            })
            .inc();
    }

    pub fn reply_added(&self) {
        self.replies_added.inc();
    }

    pub fn complaint_deleted(&self) {
        self.complaints_deleted.inc();
    }

    /// Text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}
