use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Error, Result, dynamic::StatusView};

/// Phase reported by pods that ran to completion.
pub const SUCCEEDED: &str = "Succeeded";
/// Label `Succeeded` is shown under, as `kubectl get pods` does.
pub const COMPLETED: &str = "Completed";

/// Pod counts per status label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub statuses: BTreeMap<String, usize>,
    pub total: usize,
}

impl StatusTally {
    pub fn count(&self, label: &str) -> usize {
        self.statuses.get(label).copied().unwrap_or_default()
    }
}

/// Maps a raw phase to the label it is displayed and counted under.
pub fn display_label(phase: &str) -> &str {
    if phase == SUCCEEDED { COMPLETED } else { phase }
}

/// Count `records` by their `status.phase`.
///
/// # Errors
/// Returns [`Error::MalformedRecord`] for the first record without a string
/// `status.phase`; no partial tally is returned.
pub fn aggregate<R: StatusView>(records: &[R]) -> Result<StatusTally> {
    let mut tally = StatusTally::default();
    for record in records {
        let phase = record.phase().map_err(|reason| Error::MalformedRecord {
            name: record.display_name(),
            reason,
        })?;
        *tally
            .statuses
            .entry(display_label(phase).to_string())
            .or_default() += 1;
        tally.total += 1;
    }
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::Pod;
    use kube::api::{ApiResource, DynamicObject};
    use serde_json::json;

    use super::*;

    fn pod(name: &str, phase: &str) -> DynamicObject {
        DynamicObject::new(name, &ApiResource::erase::<Pod>(&()))
            .data(json!({ "status": { "phase": phase } }))
    }

    #[test]
    fn counts_by_display_label() {
        let records = vec![
            pod("a", "Running"),
            pod("b", "Running"),
            pod("c", "Succeeded"),
            pod("d", "Failed"),
        ];
        let tally = aggregate(&records).unwrap();

        assert_eq!(tally.count("Running"), 2);
        assert_eq!(tally.count("Completed"), 1);
        assert_eq!(tally.count("Failed"), 1);
        assert_eq!(tally.count("Succeeded"), 0);
        assert_eq!(tally.statuses.len(), 3);
        assert_eq!(tally.total, 4);
    }

    #[test]
    fn empty_input_gives_empty_tally() {
        let tally = aggregate::<DynamicObject>(&[]).unwrap();
        assert_eq!(tally, StatusTally::default());
    }

    #[test]
    fn malformed_record_aborts() {
        let broken = DynamicObject::new("broken", &ApiResource::erase::<Pod>(&()))
            .data(json!({ "status": {} }));
        let records = vec![pod("a", "Running"), broken, pod("c", "Pending")];

        match aggregate(&records) {
            Err(Error::MalformedRecord { name, reason }) => {
                assert_eq!(name, "broken");
                assert_eq!(reason, "missing status.phase");
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn null_phase_is_malformed() {
        let records = vec![
            pod("a", "Running"),
            DynamicObject::new("nullish", &ApiResource::erase::<Pod>(&()))
                .data(json!({ "status": { "phase": null } })),
        ];

        match aggregate(&records) {
            Err(Error::MalformedRecord { name, reason }) => {
                assert_eq!(name, "nullish");
                assert_eq!(reason, "status.phase is not a string");
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn labels_only_remap_succeeded() {
        assert_eq!(display_label("Succeeded"), "Completed");
        assert_eq!(display_label("Pending"), "Pending");
        assert_eq!(display_label("Unknown"), "Unknown");
    }
}
