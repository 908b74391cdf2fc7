//! Lane activation planning.
//!
//! Ten lettered lanes each gate five sub-lanes. A sub-lane is active when its
//! lane's branch toggle is truthy and a prompt is linked for that sub-lane,
//! looked up on the primary record first and then on the workflow record.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aliases::{keys, AliasCatalog};
use crate::record::{FieldValue, SourceRecord};
use crate::resolve::{resolve, resolve_truthy};

/// Top-level lanes, in planning order.
pub const LANES: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];

/// Sub-lane suffixes, in planning order. `A` + `1.1` is sub-lane `A1.1`.
pub const SUB_LANES: [&str; 5] = ["1.1", "2.1", "3.1", "4.1", "5.1"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneActivation {
    pub lane: String,
    pub enabled: bool,
}

impl LaneActivation {
    fn enabled(lane: String) -> Self {
        Self {
            lane,
            enabled: true,
        }
    }
}

/// Plans lane activation against an alias catalog.
pub struct LanePlanner<'c> {
    catalog: &'c AliasCatalog,
}

impl<'c> LanePlanner<'c> {
    pub fn new(catalog: &'c AliasCatalog) -> Self {
        Self { catalog }
    }

    /// Ordered list of activated sub-lanes, lane-major then sub-lane-minor.
    ///
    /// Without a workflow record nothing activates, whatever the toggles say.
    pub fn plan(
        &self,
        primary: &SourceRecord,
        workflow: Option<&SourceRecord>,
    ) -> Vec<LaneActivation> {
        let Some(workflow) = workflow else {
            debug!(record = %primary.id, "No workflow record; lane plan is empty");
            return Vec::new();
        };

        let mut plan = Vec::new();
        for lane in LANES {
            let toggle = self.catalog.aliases(&keys::branch_toggle(lane));
            if !resolve_truthy(Some(primary), toggle) {
                continue;
            }
            for suffix in SUB_LANES {
                let sub_lane = format!("{lane}{suffix}");
                if self.has_prompt(&sub_lane, primary, workflow) {
                    plan.push(LaneActivation::enabled(sub_lane));
                }
            }
        }

        debug!(
            record = %primary.id,
            workflow = %workflow.id,
            active = plan.len(),
            "Lane plan built"
        );
        plan
    }

    fn has_prompt(&self, sub_lane: &str, primary: &SourceRecord, workflow: &SourceRecord) -> bool {
        let aliases = self.catalog.aliases(&keys::prompt(sub_lane));
        let linked = |record: &SourceRecord| {
            resolve(Some(record), aliases).is_some_and(FieldValue::is_non_empty)
        };
        linked(primary) || linked(workflow)
    }
}

/// Convenience wrapper over [`LanePlanner::plan`].
pub fn plan_lanes(
    catalog: &AliasCatalog,
    primary: &SourceRecord,
    workflow: Option<&SourceRecord>,
) -> Vec<LaneActivation> {
    LanePlanner::new(catalog).plan(primary, workflow)
}
