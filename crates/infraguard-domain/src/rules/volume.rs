use super::{Rule, RuleContext, display_number, number_json};
use crate::access::{RuleFault, Volume};
use crate::model::ResourceKind;
use infraguard_types::{EnforcementLevel, Violation, ids};
use serde_json::json;

const MIN_SIZE_GB: f64 = 1.0;
const LARGE_SIZE_GB: f64 = 100.0;

pub struct VolumeBackupStrategy;

impl Rule for VolumeBackupStrategy {
    fn name(&self) -> &'static str {
        ids::RULE_VOLUME_BACKUP_STRATEGY
    }

    fn description(&self) -> &'static str {
        "Volumes should document a backup strategy"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Volume
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        let description = Volume::of(ctx.resource).description()?;
        let documented = description.is_some_and(|d| d.to_lowercase().contains("backup"));
        if !documented {
            out.push(ctx.violation(
                ids::CODE_NO_BACKUP_STRATEGY,
                "Volume should document a backup strategy; consider snapshots or external backups for disaster recovery".to_string(),
                "Mention the backup approach in the volume `description`.",
                json!({ "description": description }),
            ));
        }
        Ok(())
    }
}

pub struct VolumeMinimumSize;

impl Rule for VolumeMinimumSize {
    fn name(&self) -> &'static str {
        ids::RULE_VOLUME_MINIMUM_SIZE
    }

    fn description(&self) -> &'static str {
        "Volumes must be at least 1 GB"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Mandatory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Volume
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        let Some(size) = Volume::of(ctx.resource).size()? else {
            return Ok(());
        };
        if size < MIN_SIZE_GB {
            out.push(ctx.violation(
                ids::CODE_VOLUME_TOO_SMALL,
                format!("Volume size {} GB is below the 1 GB minimum", display_number(size)),
                "Set `size` to at least 1.",
                json!({ "size": number_json(size) }),
            ));
        }
        Ok(())
    }
}

pub struct VolumeSizeCostAwareness;

impl Rule for VolumeSizeCostAwareness {
    fn name(&self) -> &'static str {
        ids::RULE_VOLUME_SIZE_COST_AWARENESS
    }

    fn description(&self) -> &'static str {
        "Warns about very large volumes"
    }

    fn enforcement_level(&self) -> EnforcementLevel {
        EnforcementLevel::Advisory
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Volume
    }

    fn evaluate(&self, ctx: &RuleContext<'_>, out: &mut Vec<Violation>) -> Result<(), RuleFault> {
        let Some(size) = Volume::of(ctx.resource).size()? else {
            return Ok(());
        };
        if size > LARGE_SIZE_GB {
            out.push(ctx.violation(
                ids::CODE_LARGE_VOLUME,
                format!(
                    "Volume with {} GB is relatively large; check that this capacity is really needed",
                    display_number(size)
                ),
                "Volumes can be grown later; start smaller.",
                json!({ "size": number_json(size) }),
            ));
        }
        Ok(())
    }
}
