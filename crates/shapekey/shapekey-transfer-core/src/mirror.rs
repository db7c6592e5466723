//! Driver mirroring between channels present on both meshes.
//!
//! For each shared channel name whose source weight carries drivers, every
//! target driver on that weight is removed and the source drivers are
//! recreated (full replace, never merge). Variable target fields are copied
//! one at a time; fields the target does not support are skipped.

use hashbrown::HashSet;
use log::{debug, warn};

use crate::driver::{DriverDefinition, DriverId, TargetField};
use crate::error::{Result, TransferError};
use crate::host::{ChannelStore, DriverStore, BASIS};
use crate::path::ChannelPath;
use crate::report::DriverTransferSummary;

/// Non-basis channel names present on both meshes, in source order.
pub fn matching_channels<T, S>(target: &T, source: &S) -> Vec<String>
where
    T: ChannelStore + ?Sized,
    S: ChannelStore + ?Sized,
{
    let on_target: HashSet<String> = target
        .channel_names()
        .into_iter()
        .filter(|n| n != BASIS)
        .collect();
    source
        .channel_names()
        .into_iter()
        .filter(|n| n != BASIS && on_target.contains(n))
        .collect()
}

/// Drivers on `store` whose target path is the weight of channel `name`.
pub fn drivers_for<D>(store: &D, name: &str) -> Vec<(DriverId, DriverDefinition)>
where
    D: DriverStore + ?Sized,
{
    store
        .list_drivers()
        .into_iter()
        .filter(|(_, def)| ChannelPath::addresses(&def.target_path, name))
        .collect()
}

/// Copy driver definitions for every channel shared by `source` and `target`.
pub fn transfer_drivers<T, S>(target: Option<&mut T>, source: Option<&S>) -> Result<DriverTransferSummary>
where
    T: ChannelStore + DriverStore + ?Sized,
    S: ChannelStore + DriverStore + ?Sized,
{
    let (target, source) = match (target, source) {
        (Some(t), Some(s)) => (t, s),
        _ => return Err(TransferError::MissingEndpoint),
    };
    if !source.has_deforming_channels() {
        return Err(TransferError::SourceHasNoChannels);
    }
    if !target.has_deforming_channels() {
        return Err(TransferError::TargetHasNoChannels);
    }

    let matching = matching_channels(&*target, source);
    if matching.is_empty() {
        return Err(TransferError::NoMatchingChannels);
    }

    let mut summary = DriverTransferSummary {
        matching_channels: matching.len(),
        ..Default::default()
    };

    for name in &matching {
        let source_drivers = drivers_for(source, name);
        if source_drivers.is_empty() {
            summary.channels_without_drivers += 1;
            continue;
        }

        for (id, _) in drivers_for(&*target, name) {
            target.remove_driver(id);
        }

        let path = ChannelPath::weight(name.as_str());
        for (_, def) in &source_drivers {
            summary.fields_skipped += copy_driver(target, &path, def);
            summary.drivers_transferred += 1;
        }
        debug!(
            "replaced drivers on '{name}' with {} from source",
            source_drivers.len()
        );
    }

    Ok(summary)
}

/// Recreate `def` on `target` at `path`. Returns the number of skipped
/// variable target fields.
fn copy_driver<T>(target: &mut T, path: &ChannelPath, def: &DriverDefinition) -> usize
where
    T: DriverStore + ?Sized,
{
    let id = target.add_driver(path, def.kind);
    target.set_expression(id, &def.expression);

    let mut skipped = 0;
    for var in &def.variables {
        let Some(index) = target.add_variable(id, &var.name, var.kind) else {
            warn!("driver on {path} refused variable '{}'", var.name);
            continue;
        };
        let slots = target.target_slots(id, index).min(var.targets.len());
        for (slot, src) in var.targets.iter().take(slots).enumerate() {
            for field in TargetField::ALL {
                if target.supports_field(id, index, slot, field) {
                    target.set_target_field(id, index, slot, src.value_of(field));
                } else {
                    skipped += 1;
                }
            }
        }
    }
    if skipped > 0 {
        debug!("skipped {skipped} unsupported target fields on {path}");
    }
    skipped
}
