//! Shape channel reconciliation: create-or-reuse target channels, write
//! relative deltas onto the target's basis, copy weights.
//!
//! Target positions are always recomputed as `target_basis + source_delta`,
//! never accumulated, so repeating a transfer is a fixed point.

use std::borrow::Cow;

use glam::Vec3;
use log::{debug, warn};

use crate::config::TransferMode;
use crate::delta::compute_delta;
use crate::error::{Result, TransferError};
use crate::host::{ChannelStore, MeshAccess, BASIS};
use crate::report::{TransferSummary, TransferWarning};
use crate::selection::VertexSelection;

/// Transfer one named channel from `source` to `target`.
///
/// In full mode the target channel is created before the vertex counts are
/// compared, so a count mismatch leaves a freshly created, basis-equal
/// channel behind. Re-running after fixing the counts reuses it.
pub fn transfer_channel<T, S>(
    target: Option<&mut T>,
    source: Option<&S>,
    name: &str,
    mode: TransferMode,
    selection: &VertexSelection,
) -> Result<TransferSummary>
where
    T: MeshAccess + ChannelStore + ?Sized,
    S: MeshAccess + ChannelStore + ?Sized,
{
    let (target, source) = endpoints(target, source)?;
    if source.channel_names().is_empty() {
        return Err(TransferError::SourceHasNoChannels);
    }
    if name == BASIS || !source.has_channel(name) {
        return Err(TransferError::ChannelNotFound {
            name: name.to_string(),
        });
    }

    let mut summary = TransferSummary::new(mode, false);
    ensure_basis(target);
    if resolve_channel(target, name)? {
        summary.created.push(name.to_string());
    }

    match mode {
        TransferMode::Full => {
            check_vertex_counts(target, source)?;
            summary.vertices_affected = write_deltas(target, source, name, selection)?;
            summary.selection_size = gated_size(source, selection);
        }
        TransferMode::NamesOnly => {
            if let Some(w) = names_only_warning(target, source) {
                summary.warnings.push(w);
            }
        }
    }

    copy_weight(target, source, name)?;
    summary.channels.push(name.to_string());
    target.mark_dirty();
    Ok(summary)
}

/// Transfer every non-basis channel of `source`, in the source's order.
///
/// The full-mode vertex count check runs once before anything is written.
/// The call is not atomic: a per-channel failure returns
/// `PartialCompletion` and leaves earlier channels written.
pub fn transfer_all_channels<T, S>(
    target: Option<&mut T>,
    source: Option<&S>,
    mode: TransferMode,
    selection: &VertexSelection,
) -> Result<TransferSummary>
where
    T: MeshAccess + ChannelStore + ?Sized,
    S: MeshAccess + ChannelStore + ?Sized,
{
    let (target, source) = endpoints(target, source)?;
    let names = source.channel_names();
    if names.is_empty() {
        return Err(TransferError::SourceHasNoChannels);
    }

    let mut summary = TransferSummary::new(mode, true);
    match mode {
        TransferMode::Full => {
            check_vertex_counts(target, source)?;
            summary.selection_size = gated_size(source, selection);
        }
        TransferMode::NamesOnly => {
            if let Some(w) = names_only_warning(target, source) {
                summary.warnings.push(w);
            }
        }
    }

    ensure_basis(target);
    for name in names.iter().filter(|n| n.as_str() != BASIS) {
        let step = reconcile_one(target, source, name, mode, selection);

        match step {
            Ok((created, written)) => {
                if created {
                    summary.created.push(name.clone());
                }
                summary.vertices_affected += written;
                summary.channels.push(name.clone());
            }
            Err(cause) => {
                let processed = summary.processed();
                warn!("bulk transfer stopped at '{name}' after {processed} shape keys: {cause}");
                if processed > 0 {
                    target.mark_dirty();
                }
                return Err(TransferError::PartialCompletion {
                    processed,
                    cause: Box::new(cause),
                });
            }
        }
    }

    target.mark_dirty();
    Ok(summary)
}

/// Steps 2-4 for one channel: resolve, write deltas, copy weight.
fn reconcile_one<T, S>(
    target: &mut T,
    source: &S,
    name: &str,
    mode: TransferMode,
    selection: &VertexSelection,
) -> Result<(bool, usize)>
where
    T: MeshAccess + ChannelStore + ?Sized,
    S: MeshAccess + ChannelStore + ?Sized,
{
    let created = resolve_channel(target, name)?;
    let written = match mode {
        TransferMode::Full => write_deltas(target, source, name, selection)?,
        TransferMode::NamesOnly => 0,
    };
    copy_weight(target, source, name)?;
    Ok((created, written))
}

fn endpoints<'t, 's, T, S>(
    target: Option<&'t mut T>,
    source: Option<&'s S>,
) -> Result<(&'t mut T, &'s S)>
where
    T: ?Sized,
    S: ?Sized,
{
    match (target, source) {
        (Some(t), Some(s)) => Ok((t, s)),
        _ => Err(TransferError::MissingEndpoint),
    }
}

fn check_vertex_counts<T, S>(target: &T, source: &S) -> Result<()>
where
    T: MeshAccess + ?Sized,
    S: MeshAccess + ?Sized,
{
    let (source_count, target_count) = (source.vertex_count(), target.vertex_count());
    if source_count != target_count {
        return Err(TransferError::VertexCountMismatch {
            source_count,
            target_count,
        });
    }
    Ok(())
}

fn names_only_warning<T, S>(target: &T, source: &S) -> Option<TransferWarning>
where
    T: MeshAccess + ?Sized,
    S: MeshAccess + ?Sized,
{
    let (source, target) = (source.vertex_count(), target.vertex_count());
    (source != target).then(|| {
        warn!("names-only transfer between meshes of {source} and {target} vertices");
        TransferWarning::VertexCountMismatch { source, target }
    })
}

fn gated_size<S>(source: &S, selection: &VertexSelection) -> Option<usize>
where
    S: MeshAccess + ?Sized,
{
    (!selection.is_all()).then(|| selection.len_within(source.vertex_count()))
}

/// Snapshot the target's base positions into a `"Basis"` channel if absent.
pub fn ensure_basis<T>(target: &mut T)
where
    T: MeshAccess + ChannelStore + ?Sized,
{
    if !target.has_channel(BASIS) {
        debug!("creating Basis channel on target");
        let base = target.base_positions();
        target.create_channel(BASIS, base);
    }
}

/// Reuse `name` on the target or create it from the basis. Returns true when
/// a channel was created.
fn resolve_channel<T>(target: &mut T, name: &str) -> Result<bool>
where
    T: MeshAccess + ChannelStore + ?Sized,
{
    if target.has_channel(name) {
        debug!("reusing target channel '{name}'");
        return Ok(false);
    }
    let initial = target
        .channel_positions(BASIS)
        .map(<[Vec3]>::to_vec)
        .ok_or_else(|| TransferError::invariant("target lost its Basis channel"))?;
    debug!("creating target channel '{name}'");
    target.create_channel(name, initial);
    Ok(true)
}

/// Write `target_basis + (source_shape - source_basis)` for every selected
/// vertex of channel `name`. Returns the number of vertices written.
fn write_deltas<T, S>(
    target: &mut T,
    source: &S,
    name: &str,
    selection: &VertexSelection,
) -> Result<usize>
where
    T: MeshAccess + ChannelStore + ?Sized,
    S: MeshAccess + ChannelStore + ?Sized,
{
    let source_basis: Cow<'_, [Vec3]> = match source.channel_positions(BASIS) {
        Some(p) => Cow::Borrowed(p),
        None => Cow::Owned(source.base_positions()),
    };
    let source_shape = source
        .channel_positions(name)
        .ok_or_else(|| TransferError::ChannelNotFound {
            name: name.to_string(),
        })?;
    let delta = compute_delta(&source_basis, source_shape, selection)?;

    let target_basis = target
        .channel_positions(BASIS)
        .map(<[Vec3]>::to_vec)
        .ok_or_else(|| TransferError::invariant("target lost its Basis channel"))?;
    let mut out = target
        .channel_positions(name)
        .map(<[Vec3]>::to_vec)
        .ok_or_else(|| TransferError::invariant(format!("target channel '{name}' vanished")))?;

    let written = delta.apply_onto(&target_basis, &mut out)?;
    if !target.set_channel_positions(name, out) {
        return Err(TransferError::invariant(format!(
            "target rejected positions for channel '{name}'"
        )));
    }
    debug!("wrote {written} vertex deltas into '{name}'");
    Ok(written)
}

fn copy_weight<T, S>(target: &mut T, source: &S, name: &str) -> Result<()>
where
    T: ChannelStore + ?Sized,
    S: ChannelStore + ?Sized,
{
    let weight = source
        .weight(name)
        .ok_or_else(|| TransferError::ChannelNotFound {
            name: name.to_string(),
        })?;
    if !target.set_weight(name, weight) {
        return Err(TransferError::invariant(format!(
            "target rejected weight for channel '{name}'"
        )));
    }
    Ok(())
}
