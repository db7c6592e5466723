//! User-facing operations.
//!
//! Each operation reads the target's `TransferSettings`, derives the vertex
//! selection from the source, runs the engine and emits exactly one report.

use serde::{Deserialize, Serialize};

use crate::config::{TransferMode, TransferSettings};
use crate::error::Result;
use crate::host::{ChannelStore, MeshAccess, MeshHandle, BASIS};
use crate::mirror;
use crate::reconcile;
use crate::report::{DriverTransferSummary, ReportLevel, Reporter, TransferSummary};
use crate::selection::VertexSelection;

/// One source channel as offered to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelListing {
    pub name: String,
    /// The target already has a channel of this name.
    pub on_target: bool,
}

/// Whether the current mode can run against these two meshes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compatibility {
    Ready,
    /// Counts differ but names-only transfer proceeds.
    NamesOnlyMismatch { source: usize, target: usize },
    /// Counts differ and full mode cannot run.
    FullModeBlocked { source: usize, target: usize },
}

/// Availability check run before offering any transfer.
pub fn poll<S>(settings: &TransferSettings, source: Option<&S>) -> bool
where
    S: ChannelStore + ?Sized,
{
    settings.enabled
        && settings.source.is_some()
        && source.is_some_and(|s| !s.channel_names().is_empty())
}

/// Selection to apply for a transfer under `settings`.
pub fn selection_for<S>(settings: &TransferSettings, source: &S) -> VertexSelection
where
    S: MeshAccess + ?Sized,
{
    if settings.only_selected_vertices && settings.mode == TransferMode::Full {
        source.selected_vertex_indices()
    } else {
        VertexSelection::All
    }
}

pub fn available_channels<T, S>(target: Option<&T>, source: &S) -> Vec<ChannelListing>
where
    T: ChannelStore + ?Sized,
    S: ChannelStore + ?Sized,
{
    source
        .channel_names()
        .into_iter()
        .filter(|n| n != BASIS)
        .map(|name| ChannelListing {
            on_target: target.is_some_and(|t| t.has_channel(&name)),
            name,
        })
        .collect()
}

pub fn compatibility<T, S>(settings: &TransferSettings, target: &T, source: &S) -> Compatibility
where
    T: MeshAccess + ?Sized,
    S: MeshAccess + ?Sized,
{
    let (s, t) = (source.vertex_count(), target.vertex_count());
    if s == t {
        return Compatibility::Ready;
    }
    match settings.mode {
        TransferMode::Full => Compatibility::FullModeBlocked {
            source: s,
            target: t,
        },
        TransferMode::NamesOnly => Compatibility::NamesOnlyMismatch {
            source: s,
            target: t,
        },
    }
}

pub fn transfer_shape_key<T, S, R>(
    settings: &TransferSettings,
    target: Option<&mut T>,
    source: Option<&S>,
    name: &str,
    reporter: &mut R,
) -> Result<TransferSummary>
where
    T: MeshHandle + ?Sized,
    S: MeshHandle + ?Sized,
    R: Reporter + ?Sized,
{
    let selection = source
        .map(|s| selection_for(settings, s))
        .unwrap_or_default();
    let result = reconcile::transfer_channel(target, source, name, settings.mode, &selection);
    report(reporter, &result, TransferSummary::message);
    result
}

pub fn transfer_all_shape_keys<T, S, R>(
    settings: &TransferSettings,
    target: Option<&mut T>,
    source: Option<&S>,
    reporter: &mut R,
) -> Result<TransferSummary>
where
    T: MeshHandle + ?Sized,
    S: MeshHandle + ?Sized,
    R: Reporter + ?Sized,
{
    let selection = source
        .map(|s| selection_for(settings, s))
        .unwrap_or_default();
    let result = reconcile::transfer_all_channels(target, source, settings.mode, &selection);
    report(reporter, &result, TransferSummary::message);
    result
}

pub fn transfer_drivers<T, S, R>(
    target: Option<&mut T>,
    source: Option<&S>,
    reporter: &mut R,
) -> Result<DriverTransferSummary>
where
    T: MeshHandle + ?Sized,
    S: MeshHandle + ?Sized,
    R: Reporter + ?Sized,
{
    let result = mirror::transfer_drivers(target, source);
    report(reporter, &result, DriverTransferSummary::message);
    result
}

/// Run the bulk transfer when the settings ask for automatic transfer.
/// Returns `None` without touching anything otherwise.
pub fn auto_sync<T, S, R>(
    settings: &TransferSettings,
    target: Option<&mut T>,
    source: Option<&S>,
    reporter: &mut R,
) -> Option<Result<TransferSummary>>
where
    T: MeshHandle + ?Sized,
    S: MeshHandle + ?Sized,
    R: Reporter + ?Sized,
{
    if !(settings.enabled && settings.auto_transfer) {
        return None;
    }
    Some(transfer_all_shape_keys(settings, target, source, reporter))
}

fn report<V, R, F>(reporter: &mut R, result: &Result<V>, message: F)
where
    R: Reporter + ?Sized,
    F: Fn(&V) -> String,
{
    match result {
        Ok(v) => reporter.report(ReportLevel::Info, &message(v)),
        Err(e) => reporter.report(ReportLevel::Error, &e.to_string()),
    }
}
