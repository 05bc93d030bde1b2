// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Wirework-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Wirework and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The authoritative edge set.
//!
//! Invariant: at most one outgoing edge per source. `create` enforces it by
//! tearing down any existing edge from the same source in the same mutation.
//! Every removal detaches the edge's surface group before the entry is
//! dropped, so the registry never leaves a dangling render handle behind.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Edge, EdgeKey, ExitId, TargetId};
use crate::surface::Surface;

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    edges: BTreeMap<EdgeKey, Edge>,
    by_source: BTreeMap<ExitId, EdgeKey>,
    by_target: BTreeMap<TargetId, BTreeSet<EdgeKey>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the edge `from -> to`, replacing any existing edge out of
    /// `from` first. Returns the key of the stored edge.
    pub fn create(
        &mut self,
        surface: &mut dyn Surface,
        scope: &str,
        from: ExitId,
        to: TargetId,
    ) -> EdgeKey {
        self.remove_from_source(surface, &from);

        let key = EdgeKey::new(from.clone(), to.clone());
        let handles = surface.create_edge_group(&key.to_string(), scope);
        let edge = Edge::new(key.clone(), scope, handles.group, handles.path, handles.arrow);

        self.by_source.insert(from, key.clone());
        self.by_target.entry(to).or_default().insert(key.clone());
        self.edges.insert(key.clone(), edge);
        key
    }

    /// Removes the outgoing edge of `exit`, if any.
    pub fn remove_from_source(&mut self, surface: &mut dyn Surface, exit: &ExitId) -> bool {
        let Some(key) = self.by_source.remove(exit) else {
            return false;
        };
        self.unindex_target(&key);
        self.detach(surface, &key);
        true
    }

    /// Removes every edge pointing into `target`; returns how many were removed.
    pub fn remove_into_target(&mut self, surface: &mut dyn Surface, target: &TargetId) -> usize {
        let Some(keys) = self.by_target.remove(target) else {
            return 0;
        };
        let removed = keys.len();
        for key in keys {
            self.by_source.remove(key.source());
            self.detach(surface, &key);
        }
        removed
    }

    fn unindex_target(&mut self, key: &EdgeKey) {
        if let Some(keys) = self.by_target.get_mut(key.target()) {
            keys.remove(key);
            if keys.is_empty() {
                self.by_target.remove(key.target());
            }
        }
    }

    // Surface teardown happens here, and only here: group last, overlay first,
    // so the badge never outlives its edge.
    fn detach(&mut self, surface: &mut dyn Surface, key: &EdgeKey) {
        if let Some(edge) = self.edges.remove(key) {
            if let Some(overlay) = edge.overlay() {
                surface.remove_overlay(overlay);
            }
            surface.remove_group(edge.group());
        }
    }

    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    /// The single outgoing edge of `exit`, if connected.
    pub fn edge_from(&self, exit: &ExitId) -> Option<&Edge> {
        let key = self.by_source.get(exit)?;
        self.edges.get(key)
    }

    pub fn edges_to(&self, target: &TargetId) -> Vec<&Edge> {
        let Some(keys) = self.by_target.get(target) else {
            return Vec::new();
        };
        keys.iter().filter_map(|key| self.edges.get(key)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Mutable iteration, used by the overlay layer to attach badge handles.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.values_mut()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
