// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-shot resolution of the operation catalog against a host class.
//
// The table is built once and never mutated afterwards. An empty slot is a
// normal state: the host build simply does not offer that operation.

use serde::Serialize;
use tracing::debug;

use hostbridge_core::error::Result;
use hostbridge_core::operation::{Operation, OperationKind};

use crate::host::HostRuntime;
use crate::signature::Signature;

/// A successfully resolved operation.
#[derive(Debug, Clone)]
pub struct Resolved<M> {
    pub method: M,
    pub signature: Signature,
}

/// Immutable mapping from operation to its resolved method, if any.
#[derive(Debug)]
pub struct OperationTable<M> {
    slots: Vec<Option<Resolved<M>>>,
}

impl<M: Copy> OperationTable<M> {
    /// Resolve every operation in [`Operation::ALL`] exactly once.
    ///
    /// Only a malformed descriptor in the catalog is an error; a method the
    /// host does not have leaves its slot empty.
    pub fn resolve<H>(host: &H, class: &H::Class, log_unresolved: bool) -> Result<Self>
    where
        H: HostRuntime<MethodRef = M>,
    {
        let mut slots = Vec::with_capacity(Operation::ALL.len());

        for op in Operation::ALL {
            let signature = Signature::parse(op.descriptor())?;
            let slot = host
                .resolve_method(class, op.host_name(), op.descriptor())
                .map(|method| Resolved { method, signature });

            if slot.is_none() && log_unresolved {
                debug!(operation = %op, kind = ?op.kind(), "host operation not available");
            }
            slots.push(slot);
        }

        Ok(Self { slots })
    }

    pub fn get(&self, op: Operation) -> Option<&Resolved<M>> {
        self.slots.get(op.index()).and_then(Option::as_ref)
    }

    pub fn is_resolved(&self, op: Operation) -> bool {
        self.get(op).is_some()
    }

    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Snapshot of which operations this host build provides.
    pub fn report(&self) -> CapabilityReport {
        let entries: Vec<_> = Operation::ALL
            .iter()
            .map(|&op| CapabilityEntry {
                operation: op,
                host_name: op.host_name(),
                kind: op.kind(),
                resolved: self.is_resolved(op),
            })
            .collect();

        CapabilityReport {
            resolved: self.resolved_count(),
            total: entries.len(),
            entries,
        }
    }
}

/// Serializable summary of resolved and missing operations.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    pub resolved: usize,
    pub total: usize,
    pub entries: Vec<CapabilityEntry>,
}

impl CapabilityReport {
    /// Operations the host build does not provide.
    pub fn missing(&self) -> impl Iterator<Item = Operation> + '_ {
        self.entries
            .iter()
            .filter(|entry| !entry.resolved)
            .map(|entry| entry.operation)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CapabilityEntry {
    pub operation: Operation,
    pub host_name: &'static str,
    pub kind: OperationKind,
    pub resolved: bool,
}
