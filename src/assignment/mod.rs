//! Replica assignment.
//!
//! There are two goals of replica assignment:
//! 1. Spread the replicas evenly among brokers.
//! 2. For partitions assigned to a particular broker, their other replicas are spread over the
//!    other brokers.
//!
//! To achieve this, the first replica of each partition is assigned round-robin starting from a
//! random position in the broker list, and the remaining replicas of each partition are assigned
//! with an increasing shift. Assigning 10 partitions with 3 replicas over 5 brokers, starting at
//! broker 0 with a shift of 0, looks like this:
//!
//! ```text
//! broker-0  broker-1  broker-2  broker-3  broker-4
//! p0        p1        p2        p3        p4       (1st replica)
//! p5        p6        p7        p8        p9       (1st replica)
//! p4        p0        p1        p2        p3       (2nd replica)
//! p8        p9        p5        p6        p7       (2nd replica)
//! p3        p4        p0        p1        p2       (3rd replica)
//! p7        p8        p9        p5        p6       (3rd replica)
//! ```
//!
//! Every computed replica list is reversed before being stored, so the preferred leader is the
//! last computed replica.


use std::collections::{BTreeMap, HashSet};

use anyhow::{bail, ensure, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A mapping of partition ids to their ordered replica lists.
///
/// The first broker of each replica list is the partition's preferred leader.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplicaAssignment(BTreeMap<i32, Vec<i32>>);

impl ReplicaAssignment {
    /// The number of partitions in this assignment.
    pub fn partitions(&self) -> usize {
        self.0.len()
    }

    /// The replication factor of this assignment, taken from its first partition.
    pub fn replication_factor(&self) -> usize {
        self.0.values().next().map(Vec::len).unwrap_or(0)
    }

    /// Get the replica list of the given partition.
    pub fn replicas(&self, partition: i32) -> Option<&[i32]> {
        self.0.get(&partition).map(Vec::as_slice)
    }

    /// Iterate over all partitions & their replica lists, ordered by partition id.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[i32])> {
        self.0.iter().map(|(partition, replicas)| (*partition, replicas.as_slice()))
    }

    /// Validate the shape of this assignment.
    ///
    /// Partition ids must be contiguous from 0, every partition must have the same number of
    /// replicas, and no replica list may contain the same broker twice.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.0.is_empty(), AppError::InvalidInput("replica assignment must contain at least one partition".into()));
        let expected_len = self.replication_factor();
        for (idx, (partition, replicas)) in self.0.iter().enumerate() {
            ensure!(
                *partition as i64 == idx as i64,
                AppError::InvalidInput(format!("partition ids must be contiguous from 0, found partition {} at position {}", partition, idx))
            );
            ensure!(!replicas.is_empty(), AppError::InvalidInput(format!("partition {} has no replicas", partition)));
            ensure!(
                replicas.len() == expected_len,
                AppError::InvalidInput("all partitions should have the same number of replicas".into())
            );
            let unique: HashSet<_> = replicas.iter().collect();
            if unique.len() != replicas.len() {
                bail!(AppError::InvalidInput(format!(
                    "duplicate replica assignment found: {} -> {}",
                    partition,
                    replicas.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
                )));
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<i32, Vec<i32>>> for ReplicaAssignment {
    fn from(src: BTreeMap<i32, Vec<i32>>) -> Self {
        Self(src)
    }
}

impl FromIterator<(i32, Vec<i32>)> for ReplicaAssignment {
    fn from_iter<T: IntoIterator<Item = (i32, Vec<i32>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Assign replicas of the given number of partitions to the given brokers.
pub fn assign_replicas(brokers: &[i32], partitions: i32, replication_factor: i32) -> Result<ReplicaAssignment> {
    assign_replicas_with_rng(brokers, partitions, replication_factor, &mut rand::thread_rng())
}

/// Assign replicas using the given source of randomness for the starting offsets.
pub fn assign_replicas_with_rng<R: Rng + ?Sized>(brokers: &[i32], partitions: i32, replication_factor: i32, rng: &mut R) -> Result<ReplicaAssignment> {
    validate_args(brokers, partitions, replication_factor)?;
    let start_index = rng.gen_range(0..brokers.len());
    let replica_shift = rng.gen_range(0..brokers.len());
    assign_replicas_from(brokers, partitions, replication_factor, start_index, replica_shift)
}

/// Assign replicas with fixed starting offsets.
///
/// `start_index` is the position in the sorted broker list of the first replica of partition 0,
/// and `replica_shift` is the initial shift used to place all subsequent replicas.
pub fn assign_replicas_from(
    brokers: &[i32], partitions: i32, replication_factor: i32, start_index: usize, mut replica_shift: usize,
) -> Result<ReplicaAssignment> {
    let brokers = validate_args(brokers, partitions, replication_factor)?;
    let num_brokers = brokers.len();
    tracing::debug!(?brokers, partitions, replication_factor, start_index, replica_shift, "assigning replicas");

    let mut assignment = BTreeMap::new();
    for partition in 0..partitions as usize {
        if partition > 0 && partition % num_brokers == 0 {
            replica_shift += 1;
        }
        let first_replica_index = (partition + start_index) % num_brokers;
        let mut replicas = Vec::with_capacity(replication_factor as usize);
        replicas.push(brokers[first_replica_index]);
        for j in 0..(replication_factor as usize - 1) {
            replicas.push(brokers[replica_index(first_replica_index, replica_shift, j, num_brokers)]);
        }
        replicas.reverse();
        assignment.insert(partition as i32, replicas);
    }
    Ok(ReplicaAssignment(assignment))
}

/// Compute the broker index of the `j`th additional replica.
///
/// The shift always falls in `[1, num_brokers - 1]`, so it never lands back on the first replica.
fn replica_index(first_replica_index: usize, replica_shift: usize, j: usize, num_brokers: usize) -> usize {
    let shift = 1 + (replica_shift + j) % (num_brokers - 1);
    (first_replica_index + shift) % num_brokers
}

/// Check the partition count & replication factor, which need no broker snapshot.
pub fn validate_counts(partitions: i32, replication_factor: i32) -> Result<()> {
    ensure!(partitions > 0, AppError::InvalidInput("number of partitions must be larger than 0".into()));
    ensure!(replication_factor > 0, AppError::InvalidInput("replication factor must be larger than 0".into()));
    Ok(())
}

/// Validate assignment arguments, returning the broker ids sorted ascending.
fn validate_args(brokers: &[i32], partitions: i32, replication_factor: i32) -> Result<Vec<i32>> {
    validate_counts(partitions, replication_factor)?;
    ensure!(
        replication_factor as usize <= brokers.len(),
        AppError::InvalidInput(format!(
            "replication factor: {} larger than available brokers: {}",
            replication_factor,
            brokers.len()
        ))
    );
    ensure!(
        brokers.iter().all(|id| *id >= 0),
        AppError::InvalidInput("broker ids must be non-negative".into())
    );
    let mut sorted = brokers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    ensure!(sorted.len() == brokers.len(), AppError::InvalidInput("broker ids must be distinct".into()));
    Ok(sorted)
}
