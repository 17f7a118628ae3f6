//! Tally means keyed by reaction and energy group

// standard library
use std::collections::BTreeMap;
use std::path::Path;

// internal modules
use crate::error::Result;

// pinlat modules
use pinlat_utils::{f, OptionExt, ValueExt};

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Reaction rates tallied per energy group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reaction {
    /// Total reaction rate
    Total,
    /// Absorption, i.e. capture plus fission
    Absorption,
    /// Total scattering out of the group
    Scatter,
    /// Fission reaction rate
    Fission,
    /// Neutrons produced by fission
    NuFission,
    /// Fraction of fission neutrons born in the group
    Chi,
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Total => "total",
            Self::Absorption => "absorption",
            Self::Scatter => "scatter",
            Self::Fission => "fission",
            Self::NuFission => "nu-fission",
            Self::Chi => "chi",
        };
        write!(f, "{name}")
    }
}

/// Identifies a single collapsed quantity
///
/// Groups are zero-based with group 0 as the highest energy. A transfer is the
/// group-to-group scattering from `group_in` into `group_out`, which ends up
/// at `S[group_out, group_in]` of the scattering matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TallyKey {
    Group { group: usize, reaction: Reaction },
    Transfer { group_in: usize, group_out: usize },
}

impl TallyKey {
    /// Convenience constructor for a per-group reaction
    pub fn group(group: usize, reaction: Reaction) -> Self {
        Self::Group { group, reaction }
    }

    /// Convenience constructor for a group transfer
    pub fn transfer(group_in: usize, group_out: usize) -> Self {
        Self::Transfer {
            group_in,
            group_out,
        }
    }

    /// Highest group index referenced by the key
    pub fn max_group(&self) -> usize {
        match self {
            Self::Group { group, .. } => *group,
            Self::Transfer {
                group_in,
                group_out,
            } => *group_in.max(group_out),
        }
    }
}

impl std::fmt::Display for TallyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Group { group, reaction } => write!(f, "{reaction}[g{group}]"),
            Self::Transfer {
                group_in,
                group_out,
            } => write!(f, "scatter[g{group_in} -> g{group_out}]"),
        }
    }
}

/// Collapsed mean of one tally with its optional uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TallyRecord {
    /// What was tallied
    #[serde(flatten)]
    pub key: TallyKey,
    /// Mean over all batches
    pub mean: f64,
    /// Standard deviation of the mean, carried but never used in the collapse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

impl TallyRecord {
    /// Record with a mean and no uncertainty
    pub fn new(key: TallyKey, mean: f64) -> Self {
        Self {
            key,
            mean,
            std_dev: None,
        }
    }

    /// Attach a standard deviation
    pub fn with_std_dev(mut self, std_dev: f64) -> Self {
        self.std_dev = Some(std_dev);
        self
    }
}

impl std::fmt::Display for TallyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:<24} {} +/- {}",
            self.key.to_string(),
            self.mean.sci(5, 2),
            self.std_dev.map(|s| s.sci(5, 2)).display_or("-")
        )
    }
}

/// Collection of collapsed tally means keyed by reaction and group
///
/// On disk this is a plain JSON list of records, for example:
///
/// ```json
/// [
///   { "kind": "group", "group": 0, "reaction": "total", "mean": 0.52 },
///   { "kind": "transfer", "group_in": 0, "group_out": 1, "mean": 0.016 }
/// ]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TallyRecord>", into = "Vec<TallyRecord>")]
pub struct TallySet {
    records: BTreeMap<TallyKey, TallyRecord>,
}

impl TallySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a list of tally records from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading tallies from {}", path.display());
        let file = std::fs::File::open(path)?;
        let set: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        debug!("  - {} records", set.len());
        Ok(set)
    }

    /// Add a record, replacing any previous record with the same key
    pub fn insert(&mut self, record: TallyRecord) {
        if let Some(old) = self.records.insert(record.key, record) {
            warn!("Replaced duplicate tally {}", old.key);
        }
    }

    /// Add a per-group reaction mean
    pub fn insert_group(&mut self, group: usize, reaction: Reaction, mean: f64) {
        self.insert(TallyRecord::new(TallyKey::group(group, reaction), mean));
    }

    /// Add a group transfer mean
    pub fn insert_transfer(&mut self, group_in: usize, group_out: usize, mean: f64) {
        self.insert(TallyRecord::new(
            TallyKey::transfer(group_in, group_out),
            mean,
        ));
    }

    pub fn get(&self, key: &TallyKey) -> Option<&TallyRecord> {
        self.records.get(key)
    }

    /// Mean value for a key, if tallied
    pub fn mean(&self, key: &TallyKey) -> Option<f64> {
        self.records.get(key).map(|r| r.mean)
    }

    /// True if any record tallies a reaction in any group
    pub fn has_reaction(&self, reaction: Reaction) -> bool {
        self.records.keys().any(|k| match k {
            TallyKey::Group { reaction: r, .. } => *r == reaction,
            TallyKey::Transfer { .. } => false,
        })
    }

    /// Smallest group count that covers every record
    pub fn num_groups(&self) -> usize {
        self.records
            .keys()
            .map(|k| k.max_group() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TallyRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<TallyRecord>> for TallySet {
    fn from(records: Vec<TallyRecord>) -> Self {
        let mut set = Self::new();
        records.into_iter().for_each(|r| set.insert(r));
        set
    }
}

impl From<TallySet> for Vec<TallyRecord> {
    fn from(set: TallySet) -> Self {
        set.records.into_values().collect()
    }
}

impl FromIterator<TallyRecord> for TallySet {
    fn from_iter<I: IntoIterator<Item = TallyRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        iter.into_iter().for_each(|r| set.insert(r));
        set
    }
}

impl std::fmt::Display for TallySet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Tallies ({} records)\n", self.len());
        for record in self.iter() {
            s += &f!("  {record}\n");
        }
        write!(f, "{}", s)
    }
}
