//! Experiment catalogue: resolves experiment/tissue/time choices into
//! expression column names

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TfbsError};

/// Expression experiment series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Experiment {
    Drought,
    Ancestral,
    Biomass,
}

/// Sampled tissue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tissue {
    /// Leaf +1
    Leaf,
    Internode1,
    Internode5,
    Internode9,
    Root,
}

/// Collection time of the biomass series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTime {
    FourMonths,
    EightMonths,
    TwelveMonths,
}

/// Treatment arm of the drought series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroughtArm {
    Control,
    Treated,
}

impl FromStr for Experiment {
    type Err = TfbsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "drought" => Ok(Experiment::Drought),
            "ancestral" => Ok(Experiment::Ancestral),
            "biomass" => Ok(Experiment::Biomass),
            _ => Err(unknown("experiment", s)),
        }
    }
}

impl FromStr for Tissue {
    type Err = TfbsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "leaf" | "l1" => Ok(Tissue::Leaf),
            "internode1" | "i1" => Ok(Tissue::Internode1),
            "internode5" | "i5" => Ok(Tissue::Internode5),
            "internode9" | "i9" => Ok(Tissue::Internode9),
            "root" | "rt" => Ok(Tissue::Root),
            _ => Err(unknown("tissue", s)),
        }
    }
}

impl FromStr for CollectionTime {
    type Err = TfbsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "4m" | "4" => Ok(CollectionTime::FourMonths),
            "8m" | "8" => Ok(CollectionTime::EightMonths),
            "12m" | "12" => Ok(CollectionTime::TwelveMonths),
            _ => Err(unknown("collection time", s)),
        }
    }
}

impl FromStr for DroughtArm {
    type Err = TfbsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "control" => Ok(DroughtArm::Control),
            "treated" => Ok(DroughtArm::Treated),
            _ => Err(unknown("drought condition", s)),
        }
    }
}

fn unknown(kind: &str, value: &str) -> TfbsError {
    TfbsError::InvalidInput {
        reason: format!("Unknown {} '{}'", kind, value),
    }
}

impl CollectionTime {
    fn tag(self) -> &'static str {
        match self {
            CollectionTime::FourMonths => "4M",
            CollectionTime::EightMonths => "8M",
            CollectionTime::TwelveMonths => "12M",
        }
    }
}

/// A set of experiment choices.
///
/// Tissue, time and drought-arm choices only apply to the experiments that
/// sample them: internode 9 is ancestral only, root is drought only, the
/// 4-month time point exists for leaf and internode 1 only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentSelection {
    pub experiments: Vec<Experiment>,
    pub tissues: Vec<Tissue>,
    pub times: Vec<CollectionTime>,
    pub drought_arms: Vec<DroughtArm>,
}

impl ExperimentSelection {
    /// Whether no experiment has been chosen
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Expression column names for this selection.
    /// Ancestral columns come first, then biomass, then drought.
    pub fn conditions(&self) -> Result<Vec<String>> {
        let has_exp = |e: Experiment| self.experiments.contains(&e);
        let has_tissue = |t: Tissue| self.tissues.contains(&t);
        let has_time = |t: CollectionTime| self.times.contains(&t);
        let has_arm = |a: DroughtArm| self.drought_arms.contains(&a);

        let mut columns = Vec::new();

        if has_exp(Experiment::Ancestral) {
            for (tissue, prefix) in [
                (Tissue::Leaf, "L1"),
                (Tissue::Internode1, "I1"),
                (Tissue::Internode5, "I5"),
                (Tissue::Internode9, "I9"),
            ] {
                if has_tissue(tissue) {
                    columns.push(format!("{}_Ancestral", prefix));
                }
            }
        }

        if has_exp(Experiment::Biomass) {
            let all_times = [
                CollectionTime::FourMonths,
                CollectionTime::EightMonths,
                CollectionTime::TwelveMonths,
            ];
            for (tissue, prefix, times) in [
                (Tissue::Leaf, "L1", &all_times[..]),
                (Tissue::Internode1, "I1", &all_times[..]),
                (Tissue::Internode5, "I5", &all_times[1..]),
            ] {
                if !has_tissue(tissue) {
                    continue;
                }
                for &time in times {
                    if has_time(time) {
                        columns.push(format!("{}_{}_Biomass", prefix, time.tag()));
                    }
                }
            }
        }

        if has_exp(Experiment::Drought) {
            for (tissue, prefix) in [(Tissue::Leaf, "L1"), (Tissue::Root, "RT")] {
                if !has_tissue(tissue) {
                    continue;
                }
                if has_arm(DroughtArm::Control) {
                    columns.push(format!("{}_Drought_control", prefix));
                }
                if has_arm(DroughtArm::Treated) {
                    columns.push(format!("{}_Drought_treated", prefix));
                }
            }
        }

        if columns.is_empty() {
            return Err(TfbsError::InvalidInput {
                reason: "Please select at least one experiment".to_string(),
            });
        }

        log::debug!("Selected conditions: {}", columns.join(", "));
        Ok(columns)
    }
}
