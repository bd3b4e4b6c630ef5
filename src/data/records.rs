//! Feature table records keyed by gene (`seq`)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A row that belongs to one gene
pub trait GeneKeyed {
    /// Gene identifier of the row
    fn gene_id(&self) -> &str;
}

/// Promoter length of one gene (one row per gene)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoterLength {
    pub seq: String,
    pub len: u64,
}

/// A motif occurrence in a promoter, in promoter coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifSite {
    pub seq: String,
    pub motif_id: String,
    pub start: i64,
    pub end: i64,
}

impl MotifSite {
    /// Midpoint of the site, floored
    pub fn midpoint(&self) -> i64 {
        (self.start + self.end).div_euclid(2)
    }
}

/// A motif marker ready for plotting against the TSS.
/// `motif_location` is negative: distance upstream of the TSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifMarker {
    pub seq: String,
    pub motif: String,
    pub motif_location: i64,
}

/// Row of the motif -> transcription factor association table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifAssociation {
    #[serde(alias = "gene_id")]
    pub motif_id: String,
    pub tf_name: String,
}

impl GeneKeyed for PromoterLength {
    fn gene_id(&self) -> &str {
        &self.seq
    }
}

impl GeneKeyed for MotifSite {
    fn gene_id(&self) -> &str {
        &self.seq
    }
}

impl GeneKeyed for MotifMarker {
    fn gene_id(&self) -> &str {
        &self.seq
    }
}

/// Convert raw motif sites into plotting markers.
///
/// The label of each marker is the transcription factor associated with the
/// motif. The first association row for a motif wins; motifs without an
/// association keep their own id as label.
pub fn motif_markers(sites: &[MotifSite], associations: &[MotifAssociation]) -> Vec<MotifMarker> {
    let mut names: HashMap<&str, &str> = HashMap::with_capacity(associations.len());
    for assoc in associations {
        names
            .entry(assoc.motif_id.as_str())
            .or_insert(assoc.tf_name.as_str());
    }

    let mut unlabelled = 0usize;
    let markers = sites
        .iter()
        .map(|site| {
            let motif = match names.get(site.motif_id.as_str()) {
                Some(name) => name.to_string(),
                None => {
                    unlabelled += 1;
                    site.motif_id.clone()
                }
            };
            MotifMarker {
                seq: site.seq.clone(),
                motif,
                motif_location: -site.midpoint(),
            }
        })
        .collect();

    if unlabelled > 0 {
        log::warn!(
            "{} motif sites have no transcription factor association, labelled by motif id",
            unlabelled
        );
    }
    markers
}
