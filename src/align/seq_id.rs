//! Gene -> seq_id mapping shared by all aligned tables

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cluster::LeafOrder;
use crate::data::{GeneKeyed, PromoterLength};
use crate::error::{Result, TfbsError};

/// Promoter length row placed on the shared axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedLength {
    pub seq: String,
    pub len: u64,
    pub seq_id: usize,
}

/// Dense plotting index of each gene.
///
/// `seq_id` is the gene's zero-based rank in the leaf order. Only genes that
/// have a promoter length row receive one; every other table looks its genes
/// up here instead of ranking them on its own.
#[derive(Debug, Clone, Default)]
pub struct SeqIdMap {
    ids: HashMap<String, usize>,
}

impl SeqIdMap {
    /// Build the mapping from the length table and return the length rows
    /// restricted to the leaf order and sorted by `seq_id`.
    ///
    /// The length table must hold one row per gene. Rows for genes outside
    /// the leaf order are dropped; the drop count is returned alongside.
    pub fn from_lengths(
        order: &LeafOrder,
        lengths: &[PromoterLength],
    ) -> Result<(Self, Vec<AlignedLength>, usize)> {
        let ranks = order.ranks();
        let mut seen = HashSet::with_capacity(lengths.len());
        let mut ids = HashMap::with_capacity(lengths.len());
        let mut aligned = Vec::with_capacity(lengths.len());
        let mut dropped = 0usize;

        for row in lengths {
            let gene = row.gene_id();
            if !seen.insert(gene) {
                return Err(TfbsError::DuplicateGene {
                    gene_id: gene.to_string(),
                    table: "promoter length".to_string(),
                });
            }
            match ranks.get(gene) {
                Some(&rank) => {
                    ids.insert(gene.to_string(), rank);
                    aligned.push(AlignedLength {
                        seq: row.seq.clone(),
                        len: row.len,
                        seq_id: rank,
                    });
                }
                None => dropped += 1,
            }
        }

        aligned.sort_by_key(|row| row.seq_id);
        Ok((Self { ids }, aligned, dropped))
    }

    /// `seq_id` of a gene, if it has one
    pub fn get(&self, gene_id: &str) -> Option<usize> {
        self.ids.get(gene_id).copied()
    }

    pub fn contains(&self, gene_id: &str) -> bool {
        self.ids.contains_key(gene_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Pair every row that has a `seq_id` with it, preserving row order.
    /// Returns the kept pairs and the number of rows dropped.
    pub fn assign<'r, T: GeneKeyed>(&self, rows: &'r [T]) -> (Vec<(usize, &'r T)>, usize) {
        let kept: Vec<(usize, &T)> = rows
            .iter()
            .filter_map(|row| self.get(row.gene_id()).map(|id| (id, row)))
            .collect();
        let dropped = rows.len() - kept.len();
        (kept, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MotifMarker;

    fn order(genes: &[&str]) -> LeafOrder {
        LeafOrder::from_genes(genes.iter().map(|s| s.to_string()).collect())
    }

    fn len(seq: &str, len: u64) -> PromoterLength {
        PromoterLength {
            seq: seq.to_string(),
            len,
        }
    }

    #[test]
    fn test_seq_ids_are_leaf_ranks() {
        let lengths = vec![len("g1", 2000), len("g3", 1500), len("g2", 1800), len("g9", 900)];
        let (map, aligned, dropped) =
            SeqIdMap::from_lengths(&order(&["g3", "g1", "g2"]), &lengths).unwrap();

        assert_eq!(dropped, 1);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("g3"), Some(0));
        assert_eq!(map.get("g2"), Some(2));
        assert_eq!(map.get("g9"), None);

        let seqs: Vec<&str> = aligned.iter().map(|r| r.seq.as_str()).collect();
        assert_eq!(seqs, vec!["g3", "g1", "g2"]);
        let ids: Vec<usize> = aligned.iter().map(|r| r.seq_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_length_rows_rejected() {
        let lengths = vec![len("g1", 2000), len("g1", 2100)];
        match SeqIdMap::from_lengths(&order(&["g1"]), &lengths) {
            Err(TfbsError::DuplicateGene { gene_id, table }) => {
                assert_eq!(gene_id, "g1");
                assert_eq!(table, "promoter length");
            }
            other => panic!("expected DuplicateGene, got {:?}", other.map(|r| r.2)),
        }
    }

    #[test]
    fn test_assign_keeps_row_order() {
        let lengths = vec![len("g1", 10), len("g2", 10)];
        let (map, _, _) = SeqIdMap::from_lengths(&order(&["g2", "g1"]), &lengths).unwrap();

        let markers: Vec<MotifMarker> = ["g1", "g5", "g2", "g1"]
            .iter()
            .enumerate()
            .map(|(i, seq)| MotifMarker {
                seq: seq.to_string(),
                motif: format!("m{}", i),
                motif_location: -(i as i64),
            })
            .collect();

        let (kept, dropped) = map.assign(&markers);
        assert_eq!(dropped, 1);
        let ids: Vec<(usize, &str)> = kept.iter().map(|(id, m)| (*id, m.motif.as_str())).collect();
        assert_eq!(ids, vec![(1, "m0"), (0, "m2"), (1, "m3")]);
    }
}
