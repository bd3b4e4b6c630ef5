//! Reindexing of feature tables and expression data to one leaf order

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::seq_id::{AlignedLength, SeqIdMap};
use crate::cluster::LeafOrder;
use crate::data::{ExpressionMatrix, MotifMarker, PromoterLength};
use crate::error::Result;

/// Motif marker placed on the shared axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedMotif {
    pub seq: String,
    pub motif: String,
    pub motif_location: i64,
    pub seq_id: usize,
}

impl AlignedMotif {
    fn new(seq_id: usize, marker: &MotifMarker) -> Self {
        Self {
            seq: marker.seq.clone(),
            motif: marker.motif.clone(),
            motif_location: marker.motif_location,
            seq_id,
        }
    }
}

/// Rows left out of the aligned tables because their gene has no `seq_id`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub dropped_lengths: usize,
    pub dropped_motifs: usize,
    pub dropped_denovo: usize,
    /// Genes of the leaf order without a promoter length row
    pub genes_without_length: Vec<String>,
}

/// Tables sharing one gene axis.
///
/// A row with `seq_id = k` in any table refers to the same gene as row `k`
/// of `expression`.
#[derive(Debug, Clone)]
pub struct AlignedTables {
    pub lengths: Vec<AlignedLength>,
    pub motifs: Vec<AlignedMotif>,
    pub expression: ExpressionMatrix,
    pub denovo: Option<Vec<AlignedMotif>>,
    pub report: AlignmentReport,
}

impl AlignedTables {
    /// Expression rows in drawing order for a top-down heatmap
    /// (highest `seq_id` first, so row `k` lines up with `seq_id = k` on a
    /// bottom-up axis)
    pub fn heatmap_rows(&self) -> Vec<(usize, &str, ArrayView1<'_, f64>)> {
        (0..self.expression.n_genes())
            .rev()
            .map(|k| {
                (
                    k,
                    self.expression.gene_ids()[k].as_str(),
                    self.expression.gene_values(k),
                )
            })
            .collect()
    }

    /// Longest promoter among aligned genes
    pub fn max_promoter_len(&self) -> Option<u64> {
        self.lengths.iter().map(|row| row.len).max()
    }

    /// Number of positions on the shared axis
    pub fn n_positions(&self) -> usize {
        self.expression.n_genes()
    }
}

/// Align promoter lengths, motif markers, expression and optional de novo
/// motifs to one leaf order.
///
/// `seq_id`s come from the length table (see [`SeqIdMap`]); motif rows of
/// genes without one are dropped and counted. Expression rows are reordered
/// to the leaf order exactly and must cover every gene of it.
pub fn align_tables(
    order: &LeafOrder,
    lengths: &[PromoterLength],
    motifs: &[MotifMarker],
    expression: &ExpressionMatrix,
    denovo: Option<&[MotifMarker]>,
) -> Result<AlignedTables> {
    log::info!("Aligning tables to a leaf order of {} genes", order.len());

    let expression = expression.reindex(order.genes())?;

    let (seq_ids, aligned_lengths, dropped_lengths) = SeqIdMap::from_lengths(order, lengths)?;
    let genes_without_length: Vec<String> = order
        .genes()
        .iter()
        .filter(|gene| !seq_ids.contains(gene))
        .cloned()
        .collect();

    let (kept, dropped_motifs) = seq_ids.assign(motifs);
    let aligned_motifs: Vec<AlignedMotif> = kept
        .into_iter()
        .map(|(id, marker)| AlignedMotif::new(id, marker))
        .collect();

    let (aligned_denovo, dropped_denovo) = match denovo {
        Some(rows) => {
            let (kept, dropped) = seq_ids.assign(rows);
            let aligned = kept
                .into_iter()
                .map(|(id, marker)| AlignedMotif::new(id, marker))
                .collect();
            (Some(aligned), dropped)
        }
        None => (None, 0),
    };

    if dropped_lengths > 0 {
        log::warn!(
            "{} promoter length rows dropped: genes not in the leaf order",
            dropped_lengths
        );
    }
    if !genes_without_length.is_empty() {
        log::warn!(
            "{} genes have no promoter length and get no motif markers: {}",
            genes_without_length.len(),
            genes_without_length.join(", ")
        );
    }
    if dropped_motifs > 0 {
        log::warn!("{} motif rows dropped: gene has no seq_id", dropped_motifs);
    }
    if dropped_denovo > 0 {
        log::warn!("{} de novo motif rows dropped: gene has no seq_id", dropped_denovo);
    }

    log::debug!(
        "Aligned {} length rows, {} motif rows, {} expression rows",
        aligned_lengths.len(),
        aligned_motifs.len(),
        expression.n_genes()
    );

    Ok(AlignedTables {
        lengths: aligned_lengths,
        motifs: aligned_motifs,
        expression,
        denovo: aligned_denovo,
        report: AlignmentReport {
            dropped_lengths,
            dropped_motifs,
            dropped_denovo,
            genes_without_length,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{cluster_genes, leaf_order};
    use crate::error::TfbsError;
    use ndarray::array;
    use std::collections::{BTreeSet, HashMap};

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn expression() -> ExpressionMatrix {
        ExpressionMatrix::new(
            array![[10.0, 0.0], [0.0, 0.0], [12.0, 0.0], [1.0, 0.0]],
            ids(&["g3", "g1", "g4", "g2"]),
            ids(&["L1_Ancestral", "I1_Ancestral"]),
        )
        .unwrap()
    }

    fn lengths() -> Vec<PromoterLength> {
        [("g1", 2000), ("g2", 1800), ("g3", 2500), ("g4", 900)]
            .iter()
            .map(|&(seq, len)| PromoterLength {
                seq: seq.to_string(),
                len,
            })
            .collect()
    }

    fn marker(seq: &str, motif: &str, location: i64) -> MotifMarker {
        MotifMarker {
            seq: seq.to_string(),
            motif: motif.to_string(),
            motif_location: location,
        }
    }

    fn motifs() -> Vec<MotifMarker> {
        vec![
            marker("g1", "MYB", -120),
            marker("g5", "WRKY", -300),
            marker("g3", "bZIP", -45),
            marker("g1", "WRKY", -800),
            marker("g4", "MYB", -10),
        ]
    }

    #[test]
    fn test_cross_table_consistency() {
        let expr = expression();
        let order = leaf_order(&cluster_genes(&expr).unwrap());
        let aligned = align_tables(&order, &lengths(), &motifs(), &expr, None).unwrap();

        let by_id: HashMap<usize, &str> = aligned
            .lengths
            .iter()
            .map(|r| (r.seq_id, r.seq.as_str()))
            .collect();

        for (k, gene) in aligned.expression.gene_ids().iter().enumerate() {
            assert_eq!(order.genes()[k], *gene);
            assert_eq!(by_id[&k], gene.as_str());
        }
        for m in &aligned.motifs {
            assert_eq!(aligned.expression.gene_ids()[m.seq_id], m.seq);
        }
    }

    #[test]
    fn test_unknown_gene_motifs_dropped_without_error() {
        let expr = expression();
        let order = leaf_order(&cluster_genes(&expr).unwrap());
        let aligned = align_tables(&order, &lengths(), &motifs(), &expr, None).unwrap();

        assert_eq!(aligned.motifs.len(), 4);
        assert!(aligned.motifs.iter().all(|m| m.seq != "g5"));
        assert_eq!(aligned.report.dropped_motifs, 1);

        let without_g5: Vec<MotifMarker> =
            motifs().into_iter().filter(|m| m.seq != "g5").collect();
        let reference = align_tables(&order, &lengths(), &without_g5, &expr, None).unwrap();
        assert_eq!(reference.motifs, aligned.motifs);
        assert_eq!(reference.lengths, aligned.lengths);
    }

    #[test]
    fn test_seq_id_contiguity() {
        let expr = expression();
        let order = leaf_order(&cluster_genes(&expr).unwrap());
        let aligned = align_tables(&order, &lengths(), &motifs(), &expr, Some(&motifs()[..])).unwrap();

        let length_ids: Vec<usize> = aligned.lengths.iter().map(|r| r.seq_id).collect();
        assert_eq!(length_ids, vec![0, 1, 2, 3]);

        let used: BTreeSet<usize> = aligned
            .motifs
            .iter()
            .chain(aligned.denovo.as_ref().unwrap())
            .map(|m| m.seq_id)
            .collect();
        assert!(used.iter().all(|&id| id < order.len()));
        assert_eq!(aligned.report.dropped_denovo, 1);
    }

    #[test]
    fn test_gene_without_length_gets_no_markers() {
        let expr = expression();
        let order = leaf_order(&cluster_genes(&expr).unwrap());
        let partial: Vec<PromoterLength> =
            lengths().into_iter().filter(|r| r.seq != "g3").collect();

        let aligned = align_tables(&order, &partial, &motifs(), &expr, None).unwrap();
        assert_eq!(aligned.lengths.len(), 3);
        assert_eq!(aligned.report.genes_without_length, vec!["g3"]);
        assert!(aligned.motifs.iter().all(|m| m.seq != "g3"));

        // remaining genes keep their leaf rank
        let ranks = order.ranks();
        for row in &aligned.lengths {
            assert_eq!(row.seq_id, ranks[row.seq.as_str()]);
        }
        assert_eq!(aligned.expression.n_genes(), 4);
    }

    #[test]
    fn test_incomplete_expression_is_fatal() {
        let expr = expression();
        let order = LeafOrder::from_genes(ids(&["g1", "g2", "g7"]));
        match align_tables(&order, &lengths(), &motifs(), &expr, None) {
            Err(TfbsError::IncompleteExpression { gene_id, .. }) => assert_eq!(gene_id, "g7"),
            other => panic!("expected IncompleteExpression, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_heatmap_rows_and_extent() {
        let expr = expression();
        let order = LeafOrder::from_genes(ids(&["g1", "g2", "g3", "g4"]));
        let aligned = align_tables(&order, &lengths(), &[], &expr, None).unwrap();

        let rows = aligned.heatmap_rows();
        let genes: Vec<&str> = rows.iter().map(|(_, g, _)| *g).collect();
        assert_eq!(genes, vec!["g4", "g3", "g2", "g1"]);
        assert_eq!(rows[0].0, 3);
        assert_eq!(rows[0].2[0], 12.0);
        assert_eq!(aligned.max_promoter_len(), Some(2500));
        assert_eq!(aligned.n_positions(), 4);
        assert!(aligned.denovo.is_none());
    }
}
