//! JSON bundle of aligned tables for a rendering layer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::align::{AlignedLength, AlignedMotif, AlignedTables, AlignmentReport};
use crate::error::Result;

/// One expression row on the shared axis (missing values become `null`)
#[derive(Debug, Serialize)]
pub struct ExpressionRow<'a> {
    pub seq_id: usize,
    pub gene: &'a str,
    pub values: Vec<f64>,
}

/// Everything a dendrogram + heatmap + motif panel needs, positionally aligned
#[derive(Debug, Serialize)]
pub struct PlotBundle<'a> {
    pub newick: &'a str,
    pub leaf_order: &'a [String],
    pub conditions: &'a [String],
    /// Expression rows in heatmap drawing order (highest `seq_id` first)
    pub heatmap: Vec<ExpressionRow<'a>>,
    pub n_positions: usize,
    pub lengths: &'a [AlignedLength],
    pub motifs: &'a [AlignedMotif],
    pub denovo: Option<&'a [AlignedMotif]>,
    pub max_promoter_len: Option<u64>,
    pub report: &'a AlignmentReport,
}

impl<'a> PlotBundle<'a> {
    pub fn new(newick: &'a str, aligned: &'a AlignedTables) -> Self {
        let heatmap = aligned
            .heatmap_rows()
            .into_iter()
            .map(|(seq_id, gene, values)| ExpressionRow {
                seq_id,
                gene,
                values: values.to_vec(),
            })
            .collect();

        Self {
            newick,
            leaf_order: aligned.expression.gene_ids(),
            conditions: aligned.expression.condition_ids(),
            heatmap,
            n_positions: aligned.n_positions(),
            lengths: &aligned.lengths,
            motifs: &aligned.motifs,
            denovo: aligned.denovo.as_deref(),
            max_promoter_len: aligned.max_promoter_len(),
            report: &aligned.report,
        }
    }
}

/// Write the bundle as pretty-printed JSON
pub fn write_plot_bundle<P: AsRef<Path>>(path: P, bundle: &PlotBundle<'_>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, bundle)?;
    writer.flush()?;
    Ok(())
}
