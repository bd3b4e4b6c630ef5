//! Session-scoped analysis context
//!
//! Holds the gene and condition selection of one user session together with
//! the intermediate results derived from it. Changing either selection drops
//! every cached result; they are recomputed on next access.

use crate::align::{align_tables, AlignedTables};
use crate::data::{ExperimentSelection, ExpressionMatrix, MotifMarker, PromoterLength};
use crate::error::{Result, TfbsError};
use crate::tree::NewickOptions;
use crate::{cluster_expression, ClusterResult};

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    /// Expression source for every gene and condition
    source: ExpressionMatrix,
    /// Selected genes (empty = all genes of the source)
    genes: Vec<String>,
    /// Selected condition columns (empty = all columns of the source)
    conditions: Vec<String>,
    options: NewickOptions,
    clustering: Option<ClusterResult>,
    aligned: Option<AlignedTables>,
}

impl AnalysisSession {
    pub fn new(source: ExpressionMatrix, options: NewickOptions) -> Self {
        Self {
            source,
            genes: Vec::new(),
            conditions: Vec::new(),
            options,
            clustering: None,
            aligned: None,
        }
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Change the gene selection
    pub fn select_genes(&mut self, genes: Vec<String>) {
        if genes != self.genes {
            log::debug!("Gene selection changed ({} genes)", genes.len());
            self.genes = genes;
            self.invalidate();
        }
    }

    /// Change the condition selection
    pub fn select_conditions(&mut self, conditions: Vec<String>) {
        if conditions != self.conditions {
            log::debug!("Condition selection changed: {}", conditions.join(", "));
            self.conditions = conditions;
            self.invalidate();
        }
    }

    /// Change the condition selection from experiment choices
    pub fn select_experiments(&mut self, selection: &ExperimentSelection) -> Result<()> {
        let conditions = selection.conditions()?;
        self.select_conditions(conditions);
        Ok(())
    }

    /// Selected conditions with a missing value for at least one selected gene
    pub fn incomplete_conditions(&self) -> Result<Vec<String>> {
        let matrix = self.selected_matrix()?;
        let complete = matrix.complete_conditions();
        Ok(matrix
            .condition_ids()
            .iter()
            .filter(|c| !complete.contains(c))
            .cloned()
            .collect())
    }

    /// Restrict the condition selection to fully populated columns.
    /// Returns the dropped conditions.
    pub fn drop_incomplete_conditions(&mut self) -> Result<Vec<String>> {
        let matrix = self.selected_matrix()?;
        let complete = matrix.complete_conditions();
        if complete.is_empty() {
            return Err(TfbsError::InsufficientData {
                reason: "Every selected condition has missing values".to_string(),
            });
        }
        let dropped: Vec<String> = matrix
            .condition_ids()
            .iter()
            .filter(|c| !complete.contains(c))
            .cloned()
            .collect();
        if !dropped.is_empty() {
            self.select_conditions(complete);
        }
        Ok(dropped)
    }

    /// Drop all cached results
    pub fn invalidate(&mut self) {
        self.clustering = None;
        self.aligned = None;
    }

    /// Whether a clustering result is cached
    pub fn has_clustering(&self) -> bool {
        self.clustering.is_some()
    }

    /// Expression matrix restricted to the current selection
    pub fn selected_matrix(&self) -> Result<ExpressionMatrix> {
        let mut matrix = if self.genes.is_empty() {
            self.source.clone()
        } else {
            self.source.select_genes(&self.genes)?
        };
        if !self.conditions.is_empty() {
            matrix = matrix.select_conditions(&self.conditions)?;
        }
        Ok(matrix)
    }

    /// Clustering of the current selection, computed on first access
    pub fn clustering(&mut self) -> Result<&ClusterResult> {
        let result = match self.clustering.take() {
            Some(cached) => cached,
            None => cluster_expression(self.selected_matrix()?, &self.options)?,
        };
        let result: &ClusterResult = self.clustering.insert(result);
        Ok(result)
    }

    /// Align feature tables to the current clustering and cache the result
    pub fn align(
        &mut self,
        lengths: &[PromoterLength],
        motifs: &[MotifMarker],
        denovo: Option<&[MotifMarker]>,
    ) -> Result<&AlignedTables> {
        let aligned = {
            let clustering = self.clustering()?;
            align_tables(&clustering.order, lengths, motifs, &clustering.matrix, denovo)?
        };
        let aligned: &AlignedTables = self.aligned.insert(aligned);
        Ok(aligned)
    }

    /// Most recent aligned tables, if still valid
    pub fn aligned(&self) -> Option<&AlignedTables> {
        self.aligned.as_ref()
    }
}
