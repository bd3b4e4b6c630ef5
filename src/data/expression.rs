//! Expression matrix representation for the selected genes

use std::collections::{HashMap, HashSet};

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{Result, TfbsError};

/// Expression values for a gene set
/// Rows are genes, columns are experiment conditions. Missing values are NaN.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    /// Expression data (genes x conditions)
    values: Array2<f64>,
    /// Gene identifiers
    gene_ids: Vec<String>,
    /// Condition (experiment column) identifiers
    condition_ids: Vec<String>,
}

impl ExpressionMatrix {
    /// Create a new expression matrix
    pub fn new(
        values: Array2<f64>,
        gene_ids: Vec<String>,
        condition_ids: Vec<String>,
    ) -> Result<Self> {
        let (n_genes, n_conditions) = values.dim();

        if gene_ids.len() != n_genes {
            return Err(TfbsError::DimensionMismatch {
                expected: format!("{} gene IDs", n_genes),
                got: format!("{} gene IDs", gene_ids.len()),
            });
        }

        if condition_ids.len() != n_conditions {
            return Err(TfbsError::DimensionMismatch {
                expected: format!("{} condition IDs", n_conditions),
                got: format!("{} condition IDs", condition_ids.len()),
            });
        }

        let mut seen = HashSet::with_capacity(n_genes);
        for id in &gene_ids {
            if !seen.insert(id.as_str()) {
                return Err(TfbsError::DuplicateGene {
                    gene_id: id.clone(),
                    table: "expression".to_string(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(n_conditions);
        for id in &condition_ids {
            if !seen.insert(id.as_str()) {
                return Err(TfbsError::InvalidInput {
                    reason: format!("Duplicate condition column '{}'", id),
                });
            }
        }

        Ok(Self {
            values,
            gene_ids,
            condition_ids,
        })
    }

    /// Get the number of genes
    pub fn n_genes(&self) -> usize {
        self.values.nrows()
    }

    /// Get the number of conditions
    pub fn n_conditions(&self) -> usize {
        self.values.ncols()
    }

    /// Get the expression values as a view
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Get gene IDs
    pub fn gene_ids(&self) -> &[String] {
        &self.gene_ids
    }

    /// Get condition IDs
    pub fn condition_ids(&self) -> &[String] {
        &self.condition_ids
    }

    /// Expression profile of one gene
    pub fn gene_values(&self, gene_idx: usize) -> ArrayView1<'_, f64> {
        self.values.row(gene_idx)
    }

    /// Get gene index by ID
    pub fn gene_index(&self, gene_id: &str) -> Option<usize> {
        self.gene_ids.iter().position(|id| id == gene_id)
    }

    /// Get condition index by ID
    pub fn condition_index(&self, condition_id: &str) -> Option<usize> {
        self.condition_ids.iter().position(|id| id == condition_id)
    }

    /// Fail with `MissingValue` on the first non-finite entry (row-major)
    pub fn ensure_complete(&self) -> Result<()> {
        for ((i, j), &x) in self.values.indexed_iter() {
            if !x.is_finite() {
                return Err(TfbsError::MissingValue {
                    gene_id: self.gene_ids[i].clone(),
                    condition: self.condition_ids[j].clone(),
                });
            }
        }
        Ok(())
    }

    /// Conditions whose column is populated for every gene
    pub fn complete_conditions(&self) -> Vec<String> {
        self.values
            .axis_iter(Axis(1))
            .zip(&self.condition_ids)
            .filter(|(col, _)| col.iter().all(|x| x.is_finite()))
            .map(|(_, id)| id.clone())
            .collect()
    }

    /// Keep only the named condition columns, in the given order
    pub fn select_conditions<S: AsRef<str>>(&self, conditions: &[S]) -> Result<Self> {
        if conditions.is_empty() {
            return Err(TfbsError::InvalidInput {
                reason: "Please select at least one experiment".to_string(),
            });
        }

        let indices = conditions
            .iter()
            .map(|c| {
                let c = c.as_ref();
                self.condition_index(c).ok_or_else(|| TfbsError::InvalidInput {
                    reason: format!("Condition column '{}' not found in expression data", c),
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        let new_values = self.values.select(Axis(1), &indices);
        let new_condition_ids = indices
            .iter()
            .map(|&j| self.condition_ids[j].clone())
            .collect();

        Self::new(new_values, self.gene_ids.clone(), new_condition_ids)
    }

    /// Restrict rows to a gene list, following the list's order.
    /// Genes absent from the matrix are skipped.
    pub fn select_genes<S: AsRef<str>>(&self, genes: &[S]) -> Result<Self> {
        let lookup = self.index_map();
        let mut picked = HashSet::new();
        let mut indices = Vec::with_capacity(genes.len());

        for gene in genes {
            let gene = gene.as_ref();
            match lookup.get(gene) {
                Some(&i) => {
                    if picked.insert(i) {
                        indices.push(i);
                    }
                }
                None => log::warn!("Gene '{}' has no expression data, skipping", gene),
            }
        }

        if indices.is_empty() {
            return Err(TfbsError::InsufficientData {
                reason: "None of the selected genes have expression data".to_string(),
            });
        }

        self.subset_genes(&indices)
    }

    /// Reorder rows to exactly the given gene sequence.
    /// Every gene must be present; a missing one is an `IncompleteExpression` error.
    pub fn reindex<S: AsRef<str>>(&self, order: &[S]) -> Result<Self> {
        let lookup = self.index_map();
        let indices = order
            .iter()
            .map(|gene| {
                let gene = gene.as_ref();
                lookup
                    .get(gene)
                    .copied()
                    .ok_or_else(|| TfbsError::IncompleteExpression {
                        gene_id: gene.to_string(),
                        table: "leaf order".to_string(),
                    })
            })
            .collect::<Result<Vec<usize>>>()?;

        self.subset_genes(&indices)
    }

    /// Subset to specific genes
    pub fn subset_genes(&self, gene_indices: &[usize]) -> Result<Self> {
        let new_values = self.values.select(Axis(0), gene_indices);
        let new_gene_ids: Vec<String> = gene_indices
            .iter()
            .map(|&i| self.gene_ids[i].clone())
            .collect();

        Self::new(new_values, new_gene_ids, self.condition_ids.clone())
    }

    fn index_map(&self) -> HashMap<&str, usize> {
        self.gene_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect()
    }
}
