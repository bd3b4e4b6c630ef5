//! Reading and writing expression matrices and gene lists

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::Array2;

use crate::data::ExpressionMatrix;
use crate::error::{Result, TfbsError};

/// Tokens read as a missing expression value
const MISSING_TOKENS: &[&str] = &["", "NA", "NaN", "nan", "null"];

/// Strip surrounding quotes from a string
fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

/// Read an expression matrix from a delimited file.
/// Expected format: first column is gene IDs, first row is condition IDs.
/// Tab and comma delimiters are auto-detected; empty or `NA` cells are missing values.
/// A non-numeric cell is a `MissingValue` error.
pub fn read_expression_matrix<P: AsRef<Path>>(path: P) -> Result<ExpressionMatrix> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines.next().ok_or_else(|| TfbsError::InsufficientData {
        reason: "Empty expression file".to_string(),
    })??;

    let delimiter = if header_line.contains('\t') { '\t' } else { ',' };

    let header: Vec<&str> = header_line.split(delimiter).collect();
    if header.len() < 2 {
        return Err(TfbsError::InvalidInput {
            reason: "Expression header needs a gene column and at least one condition".to_string(),
        });
    }
    let condition_ids: Vec<String> = header[1..].iter().map(|s| strip_quotes(s)).collect();
    let n_conditions = condition_ids.len();

    let mut gene_ids: Vec<String> = Vec::new();
    let mut rows: Vec<f64> = Vec::new();

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() != n_conditions + 1 {
            return Err(TfbsError::InvalidInput {
                reason: format!(
                    "Row has {} columns, expected {}",
                    fields.len(),
                    n_conditions + 1
                ),
            });
        }

        let gene = strip_quotes(fields[0]);
        for (j, field) in fields[1..].iter().enumerate() {
            let val = strip_quotes(field);
            let parsed = if MISSING_TOKENS.contains(&val.as_str()) {
                f64::NAN
            } else {
                val.parse::<f64>().map_err(|_| TfbsError::MissingValue {
                    gene_id: gene.clone(),
                    condition: condition_ids[j].clone(),
                })?
            };
            rows.push(parsed);
        }
        gene_ids.push(gene);
    }

    if gene_ids.is_empty() {
        return Err(TfbsError::InsufficientData {
            reason: "No genes found in expression file".to_string(),
        });
    }

    let values = Array2::from_shape_vec((gene_ids.len(), n_conditions), rows).map_err(|e| {
        TfbsError::InvalidInput {
            reason: format!("Malformed expression matrix: {}", e),
        }
    })?;

    ExpressionMatrix::new(values, gene_ids, condition_ids)
}

/// Write the expression matrix as CSV: a `gene` column followed by one column per condition
pub fn write_expression_csv<P: AsRef<Path>>(path: P, matrix: &ExpressionMatrix) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["gene".to_string()];
    header.extend(matrix.condition_ids().iter().cloned());
    writer.write_record(&header)?;

    for (i, gene) in matrix.gene_ids().iter().enumerate() {
        let mut record = vec![gene.clone()];
        record.extend(matrix.gene_values(i).iter().map(|v| format_value(*v)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Finite values as-is, missing values as an empty cell
pub(crate) fn format_value(v: f64) -> String {
    if v.is_finite() {
        v.to_string()
    } else {
        String::new()
    }
}

/// Read a gene list: identifiers separated by newlines, tabs, commas or spaces.
/// Lines starting with `#` are ignored; repeated identifiers are kept once.
pub fn read_gene_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut genes: Vec<String> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
            let gene = strip_quotes(token);
            if !gene.is_empty() && !genes.contains(&gene) {
                genes.push(gene);
            }
        }
    }

    if genes.is_empty() {
        return Err(TfbsError::InsufficientData {
            reason: "Gene list is empty".to_string(),
        });
    }
    Ok(genes)
}
