//! Delimited feature tables (promoter lengths, motif sites, associations)
//! and aligned table output

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::expression::format_value;
use crate::align::AlignedTables;
use crate::data::{MotifAssociation, MotifMarker, MotifSite, PromoterLength};
use crate::error::{Result, TfbsError};

/// Tab if the header line contains one, comma otherwise
fn detect_delimiter(path: &Path) -> Result<u8> {
    let mut first = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first)?;
    Ok(if first.contains('\t') { b'\t' } else { b',' })
}

/// Read a headed table into records; columns are matched by name
pub fn read_table<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    let delimiter = detect_delimiter(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()?;
    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Promoter lengths: columns `seq`, `len`
pub fn read_promoter_lengths<P: AsRef<Path>>(path: P) -> Result<Vec<PromoterLength>> {
    read_table(path)
}

/// Motif sites: columns `seq`, `motif_id`, `start`, `end`
pub fn read_motif_sites<P: AsRef<Path>>(path: P) -> Result<Vec<MotifSite>> {
    let sites: Vec<MotifSite> = read_table(path)?;
    if let Some(bad) = sites.iter().find(|s| s.end < s.start) {
        return Err(TfbsError::InvalidInput {
            reason: format!(
                "Motif {} on {} ends ({}) before it starts ({})",
                bad.motif_id, bad.seq, bad.end, bad.start
            ),
        });
    }
    Ok(sites)
}

/// Motif to transcription factor associations: columns `motif_id` (or `gene_id`), `tf_name`
pub fn read_motif_associations<P: AsRef<Path>>(path: P) -> Result<Vec<MotifAssociation>> {
    read_table(path)
}

/// Ready-made motif markers (e.g. de novo motifs): columns `seq`, `motif`, `motif_location`
pub fn read_motif_markers<P: AsRef<Path>>(path: P) -> Result<Vec<MotifMarker>> {
    read_table(path)
}

/// Motif sites as tab-separated bytes, optionally without header
pub fn motif_sites_to_tsv(sites: &[MotifSite], headers: bool) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(headers)
        .from_writer(Vec::new());
    for site in sites {
        writer.serialize(site)?;
    }
    writer
        .into_inner()
        .map_err(|e| TfbsError::IoError(std::io::Error::new(e.error().kind(), e.to_string())))
}

/// Write records as a tab-separated table with header
pub fn write_table<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every aligned table into `dir`:
/// `aligned_lengths.tsv`, `aligned_motifs.tsv`, `aligned_expression.tsv`
/// and, when present, `aligned_denovo.tsv`
pub fn write_aligned_tables<P: AsRef<Path>>(dir: P, aligned: &AlignedTables) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    write_table(dir.join("aligned_lengths.tsv"), &aligned.lengths)?;
    write_table(dir.join("aligned_motifs.tsv"), &aligned.motifs)?;
    if let Some(denovo) = &aligned.denovo {
        write_table(dir.join("aligned_denovo.tsv"), denovo)?;
    }

    let expression = &aligned.expression;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(dir.join("aligned_expression.tsv"))?;
    let mut header = vec!["seq_id".to_string(), "gene".to_string()];
    header.extend(expression.condition_ids().iter().cloned());
    writer.write_record(&header)?;
    for (k, gene) in expression.gene_ids().iter().enumerate() {
        let mut record = vec![k.to_string(), gene.clone()];
        record.extend(expression.gene_values(k).iter().map(|v| format_value(*v)));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    log::info!("Aligned tables written to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align_tables;
    use crate::cluster::LeafOrder;
    use crate::data::ExpressionMatrix;
    use ndarray::array;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_read_feature_tables() {
        let mut lengths = NamedTempFile::new().unwrap();
        writeln!(lengths, "seq\tlen").unwrap();
        writeln!(lengths, "g1\t2000").unwrap();
        writeln!(lengths, "g2\t 1800").unwrap();
        let lengths = read_promoter_lengths(lengths.path()).unwrap();
        assert_eq!(lengths[1].len, 1800);

        let mut sites = NamedTempFile::new().unwrap();
        writeln!(sites, "seq,motif_id,start,end").unwrap();
        writeln!(sites, "g1,AT1G01060,100,111").unwrap();
        let sites = read_motif_sites(sites.path()).unwrap();
        assert_eq!(sites[0].motif_id, "AT1G01060");
        assert_eq!(sites[0].end, 111);

        let mut assoc = NamedTempFile::new().unwrap();
        writeln!(assoc, "gene_id\ttf_name").unwrap();
        writeln!(assoc, "AT1G01060\tLHY").unwrap();
        let assoc = read_motif_associations(assoc.path()).unwrap();
        assert_eq!(assoc[0].motif_id, "AT1G01060");
    }

    #[test]
    fn test_reversed_site_rejected() {
        let mut sites = NamedTempFile::new().unwrap();
        writeln!(sites, "seq\tmotif_id\tstart\tend").unwrap();
        writeln!(sites, "g1\tm1\t50\t40").unwrap();
        assert!(read_motif_sites(sites.path()).is_err());
    }

    #[test]
    fn test_headerless_site_tsv() {
        let sites = vec![MotifSite {
            seq: "g1".to_string(),
            motif_id: "m1".to_string(),
            start: 3,
            end: 9,
        }];
        let bytes = motif_sites_to_tsv(&sites, false).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "g1\tm1\t3\t9\n");
        let bytes = motif_sites_to_tsv(&sites, true).unwrap();
        assert!(String::from_utf8(bytes).unwrap().starts_with("seq\tmotif_id\tstart\tend\n"));
    }

    #[test]
    fn test_write_aligned_tables() {
        let expression = ExpressionMatrix::new(
            array![[1.0, f64::NAN], [3.0, 4.0]],
            vec!["g1".to_string(), "g2".to_string()],
            vec!["c1".to_string(), "c2".to_string()],
        )
        .unwrap();
        let order = LeafOrder::from_genes(vec!["g2".to_string(), "g1".to_string()]);
        let lengths = vec![
            PromoterLength {
                seq: "g1".to_string(),
                len: 100,
            },
            PromoterLength {
                seq: "g2".to_string(),
                len: 200,
            },
        ];
        let motifs = vec![MotifMarker {
            seq: "g1".to_string(),
            motif: "MYB".to_string(),
            motif_location: -50,
        }];
        let aligned = align_tables(&order, &lengths, &motifs, &expression, None).unwrap();

        let root = tempdir().unwrap();
        let dir = root.path().join("run").join("aligned");
        write_aligned_tables(&dir, &aligned).unwrap();

        let lengths = fs::read_to_string(dir.join("aligned_lengths.tsv")).unwrap();
        assert_eq!(lengths, "seq\tlen\tseq_id\ng2\t200\t0\ng1\t100\t1\n");
        let motifs = fs::read_to_string(dir.join("aligned_motifs.tsv")).unwrap();
        assert_eq!(motifs, "seq\tmotif\tmotif_location\tseq_id\ng1\tMYB\t-50\t1\n");
        let expr = fs::read_to_string(dir.join("aligned_expression.tsv")).unwrap();
        assert_eq!(expr, "seq_id\tgene\tc1\tc2\n0\tg2\t3\t4\n1\tg1\t1\t\n");
        assert!(!dir.join("aligned_denovo.tsv").exists());
    }
}
