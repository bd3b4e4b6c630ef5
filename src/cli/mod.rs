//! Command-line interface for tfbs_align

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tfbs_align")]
#[command(version)]
#[command(about = "Expression clustering and promoter motif alignment")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Gene and condition selection shared by the clustering commands
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Path to expression matrix file
    #[arg(short, long,
        long_help = "Path to expression matrix file.\n\
            Format: first column = gene IDs, remaining columns = expression per condition.\n\
            Supports both CSV (comma) and TSV (tab) delimiters (auto-detected).\n\
            Missing values (empty, NA, NaN) are rejected at clustering time.")]
    pub expression: String,

    /// Gene list file (one ID per line)
    #[arg(short, long, value_name = "FILE")]
    pub genes: Option<String>,

    /// Expression column to use
    #[arg(long, value_name = "COLUMN",
        long_help = "Expression column to use. Can be specified multiple times.\n\
            Takes precedence over --experiment. Without either, all columns are used.")]
    pub condition: Vec<String>,

    /// Experiment series (ancestral, biomass, drought)
    #[arg(long, value_name = "NAME")]
    pub experiment: Vec<String>,

    /// Tissue (leaf, i1, i5, i9, root)
    #[arg(long, value_name = "NAME")]
    pub tissue: Vec<String>,

    /// Biomass collection time (4m, 8m, 12m)
    #[arg(long, value_name = "TIME")]
    pub time: Vec<String>,

    /// Drought arm (control, treated)
    #[arg(long, value_name = "ARM")]
    pub drought: Vec<String>,

    /// Drop selected conditions that have missing values
    #[arg(long)]
    pub complete_only: bool,

    /// Decimal places for Newick branch lengths
    #[arg(long, default_value = "2")]
    pub precision: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster genes by expression and write the dendrogram
    #[command(
        about = "Cluster genes by expression and write the dendrogram",
        long_about = "Cluster genes by expression and write the dendrogram\n\n\
            Complete-linkage hierarchical clustering on Euclidean distances between\n\
            gene expression profiles. The dendrogram is written as Newick text.",
        after_long_help = "\
Examples:
  # All conditions, tree to stdout
  tfbs_align cluster -e expression.tsv

  # Ancestral leaf and internode 1 columns, tree and leaf order to files
  tfbs_align cluster -e expression.tsv --experiment ancestral \\
    --tissue leaf --tissue i1 -o tree.newick --order order.txt"
    )]
    Cluster {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output Newick file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Write the leaf order (one gene per line)
        #[arg(long, value_name = "FILE")]
        order: Option<String>,

        /// Write the selected expression data as CSV
        #[arg(long, value_name = "FILE")]
        expression_out: Option<String>,
    },

    /// Cluster genes and align promoter tables to the dendrogram
    #[command(
        about = "Cluster genes and align promoter tables to the dendrogram",
        long_about = "Cluster genes and align promoter tables to the dendrogram\n\n\
            Every gene with a promoter length gets a seq_id equal to its dendrogram\n\
            leaf rank. Lengths, motif markers and expression rows are reindexed to it.",
        after_long_help = "\
Examples:
  tfbs_align align -e expression.tsv -l lengths.tsv -m motifs.tsv \\
    -a tf.tsv -o aligned/

  # Also write a single JSON document for plotting
  tfbs_align align -e expression.tsv -l lengths.tsv -m motifs.tsv \\
    --json plot.json -o aligned/"
    )]
    Align {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Promoter length table (seq, len)
        #[arg(short, long)]
        lengths: String,

        /// Motif site table (seq, motif_id, start, end)
        #[arg(short, long)]
        motifs: String,

        /// Motif to transcription factor table (motif_id, tf_name)
        #[arg(short, long, value_name = "FILE")]
        associations: Option<String>,

        /// De novo motif marker table (seq, motif, motif_location)
        #[arg(long, value_name = "FILE")]
        denovo: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = "aligned")]
        output: String,

        /// Write the plot bundle as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<String>,
    },

    /// Run the promoter architecture enumeration
    #[command(
        about = "Run the promoter architecture enumeration",
        after_long_help = "\
Examples:
  tfbs_align architecture -t tree.newick -m motifs.tsv --use-tree --use-repeats"
    )]
    Architecture {
        /// Newick tree file
        #[arg(short, long)]
        tree: String,

        /// Motif site table (seq, motif_id, start, end)
        #[arg(short, long)]
        motifs: String,

        /// Pass the tree to the enumeration
        #[arg(long)]
        use_tree: bool,

        /// Count repeated motifs
        #[arg(long)]
        use_repeats: bool,

        /// Script interpreter
        #[arg(long, default_value = "perl")]
        interpreter: String,

        /// Filter stage script
        #[arg(long, default_value = "scripts/calculaNumArqEFiltra.pl")]
        filter_script: String,

        /// Enumeration stage script
        #[arg(long, default_value = "scripts/subsetsWithExpressionTreeConfigurableAndUsingPositionsV3.pl")]
        enumerate_script: String,

        /// Lower bound passed to the filter stage
        #[arg(long, default_value = "1000000")]
        filter_min: u64,

        /// Upper bound passed to the filter stage
        #[arg(long, default_value = "60000000")]
        filter_max: u64,

        /// Output report file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}
