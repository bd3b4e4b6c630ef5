//! tfbs_align command-line interface

use std::str::FromStr;

use clap::Parser;
use log::{info, warn, LevelFilter};

use tfbs_align::cli::{Cli, Commands, SelectionArgs};
use tfbs_align::data::{CollectionTime, DroughtArm, Experiment, Tissue};
use tfbs_align::prelude::*;
use tfbs_align::tree::leaf_nodes;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Find the first non-flag argument (potential subcommand)
    let first_positional = args.iter().skip(1).find(|a| !a.starts_with('-'));
    let subcommands = ["cluster", "align", "architecture", "help"];
    let has_subcommand = first_positional.map_or(false, |a| subcommands.contains(&a.as_str()));

    if !has_subcommand {
        if args.len() == 1 {
            print_no_args();
            return;
        }
        if args.iter().any(|a| a == "--help" || a == "-h") {
            print_help();
            return;
        }
        if args.iter().any(|a| a == "-V" || a == "--version") {
            println!("tfbs_align {}", VERSION);
            return;
        }
        print_no_args();
        return;
    }

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Some(Commands::Cluster {
            selection,
            output,
            order,
            expression_out,
        }) => run_cluster(
            &selection,
            output.as_deref(),
            order.as_deref(),
            expression_out.as_deref(),
        ),
        Some(Commands::Align {
            selection,
            lengths,
            motifs,
            associations,
            denovo,
            output,
            json,
        }) => run_align(
            &selection,
            &lengths,
            &motifs,
            associations.as_deref(),
            denovo.as_deref(),
            &output,
            json.as_deref(),
        ),
        Some(Commands::Architecture {
            tree,
            motifs,
            use_tree,
            use_repeats,
            interpreter,
            filter_script,
            enumerate_script,
            filter_min,
            filter_max,
            output,
        }) => {
            let config = ArchitectureConfig {
                interpreter: interpreter.into(),
                filter_script: filter_script.into(),
                enumerate_script: enumerate_script.into(),
                filter_min,
                filter_max,
            };
            let flags = ArchitectureFlags {
                use_tree,
                use_repeats,
            };
            run_architecture(&tree, &motifs, config, flags, output.as_deref())
        }
        None => {
            print_no_args();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Custom help output
// ---------------------------------------------------------------------------

fn print_no_args() {
    println!("tfbs_align v{}", VERSION);
    println!("Run `tfbs_align -h` for usage.");
}

fn print_help() {
    println!("tfbs_align v{}", VERSION);
    println!("Expression clustering and promoter motif alignment");
    println!();
    println!("Usage: tfbs_align <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  cluster       Cluster genes by expression and write the dendrogram");
    println!("  align         Cluster genes and align promoter tables to the dendrogram");
    println!("  architecture  Run the promoter architecture enumeration");
    println!();
    println!("Global Options:");
    println!("  -v, --verbose    Enable verbose output");
    println!("  -h, --help       Print help");
    println!("  -V, --version    Print version");
    println!();
    println!("Run `tfbs_align <COMMAND> --help` for command-specific options.");
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn parse_all<T: FromStr<Err = TfbsError>>(values: &[String]) -> Result<Vec<T>> {
    values.iter().map(|v| v.parse()).collect()
}

/// Load the expression matrix and apply the gene and condition selection
fn open_session(selection: &SelectionArgs) -> Result<AnalysisSession> {
    info!("Loading expression matrix from: {}", selection.expression);
    let expression = read_expression_matrix(&selection.expression)?;
    info!(
        "  {} genes, {} conditions",
        expression.n_genes(),
        expression.n_conditions()
    );

    let options = NewickOptions {
        precision: selection.precision,
    };
    let mut session = AnalysisSession::new(expression, options);

    if let Some(path) = &selection.genes {
        info!("Loading gene list from: {}", path);
        session.select_genes(read_gene_list(path)?);
    }

    if !selection.condition.is_empty() {
        session.select_conditions(selection.condition.clone());
    } else if !selection.experiment.is_empty() {
        let experiments = ExperimentSelection {
            experiments: parse_all::<Experiment>(&selection.experiment)?,
            tissues: parse_all::<Tissue>(&selection.tissue)?,
            times: parse_all::<CollectionTime>(&selection.time)?,
            drought_arms: parse_all::<DroughtArm>(&selection.drought)?,
        };
        session.select_experiments(&experiments)?;
    }

    if selection.complete_only {
        let dropped = session.drop_incomplete_conditions()?;
        if !dropped.is_empty() {
            info!("Dropped conditions with missing values: {}", dropped.join(", "));
        }
    } else {
        let incomplete = session.incomplete_conditions()?;
        if !incomplete.is_empty() {
            warn!(
                "Conditions with missing values: {} (use --complete-only to drop them)",
                incomplete.join(", ")
            );
        }
    }

    if !session.conditions().is_empty() {
        info!("Using conditions: {}", session.conditions().join(", "));
    }
    Ok(session)
}

fn run_cluster(
    selection: &SelectionArgs,
    output: Option<&str>,
    order_path: Option<&str>,
    expression_path: Option<&str>,
) -> Result<()> {
    let mut session = open_session(selection)?;

    info!("Clustering genes (complete linkage, Euclidean)...");
    let clustering = session.clustering()?;
    info!("  {} leaves", clustering.order.len());

    match output {
        Some(path) => {
            info!("Writing tree to: {}", path);
            std::fs::write(path, format!("{}\n", clustering.newick))?;
        }
        None => println!("{}", clustering.newick),
    }

    if let Some(path) = order_path {
        info!("Writing leaf order to: {}", path);
        let mut text = clustering.order.genes().join("\n");
        text.push('\n');
        std::fs::write(path, text)?;
    }

    if let Some(path) = expression_path {
        info!("Writing selected expression data to: {}", path);
        write_expression_csv(path, &clustering.matrix)?;
    }

    Ok(())
}

fn run_align(
    selection: &SelectionArgs,
    lengths_path: &str,
    motifs_path: &str,
    associations_path: Option<&str>,
    denovo_path: Option<&str>,
    output_dir: &str,
    json_path: Option<&str>,
) -> Result<()> {
    let mut session = open_session(selection)?;

    info!("Loading promoter lengths from: {}", lengths_path);
    let lengths = read_promoter_lengths(lengths_path)?;

    info!("Loading motif sites from: {}", motifs_path);
    let sites = read_motif_sites(motifs_path)?;
    let associations = match associations_path {
        Some(path) => {
            info!("Loading motif associations from: {}", path);
            read_motif_associations(path)?
        }
        None => Vec::new(),
    };
    let markers = motif_markers(&sites, &associations);

    let denovo = match denovo_path {
        Some(path) => {
            info!("Loading de novo motifs from: {}", path);
            Some(read_motif_markers(path)?)
        }
        None => None,
    };

    let newick = session.clustering()?.newick.clone();
    let aligned = session.align(&lengths, &markers, denovo.as_deref())?;
    info!(
        "  {} genes aligned, {} motif markers",
        aligned.lengths.len(),
        aligned.motifs.len()
    );

    info!("Writing aligned tables to: {}", output_dir);
    write_aligned_tables(output_dir, aligned)?;
    std::fs::write(
        std::path::Path::new(output_dir).join("tree.newick"),
        format!("{}\n", newick),
    )?;

    if let Some(path) = json_path {
        info!("Writing plot bundle to: {}", path);
        write_plot_bundle(path, &PlotBundle::new(&newick, aligned))?;
    }

    Ok(())
}

fn run_architecture(
    tree_path: &str,
    motifs_path: &str,
    config: ArchitectureConfig,
    flags: ArchitectureFlags,
    output: Option<&str>,
) -> Result<()> {
    info!("Loading tree from: {}", tree_path);
    let tree_text = std::fs::read_to_string(tree_path)?;
    let tree = parse_newick(&tree_text)?;
    info!("  {} leaves", leaf_nodes(&tree).len());

    info!("Loading motif sites from: {}", motifs_path);
    let sites = read_motif_sites(motifs_path)?;

    let service = ScriptArchitecture::new(config);
    let report = service.report(&ArchitectureRequest {
        tree_text: tree_text.trim(),
        sites: &sites,
        flags,
    })?;

    match output {
        Some(path) => {
            info!("Writing architecture report to: {}", path);
            std::fs::write(path, report)?;
        }
        None => print!("{}", report),
    }

    Ok(())
}
