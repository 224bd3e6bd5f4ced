use std::fmt::Display;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use arbor_cart::{DecisionTree, Predicate, TreeConfig, model_predicate, prediction_accuracy};
use arbor_io::{LabelColumn, Table, TableReader, write_predictions};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Train, evaluate, and apply CART decision tree classifiers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for batch prediction (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Tree-growing parameters shared by `train` and `evaluate`.
#[derive(Args, Debug, Clone)]
struct GrowArgs {
    /// Maximum tree depth (the root split is depth 1)
    #[arg(long, default_value_t = 8)]
    max_depth: usize,

    /// Sides with at most this many rows become leaves
    #[arg(long, default_value_t = 1)]
    min_leaf_size: usize,

    /// Split predicate: "threshold" (numeric `<`) or "equality" (categorical `==`)
    #[arg(long, default_value = "threshold")]
    predicate: Predicate,

    /// Name of the label column (defaults to the last column)
    #[arg(long)]
    label_column: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Train a decision tree on a labeled CSV and save it
    Train {
        /// Path to the labeled training CSV
        #[arg(long)]
        data: PathBuf,

        /// Output path for the trained model binary
        #[arg(long)]
        model: PathBuf,

        #[command(flatten)]
        grow: GrowArgs,
    },

    /// Predict a label for every row of a CSV with a saved model
    Predict {
        /// Path to the trained model binary
        #[arg(long)]
        model: PathBuf,

        /// Path to the CSV of samples to classify
        #[arg(long)]
        data: PathBuf,

        /// Label column to drop (and score against) if the CSV has one
        #[arg(long)]
        label_column: Option<String>,

        /// Optional path for a JSON file of per-row predictions
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Train on one CSV and report accuracy on another
    Evaluate {
        /// Path to the labeled training CSV
        #[arg(long)]
        train: PathBuf,

        /// Path to the labeled test CSV
        #[arg(long)]
        test: PathBuf,

        #[command(flatten)]
        grow: GrowArgs,
    },

    /// Print a saved model as an indented tree
    Render {
        /// Path to the trained model binary
        #[arg(long)]
        model: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct TrainOutput {
    n_samples: usize,
    n_features: usize,
    predicate: String,
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    training_accuracy: f64,
    model: PathBuf,
}

#[derive(Serialize)]
struct PredictOutput {
    n_samples: usize,
    predicate: String,
    accuracy: Option<f64>,
    predictions: Vec<String>,
}

#[derive(Serialize)]
struct EvaluateOutput {
    n_train: usize,
    n_test: usize,
    n_features: usize,
    predicate: String,
    n_nodes: usize,
    depth: usize,
    training_accuracy: f64,
    test_accuracy: f64,
}

/// Feature cell types the CLI can train on.
///
/// Threshold trees read every cell as `f64`; equality trees keep the raw
/// strings.
trait FeatureValue:
    Clone + PartialOrd + Display + Send + Sync + Serialize + DeserializeOwned
{
    fn table_rows(table: &Table) -> Result<Vec<Vec<Self>>>;
}

impl FeatureValue for f64 {
    fn table_rows(table: &Table) -> Result<Vec<Vec<Self>>> {
        table
            .numeric_rows()
            .context("threshold trees need numeric feature columns")
    }
}

impl FeatureValue for String {
    fn table_rows(table: &Table) -> Result<Vec<Vec<Self>>> {
        Ok(table.rows().to_vec())
    }
}

fn label_column(name: Option<String>, default: LabelColumn) -> LabelColumn {
    name.map_or(default, LabelColumn::Named)
}

fn read_labeled(path: &Path, label: Option<String>) -> Result<(Table, Vec<String>)> {
    let table = TableReader::new(path)
        .with_label_column(label_column(label, LabelColumn::Last))
        .read()
        .with_context(|| format!("failed to read {}", path.display()))?;
    let labels = table
        .labels()
        .map(<[String]>::to_vec)
        .context("labeled CSV has no label column")?;
    Ok((table, labels))
}

fn tree_config(grow: &GrowArgs) -> Result<TreeConfig> {
    Ok(TreeConfig::new(grow.max_depth)?
        .with_min_leaf_size(grow.min_leaf_size)
        .with_predicate(grow.predicate))
}

/// Reject a table whose feature columns differ from the model's.
///
/// `predict` reads every column as a feature unless `--label-column` names
/// one, so a labeled CSV without that flag shows up here as one column too
/// many.
fn check_columns<V, L>(tree: &DecisionTree<V, L>, table: &Table, path: &Path) -> Result<()> {
    tree.check_columns(table.feature_names()).with_context(|| {
        format!(
            "feature columns of {} do not match the model (columns: {}); \
             if the file has a label column, pass --label-column <name>",
            path.display(),
            table.feature_names().join(",")
        )
    })
}

fn train<V: FeatureValue>(data: &Path, model: &Path, grow: &GrowArgs) -> Result<()> {
    let (table, labels) = read_labeled(data, grow.label_column.clone())?;
    let rows = V::table_rows(&table)?;

    let tree = tree_config(grow)?
        .fit(&rows, &labels)
        .context("training failed")?
        .with_feature_names(table.feature_names().to_vec())?;
    let training_accuracy = tree.accuracy(&rows, &labels)?;
    info!(
        n_nodes = tree.n_nodes(),
        depth = tree.depth(),
        training_accuracy,
        "tree trained"
    );

    tree.save(model).context("failed to save model")?;

    let output = TrainOutput {
        n_samples: rows.len(),
        n_features: tree.n_features(),
        predicate: tree.predicate().to_string(),
        n_nodes: tree.n_nodes(),
        n_leaves: tree.n_leaves(),
        depth: tree.depth(),
        training_accuracy,
        model: model.to_path_buf(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn predict<V: FeatureValue>(
    model: &Path,
    data: &Path,
    label: Option<String>,
    output_path: Option<&Path>,
) -> Result<()> {
    let tree: DecisionTree<V, String> =
        DecisionTree::load(model).context("failed to load model")?;
    info!(
        n_features = tree.n_features(),
        n_nodes = tree.n_nodes(),
        "model loaded"
    );

    let table = TableReader::new(data)
        .with_label_column(label_column(label, LabelColumn::Absent))
        .read()
        .with_context(|| format!("failed to read {}", data.display()))?;
    check_columns(&tree, &table, data)?;
    let rows = V::table_rows(&table)?;

    let predictions = tree.predict_batch(&rows).context("prediction failed")?;
    let accuracy = table
        .labels()
        .map(|labels| prediction_accuracy(&predictions, labels))
        .transpose()?;

    if let Some(path) = output_path {
        write_predictions(path, &predictions)?;
    }

    let output = PredictOutput {
        n_samples: rows.len(),
        predicate: tree.predicate().to_string(),
        accuracy,
        predictions: predictions.into_iter().cloned().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn evaluate<V: FeatureValue>(train: &Path, test: &Path, grow: &GrowArgs) -> Result<()> {
    let (train_table, train_labels) = read_labeled(train, grow.label_column.clone())?;
    let (test_table, test_labels) = read_labeled(test, grow.label_column.clone())?;
    let train_rows = V::table_rows(&train_table)?;
    let test_rows = V::table_rows(&test_table)?;

    let tree = tree_config(grow)?
        .fit(&train_rows, &train_labels)
        .context("training failed")?
        .with_feature_names(train_table.feature_names().to_vec())?;
    check_columns(&tree, &test_table, test)?;
    let training_accuracy = tree.accuracy(&train_rows, &train_labels)?;
    let test_accuracy = tree
        .accuracy(&test_rows, &test_labels)
        .context("scoring the test set failed")?;
    info!(training_accuracy, test_accuracy, "evaluation complete");

    let output = EvaluateOutput {
        n_train: train_rows.len(),
        n_test: test_rows.len(),
        n_features: tree.n_features(),
        predicate: tree.predicate().to_string(),
        n_nodes: tree.n_nodes(),
        depth: tree.depth(),
        training_accuracy,
        test_accuracy,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn render<V: FeatureValue>(model: &Path) -> Result<()> {
    let tree: DecisionTree<V, String> =
        DecisionTree::load(model).context("failed to load model")?;
    print!("{tree}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Train { data, model, grow } => match grow.predicate {
            Predicate::Threshold => train::<f64>(&data, &model, &grow)?,
            Predicate::Equality => train::<String>(&data, &model, &grow)?,
        },

        Command::Predict {
            model,
            data,
            label_column,
            output,
        } => {
            let predicate = model_predicate(&model).context("failed to read model header")?;
            match predicate {
                Predicate::Threshold => {
                    predict::<f64>(&model, &data, label_column, output.as_deref())?;
                }
                Predicate::Equality => {
                    predict::<String>(&model, &data, label_column, output.as_deref())?;
                }
            }
        }

        Command::Evaluate { train, test, grow } => match grow.predicate {
            Predicate::Threshold => evaluate::<f64>(&train, &test, &grow)?,
            Predicate::Equality => evaluate::<String>(&train, &test, &grow)?,
        },

        Command::Render { model } => {
            match model_predicate(&model).context("failed to read model header")? {
                Predicate::Threshold => render::<f64>(&model)?,
                Predicate::Equality => render::<String>(&model)?,
            }
        }
    }

    Ok(())
}
