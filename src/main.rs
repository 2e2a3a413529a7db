use clap::Parser;
use std::error::Error;
use std::io::BufRead;

use text_ops_rust::model_loader::{BlobTransport, read_blob};
use text_ops_rust::ops::ragged_to_sparse::ragged_to_sparse;
use text_ops_rust::ops::tokenize::{TokenizeParams, tokenize};

/// Tokenize text rows with a SentencePiece model and optionally convert the
/// ragged output to sparse coordinate form
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the serialized tokenizer model
    model: String,

    /// Treat the model file as base64 text instead of raw bytes
    #[arg(long)]
    base64: bool,

    /// n-best lattice size for sampling segmentation (<= 1 selects greedy)
    #[arg(long, default_value_t = 0.0)]
    nbest_size: f32,

    /// Sampling smoothing temperature (<= 0 selects greedy)
    #[arg(long, default_value_t = 0.0)]
    alpha: f32,

    /// Prepend the model's BOS id to every row
    #[arg(long)]
    add_bos: bool,

    /// Append the model's EOS id to every row
    #[arg(long)]
    add_eos: bool,

    /// Reverse token order within each row (markers stay at the boundaries)
    #[arg(long)]
    reverse: bool,

    /// Also run the ragged-to-sparse converter on the tokenizer output
    #[arg(long)]
    sparse: bool,

    /// Emit machine-readable JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Text rows to tokenize; reads stdin lines when none are given
    rows: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let transport = if args.base64 {
        BlobTransport::Base64
    } else {
        BlobTransport::Raw
    };
    let blob = read_blob(&args.model, transport)?;

    let rows = if args.rows.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()?
    } else {
        args.rows.clone()
    };

    let params = TokenizeParams {
        nbest_size: args.nbest_size,
        alpha: args.alpha,
        add_bos: args.add_bos,
        add_eos: args.add_eos,
        reverse: args.reverse,
    };

    let ragged = tokenize(&blob, &rows, &params)?;

    if args.sparse {
        let sparse = ragged_to_sparse(ragged.splits(), ragged.values())?;
        if args.json {
            println!(
                "{}",
                serde_json::json!({ "ragged": ragged, "sparse": sparse })
            );
        } else {
            println!("values: {:?}", ragged.values());
            println!("splits: {:?}", ragged.splits());
            println!("indices: {:?}", sparse.indices());
            println!("sparse values: {:?}", sparse.values());
            println!("dense shape: {:?}", sparse.dense_shape());
        }
    } else if args.json {
        println!("{}", serde_json::json!({ "ragged": ragged }));
    } else {
        println!("values: {:?}", ragged.values());
        println!("splits: {:?}", ragged.splits());
    }

    Ok(())
}
