use base64::Engine as _;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use vision_product_search::{
    catalog::FileCatalog,
    config::VisionConfig,
    providers::VisionProvider,
    ranking::expand_terms,
    Label, SearchEngine, SearchQuery, SearchResponse,
};

#[derive(Parser)]
#[command(name = "product-search-cli")]
#[command(about = "Vision Product Search CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the catalog against hand-written labels (no network)
    Rank {
        /// Catalog JSON file
        #[arg(short, long, default_value = "public/products.json")]
        catalog: PathBuf,

        /// Label as "description" or "description:score", repeatable
        #[arg(short, long = "label", required = true)]
        labels: Vec<String>,

        /// Maximum results
        #[arg(long)]
        limit: Option<f64>,
    },

    /// Label an image with the Vision API and rank the catalog
    Search {
        /// Catalog JSON file
        #[arg(short, long, default_value = "public/products.json")]
        catalog: PathBuf,

        /// Image file
        #[arg(short, long)]
        image: PathBuf,

        /// Maximum results
        #[arg(long)]
        limit: Option<f64>,
    },

    /// Show the match terms a label expands to
    Terms {
        /// Label text
        label: String,
    },
}

/// "t shirt:0.9" → Label { "t shirt", 0.9 }; no score means default weight
fn parse_label(raw: &str) -> Label {
    if let Some((description, score)) = raw.rsplit_once(':') {
        if let Ok(score) = score.trim().parse::<f64>() {
            return Label::new(description.trim(), score);
        }
    }

    Label {
        description: raw.trim().to_string(),
        ..Label::default()
    }
}

fn print_response(response: &SearchResponse) {
    println!("🏷️ Labels:");
    for label in &response.labels {
        match label.score {
            Some(score) => println!("   {} ({:.2})", label.description, score),
            None => println!("   {}", label.description),
        }
    }

    if response.products.is_empty() {
        println!("\n❌ No matching products");
        return;
    }

    println!("\n✅ {} matching products:", response.count);
    for (i, scored) in response.products.iter().enumerate() {
        let matched: Vec<&str> = scored.matched.iter().map(|m| m.label.as_str()).collect();
        println!(
            "   {}. {} - {:.2} [{}]",
            i + 1,
            scored.product.title,
            scored.score,
            matched.join(", ")
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank { catalog, labels, limit } => {
            let engine = SearchEngine::new(
                Arc::new(FileCatalog::new(catalog)),
                Arc::new(VisionProvider::new(reqwest::Client::new(), VisionConfig::from_env())),
            );

            let labels = labels.iter().map(|raw| parse_label(raw)).collect();
            let response = engine.rank_labels(labels, limit).await?;

            print_response(&response);
        }

        Commands::Search { catalog, image, limit } => {
            let bytes = tokio::fs::read(&image).await?;
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

            println!("🔍 Searching with {} ({} bytes encoded)", image.display(), encoded.len());

            let engine = SearchEngine::new(
                Arc::new(FileCatalog::new(catalog)),
                Arc::new(VisionProvider::new(reqwest::Client::new(), VisionConfig::from_env())),
            );

            let query = SearchQuery {
                image: encoded,
                limit,
            };
            let response = engine.search(query).await?;

            print_response(&response);
        }

        Commands::Terms { label } => {
            println!("📋 Terms for {:?}:", label);
            for term in expand_terms(&label) {
                println!("   {}", term);
            }
        }
    }

    Ok(())
}
