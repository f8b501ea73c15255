//! scholaris - command-line interface for the recommendation engine.
//!
//! Subcommands:
//!   demo                              seed a demo corpus and run sample queries
//!   recommend --name <n> --domain <d> | --abstract <a> [--email <e>] [--top-n <k>]
//!   refresh                           force a full load+prepare+fit+save cycle
//!   clear-cache                       delete the persisted model snapshot
//!
//! Configuration comes from the environment (loaded from `.env` when
//! present): SCHOLARIS_CACHE_DIR, SCHOLARIS_MAX_FEATURES, SCHOLARIS_TOP_N,
//! and the standard RUST_LOG filter.

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use scholaris_core::models::{Publication, SourceOrigin};
use scholaris_engine::{EngineConfig, RecommendationResponse, Recommender, RequesterIdentity};
use scholaris_store::{
    FsSnapshotStore, InMemoryHistorySink, InMemoryResearcherDirectory, StaticPublicationSource,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scholaris=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match args.first().map(String::as_str) {
        Some(cmd) => cmd,
        None => {
            print_usage();
            return Ok(());
        }
    };

    let engine = build_engine();

    match command {
        "demo" => run_demo(&engine).await,
        "recommend" => run_recommend(&engine, &args[1..]).await,
        "refresh" => {
            let summary = engine.refresh().await;
            println!(
                "refreshed: {} records, {} features{}",
                summary.corpus_size,
                summary.feature_count,
                if summary.degraded { " (fixture data)" } else { "" }
            );
            Ok(())
        }
        "clear-cache" => {
            engine.clear_cache().await;
            println!("model cache cleared");
            Ok(())
        }
        other => {
            print_usage();
            bail!("unknown command: {other}");
        }
    }
}

fn build_engine() -> Recommender {
    let source = Arc::new(StaticPublicationSource::new(demo_corpus()));
    let snapshots = Arc::new(FsSnapshotStore::from_env());
    let directory = Arc::new(InMemoryResearcherDirectory::new());
    let history = Arc::new(InMemoryHistorySink::new());
    let config = EngineConfig::from_env();
    info!(
        max_features = config.max_features,
        default_top_n = config.default_top_n,
        cache_dir = %snapshots.dir().display(),
        "engine configured"
    );
    Recommender::new(source, snapshots, directory, history, config)
}

async fn run_demo(engine: &Recommender) -> Result<()> {
    let requester = RequesterIdentity::named("Demo Researcher");
    for domain in ["machine learning", "recommendation systems", "graph theory"] {
        let response = engine.recommend_by_domain(&requester, domain, None).await?;
        println!("\n== domain: {domain} ==");
        print_response(&response);
    }
    Ok(())
}

async fn run_recommend(engine: &Recommender, args: &[String]) -> Result<()> {
    let mut name: Option<String> = None;
    let mut email: Option<String> = None;
    let mut domain: Option<String> = None;
    let mut abstract_text: Option<String> = None;
    let mut top_n: Option<usize> = None;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--name" => name = Some(value()?),
            "--email" => email = Some(value()?),
            "--domain" => domain = Some(value()?),
            "--abstract" => abstract_text = Some(value()?),
            "--top-n" => top_n = Some(value()?.parse()?),
            other => bail!("unknown flag: {other}"),
        }
    }

    let name = match name {
        Some(name) => name,
        None => bail!("--name is required"),
    };
    let requester = match email {
        Some(email) => RequesterIdentity::with_email(name, email),
        None => RequesterIdentity::named(name),
    };

    let response = match (domain, abstract_text) {
        (Some(domain), None) => engine.recommend_by_domain(&requester, &domain, top_n).await?,
        (None, Some(text)) => {
            engine
                .recommend_by_abstract(&requester, &text, top_n)
                .await?
        }
        _ => bail!("exactly one of --domain or --abstract is required"),
    };

    print_response(&response);
    Ok(())
}

fn print_response(response: &RecommendationResponse) {
    if response.degraded {
        println!("(serving fixture data; publication source unavailable)");
    }
    if response.recommendations.is_empty() {
        println!("no matching publications");
        return;
    }
    for (rank, rec) in response.recommendations.iter().enumerate() {
        println!("{:>2}. [{:.3}] {}", rank + 1, rec.score, rec.title);
        if !rec.abstract_short.is_empty() {
            println!("      {}", rec.abstract_short);
        }
        if !rec.url.is_empty() {
            println!("      {}", rec.url);
        }
    }
}

fn print_usage() {
    println!(
        "usage: scholaris <command>\n\
         \n\
         commands:\n\
         \x20 demo                      seed a demo corpus and run sample queries\n\
         \x20 recommend --name <n> (--domain <d> | --abstract <a>) [--email <e>] [--top-n <k>]\n\
         \x20 refresh                   force a full model rebuild\n\
         \x20 clear-cache               delete the persisted model snapshot"
    );
}

/// Demo records served by the built-in publication source.
fn demo_corpus() -> Vec<Publication> {
    let entries: [(&str, &str, &str, &[&str]); 6] = [
        (
            "demo-1",
            "A Survey of Machine Learning Methods",
            "We review supervised and unsupervised learning methods and their applications.",
            &["machine learning", "survey"],
        ),
        (
            "demo-2",
            "Content-Based Filtering for Scientific Literature",
            "A recommendation approach matching publication text against researcher interests.",
            &["recommendation systems", "information retrieval"],
        ),
        (
            "demo-3",
            "Spectral Methods in Graph Theory",
            "Eigenvalue techniques for analyzing the structure of large graphs.",
            &["graph theory", "spectral methods"],
        ),
        (
            "demo-4",
            "Deep Neural Networks for Image Classification",
            "Convolutional architectures achieving strong results on image benchmarks.",
            &["deep learning", "computer vision"],
        ),
        (
            "demo-5",
            "Statistical Analysis of Citation Networks",
            "Citation graphs studied with statistical and graph-theoretic tools.",
            &["bibliometrics", "graph theory"],
        ),
        (
            "demo-6",
            "Transfer Learning Across Scientific Domains",
            "Reusing fitted models between related machine learning tasks.",
            &["machine learning", "transfer learning"],
        ),
    ];

    entries
        .iter()
        .enumerate()
        .map(|(i, (id, title, abstract_text, keywords))| {
            let mut p = Publication::new(*id, *title, SourceOrigin::SemanticScholar);
            p.set_abstract(*abstract_text);
            p.set_keywords(keywords.iter().map(|k| k.to_string()).collect());
            p.year = Some(2020 + i as i32 % 5);
            p
        })
        .collect()
}
