//! Interactive Papyrix session: extract a PDF, summarize it, store it,
//! then answer questions from stdin until `exit`.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use papyrix_common::PapyrixConfig;
use papyrix_db::{Database, DocumentRecord, DocumentRepository};
use papyrix_ingestion::{
    extract_citations, extract_from_path, format_citation_list, IngestError,
};
use papyrix_model::{answer_query, suggest_questions, summarize, GeneratorConfig, T5Generator};

#[derive(Parser)]
#[command(name = "papyrix", about = "Summarize a PDF and answer questions about it")]
struct Cli {
    /// Path to the PDF to analyze.
    pdf: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = PapyrixConfig::load()?;

    let extracted = match extract_from_path(&cli.pdf) {
        Ok(doc) => doc,
        Err(e @ IngestError::FileNotFound(_)) => {
            eprintln!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let citations = extract_citations(&extracted.pages);
    info!(
        pages = extracted.page_count,
        citations = citations.len(),
        "Extraction complete"
    );

    println!("Loading model {}...", config.model.model_id);
    let generator = T5Generator::new(GeneratorConfig {
        model_id: config.model.model_id.clone(),
        max_input_tokens: config.model.max_input_tokens,
        use_gpu: config.model.use_gpu,
    })
    .await?;

    let summary = summarize(&generator, &extracted.full_text).await?;
    println!("\nSummary of the document:");
    println!("{summary}");

    let questions = suggest_questions(&summary);
    println!("\nSuggested questions:");
    for (i, question) in questions.iter().enumerate() {
        println!("{}. {}", i + 1, question);
    }

    let db = Database::open(&config.database.uri).await?;
    db.initialize().await?;
    let repo = DocumentRepository::new(db);
    repo.insert(&DocumentRecord::new(
        extracted.full_text.as_str(),
        summary.as_str(),
    ))
    .await?;

    println!("\nExtracted citations:");
    for citation in &citations {
        println!("{citation}");
    }

    let stdin = std::io::stdin();
    loop {
        print!("\nEnter your query (or type 'exit' to quit): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.eq_ignore_ascii_case("exit") {
            println!("Exiting.");
            break;
        }
        if query.is_empty() {
            continue;
        }

        let answer = answer_query(&generator, &extracted.full_text, query).await?;
        println!("Answer: {answer}");
        println!("Citations: {}", format_citation_list(&citations));
    }

    Ok(())
}
