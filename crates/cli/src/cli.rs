use clap::Parser;
use std::path::PathBuf;

/// Interactive document question answering.
///
/// Indexes every supported document under a folder and answers free-text
/// questions against the combined corpus in a terminal REPL.
#[derive(Parser, Debug)]
#[command(name = "docqa-cli", about = "Interactive document question answering")]
pub struct CliArgs {
    /// Folder scanned for documents (pdf, txt, md)
    #[arg(long, env = "DOCS_DIR")]
    pub docs: Option<PathBuf>,

    /// Chunk cache directory override
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// How many chunks are retrieved per question
    #[arg(long)]
    pub top_k: Option<usize>,
}
