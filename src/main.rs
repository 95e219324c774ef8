// ABOUTME: Main entry point for the his-poster program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand};
use his_poster::export::POSTER_FAILURE_MESSAGE;
use his_poster::layout::layout_slide;
use his_poster::pptx::PPTX_FILE;
use his_poster::{Config, Deck, Navigator, Poster};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the poster as a single A2 PDF page
    PosterPdf(CaptureArgs),

    /// Export the slide deck as an A4 landscape PDF, one page per slide
    DeckPdf(CaptureArgs),

    /// Export the slide deck as a native PowerPoint file
    DeckPptx(PptxArgs),

    /// Write the poster and deck pages as HTML files
    RenderHtml(RenderHtmlArgs),

    /// Serve the poster and deck with working controls
    Serve(ServeArgs),

    /// List the slides in the deck
    List,
}

#[derive(Args)]
struct CaptureArgs {
    /// Directory the PDF is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum time to wait for a slide to finish loading, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Minimum pause after switching slides, in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,
}

#[derive(Args)]
struct PptxArgs {
    /// Path to the output PPTX file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Presentation title stored in the document properties
    #[arg(short, long)]
    title: Option<String>,

    /// Fetch and embed each slide's background photograph
    #[arg(long)]
    embed_backgrounds: bool,
}

#[derive(Args)]
struct RenderHtmlArgs {
    /// Directory the HTML files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Zero-based index of the slide shown in the deck page
    #[arg(short, long, default_value_t = 0)]
    slide: usize,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result: his_poster::Result<()> = match cli.command {
        Some(Commands::PosterPdf(args)) => {
            println!("Exporting poster PDF...");
            let capture = config.get_capture_config(args.timeout_ms, args.settle_ms);
            let output_dir = config.output_dir(args.output_dir);
            match his_poster::export_poster_pdf(&Poster::healthcare(), &capture, &output_dir) {
                Ok(Some(path)) => {
                    println!("Poster saved to {:?}", path);
                    Ok(())
                }
                Ok(None) => {
                    println!("Nothing to export: the poster page has no capture region.");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("{}", POSTER_FAILURE_MESSAGE);
                    Err(e)
                }
            }
        }
        Some(Commands::DeckPdf(args)) => {
            println!("Exporting presentation PDF...");
            let deck = Deck::healthcare();
            let capture = config.get_capture_config(args.timeout_ms, args.settle_ms);
            let output_dir = config.output_dir(args.output_dir);
            Navigator::new(deck.len())
                .and_then(|mut navigator| {
                    his_poster::export_deck_pdf(&deck, &mut navigator, &capture, &output_dir)
                })
                .map(|path| println!("Presentation saved to {:?}", path))
        }
        Some(Commands::DeckPptx(args)) => {
            println!("Exporting presentation PPTX...");
            let pptx_config = config.get_pptx_config(args.title, args.embed_backgrounds);
            let output = args
                .output
                .unwrap_or_else(|| config.output_dir.join(PPTX_FILE));
            his_poster::generate_pptx(&Deck::healthcare(), &output, &pptx_config)
                .map(|()| println!("Presentation saved to {:?}", output))
        }
        Some(Commands::RenderHtml(args)) => {
            let deck = Deck::healthcare();
            let output_dir = config.output_dir(args.output_dir);
            let render = || -> his_poster::Result<()> {
                let mut navigator = Navigator::new(deck.len())?;
                navigator.jump_to(args.slide)?;

                let poster_path = output_dir.join("poster.html");
                let poster_html = his_poster::generate_poster_html(&Poster::healthcare())?;
                his_poster::write_html_to_file(&poster_html, &poster_path)?;

                let deck_path = output_dir.join("presentation.html");
                let deck_html = his_poster::generate_deck_html(&deck, &navigator)?;
                his_poster::write_html_to_file(&deck_html, &deck_path)?;

                println!("HTML written to {:?} and {:?}", poster_path, deck_path);
                Ok(())
            };
            render()
        }
        Some(Commands::Serve(args)) => {
            let serve_config = config.get_serve_config(args.host, args.port);
            info!("Starting viewer on port {}", serve_config.port);
            his_poster::serve(Deck::healthcare(), Poster::healthcare(), serve_config)
        }
        Some(Commands::List) => {
            let deck = Deck::healthcare();
            for (i, slide) in deck.slides().iter().enumerate() {
                let layout = layout_slide(slide);
                println!("{:>2}. [{}] {}", i + 1, layout.template.name(), slide.title);
            }
            Ok(())
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
