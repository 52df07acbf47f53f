use std::fs::File;
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::Context as _;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::prelude::CrosstermBackend;
use rollcall::app::App;
use rollcall::cli::Args;
use rollcall::io::TerminalHandle;
use rollcall::tui::Renderer;
use rollcall::{Highlight, NameList, Picker};
use tokio::select;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{
    EnvFilter, Layer as _, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

fn init_logging(args: &Args) -> color_eyre::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .wrap_err("Invalid log filter")?;

    let writer = match args.log_file() {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("Could not create log file {}", path.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::sink),
    };

    let logger = if args.log_json() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(false)
            .with_writer(writer)
            .boxed()
    };

    Registry::default().with(logger).with(env_filter).init();

    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<TerminalHandle>>,
    app: &mut App,
    mut highlights: UnboundedReceiver<Highlight>,
    token: CancellationToken,
) -> color_eyre::Result<()> {
    let mut renderer = Renderer::default();
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| renderer.render(frame, app))?;

        if app.should_quit() {
            break;
        }

        select! {
            event = events.next() => {
                match event {
                    Some(Ok(Event::Key(key))) => app.handle_input(key.into()).await?,
                    // Anything else, resizes included, only needs a redraw
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                }
            }
            Some(highlight) = highlights.recv() => {
                app.handle_highlight(highlight);
            }
            _ = token.cancelled() => {
                debug!("Graceful shutdown");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args)?;

    info!(version = rollcall::VERSION, "Starting");

    let token = CancellationToken::new();
    let (picker, highlights) =
        Picker::spawn(NameList::default(), args.picker_config(), token.clone());

    let mut app = App::new(picker);
    if let Some(path) = args.names() {
        app.load(path).await?;
    }

    let terminal_handle = TerminalHandle::start()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(terminal_handle))?;
    terminal.clear()?;

    let result = run(&mut terminal, &mut app, highlights, token.clone()).await;

    token.cancel();
    terminal.show_cursor()?;
    terminal.backend_mut().writer_mut().leave_alternate_screen()?;

    result
}
