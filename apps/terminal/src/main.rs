use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ClientOptions, DispatchOutcome, FormFlow, FormValues, HttpRequestStore, LocationOutcome,
    RefreshOutcome, RequestFeedClient, SubmitOutcome,
};
use shared::domain::{FeedSource, RequestId};
use tracing_subscriber::EnvFilter;

mod config;
mod view;

use view::TerminalView;

#[derive(Parser, Debug)]
#[command(name = "request-feed", about = "Service request feed client")]
struct Args {
    /// Overrides `server_url` from client.toml / APP__SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Session cookie to send, e.g. `session=...`.
    #[arg(long)]
    session_cookie: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and print the request feed.
    Feed {
        #[arg(long)]
        provider: bool,
        #[arg(long, requires = "provider")]
        history: bool,
    },
    /// Submit a new service request.
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        details: String,
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        duration: String,
        #[arg(long, default_value = "")]
        wage: String,
        /// Location and availability confirmed ("Continue").
        #[arg(long)]
        confirmed: bool,
        /// The form is shown without a confirmation step.
        #[arg(long)]
        form_visible: bool,
        /// Only title and category are required.
        #[arg(long)]
        basic: bool,
    },
    /// Mark a request in the feed as serviced.
    MarkServiced { id: String },
    /// Save the receiver location and check provider availability.
    SaveLocation {
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(cookie) = args.session_cookie {
        settings.session_cookie = Some(cookie);
    }

    let store = Arc::new(HttpRequestStore::with_session_cookie(
        &settings.server_url,
        settings.session_cookie.as_deref(),
    )?);
    tracing::debug!(server_url = store.server_url(), "request store configured");

    let mut options = ClientOptions {
        source: settings.feed_source,
        flow: if settings.extended_form {
            FormFlow::Extended
        } else {
            FormFlow::Basic
        },
    };

    match args.command {
        Command::Feed { provider, history } => {
            if provider {
                options.source = FeedSource::Provider { history };
            }
            let client = RequestFeedClient::new(store, TerminalView::new(false).views(), options);
            if let RefreshOutcome::Failed(message) = client.feed.refresh().await {
                bail!("feed not loaded: {message}");
            }
        }
        Command::Submit {
            title,
            category,
            details,
            date,
            time,
            duration,
            wage,
            confirmed,
            form_visible,
            basic,
        } => {
            if basic {
                options.flow = FormFlow::Basic;
            }
            let client =
                RequestFeedClient::new(store, TerminalView::new(form_visible).views(), options);
            if confirmed {
                client.gate.unlock();
            }
            let values = FormValues {
                title,
                category,
                details,
                scheduled_date: date,
                scheduled_time: time,
                duration_min: duration,
                hourly_wage: wage,
            };
            match client.submission.submit(&values).await {
                SubmitOutcome::Created => {}
                outcome => bail!("request not submitted: {outcome:?}"),
            }
        }
        Command::MarkServiced { id } => {
            let client = RequestFeedClient::new(store, TerminalView::new(false).views(), options);
            client.feed.refresh().await;
            let id = RequestId::new(id);
            match client.actions.mark_serviced_by_id(&id).await {
                DispatchOutcome::Serviced { already: true } => {
                    println!("Request {id} was already serviced.");
                }
                DispatchOutcome::Serviced { already: false } => {
                    println!("Request {id} marked serviced.");
                }
                DispatchOutcome::NotWired => {
                    println!("Request {id} has no open action in the feed.");
                }
                DispatchOutcome::Ignored => {}
                DispatchOutcome::Failed(message) => bail!("request {id} not marked: {message}"),
            }
        }
        Command::SaveLocation { text, lat, lng } => {
            let client = RequestFeedClient::new(store, TerminalView::new(false).views(), options);
            if let LocationOutcome::Failed(message) =
                client.location.save_location(&text, lat, lng).await
            {
                bail!("location not saved: {message}");
            }
        }
    }

    Ok(())
}
