use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use complaintcare_server::{
    app,
    config::Config,
    db::Database,
    services::{
        mailer::{DisabledMailer, MailSender, SmtpMailer},
        storage::FileStorage,
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "complaintcare_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let storage = FileStorage::new(&config.upload_dir);
    storage.init().await?;

    let db = Database::connect(&config.database_url).await?;
    db.run_migrations().await?;

    let mailer: Arc<dyn MailSender> = match &config.mail {
        Some(mail) => {
            tracing::info!(host = %mail.smtp_host, port = mail.smtp_port, "Email delivery enabled");
            Arc::new(SmtpMailer::new(mail)?)
        }
        None => {
            tracing::warn!("EMAIL_USER/EMAIL_PASS not set; email delivery disabled");
            Arc::new(DisabledMailer)
        }
    };

    let state = AppState {
        db,
        storage,
        mailer,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
