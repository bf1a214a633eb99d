use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use captions_drain::config::Config;
use captions_drain::drain::{drain_queue, ConsolePrompt, DrainError, DrainReport};
use captions_drain::messaging::{
    ChannelError, ChannelProvider, ConnectionError, QueueError, RabbitMqConnection, RabbitMqQueue,
};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Drain(#[from] DrainError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    setup_panic_handler();
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            println!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    setup_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        queue = %config.queue_name,
        "Captions queue drain starting"
    );

    println!("RabbitMQ Message Queue Cleaner");
    println!("==============================");

    // On failure the connection is dropped without a close; the broker
    // redelivers whatever was left unacknowledged.
    match run(&config).await {
        Ok(report) => {
            info!(
                processed = report.processed,
                deleted = report.deleted,
                requeued = report.requeued,
                skipped = report.skipped,
                malformed = report.malformed,
                input_closed = report.input_closed,
                "Drain session finished"
            );
        }
        Err(e) => {
            println!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(config: &Config) -> Result<DrainReport, AppError> {
    let rabbitmq = RabbitMqConnection::connect(&config.amqp_url).await?;
    let channel = ChannelProvider::create_channel(rabbitmq.get_connection()).await?;

    let queue = RabbitMqQueue::new(channel, config.queue_name.clone());
    queue.declare().await?;

    println!("Connected to RabbitMQ. Checking queue: {}", queue.queue_name());

    let mut prompt = ConsolePrompt::stdio();
    let mut stdout = std::io::stdout();
    let report = drain_queue(&queue, &mut prompt, &mut stdout).await?;

    if let Err(e) = ChannelProvider::close_channel(queue.channel()).await {
        warn!(error = %e, "Channel close failed");
    }
    if let Err(e) = rabbitmq.shutdown().await {
        warn!(error = %e, "Connection close failed");
    }

    Ok(report)
}

fn setup_logging(rust_log: &str) {
    let filter = EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout belongs to the operator transcript.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "Unknown panic payload"
        };

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        eprintln!("PANIC: {} at {}", message, location);
        eprintln!("Thread: {:?}", std::thread::current().name());
    }));
}
