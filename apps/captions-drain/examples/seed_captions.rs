use lapin::{options::*, types::FieldTable, BasicProperties, Connection, ConnectionProperties};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::var("AMQP_URL").unwrap_or_else(|_| "amqp://localhost:5672".to_string());
    let queue = "captionsRequest";

    println!("Connecting to RabbitMQ...");
    let connection = Connection::connect(&url, ConnectionProperties::default()).await?;
    let channel = connection.create_channel().await?;

    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    let messages: [(&[u8], &str); 3] = [
        (br#"{"VideoId":"v1","S3Key":"s3://b/v1.vtt"}"#, "v1"),
        (br#"{"VideoId":"v2","S3Key":"s3://b/v2.vtt"}"#, "v2"),
        (b"not-json", "malformed payload"),
    ];

    for (payload, description) in messages {
        channel
            .basic_publish(
                "",
                queue,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await?
            .await?;

        println!("✓ Published: {}", description);
    }

    println!("Done! Run captions-drain to work through them.");
    connection.close(200, "Normal shutdown").await?;
    Ok(())
}
