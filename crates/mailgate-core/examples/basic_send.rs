//! Send a plain email and one with an attachment
//!
//! Expects `mailgate_credentials.json` in the working directory. On first run
//! it prints an authorization URL and waits for the code; the token is then
//! kept in `mailgate_token.json` for later runs.

use mailgate_core::{AuthConfig, ConsolePrompt, Email, MailClient};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("mailgate=debug".parse()?))
        .init();

    let config = AuthConfig::new("mailgate_credentials.json", "mailgate_token.json");
    let client = MailClient::connect(config, &ConsolePrompt).await?;

    let email = Email::new("Test from mailgate", "This is a test message from mailgate")
        .to("recipient@example.com");

    let result = client.send_email(&email).await;
    match &result.error {
        None => println!("Email sent successfully. ID: {}", result.message_id),
        Some(error) => eprintln!("Error sending email: {}", error),
    }

    let mut with_attachment = Email::new("Email with Attachment", "<p>See the attached file.</p>")
        .to("recipient@example.com")
        .html();
    with_attachment.attach_file("document.txt", b"File content".to_vec(), Some("text/plain"));

    let result = client.send_email(&with_attachment).await;
    match &result.error {
        None => println!("HTML email sent. ID: {}", result.message_id),
        Some(error) => eprintln!("Error sending HTML email: {}", error),
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
