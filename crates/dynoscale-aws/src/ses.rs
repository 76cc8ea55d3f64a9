//! SES as the notification channel.

use async_trait::async_trait;
use aws_sdk_ses::Client;
use aws_sdk_ses::error::BuildError;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use tracing::debug;

use dynoscale_core::DynoscaleResult;
use dynoscale_core::service::Notifier;

use crate::error::{build_error, sdk_error};

const SERVICE: &str = "ses";
const CHARSET: &str = "UTF-8";

/// SES mail sender.
#[derive(Debug, Clone)]
pub struct SesNotifier {
    client: Client,
}

impl SesNotifier {
    /// Wrap an SDK client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn send_notification(
        &self,
        sender: &str,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> DynoscaleResult<()> {
        let message =
            build_message(subject, html_body).map_err(|e| build_error(SERVICE, "SendEmail", e))?;
        let destination = Destination::builder()
            .set_to_addresses(Some(recipients.to_vec()))
            .build();

        let output = self
            .client
            .send_email()
            .source(sender)
            .destination(destination)
            .message(message)
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "SendEmail", e))?;
        debug!(
            message_id = output.message_id(),
            recipients = recipients.len(),
            subject,
            "sent capacity notification"
        );
        Ok(())
    }
}

/// UTF-8 message with an HTML body.
pub fn build_message(subject: &str, html_body: &str) -> Result<Message, BuildError> {
    let subject = Content::builder().data(subject).charset(CHARSET).build()?;
    let html = Content::builder().data(html_body).charset(CHARSET).build()?;
    Ok(Message::builder()
        .subject(subject)
        .body(Body::builder().html(html).build())
        .build())
}
