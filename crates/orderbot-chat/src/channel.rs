use async_trait::async_trait;

/// Outbound side of a hosting UI: the "send text message" primitive.
///
/// Delivery failures (a closed socket, a broken pipe) are the host's concern
/// and are not reported back to the relay.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Show `text` to the user as a bot message
    async fn send_text(&self, text: &str);

    /// Show a failed exchange to the user; hosts may style it differently
    async fn send_error(&self, text: &str) {
        self.send_text(text).await;
    }
}
