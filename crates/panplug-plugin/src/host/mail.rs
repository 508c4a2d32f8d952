//! Outbound e-mail for scripts.
//!
//! Messages go out over SMTP with STARTTLS and PLAIN authentication; the
//! account name doubles as the sender address. Failures are logged and
//! reported to the script as `false`.

use std::time::Duration;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::{debug, warn};

/// Submission port used when the server string carries none.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Body flavor of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailBody {
    /// `text/plain`
    Text,
    /// `text/html`
    Html,
}

/// One message as scripts describe it.
#[derive(Debug, Clone, Copy)]
pub struct MailRequest<'a> {
    /// `host` or `host:port`.
    pub server: &'a str,
    /// SMTP account, also used as the sender.
    pub user_name: &'a str,
    /// SMTP password.
    pub password: &'a str,
    /// Recipient address.
    pub to: &'a str,
    /// Subject line.
    pub subject: &'a str,
    /// Message body.
    pub body: &'a str,
}

#[derive(Debug, Error)]
enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("message build failed: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Blocking SMTP sender.
#[derive(Debug, Clone)]
pub struct Mailer {
    /// Connection and command timeout.
    timeout: Duration,
}

impl Mailer {
    /// Creates a sender with the given network timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Sends a plain-text message. Returns whether the server accepted it.
    pub fn send_text(&self, request: &MailRequest<'_>) -> bool {
        self.send(request, MailBody::Text)
    }

    /// Sends an HTML message. Returns whether the server accepted it.
    pub fn send_html(&self, request: &MailRequest<'_>) -> bool {
        self.send(request, MailBody::Html)
    }

    /// Sends a message with the given body flavor.
    pub fn send(&self, request: &MailRequest<'_>, kind: MailBody) -> bool {
        match self.try_send(request, kind) {
            Ok(()) => {
                debug!(server = %request.server, to = %request.to, "Script mail sent");
                true
            }
            Err(e) => {
                warn!(server = %request.server, to = %request.to, error = %e, "Script mail failed");
                false
            }
        }
    }

    fn try_send(&self, request: &MailRequest<'_>, kind: MailBody) -> Result<(), MailError> {
        let (host, port) = split_server(request.server);

        let message = Message::builder()
            .from(request.user_name.parse::<Mailbox>()?)
            .to(request.to.parse::<Mailbox>()?)
            .subject(request.subject)
            .header(match kind {
                MailBody::Text => ContentType::TEXT_PLAIN,
                MailBody::Html => ContentType::TEXT_HTML,
            })
            .body(request.body.to_string())?;

        // Server certificates are not verified.
        let tls = TlsParameters::builder(host.to_string())
            .dangerous_accept_invalid_certs(true)
            .build()?;
        let transport = SmtpTransport::builder_dangerous(host)
            .port(port)
            .tls(Tls::Required(tls))
            .credentials(Credentials::new(
                request.user_name.to_string(),
                request.password.to_string(),
            ))
            .authentication(vec![Mechanism::Plain])
            .timeout(Some(self.timeout))
            .build();

        transport.send(&message)?;
        Ok(())
    }
}

/// Splits `host:port`, falling back to the submission port.
fn split_server(server: &str) -> (&str, u16) {
    match server.rsplit_once(':') {
        Some((host, port)) => match port.parse() {
            Ok(port) => (host, port),
            Err(_) => (server, DEFAULT_SMTP_PORT),
        },
        None => (server, DEFAULT_SMTP_PORT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(server: &'a str, to: &'a str) -> MailRequest<'a> {
        MailRequest {
            server,
            user_name: "robot@example.com",
            password: "secret",
            to,
            subject: "upload finished",
            body: "<b>done</b>",
        }
    }

    #[test]
    fn test_split_server() {
        assert_eq!(split_server("smtp.example.com:465"), ("smtp.example.com", 465));
        assert_eq!(split_server("smtp.example.com"), ("smtp.example.com", DEFAULT_SMTP_PORT));
        assert_eq!(split_server("smtp.example.com:abc"), ("smtp.example.com:abc", DEFAULT_SMTP_PORT));
    }

    #[test]
    fn test_unreachable_server_returns_false() {
        let mailer = Mailer::new(Duration::from_secs(2));
        assert!(!mailer.send_text(&request("127.0.0.1:1", "someone@example.com")));
        assert!(!mailer.send_html(&request("127.0.0.1:1", "someone@example.com")));
    }

    #[test]
    fn test_invalid_recipient_returns_false() {
        let mailer = Mailer::new(Duration::from_secs(2));
        assert!(!mailer.send_text(&request("127.0.0.1:1", "not an address")));
    }
}
