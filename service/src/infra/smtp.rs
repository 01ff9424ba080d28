//! SMTP [`Mailer`] implementation.

use std::sync::LazyLock;

use derive_more::{Debug, Display, Error as StdError, From};
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor,
};
use secrecy::{ExposeSecret as _, SecretString};
use tracerr::Traced;

use crate::domain::customer;

/// MIME type of an attached iCalendar document.
static CALENDAR: LazyLock<ContentType> = LazyLock::new(|| {
    ContentType::parse("text/calendar; charset=utf-8; method=PUBLISH")
        .expect("valid MIME type")
});

/// [`Mailer`] configuration.
#[derive(Debug)]
pub struct Config {
    /// Host of the SMTP relay to connect to.
    pub host: String,

    /// Port of the SMTP relay to connect to.
    pub port: u16,

    /// Mailbox to send emails from.
    pub from: String,

    /// Username to authenticate on the SMTP relay with.
    pub user: Option<String>,

    /// Password to authenticate on the SMTP relay with.
    #[debug(skip)]
    pub password: Option<SecretString>,
}

/// SMTP mailer sending emails to [`customer`]s.
#[derive(Clone, Debug)]
pub struct Mailer {
    /// Mailbox the sent emails originate from.
    from: Mailbox,

    /// SMTP transport of this [`Mailer`].
    ///
    /// Established connections are reused between [`Mailer::send()`] calls.
    #[debug(skip)]
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Creates a new [`Mailer`] with the provided [`Config`].
    ///
    /// No connection is made yet: the relay is dialed lazily on the first
    /// [`Mailer::send()`] call.
    ///
    /// # Errors
    ///
    /// If the [`Config`] doesn't describe a usable SMTP relay.
    pub fn new(conf: Config) -> Result<Self, Traced<Error>> {
        let from = conf
            .from
            .parse::<Mailbox>()
            .map_err(tracerr::from_and_wrap!())?;

        let mut relay =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&conf.host)
                .map_err(tracerr::from_and_wrap!())?
                .port(conf.port);
        if let (Some(user), Some(password)) = (conf.user, conf.password) {
            relay = relay.credentials(Credentials::new(
                user,
                password.expose_secret().to_owned(),
            ));
        }

        Ok(Self {
            from,
            transport: relay.build(),
        })
    }

    /// Sends a plain-text email with an attached iCalendar document to the
    /// provided [`customer::Email`].
    ///
    /// # Errors
    ///
    /// If the message cannot be assembled or the SMTP relay refuses it.
    pub async fn send(
        &self,
        to: &customer::Email,
        subject: impl Into<String>,
        body: impl Into<String>,
        calendar: impl Into<String>,
    ) -> Result<(), Traced<Error>> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(AsRef::<str>::as_ref(to)
                .parse::<Mailbox>()
                .map_err(tracerr::from_and_wrap!())?)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.into()))
                    .singlepart(
                        Attachment::new("reservation.ics".into())
                            .body(calendar.into(), CALENDAR.clone()),
                    ),
            )
            .map_err(tracerr::from_and_wrap!())?;

        self.transport
            .send(message)
            .await
            .map(drop)
            .map_err(tracerr::from_and_wrap!())
    }
}

/// [`Mailer`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Mailbox address cannot be parsed.
    #[display("Invalid mailbox address: {_0}")]
    Address(lettre::address::AddressError),

    /// Email message cannot be assembled.
    #[display("Failed to assemble an email message: {_0}")]
    Message(lettre::error::Error),

    /// SMTP transport error.
    #[display("SMTP transport error: {_0}")]
    Transport(lettre::transport::smtp::Error),
}
