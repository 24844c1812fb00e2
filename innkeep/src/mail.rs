//! Confirmation mail and the background delivery queue.
//!
//! Delivery is a collaborator behind the [`Mailer`] trait. The booking path
//! never talks to a mailer directly: it hands messages to a [`MailQueue`],
//! whose worker thread delivers them one at a time. Enqueueing never blocks;
//! when the queue is full the message is dropped with a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::reservation::Reservation;

/// Sender address used when none is configured.
pub const DEFAULT_SENDER: &str = "hotel-booking@mail.com";

/// Subject line of booking confirmations.
pub const CONFIRMATION_SUBJECT: &str = "Reservation confirmation";

/// Template name passed along with confirmations.
pub const CONFIRMATION_TEMPLATE: &str = "basic.html";

/// Default number of messages the queue holds before dropping.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// One outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Recipient address.
    pub to: String,
    /// Sender address.
    pub from: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub content: String,
    /// Template the transport should wrap the body in.
    pub template: String,
}

/// Builds the guest confirmation for a committed reservation.
///
/// # Examples
///
/// ```
/// use innkeep::mail::confirmation_message;
/// use innkeep::validation::ReservationForm;
/// use innkeep::{Reservation, RoomId, StayRange};
///
/// let guest = ReservationForm::new("Alice", "Lee", "a@b.com", "").validate().unwrap();
/// let stay = StayRange::parse("2024-06-01", "2024-06-05").unwrap();
/// let reservation = Reservation::builder(1, RoomId::new(7), stay, guest).build();
///
/// let message = confirmation_message(&reservation, "desk@inn.example");
/// assert_eq!(message.to, "a@b.com");
/// assert!(message.content.contains("Dear Alice"));
/// assert!(message.content.contains("2024-06-01"));
/// ```
#[must_use]
pub fn confirmation_message(reservation: &Reservation, from: &str) -> MailMessage {
    let stay = reservation.stay();
    let content = format!(
        "<strong>Reservation Confirmation</strong><br>\
         Dear {}, <br>\
         This is to confirm your reservation from {} to {}.",
        escape_html(reservation.guest().first_name()),
        stay.start_str(),
        stay.end_str(),
    );

    MailMessage {
        to: reservation.guest().email().to_string(),
        from: from.to_string(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        content,
        template: CONFIRMATION_TEMPLATE.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Mail transport.
#[cfg_attr(test, mockall::automock)]
pub trait Mailer: Send {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed to the transport.
    fn deliver(&self, message: &MailMessage) -> Result<()>;
}

/// Mailer that only logs what it would send.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn deliver(&self, message: &MailMessage) -> Result<()> {
        log::info!(
            "Mail to {} from {}: {} ({} bytes, template {})",
            message.to,
            message.from,
            message.subject,
            message.content.len(),
            message.template
        );
        Ok(())
    }
}

/// Mailer that writes each message as a JSON file into a directory.
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    dir: PathBuf,
}

impl OutboxMailer {
    /// Creates an outbox mailer writing into `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the outbox directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads back every message in the outbox, oldest file name first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a message file cannot be read.
    pub fn read_all(&self) -> Result<Vec<MailMessage>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        paths
            .iter()
            .map(|path| Ok(serde_json::from_slice(&fs::read(path)?)?))
            .collect()
    }
}

impl Mailer for OutboxMailer {
    fn deliver(&self, message: &MailMessage) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.6f");
        let path = self
            .dir
            .join(format!("{stamp}-{}.json", Uuid::new_v4().simple()));
        fs::write(&path, serde_json::to_vec_pretty(message)?)?;
        log::debug!("Wrote mail for {} to {}", message.to, path.display());
        Ok(())
    }
}

/// Bounded queue with a single delivery worker.
///
/// Dropping the queue closes it and waits for queued messages to be
/// delivered.
#[derive(Debug)]
pub struct MailQueue {
    sender: Option<SyncSender<MailMessage>>,
    worker: Option<JoinHandle<()>>,
}

impl MailQueue {
    /// Starts the delivery worker.
    ///
    /// A `capacity` of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be spawned.
    pub fn start(mailer: Box<dyn Mailer>, capacity: usize) -> Result<Self> {
        let (sender, receiver) = mpsc::sync_channel(capacity.max(1));

        let worker = thread::Builder::new()
            .name("innkeep-mail".into())
            .spawn(move || deliver_all(mailer.as_ref(), &receiver))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Hands a message to the worker without blocking.
    ///
    /// Returns `false` if the message was dropped because the queue is full
    /// or the worker has stopped.
    pub fn enqueue(&self, message: MailMessage) -> bool {
        let Some(sender) = &self.sender else {
            log::error!("Mail queue is closed; dropping mail to {}", message.to);
            return false;
        };

        match sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                log::warn!("Mail queue is full; dropping mail to {}", message.to);
                false
            }
            Err(TrySendError::Disconnected(message)) => {
                log::error!("Mail worker has stopped; dropping mail to {}", message.to);
                false
            }
        }
    }

    /// Closes the queue and waits for pending messages to be delivered.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        // Dropping the sender ends the worker's receive loop
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.join() {
                log::error!("Mail worker panicked: {e:?}");
            }
        }
    }
}

impl Drop for MailQueue {
    fn drop(&mut self) {
        self.close();
    }
}

fn deliver_all(mailer: &dyn Mailer, receiver: &Receiver<MailMessage>) {
    while let Ok(message) = receiver.recv() {
        if let Err(e) = mailer.deliver(&message) {
            log::error!("Failed to deliver mail to {}: {e}", message.to);
        }
    }
}
