//! Make-reservation command implementation.
//!
//! Without any field flags this shows the reservation form for the room in
//! the session draft. With field flags it submits the form: rejected fields
//! are listed and nothing is stored, otherwise the booking is committed and
//! its summary printed.

use crate::commands::summary::print_summary;
use crate::error::CliError;
use crate::utils::{with_booking_flow, GlobalOptions};
use clap::Args;
use innkeep::operations::{ReservationView, SubmitOutcome};
use innkeep::validation::ReservationForm;
use innkeep::FormErrors;

/// Show or submit the reservation form.
#[derive(Args)]
pub struct MakeReservationCommand {
    /// Guest first name
    #[arg(long, value_name = "NAME")]
    pub first_name: Option<String>,

    /// Guest last name
    #[arg(long, value_name = "NAME")]
    pub last_name: Option<String>,

    /// Guest email address
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Guest phone number
    #[arg(long, value_name = "PHONE")]
    pub phone: Option<String>,
}

enum Page {
    Form(ReservationView),
    Submitted(SubmitOutcome),
}

impl MakeReservationCommand {
    /// Execute the make-reservation command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let form = self.form();

        let page = with_booking_flow(global, |flow| match &form {
            None => Ok(Page::Form(flow.reservation_form()?)),
            Some(form) => Ok(Page::Submitted(flow.submit(form)?)),
        })?;

        match page {
            Page::Form(view) => {
                print_view(&view);
                Ok(())
            }
            Page::Submitted(SubmitOutcome::Committed(summary)) => {
                print_summary(&summary);
                Ok(())
            }
            Page::Submitted(SubmitOutcome::Invalid { errors, .. }) => {
                print_errors(&errors);
                Err(CliError::InvalidArguments(format!(
                    "{} field(s) rejected",
                    errors.len()
                )))
            }
        }
    }

    fn form(&self) -> Option<ReservationForm> {
        if self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
        {
            return None;
        }
        Some(ReservationForm::new(
            self.first_name.clone().unwrap_or_default(),
            self.last_name.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
            self.phone.clone().unwrap_or_default(),
        ))
    }
}

fn print_view(view: &ReservationView) {
    println!("Make reservation");
    println!("  Room:      {}", view.room.name);
    println!("  Arrival:   {}", view.stay.start_str());
    println!("  Departure: {}", view.stay.end_str());
    println!();
    println!("  First name: {}", view.form.first_name);
    println!("  Last name:  {}", view.form.last_name);
    println!("  Email:      {}", view.form.email);
    println!("  Phone:      {}", view.form.phone);
    println!();
    println!("Submit with: innkeep make-reservation --first-name .. --last-name .. --email .. [--phone ..]");
}

fn print_errors(errors: &FormErrors) {
    eprintln!("The form has errors:");
    for (field, messages) in errors.iter() {
        for message in messages {
            eprintln!("  {field}: {message}");
        }
    }
}
