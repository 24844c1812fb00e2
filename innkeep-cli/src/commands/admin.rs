//! Admin command implementation.
//!
//! Staff pages: reservation lists, the reservation detail view, and the
//! mutations behind its buttons. Every mutation prints its confirmation and
//! the list page it returns to.

use crate::commands::list::ListCommand;
use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, parse_stay, GlobalOptions};
use clap::{Args, Subcommand};
use innkeep::operations::{AdminOutcome, AdminReservations, ReservationSource};
use innkeep::validation::ReservationForm;
use innkeep::{Database, Reservation, RoomId};

/// Staff reservation management.
#[derive(Args)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub action: AdminAction,
}

/// Admin actions.
#[derive(Subcommand)]
pub enum AdminAction {
    /// List reservations
    List(ListCommand),

    /// Show one reservation
    Show {
        /// Reservation ID
        id: i64,
    },

    /// Change the guest details of a reservation
    Update(UpdateArgs),

    /// Mark a reservation processed
    Process {
        /// Reservation ID
        id: i64,

        /// List the action came from (new or all)
        #[arg(long, default_value = "all")]
        src: ReservationSource,
    },

    /// Delete a reservation and free its room
    Delete {
        /// Reservation ID
        id: i64,

        /// List the action came from (new or all)
        #[arg(long, default_value = "all")]
        src: ReservationSource,
    },

    /// Block a room for the owner
    Block {
        /// Room ID
        #[arg(long, value_name = "ID")]
        room: i64,

        /// First blocked night (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        start: String,

        /// Day after the last blocked night (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        end: String,
    },

    /// Remove an owner block
    Unblock {
        /// Restriction ID
        id: i64,
    },

    /// Show what blocks a room over a date window
    Restrictions {
        /// Room ID
        #[arg(long, value_name = "ID")]
        room: i64,

        /// Window start (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        start: String,

        /// Window end (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        end: String,
    },
}

/// Arguments for `admin update`.
///
/// Fields left out keep their stored value.
#[derive(Args)]
pub struct UpdateArgs {
    /// Reservation ID
    pub id: i64,

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

    /// List the action came from (new or all)
    #[arg(long, default_value = "all")]
    pub src: ReservationSource,
}

impl UpdateArgs {
    fn merged_form(&self, current: &Reservation) -> ReservationForm {
        let mut form = ReservationForm::from_guest(current.guest());
        if let Some(value) = &self.first_name {
            form.first_name.clone_from(value);
        }
        if let Some(value) = &self.last_name {
            form.last_name.clone_from(value);
        }
        if let Some(value) = &self.email {
            form.email.clone_from(value);
        }
        if let Some(value) = &self.phone {
            form.phone.clone_from(value);
        }
        form
    }
}

impl AdminCommand {
    /// Execute the admin command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        match self.action {
            AdminAction::List(list) => list.execute(global),
            action => run(action, global),
        }
    }
}

fn run(action: AdminAction, global: &GlobalOptions) -> Result<(), CliError> {
    let config = load_configuration(global)?;
    let db = open_database(global, &config)?;
    let admin = AdminReservations::new(&db);

    match action {
        AdminAction::List(list) => list.execute(global),
        AdminAction::Show { id } => {
            let reservation = admin.show(id)?;
            print_reservation(&reservation);
            Ok(())
        }
        AdminAction::Update(args) => {
            let current = admin.show(args.id)?;
            let form = args.merged_form(&current);
            print_outcome(&admin.update(args.id, &form, args.src)?);
            Ok(())
        }
        AdminAction::Process { id, src } => {
            print_outcome(&admin.process(id, src)?);
            Ok(())
        }
        AdminAction::Delete { id, src } => {
            print_outcome(&admin.delete(id, src)?);
            Ok(())
        }
        AdminAction::Block { room, start, end } => {
            let stay = parse_stay(&start, &end)?;
            let id = admin.block(RoomId::new(room), &stay)?;
            println!("Room {room} blocked from {stay} (restriction {id})");
            Ok(())
        }
        AdminAction::Unblock { id } => {
            admin.unblock(id)?;
            println!("Owner block {id} removed");
            Ok(())
        }
        AdminAction::Restrictions { room, start, end } => {
            let window = parse_stay(&start, &end)?;
            let room_id = RoomId::new(room);
            let name = db
                .with_deadline(|conn| Database::require_room(conn, room_id))?
                .name;
            let restrictions = admin.restrictions(room_id, &window)?;

            println!("{name}: {} restriction(s) over {window}", restrictions.len());
            for restriction in &restrictions {
                let source = match restriction.reservation_id {
                    Some(reservation_id) => format!("reservation {reservation_id}"),
                    None => restriction.kind.to_string(),
                };
                println!(
                    "  {}\t{}\t{}\t{}",
                    restriction.id,
                    restriction.stay.start_str(),
                    restriction.stay.end_str(),
                    source
                );
            }
            Ok(())
        }
    }
}

fn print_outcome(outcome: &AdminOutcome) {
    println!("{}", outcome.flash);
    println!("Redirect: {}", outcome.redirect);
}

fn print_reservation(reservation: &Reservation) {
    let guest = reservation.guest();
    println!("Reservation {}", reservation.id());
    println!("  First name: {}", guest.first_name());
    println!("  Last name:  {}", guest.last_name());
    println!("  Email:      {}", guest.email());
    println!("  Phone:      {}", guest.phone());
    println!(
        "  Room:       {} ({})",
        reservation.room_name(),
        reservation.room_id()
    );
    println!("  Arrival:    {}", reservation.stay().start_str());
    println!("  Departure:  {}", reservation.stay().end_str());
    println!(
        "  Processed:  {}",
        if reservation.is_processed() { "yes" } else { "no" }
    );
    println!("  Created:    {}", format_timestamp(reservation.created_at()));
    println!("  Updated:    {}", format_timestamp(reservation.updated_at()));
}
