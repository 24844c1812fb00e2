//! Reservation listing for `admin list`.
//!
//! Displays reservations in various formats (table, JSON, CSV, TSV).

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_database, GlobalOptions};
use clap::{Args, ValueEnum};
use innkeep::operations::{AdminReservations, ReservationSource};
use innkeep::Reservation;
use std::io::Write;

/// Column headers for CSV/TSV output.
const COLUMN_HEADERS: [&str; 10] = [
    "id",
    "last_name",
    "first_name",
    "email",
    "phone",
    "room",
    "start_date",
    "end_date",
    "processed",
    "created_at",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Only unprocessed reservations
    #[arg(long)]
    pub new: bool,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "table",
        env = "INNKEEP_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// Output format for list command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let db = open_database(global, &config)?;

        let src = if self.new {
            ReservationSource::New
        } else {
            ReservationSource::All
        };
        let reservations = AdminReservations::new(&db).list(src)?;

        match self.format {
            OutputFormat::Table => format_as_table(&reservations)?,
            OutputFormat::Json => format_as_json(&reservations)?,
            OutputFormat::Csv => format_as_delimited(&reservations, b',')?,
            OutputFormat::Tsv => format_as_delimited(&reservations, b'\t')?,
        }

        Ok(())
    }
}

fn processed_label(res: &Reservation) -> &'static str {
    if res.is_processed() {
        "yes"
    } else {
        "no"
    }
}

/// Format reservations as a human-readable table.
fn format_as_table(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for res in reservations {
        let guest = res.guest();
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            res.id(),
            guest.last_name(),
            guest.first_name(),
            guest.email(),
            if guest.phone().is_empty() { "-" } else { guest.phone() },
            res.room_name(),
            res.stay().start_str(),
            res.stay().end_str(),
            processed_label(res),
            format_timestamp(res.created_at()),
        )?;
    }

    Ok(())
}

/// Format reservations as JSON.
fn format_as_json(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let json_data: Vec<serde_json::Value> = reservations
        .iter()
        .map(|r| {
            let guest = r.guest();
            serde_json::json!({
                "id": r.id(),
                "first_name": guest.first_name(),
                "last_name": guest.last_name(),
                "email": guest.email(),
                "phone": guest.phone(),
                "room_id": r.room_id(),
                "room": r.room_name(),
                "start_date": r.stay().start_str(),
                "end_date": r.stay().end_str(),
                "processed": r.is_processed(),
                "created_at": format_timestamp(r.created_at()),
                "updated_at": format_timestamp(r.updated_at()),
            })
        })
        .collect();

    serde_json::to_writer_pretty(&mut handle, &json_data)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    writeln!(handle)?;

    Ok(())
}

/// Convert csv::Error to CliError.
fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

/// Format reservations as delimited output (CSV or TSV).
fn format_as_delimited(reservations: &[Reservation], delimiter: u8) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(handle);

    writer.write_record(COLUMN_HEADERS).map_err(csv_error)?;

    for res in reservations {
        let guest = res.guest();
        writer
            .write_record([
                res.id().to_string(),
                guest.last_name().to_string(),
                guest.first_name().to_string(),
                guest.email().to_string(),
                guest.phone().to_string(),
                res.room_name().to_string(),
                res.stay().start_str(),
                res.stay().end_str(),
                processed_label(res).to_string(),
                format_timestamp(res.created_at()),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;

    Ok(())
}
