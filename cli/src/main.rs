//! `hawksoft`: command-line companion for the HawkSoft partner API client.
//!
//! # Quick start
//!
//! ```sh
//! # Offline walkthrough of the date conventions:
//! hawksoft dates
//!
//! # Live calls (credentials from the environment):
//! HAWKSOFT_USERNAME=... HAWKSOFT_PASSWORD=... hawksoft agencies
//!
//! # Against a local mock server:
//! hawksoft --base-url http://127.0.0.1:3000 -u partner -p secret client 1001 1
//! ```
//!
//! Without credentials, network subcommands fall back to printing the list
//! of available operations.

mod dates;
mod transport;

use std::io::{self, Write};

use anyhow::Context;
use chrono::{DateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use hawksoft_core::dateutil::{format_date, format_date_time, parse_date};
use hawksoft_core::{BasicAuth, ClientData, HawkSoftClient, DEFAULT_BASE_URL};
use tracing_subscriber::EnvFilter;

use transport::Transport;

/// hawksoft: HawkSoft partner API client
#[derive(Parser)]
#[command(name = "hawksoft", version, about, long_about = None)]
struct Cli {
    /// Base URL of the partner API.
    #[arg(long, env = "HAWKSOFT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Partner username for Basic authentication.
    #[arg(short, long, env = "HAWKSOFT_USERNAME")]
    username: Option<String>,

    /// Partner password for Basic authentication.
    #[arg(short, long, env = "HAWKSOFT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk through the API's date conventions offline.
    Dates,

    /// Print the operations this client supports.
    Operations,

    #[command(flatten)]
    Remote(RemoteCommand),
}

/// Subcommands that call the partner API and need credentials.
#[derive(Subcommand)]
enum RemoteCommand {
    /// List agencies subscribed to this partner.
    Agencies,

    /// List office locations of an agency.
    Offices { agency: i64 },

    /// Show one client with its policies, claims and invoices.
    Client { agency: i64, client: i64 },

    /// List clients changed since a date.
    Changed {
        agency: i64,
        /// Date as YYYY-MM-DD, interpreted as midnight UTC.
        #[arg(long, value_name = "DATE")]
        since: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "hawksoft=info,hawksoft_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let command = match cli.command {
        Command::Dates => {
            dates::run(&mut std::io::stdout().lock(), Utc::now().naive_utc())?;
            return Ok(());
        }
        Command::Operations => {
            print_operations();
            return Ok(());
        }
        Command::Remote(command) => command,
    };

    let (Some(username), Some(password)) = (cli.username, cli.password) else {
        println!("HAWKSOFT_USERNAME and HAWKSOFT_PASSWORD are not set.");
        println!("Showing the available operations instead of calling the API.\n");
        print_operations();
        return Ok(());
    };

    let client = HawkSoftClient::new(&cli.base_url, BasicAuth::new(username, password));
    run_remote(&mut std::io::stdout().lock(), &client, &Transport::new(), command)
}

/// Turn a `--since` date into midnight UTC of that day.
fn since_midnight_utc(since: &str) -> anyhow::Result<DateTime<Utc>> {
    let date = parse_date(since)
        .with_context(|| format!("invalid --since {since:?}"))?
        .context("--since must not be empty")?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

fn run_remote(
    out: &mut impl Write,
    client: &HawkSoftClient,
    transport: &Transport,
    command: RemoteCommand,
) -> anyhow::Result<()> {
    tracing::info!("using partner API at {}", client.base_url());

    match command {
        RemoteCommand::Agencies => {
            let resp = transport.execute(client.build_get_agencies())?;
            let agencies = client.parse_get_agencies(resp)?;
            writeln!(out, "Found {} agencies: {agencies:?}", agencies.len())?;
        }
        RemoteCommand::Offices { agency } => {
            let resp = transport.execute(client.build_get_agency_offices(agency))?;
            for office in client.parse_get_agency_offices(resp)? {
                writeln!(
                    out,
                    "{:>6}  {}  {}",
                    office.office_id,
                    office.office_description.as_deref().unwrap_or("-"),
                    office.city.as_deref().unwrap_or("")
                )?;
            }
        }
        RemoteCommand::Client { agency, client: id } => {
            let resp = transport.execute(client.build_get_client(agency, id))?;
            print_client(out, &client.parse_get_client(resp)?)?;
        }
        RemoteCommand::Changed { agency, since } => {
            let as_of = since_midnight_utc(&since)?;
            let resp = transport.execute(client.build_get_changed_clients(agency, as_of))?;
            let ids = client.parse_get_changed_clients(resp)?;
            writeln!(
                out,
                "{} clients changed since {}: {ids:?}",
                ids.len(),
                format_date(Some(as_of.date_naive()))
            )?;
        }
    }

    Ok(())
}

fn print_client(out: &mut impl Write, data: &ClientData) -> io::Result<()> {
    writeln!(out, "Client {}", data.client_number)?;
    for person in &data.people {
        writeln!(
            out,
            "  person  {}  born {}",
            person.display_name(),
            format_date_time(person.date_of_birth())
        )?;
    }
    for policy in &data.policies {
        writeln!(
            out,
            "  policy  {} {} [{}]  {} .. {}",
            policy.carrier,
            policy.policy_number.as_deref().unwrap_or("-"),
            policy.status,
            format_date_time(policy.effective_date()),
            format_date_time(policy.expiration_date())
        )?;
    }
    for claim in &data.claims {
        writeln!(
            out,
            "  claim   {}  loss {}",
            claim.claim_number.as_deref().unwrap_or("-"),
            format_date_time(claim.loss_date())
        )?;
    }
    for invoice in &data.invoices {
        writeln!(
            out,
            "  invoice {}  {}  due {}",
            invoice.invoice_number.as_deref().unwrap_or("-"),
            format_date(invoice.invoice_date()),
            format_date(invoice.due_date())
        )?;
    }
    Ok(())
}

fn print_operations() {
    println!("=== HawkSoft Partner API Client ===\n");
    println!("Available operations:");
    println!("1. get_agencies() - list subscribed agencies");
    println!("2. get_agency_offices(agency) - offices for an agency");
    println!("3. get_changed_clients(agency, as_of) - clients changed since a timestamp");
    println!("4. get_client(agency, client) - one client with all details");
    println!("5. get_client_list(agency, client_numbers) - several clients at once");
    println!("6. search_clients(agency, policy_number) - find clients by policy");
    println!("7. create_log_note(agency, client, note) - attach a log note");
    println!("8. create_receipts(agency, client, receipts) - record payments");
    println!("\nData models: ClientData, ClientDetails, Policy, Person, Contact, Claim, Invoice, Office");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start_server() -> String {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                mock_server::run(listener).await
            })
            .unwrap();
        });

        format!("http://{addr}")
    }

    fn run_against(base: &str, command: RemoteCommand) -> anyhow::Result<String> {
        let client = HawkSoftClient::new(base, BasicAuth::new("partner", "secret"));
        let mut buf = Vec::new();
        run_remote(&mut buf, &client, &Transport::new(), command)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn since_is_midnight_utc() {
        assert_eq!(
            since_midnight_utc("2024-06-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
        assert!(since_midnight_utc("").is_err());
        assert!(since_midnight_utc("2024-6-1").is_err());
        assert!(since_midnight_utc("2024-06-01T00:00:00").is_err());
    }

    #[test]
    fn remote_commands_against_mock_server() {
        let base = start_server();
        let agency = mock_server::SEED_AGENCY;

        let text = run_against(&base, RemoteCommand::Agencies).unwrap();
        assert!(text.contains("Found 2 agencies: [1001, 1002]"), "{text}");

        let text = run_against(&base, RemoteCommand::Offices { agency }).unwrap();
        assert!(text.contains("Main Street"), "{text}");

        // The messy client's seed timestamp is exactly midnight of this day.
        let changed = |since: &str| RemoteCommand::Changed {
            agency,
            since: since.to_string(),
        };
        let text = run_against(&base, changed("2024-10-08")).unwrap();
        assert!(text.contains("1 clients changed since 2024-10-08: [2]"), "{text}");
        let text = run_against(&base, changed("2024-10-09")).unwrap();
        assert!(text.contains("0 clients changed since 2024-10-09: []"), "{text}");
        assert!(run_against(&base, changed("10/08/2024")).is_err());

        let text = run_against(&base, RemoteCommand::Client { agency, client: 1 }).unwrap();
        assert!(text.contains("person  Ada Lovelace"), "{text}");
        assert!(text.contains("2024-10-08T00:00:00 .. 2025-10-08T00:00:00"), "{text}");
        assert!(text.contains("invoice INV-1  2024-10-08  due 2024-11-07"), "{text}");

        let text = run_against(&base, RemoteCommand::Client { agency, client: 2 }).unwrap();
        assert!(text.contains("invoice INV-2    due "), "{text}");
    }

    #[test]
    fn transport_returns_error_statuses_as_data() {
        let base = start_server();
        let client = HawkSoftClient::new(&base, BasicAuth::new("partner", "secret"));
        let transport = Transport::new();

        let resp = transport
            .execute(client.build_get_client(mock_server::SEED_AGENCY, 999))
            .unwrap();
        assert_eq!(resp.status, 404);
        assert!(matches!(
            client.parse_get_client(resp),
            Err(hawksoft_core::ApiError::NotFound)
        ));

        let resp = transport
            .execute(client.build_get_client_list(mock_server::SEED_AGENCY, &[1]).unwrap())
            .unwrap();
        assert_eq!(resp.status, 200);
        assert!(resp
            .headers
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case("content-type") && v.starts_with("application/json")));
        assert_eq!(client.parse_get_client_list(resp).unwrap()[0].client_number, 1);
    }
}
