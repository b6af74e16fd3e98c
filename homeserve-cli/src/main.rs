//! homeserve - drive the Homeserve client store from a terminal

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use libhomeserve::api::{LoginRequest, NearbyQuery, OtpRequest, ProfileUpdate, SignupRequest};
use libhomeserve::config::{resolve_config_path, Config};
use libhomeserve::logging::LoggingConfig;
use libhomeserve::types::{
    Address, Booking, NewAddress, NewBooking, Provider, Service, User, UserRole,
};
use libhomeserve::{ActionError, HomeserveError, Store};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "homeserve")]
#[command(version, about = "Home-services marketplace client")]
#[command(long_about = r#"Sign in, manage bookings and browse the service catalog from the terminal.

Session data (who is signed in, profile, saved addresses) is kept between
runs; everything else is fetched fresh by each command.

EXAMPLES:
    # Sign in (password can also come from HOMESERVE_PASSWORD)
    homeserve login --email ana@example.com --password secret

    # Book a cleaning
    homeserve services category cleaning
    homeserve bookings create --service s1 --at 2026-05-01T09:00:00Z --address "Rua Augusta 10"

    # Provider side
    homeserve bookings accept b1
    homeserve bookings complete b1 --notes "All done"

    # JSON output for scripting
    homeserve --format json bookings list | jq '.[] | select(.status == "pending")'

EXIT CODES:
    0 - Success
    1 - Request or configuration error
    2 - Not signed in or session expired
    3 - Invalid input
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: ~/.config/homeserve/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "HOMESERVE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        #[arg(long, env = "HOMESERVE_PASSWORD", hide_env_values = true)]
        password: String,

        /// customer or provider
        #[arg(long, default_value = "customer")]
        role: UserRole,
    },

    /// Confirm a phone number with the code sent by SMS
    VerifyOtp {
        #[arg(long)]
        phone: String,

        #[arg(long)]
        otp: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show the profile, or update it when any field is given
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Saved addresses
    Addresses {
        #[command(subcommand)]
        command: Option<AddressCommand>,
    },

    /// Bookings and their lifecycle
    Bookings {
        #[command(subcommand)]
        command: BookingCommand,
    },

    /// Service catalog
    Services {
        #[command(subcommand)]
        command: ServiceCommand,
    },

    /// Service providers
    Providers {
        #[command(subcommand)]
        command: ProviderCommand,
    },
}

#[derive(Subcommand, Debug)]
enum AddressCommand {
    /// List saved addresses (default)
    List,

    /// Save a new address
    Add {
        #[arg(long)]
        label: String,

        #[arg(long)]
        line: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        postal_code: Option<String>,

        /// Make this the default address
        #[arg(long)]
        default: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BookingCommand {
    /// List bookings, newest first
    List,

    /// Fetch one booking
    Show { id: String },

    /// Book a service
    Create {
        /// Service id
        #[arg(long)]
        service: String,

        /// Provider id, if a specific provider was chosen
        #[arg(long)]
        provider: Option<String>,

        /// Start time (RFC 3339, e.g. 2026-05-01T09:00:00Z)
        #[arg(long, value_name = "DATETIME")]
        at: String,

        #[arg(long)]
        address: String,

        /// Extra option id (repeatable)
        #[arg(long = "extra", value_name = "ID")]
        extras: Vec<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Accept a pending booking (provider)
    Accept { id: String },

    /// Reject a pending booking (provider)
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Start work on an accepted booking (provider)
    Start { id: String },

    /// Mark a booking as done (provider)
    Complete {
        id: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Cancel a booking
    Cancel {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },

    /// Rate a completed booking
    Rate {
        id: String,

        /// 1 to 5
        #[arg(long)]
        rating: u8,

        #[arg(long)]
        review: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ServiceCommand {
    /// Full catalog
    List,

    /// Services in one category
    Category { name: String },

    /// Free-text search
    Search { query: String },
}

#[derive(Subcommand, Debug)]
enum ProviderCommand {
    /// Providers offering a service near a point, best rated first
    Nearby {
        #[arg(long)]
        service: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Search radius in kilometres
        #[arg(long, default_value = "10")]
        radius: f64,
    },

    /// Provider details
    Show { id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.verbose();
    }
    logging.try_init();

    // Args carry the password, so only the output format is logged
    tracing::debug!(format = %cli.format, "homeserve started");

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<HomeserveError>() {
        return e.exit_code();
    }
    if let Some(e) = error.downcast_ref::<ActionError>() {
        return HomeserveError::Action(e.clone()).exit_code();
    }
    1
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => resolve_config_path()?,
    };
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    let store = Store::from_config(&config)?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { email, password } => {
            let response = store.login(LoginRequest { email, password }).await?;
            emit(json, &response.user, print_user)?;
        }

        Commands::Signup {
            name,
            email,
            phone,
            password,
            role,
        } => {
            let response = store
                .signup(SignupRequest {
                    name,
                    email,
                    phone: phone.clone(),
                    password,
                    role,
                })
                .await?;
            emit(json, &response, |r| {
                print_user(&r.user);
                if store.state().auth.awaiting_verification {
                    println!(
                        "Verification code sent. Run: homeserve verify-otp --phone {} --otp <CODE>",
                        phone
                    );
                }
            })?;
        }

        Commands::VerifyOtp { phone, otp } => {
            let response = store.verify_otp(OtpRequest { phone, otp }).await?;
            emit(json, &response.user, print_user)?;
        }

        Commands::Logout => {
            store.logout().await;
            if !json {
                println!("Signed out");
            }
        }

        Commands::Whoami => {
            let state = store.state();
            match &state.auth.user {
                Some(user) if state.auth.is_authenticated => emit(json, user, print_user)?,
                Some(user) if state.auth.awaiting_verification => {
                    bail!("{} has not verified their phone number yet", user.email)
                }
                _ => bail!("Not signed in. Run: homeserve login --email <EMAIL>"),
            }
        }

        Commands::Profile { name, email, phone } => {
            let update = ProfileUpdate {
                name,
                email,
                phone,
                ..ProfileUpdate::default()
            };
            let profile = if update == ProfileUpdate::default() {
                store.fetch_profile().await?
            } else {
                store.update_profile(update).await?
            };
            emit(json, &profile, print_user)?;
        }

        Commands::Addresses { command } => match command.unwrap_or(AddressCommand::List) {
            AddressCommand::List => {
                let addresses = store.fetch_addresses().await?;
                emit(json, &addresses, |list| list.iter().for_each(print_address))?;
            }
            AddressCommand::Add {
                label,
                line,
                city,
                postal_code,
                default,
            } => {
                let address = store
                    .add_address(NewAddress {
                        label,
                        line,
                        city,
                        postal_code,
                        coordinates: None,
                        is_default: default,
                    })
                    .await?;
                emit(json, &address, print_address)?;
            }
        },

        Commands::Bookings { command } => run_bookings(&store, command, json).await?,

        Commands::Services { command } => {
            let services = match command {
                ServiceCommand::List => store.fetch_services().await?,
                ServiceCommand::Category { name } => store.fetch_services_by_category(&name).await?,
                ServiceCommand::Search { query } => store.search_services(&query).await?,
            };
            emit(json, &services, |list| list.iter().for_each(print_service))?;
        }

        Commands::Providers { command } => match command {
            ProviderCommand::Nearby {
                service,
                lat,
                lng,
                radius,
            } => {
                store
                    .fetch_nearby_providers(NearbyQuery {
                        service_id: service,
                        latitude: lat,
                        longitude: lng,
                        radius_km: radius,
                    })
                    .await?;
                let state = store.state();
                let providers = state.service.providers_by_rating();
                emit(json, &providers, |list| list.iter().for_each(|p| print_provider(p)))?;
            }
            ProviderCommand::Show { id } => {
                let provider = store.fetch_provider_by_id(&id).await?;
                emit(json, &provider, print_provider)?;
            }
        },
    }

    Ok(())
}

async fn run_bookings(store: &Store, command: BookingCommand, json: bool) -> Result<()> {
    let booking = match command {
        BookingCommand::List => {
            let bookings = store.fetch_bookings().await?;
            return emit(json, &bookings, |list| list.iter().for_each(print_booking));
        }
        BookingCommand::Show { id } => store.fetch_booking_by_id(&id).await?,
        BookingCommand::Create {
            service,
            provider,
            at,
            address,
            extras,
            notes,
        } => {
            let scheduled_at = parse_datetime(&at)?;
            store
                .create_booking(NewBooking {
                    service_id: service,
                    provider_id: provider,
                    scheduled_at,
                    address,
                    extras,
                    notes,
                })
                .await?
        }
        BookingCommand::Accept { id } => store.accept_booking(&id).await?,
        BookingCommand::Reject { id, reason } => {
            store.reject_booking(&id, reason.as_deref()).await?
        }
        BookingCommand::Start { id } => store.start_booking(&id).await?,
        BookingCommand::Complete { id, notes } => {
            store.complete_booking(&id, notes.as_deref()).await?
        }
        BookingCommand::Cancel { id, reason } => {
            store.cancel_booking(&id, reason.as_deref()).await?
        }
        BookingCommand::Rate { id, rating, review } => {
            store.rate_booking(&id, rating, review.as_deref()).await?
        }
    };
    emit(json, &booking, print_booking)
}

/// Parse an RFC 3339 timestamp
fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value).map_err(|_| {
        HomeserveError::InvalidInput(format!(
            "Invalid date: {}. Use RFC 3339, e.g. 2026-05-01T09:00:00Z",
            value
        ))
    })?;
    Ok(parsed.with_timezone(&Utc))
}

/// Print `value` as pretty JSON, or hand it to `text` for human output
fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn print_user(user: &User) {
    println!("{} <{}> ({})", user.name, user.email, user.role);
    println!("  id: {}", user.id);
    println!("  phone: {}", user.phone);
    if !user.is_verified {
        println!("  not verified");
    }
}

fn print_address(address: &Address) {
    let marker = if address.is_default { "*" } else { " " };
    let city = address.city.as_deref().unwrap_or("");
    println!("{} {} | {} | {} {}", marker, address.id, address.label, address.line, city);
}

fn print_booking(booking: &Booking) {
    println!(
        "{} | {} | {} | {:.2} | {}",
        booking.id,
        booking.status,
        booking.scheduled_at.format("%Y-%m-%d %H:%M"),
        booking.amount,
        booking.address
    );
    if let Some(rating) = booking.rating {
        let review = booking
            .review
            .as_deref()
            .map(|r| format!(": {}", r))
            .unwrap_or_default();
        println!("  rated {}/5{}", rating, review);
    }
}

fn print_service(service: &Service) {
    println!(
        "{} | {} | {} | from {:.2} | {} min",
        service.id, service.category, service.name, service.base_price, service.duration_minutes
    );
    for extra in &service.extras {
        println!("  + {} ({}) {:.2}", extra.name, extra.id, extra.price);
    }
}

fn print_provider(provider: &Provider) {
    let available = if provider.is_available { "available" } else { "busy" };
    println!(
        "{} | {} | {:.1} ({} reviews) | {}",
        provider.id(),
        provider.user.name,
        provider.rating,
        provider.review_count,
        available
    );
    if !provider.skills.is_empty() {
        println!("  {}", provider.skills.join(", "));
    }
}
