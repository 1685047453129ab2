//! CLI commands
//!
//! Every command opens the console page it stands for: the session is
//! restored from the data directory, the route guard decides whether the
//! page may be shown, and the page's hook does the work.

use agendify_core::constants::{DEFAULT_LIMIT, DEFAULT_PAGE, ROOMS, messages};
use agendify_core::format::{format_date, unformat_cep};
use agendify_core::forms::{
    self, FormError, is_valid_cep, is_valid_email, is_valid_password, validate_new_appointment,
};
use agendify_core::{AppointmentStatus, Permissions, Role};
use agendify_frontend_common::hooks::{AppointmentsHook, LogsHook, UserHook};
use agendify_frontend_common::{
    ConsoleConfig, FileStorage, GuardDecision, HistoryNavigator, Notice, Route, SessionState,
    SessionStore,
};
use agendify_http::client::address::AddressLookup;
use agendify_http::types::{
    Address, AppointmentFilters, CreateAppointment, CreateUser, ListUsersParams, LogFilters,
    MyAppointmentsParams, RegisterRequest, UpdateAppointment, UpdateUser,
};
use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Args, Subcommand, ValueEnum};
use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config;
use crate::notify::TerminalNotifier;
use crate::views;

/// A failure that was already shown to the user as a notice
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("already reported")
    }
}

impl std::error::Error for Reported {}

fn check(ok: bool) -> Result<()> {
    if ok { Ok(()) } else { Err(Reported.into()) }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and keep the session in the data directory
    Login {
        #[arg(long, env = "AGENDIFY_EMAIL")]
        email: String,

        /// Read from stdin when omitted
        #[arg(long, env = "AGENDIFY_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Create a customer account
    Register(RegisterArgs),

    /// Room bookings
    Appointments {
        #[command(subcommand)]
        command: AppointmentCommands,
    },

    /// Client accounts (administrators only)
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },

    /// Activity log
    Logs {
        #[command(subcommand)]
        command: LogCommands,
    },

    /// Your own account
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Look up an address by CEP
    Cep { cep: String },

    /// Configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Paging and layout shared by list commands
#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    page: u32,

    #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = clap::value_parser!(u32).range(1..=100))]
    limit: u32,

    /// One block per record instead of a table
    #[arg(long)]
    cards: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Review,
    Scheduled,
    Cancelled,
}

impl From<StatusArg> for AppointmentStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Review => AppointmentStatus::UnderReview,
            StatusArg::Scheduled => AppointmentStatus::Scheduled,
            StatusArg::Cancelled => AppointmentStatus::Cancelled,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RoleArg {
    Admin,
    Customer,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Customer => Role::Customer,
        }
    }
}

#[derive(Subcommand)]
pub enum AppointmentCommands {
    /// List appointments
    List {
        #[arg(long)]
        status: Option<StatusArg>,
        #[arg(long)]
        room: Option<String>,
        /// Exact day, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },

    /// List the appointments you booked
    Mine {
        #[arg(long)]
        status: Option<StatusArg>,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Request a room
    Create {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        time: String,
        #[arg(long)]
        room: String,
    },

    /// Change an appointment
    Update {
        id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        status: Option<StatusArg>,
    },

    /// Approve a request under review
    Confirm { id: String },

    Cancel { id: String },

    Delete { id: String },

    /// Rooms that can be booked
    Rooms,

    /// Booking figures
    Stats,
}

#[derive(Subcommand)]
pub enum ClientCommands {
    List {
        #[arg(long)]
        search: Option<String>,
        /// Only active (true) or inactive (false) accounts
        #[arg(long)]
        active: Option<bool>,
        #[command(flatten)]
        list: ListArgs,
    },

    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "AGENDIFY_CLIENT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: String,
        #[arg(long, default_value = "customer")]
        role: RoleArg,
        #[arg(long)]
        appointments: Option<bool>,
        #[arg(long)]
        logs: Option<bool>,
    },

    /// Activate or deactivate an account
    Toggle { id: String },

    /// Grant or revoke access to appointments and logs
    Permissions {
        id: String,
        #[arg(long)]
        appointments: Option<bool>,
        #[arg(long)]
        logs: Option<bool>,
    },

    Delete { id: String },
}

#[derive(Subcommand)]
pub enum LogCommands {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        module: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    Show,

    Update(ProfileArgs),

    /// Change your password
    Password {
        #[arg(long, env = "AGENDIFY_CURRENT_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "AGENDIFY_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Output file path (defaults to <data dir>/config.json)
        output: Option<PathBuf>,
    },

    /// Print the effective configuration
    Show,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    surname: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "AGENDIFY_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    cep: String,
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    complement: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    surname: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Street, neighborhood and city are looked up unless given
    #[arg(long)]
    cep: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    complement: Option<String>,
    #[arg(long)]
    neighborhood: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
}

impl Commands {
    pub async fn execute(self, config: ConsoleConfig) -> Result<()> {
        match self {
            Commands::Login { email, password } => login(&config, email, password).await,
            Commands::Logout => {
                let store = build_store(&config, Route::Appointments)?;
                store.sign_out();
                store.notifier().notify(Notice::success(messages::LOGOUT));
                Ok(())
            }
            Commands::Whoami => whoami(&config).await,
            Commands::Register(args) => register(&config, args).await,
            Commands::Appointments { command } => command.execute(&config).await,
            Commands::Clients { command } => command.execute(&config).await,
            Commands::Logs { command } => command.execute(&config).await,
            Commands::Profile { command } => command.execute(&config).await,
            Commands::Cep { cep } => lookup_cep(&cep).await,
            Commands::Config { command } => command.execute(&config),
        }
    }
}

impl AppointmentCommands {
    pub async fn execute(self, config: &ConsoleConfig) -> Result<()> {
        let store = enter(config, Route::Appointments).await?;
        let mut hook = AppointmentsHook::new(store.clone());

        match self {
            AppointmentCommands::List {
                status,
                room,
                date,
                from,
                to,
                search,
                list,
            } => {
                hook.fetch(AppointmentFilters {
                    status: status.map(Into::into),
                    room,
                    date,
                    date_from: from,
                    date_to: to,
                    search,
                    page: Some(list.page),
                    limit: Some(list.limit),
                    ..Default::default()
                })
                .await;
                check(hook.error().is_none())?;
                print!(
                    "{}",
                    views::appointments(hook.appointments(), hook.pagination().copied(), list.cards)
                );
                Ok(())
            }
            AppointmentCommands::Mine { status, list } => {
                let params = MyAppointmentsParams {
                    page: Some(list.page),
                    limit: Some(list.limit),
                    status: status.map(Into::into),
                };
                let response = store.client().my_appointments(&params).await?;
                print!(
                    "{}",
                    views::appointments(
                        &response.data.data,
                        Some(response.data.pagination),
                        list.cards
                    )
                );
                Ok(())
            }
            AppointmentCommands::Create { date, time, room } => {
                let today = Local::now().date_naive();
                validate_new_appointment(&date, &time, &room, today)?;
                let created = hook.create(CreateAppointment { date, time, room }).await;
                if let Some(appointment) = &created {
                    println!(
                        "{} {} at {} in {} ({})",
                        appointment.id,
                        format_date(&appointment.date),
                        appointment.time,
                        appointment.room,
                        appointment.status
                    );
                }
                check(created.is_some())
            }
            AppointmentCommands::Update {
                id,
                date,
                time,
                room,
                status,
            } => {
                validate_appointment_update(date.as_deref(), time.as_deref(), room.as_deref())?;
                let data = UpdateAppointment {
                    date,
                    time,
                    room,
                    status: status.map(Into::into),
                };
                check(hook.update(&id, data).await.is_some())
            }
            AppointmentCommands::Confirm { id } => check(hook.confirm(&id).await.is_some()),
            AppointmentCommands::Cancel { id } => check(hook.cancel(&id).await),
            AppointmentCommands::Delete { id } => check(hook.delete(&id).await),
            AppointmentCommands::Rooms => {
                let response = store.client().rooms().await?;
                let rooms = response
                    .data
                    .filter(|rooms| !rooms.is_empty())
                    .unwrap_or_else(|| ROOMS.iter().map(|r| r.to_string()).collect());
                for room in rooms {
                    println!("{room}");
                }
                Ok(())
            }
            AppointmentCommands::Stats => {
                let response = store.client().appointment_stats().await?;
                let stats = response
                    .data
                    .context("The server returned no statistics")?;
                print!("{}", views::stats(&stats));
                Ok(())
            }
        }
    }
}

impl ClientCommands {
    pub async fn execute(self, config: &ConsoleConfig) -> Result<()> {
        let store = enter(config, Route::Clients).await?;
        let mut hook = UserHook::new(store.clone());

        match self {
            ClientCommands::List {
                search,
                active,
                list,
            } => {
                hook.fetch(ListUsersParams {
                    page: Some(list.page),
                    limit: Some(list.limit),
                    search,
                    role: Some(Role::Customer),
                    is_active: active,
                })
                .await;
                check(hook.error().is_none())?;
                print!(
                    "{}",
                    views::clients(hook.clients(), hook.pagination().copied(), list.cards)
                );
                Ok(())
            }
            ClientCommands::Create {
                name,
                surname,
                email,
                password,
                phone,
                address,
                role,
                appointments,
                logs,
            } => {
                if [&name, &surname, &email, &password, &address]
                    .iter()
                    .any(|field| field.trim().is_empty())
                {
                    return Err(FormError::RequiredFields.into());
                }
                if !is_valid_email(&email) {
                    return Err(FormError::InvalidEmail.into());
                }
                if !is_valid_password(&password) {
                    return Err(FormError::InvalidPassword.into());
                }
                let permissions = (appointments.is_some() || logs.is_some()).then(|| Permissions {
                    appointments: appointments.unwrap_or(false),
                    logs: logs.unwrap_or(false),
                });
                let created = hook
                    .create(CreateUser {
                        name,
                        surname,
                        email,
                        password,
                        phone,
                        address,
                        role: Some(role.into()),
                        permissions,
                    })
                    .await;
                if let Some(user) = &created {
                    println!("{} {}", user.id, user.email);
                }
                check(created.is_some())
            }
            ClientCommands::Toggle { id } => {
                let updated = hook.toggle_status(&id).await;
                if let Some(user) = &updated {
                    let status = if user.is_active { "active" } else { "inactive" };
                    println!("{} is now {status}", user.email);
                }
                check(updated.is_some())
            }
            ClientCommands::Permissions {
                id,
                appointments,
                logs,
            } => {
                let current = store
                    .client()
                    .get_user(&id)
                    .await?
                    .data
                    .map(|user| user.permissions)
                    .unwrap_or_default();
                let permissions = Permissions {
                    appointments: appointments.unwrap_or(current.appointments),
                    logs: logs.unwrap_or(current.logs),
                };
                check(hook.update_permissions(&id, permissions).await.is_some())
            }
            ClientCommands::Delete { id } => check(hook.delete(&id).await),
        }
    }
}

impl LogCommands {
    pub async fn execute(self, config: &ConsoleConfig) -> Result<()> {
        let store = enter(config, Route::Logs).await?;
        let mut hook = LogsHook::new(store);

        match self {
            LogCommands::List {
                search,
                from,
                to,
                module,
                list,
            } => {
                hook.fetch(LogFilters {
                    search,
                    date_from: from,
                    date_to: to,
                    module,
                    page: Some(list.page),
                    limit: Some(list.limit),
                    ..Default::default()
                })
                .await;
                check(hook.error().is_none())?;
                print!(
                    "{}",
                    views::logs(hook.logs(), hook.pagination().copied(), list.cards)
                );
                Ok(())
            }
        }
    }
}

impl ProfileCommands {
    pub async fn execute(self, config: &ConsoleConfig) -> Result<()> {
        let store = enter(config, Route::Profile).await?;
        let mut hook = UserHook::new(store.clone());

        match self {
            ProfileCommands::Show => {
                let profile = hook.fetch_profile().await;
                if let Some(user) = &profile {
                    print!("{}", views::profile(user));
                }
                check(profile.is_some())
            }
            ProfileCommands::Update(args) => {
                let data = profile_update(&store, args).await?;
                check(hook.update_profile(data).await)
            }
            ProfileCommands::Password { current, new } => {
                if current.is_empty() || new.is_empty() {
                    return Err(FormError::RequiredFields.into());
                }
                if !is_valid_password(&new) {
                    return Err(FormError::InvalidPassword.into());
                }
                check(hook.update_password(&current, &new).await)
            }
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, config: &ConsoleConfig) -> Result<()> {
        match self {
            ConfigCommands::Init { output } => {
                let config_path = output.unwrap_or_else(|| config.data_dir.join("config.json"));

                // Create parent directory if it doesn't exist
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                config::generate_default_config(&config_path)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(config)?);
                Ok(())
            }
        }
    }
}

/// Wire up a session store for `route` without touching the network
fn build_store(config: &ConsoleConfig, route: Route) -> Result<SessionStore> {
    let client = config
        .build_client()
        .context("Failed to create API client")?;
    let storage = FileStorage::open(config.session_file())
        .with_context(|| format!("Failed to open {}", config.session_file().display()))?;
    let navigator = Arc::new(HistoryNavigator::new(route));
    Ok(SessionStore::new(
        client,
        Arc::new(storage),
        navigator,
        Arc::new(TerminalNotifier),
    ))
}

/// Restore the session and open `route`, as the guard allows
async fn enter(config: &ConsoleConfig, route: Route) -> Result<SessionStore> {
    let store = build_store(config, route.clone())?;
    store.initialize().await;

    match store.guard() {
        GuardDecision::Allow => Ok(store),
        GuardDecision::Redirect(Route::Login) => {
            bail!("Not signed in. Run `agendify login` first")
        }
        GuardDecision::Redirect(_) if route.is_public() => {
            bail!("Already signed in. Run `agendify logout` first")
        }
        GuardDecision::Redirect(_) => bail!("{route} is only available to administrators"),
        GuardDecision::Wait => bail!("The session could not be restored"),
    }
}

async fn login(config: &ConsoleConfig, email: String, password: Option<String>) -> Result<()> {
    let store = build_store(config, Route::Login)?;
    if let SessionState::Authenticated(identity) = store.initialize().await {
        println!(
            "Already signed in as {} <{}>",
            identity.full_name(),
            identity.email
        );
        return Ok(());
    }

    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };
    let identity = store
        .sign_in(&email, &password)
        .await
        .map_err(|_| Reported)?;
    info!(user = %identity.email, "session stored");
    println!("Signed in as {} ({})", identity.full_name(), identity.role);
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn whoami(config: &ConsoleConfig) -> Result<()> {
    let store = build_store(config, Route::Profile)?;
    match store.initialize().await {
        SessionState::Authenticated(identity) => {
            println!(
                "{} <{}> ({})",
                identity.full_name(),
                identity.email,
                identity.role
            );
            let menu = agendify_frontend_common::menu_for(identity.role)
                .iter()
                .map(|item| item.label)
                .collect::<Vec<_>>()
                .join(", ");
            println!("Pages: {menu}");
        }
        _ => println!("Not signed in"),
    }
    Ok(())
}

async fn register(config: &ConsoleConfig, args: RegisterArgs) -> Result<()> {
    let store = enter(config, Route::Register).await?;
    forms::validate_registration(
        &args.name,
        &args.surname,
        &args.email,
        &args.password,
        &args.cep,
    )?;

    let cep = unformat_cep(&args.cep);
    let address = match AddressLookup::viacep()?.lookup(&cep).await {
        Ok(address) => Some(address),
        Err(e) => {
            debug!(error = %e, "address lookup failed");
            store.notifier().notify(Notice::error("CEP not found"));
            None
        }
    };
    let address = address.unwrap_or_default();

    let request = RegisterRequest {
        name: args.name,
        surname: args.surname,
        email: args.email,
        password: args.password,
        cep,
        address: non_empty(address.address),
        number: args.number,
        complement: args.complement,
        neighborhood: non_empty(address.neighborhood),
        city: non_empty(address.city),
        state: non_empty(address.state),
    };

    match store.client().register(&request).await {
        Ok(_) => {
            store.notifier().notify(Notice::success(messages::REGISTER));
            store.navigator().navigate(Route::ClientLogin);
            println!("Sign in with `agendify login --email {}`", request.email);
            Ok(())
        }
        Err(e) => {
            store
                .notifier()
                .notify(Notice::error(e.user_message("Error creating account")));
            Err(Reported.into())
        }
    }
}

/// Build a profile update, filling the address from the CEP when it is not given
async fn profile_update(store: &SessionStore, args: ProfileArgs) -> Result<UpdateUser> {
    if args.email.as_deref().is_some_and(|email| !is_valid_email(email)) {
        return Err(FormError::InvalidEmail.into());
    }

    let cep = args.cep.as_deref().map(unformat_cep);
    let mut found = Address::default();
    if let Some(cep) = &cep {
        if !is_valid_cep(cep) {
            return Err(FormError::InvalidCep.into());
        }
        if args.address.is_none() {
            match AddressLookup::viacep()?.lookup(cep).await {
                Ok(address) => found = address,
                Err(e) => {
                    debug!(error = %e, "address lookup failed");
                    store.notifier().notify(Notice::error("CEP not found"));
                }
            }
        }
    }

    Ok(UpdateUser {
        name: args.name,
        surname: args.surname,
        email: args.email,
        password: None,
        cep,
        address: args.address.or(non_empty(found.address)),
        number: args.number,
        complement: args.complement,
        neighborhood: args.neighborhood.or(non_empty(found.neighborhood)),
        city: args.city.or(non_empty(found.city)),
        state: args.state.or(non_empty(found.state)),
    })
}

async fn lookup_cep(cep: &str) -> Result<()> {
    let digits = unformat_cep(cep);
    if !is_valid_cep(&digits) {
        return Err(FormError::InvalidCep.into());
    }
    let address = AddressLookup::viacep()?
        .lookup(&digits)
        .await
        .context("CEP not found")?;
    print!("{}", views::address(&digits, &address));
    Ok(())
}

/// Check the fields of an appointment change that were given
fn validate_appointment_update(
    date: Option<&str>,
    time: Option<&str>,
    room: Option<&str>,
) -> Result<(), FormError> {
    if let Some(date) = date {
        let day = forms::parse_date(date)?;
        if !forms::is_future_date(day, Local::now().date_naive()) {
            return Err(FormError::PastDate);
        }
        if !forms::is_weekday(day) {
            return Err(FormError::NotWeekday);
        }
    }
    if let Some(time) = time {
        if !forms::is_valid_time(time) {
            return Err(FormError::InvalidTime);
        }
        if !forms::is_within_business_hours(time) {
            return Err(FormError::OutsideBusinessHours);
        }
    }
    if let Some(room) = room.filter(|room| !forms::is_known_room(room)) {
        return Err(FormError::UnknownRoom(room.to_string()));
    }
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}
