//! itinerary - command-line front-end for the itinerary planning service
//!
//! Every subcommand maps onto one typed call of [`ApiClient`].

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use itinerary_client::constants::TOKEN_ENV;
use itinerary_client::models::HttpMethod;
use itinerary_client::{
    render, to_curl, ActivityCategory, ActivityPlacement, ActivityUpdate, ApiClient,
    BudgetLevel, ClientConfig, ExternalUser, GenerateItineraryRequest, PreferredTransport,
    RequestOptions, TravelMode, TravelStyle, TravelTimeRequest, UserDirectory,
};

#[derive(Parser, Debug)]
#[command(name = "itinerary", version, about = "Plan and inspect trip itineraries")]
struct Cli {
    /// Backend base URL, e.g. http://localhost:8080/api
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token from the auth provider
    #[arg(long, global = true, env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Attempts for retryable failures
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Config file (defaults to ~/.itinerary/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Liveness probe
    Health {
        /// Probe /actuator/health instead of /health
        #[arg(long)]
        actuator: bool,
    },
    /// Probe both health endpoints and report
    Diagnose,
    /// Generate a new itinerary
    Generate(GenerateArgs),
    /// Show one itinerary as a schedule
    Show {
        id: String,
        /// Include the daily forecast
        #[arg(long)]
        weather: bool,
    },
    /// List the signed-in user's itineraries
    Mine,
    /// List itineraries owned by a backend user
    ListUser { user_id: String },
    /// Public itineraries for a destination
    ByDestination {
        destination: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Search public itineraries
    Search { destination: String },
    /// Change an itinerary's title
    Rename { id: String, title: String },
    /// Delete an itinerary
    Delete { id: String },
    /// Weather forecast for a destination and date range
    Weather {
        destination: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// Activity search
    Activities(ActivitiesCommand),
    /// Estimated travel time between two places
    TravelTime {
        origin: String,
        destination: String,
        #[arg(long, default_value = "walking")]
        mode: TravelMode,
    },
    /// Add an activity to a day plan
    AddActivity {
        itinerary_id: String,
        day_id: String,
        activity_id: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Minutes
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Change the time slot of a scheduled activity
    UpdateActivity {
        itinerary_id: String,
        day_id: String,
        activity_id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Remove an activity from a day plan
    RemoveActivity {
        itinerary_id: String,
        day_id: String,
        activity_id: String,
    },
    /// Reorder a day plan's activities
    Reorder {
        itinerary_id: String,
        day_id: String,
        #[arg(required = true, num_args = 1..)]
        activity_ids: Vec<String>,
    },
    /// User preferences
    Prefs(PrefsCommand),
    /// Resolve the backend user id for an auth-provider identity
    Whoami(IdentityArgs),
    /// Send an arbitrary request to the backend
    Raw {
        method: HttpMethod,
        endpoint: String,
        /// JSON body
        #[arg(long)]
        data: Option<String>,
        /// Print the equivalent cURL command instead of sending
        #[arg(long)]
        curl: bool,
        /// Do not mask the bearer token in --curl output
        #[arg(long)]
        reveal_token: bool,
    },
    /// Client configuration file
    Config(ConfigCommand),
}

#[derive(Args, Debug)]
struct IdentityArgs {
    /// Auth-provider user id
    #[arg(long)]
    clerk_id: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    name: Option<String>,
}

impl IdentityArgs {
    fn external_user(&self) -> ExternalUser {
        ExternalUser {
            id: self.clerk_id.clone(),
            email: self.email.clone(),
            full_name: self.name.clone(),
            first_name: None,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    destination: String,
    #[arg(long)]
    start: NaiveDate,
    #[arg(long)]
    end: NaiveDate,
    #[arg(long)]
    title: Option<String>,
    /// Backend user id; resolved from --clerk-id when absent
    #[arg(long, conflicts_with = "clerk_id")]
    user_id: Option<String>,
    #[arg(long)]
    clerk_id: Option<String>,
    #[arg(long, requires = "clerk_id")]
    email: Option<String>,
    #[arg(long, requires = "clerk_id")]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct ActivitiesCommand {
    #[command(subcommand)]
    command: ActivitiesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ActivitiesSubcommand {
    Search {
        destination: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Query {
        q: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },
    Popular {
        destination: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Nearby {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
        /// Kilometres
        #[arg(long)]
        radius: Option<f64>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Args, Debug)]
struct PrefsCommand {
    #[command(subcommand)]
    command: PrefsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PrefsSubcommand {
    Get {
        user_id: String,
    },
    Set {
        user_id: String,
        #[arg(long)]
        budget: Option<BudgetLevel>,
        #[arg(long)]
        style: Option<TravelStyle>,
        #[arg(long)]
        transport: Option<PreferredTransport>,
        /// Repeatable
        #[arg(long = "interest")]
        interests: Vec<String>,
        /// Repeatable
        #[arg(long = "dietary")]
        dietary: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Write a config file with the current settings
    Init {
        #[arg(long)]
        force: bool,
    },
}

struct Session {
    client: ApiClient,
    token: Option<String>,
    json: bool,
}

impl Session {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text(value));
        }
        Ok(())
    }
}

fn init_logging(config: &ClientConfig) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    match &config.log_file {
        Some(path) => {
            let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
            let file = path.file_name().context("log_file must name a file")?;
            let file_appender = tracing_appender::rolling::never(dir, file);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                .with_writer(non_blocking)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<(ClientConfig, PathBuf)> {
    let path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let mut config = ClientConfig::load_from(&path)?;
    config.apply_env();
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(retries) = cli.retries {
        config.retries = retries;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    Ok((config, path))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_path) = resolve_config(&cli)?;
    let _guard = init_logging(&config)?;

    let ctx = Session {
        client: ApiClient::from_config(&config),
        token: cli.token.clone(),
        json: cli.json,
    };

    run(cli.command, &ctx, &config, &config_path).await
}

async fn run(command: Command, ctx: &Session, config: &ClientConfig, config_path: &std::path::Path) -> anyhow::Result<()> {
    let client = &ctx.client;

    match command {
        Command::Health { actuator } => {
            let status = if actuator {
                client.actuator_health().await?
            } else {
                client.health().await?
            };
            ctx.emit(&status, |s| format!("{}\n", s.status))?;
        }

        Command::Diagnose => {
            let report = client.diagnose().await;
            print!("{}", render::diagnostics(&report));
            if !report.reachable() {
                bail!("backend at {} is unreachable", report.base_url);
            }
        }

        Command::Generate(args) => {
            let user_id = match (&args.user_id, &args.clerk_id) {
                (Some(id), _) => id.clone(),
                (None, Some(clerk_id)) => {
                    let directory = UserDirectory::new(client.clone());
                    let external = ExternalUser {
                        id: clerk_id.clone(),
                        email: args.email.clone(),
                        full_name: args.name.clone(),
                        first_name: None,
                    };
                    directory.backend_user_id(&external, ctx.token()).await?
                }
                (None, None) => bail!("pass --user-id or --clerk-id"),
            };

            let mut request = GenerateItineraryRequest::new(args.destination, args.start, args.end);
            request.title = args.title;
            let itinerary = client.generate_itinerary(&user_id, &request, ctx.token()).await?;
            ctx.emit(&itinerary, |it| render::itinerary(it, &[]))?;
        }

        Command::Show { id, weather } => {
            let itinerary = client.itinerary(&id, ctx.token()).await?;
            let forecasts = if weather {
                client
                    .weather_forecast_or_empty(&itinerary.destination, itinerary.start_date, itinerary.end_date)
                    .await
            } else {
                Vec::new()
            };
            ctx.emit(&itinerary, |it| render::itinerary(it, &forecasts))?;
        }

        Command::Mine => {
            let list = client.my_itineraries(ctx.token()).await?;
            ctx.emit(&list, |l| render::itinerary_list(l))?;
        }

        Command::ListUser { user_id } => {
            let list = client.user_itineraries(&user_id, ctx.token()).await?;
            ctx.emit(&list, |l| render::itinerary_list(l))?;
        }

        Command::ByDestination { destination, limit } => {
            let list = client.itineraries_by_destination(&destination, limit).await?;
            ctx.emit(&list, |l| render::itinerary_list(l))?;
        }

        Command::Search { destination } => {
            let list = client.search_itineraries(&destination).await?;
            ctx.emit(&list, |l| render::itinerary_list(l))?;
        }

        Command::Rename { id, title } => {
            let itinerary = client.update_itinerary_title(&id, &title, ctx.token()).await?;
            ctx.emit(&itinerary, |it| format!("Renamed {} to \"{}\"\n", it.id, it.title))?;
        }

        Command::Delete { id } => {
            client.delete_itinerary(&id, ctx.token()).await?;
            println!("Deleted {}", id);
        }

        Command::Weather { destination, start, end } => {
            let forecasts = client.weather_forecast(&destination, start, end).await?;
            ctx.emit(&forecasts, |f| render::weather(f))?;
        }

        Command::Activities(cmd) => match cmd.command {
            ActivitiesSubcommand::Search { destination, category, limit } => {
                let category = category.as_deref().map(ActivityCategory::from);
                let list = client.search_activities(&destination, category.as_ref(), limit).await?;
                ctx.emit(&list, |l| render::activities(l))?;
            }
            ActivitiesSubcommand::Query { q, page, size } => {
                let page = client.query_activities(&q, page, size).await?;
                ctx.emit(&page, |p| {
                    format!(
                        "{}Page {} of {} ({} total)\n",
                        render::activities(&p.content),
                        p.number + 1,
                        p.total_pages.max(1),
                        p.total_elements
                    )
                })?;
            }
            ActivitiesSubcommand::Popular { destination, limit } => {
                let list = client.popular_activities(&destination, limit).await?;
                ctx.emit(&list, |l| render::activities(l))?;
            }
            ActivitiesSubcommand::Nearby { lat, lng, radius, limit } => {
                let list = client.nearby_activities(lat, lng, radius, limit).await?;
                ctx.emit(&list, |l| render::activities(l))?;
            }
        },

        Command::TravelTime { origin, destination, mode } => {
            let request = TravelTimeRequest { origin, destination, mode };
            let estimate = client.travel_time(&request, ctx.token()).await?;
            ctx.emit(&estimate, |e| match e.distance_km {
                Some(km) => format!("{} min ({:.1} km)\n", e.duration_minutes, km),
                None => format!("{} min\n", e.duration_minutes),
            })?;
        }

        Command::AddActivity { itinerary_id, day_id, activity_id, start, end, duration } => {
            let placement = ActivityPlacement {
                activity_id,
                start_time: start,
                end_time: end,
                estimated_duration: duration,
            };
            let plan = client.add_activity(&itinerary_id, &day_id, &placement, ctx.token()).await?;
            ctx.emit(&plan, |p| format!("Day {} now has {} activities\n", p.id, p.activities.len()))?;
        }

        Command::UpdateActivity { itinerary_id, day_id, activity_id, start, end, duration } => {
            let update = ActivityUpdate {
                start_time: start,
                end_time: end,
                estimated_duration: duration,
            };
            let plan = client
                .update_activity(&itinerary_id, &day_id, &activity_id, &update, ctx.token())
                .await?;
            ctx.emit(&plan, |p| format!("Updated {} in day {}\n", activity_id, p.id))?;
        }

        Command::RemoveActivity { itinerary_id, day_id, activity_id } => {
            client.remove_activity(&itinerary_id, &day_id, &activity_id, ctx.token()).await?;
            println!("Removed {} from day {}", activity_id, day_id);
        }

        Command::Reorder { itinerary_id, day_id, activity_ids } => {
            let ids: Vec<&str> = activity_ids.iter().map(String::as_str).collect();
            let plan = client.reorder_activities(&itinerary_id, &day_id, &ids, ctx.token()).await?;
            ctx.emit(&plan, |p| format!("New order: {}\n", p.activity_ids().join(", ")))?;
        }

        Command::Prefs(cmd) => match cmd.command {
            PrefsSubcommand::Get { user_id } => match client.user_preferences(&user_id, ctx.token()).await {
                Some(prefs) => ctx.emit(&prefs, render::preferences)?,
                None => println!("No preferences stored"),
            },
            PrefsSubcommand::Set { user_id, budget, style, transport, interests, dietary } => {
                let saved = client
                    .edit_user_preferences(
                        &user_id,
                        |prefs| {
                            if let Some(budget) = budget {
                                prefs.budget_level = budget;
                            }
                            if let Some(style) = style {
                                prefs.travel_style = style;
                            }
                            if let Some(transport) = transport {
                                prefs.preferred_transport = transport;
                            }
                            if !interests.is_empty() {
                                prefs.interests = interests.into_iter().collect();
                            }
                            if !dietary.is_empty() {
                                prefs.dietary_restrictions = dietary.into_iter().collect();
                            }
                        },
                        ctx.token(),
                    )
                    .await
                    .context("updating preferences")?;
                ctx.emit(&saved, render::preferences)?;
            }
        },

        Command::Whoami(args) => {
            let directory = UserDirectory::new(client.clone());
            let backend_id = directory.backend_user_id(&args.external_user(), ctx.token()).await?;
            println!("{}", backend_id);
        }

        Command::Raw { method, endpoint, data, curl, reveal_token } => {
            let mut options = RequestOptions::new(method);
            if let Some(data) = data {
                if !method.has_body() {
                    bail!("{} requests do not take --data", method.as_str());
                }
                let parsed: serde_json::Value = serde_json::from_str(&data).context("--data must be JSON")?;
                options = options.json(&parsed)?;
            }
            if curl {
                let prepared = client.prepare(&endpoint, &options, ctx.token())?;
                println!("{}", to_curl(&prepared, reveal_token));
            } else {
                let value: serde_json::Value = client.request(&endpoint, options, ctx.token()).await?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }

        Command::Config(cmd) => match cmd.command {
            ConfigSubcommand::Show => {
                println!("# {}", config_path.display());
                print!("{}", serde_yaml::to_string(config)?);
            }
            ConfigSubcommand::Init { force } => {
                if config_path.exists() && !force {
                    bail!("{} already exists; pass --force to overwrite", config_path.display());
                }
                config.save_to(config_path)?;
                println!("Wrote {}", config_path.display());
            }
        },
    }

    Ok(())
}
