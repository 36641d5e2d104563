//! Command-line front end for the PinDrop journal.
//!
//! A thin layer over the library: parse arguments, resolve configuration,
//! open the store, run one command, print the result.
//!
//! ```text
//! pindrop add --name Kyoto --lat 35.01 --lng 135.77 --status visited --rating 5
//! pindrop list --status visited --sort rating
//! pindrop settings set mapTheme satellite
//! pindrop export            # writes pindrop-backup-YYYY-MM-DD.json
//! ```

#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![allow(clippy::needless_pass_by_value)]

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pindrop::map::{guess_region, TileSource};
use pindrop::observability::init_tracing;
use pindrop::query::{PinQuery, SortBy};
use pindrop::store::backup_file_name;
use pindrop::{open_store, Config, FileStore, MapTheme, NewPin, Pin, PinPatch, PinStatus, PinStore, PindropError, Result};

type Store = PinStore<FileStore>;

#[derive(Parser)]
#[command(name = "pindrop")]
#[command(author, version, about = "A personal travel journal", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the journal data.
    #[arg(long, global = true, env = "PINDROP_DATA_DIR")]
    data_dir: Option<String>,

    /// Tracing filter, e.g. `debug`.
    #[arg(long, global = true, env = "PINDROP_LOG")]
    log: Option<String>,

    /// Export spans as OTLP JSON to the data directory.
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop a new pin.
    Add(AddArgs),

    /// List pins.
    List {
        /// Only pins with this status (visited, wishlist, favorite or all).
        #[arg(short, long, default_value = "all", value_parser = parse_status_filter)]
        status: StatusFilter,

        /// Search name, country, city and notes.
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Sort by date, name or rating.
        #[arg(long, default_value = "date")]
        sort: SortBy,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show one pin.
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Change fields of a pin.
    Update(UpdateArgs),

    /// Delete a pin.
    Remove { id: String },

    /// Show travel statistics.
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Write a backup of all pins.
    Export {
        /// Output file, or `-` for stdout. Default: `pindrop-backup-<today>.json`.
        path: Option<PathBuf>,
    },

    /// Replace all pins with a backup.
    Import { path: PathBuf },

    /// Show or change settings.
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Show the map tile source for a theme.
    Tiles {
        /// Map theme; defaults to the current setting.
        #[arg(long, value_parser = parse_map_theme)]
        theme: Option<MapTheme>,
    },

    /// Delete all pins and settings.
    Clear {
        /// Confirm deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    name: String,

    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    lng: f64,

    /// Country; guessed from the coordinates when omitted.
    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long, default_value = "wishlist", value_parser = parse_status)]
    status: PinStatus,

    #[arg(long, default_value = "")]
    notes: String,

    /// Visit date, `YYYY-MM-DD`.
    #[arg(long)]
    date: Option<String>,

    /// Photo URL.
    #[arg(long)]
    photo: Option<String>,

    /// Rating from 0 to 5.
    #[arg(long)]
    rating: Option<u8>,
}

#[derive(Args)]
struct UpdateArgs {
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    lng: Option<f64>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long, conflicts_with = "clear_city")]
    city: Option<String>,

    #[arg(long, value_parser = parse_status)]
    status: Option<PinStatus>,

    #[arg(long)]
    notes: Option<String>,

    #[arg(long, conflicts_with = "clear_date")]
    date: Option<String>,

    #[arg(long, conflicts_with = "clear_photo")]
    photo: Option<String>,

    #[arg(long, conflicts_with = "clear_rating")]
    rating: Option<u8>,

    #[arg(long)]
    clear_city: bool,

    #[arg(long)]
    clear_date: bool,

    #[arg(long)]
    clear_photo: bool,

    #[arg(long)]
    clear_rating: bool,
}

impl UpdateArgs {
    fn into_patch(self) -> (String, PinPatch) {
        let optional = |value: Option<String>, clear: bool| if clear { Some(None) } else { value.map(Some) };
        let patch = PinPatch {
            name: self.name,
            lat: self.lat,
            lng: self.lng,
            country: self.country,
            city: optional(self.city, self.clear_city),
            status: self.status,
            notes: self.notes,
            date: optional(self.date, self.clear_date),
            photo: optional(self.photo, self.clear_photo),
            rating: if self.clear_rating { Some(None) } else { self.rating.map(Some) },
        };
        (self.id, patch)
    }
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings.
    Show,

    /// Change one setting, e.g. `theme dark` or `backupInterval 14`.
    Set {
        key: String,

        /// JSON value; bare words are taken as strings.
        value: String,
    },

    /// Restore the defaults.
    Reset,
}

fn parse_status(s: &str) -> std::result::Result<PinStatus, String> {
    PinStatus::parse(s).ok_or_else(|| format!("unknown status: {s} (expected visited, wishlist or favorite)"))
}

/// `all` or a single status.
#[derive(Debug, Clone, Copy)]
struct StatusFilter(Option<PinStatus>);

fn parse_status_filter(s: &str) -> std::result::Result<StatusFilter, String> {
    if s.eq_ignore_ascii_case("all") {
        Ok(StatusFilter(None))
    } else {
        parse_status(s).map(|status| StatusFilter(Some(status)))
    }
}

fn parse_map_theme(s: &str) -> std::result::Result<MapTheme, String> {
    MapTheme::parse(s).ok_or_else(|| {
        let names: Vec<&str> = MapTheme::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown map theme: {s} (expected one of {})", names.join(", "))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _tracing = init_tracing(&config);

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut overrides = BTreeMap::new();
    if let Some(dir) = &cli.data_dir {
        overrides.insert("data_dir".to_string(), dir.clone());
    }
    if let Some(level) = &cli.log {
        overrides.insert("trace_level".to_string(), level.clone());
    }

    let config = Config::load(cli.config.as_deref())?.with_overrides(&overrides);
    Ok(if cli.trace { config.with_default_trace_file() } else { config })
}

fn run_command(command: Commands, config: &Config) -> Result<()> {
    let mut store = open_store(config)?;

    match command {
        Commands::Add(args) => cmd_add(&mut store, args),
        Commands::List { status, search, sort, json } => {
            let query = PinQuery { status: status.0, search: search.unwrap_or_default(), sort };
            cmd_list(&store, &query, json)
        }
        Commands::Show { id, json } => cmd_show(&store, &id, json),
        Commands::Update(args) => cmd_update(&mut store, args),
        Commands::Remove { id } => cmd_remove(&mut store, &id),
        Commands::Stats { json } => cmd_stats(&store, json),
        Commands::Export { path } => cmd_export(&store, path),
        Commands::Import { path } => cmd_import(&mut store, &path),
        Commands::Settings(cmd) => cmd_settings(&mut store, cmd),
        Commands::Tiles { theme } => {
            let source = TileSource::for_theme(theme.unwrap_or(store.settings().map_theme));
            println!("{}", source.url_template);
            println!("{}", source.attribution);
            Ok(())
        }
        Commands::Clear { yes } => {
            if !yes {
                return Err(PindropError::Validation("refusing to clear all data without --yes".into()));
            }
            store.clear_all()?;
            println!("All pins and settings deleted.");
            Ok(())
        }
    }
}

fn cmd_add(store: &mut Store, args: AddArgs) -> Result<()> {
    let country = args
        .country
        .unwrap_or_else(|| guess_region(args.lat, args.lng).unwrap_or_default().to_string());

    let new_pin = NewPin {
        city: args.city,
        status: args.status,
        notes: args.notes,
        date: args.date,
        photo: args.photo,
        rating: args.rating,
        ..NewPin::new(args.name, args.lat, args.lng, country)
    };

    let id = store.add(new_pin)?;
    println!("{id}");
    Ok(())
}

fn cmd_list(store: &Store, query: &PinQuery, json: bool) -> Result<()> {
    let pins = query.apply(store.pins());
    if json {
        println!("{}", serde_json::to_string_pretty(&pins)?);
        return Ok(());
    }

    if pins.is_empty() {
        println!("No pins found.");
        return Ok(());
    }
    for pin in pins {
        print_pin_line(pin);
    }
    Ok(())
}

fn print_pin_line(pin: &Pin) {
    let rating = pin.rating.map(|r| format!("  {}", "★".repeat(usize::from(r)))).unwrap_or_default();
    println!("{}  {:<12} {}  ({}){rating}", pin.id, pin.status.label(), pin.name, pin.location_line());
}

fn cmd_show(store: &Store, id: &str, json: bool) -> Result<()> {
    let pin = store.get(id).ok_or_else(|| not_found(id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(pin)?);
        return Ok(());
    }

    println!("{}", pin.name);
    println!("  {}", pin.status.label());
    println!("  {}  [{:.4}, {:.4}]", pin.location_line(), pin.lat, pin.lng);
    if let Some(date) = &pin.date {
        println!("  Visited: {date}");
    }
    if let Some(rating) = pin.rating {
        println!("  Rating: {rating}/5");
    }
    if !pin.notes.is_empty() {
        println!("  {}", pin.notes_excerpt());
    }
    println!("  id {}  updated {}", pin.id, pin.updated_at.format("%Y-%m-%d %H:%M"));
    Ok(())
}

fn cmd_update(store: &mut Store, args: UpdateArgs) -> Result<()> {
    let (id, patch) = args.into_patch();
    if patch.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }
    if store.update(&id, patch)? {
        println!("Updated {id}.");
        Ok(())
    } else {
        Err(not_found(&id))
    }
}

fn cmd_remove(store: &mut Store, id: &str) -> Result<()> {
    if store.remove(id)? {
        println!("Removed {id}.");
    } else {
        println!("No pin with id {id}; nothing removed.");
    }
    Ok(())
}

fn cmd_stats(store: &Store, json: bool) -> Result<()> {
    let stats = store.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Pins            {}", stats.total);
    println!("  Visited       {}", stats.visited);
    println!("  Wishlist      {}", stats.wishlist);
    println!("  Favorite      {}", stats.favorite);
    println!("Countries       {}", stats.countries);
    println!("Cities          {}", stats.cities);
    println!("Average rating  {:.1} {}", stats.average_rating, stats.stars());
    println!("Top country     {}", stats.most_visited_country);
    println!("Top month       {}", stats.top_month);
    println!("Avg note length {}", stats.average_notes_length);
    println!(
        "Completion      {}% ({} to go)",
        stats.completion_percent(),
        stats.remaining()
    );
    Ok(())
}

fn cmd_export(store: &Store, path: Option<PathBuf>) -> Result<()> {
    let snapshot = store.export_snapshot()?;
    let path = path.unwrap_or_else(|| PathBuf::from(backup_file_name(Local::now().date_naive())));

    if path == Path::new("-") {
        println!("{snapshot}");
        return Ok(());
    }
    std::fs::write(&path, snapshot)?;
    println!("Exported {} pins to {}", store.pins().len(), path.display());
    Ok(())
}

fn cmd_import(store: &mut Store, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)?;
    if store.import_snapshot(&text)? {
        println!("Imported {} pins from {}", store.pins().len(), path.display());
        Ok(())
    } else {
        Err(PindropError::Validation(format!(
            "{} is not a valid backup; existing pins were kept",
            path.display()
        )))
    }
}

fn cmd_settings(store: &mut Store, cmd: SettingsCommand) -> Result<()> {
    match cmd {
        SettingsCommand::Show => {}
        SettingsCommand::Set { key, value } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            store.update_setting(&key, &value)?;
        }
        SettingsCommand::Reset => store.reset_settings()?,
    }
    println!("{}", serde_json::to_string_pretty(store.settings())?);
    Ok(())
}

fn not_found(id: &str) -> PindropError {
    PindropError::Validation(format!("no pin with id {id}"))
}
