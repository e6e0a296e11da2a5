//! The chirpy executable administers a chirpy store file from the command line.
//!
//! `chirpy [--dir DIR] [--log-level LEVEL] [--webhook-key KEY] <SUBCOMMAND>`
//!
//!     --dir is the directory holding database.json. If --dir is not specified the current
//!     directory is used. Results are printed to stdout as JSON. Errors are printed to stderr
//!     and return a non-zero exit code.
//!
//! `chirpy chirp post --author <ID> <BODY>`, `chirpy chirp list [--author <ID>] [--sort asc|desc]`,
//! `chirpy chirp get <ID>`, `chirpy chirp rm --author <ID> <ID>`
//!
//! `chirpy user create <EMAIL> <PASSWORD_HASH>`, `chirpy user get (--id <ID> | --email <EMAIL>)`,
//! `chirpy user update <ID> <EMAIL> <PASSWORD_HASH>`, `chirpy user upgrade <ID>`
//!
//! `chirpy token revoke <TOKEN>`, `chirpy token check <TOKEN>`
//!
//! `chirpy webhook [--api-key <KEY>] <EVENT_JSON>`
//!
//!     Replays a billing provider event. The key must match --webhook-key.

use std::path::PathBuf;
use std::process::exit;

use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use chirpy::{
    ChirpEngine, ChirpService, ChirpyError, PublicUser, RecordStore, Result, ServiceConfig,
    SortOrder, StoreConfig, WebhookEvent,
};

const DEFAULT_LOG_LEVEL: &str = "warn";

/// the operation requested on the command line
#[derive(Debug)]
enum Command {
    PostChirp { author_id: u64, body: String },
    ListChirps { author_id: Option<u64>, sort: SortOrder },
    GetChirp { id: u64 },
    DeleteChirp { author_id: u64, id: u64 },
    CreateUser { email: String, password_hash: String },
    GetUserById { id: u64 },
    GetUserByEmail { email: String },
    UpdateUser { id: u64, email: String, password_hash: String },
    UpgradeUser { id: u64 },
    RevokeToken { token: String },
    CheckToken { token: String },
    Webhook { api_key: String, event: WebhookEvent },
}

/// ['Opt'] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    config: StoreConfig,
    webhook_key: String,
    log_level: Level,
    command: Command,
}

fn main() {
    let matches = app().get_matches();

    let opt = match parse_options(&matches) {
        Ok(opt) => opt,
        Err(err) => {
            eprintln!("error: {}", err);
            exit(2);
        }
    };

    // set up a tracing subscriber to log to STDERR
    subscriber_config(opt.log_level);

    if let Err(e) = run(opt) {
        eprintln!("error: {}", e);
        exit(1);
    }
}

fn required(name: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(name).required(true)
}

fn author() -> Arg<'static, 'static> {
    Arg::with_name("author")
        .long("author")
        .value_name("USER_ID")
        .takes_value(true)
}

fn app() -> App<'static, 'static> {
    App::new("chirpy")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("administer a chirpy record store")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("dir")
                .long("dir")
                .value_name("DIR")
                .takes_value(true)
                .help("directory holding database.json, defaults to the current directory"),
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .possible_values(&["error", "warn", "info", "debug", "trace"])
                .default_value(DEFAULT_LOG_LEVEL),
        )
        .arg(
            Arg::with_name("webhook-key")
                .long("webhook-key")
                .value_name("KEY")
                .takes_value(true)
                .help("api key the billing provider must present"),
        )
        .subcommands(vec![
            SubCommand::with_name("chirp")
                .about("manage chirps")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommands(vec![
                    SubCommand::with_name("post")
                        .about("post a chirp")
                        .arg(author().required(true))
                        .arg(required("BODY").index(1)),
                    SubCommand::with_name("list")
                        .about("list chirps")
                        .arg(author())
                        .arg(
                            Arg::with_name("sort")
                                .long("sort")
                                .possible_values(&["asc", "desc"])
                                .default_value("asc"),
                        ),
                    SubCommand::with_name("get")
                        .about("get a chirp by id")
                        .arg(required("ID").index(1)),
                    SubCommand::with_name("rm")
                        .about("delete a chirp, as its author")
                        .arg(author().required(true))
                        .arg(required("ID").index(1)),
                ]),
            SubCommand::with_name("user")
                .about("manage users")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommands(vec![
                    SubCommand::with_name("create")
                        .about("create a user")
                        .arg(required("EMAIL").index(1))
                        .arg(required("PASSWORD_HASH").index(2)),
                    SubCommand::with_name("get")
                        .about("get a user by id or email")
                        .arg(
                            Arg::with_name("id")
                                .long("id")
                                .takes_value(true)
                                .required_unless("email")
                                .conflicts_with("email"),
                        )
                        .arg(Arg::with_name("email").long("email").takes_value(true)),
                    SubCommand::with_name("update")
                        .about("replace a user's email and password hash")
                        .arg(required("ID").index(1))
                        .arg(required("EMAIL").index(2))
                        .arg(required("PASSWORD_HASH").index(3)),
                    SubCommand::with_name("upgrade")
                        .about("upgrade a user to Chirpy Red")
                        .arg(required("ID").index(1)),
                ]),
            SubCommand::with_name("token")
                .about("manage revoked refresh tokens")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommands(vec![
                    SubCommand::with_name("revoke")
                        .about("revoke a token")
                        .arg(required("TOKEN").index(1)),
                    SubCommand::with_name("check")
                        .about("check whether a token is revoked")
                        .arg(required("TOKEN").index(1)),
                ]),
            SubCommand::with_name("webhook")
                .about("replay a billing provider webhook event")
                .arg(
                    Arg::with_name("api-key")
                        .long("api-key")
                        .value_name("KEY")
                        .takes_value(true),
                )
                .arg(required("EVENT_JSON").index(1)),
        ])
}

/// parses the matches from the command line into an [`Opt`] struct
fn parse_options(matches: &ArgMatches) -> Result<Opt> {
    let config = StoreConfig {
        dir: matches.value_of("dir").map(PathBuf::from),
    };
    let webhook_key = matches.value_of("webhook-key").unwrap_or_default().to_string();
    let log_level = matches
        .value_of("log-level")
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .parse::<Level>()
        .map_err(|e| ChirpyError::Parsing(format!("invalid log level: {}", e)))?;

    let command = match matches.subcommand() {
        ("chirp", Some(args)) => parse_chirp(args)?,
        ("user", Some(args)) => parse_user(args)?,
        ("token", Some(args)) => parse_token(args)?,
        ("webhook", Some(args)) => {
            let raw = value(args, "EVENT_JSON")?;
            let event = serde_json::from_str(&raw).map_err(|e| {
                ChirpyError::Parsing(format!("could not parse webhook event: {}", e))
            })?;
            Command::Webhook {
                api_key: args.value_of("api-key").unwrap_or_default().to_string(),
                event,
            }
        }
        (other, _) => return Err(unknown(other)),
    };

    Ok(Opt {
        config,
        webhook_key,
        log_level,
        command,
    })
}

fn parse_chirp(matches: &ArgMatches) -> Result<Command> {
    match matches.subcommand() {
        ("post", Some(args)) => Ok(Command::PostChirp {
            author_id: parse_id(args, "author")?,
            body: value(args, "BODY")?,
        }),
        ("list", Some(args)) => Ok(Command::ListChirps {
            author_id: args.value_of("author").map(to_id).transpose()?,
            sort: args.value_of("sort").unwrap_or_default().parse()?,
        }),
        ("get", Some(args)) => Ok(Command::GetChirp {
            id: parse_id(args, "ID")?,
        }),
        ("rm", Some(args)) => Ok(Command::DeleteChirp {
            author_id: parse_id(args, "author")?,
            id: parse_id(args, "ID")?,
        }),
        (other, _) => Err(unknown(other)),
    }
}

fn parse_user(matches: &ArgMatches) -> Result<Command> {
    match matches.subcommand() {
        ("create", Some(args)) => Ok(Command::CreateUser {
            email: value(args, "EMAIL")?,
            password_hash: value(args, "PASSWORD_HASH")?,
        }),
        ("get", Some(args)) => match args.value_of("email") {
            Some(email) => Ok(Command::GetUserByEmail {
                email: email.to_string(),
            }),
            None => Ok(Command::GetUserById {
                id: parse_id(args, "id")?,
            }),
        },
        ("update", Some(args)) => Ok(Command::UpdateUser {
            id: parse_id(args, "ID")?,
            email: value(args, "EMAIL")?,
            password_hash: value(args, "PASSWORD_HASH")?,
        }),
        ("upgrade", Some(args)) => Ok(Command::UpgradeUser {
            id: parse_id(args, "ID")?,
        }),
        (other, _) => Err(unknown(other)),
    }
}

fn parse_token(matches: &ArgMatches) -> Result<Command> {
    match matches.subcommand() {
        ("revoke", Some(args)) => Ok(Command::RevokeToken {
            token: value(args, "TOKEN")?,
        }),
        ("check", Some(args)) => Ok(Command::CheckToken {
            token: value(args, "TOKEN")?,
        }),
        (other, _) => Err(unknown(other)),
    }
}

fn value(args: &ArgMatches, name: &str) -> Result<String> {
    args.value_of(name)
        .map(String::from)
        .ok_or_else(|| ChirpyError::Parsing(format!("missing argument {}", name)))
}

fn parse_id(args: &ArgMatches, name: &str) -> Result<u64> {
    to_id(&value(args, name)?)
}

fn to_id(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| ChirpyError::Parsing(format!("could not parse {} into an id", raw)))
}

fn unknown(command: &str) -> ChirpyError {
    ChirpyError::Parsing(format!("unknown command {:?}", command))
}

/// opens the store and runs the requested [`Command`] against it
fn run(opt: Opt) -> Result<()> {
    let store = RecordStore::open(&opt.config)?;
    debug!(path = ?store.path(), command = ?opt.command, "running command");
    let service = ChirpService::new(
        store,
        ServiceConfig {
            webhook_api_key: opt.webhook_key,
        },
    );

    match opt.command {
        Command::PostChirp { author_id, body } => print_json(&service.post_chirp(author_id, &body)?),
        Command::ListChirps { author_id, sort } => print_json(&service.chirps(author_id, sort)?),
        Command::GetChirp { id } => print_json(&service.chirp(id)?),
        Command::DeleteChirp { author_id, id } => {
            service.delete_chirp(author_id, id)?;
            print_json(&json!({}))
        }
        Command::CreateUser {
            email,
            password_hash,
        } => print_json(&service.register(&email, &password_hash)?),
        Command::GetUserById { id } => {
            print_json(&PublicUser::from(service.engine().get_user_by_id(id)?))
        }
        Command::GetUserByEmail { email } => {
            print_json(&PublicUser::from(service.engine().get_user_by_email(&email)?))
        }
        Command::UpdateUser {
            id,
            email,
            password_hash,
        } => print_json(&service.update_account(id, &email, &password_hash)?),
        Command::UpgradeUser { id } => {
            print_json(&PublicUser::from(service.engine().upgrade_user(id)?))
        }
        Command::RevokeToken { token } => {
            service.revoke_refresh_token(&token)?;
            print_json(&json!({}))
        }
        Command::CheckToken { token } => {
            let revoked = service.engine().is_token_revoked(&token)?;
            print_json(&json!({ "revoked": revoked }))
        }
        Command::Webhook { api_key, event } => {
            service.handle_webhook(&api_key, &event)?;
            print_json(&json!({}))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| ChirpyError::Malformed(format!("could not encode output: {}", e)))?;
    println!("{}", out);
    Ok(())
}

/// configures a tracing subscriber that will log to STDERR
fn subscriber_config(level: Level) {
    let subscriber = FmtSubscriber::builder()
        // spans/events at `level` or more severe are written
        .with_max_level(level)
        // log to stderr, stdout carries the JSON results
        .with_writer(std::io::stderr)
        // completes the builder.
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not install tracing subscriber: {}", e);
    }
}
